//! Test helpers and fixtures for memovision integration tests
//!
//! Sessions run on a [`ManualClock`] stepped in fixed ticks, so every fade
//! and playhead frame is deterministic. Players record each call together
//! with the output gain at that moment.

pub mod tolerances;

use std::sync::{Arc, Mutex, MutexGuard};

use memovision::core::{OutputGain, SyncData};
use memovision::prelude::*;
use memovision::{MeasureRecord, PlayerConfig, SchedulerBackedPlayer, Segment, TrackRecord, Zoom};

/// Host tick rate used by [`Fixture::advance`].
pub const TICK_HZ: f64 = 240.0;

/// Durations of the three-track fixture, reference first.
pub const DURATIONS: [f64; 3] = [120.0, 118.0, 125.0];

/// Correspondence samples per track.
pub const SYNC_SAMPLES: usize = 200;

/// Measure boundaries of the reference track, sentinels included.
pub const REFERENCE_MEASURES: [f64; 8] = [0.0, 1.0, 3.0, 5.0, 7.0, 9.0, 11.0, 13.0];

// =============================================================================
// Recording player
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerOp {
    Play,
    Pause,
    Seek(f64),
    PlaySegment { start: f64, end: f64, looped: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpRecord {
    pub track: usize,
    pub op: PlayerOp,
    /// Output gain when the call was made.
    pub gain: f32,
}

#[derive(Debug, Clone, Default)]
pub struct OpLog(Arc<Mutex<Vec<OpRecord>>>);

impl OpLog {
    fn push(&self, record: OpRecord) {
        self.lock().push(record);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<OpRecord>> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn records(&self) -> Vec<OpRecord> {
        self.lock().clone()
    }

    pub fn for_track(&self, track: usize) -> Vec<PlayerOp> {
        self.lock()
            .iter()
            .filter(|r| r.track == track)
            .map(|r| r.op)
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Clock-driven player that logs every transport call.
pub struct RecordingPlayer {
    track: usize,
    inner: SchedulerBackedPlayer,
    gain: OutputGain,
    log: OpLog,
}

impl RecordingPlayer {
    fn record(&self, op: PlayerOp) {
        self.log.push(OpRecord {
            track: self.track,
            op,
            gain: self.gain.get(),
        });
    }
}

impl AudioPlayer for RecordingPlayer {
    fn play(&mut self) {
        self.record(PlayerOp::Play);
        self.inner.play();
    }

    fn pause(&mut self) {
        self.record(PlayerOp::Pause);
        self.inner.pause();
    }

    fn seek(&mut self, time: f64) {
        self.record(PlayerOp::Seek(time));
        self.inner.seek(time);
    }

    fn play_segment(&mut self, segment: &Segment, looped: bool) {
        self.record(PlayerOp::PlaySegment {
            start: segment.start_time,
            end: segment.end_time,
            looped,
        });
        self.inner.play_segment(segment, looped);
    }

    fn is_playing(&self) -> bool {
        self.inner.is_playing()
    }

    fn current_time(&self) -> f64 {
        self.inner.current_time()
    }

    fn duration(&self) -> f64 {
        self.inner.duration()
    }

    fn poll(&mut self) {
        self.inner.poll();
    }
}

// =============================================================================
// Shared view
// =============================================================================

/// [`HeadlessView`] the test can inspect while the session owns it.
#[derive(Clone, Default)]
pub struct SharedView(Arc<Mutex<HeadlessView>>);

impl SharedView {
    pub fn state(&self) -> HeadlessView {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn with(&self, f: impl FnOnce(&mut HeadlessView)) {
        f(&mut self.0.lock().unwrap_or_else(|e| e.into_inner()));
    }
}

impl WaveformView for SharedView {
    fn set_zoom(&mut self, zoom: Zoom) {
        self.with(|v| v.set_zoom(zoom));
    }
    fn set_start_time(&mut self, time: f64) {
        self.with(|v| v.set_start_time(time));
    }
    fn enable_auto_scroll(&mut self, enabled: bool) {
        self.with(|v| v.enable_auto_scroll(enabled));
    }
    fn set_playhead(&mut self, time: f64) {
        self.with(|v| v.set_playhead(time));
    }
    fn add_segment(&mut self, segment: Segment) {
        self.with(|v| v.add_segment(segment));
    }
    fn remove_segment(&mut self, id: &str) {
        self.with(|v| v.remove_segment(id));
    }
    fn remove_all_segments(&mut self) {
        self.with(|v| v.remove_all_segments());
    }
    fn add_point(&mut self, point: memovision::core::MeasurePoint) {
        self.with(|v| v.add_point(point));
    }
    fn remove_all_points(&mut self) {
        self.with(|v| v.remove_all_points());
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub struct Fixture {
    pub session: PlayerSession,
    pub clock: ManualClock,
    pub gain: OutputGain,
    pub log: OpLog,
    pub views: Vec<SharedView>,
}

/// Evenly spaced correspondence samples over `duration`.
pub fn sync_table(duration: f64) -> Vec<f64> {
    (0..SYNC_SAMPLES)
        .map(|k| k as f64 * duration / (SYNC_SAMPLES - 1) as f64)
        .collect()
}

/// Reference measures scaled to a track of `duration`.
pub fn measure_table(duration: f64) -> Vec<f64> {
    let scale = duration / DURATIONS[0];
    REFERENCE_MEASURES.iter().map(|b| b * scale).collect()
}

pub fn track_name(track: usize) -> String {
    format!("performance-{track}.wav")
}

pub fn track_records() -> Vec<TrackRecord> {
    DURATIONS
        .iter()
        .enumerate()
        .map(|(i, &length_sec)| TrackRecord {
            filename: track_name(i),
            length_sec,
            reference: i == 0,
            sync: true,
            gt_measures: true,
            tf_measures: false,
        })
        .collect()
}

pub fn sync_data() -> SyncData {
    SyncData {
        sync_points: DURATIONS.iter().map(|&d| sync_table(d)).collect(),
        lin_axes: Vec::new(),
    }
}

pub fn measure_records() -> Vec<MeasureRecord> {
    DURATIONS
        .iter()
        .enumerate()
        .map(|(i, &d)| MeasureRecord {
            filename: track_name(i),
            reference: i == 0,
            gt_measures: Some(measure_table(d)),
            tf_measures: None,
        })
        .collect()
}

impl Fixture {
    /// Three synchronized tracks, durations [`DURATIONS`], views not yet ready.
    pub fn three_tracks() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    pub fn with_config(config: PlayerConfig) -> Self {
        let clock = ManualClock::new(0.0);
        let shared: Arc<dyn AudioClock> = Arc::new(clock.clone());
        let gain = OutputGain::default();
        let log = OpLog::default();
        let views: Vec<SharedView> = DURATIONS.iter().map(|_| SharedView::default()).collect();

        let mut builder = SessionBuilder::new()
            .config(config)
            .clock(shared.clone())
            .output_gain(gain.clone())
            .tracks(track_records())
            .sync_data(sync_data())
            .measures(measure_records());
        for (track, &duration) in DURATIONS.iter().enumerate() {
            let player = RecordingPlayer {
                track,
                inner: SchedulerBackedPlayer::new(shared.clone(), duration),
                gain: gain.clone(),
                log: log.clone(),
            };
            builder = builder.track_io(
                track_name(track),
                Box::new(player),
                Box::new(views[track].clone()),
            );
        }
        let session = builder.build().expect("fixture session should build");

        Self {
            session,
            clock,
            gain,
            log,
            views,
        }
    }

    /// Three tracks with every view loaded.
    pub fn ready() -> Self {
        let mut fixture = Self::three_tracks();
        fixture.mark_all_ready();
        fixture
    }

    pub fn mark_all_ready(&mut self) {
        for track in 0..self.session.track_count() {
            self.session.mark_view_ready(track);
        }
    }

    /// Steps the clock by `secs` in host ticks, ticking the session each time.
    /// Returns the output gain observed after every tick.
    pub fn advance(&mut self, secs: f64) -> Vec<f32> {
        let steps = (secs * TICK_HZ).round().max(1.0) as usize;
        let mut gains = Vec::with_capacity(steps);
        for _ in 0..steps {
            self.clock.advance(1.0 / TICK_HZ);
            self.session.tick();
            gains.push(self.gain.get());
        }
        gains
    }

    /// Lets pending fades finish.
    pub fn settle(&mut self) {
        self.advance(0.05);
    }

    pub fn position(&self, track: usize) -> f64 {
        self.session
            .transport()
            .player(track)
            .map_or(f64::NAN, |p| p.current_time())
    }

    pub fn is_audible(&self, track: usize) -> bool {
        self.session
            .transport()
            .player(track)
            .is_some_and(|p| p.is_playing())
    }

    pub fn view(&self, track: usize) -> HeadlessView {
        self.views[track].state()
    }
}
