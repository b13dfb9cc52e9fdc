//! Player session facade.
//!
//! A [`PlayerSession`] owns everything one multi-track player needs: the
//! track registry, sync and measure data, the views, the transport and the
//! zoom state. Hosts drive it from one thread, calling [`PlayerSession::tick`]
//! once per animation frame; other threads talk to it through a
//! [`CommandSender`] and read it through a [`PlaybackMonitor`].

use tracing::{debug, warn};

use crate::command::{CommandQueue, CommandSender, TransportCommand};
use crate::config::PlayerConfig;
use crate::measure::{MeasureSpan, MeasureTable, BOUNDARY_TOLERANCE};
use crate::monitor::PlaybackMonitor;
use crate::payload::{ReferenceRegion, RegionPayload};
use crate::registry::TrackRegistry;
use crate::sync::SyncMapper;
use crate::transport::{MotionState, TrackContext, Transport};
use crate::view::WaveformView;
use crate::zoom::ZoomController;
use crate::{Error, Result};

/// Persists named regions, typically by posting them to the backend.
pub trait RegionStore {
    fn save_region(&self, region: &RegionPayload) -> Result<()>;
}

pub struct PlayerSession {
    config: PlayerConfig,
    registry: TrackRegistry,
    mapper: SyncMapper,
    measures: MeasureTable,
    views: Vec<Box<dyn WaveformView>>,
    transport: Transport,
    zoom: ZoomController,
    commands: CommandQueue,
    monitor: PlaybackMonitor,
    measures_visible: bool,
}

impl PlayerSession {
    /// Assembled by [`SessionBuilder`](crate::SessionBuilder).
    pub(crate) fn from_parts(
        config: PlayerConfig,
        registry: TrackRegistry,
        mapper: SyncMapper,
        measures: MeasureTable,
        views: Vec<Box<dyn WaveformView>>,
        transport: Transport,
    ) -> Self {
        let durations: Vec<f64> = registry.tracks().iter().map(|t| t.duration()).collect();
        let zoom = ZoomController::new(&config, &durations);
        let monitor = PlaybackMonitor::new(registry.time_cells());
        Self {
            config,
            registry,
            mapper,
            measures,
            views,
            transport,
            zoom,
            commands: CommandQueue::new(),
            monitor,
            measures_visible: true,
        }
    }

    /// Splits the session into the transport, the zoom controller and the
    /// context both of them operate on.
    fn parts(&mut self) -> (&mut Transport, &mut ZoomController, TrackContext<'_>) {
        let ctx = TrackContext {
            registry: &mut self.registry,
            mapper: &self.mapper,
            measures: &self.measures,
            views: &mut self.views,
        };
        (&mut self.transport, &mut self.zoom, ctx)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    pub fn mapper(&self) -> &SyncMapper {
        &self.mapper
    }

    pub fn measures(&self) -> &MeasureTable {
        &self.measures
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn view(&self, track: usize) -> Option<&dyn WaveformView> {
        self.views.get(track).map(|v| v.as_ref())
    }

    pub fn track_count(&self) -> usize {
        self.registry.len()
    }

    pub fn active(&self) -> usize {
        self.transport.active()
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn motion(&self) -> MotionState {
        self.transport.motion()
    }

    pub fn is_ready(&self) -> bool {
        self.registry.all_ready()
    }

    pub fn measures_visible(&self) -> bool {
        self.measures_visible
    }

    /// Shared, lock-free view of the playback state.
    pub fn monitor(&self) -> PlaybackMonitor {
        self.monitor.clone()
    }

    pub fn command_sender(&self) -> CommandSender {
        self.commands.sender()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Records that the view of `track` finished loading. Once every view is
    /// ready the active track starts driving the others.
    pub fn mark_view_ready(&mut self, track: usize) {
        self.registry.mark_ready(track);
        debug!(
            track,
            progress = self.registry.load_progress(),
            "waveform view ready"
        );
        if self.registry.all_ready() {
            let (transport, _, mut ctx) = self.parts();
            transport.activate(&mut ctx);
        }
        self.publish_monitor();
    }

    // =========================================================================
    // Transport
    // =========================================================================

    pub fn play_pause(&mut self) {
        let (transport, _, mut ctx) = self.parts();
        transport.play_pause(&mut ctx);
    }

    pub fn select_track(&mut self, track: usize) {
        let (transport, _, mut ctx) = self.parts();
        transport.select_track(&mut ctx, track);
    }

    /// Selects the track above the active one. No-op on the first track.
    pub fn select_previous(&mut self) {
        if let Some(track) = self.transport.active().checked_sub(1) {
            self.select_track(track);
        }
    }

    /// Selects the track below the active one. No-op on the last track.
    pub fn select_next(&mut self) {
        let track = self.transport.active() + 1;
        if track < self.registry.len() {
            self.select_track(track);
        }
    }

    /// Pointer pressed on the waveform of `track`.
    pub fn on_waveform_pressed(&mut self, track: usize) {
        if track != self.transport.active() {
            self.select_track(track);
        }
    }

    /// Seeks the active track to `time` in its own timeline, as a click on
    /// its waveform does.
    pub fn seek(&mut self, time: f64) {
        let (transport, _, mut ctx) = self.parts();
        transport.locate(&mut ctx, time);
    }

    pub fn rewind(&mut self) {
        let (transport, _, mut ctx) = self.parts();
        transport.rewind(&mut ctx);
    }

    pub fn go_to_measure(&mut self, measure: usize) {
        let (transport, _, mut ctx) = self.parts();
        transport.go_to_measure(&mut ctx, measure);
    }

    /// Measure under the reference track's cursor.
    pub fn current_measure(&self) -> Option<usize> {
        let reference = self.mapper.reference();
        let time = self.registry.time(reference);
        self.measures
            .get(reference)
            .and_then(|map| map.measure_at(time + BOUNDARY_TOLERANCE))
    }

    /// Moves `delta` measures from the current one. Targets outside the
    /// piece are ignored, as is stepping back from before the first measure.
    pub fn step_measure(&mut self, delta: isize) {
        let target = match self.current_measure() {
            Some(current) => current.checked_add_signed(delta),
            None if delta > 0 => Some(0),
            None => None,
        };
        match target {
            Some(measure) if measure < self.measures.measure_count() => self.go_to_measure(measure),
            _ => debug!(delta, "measure step out of range"),
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.transport.set_volume(volume.clamp(0.0, 1.0));
    }

    // =========================================================================
    // Measures and regions
    // =========================================================================

    /// Shows or hides the measure markers on every view.
    pub fn toggle_measures(&mut self) {
        if self.measures_visible {
            for view in &mut self.views {
                view.remove_all_points();
            }
        } else {
            for (view, map) in self.views.iter_mut().zip(self.measures.maps()) {
                for point in map.markers(&self.config.marker_color) {
                    view.add_point(point);
                }
            }
        }
        self.measures_visible = !self.measures_visible;
    }

    /// Zooms every track onto `span`; `None` restores the full views.
    pub fn zoom_on_measure_selection(&mut self, span: Option<MeasureSpan>) {
        let (transport, zoom, mut ctx) = self.parts();
        zoom.zoom_on_measure_selection(transport, &mut ctx, span);
    }

    pub fn select_region(&mut self, region: &ReferenceRegion) {
        let (transport, zoom, mut ctx) = self.parts();
        zoom.select_region(transport, &mut ctx, region);
    }

    pub fn clear_selection(&mut self) {
        let (transport, zoom, mut ctx) = self.parts();
        zoom.clear_selection(transport, &mut ctx);
    }

    /// Hook for the host's debounced resize handling.
    pub fn on_container_resized(&mut self) {
        let (_, zoom, mut ctx) = self.parts();
        zoom.on_container_resized(&mut ctx);
    }

    /// The reference track's selected region, named `name`.
    pub fn region_payload(&self, name: &str) -> Result<RegionPayload> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::UnnamedRegion);
        }
        let segment = self
            .registry
            .selection(self.mapper.reference())
            .ok_or(Error::NoRegionSelected)?;
        let (start_measure_idx, end_measure_idx) = self
            .zoom
            .selection()
            .map_or((-1, -1), |span| (span.start as i64, span.end as i64));
        Ok(RegionPayload {
            start_time: segment.start_time,
            end_time: segment.end_time,
            region_name: name.to_string(),
            length_sec: segment.length(),
            start_measure_idx,
            end_measure_idx,
        })
    }

    /// Saves the selected region through `store`. Failures leave the session
    /// untouched and come back as [`Error::Persistence`].
    pub fn save_region(&self, name: &str, store: &dyn RegionStore) -> Result<RegionPayload> {
        let payload = self.region_payload(name)?;
        match store.save_region(&payload) {
            Ok(()) => {
                debug!(region = %payload.region_name, "region saved");
                Ok(payload)
            }
            Err(e) => {
                warn!(region = %payload.region_name, error = %e, "saving region failed");
                Err(match e {
                    Error::Persistence(_) => e,
                    other => Error::Persistence(other.to_string()),
                })
            }
        }
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Runs queued commands, then advances the transport.
    pub fn tick(&mut self) {
        for command in self.commands.drain() {
            self.apply(command);
        }
        let (transport, _, mut ctx) = self.parts();
        transport.tick(&mut ctx);
        self.publish_monitor();
    }

    pub fn apply(&mut self, command: TransportCommand) {
        match command {
            TransportCommand::PlayPause => self.play_pause(),
            TransportCommand::Rewind => self.rewind(),
            TransportCommand::SelectPrevious => self.select_previous(),
            TransportCommand::SelectNext => self.select_next(),
            TransportCommand::SelectTrack(track) => self.select_track(track),
            TransportCommand::PreviousMeasure => self.step_measure(-1),
            TransportCommand::NextMeasure => self.step_measure(1),
            TransportCommand::GoToMeasure(measure) => self.go_to_measure(measure),
            TransportCommand::ToggleMeasures => self.toggle_measures(),
            TransportCommand::ClearSelection => self.clear_selection(),
            TransportCommand::ZoomOnMeasures(span) => self.zoom_on_measure_selection(span),
            TransportCommand::SetVolume(volume) => self.set_volume(volume),
        }
    }

    fn publish_monitor(&self) {
        self.monitor.publish(
            self.transport.active(),
            self.transport.motion(),
            self.current_measure(),
            self.registry.load_progress(),
        );
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Tears the player down to its just-built state. Views need to report
    /// ready again before the transport accepts commands.
    pub fn reset(&mut self) {
        self.transport.reset();
        self.zoom.reset();
        for view in &mut self.views {
            view.remove_all_segments();
            view.remove_all_points();
        }
        self.registry.reset_state();
        self.commands.drain();
        self.measures_visible = false;
        self.publish_monitor();
        debug!("player session reset");
    }
}
