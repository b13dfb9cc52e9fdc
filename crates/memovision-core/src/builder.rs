//! Builder for assembling a [`PlayerSession`] from backend data.

use std::sync::Arc;

use tracing::debug;

use crate::clock::{AudioClock, ManualClock};
use crate::config::PlayerConfig;
use crate::gain::OutputGain;
use crate::measure::MeasureTable;
use crate::payload::{MeasureRecord, SyncData, TrackRecord};
use crate::player::AudioPlayer;
use crate::registry::TrackRegistry;
use crate::session::PlayerSession;
use crate::sync::{LinearAxis, SyncMapper, SyncPoints};
use crate::transport::Transport;
use crate::view::{WaveformView, Zoom};
use crate::{Error, Result};

struct TrackIo {
    filename: String,
    player: Box<dyn AudioPlayer>,
    view: Box<dyn WaveformView>,
}

/// Only tracks flagged `sync` take part in the session; records, sync tables
/// and measure lists of the other tracks are ignored. Every synchronized
/// track needs a player and a view registered under its filename.
///
/// # Example
///
/// ```ignore
/// let session = SessionBuilder::new()
///     .clock(clock)
///     .tracks(track_records)
///     .sync_data(sync_data)
///     .measures(measure_records)
///     .track_io("a.wav", player_a, view_a)
///     .track_io("b.wav", player_b, view_b)
///     .build()?;
/// ```
pub struct SessionBuilder {
    config: PlayerConfig,
    clock: Option<Arc<dyn AudioClock>>,
    gain: Option<OutputGain>,
    tracks: Vec<TrackRecord>,
    sync: SyncData,
    measures: Vec<MeasureRecord>,
    io: Vec<TrackIo>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            config: PlayerConfig::default(),
            clock: None,
            gain: None,
            tracks: Vec::new(),
            sync: SyncData::default(),
            measures: Vec::new(),
            io: Vec::new(),
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: PlayerConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: a [`ManualClock`] starting at 0.
    pub fn clock(mut self, clock: Arc<dyn AudioClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Gain cell read by the audio engine. Default: a fresh cell.
    pub fn output_gain(mut self, gain: OutputGain) -> Self {
        self.gain = Some(gain);
        self
    }

    pub fn tracks(mut self, tracks: Vec<TrackRecord>) -> Self {
        self.tracks = tracks;
        self
    }

    pub fn sync_data(mut self, sync: SyncData) -> Self {
        self.sync = sync;
        self
    }

    pub fn measures(mut self, measures: Vec<MeasureRecord>) -> Self {
        self.measures = measures;
        self
    }

    pub fn track_io(
        mut self,
        filename: impl Into<String>,
        player: Box<dyn AudioPlayer>,
        view: Box<dyn WaveformView>,
    ) -> Self {
        self.io.push(TrackIo {
            filename: filename.into(),
            player,
            view,
        });
        self
    }

    pub fn build(mut self) -> Result<PlayerSession> {
        self.config.validate()?;

        let mut registry = TrackRegistry::new();
        for record in self.tracks.iter().filter(|t| t.sync) {
            registry.register(record.filename.clone(), record.length_sec, record.flags())?;
        }
        let reference = registry.reference_index().ok_or(Error::NoReferenceTrack)?;
        let durations: Vec<f64> = registry.tracks().iter().map(|t| t.duration()).collect();

        let points = SyncPoints::new(std::mem::take(&mut self.sync.sync_points))?;
        let axes = std::mem::take(&mut self.sync.lin_axes)
            .into_iter()
            .enumerate()
            .map(|(track, [positions, ref_times])| LinearAxis::new(track, positions, ref_times))
            .collect::<Result<Vec<_>>>()?;
        let mapper = SyncMapper::new(points, axes, durations, reference)?;

        let measures = MeasureTable::new(
            registry
                .tracks()
                .iter()
                .map(|track| {
                    let boundaries = self
                        .measures
                        .iter()
                        .find(|m| m.filename == track.filename())
                        .and_then(MeasureRecord::preferred)
                        .ok_or_else(|| Error::MissingMeasures(track.filename().to_string()))?;
                    Ok((track.filename().to_string(), boundaries.to_vec()))
                })
                .collect::<Result<Vec<_>>>()?,
        )?;

        let mut players = Vec::with_capacity(registry.len());
        let mut views = Vec::with_capacity(registry.len());
        for track in registry.tracks() {
            let position = self
                .io
                .iter()
                .position(|io| io.filename == track.filename())
                .ok_or_else(|| Error::MissingTrackIo(track.filename().to_string()))?;
            let TrackIo {
                player, mut view, ..
            } = self.io.swap_remove(position);

            view.set_zoom(Zoom::Seconds(track.duration()));
            if let Some(map) = measures.get(track.index()) {
                for point in map.markers(&self.config.marker_color) {
                    view.add_point(point);
                }
            }
            players.push(player);
            views.push(view);
        }
        if !self.io.is_empty() {
            debug!(unused = self.io.len(), "ignoring players for unsynchronized tracks");
        }

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(ManualClock::new(0.0)));
        let gain = self.gain.unwrap_or_default();
        let transport = Transport::new(clock, players, gain, &self.config);

        debug!(
            tracks = registry.len(),
            reference,
            measures = measures.measure_count(),
            "player session built"
        );
        Ok(PlayerSession::from_parts(
            self.config,
            registry,
            mapper,
            measures,
            views,
            transport,
        ))
    }
}
