//! Loading session data from the backend's JSON documents.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::{
    AudioClock, HeadlessView, MeasureRecord, PlayerConfig, PlayerSession, SchedulerBackedPlayer,
    SessionBuilder, SyncData, TrackRecord,
};
use crate::{Error, Result};

/// File names read by [`SessionLoader::from_dir`].
pub const TRACKS_FILE: &str = "tracks.json";
pub const SYNC_FILE: &str = "sync.json";
pub const MEASURES_FILE: &str = "measures.json";
/// Optional; defaults apply when absent.
pub const CONFIG_FILE: &str = "config.json";

/// Track list, sync data and measures of one piece, ready to build a session.
#[derive(Debug, Clone)]
pub struct SessionLoader {
    config: PlayerConfig,
    tracks: Vec<TrackRecord>,
    sync: SyncData,
    measures: Vec<MeasureRecord>,
}

fn parse<T: DeserializeOwned>(source_name: &str, json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|error| Error::Json {
        source_name: source_name.to_string(),
        error,
    })
}

impl SessionLoader {
    /// Parses the three documents as served by the backend.
    pub fn from_json(tracks: &str, sync: &str, measures: &str) -> Result<Self> {
        Ok(Self {
            config: PlayerConfig::default(),
            tracks: parse(TRACKS_FILE, tracks)?,
            sync: parse(SYNC_FILE, sync)?,
            measures: parse(MEASURES_FILE, measures)?,
        })
    }

    /// Reads a directory holding [`TRACKS_FILE`], [`SYNC_FILE`],
    /// [`MEASURES_FILE`] and optionally [`CONFIG_FILE`].
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |name: &str| fs::read_to_string(dir.join(name));

        let mut loader = Self::from_json(
            &read(TRACKS_FILE)?,
            &read(SYNC_FILE)?,
            &read(MEASURES_FILE)?,
        )?;
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            loader.config = parse(CONFIG_FILE, &fs::read_to_string(config_path)?)?;
        }
        debug!(
            dir = %dir.display(),
            tracks = loader.tracks.len(),
            "session data loaded"
        );
        Ok(loader)
    }

    pub fn with_config(mut self, config: PlayerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Every track of the piece, synchronized or not.
    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    /// Tracks that take part in playback, in session order.
    pub fn sync_tracks(&self) -> impl Iterator<Item = &TrackRecord> {
        self.tracks.iter().filter(|t| t.sync)
    }

    /// A builder holding the loaded data. Players and views are still to be
    /// attached with [`SessionBuilder::track_io`].
    pub fn into_builder(self) -> SessionBuilder {
        SessionBuilder::new()
            .config(self.config)
            .tracks(self.tracks)
            .sync_data(self.sync)
            .measures(self.measures)
    }

    /// Builds a session with clock-driven players and headless views.
    pub fn headless(self, clock: Arc<dyn AudioClock>) -> Result<PlayerSession> {
        let io: Vec<(String, f64)> = self
            .sync_tracks()
            .map(|t| (t.filename.clone(), t.length_sec))
            .collect();
        let mut builder = self.into_builder().clock(clock.clone());
        for (filename, duration) in io {
            builder = builder.track_io(
                filename,
                Box::new(SchedulerBackedPlayer::new(clock.clone(), duration)),
                Box::new(HeadlessView::default()),
            );
        }
        Ok(builder.build()?)
    }
}
