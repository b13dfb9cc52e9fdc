//! Error types for memovision-core.

use thiserror::Error;

/// Error type for memovision-core operations.
///
/// Only load-time integrity checks and persistence produce errors. Real-time
/// transport operations clamp, drop or gate instead of failing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Track already registered: {0}")]
    DuplicateTrack(String),

    #[error("Invalid duration for track '{track}': {duration}")]
    InvalidDuration { track: String, duration: f64 },

    #[error("No reference track among synchronized tracks")]
    NoReferenceTrack,

    #[error("More than one reference track: '{first}' and '{second}'")]
    MultipleReferenceTracks { first: String, second: String },

    #[error("Sync data covers {found} tracks, expected {expected}")]
    SyncTrackCount { expected: usize, found: usize },

    #[error("Sync table for track {track} has {found} points, expected {expected}")]
    SyncLengthMismatch {
        track: usize,
        expected: usize,
        found: usize,
    },

    #[error("Sync table is empty")]
    EmptySyncTable,

    #[error("Linear axis for track {track} has {positions} positions but {ref_times} reference times")]
    AxisLengthMismatch {
        track: usize,
        positions: usize,
        ref_times: usize,
    },

    #[error("Measure boundaries for '{track}' are not strictly increasing at index {index}")]
    NonMonotonicMeasures { track: String, index: usize },

    #[error("Measure map for '{track}' has {found} boundaries, expected {expected}")]
    MeasureCountMismatch {
        track: String,
        expected: usize,
        found: usize,
    },

    #[error("No measure data for track: {0}")]
    MissingMeasures(String),

    #[error("No player/view attached for track: {0}")]
    MissingTrackIo(String),

    #[error("Time relay already driven by track {0}")]
    RelayBusy(usize),

    #[error("Region must have a name")]
    UnnamedRegion,

    #[error("No region selected")]
    NoRegionSelected,

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
