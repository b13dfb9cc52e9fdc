//! # memovision - Synchronized multi-track playback
//!
//! Plays several recordings of the same piece as one: a single audible track
//! drives sync-mapped cursors on all others, and track switches, pauses and
//! seeks are declicked.
//!
//! ## Architecture
//!
//! memovision is an umbrella crate that coordinates:
//! - **memovision-core** - Track registry, sync mapping, measure maps,
//!   declicked transport, zoom, session facade
//! - **loader** - Backend JSON documents into a ready-to-build session
//!
//! ## Quick Start
//!
//! ```ignore
//! use memovision::prelude::*;
//!
//! let clock = ManualClock::new(0.0);
//! let mut session = SessionLoader::from_dir("data/piece")?.headless(Arc::new(clock.clone()))?;
//!
//! for track in 0..session.track_count() {
//!     session.mark_view_ready(track);
//! }
//! session.play_pause();
//!
//! // Once per animation frame
//! clock.advance(1.0 / 60.0);
//! session.tick();
//! ```

/// Re-export of memovision-core for direct access
pub use memovision_core as core;

pub use memovision_core::{
    AudioClock, AudioPlayer, CommandSender, FadeCurve, HeadlessView, ManualClock, MeasureMap,
    MeasureRecord, MeasureSpan, MediaElement, MediaElementPlayer, MotionState, OutputGain,
    PlaybackMonitor, PlayerConfig, PlayerSession, ReferenceRegion, RegionPayload, RegionStore,
    SchedulerBackedPlayer, Segment, SessionBuilder, SyncData, SyncMapper, TrackRecord,
    TransportCommand, WaveformView, Zoom,
};

mod error;
mod loader;

pub use error::{Error, Result};
pub use loader::{SessionLoader, CONFIG_FILE, MEASURES_FILE, SYNC_FILE, TRACKS_FILE};

/// Convenience prelude for common imports
pub mod prelude {
    // Session
    pub use crate::{PlayerSession, SessionBuilder, SessionLoader};

    // Collaborators
    pub use crate::{AudioClock, AudioPlayer, HeadlessView, ManualClock, WaveformView};

    // Control and observation
    pub use crate::{CommandSender, MeasureSpan, PlaybackMonitor, TransportCommand};

    pub use std::sync::Arc;
}
