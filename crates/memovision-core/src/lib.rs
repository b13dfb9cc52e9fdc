//! Synchronized multi-track playback core.
//!
//! Several recordings of the same piece play as one: exactly one track is
//! audible while the others follow through sync-mapped cursors. Switching,
//! pausing and seeking are declicked on a shared output gain, and measure or
//! region selections zoom every track onto the same musical span.
//!
//! # Primary API
//!
//! - [`SessionBuilder`] / [`PlayerSession`]: Main entry point
//! - [`Transport`]: Play/pause, track switching and locating
//! - [`SyncMapper`]: Cross-track time conversion
//! - [`MeasureMap`] / [`ZoomController`]: Measure navigation and zoom
//! - [`CommandSender`] / [`PlaybackMonitor`]: Access from other threads
//!
//! # Collaborators
//!
//! The audio output engine and the waveform widget stay outside the crate.
//! They plug in through [`AudioClock`], [`OutputGain`], [`AudioPlayer`] and
//! [`WaveformView`]; [`ManualClock`], [`SchedulerBackedPlayer`] and
//! [`HeadlessView`] cover headless use.
//!
//! # Example
//!
//! ```ignore
//! use memovision_core::*;
//!
//! let mut session = SessionBuilder::new()
//!     .clock(clock)
//!     .tracks(tracks)
//!     .sync_data(sync)
//!     .measures(measures)
//!     .track_io("a.wav", player_a, view_a)
//!     .build()?;
//!
//! session.mark_view_ready(0);
//! session.play_pause();
//! loop {
//!     session.tick();
//! }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::PlayerConfig;

pub(crate) mod lockfree;
pub use lockfree::{AtomicDouble, AtomicFlag, AtomicFloat, AtomicIndex};

pub mod clock;
pub use clock::{AudioClock, ManualClock};

pub mod gain;
pub use gain::{FadeCurve, GainRamp, OutputGain};

pub mod crossfade;
pub use crossfade::{Crossfader, FadeEvent, FadePhase};

pub mod registry;
pub use registry::{Track, TrackFlags, TrackRegistry};

pub mod sync;
pub use sync::{LinearAxis, SyncMapper, SyncPoints};

pub mod measure;
pub use measure::{MeasureMap, MeasureSpan, MeasureTable, BOUNDARY_TOLERANCE};

pub mod player;
pub use player::{AudioPlayer, MediaElement, MediaElementPlayer, SchedulerBackedPlayer};

pub mod view;
pub use view::{
    HeadlessView, MeasurePoint, Segment, WaveformView, Zoom, RELEVANT_MEASURE_ID, SELECTED_REGION_ID,
};

pub mod transport;
pub use transport::{
    LocateTarget, MotionState, PlayheadLoop, Subscription, TimeRelay, TrackContext,
    TransitionResult, Transport, TransportEvent, TransportFsm,
};

pub mod zoom;
pub use zoom::{ViewWindow, ZoomController};

pub mod payload;
pub use payload::{MeasureRecord, ReferenceRegion, RegionPayload, SyncData, TrackRecord};

pub mod command;
pub use command::{CommandSender, TransportCommand};

pub mod monitor;
pub use monitor::PlaybackMonitor;

mod builder;
pub use builder::SessionBuilder;

pub mod session;
pub use session::{PlayerSession, RegionStore};
