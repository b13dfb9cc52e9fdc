//! Audio clock abstraction.

use crate::lockfree::AtomicDouble;
use std::sync::Arc;

/// Monotonic clock of the audio output engine, in seconds.
///
/// Gain ramps, scheduler-backed players and the playhead loop all read the
/// same clock so that fades line up with what is actually heard.
pub trait AudioClock: Send + Sync {
    fn now(&self) -> f64;
}

/// Clock advanced explicitly by its owner.
///
/// Used for headless sessions, offline stepping and deterministic tests.
/// Clones share the same time cell.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Arc<AtomicDouble>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            time: Arc::new(AtomicDouble::new(start)),
        }
    }

    /// Advances the clock by `dt` seconds and returns the new time.
    pub fn advance(&self, dt: f64) -> f64 {
        self.time.add(dt.max(0.0))
    }

    pub fn set(&self, time: f64) {
        self.time.set(time);
    }
}

impl AudioClock for ManualClock {
    fn now(&self) -> f64 {
        self.time.get()
    }
}
