//! Read-only playback state for other threads.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::lockfree::{AtomicDouble, AtomicFlag, AtomicIndex};
use crate::transport::MotionState;

impl MotionState {
    fn to_u8(self) -> u8 {
        match self {
            MotionState::Stopped => 0,
            MotionState::Rolling => 1,
            MotionState::DeclickToStop => 2,
            MotionState::DeclickToLocate => 3,
            MotionState::DeclickToSwitch => 4,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => MotionState::Rolling,
            2 => MotionState::DeclickToStop,
            3 => MotionState::DeclickToLocate,
            4 => MotionState::DeclickToSwitch,
            _ => MotionState::Stopped,
        }
    }
}

/// Lock-free snapshot of a session's playback state.
///
/// Clones share the same cells. The session publishes into them at the end
/// of every tick; readers never block it.
#[derive(Debug, Clone)]
pub struct PlaybackMonitor {
    times: Vec<Arc<AtomicDouble>>,
    active: Arc<AtomicIndex>,
    measure: Arc<AtomicIndex>,
    playing: Arc<AtomicFlag>,
    motion: Arc<AtomicU8>,
    load_progress: Arc<AtomicU8>,
}

impl PlaybackMonitor {
    pub(crate) fn new(times: Vec<Arc<AtomicDouble>>) -> Self {
        Self {
            times,
            active: Arc::new(AtomicIndex::new(Some(0))),
            measure: Arc::new(AtomicIndex::new(None)),
            playing: Arc::new(AtomicFlag::new(false)),
            motion: Arc::new(AtomicU8::new(MotionState::Stopped.to_u8())),
            load_progress: Arc::new(AtomicU8::new(0)),
        }
    }

    pub(crate) fn publish(
        &self,
        active: usize,
        motion: MotionState,
        measure: Option<usize>,
        load_progress: u8,
    ) {
        self.active.set(Some(active));
        self.playing.set(motion.is_rolling());
        self.motion.store(motion.to_u8(), Ordering::Release);
        self.measure.set(measure);
        self.load_progress.store(load_progress, Ordering::Release);
    }

    pub fn track_count(&self) -> usize {
        self.times.len()
    }

    /// Cursor position of `track` in its own time, 0 for unknown tracks.
    pub fn time(&self, track: usize) -> f64 {
        self.times.get(track).map_or(0.0, |t| t.get())
    }

    pub fn times(&self) -> Vec<f64> {
        self.times.iter().map(|t| t.get()).collect()
    }

    pub fn active(&self) -> usize {
        self.active.get().unwrap_or(0)
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    pub fn motion(&self) -> MotionState {
        MotionState::from_u8(self.motion.load(Ordering::Acquire))
    }

    /// Measure under the reference cursor.
    pub fn current_measure(&self) -> Option<usize> {
        self.measure.get()
    }

    /// Percentage of waveform views loaded.
    pub fn load_progress(&self) -> u8 {
        self.load_progress.load(Ordering::Acquire)
    }
}
