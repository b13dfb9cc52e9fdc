//! Lock-free cells shared between the session thread and readers.
//!
//! The session mutates playback state through `&mut self` on one thread; the
//! audio engine (output gain), UI threads (monitor) and clock drivers only
//! ever read or store single values through these cells.

use atomic_float::{AtomicF32, AtomicF64};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

/// Cache-line aligned atomic f32 (gain values).
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFloat {
    value: AtomicF32,
}

impl AtomicFloat {
    pub fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.value.store(value, Ordering::Release);
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Cache-line aligned atomic f64 (times in seconds).
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicDouble {
    value: AtomicF64,
}

impl AtomicDouble {
    pub fn new(value: f64) -> Self {
        Self {
            value: AtomicF64::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.value.store(value, Ordering::Release);
    }

    /// Adds `delta` and returns the new value.
    #[inline]
    pub fn add(&self, delta: f64) -> f64 {
        self.value.fetch_add(delta, Ordering::AcqRel) + delta
    }
}

impl Default for AtomicDouble {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Cache-line aligned atomic bool.
#[derive(Debug, Default)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }
}

/// Atomic optional index. `None` is stored as a negative sentinel.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicIndex {
    value: AtomicI64,
}

impl AtomicIndex {
    pub fn new(value: Option<usize>) -> Self {
        Self {
            value: AtomicI64::new(Self::encode(value)),
        }
    }

    #[inline]
    fn encode(value: Option<usize>) -> i64 {
        value.map_or(-1, |v| v as i64)
    }

    #[inline]
    pub fn get(&self) -> Option<usize> {
        let raw = self.value.load(Ordering::Acquire);
        (raw >= 0).then_some(raw as usize)
    }

    #[inline]
    pub fn set(&self, value: Option<usize>) {
        self.value.store(Self::encode(value), Ordering::Release);
    }
}

impl Default for AtomicIndex {
    fn default() -> Self {
        Self::new(None)
    }
}
