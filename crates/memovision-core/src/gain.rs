//! Output gain stage and clock-timed gain ramps.
//!
//! The audio engine multiplies every output sample by the value held in
//! [`OutputGain`]. Ramps are evaluated against the audio clock rather than
//! per sample, so a ramp started at clock time `t0` reads the same value no
//! matter how often the session ticks.
//!
//! # Example
//!
//! ```
//! use memovision_core::{FadeCurve, GainRamp};
//!
//! // 10 ms cubic fade-in to full volume starting at t = 2.0 s
//! let ramp = GainRamp::new(0.0, 1.0, 2.0, 0.010, FadeCurve::Cubic);
//! assert_eq!(ramp.value_at(2.0), 0.0);
//! assert!(ramp.value_at(2.005) < 0.5);
//! assert_eq!(ramp.value_at(2.020), 1.0);
//! ```

use crate::lockfree::AtomicFloat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shape of a gain ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeCurve {
    Linear,
    /// `x^3`: slow start, fast finish when rising.
    #[default]
    Cubic,
    /// Normalized exponential, steeper than cubic near silence.
    Exponential,
}

impl FadeCurve {
    const EXP_STEEPNESS: f32 = 5.0;

    /// Maps ramp progress `x` in `[0, 1]` to a gain fraction in `[0, 1]`.
    #[inline]
    pub fn shape(self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        match self {
            FadeCurve::Linear => x,
            FadeCurve::Cubic => x * x * x,
            FadeCurve::Exponential => {
                let k = Self::EXP_STEEPNESS;
                ((k * x).exp() - 1.0) / (k.exp() - 1.0)
            }
        }
    }
}

/// Shared output gain cell.
///
/// Cloning shares the cell; only the crossfader writes it.
#[derive(Debug, Clone, Default)]
pub struct OutputGain {
    value: Arc<AtomicFloat>,
}

impl OutputGain {
    pub fn new(initial: f32) -> Self {
        Self {
            value: Arc::new(AtomicFloat::new(initial)),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.get()
    }

    #[inline]
    pub(crate) fn set(&self, value: f32) {
        self.value.set(value);
    }

    /// Applies the current gain to a block of samples.
    pub fn apply(&self, buffer: &mut [f32]) {
        let gain = self.get();
        for sample in buffer.iter_mut() {
            *sample *= gain;
        }
    }
}

/// Gain ramp between two levels over a fixed clock window.
///
/// Falling ramps mirror rising ones, so a fade-out is the time reverse of the
/// matching fade-in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRamp {
    from: f32,
    to: f32,
    start: f64,
    duration: f64,
    curve: FadeCurve,
}

impl GainRamp {
    pub fn new(from: f32, to: f32, start: f64, duration: f64, curve: FadeCurve) -> Self {
        Self {
            from,
            to,
            start,
            duration: duration.max(f64::EPSILON),
            curve,
        }
    }

    /// Progress in `[0, 1]` at clock time `now`.
    #[inline]
    pub fn progress(&self, now: f64) -> f32 {
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn value_at(&self, now: f64) -> f32 {
        let p = self.progress(now);
        if p >= 1.0 {
            // Snap to target to avoid floating point drift
            return self.to;
        }
        if self.to >= self.from {
            self.from + (self.to - self.from) * self.curve.shape(p)
        } else {
            self.to + (self.from - self.to) * self.curve.shape(1.0 - p)
        }
    }

    #[inline]
    pub fn is_complete(&self, now: f64) -> bool {
        now >= self.end()
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.to
    }

    #[inline]
    pub fn is_rising(&self) -> bool {
        self.to > self.from
    }
}
