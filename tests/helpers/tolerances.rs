//! Tolerance constants for playback testing.

/// Floating point rounding errors on gain values.
pub const GAIN_EPSILON: f32 = 1e-6;

/// Times compared after arithmetic on the clock.
pub const TIME_EPSILON: f64 = 1e-9;

/// One host tick; positions read after a tick may lag by this much.
pub const TICK_TOLERANCE: f64 = 1.0 / super::TICK_HZ + 1e-9;
