//! Piecewise-linear time axes.
//!
//! A track's axis samples its own timeline at a list of positions and
//! stores the reference time at each. Position `p` of a track with duration
//! `d` on an axis of `len` samples is the local time `p / len * d`. The
//! backend sends positions `0..len`; sparser position lists interpolate the
//! same way.

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct LinearAxis {
    positions: Vec<f64>,
    ref_times: Vec<f64>,
}

impl LinearAxis {
    /// `track` is only used for error reporting.
    pub fn new(track: usize, positions: Vec<f64>, ref_times: Vec<f64>) -> Result<Self> {
        if positions.len() != ref_times.len() {
            return Err(Error::AxisLengthMismatch {
                track,
                positions: positions.len(),
                ref_times: ref_times.len(),
            });
        }
        if ref_times.is_empty() {
            return Err(Error::EmptySyncTable);
        }
        Ok(Self {
            positions,
            ref_times,
        })
    }

    pub fn len(&self) -> usize {
        self.ref_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ref_times.is_empty()
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn ref_times(&self) -> &[f64] {
        &self.ref_times
    }

    /// Local time → reference time at the nearest axis position.
    pub fn to_reference(&self, time: f64, duration: f64) -> f64 {
        if duration <= 0.0 {
            return self.ref_times[0];
        }
        let position = time / duration * self.len() as f64;
        self.ref_times[self.nearest_sample(position)]
    }

    /// Reference time → local time, interpolating between axis positions.
    ///
    /// Expects positions and reference times to be non-decreasing.
    pub fn from_reference(&self, ref_time: f64, duration: f64) -> f64 {
        let len = self.len();
        let (refs, positions) = (&self.ref_times, &self.positions);
        let k = refs.partition_point(|&r| r < ref_time);

        let position = if k == 0 {
            positions[0]
        } else if k >= len {
            positions[len - 1]
        } else {
            let (lo, hi) = (refs[k - 1], refs[k]);
            let span = hi - lo;
            let t = if span > 0.0 { (ref_time - lo) / span } else { 0.0 };
            positions[k - 1] + t * (positions[k] - positions[k - 1])
        };

        (position / len as f64 * duration).clamp(0.0, duration.max(0.0))
    }

    /// Sample whose position is closest to `position`; halfway rounds up.
    fn nearest_sample(&self, position: f64) -> usize {
        let p = &self.positions;
        let k = p.partition_point(|&x| x < position);
        if k == 0 {
            0
        } else if k >= p.len() {
            p.len() - 1
        } else if position - p[k - 1] < p[k] - position {
            k - 1
        } else {
            k
        }
    }
}
