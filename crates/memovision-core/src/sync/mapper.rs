//! Cross-track time mapping.

use super::axis::LinearAxis;
use super::points::SyncPoints;
use crate::{Error, Result};

/// Converts positions between tracks through the correspondence tables.
///
/// Input times outside `[0, duration]` are clamped first, so mapping never
/// fails at run time. Mapping is not exactly invertible: a round trip lands
/// within one correspondence sample of the start.
#[derive(Debug, Clone)]
pub struct SyncMapper {
    points: SyncPoints,
    axes: Vec<LinearAxis>,
    durations: Vec<f64>,
    reference: usize,
}

impl SyncMapper {
    /// `axes` is either empty or holds one axis per track.
    pub fn new(
        points: SyncPoints,
        axes: Vec<LinearAxis>,
        durations: Vec<f64>,
        reference: usize,
    ) -> Result<Self> {
        let tracks = durations.len();
        if points.track_count() != tracks {
            return Err(Error::SyncTrackCount {
                expected: tracks,
                found: points.track_count(),
            });
        }
        if !axes.is_empty() && axes.len() != tracks {
            return Err(Error::SyncTrackCount {
                expected: tracks,
                found: axes.len(),
            });
        }
        if reference >= tracks {
            return Err(Error::NoReferenceTrack);
        }
        Ok(Self {
            points,
            axes,
            durations,
            reference,
        })
    }

    pub fn points(&self) -> &SyncPoints {
        &self.points
    }

    pub fn has_linear_axes(&self) -> bool {
        !self.axes.is_empty()
    }

    pub fn track_count(&self) -> usize {
        self.durations.len()
    }

    pub fn reference(&self) -> usize {
        self.reference
    }

    #[inline]
    fn clamp(&self, track: usize, time: f64) -> f64 {
        time.clamp(0.0, self.durations[track])
    }

    /// Correspondence index closest to `time` on `track` (after clamping).
    pub fn nearest_index(&self, track: usize, time: f64) -> usize {
        self.points.nearest_index(track, self.clamp(track, time))
    }

    /// Local time of correspondence sample `index` on `track`.
    pub fn time_at(&self, track: usize, index: usize) -> f64 {
        self.points.time(track, index.min(self.points.len() - 1))
    }

    /// Nearest-point mapping from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either track index is out of range.
    pub fn to_other_track(&self, from: usize, to: usize, time: f64) -> f64 {
        if from == to {
            return self.clamp(from, time);
        }
        let k = self.nearest_index(from, time);
        self.points.time(to, k)
    }

    /// Linear-axis mapping, finer than the nearest-point tables.
    ///
    /// Falls back to [`to_other_track`](Self::to_other_track) when no axes
    /// were loaded.
    pub fn to_other_track_linear(&self, from: usize, to: usize, time: f64) -> f64 {
        if from == to {
            return self.clamp(from, time);
        }
        if self.axes.is_empty() {
            return self.to_other_track(from, to, time);
        }

        let time = self.clamp(from, time);
        let ref_time = if from == self.reference {
            time
        } else {
            self.axes[from].to_reference(time, self.durations[from])
        };

        if to == self.reference {
            self.clamp(to, ref_time)
        } else {
            self.axes[to].from_reference(ref_time, self.durations[to])
        }
    }

    /// Mapping used for follower cursors during playback.
    #[inline]
    pub fn follower_time(&self, from: usize, to: usize, time: f64) -> f64 {
        self.to_other_track_linear(from, to, time)
    }

    pub fn to_reference(&self, from: usize, time: f64) -> f64 {
        self.to_other_track(from, self.reference, time)
    }

    pub fn from_reference(&self, to: usize, ref_time: f64) -> f64 {
        self.to_other_track(self.reference, to, ref_time)
    }
}
