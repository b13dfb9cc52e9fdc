//! Measure boundary maps.
//!
//! Each track carries the times of its measure boundaries, with a sentinel
//! entry at both ends that is not a playable boundary. Measure `m` (0-based)
//! therefore spans `[map[m + 1], map[m + 2]]` and a map of `n` entries holds
//! `n - 2` measures.

use crate::view::MeasurePoint;
use crate::{Error, Result};

/// Slack applied when asking which measure a playing track is in, so a
/// cursor sitting on a boundary is reported in the measure it starts.
pub const BOUNDARY_TOLERANCE: f64 = 0.001;

/// Inclusive range of selected measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureSpan {
    pub start: usize,
    pub end: usize,
}

impl MeasureSpan {
    /// Builds a span, swapping the bounds if given in reverse.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn single(measure: usize) -> Self {
        Self::new(measure, measure)
    }

    /// Number of measures covered.
    pub fn measure_count(&self) -> usize {
        self.end - self.start + 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasureMap {
    boundaries: Vec<f64>,
}

impl MeasureMap {
    /// Validates that `boundaries` is non-empty and strictly increasing.
    ///
    /// `track` only labels errors.
    pub fn new(track: &str, boundaries: Vec<f64>) -> Result<Self> {
        if boundaries.is_empty() {
            return Err(Error::MissingMeasures(track.to_string()));
        }
        if let Some(index) = boundaries.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(Error::NonMonotonicMeasures {
                track: track.to_string(),
                index: index + 1,
            });
        }
        Ok(Self { boundaries })
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Number of entries including both sentinels.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn measure_count(&self) -> usize {
        self.boundaries.len().saturating_sub(2)
    }

    #[inline]
    fn at(&self, index: usize) -> f64 {
        self.boundaries[index.min(self.boundaries.len() - 1)]
    }

    /// Start time of measure `m`. Indices past the end clamp to the last entry.
    pub fn start_of(&self, m: usize) -> f64 {
        self.at(m.saturating_add(1))
    }

    /// End time of measure `m`. Indices past the end clamp to the last entry.
    pub fn end_of(&self, m: usize) -> f64 {
        self.at(m.saturating_add(2))
    }

    /// Local `[start, end]` of a measure span.
    pub fn span_times(&self, span: MeasureSpan) -> (f64, f64) {
        (self.start_of(span.start), self.end_of(span.end))
    }

    /// Measure containing `time`, or `None` before the first playable
    /// boundary. Times at or past the final boundary report the last measure.
    pub fn measure_at(&self, time: f64) -> Option<usize> {
        let count = self.measure_count();
        if count == 0 {
            return None;
        }
        let passed = self.boundaries.partition_point(|&b| b <= time);
        passed.checked_sub(2).map(|m| m.min(count - 1))
    }

    /// Playable boundaries as view markers, labelled from 1.
    pub fn markers(&self, color: &str) -> Vec<MeasurePoint> {
        let last = self.boundaries.len().saturating_sub(1);
        (1..last)
            .map(|i| MeasurePoint {
                time: self.boundaries[i],
                label_text: i.to_string(),
                color: color.to_string(),
            })
            .collect()
    }
}

/// Measure maps for every track of a session, all of equal length.
#[derive(Debug, Clone, Default)]
pub struct MeasureTable {
    maps: Vec<MeasureMap>,
}

impl MeasureTable {
    /// Builds one map per `(track name, boundaries)` entry.
    pub fn new(entries: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let mut maps = Vec::with_capacity(entries.len());
        let mut expected = None;
        for (track, boundaries) in entries {
            let map = MeasureMap::new(&track, boundaries)?;
            match expected {
                None => expected = Some(map.len()),
                Some(len) if len != map.len() => {
                    return Err(Error::MeasureCountMismatch {
                        track,
                        expected: len,
                        found: map.len(),
                    });
                }
                Some(_) => {}
            }
            maps.push(map);
        }
        Ok(Self { maps })
    }

    pub fn get(&self, track: usize) -> Option<&MeasureMap> {
        self.maps.get(track)
    }

    pub fn maps(&self) -> &[MeasureMap] {
        &self.maps
    }

    pub fn track_count(&self) -> usize {
        self.maps.len()
    }

    /// Measures per track (equal across tracks).
    pub fn measure_count(&self) -> usize {
        self.maps.first().map_or(0, MeasureMap::measure_count)
    }
}
