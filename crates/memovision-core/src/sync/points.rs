//! Nearest-point correspondence tables.

use crate::{Error, Result};

/// Per-track correspondence samples, aligned index for index.
///
/// Index `k` denotes the same musical instant on every track.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPoints {
    tables: Vec<Vec<f64>>,
}

impl SyncPoints {
    /// Validates that every table has the same, non-zero length.
    pub fn new(tables: Vec<Vec<f64>>) -> Result<Self> {
        let expected = tables.first().map(Vec::len).ok_or(Error::EmptySyncTable)?;
        if expected == 0 {
            return Err(Error::EmptySyncTable);
        }
        if let Some((track, table)) = tables
            .iter()
            .enumerate()
            .find(|(_, t)| t.len() != expected)
        {
            return Err(Error::SyncLengthMismatch {
                track,
                expected,
                found: table.len(),
            });
        }
        Ok(Self { tables })
    }

    pub fn track_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of correspondence samples per track.
    pub fn len(&self) -> usize {
        self.tables[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn table(&self, track: usize) -> &[f64] {
        &self.tables[track]
    }

    #[inline]
    pub fn time(&self, track: usize, index: usize) -> f64 {
        self.tables[track][index]
    }

    /// Index of the sample closest to `time` on `track`.
    ///
    /// Linear scan; exact ties resolve to the lowest index.
    ///
    /// # Panics
    ///
    /// Panics if `track` is out of range.
    pub fn nearest_index(&self, track: usize, time: f64) -> usize {
        let table = &self.tables[track];
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (k, &t) in table.iter().enumerate() {
            let dist = (t - time).abs();
            if dist < best_dist {
                best = k;
                best_dist = dist;
            }
        }
        best
    }
}
