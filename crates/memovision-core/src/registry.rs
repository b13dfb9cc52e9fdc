//! Track registry.
//!
//! Holds the tracks of a playback session and every index-parallel array
//! (shared time cells, playing flags, view readiness, selected regions).
//! Registering a track reserves one slot in each array, so they never fall
//! out of step.

use crate::lockfree::AtomicDouble;
use crate::view::Segment;
use crate::{Error, Result};
use std::sync::Arc;

/// Per-track flags as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackFlags {
    pub is_reference: bool,
    pub is_synced: bool,
    pub has_ground_truth_measures: bool,
    pub has_transferred_measures: bool,
}

/// A loaded recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    filename: String,
    duration: f64,
    index: usize,
    flags: TrackFlags,
}

impl Track {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn flags(&self) -> TrackFlags {
        self.flags
    }

    pub fn is_reference(&self) -> bool {
        self.flags.is_reference
    }
}

#[derive(Debug, Default)]
pub struct TrackRegistry {
    tracks: Vec<Track>,
    times: Vec<Arc<AtomicDouble>>,
    playing: Vec<bool>,
    ready: Vec<bool>,
    selections: Vec<Option<Segment>>,
    reference: Option<usize>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a track and returns its stable index.
    pub fn register(
        &mut self,
        filename: impl Into<String>,
        duration: f64,
        flags: TrackFlags,
    ) -> Result<usize> {
        let filename = filename.into();
        if self.tracks.iter().any(|t| t.filename == filename) {
            return Err(Error::DuplicateTrack(filename));
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::InvalidDuration {
                track: filename,
                duration,
            });
        }
        if flags.is_reference {
            if let Some(existing) = self.reference {
                return Err(Error::MultipleReferenceTracks {
                    first: self.tracks[existing].filename.clone(),
                    second: filename,
                });
            }
        }

        let index = self.tracks.len();
        if flags.is_reference {
            self.reference = Some(index);
        }
        self.tracks.push(Track {
            filename,
            duration,
            index,
            flags,
        });
        self.times.push(Arc::new(AtomicDouble::new(0.0)));
        self.playing.push(false);
        self.ready.push(false);
        self.selections.push(None);
        Ok(index)
    }

    pub fn index_of(&self, filename: &str) -> Result<usize> {
        self.tracks
            .iter()
            .position(|t| t.filename == filename)
            .ok_or_else(|| Error::TrackNotFound(filename.to_string()))
    }

    /// Every index except `active`, in order.
    pub fn others(&self, active: usize) -> Vec<usize> {
        (0..self.tracks.len()).filter(|&i| i != active).collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn reference_index(&self) -> Option<usize> {
        self.reference
    }

    pub fn duration(&self, index: usize) -> f64 {
        self.tracks.get(index).map_or(0.0, |t| t.duration)
    }

    pub fn set_measure_flags(&mut self, index: usize, ground_truth: bool, transferred: bool) {
        if let Some(track) = self.tracks.get_mut(index) {
            track.flags.has_ground_truth_measures = ground_truth;
            track.flags.has_transferred_measures = transferred;
        }
    }

    // --- Times ---

    pub fn time(&self, index: usize) -> f64 {
        self.times.get(index).map_or(0.0, |t| t.get())
    }

    pub fn set_time(&self, index: usize, time: f64) {
        if let Some(cell) = self.times.get(index) {
            cell.set(time);
        }
    }

    pub(crate) fn time_cells(&self) -> Vec<Arc<AtomicDouble>> {
        self.times.clone()
    }

    // --- Playing flags ---

    pub fn is_playing(&self, index: usize) -> bool {
        self.playing.get(index).copied().unwrap_or(false)
    }

    pub fn playing_flags(&self) -> &[bool] {
        &self.playing
    }

    /// Marks `index` as the only active track, or clears all with `None`.
    pub fn set_playing(&mut self, index: Option<usize>) {
        for (i, flag) in self.playing.iter_mut().enumerate() {
            *flag = Some(i) == index;
        }
    }

    // --- View readiness ---

    pub fn mark_ready(&mut self, index: usize) {
        if let Some(flag) = self.ready.get_mut(index) {
            *flag = true;
        }
    }

    pub fn all_ready(&self) -> bool {
        !self.ready.is_empty() && self.ready.iter().all(|&r| r)
    }

    /// Percentage of views ready, rounded.
    pub fn load_progress(&self) -> u8 {
        if self.ready.is_empty() {
            return 0;
        }
        let ready = self.ready.iter().filter(|&&r| r).count();
        ((ready as f64 / self.ready.len() as f64) * 100.0).round() as u8
    }

    // --- Selected regions ---

    /// The `selectedRegion` segment of a track, in its local time.
    pub fn selection(&self, index: usize) -> Option<&Segment> {
        self.selections.get(index).and_then(Option::as_ref)
    }

    pub fn set_selection(&mut self, index: usize, segment: Option<Segment>) {
        if let Some(slot) = self.selections.get_mut(index) {
            *slot = segment;
        }
    }

    pub fn has_selection(&self) -> bool {
        self.selections.iter().any(Option::is_some)
    }

    /// Length of the selected region, 0 without one.
    pub fn region_length(&self, index: usize) -> f64 {
        self.selection(index).map_or(0.0, Segment::length)
    }

    /// Longest selected region across tracks.
    pub fn longest_region(&self) -> f64 {
        (0..self.len()).map(|i| self.region_length(i)).fold(0.0, f64::max)
    }

    pub fn clear_selections(&mut self) {
        self.selections.fill(None);
    }

    /// Returns every parallel array to its initial state, keeping the tracks.
    pub fn reset_state(&mut self) {
        for cell in &self.times {
            cell.set(0.0);
        }
        self.playing.fill(false);
        self.ready.fill(false);
        self.selections.fill(None);
    }
}
