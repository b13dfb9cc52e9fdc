//! JSON shapes exchanged with the backend service.

use serde::{Deserialize, Serialize};

use crate::registry::TrackFlags;

/// Entry of the backend track list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub filename: String,
    pub length_sec: f64,
    #[serde(default)]
    pub reference: bool,
    /// Only synchronized tracks take part in playback.
    #[serde(default)]
    pub sync: bool,
    #[serde(default)]
    pub gt_measures: bool,
    #[serde(default)]
    pub tf_measures: bool,
}

impl TrackRecord {
    pub fn flags(&self) -> TrackFlags {
        TrackFlags {
            is_reference: self.reference,
            is_synced: self.sync,
            has_ground_truth_measures: self.gt_measures,
            has_transferred_measures: self.tf_measures,
        }
    }
}

/// Correspondence data, one entry per synchronized track in track order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncData {
    pub sync_points: Vec<Vec<f64>>,
    /// `[positions, reference times]` per track.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lin_axes: Vec<[Vec<f64>; 2]>,
}

/// Measure boundaries of one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureRecord {
    pub filename: String,
    #[serde(default)]
    pub reference: bool,
    #[serde(default)]
    pub gt_measures: Option<Vec<f64>>,
    #[serde(default)]
    pub tf_measures: Option<Vec<f64>>,
}

impl MeasureRecord {
    /// Ground-truth boundaries when present, transferred ones otherwise.
    /// Empty lists count as absent.
    pub fn preferred(&self) -> Option<&[f64]> {
        non_empty(&self.gt_measures).or_else(|| non_empty(&self.tf_measures))
    }
}

fn non_empty(measures: &Option<Vec<f64>>) -> Option<&[f64]> {
    measures.as_deref().filter(|m| !m.is_empty())
}

/// Region posted to the backend on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionPayload {
    pub start_time: f64,
    pub end_time: f64,
    pub region_name: String,
    pub length_sec: f64,
    /// `-1` when no measure selection backs the region.
    pub start_measure_idx: i64,
    pub end_measure_idx: i64,
}

/// Region picked from one of the backend's region lists, dispatched on its
/// `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReferenceRegion {
    /// Saved region, in reference-track time.
    #[serde(rename_all = "camelCase")]
    SelectedRegion {
        start_time: f64,
        end_time: f64,
        #[serde(default = "default_region_color")]
        color: String,
    },
    /// Passage where a performance departs from the reference. `region_name`
    /// is the filename of that performance.
    #[serde(rename_all = "camelCase")]
    DifferenceRegion {
        region_name: String,
        start_time: f64,
        end_time: f64,
        start_time_target: f64,
        end_time_target: f64,
        #[serde(default = "default_region_color")]
        color: String,
    },
    /// One measure ranked by the relevance analysis.
    #[serde(rename_all = "camelCase")]
    RelevantMeasure {
        measure_idx: usize,
        #[serde(default = "default_region_color")]
        color: String,
    },
}

impl ReferenceRegion {
    pub fn selected(start_time: f64, end_time: f64, color: impl Into<String>) -> Self {
        Self::SelectedRegion {
            start_time,
            end_time,
            color: color.into(),
        }
    }

    pub fn color(&self) -> &str {
        match self {
            Self::SelectedRegion { color, .. }
            | Self::DifferenceRegion { color, .. }
            | Self::RelevantMeasure { color, .. } => color,
        }
    }
}

fn default_region_color() -> String {
    "blue".into()
}
