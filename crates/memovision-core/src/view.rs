//! Waveform view collaborator interface.
//!
//! The view widget owns drawing, zoom and overlays. The core only issues
//! commands to it; the authoritative region state lives in the session.

use serde::{Deserialize, Serialize};

/// Reserved id of the selection segment. At most one per track.
pub const SELECTED_REGION_ID: &str = "selectedRegion";

/// Id of the highlight drawn over a measure picked from the relevance list.
pub const RELEVANT_MEASURE_ID: &str = "relevantMeasure";

/// Time range overlay drawn on a track's waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub color: String,
}

impl Segment {
    pub fn new(id: impl Into<String>, start_time: f64, end_time: f64, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
            color: color.into(),
        }
    }

    /// Segment with the reserved selection id.
    pub fn selected_region(start_time: f64, end_time: f64, color: impl Into<String>) -> Self {
        Self::new(SELECTED_REGION_ID, start_time, end_time, color)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Half-open containment `[start, end)`.
    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }
}

/// Measure marker drawn on a track's waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurePoint {
    pub time: f64,
    pub label_text: String,
    pub color: String,
}

/// Visible window width of a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Zoom {
    Seconds(f64),
    /// Fit the whole waveform into the container.
    Auto,
}

/// Commands the core issues to a waveform view.
pub trait WaveformView: Send {
    fn set_zoom(&mut self, zoom: Zoom);
    fn set_start_time(&mut self, time: f64);
    fn enable_auto_scroll(&mut self, enabled: bool);
    /// Moves the visual cursor without touching audio.
    fn set_playhead(&mut self, time: f64);
    fn add_segment(&mut self, segment: Segment);
    fn remove_segment(&mut self, id: &str);
    fn remove_all_segments(&mut self);
    fn add_point(&mut self, point: MeasurePoint);
    fn remove_all_points(&mut self);
}

/// In-memory view that only records the state it was driven to.
///
/// Backs headless sessions (offline analysis, tests) where no widget exists.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessView {
    pub zoom: Zoom,
    pub start_time: f64,
    pub auto_scroll: bool,
    pub playhead: f64,
    pub segments: Vec<Segment>,
    pub points: Vec<MeasurePoint>,
}

impl Default for HeadlessView {
    fn default() -> Self {
        Self {
            zoom: Zoom::Auto,
            start_time: 0.0,
            auto_scroll: true,
            playhead: 0.0,
            segments: Vec::new(),
            points: Vec::new(),
        }
    }
}

impl HeadlessView {
    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }
}

impl WaveformView for HeadlessView {
    fn set_zoom(&mut self, zoom: Zoom) {
        self.zoom = zoom;
    }

    fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    fn enable_auto_scroll(&mut self, enabled: bool) {
        self.auto_scroll = enabled;
    }

    fn set_playhead(&mut self, time: f64) {
        self.playhead = time;
    }

    fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    fn remove_segment(&mut self, id: &str) {
        self.segments.retain(|s| s.id != id);
    }

    fn remove_all_segments(&mut self) {
        self.segments.clear();
    }

    fn add_point(&mut self, point: MeasurePoint) {
        self.points.push(point);
    }

    fn remove_all_points(&mut self) {
        self.points.clear();
    }
}
