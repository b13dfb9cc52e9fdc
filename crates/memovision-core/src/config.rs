//! Player session configuration.

use crate::gain::FadeCurve;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a [`PlayerSession`](crate::PlayerSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Length of the declick ramps around seeks, pauses and switches.
    pub fade_secs: f64,
    pub fade_curve: FadeCurve,
    /// Target rate of the playhead loop while rolling.
    pub frame_rate_hz: f64,
    pub initial_volume: f32,
    /// Extra seconds added to the longest region when zooming.
    pub zoom_padding_secs: f64,
    /// Extra seconds added to a track's duration for the full view.
    pub full_view_padding_secs: f64,
    pub zooming_enabled: bool,
    pub region_color: String,
    pub marker_color: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            fade_secs: 0.01,
            fade_curve: FadeCurve::Cubic,
            frame_rate_hz: 30.0,
            initial_volume: 1.0,
            zoom_padding_secs: 1.0,
            full_view_padding_secs: 0.01,
            zooming_enabled: true,
            region_color: "blue".into(),
            marker_color: "rgb(0, 0, 200)".into(),
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.fade_secs > 0.0 && self.fade_secs <= 0.5) {
            return Err(Error::InvalidConfig(format!(
                "fade_secs {} out of range (0-0.5 s)",
                self.fade_secs
            )));
        }
        if !(self.frame_rate_hz >= 1.0 && self.frame_rate_hz <= 240.0) {
            return Err(Error::InvalidConfig(format!(
                "frame_rate_hz {} out of range (1-240 Hz)",
                self.frame_rate_hz
            )));
        }
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(Error::InvalidConfig(format!(
                "initial_volume {} out of range (0-1)",
                self.initial_volume
            )));
        }
        if self.zoom_padding_secs < 0.0 || self.full_view_padding_secs < 0.0 {
            return Err(Error::InvalidConfig("zoom padding must be non-negative".into()));
        }
        Ok(())
    }

    /// Seconds between two playhead frames.
    pub fn frame_interval(&self) -> f64 {
        1.0 / self.frame_rate_hz
    }
}
