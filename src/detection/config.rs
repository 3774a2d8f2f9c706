use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable thresholds for mood detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionConfig {
    /// Frames sampled per detection run
    pub sample_count: u32,

    /// Pause before each sample after the first, so every sample sees a fresh frame
    pub sample_delay_ms: u64,

    /// Average luminance (0-255) a frame must exceed
    pub lighting_threshold: f64,

    /// Strongest expression score required for a usable sample
    pub min_confidence: f64,

    /// Same-mood history entries whose activities are not suggested again
    pub recent_window: usize,
}

impl DetectionConfig {
    pub fn sample_delay(&self) -> Duration {
        Duration::from_millis(self.sample_delay_ms)
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_count: 5,
            sample_delay_ms: 300,
            lighting_threshold: 40.0,
            min_confidence: 0.4,
            recent_window: 3,
        }
    }
}
