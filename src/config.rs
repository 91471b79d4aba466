//! Playback Configuration
//!
//! Tunables for the feed. Defaults can be overridden per browser with a JSON
//! object stored under `recipe-reels.config` in localStorage.

use serde::{Deserialize, Serialize};

/// localStorage key for config overrides
pub const CONFIG_STORAGE_KEY: &str = "recipe-reels.config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Window at both ends of the video used to detect loop wraparound
    pub loop_threshold_secs: f64,
    /// Period of the audio drift check
    pub drift_check_interval_ms: u32,
    /// Largest tolerated audio/video divergence before a hard seek
    pub drift_tolerance_secs: f64,
    /// Narration volume when unmuted
    pub narration_volume: f64,
    /// Root margin shrinking the observed window to its centre band
    pub intersection_root_margin: String,
    pub intersection_thresholds: Vec<f64>,
    /// Items requested from the feed store
    pub feed_limit: u32,
    /// Rotation period of loader tips
    pub tip_rotation_ms: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            loop_threshold_secs: 0.3,
            drift_check_interval_ms: 2000,
            drift_tolerance_secs: 1.0,
            narration_volume: 1.0,
            intersection_root_margin: "-45% 0px -45% 0px".to_string(),
            intersection_thresholds: vec![0.0, 0.25, 0.5, 0.75, 1.0],
            feed_limit: 20,
            tip_rotation_ms: 3500,
        }
    }
}

impl PlaybackConfig {
    /// Parse overrides, falling back to defaults on malformed input
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<PlaybackConfig>(raw) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                log::warn!("[CONFIG] ignoring malformed overrides: {}", e);
                Self::default()
            }
        }
    }

    /// Load from localStorage, defaults when absent
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(CONFIG_STORAGE_KEY).ok().flatten());
        match stored {
            Some(raw) => Self::from_json(&raw),
            None => Self::default(),
        }
    }

    /// Clamp out-of-range values back to something playable
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.loop_threshold_secs > 0.0) {
            self.loop_threshold_secs = defaults.loop_threshold_secs;
        }
        if self.drift_check_interval_ms == 0 {
            self.drift_check_interval_ms = defaults.drift_check_interval_ms;
        }
        if !(self.drift_tolerance_secs > 0.0) {
            self.drift_tolerance_secs = defaults.drift_tolerance_secs;
        }
        self.narration_volume = if self.narration_volume.is_finite() {
            self.narration_volume.clamp(0.0, 1.0)
        } else {
            defaults.narration_volume
        };
        self.intersection_thresholds.retain(|t| (0.0..=1.0).contains(t));
        if self.intersection_thresholds.is_empty() {
            self.intersection_thresholds = defaults.intersection_thresholds;
        }
        if self.feed_limit == 0 {
            self.feed_limit = defaults.feed_limit;
        }
        if self.tip_rotation_ms == 0 {
            self.tip_rotation_ms = defaults.tip_rotation_ms;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_overrides_keep_defaults() {
        let config = PlaybackConfig::from_json(r#"{"drift_tolerance_secs": 0.5, "feed_limit": 5}"#);
        assert_eq!(config.drift_tolerance_secs, 0.5);
        assert_eq!(config.feed_limit, 5);
        assert_eq!(config.drift_check_interval_ms, 2000);
        assert_eq!(config.loop_threshold_secs, 0.3);
    }

    #[test]
    fn malformed_json_falls_back() {
        assert_eq!(PlaybackConfig::from_json("{not json"), PlaybackConfig::default());
    }

    #[test]
    fn sanitized_clamps_bad_values() {
        let config = PlaybackConfig {
            loop_threshold_secs: -1.0,
            drift_check_interval_ms: 0,
            narration_volume: 4.0,
            intersection_thresholds: vec![2.0, -0.5],
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.loop_threshold_secs, 0.3);
        assert_eq!(config.drift_check_interval_ms, 2000);
        assert_eq!(config.narration_volume, 1.0);
        assert_eq!(config.intersection_thresholds, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }
}
