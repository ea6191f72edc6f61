//! Application settings
//!
//! Stored as YAML in the platform config directory:
//! `~/.config/chainsmith/config.yaml` on Linux. The file is created with the
//! defaults on first start so it can be edited by hand.
//!
//! ```yaml
//! view:
//!   default_samples_per_pixel: 256
//!   zoom_in_factor: 1.2
//!   zoom_out_factor: 0.83
//! analysis:
//!   min_bpm: 60
//!   max_bpm: 180
//!   fallback_bpm: 0
//! audio:
//!   device: null
//! ```

mod io;

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::analysis::TempoConfig;
use crate::audio::AudioConfig;

use io::{load_or_default, write_yaml};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Waveform view behaviour
    pub view: ViewConfig,
    /// Tempo estimation range used on export
    pub analysis: TempoConfig,
    /// Preview output device
    pub audio: AudioConfig,
}

impl Config {
    /// Clamp every section to usable values
    pub fn validate(&mut self) {
        self.view.validate();
        self.analysis.validate();
    }
}

/// Waveform view configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Zoom level applied when a buffer is attached
    pub default_samples_per_pixel: usize,
    /// Factor for "Zoom In" and modifier+wheel up (> 1)
    pub zoom_in_factor: f64,
    /// Factor for "Zoom Out" and modifier+wheel down (< 1)
    pub zoom_out_factor: f64,
    /// Fraction of the visible width scrolled per wheel line
    pub scroll_step_fraction: f64,
    /// Zoom factor per pixel of pinch gesture delta
    pub pinch_sensitivity: f64,
    /// Maximum number of cached peak envelopes
    pub envelope_cache_capacity: usize,
    /// Playhead polling interval while playing
    pub tick_interval_ms: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_samples_per_pixel: 256,
            zoom_in_factor: 1.2,
            zoom_out_factor: 0.83,
            scroll_step_fraction: 0.1,
            pinch_sensitivity: 0.01,
            envelope_cache_capacity: 64,
            tick_interval_ms: 30,
        }
    }
}

impl ViewConfig {
    /// Replace out-of-range values with defaults or clamp them
    pub fn validate(&mut self) {
        let defaults = Self::default();

        self.default_samples_per_pixel = self.default_samples_per_pixel.max(1);
        if !(self.zoom_in_factor.is_finite() && self.zoom_in_factor > 1.0) {
            self.zoom_in_factor = defaults.zoom_in_factor;
        }
        if !(self.zoom_out_factor.is_finite()
            && self.zoom_out_factor > 0.0
            && self.zoom_out_factor < 1.0)
        {
            self.zoom_out_factor = defaults.zoom_out_factor;
        }
        if !(self.scroll_step_fraction.is_finite() && self.scroll_step_fraction > 0.0) {
            self.scroll_step_fraction = defaults.scroll_step_fraction;
        }
        self.scroll_step_fraction = self.scroll_step_fraction.min(1.0);
        if !(self.pinch_sensitivity.is_finite() && self.pinch_sensitivity > 0.0) {
            self.pinch_sensitivity = defaults.pinch_sensitivity;
        }
        self.envelope_cache_capacity = self.envelope_cache_capacity.max(1);
        self.tick_interval_ms = self.tick_interval_ms.clamp(5, 1000);
    }
}

/// Default config file path
///
/// Returns `<config dir>/chainsmith/config.yaml`, or `./config.yaml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("chainsmith").join("config.yaml"))
        .unwrap_or_else(|| PathBuf::from("config.yaml"))
}

/// Load and validate the configuration (defaults when missing or invalid)
///
/// A missing file is written out with the defaults.
pub fn load_config(path: &Path) -> Config {
    let existed = path.exists();
    let mut config: Config = load_or_default(path);
    config.validate();
    log::info!(
        "load_config: default zoom {} spp, BPM range {}-{}",
        config.view.default_samples_per_pixel,
        config.analysis.min_bpm,
        config.analysis.max_bpm
    );

    if !existed {
        if let Err(e) = save_config(&config, path) {
            log::warn!("load_config: could not write defaults: {:#}", e);
        }
    }
    config
}

/// Save the configuration
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    write_yaml(config, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.view.default_samples_per_pixel, 256);
        assert_eq!(config.view.envelope_cache_capacity, 64);
        assert_eq!(config.view.tick_interval_ms, 30);
        assert_eq!(config.analysis.min_bpm, 60);
        assert_eq!(config.analysis.max_bpm, 180);
        assert!(config.audio.device.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "view:\n  zoom_in_factor: 2.0\nanalysis:\n  max_bpm: 200\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.view.zoom_in_factor, 2.0);
        assert_eq!(config.view.zoom_out_factor, 0.83);
        assert_eq!(config.analysis.min_bpm, 60);
        assert_eq!(config.analysis.max_bpm, 200);
    }

    #[test]
    fn test_view_validation() {
        let mut view = ViewConfig {
            default_samples_per_pixel: 0,
            zoom_in_factor: 0.5,
            zoom_out_factor: 1.5,
            scroll_step_fraction: f64::NAN,
            pinch_sensitivity: -1.0,
            envelope_cache_capacity: 0,
            tick_interval_ms: 0,
        };
        view.validate();

        let defaults = ViewConfig::default();
        assert_eq!(view.default_samples_per_pixel, 1);
        assert_eq!(view.zoom_in_factor, defaults.zoom_in_factor);
        assert_eq!(view.zoom_out_factor, defaults.zoom_out_factor);
        assert_eq!(view.scroll_step_fraction, defaults.scroll_step_fraction);
        assert_eq!(view.pinch_sensitivity, defaults.pinch_sensitivity);
        assert_eq!(view.envelope_cache_capacity, 1);
        assert_eq!(view.tick_interval_ms, 5);
    }

    #[test]
    fn test_roundtrip_with_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chainsmith").join("config.yaml");

        let mut config = Config::default();
        config.analysis.min_bpm = 170;
        config.analysis.max_bpm = 100;
        config.audio.device = Some("pulse".to_string());
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path);
        assert!(loaded.analysis.min_bpm < loaded.analysis.max_bpm);
        assert_eq!(loaded.audio.device.as_deref(), Some("pulse"));
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chainsmith").join("config.yaml");

        let config = load_config(&path);
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let written: Config = serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, Config::default());
    }

    #[test]
    fn test_existing_invalid_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "view: [broken").unwrap();

        let config = load_config(&path);
        assert_eq!(config, Config::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "view: [broken");
    }

    #[test]
    fn test_default_path_file_name() {
        assert!(default_config_path().ends_with("config.yaml"));
    }
}
