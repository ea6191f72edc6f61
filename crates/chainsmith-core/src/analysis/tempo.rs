//! Tempo estimation
//!
//! Thin wrapper over [`stratum_dsp::analyze_audio`]: the configured BPM range
//! is handed to the analyzer and its fractional estimate is rounded to the
//! integer stored in the `.ot` header. A non-finite or non-positive estimate
//! counts as "no tempo" rather than a valid 0 BPM.

use serde::{Deserialize, Serialize};

use super::AnalysisError;

/// Tempo search range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoConfig {
    /// Slowest tempo considered
    pub min_bpm: u32,
    /// Fastest tempo considered
    pub max_bpm: u32,
    /// Tempo written on export when none can be detected
    pub fallback_bpm: u32,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            min_bpm: 60,
            max_bpm: 180,
            fallback_bpm: 0,
        }
    }
}

impl TempoConfig {
    /// Clamp to a sane range and keep `min < max`
    pub fn validate(&mut self) {
        self.min_bpm = self.min_bpm.clamp(30, 290);
        self.max_bpm = self.max_bpm.clamp(40, 300);
        if self.min_bpm >= self.max_bpm {
            self.max_bpm = (self.min_bpm + 10).min(300);
        }
        self.fallback_bpm = self.fallback_bpm.min(300);
    }

    /// Analyzer settings for this search range
    fn analyzer_config(&self) -> stratum_dsp::AnalysisConfig {
        stratum_dsp::AnalysisConfig {
            min_bpm: self.min_bpm as f32,
            max_bpm: self.max_bpm as f32,
            ..Default::default()
        }
    }
}

/// Estimate the tempo of a mono buffer, searching `config`'s BPM range
pub fn estimate_tempo(
    samples: &[f32],
    sample_rate: u32,
    config: &TempoConfig,
) -> Result<u32, AnalysisError> {
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("sample_rate must be > 0".to_string()));
    }
    if config.min_bpm == 0 || config.min_bpm >= config.max_bpm {
        return Err(AnalysisError::InvalidInput(format!(
            "invalid BPM range {}-{}",
            config.min_bpm, config.max_bpm
        )));
    }
    if samples.is_empty() {
        return Err(AnalysisError::NoTempo);
    }

    let result = stratum_dsp::analyze_audio(samples, sample_rate, config.analyzer_config())?;

    log::debug!(
        "Tempo estimate: {:.2} BPM (confidence {:.2})",
        result.bpm,
        result.bpm_confidence
    );

    round_bpm(result.bpm).ok_or(AnalysisError::NoTempo)
}

/// Nearest integer BPM, or `None` when the estimate is unusable
fn round_bpm(bpm: f32) -> Option<u32> {
    if !bpm.is_finite() || bpm < 0.5 {
        return None;
    }
    Some(bpm.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate_default(samples: &[f32], sample_rate: u32) -> Result<u32, AnalysisError> {
        estimate_tempo(samples, sample_rate, &TempoConfig::default())
    }

    #[test]
    fn test_round_bpm() {
        assert_eq!(round_bpm(119.6), Some(120));
        assert_eq!(round_bpm(120.49), Some(120));
        assert_eq!(round_bpm(95.5), Some(96));
        assert_eq!(round_bpm(0.0), None);
        assert_eq!(round_bpm(-3.0), None);
        assert_eq!(round_bpm(f32::NAN), None);
        assert_eq!(round_bpm(f32::INFINITY), None);
    }

    #[test]
    fn test_empty_buffer_has_no_tempo() {
        assert!(matches!(estimate_default(&[], 44100), Err(AnalysisError::NoTempo)));
    }

    #[test]
    fn test_silence_is_an_error() {
        let samples = vec![0.0f32; 44100 * 5];
        assert!(estimate_default(&samples, 44100).is_err());
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(matches!(
            estimate_default(&[0.1; 1024], 0),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_range_rejected() {
        let config = TempoConfig {
            min_bpm: 150,
            max_bpm: 100,
            ..Default::default()
        };
        assert!(matches!(
            estimate_tempo(&[0.0; 100_000], 44100, &config),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_analyzer_config_carries_range() {
        let config = TempoConfig {
            min_bpm: 80,
            max_bpm: 160,
            ..Default::default()
        };
        let analyzer = config.analyzer_config();
        assert_eq!(analyzer.min_bpm, 80.0);
        assert_eq!(analyzer.max_bpm, 160.0);
    }

    #[test]
    fn test_validate_keeps_min_below_max() {
        let mut config = TempoConfig {
            min_bpm: 200,
            max_bpm: 120,
            fallback_bpm: 999,
        };
        config.validate();
        assert!(config.min_bpm < config.max_bpm);
        assert_eq!(config.fallback_bpm, 300);

        let mut config = TempoConfig {
            min_bpm: 1,
            max_bpm: 1000,
            ..Default::default()
        };
        config.validate();
        assert_eq!((config.min_bpm, config.max_bpm), (30, 300));
    }
}
