//! Confidence in a score series from its size and spread.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Below this many samples confidence is `low`.
    pub min_samples: usize,
    /// Samples needed before confidence can be `high`.
    pub high_confidence_samples: usize,
    /// Standard deviation at or above which a series is `unstable`.
    pub score_variance_threshold: f64,
    /// Trailing window used for trend estimation.
    pub trend_window: usize,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            min_samples: 5,
            high_confidence_samples: 20,
            score_variance_threshold: 15.0,
            trend_window: 10,
        }
    }
}

impl ConfidenceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_samples == 0 {
            return Err(ConfigError::Invalid("min_samples must be at least 1".into()));
        }
        if self.high_confidence_samples < self.min_samples {
            return Err(ConfigError::Invalid(format!(
                "high_confidence_samples ({}) must be >= min_samples ({})",
                self.high_confidence_samples, self.min_samples
            )));
        }
        if !self.score_variance_threshold.is_finite() || self.score_variance_threshold <= 0.0 {
            return Err(ConfigError::Invalid(
                "score_variance_threshold must be positive".into(),
            ));
        }
        if self.trend_window < 3 {
            return Err(ConfigError::Invalid("trend_window must be at least 3".into()));
        }
        Ok(())
    }
}

/// Process-wide confidence settings with snapshot reads.
///
/// Readers take a cheap `Arc` snapshot and never observe a half-applied
/// update; writers replace the whole value after validating it.
#[derive(Debug, Clone, Default)]
pub struct SharedConfidenceConfig {
    inner: Arc<RwLock<Arc<ConfidenceConfig>>>,
}

impl SharedConfidenceConfig {
    pub fn new(config: ConfidenceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(Arc::new(config))),
        })
    }

    pub fn snapshot(&self) -> Arc<ConfidenceConfig> {
        Arc::clone(&self.inner.read())
    }

    pub fn update(&self, config: ConfidenceConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self.inner.write() = Arc::new(config);
        info!(?config, "confidence configuration updated");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    None,
    Low,
    Medium,
    High,
    Unstable,
}

impl ConfidenceLevel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unstable => "unstable",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceReport {
    pub level: ConfidenceLevel,
    pub percentage: f64,
    pub reason: String,
    pub sample_count: usize,
    pub average: f64,
    pub std_dev: f64,
}

/// Mean and population standard deviation.
fn mean_and_std_dev(scores: &[f64]) -> (f64, f64) {
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

pub fn estimate_confidence(scores: &[f64], config: &ConfidenceConfig) -> ConfidenceReport {
    let count = scores.len();
    if count == 0 {
        return ConfidenceReport {
            level: ConfidenceLevel::None,
            percentage: 0.0,
            reason: "no scores recorded yet".to_string(),
            sample_count: 0,
            average: 0.0,
            std_dev: 0.0,
        };
    }

    let (average, std_dev) = mean_and_std_dev(scores);
    let threshold = config.score_variance_threshold;
    let n = count as f64;

    let (level, percentage, reason) = if count < config.min_samples {
        (
            ConfidenceLevel::Low,
            (50.0 * n / config.min_samples as f64).min(50.0),
            format!(
                "only {count} of the {} samples needed for a reliable average",
                config.min_samples
            ),
        )
    } else if count >= config.high_confidence_samples && std_dev < threshold {
        (
            ConfidenceLevel::High,
            (80.0 + (n - config.high_confidence_samples as f64) / 2.0).min(100.0),
            format!("{count} samples with low variance (std dev {std_dev:.1} < {threshold})"),
        )
    } else if std_dev < threshold {
        (
            ConfidenceLevel::Medium,
            50.0 + (30.0 * n / config.high_confidence_samples as f64).min(30.0),
            format!(
                "variance is low (std dev {std_dev:.1}) but {count} samples is below the {} needed for high confidence",
                config.high_confidence_samples
            ),
        )
    } else {
        (
            ConfidenceLevel::Unstable,
            (60.0 - std_dev).max(30.0),
            format!("scores vary widely (std dev {std_dev:.1} >= {threshold})"),
        )
    };

    ConfidenceReport {
        level,
        percentage,
        reason,
        sample_count: count,
        average,
        std_dev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ConfidenceConfig {
        ConfidenceConfig::default()
    }

    #[test]
    fn empty_series_has_no_confidence() {
        let report = estimate_confidence(&[], &cfg());
        assert_eq!(report.level, ConfidenceLevel::None);
        assert_eq!(report.percentage, 0.0);
        assert_eq!(report.sample_count, 0);
    }

    #[test]
    fn few_samples_are_low() {
        let report = estimate_confidence(&[70.0; 3], &cfg());
        assert_eq!(report.level, ConfidenceLevel::Low);
        assert_eq!(report.percentage, 30.0);
        assert_eq!(report.average, 70.0);
        assert_eq!(report.std_dev, 0.0);
    }

    #[test]
    fn many_stable_samples_are_high() {
        let scores: Vec<f64> = (0..24).map(|i| 70.0 + (i % 3) as f64).collect();
        let report = estimate_confidence(&scores, &cfg());
        assert_eq!(report.level, ConfidenceLevel::High);
        assert_eq!(report.percentage, 82.0);
    }

    #[test]
    fn high_percentage_is_capped() {
        let report = estimate_confidence(&[60.0; 100], &cfg());
        assert_eq!(report.level, ConfidenceLevel::High);
        assert_eq!(report.percentage, 100.0);
    }

    #[test]
    fn moderate_stable_samples_are_medium() {
        let report = estimate_confidence(&[60.0, 62.0, 61.0, 59.0, 60.0, 61.0, 60.0, 62.0, 58.0, 60.0], &cfg());
        assert_eq!(report.level, ConfidenceLevel::Medium);
        assert_eq!(report.percentage, 65.0);
    }

    #[test]
    fn wide_spread_is_unstable() {
        let report = estimate_confidence(&[10.0, 90.0, 10.0, 90.0, 10.0, 90.0], &cfg());
        assert_eq!(report.level, ConfidenceLevel::Unstable);
        assert_eq!(report.std_dev, 40.0);
        assert_eq!(report.percentage, 30.0);
    }

    #[test]
    fn unstable_percentage_tracks_spread() {
        let report = estimate_confidence(&[40.0, 80.0, 40.0, 80.0, 40.0, 80.0], &cfg());
        assert_eq!(report.std_dev, 20.0);
        assert_eq!(report.percentage, 40.0);
    }

    #[test]
    fn thresholds_come_from_config() {
        let strict = ConfidenceConfig {
            min_samples: 2,
            high_confidence_samples: 3,
            score_variance_threshold: 1.0,
            trend_window: 5,
        };
        let report = estimate_confidence(&[50.0, 50.0, 50.0], &strict);
        assert_eq!(report.level, ConfidenceLevel::High);
    }

    #[test]
    fn config_validation() {
        assert!(cfg().validate().is_ok());
        let bad = ConfidenceConfig {
            min_samples: 0,
            ..cfg()
        };
        assert!(bad.validate().is_err());
        let inverted = ConfidenceConfig {
            min_samples: 30,
            ..cfg()
        };
        assert!(inverted.validate().is_err());
        let short_window = ConfidenceConfig {
            trend_window: 2,
            ..cfg()
        };
        assert!(short_window.validate().is_err());
    }

    #[test]
    fn shared_config_snapshots_survive_updates() {
        let shared = SharedConfidenceConfig::new(cfg()).unwrap();
        let before = shared.snapshot();
        shared
            .update(ConfidenceConfig {
                min_samples: 8,
                ..cfg()
            })
            .unwrap();
        assert_eq!(before.min_samples, 5);
        assert_eq!(shared.snapshot().min_samples, 8);
        assert!(shared
            .update(ConfidenceConfig {
                score_variance_threshold: 0.0,
                ..cfg()
            })
            .is_err());
        assert_eq!(shared.snapshot().min_samples, 8);
    }
}
