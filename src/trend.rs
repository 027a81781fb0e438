//! Linear trend of a time-ordered score series.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Slopes beyond this magnitude (points per sample) count as movement.
pub const SLOPE_THRESHOLD: f64 = 1.0;

/// Fewer trailing samples than this cannot produce a trend.
pub const MIN_TREND_SAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
    Unknown,
}

impl TrendDirection {
    pub fn from_slope(slope: f64) -> Self {
        if slope > SLOPE_THRESHOLD {
            Self::Improving
        } else if slope < -SLOPE_THRESHOLD {
            Self::Declining
        } else {
            Self::Stable
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub direction: TrendDirection,
    pub slope: f64,
    pub strength: f64,
    pub message: String,
    pub window_size: usize,
}

/// Ordinary least-squares slope of `ys` against `0..n`.
///
/// Returns 0 for fewer than two points.
pub fn least_squares_slope(ys: &[f64]) -> f64 {
    let n = ys.len() as f64;
    if ys.len() < 2 {
        return 0.0;
    }
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, y) in ys.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }
    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}

/// Trend over the trailing `window` samples of an oldest-first series.
pub fn estimate_trend(scores: &[f64], window: usize) -> TrendReport {
    let start = scores.len().saturating_sub(window);
    let recent = &scores[start..];
    let window_size = recent.len();

    if window_size < MIN_TREND_SAMPLES {
        return TrendReport {
            direction: TrendDirection::Unknown,
            slope: 0.0,
            strength: 0.0,
            message: format!(
                "{window_size} samples; at least {MIN_TREND_SAMPLES} are needed to estimate a trend"
            ),
            window_size,
        };
    }

    let slope = least_squares_slope(recent);
    let direction = TrendDirection::from_slope(slope);
    let message = match direction {
        TrendDirection::Improving => {
            format!("scores rising by {slope:.2} points per revision over the last {window_size}")
        }
        TrendDirection::Declining => format!(
            "scores falling by {:.2} points per revision over the last {window_size}",
            slope.abs()
        ),
        _ => format!("scores steady over the last {window_size} (slope {slope:.2})"),
    };

    TrendReport {
        direction,
        slope,
        strength: slope.abs(),
        message,
        window_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_series_is_improving() {
        let report = estimate_trend(&[10.0, 20.0, 30.0, 40.0, 50.0], 10);
        assert_eq!(report.direction, TrendDirection::Improving);
        assert!((report.slope - 10.0).abs() < 1e-9);
        assert!((report.strength - 10.0).abs() < 1e-9);
        assert_eq!(report.window_size, 5);
    }

    #[test]
    fn falling_series_is_declining() {
        let report = estimate_trend(&[50.0, 40.0, 30.0, 20.0, 10.0], 10);
        assert_eq!(report.direction, TrendDirection::Declining);
        assert!((report.slope + 10.0).abs() < 1e-9);
        assert!((report.strength - 10.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_is_stable() {
        let report = estimate_trend(&[30.0, 31.0, 29.0, 30.0, 30.0], 10);
        assert_eq!(report.direction, TrendDirection::Stable);
        assert!(report.slope.abs() <= SLOPE_THRESHOLD);
    }

    #[test]
    fn short_series_is_unknown() {
        for scores in [&[][..], &[50.0][..], &[50.0, 60.0][..]] {
            let report = estimate_trend(scores, 10);
            assert_eq!(report.direction, TrendDirection::Unknown);
            assert_eq!(report.slope, 0.0);
        }
    }

    #[test]
    fn only_trailing_window_counts() {
        // an early collapse followed by a steady climb
        let mut scores = vec![90.0, 10.0, 5.0];
        scores.extend([20.0, 22.0, 24.0, 26.0, 28.0]);
        let report = estimate_trend(&scores, 5);
        assert_eq!(report.window_size, 5);
        assert_eq!(report.direction, TrendDirection::Improving);
        assert!((report.slope - 2.0).abs() < 1e-9);
    }

    #[test]
    fn slope_of_constant_series_is_zero() {
        assert_eq!(least_squares_slope(&[7.0, 7.0, 7.0, 7.0]), 0.0);
    }
}
