//! Combining axis scores and the filler penalty into a total.

use serde::Serialize;

use crate::catalog::{AxisWeights, ScoringConfig, Thresholds};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateScore {
    pub total_score: f64,
    pub is_high_quality: bool,
    pub is_acceptable: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAggregator {
    pub weights: AxisWeights,
    pub thresholds: Thresholds,
}

impl ScoreAggregator {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self {
            weights: scoring.weights,
            thresholds: scoring.thresholds,
        }
    }

    /// Weighted axis sum before the penalty is deducted.
    pub fn weighted(&self, h_score: f64, q_score: f64, c_score: f64) -> f64 {
        h_score * self.weights.human + q_score * self.weights.quality + c_score * self.weights.commercial
    }

    pub fn aggregate(&self, h_score: f64, q_score: f64, c_score: f64, ai_penalty: f64) -> AggregateScore {
        let total_score = (self.weighted(h_score, q_score, c_score) - ai_penalty).max(0.0);
        AggregateScore {
            total_score,
            is_high_quality: total_score >= self.thresholds.high_quality,
            is_acceptable: total_score >= self.thresholds.acceptable,
        }
    }
}
