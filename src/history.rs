//! Read access to per-entity score history and the combined assessment.
//!
//! Storage belongs to the host application. This module only defines the
//! read interface it must offer, plus a small in-memory implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::advisory::{Advisory, AdvisoryComposer};
use crate::confidence::{estimate_confidence, ConfidenceConfig, ConfidenceReport};
use crate::trend::{estimate_trend, TrendReport};

/// Time-ordered (oldest first) total scores keyed by entity id.
pub trait ScoreHistory {
    fn scores(&self, entity_id: &str) -> Vec<f64>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryHistory {
    series: HashMap<String, Vec<f64>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entity_id: impl Into<String>, total_score: f64) {
        self.series.entry(entity_id.into()).or_default().push(total_score);
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

impl ScoreHistory for InMemoryHistory {
    fn scores(&self, entity_id: &str) -> Vec<f64> {
        self.series.get(entity_id).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisoryReport {
    pub entity_id: String,
    pub confidence: ConfidenceReport,
    pub trend: TrendReport,
    pub advisories: Vec<Advisory>,
}

/// Confidence, trend and advisories for one series.
pub fn assess_series(
    entity_id: &str,
    scores: &[f64],
    config: &ConfidenceConfig,
    composer: &AdvisoryComposer,
) -> AdvisoryReport {
    let confidence = estimate_confidence(scores, config);
    let trend = estimate_trend(scores, config.trend_window);
    let advisories = composer.compose(&confidence, &trend);
    AdvisoryReport {
        entity_id: entity_id.to_string(),
        confidence,
        trend,
        advisories,
    }
}

pub fn assess<H: ScoreHistory + ?Sized>(
    history: &H,
    entity_id: &str,
    config: &ConfidenceConfig,
    composer: &AdvisoryComposer,
) -> AdvisoryReport {
    assess_series(entity_id, &history.scores(entity_id), config, composer)
}
