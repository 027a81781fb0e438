//! Penalty for generic, content-free stock phrasing.

use serde::Serialize;
use tracing::debug;

use crate::catalog::{FillerConfig, MatchPolicy};
use crate::error::CatalogError;
use crate::patterns::PatternSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillerReport {
    pub occurrences: usize,
    pub penalty: f64,
    /// Matched phrases with their counts, in catalog order.
    pub matches: Vec<(String, usize)>,
}

#[derive(Debug, Clone)]
pub struct FillerPenaltyDetector {
    patterns: PatternSet,
    per_occurrence: f64,
    cap: f64,
}

impl FillerPenaltyDetector {
    pub fn compile(config: &FillerConfig, policy: MatchPolicy) -> Result<Self, CatalogError> {
        Ok(Self {
            patterns: PatternSet::compile(&config.patterns, policy)?,
            per_occurrence: config.per_occurrence,
            cap: config.cap,
        })
    }

    pub fn cap(&self) -> f64 {
        self.cap
    }

    /// Penalty for a raw occurrence count: `min(cap, n * per_occurrence)`.
    pub fn penalty_for(&self, occurrences: usize) -> f64 {
        (occurrences as f64 * self.per_occurrence).clamp(0.0, self.cap)
    }

    pub fn detect(&self, text: &str) -> FillerReport {
        if self.patterns.is_empty() {
            return FillerReport {
                occurrences: 0,
                penalty: 0.0,
                matches: vec![],
            };
        }
        let matches = self.patterns.occurrences_by_pattern(text);
        let occurrences: usize = matches.iter().map(|(_, n)| n).sum();
        let penalty = self.penalty_for(occurrences);
        debug!(occurrences, penalty, "filler scan");
        FillerReport {
            occurrences,
            penalty,
            matches,
        }
    }
}
