//! Rule table turning confidence and trend into advice.

use serde::{Deserialize, Serialize};

use crate::advice::Priority;
use crate::catalog::Thresholds;
use crate::confidence::{ConfidenceLevel, ConfidenceReport};
use crate::trend::{TrendDirection, TrendReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    CollectSamples,
    StandardizeProcess,
    InvestigateDecline,
    ContinueApproach,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    #[serde(rename = "type")]
    pub kind: AdvisoryKind,
    pub priority: Priority,
    pub message: String,
}

/// Combines a confidence report and a trend report into advisories.
///
/// Several rules may fire; output keeps rule order, not priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvisoryComposer {
    pub high_quality_threshold: f64,
}

impl Default for AdvisoryComposer {
    fn default() -> Self {
        Self {
            high_quality_threshold: Thresholds::default().high_quality,
        }
    }
}

impl AdvisoryComposer {
    pub fn new(high_quality_threshold: f64) -> Self {
        Self {
            high_quality_threshold,
        }
    }

    pub fn compose(&self, confidence: &ConfidenceReport, trend: &TrendReport) -> Vec<Advisory> {
        let mut out = Vec::new();

        match confidence.level {
            ConfidenceLevel::None | ConfidenceLevel::Low => out.push(Advisory {
                kind: AdvisoryKind::CollectSamples,
                priority: Priority::High,
                message: format!(
                    "Only {} score(s) on record; generate and score more revisions before trusting the average.",
                    confidence.sample_count
                ),
            }),
            ConfidenceLevel::Unstable => out.push(Advisory {
                kind: AdvisoryKind::StandardizeProcess,
                priority: Priority::Medium,
                message: format!(
                    "Scores swing widely (std dev {:.1}); standardize prompts and generation settings.",
                    confidence.std_dev
                ),
            }),
            ConfidenceLevel::Medium | ConfidenceLevel::High => {}
        }

        match trend.direction {
            TrendDirection::Declining => out.push(Advisory {
                kind: AdvisoryKind::InvestigateDecline,
                priority: Priority::High,
                message: format!(
                    "Quality is declining ({:.2} points per revision); investigate recent changes to the generation pipeline.",
                    trend.slope
                ),
            }),
            TrendDirection::Improving if confidence.average < self.high_quality_threshold => {
                out.push(Advisory {
                    kind: AdvisoryKind::ContinueApproach,
                    priority: Priority::Low,
                    message: format!(
                        "Quality is improving but the average {:.1} is still below {}; keep the current approach.",
                        confidence.average, self.high_quality_threshold
                    ),
                })
            }
            _ => {}
        }

        out
    }
}

/// [`AdvisoryComposer::compose`] with the default high-quality threshold.
pub fn advise(confidence: &ConfidenceReport, trend: &TrendReport) -> Vec<Advisory> {
    AdvisoryComposer::default().compose(confidence, trend)
}

/// Sorts advisories by priority, keeping rule order within a priority.
pub fn by_priority(mut advisories: Vec<Advisory>) -> Vec<Advisory> {
    advisories.sort_by_key(|a| a.priority);
    advisories
}
