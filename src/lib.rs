//! Deterministic quality scoring for generated articles.
//!
//! A document is rated on three independent axes (human voice, quality of
//! description, commercial/structural completeness) using a weighted
//! checklist from a versioned [`CriteriaCatalog`], penalised for stock
//! filler phrasing, and classified against two thresholds. Separately, a
//! series of historical total scores can be assessed for confidence and
//! trend.
//!
//! ```
//! use content_grade::{analyze, AnalysisHint};
//!
//! let result = analyze("<p>I loved the quiet garden at sunset.</p>", &AnalysisHint::default());
//! assert!(result.total_score >= 0.0 && result.total_score <= 100.0);
//! ```
//!
//! ```
//! use content_grade::{advise, estimate_confidence, estimate_trend, ConfidenceConfig, TrendDirection};
//!
//! let history = [52.0, 58.0, 63.0, 70.0, 74.0];
//! let config = ConfidenceConfig::default();
//! let confidence = estimate_confidence(&history, &config);
//! let trend = estimate_trend(&history, config.trend_window);
//! assert_eq!(trend.direction, TrendDirection::Improving);
//! assert!(!advise(&confidence, &trend).is_empty());
//! ```

pub mod advice;
pub mod advisory;
pub mod aggregate;
pub mod analyzer;
pub mod axis;
pub mod catalog;
pub mod config;
pub mod confidence;
pub mod error;
pub mod filler;
pub mod history;
pub mod logging;
pub mod patterns;
pub mod segment;
pub mod trend;

use once_cell::sync::Lazy;

pub use advice::{Priority, Recommendation, WeakPoint};
pub use advisory::{advise, Advisory, AdvisoryComposer, AdvisoryKind};
pub use aggregate::ScoreAggregator;
pub use analyzer::{AnalysisHint, AnalysisResult, Analyzer};
pub use axis::{AxisResult, CriterionScore, RawMetric};
pub use catalog::{Axis, CriteriaCatalog, CriterionDefinition, MatchPolicy};
pub use config::EngineConfig;
pub use confidence::{
    estimate_confidence, ConfidenceConfig, ConfidenceLevel, ConfidenceReport,
    SharedConfidenceConfig,
};
pub use error::{CatalogError, ConfigError};
pub use history::{assess, AdvisoryReport, InMemoryHistory, ScoreHistory};
pub use trend::{estimate_trend, TrendDirection, TrendReport};

static DEFAULT_ANALYZER: Lazy<Analyzer> =
    Lazy::new(|| Analyzer::builtin().expect("built-in catalog is valid"));

/// Scores `document` with the built-in catalog.
pub fn analyze(document: &str, hint: &AnalysisHint) -> AnalysisResult {
    DEFAULT_ANALYZER.analyze(document, hint)
}

/// The analyzer behind [`analyze`].
pub fn default_analyzer() -> &'static Analyzer {
    &DEFAULT_ANALYZER
}
