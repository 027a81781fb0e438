//! The scoring pipeline: segment, score three axes, deduct filler, classify.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::advice::{self, Recommendation, WeakPoint};
use crate::aggregate::ScoreAggregator;
use crate::axis::{AxisResult, AxisScorer, KeywordMetrics};
use crate::catalog::{Axis, CriteriaCatalog};
use crate::error::CatalogError;
use crate::filler::{FillerPenaltyDetector, FillerReport};
use crate::segment::Document;

/// Optional caller-supplied context for one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisHint {
    #[serde(default)]
    pub keyphrase: Option<String>,
}

impl AnalysisHint {
    pub fn with_keyphrase(keyphrase: impl Into<String>) -> Self {
        Self {
            keyphrase: Some(keyphrase.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub h_score: f64,
    pub q_score: f64,
    pub c_score: f64,
    pub ai_penalty: f64,
    pub total_score: f64,
    pub weak_points: Vec<WeakPoint>,
    pub recommendations: Vec<Recommendation>,
    pub is_high_quality: bool,
    pub is_acceptable: bool,
    pub word_count: usize,
    pub paragraph_count: usize,
    pub catalog_version: String,
    /// Per-axis breakdowns in H, Q, C order.
    pub axes: Vec<AxisResult>,
    pub filler: FillerReport,
}

impl AnalysisResult {
    fn zeroed(catalog_version: &str) -> Self {
        Self {
            h_score: 0.0,
            q_score: 0.0,
            c_score: 0.0,
            ai_penalty: 0.0,
            total_score: 0.0,
            weak_points: vec![],
            recommendations: vec![],
            is_high_quality: false,
            is_acceptable: false,
            word_count: 0,
            paragraph_count: 0,
            catalog_version: catalog_version.to_string(),
            axes: Axis::SCORED.iter().map(|a| AxisResult::empty(*a)).collect(),
            filler: FillerReport {
                occurrences: 0,
                penalty: 0.0,
                matches: vec![],
            },
        }
    }

    pub fn axis(&self, axis: Axis) -> Option<&AxisResult> {
        self.axes.iter().find(|a| a.axis == axis)
    }
}

/// A validated catalog with every pattern compiled, ready to score.
///
/// Holds no mutable state; share one instance across threads freely.
#[derive(Debug, Clone)]
pub struct Analyzer {
    catalog: CriteriaCatalog,
    scorers: [AxisScorer; 3],
    filler: FillerPenaltyDetector,
    aggregator: ScoreAggregator,
}

impl Analyzer {
    pub fn new(catalog: CriteriaCatalog) -> Result<Self, CatalogError> {
        catalog.validate()?;
        let policy = catalog.match_policy;
        let scorers = [
            AxisScorer::compile(Axis::Human, catalog.criteria(Axis::Human), policy)?,
            AxisScorer::compile(Axis::Quality, catalog.criteria(Axis::Quality), policy)?,
            AxisScorer::compile(Axis::Commercial, catalog.criteria(Axis::Commercial), policy)?,
        ];
        let filler = FillerPenaltyDetector::compile(&catalog.filler, policy)?;
        let aggregator = ScoreAggregator::new(catalog.scoring);
        info!(
            version = %catalog.version,
            criteria = catalog.criteria_count(),
            filler_patterns = catalog.filler.patterns.len(),
            "analyzer ready"
        );
        Ok(Self {
            catalog,
            scorers,
            filler,
            aggregator,
        })
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(CriteriaCatalog::builtin()?)
    }

    pub fn catalog(&self) -> &CriteriaCatalog {
        &self.catalog
    }

    pub fn analyze(&self, document: &str, hint: &AnalysisHint) -> AnalysisResult {
        if document.trim().is_empty() {
            return AnalysisResult::zeroed(&self.catalog.version);
        }

        let doc = Document::parse(document);
        let keyword = KeywordMetrics::measure(&doc, hint.keyphrase.as_deref(), self.catalog.match_policy);
        debug!(
            paragraphs = doc.paragraphs.len(),
            words = doc.word_count,
            keyword_density = keyword.density,
            "document prepared"
        );

        let axes: Vec<AxisResult> = self.scorers.iter().map(|s| s.score(&doc, &keyword)).collect();
        let [h_score, q_score, c_score] = [0, 1, 2].map(|i| axes[i].score);

        let filler = self.filler.detect(&doc.plain);
        let ai_penalty = filler.penalty;
        let aggregate = self.aggregator.aggregate(h_score, q_score, c_score, ai_penalty);

        let weak_points = advice::extract_weak_points(
            &axes,
            ai_penalty,
            self.filler.cap(),
            self.catalog.filler.weak_point_min,
        );
        let recommendations = advice::recommend(&self.catalog, &weak_points);

        AnalysisResult {
            h_score,
            q_score,
            c_score,
            ai_penalty,
            total_score: aggregate.total_score,
            weak_points,
            recommendations,
            is_high_quality: aggregate.is_high_quality,
            is_acceptable: aggregate.is_acceptable,
            word_count: doc.word_count,
            paragraph_count: doc.paragraphs.len(),
            catalog_version: self.catalog.version.clone(),
            axes,
            filler,
        }
    }
}
