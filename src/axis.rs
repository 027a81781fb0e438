//! Per-axis criterion scoring.
//!
//! Each axis is a list of weighted criteria taken from the catalog. A
//! criterion produces a ratio in `[0, 1]` from the evidence it measures and
//! scores `weight * ratio`. The axis score is the capped sum.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{Axis, Counting, CriterionDefinition, CriterionRule, Ideal, MatchPolicy, Metric};
use crate::error::CatalogError;
use crate::patterns::PatternSet;
use crate::segment::Document;

pub const AXIS_CAP: f64 = 100.0;

/// Share of a breadth score carried by paragraph presence; the rest comes
/// from distinct-pattern diversity.
const PARAGRAPH_SHARE: f64 = 0.6;
const UNIQUE_SHARE: f64 = 0.4;
/// Fraction of a pattern list that must appear for full diversity credit.
const UNIQUE_TARGET_FRACTION: f64 = 0.5;

/// How many leading characters count as the introduction.
pub const INTRO_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawMetric {
    Breadth {
        paragraphs: usize,
        unique_patterns: usize,
        paragraph_ratio: f64,
        unique_ratio: f64,
    },
    Occurrences {
        occurrences: usize,
    },
    Categories {
        qualified: usize,
        occurrences: BTreeMap<String, usize>,
    },
    Numeric {
        observed: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionScore {
    pub criterion_id: String,
    pub raw_metric: RawMetric,
    pub score: f64,
    pub max: f64,
}

impl CriterionScore {
    /// Achieved share of the maximum.
    pub fn ratio(&self) -> f64 {
        if self.max > 0.0 {
            self.score / self.max
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisResult {
    pub axis: Axis,
    pub score: f64,
    /// Uncapped per-criterion scores, even when `score` hit the cap.
    pub details: BTreeMap<String, CriterionScore>,
}

impl AxisResult {
    pub fn empty(axis: Axis) -> Self {
        Self {
            axis,
            score: 0.0,
            details: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ratio helpers
// ---------------------------------------------------------------------------

fn capped_ratio(observed: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (observed / target).clamp(0.0, 1.0)
}

/// Full credit inside `[min, max]`, proportional credit below, linear
/// decay above down to `floor`.
pub fn band_ratio(observed: f64, min: f64, max: f64, floor: f64) -> f64 {
    if observed < min {
        capped_ratio(observed, min)
    } else if observed <= max {
        1.0
    } else {
        (1.0 - (observed - max) / max).max(floor).clamp(0.0, 1.0)
    }
}

pub fn target_ratio(observed: f64, count: f64) -> f64 {
    capped_ratio(observed, count)
}

// ---------------------------------------------------------------------------
// Keyword measurements
// ---------------------------------------------------------------------------

/// Keyphrase-dependent metrics, measured once per document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeywordMetrics {
    /// Percent of words taken up by the keyphrase.
    pub density: f64,
    pub in_intro: bool,
}

impl KeywordMetrics {
    pub fn measure(doc: &Document, keyphrase: Option<&str>, policy: MatchPolicy) -> Self {
        let Some(keyphrase) = keyphrase.map(str::trim).filter(|k| !k.is_empty()) else {
            return Self::default();
        };
        let set = match PatternSet::compile(&[keyphrase], policy) {
            Ok(set) => set,
            Err(err) => {
                warn!(%err, "keyphrase could not be compiled; keyword metrics skipped");
                return Self::default();
            }
        };

        let density = if doc.word_count > 0 {
            let occurrences = set.count_total_occurrences(&doc.plain) as f64;
            let phrase_words = keyphrase.split_whitespace().count().max(1) as f64;
            occurrences * phrase_words / doc.word_count as f64 * 100.0
        } else {
            0.0
        };

        Self {
            density,
            in_intro: set.is_match(doc.intro(INTRO_CHARS)),
        }
    }
}

// ---------------------------------------------------------------------------
// Compiled criteria
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct CompiledCategory {
    id: String,
    patterns: PatternSet,
    min_occurrences: usize,
}

#[derive(Debug, Clone)]
enum CompiledRule {
    Breadth {
        patterns: PatternSet,
        min_count: f64,
    },
    Occurrences {
        patterns: PatternSet,
        min_count: f64,
    },
    Categories {
        categories: Vec<CompiledCategory>,
        min_categories: f64,
    },
    Numeric {
        metric: Metric,
        ideal: Ideal,
    },
}

#[derive(Debug, Clone)]
struct CompiledCriterion {
    id: String,
    weight: f64,
    rule: CompiledRule,
}

impl CompiledCriterion {
    fn compile(def: &CriterionDefinition, policy: MatchPolicy) -> Result<Self, CatalogError> {
        let rule = match &def.rule {
            CriterionRule::PatternList {
                patterns,
                min_count,
                counting,
            } => {
                let patterns = PatternSet::compile(patterns, policy)?;
                let min_count = f64::from(*min_count);
                match counting {
                    Counting::Breadth => CompiledRule::Breadth {
                        patterns,
                        min_count,
                    },
                    Counting::Occurrences => CompiledRule::Occurrences {
                        patterns,
                        min_count,
                    },
                }
            }
            CriterionRule::CategoryGroup {
                categories,
                min_categories,
            } => CompiledRule::Categories {
                categories: categories
                    .iter()
                    .map(|c| {
                        Ok(CompiledCategory {
                            id: c.id.clone(),
                            patterns: PatternSet::compile(&c.patterns, policy)?,
                            min_occurrences: c.min_occurrences as usize,
                        })
                    })
                    .collect::<Result<Vec<_>, CatalogError>>()?,
                min_categories: f64::from(*min_categories),
            },
            CriterionRule::NumericRange { metric, ideal } => CompiledRule::Numeric {
                metric: *metric,
                ideal: *ideal,
            },
        };
        Ok(Self {
            id: def.id.clone(),
            weight: def.weight,
            rule,
        })
    }

    fn evaluate(&self, doc: &Document, keyword: &KeywordMetrics) -> CriterionScore {
        let (ratio, raw_metric) = match &self.rule {
            CompiledRule::Breadth {
                patterns,
                min_count,
            } => {
                let paragraphs = patterns.count_paragraph_presence(&doc.paragraphs);
                let unique_patterns = patterns.count_unique_present(&doc.plain);
                let paragraph_ratio = capped_ratio(paragraphs as f64, *min_count);
                let unique_ratio = capped_ratio(
                    unique_patterns as f64,
                    UNIQUE_TARGET_FRACTION * patterns.len() as f64,
                );
                (
                    PARAGRAPH_SHARE * paragraph_ratio + UNIQUE_SHARE * unique_ratio,
                    RawMetric::Breadth {
                        paragraphs,
                        unique_patterns,
                        paragraph_ratio,
                        unique_ratio,
                    },
                )
            }
            CompiledRule::Occurrences {
                patterns,
                min_count,
            } => {
                let occurrences = patterns.count_total_occurrences(&doc.plain);
                (
                    capped_ratio(occurrences as f64, *min_count),
                    RawMetric::Occurrences { occurrences },
                )
            }
            CompiledRule::Categories {
                categories,
                min_categories,
            } => {
                let occurrences: BTreeMap<String, usize> = categories
                    .iter()
                    .map(|c| (c.id.clone(), c.patterns.count_total_occurrences(&doc.plain)))
                    .collect();
                let qualified = categories
                    .iter()
                    .filter(|c| occurrences.get(&c.id).copied().unwrap_or(0) >= c.min_occurrences)
                    .count();
                (
                    capped_ratio(qualified as f64, *min_categories),
                    RawMetric::Categories {
                        qualified,
                        occurrences,
                    },
                )
            }
            CompiledRule::Numeric { metric, ideal } => {
                let observed = observe(*metric, doc, keyword);
                let ratio = match *ideal {
                    Ideal::Target { count } => target_ratio(observed, count),
                    Ideal::Band { min, max, floor } => band_ratio(observed, min, max, floor),
                };
                (ratio, RawMetric::Numeric { observed })
            }
        };

        CriterionScore {
            criterion_id: self.id.clone(),
            raw_metric,
            score: self.weight * ratio,
            max: self.weight,
        }
    }
}

fn observe(metric: Metric, doc: &Document, keyword: &KeywordMetrics) -> f64 {
    match metric {
        Metric::H2Count => doc.h2_count as f64,
        Metric::H3Count => doc.h3_count as f64,
        Metric::KeywordDensity => keyword.density,
        Metric::KeywordInIntro => {
            if keyword.in_intro {
                1.0
            } else {
                0.0
            }
        }
        Metric::WordCount => doc.word_count as f64,
        Metric::CharCount => doc.char_count as f64,
    }
}

// ---------------------------------------------------------------------------
// Axis scorer
// ---------------------------------------------------------------------------

/// Scores one axis against a prepared document.
#[derive(Debug, Clone)]
pub struct AxisScorer {
    axis: Axis,
    criteria: Vec<CompiledCriterion>,
}

impl AxisScorer {
    pub fn compile(
        axis: Axis,
        definitions: &[CriterionDefinition],
        policy: MatchPolicy,
    ) -> Result<Self, CatalogError> {
        let criteria = definitions
            .iter()
            .map(|d| CompiledCriterion::compile(d, policy))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { axis, criteria })
    }

    pub fn score(&self, doc: &Document, keyword: &KeywordMetrics) -> AxisResult {
        let details: BTreeMap<String, CriterionScore> = self
            .criteria
            .iter()
            .map(|c| (c.id.clone(), c.evaluate(doc, keyword)))
            .collect();
        let raw: f64 = details.values().map(|d| d.score).sum();
        let score = raw.min(AXIS_CAP);
        debug!(axis = %self.axis, raw, score, "axis scored");
        AxisResult {
            axis: self.axis,
            score,
            details,
        }
    }
}
