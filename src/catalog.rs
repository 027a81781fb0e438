//! Versioned criteria catalog.
//!
//! The catalog is pure data: the weighted checklist for each axis, the
//! filler-phrase list, the match policy and the aggregate weights and
//! thresholds. It is loaded once (JSON, YAML or TOML) and validated before
//! any scoring happens, so that a zero threshold or an unmapped criterion is
//! caught at startup rather than producing saturated ratios later.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::advice;
use crate::error::CatalogError;

const BUILTIN_CATALOG: &str = include_str!("../catalog/default.yaml");

/// Tolerance for comparing summed weights against their caps.
const WEIGHT_EPSILON: f64 = 1e-9;

/// Upper bound on the filler penalty a catalog may configure.
pub const MAX_FILLER_PENALTY: f64 = 15.0;

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "H")]
    Human,
    #[serde(rename = "Q")]
    Quality,
    #[serde(rename = "C")]
    Commercial,
    /// Synthetic axis used only for the filler-language weak point.
    #[serde(rename = "AI")]
    Filler,
}

impl Axis {
    /// The three axes that carry criteria, in scoring order.
    pub const SCORED: [Axis; 3] = [Axis::Human, Axis::Quality, Axis::Commercial];

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Human => "H",
            Self::Quality => "Q",
            Self::Commercial => "C",
            Self::Filler => "AI",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Criterion definitions
// ---------------------------------------------------------------------------

/// How patterns are matched against text.
///
/// Every pattern is treated as a literal. `whole_word` anchors each end of
/// the pattern that starts or ends with a word character at a word boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPolicy {
    pub case_sensitive: bool,
    pub whole_word: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionDefinition {
    pub id: String,
    pub weight: f64,
    /// Remediation message; falls back to the built-in advice table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
    pub rule: CriterionRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriterionRule {
    PatternList {
        patterns: Vec<String>,
        min_count: u32,
        #[serde(default)]
        counting: Counting,
    },
    CategoryGroup {
        categories: Vec<PatternCategory>,
        min_categories: u32,
    },
    NumericRange {
        metric: Metric,
        ideal: Ideal,
    },
}

/// Which evidence a pattern list is scored on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counting {
    /// 60% paragraph presence, 40% distinct-pattern diversity.
    #[default]
    Breadth,
    /// Raw occurrence count against `min_count`.
    Occurrences,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternCategory {
    pub id: String,
    pub patterns: Vec<String>,
    pub min_occurrences: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    H2Count,
    H3Count,
    /// Keyphrase density in percent of total words.
    KeywordDensity,
    /// 1 when the keyphrase appears in the opening characters, else 0.
    KeywordInIntro,
    WordCount,
    CharCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Ideal {
    Target {
        count: f64,
    },
    Band {
        min: f64,
        max: f64,
        #[serde(default)]
        floor: f64,
    },
}

// ---------------------------------------------------------------------------
// Aggregate tunables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisWeights {
    pub human: f64,
    pub quality: f64,
    pub commercial: f64,
}

impl Default for AxisWeights {
    fn default() -> Self {
        Self {
            human: 0.35,
            quality: 0.35,
            commercial: 0.30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub high_quality: f64,
    pub acceptable: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_quality: 75.0,
            acceptable: 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: AxisWeights,
    #[serde(default)]
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillerConfig {
    pub patterns: Vec<String>,
    #[serde(default = "default_per_occurrence")]
    pub per_occurrence: f64,
    #[serde(default = "default_penalty_cap")]
    pub cap: f64,
    /// Penalty at which filler is reported as a weak point.
    #[serde(default = "default_weak_point_min")]
    pub weak_point_min: f64,
}

fn default_per_occurrence() -> f64 {
    0.15
}

fn default_penalty_cap() -> f64 {
    15.0
}

fn default_weak_point_min() -> f64 {
    5.0
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axes {
    pub human: Vec<CriterionDefinition>,
    pub quality: Vec<CriterionDefinition>,
    pub commercial: Vec<CriterionDefinition>,
}

/// Criteria sharing one axis, in catalog order.
#[derive(Debug, Clone, Copy)]
pub struct AxisCriteria<'a> {
    pub axis: Axis,
    pub criteria: &'a [CriterionDefinition],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaCatalog {
    pub version: String,
    #[serde(default)]
    pub match_policy: MatchPolicy,
    #[serde(default)]
    pub scoring: ScoringConfig,
    pub filler: FillerConfig,
    pub axes: Axes,
}

impl CriteriaCatalog {
    /// Parses and validates the catalog bundled with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Loads a catalog, choosing the parser by file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let catalog = match ext.as_str() {
            "json" => Self::from_json_str(&contents)?,
            "yaml" | "yml" => Self::from_yaml_str(&contents)?,
            "toml" => Self::from_toml_str(&contents)?,
            other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
        };
        info!(
            path = %path.display(),
            version = %catalog.version,
            criteria = catalog.criteria_count(),
            "loaded criteria catalog"
        );
        Ok(catalog)
    }

    pub fn from_json_str(s: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(s)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_yaml::from_str(s)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(s)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn criteria(&self, axis: Axis) -> &[CriterionDefinition] {
        match axis {
            Axis::Human => &self.axes.human,
            Axis::Quality => &self.axes.quality,
            Axis::Commercial => &self.axes.commercial,
            Axis::Filler => &[],
        }
    }

    pub fn axis_criteria(&self) -> [AxisCriteria<'_>; 3] {
        Axis::SCORED.map(|axis| AxisCriteria {
            axis,
            criteria: self.criteria(axis),
        })
    }

    pub fn criteria_count(&self) -> usize {
        Axis::SCORED.iter().map(|a| self.criteria(*a).len()).sum()
    }

    /// Message for a criterion: its own override, else the advice table.
    pub fn advice_for(&self, axis: Axis, criterion_id: &str) -> Option<String> {
        self.criteria(axis)
            .iter()
            .find(|c| c.id == criterion_id)
            .and_then(|c| c.advice.clone())
            .or_else(|| advice::message_for(axis, criterion_id).map(str::to_string))
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.version.trim().is_empty() {
            return Err(invalid("version must not be empty".to_string()));
        }
        validate_scoring(&self.scoring)?;
        validate_filler(&self.filler, self.match_policy)?;
        for AxisCriteria { axis, criteria } in self.axis_criteria() {
            validate_axis(axis, criteria, self.match_policy)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(msg: String) -> CatalogError {
    CatalogError::Invalid(msg)
}

fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

fn validate_scoring(scoring: &ScoringConfig) -> Result<(), CatalogError> {
    let w = scoring.weights;
    for (name, value) in [
        ("human", w.human),
        ("quality", w.quality),
        ("commercial", w.commercial),
    ] {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(invalid(format!(
                "scoring weight '{name}' must be within [0, 1], got {value}"
            )));
        }
    }
    let sum = w.human + w.quality + w.commercial;
    if sum <= 0.0 || sum > 1.0 + WEIGHT_EPSILON {
        return Err(invalid(format!(
            "scoring weights must sum to a value in (0, 1], got {sum}"
        )));
    }

    let t = scoring.thresholds;
    if !(0.0..=100.0).contains(&t.acceptable) || !(0.0..=100.0).contains(&t.high_quality) {
        return Err(invalid("thresholds must be within [0, 100]".to_string()));
    }
    if t.acceptable > t.high_quality {
        return Err(invalid(format!(
            "acceptable threshold {} exceeds high-quality threshold {}",
            t.acceptable, t.high_quality
        )));
    }
    Ok(())
}

fn validate_filler(filler: &FillerConfig, policy: MatchPolicy) -> Result<(), CatalogError> {
    if !filler.per_occurrence.is_finite() || filler.per_occurrence < 0.0 {
        return Err(invalid(
            "filler.per_occurrence must be non-negative".to_string(),
        ));
    }
    if !is_positive(filler.cap) || filler.cap > MAX_FILLER_PENALTY {
        return Err(invalid(format!(
            "filler.cap must be within (0, {MAX_FILLER_PENALTY}], got {}",
            filler.cap
        )));
    }
    if !filler.weak_point_min.is_finite() || filler.weak_point_min < 0.0 {
        return Err(invalid(
            "filler.weak_point_min must be non-negative".to_string(),
        ));
    }
    check_patterns("filler", &filler.patterns, true, policy)
}

fn check_patterns(
    owner: &str,
    patterns: &[String],
    allow_empty: bool,
    policy: MatchPolicy,
) -> Result<(), CatalogError> {
    if patterns.is_empty() && !allow_empty {
        return Err(invalid(format!("{owner}: pattern list is empty")));
    }
    let mut seen = HashSet::new();
    for pattern in patterns {
        if pattern.is_empty() {
            return Err(invalid(format!("{owner}: contains an empty pattern")));
        }
        let key = if policy.case_sensitive {
            pattern.clone()
        } else {
            pattern.to_lowercase()
        };
        if !seen.insert(key) {
            return Err(invalid(format!("{owner}: duplicate pattern {pattern:?}")));
        }
    }
    Ok(())
}

fn validate_axis(
    axis: Axis,
    criteria: &[CriterionDefinition],
    policy: MatchPolicy,
) -> Result<(), CatalogError> {
    if criteria.is_empty() {
        return Err(invalid(format!("axis {axis} has no criteria")));
    }

    let mut seen = HashSet::new();
    let mut weight_sum = 0.0;
    for criterion in criteria {
        let owner = format!("{axis}.{}", criterion.id);
        if criterion.id.is_empty() {
            return Err(invalid(format!("axis {axis} has a criterion without id")));
        }
        if !seen.insert(criterion.id.as_str()) {
            return Err(invalid(format!("{owner}: duplicate criterion id")));
        }
        if !is_positive(criterion.weight) {
            return Err(invalid(format!(
                "{owner}: weight must be positive, got {}",
                criterion.weight
            )));
        }
        weight_sum += criterion.weight;
        validate_rule(&owner, &criterion.rule, policy)?;

        if criterion.advice.is_none() && advice::message_for(axis, &criterion.id).is_none() {
            return Err(invalid(format!(
                "{owner}: no remediation message; add `advice` or extend the advice table"
            )));
        }
    }

    if weight_sum > 100.0 + WEIGHT_EPSILON {
        return Err(invalid(format!(
            "axis {axis}: weights sum to {weight_sum}, above the cap of 100"
        )));
    }
    Ok(())
}

fn validate_rule(owner: &str, rule: &CriterionRule, policy: MatchPolicy) -> Result<(), CatalogError> {
    match rule {
        CriterionRule::PatternList {
            patterns,
            min_count,
            ..
        } => {
            check_patterns(owner, patterns, false, policy)?;
            if *min_count == 0 {
                return Err(invalid(format!("{owner}: min_count must be positive")));
            }
        }
        CriterionRule::CategoryGroup {
            categories,
            min_categories,
        } => {
            if categories.is_empty() {
                return Err(invalid(format!("{owner}: no categories")));
            }
            let mut ids = HashSet::new();
            for category in categories {
                let cat_owner = format!("{owner}.{}", category.id);
                if !ids.insert(category.id.as_str()) {
                    return Err(invalid(format!("{cat_owner}: duplicate category id")));
                }
                check_patterns(&cat_owner, &category.patterns, false, policy)?;
                if category.min_occurrences == 0 {
                    return Err(invalid(format!(
                        "{cat_owner}: min_occurrences must be positive"
                    )));
                }
            }
            if *min_categories == 0 || *min_categories as usize > categories.len() {
                return Err(invalid(format!(
                    "{owner}: min_categories must be within 1..={}",
                    categories.len()
                )));
            }
        }
        CriterionRule::NumericRange { ideal, .. } => match *ideal {
            Ideal::Target { count } => {
                if !is_positive(count) {
                    return Err(invalid(format!("{owner}: target count must be positive")));
                }
            }
            Ideal::Band { min, max, floor } => {
                if !is_positive(min) {
                    return Err(invalid(format!("{owner}: band min must be positive")));
                }
                if !max.is_finite() || max < min {
                    return Err(invalid(format!("{owner}: band max must be >= min")));
                }
                if !(0.0..=1.0).contains(&floor) {
                    return Err(invalid(format!("{owner}: band floor must be within [0, 1]")));
                }
            }
        },
    }
    Ok(())
}
