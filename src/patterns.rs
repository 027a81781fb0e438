//! Literal pattern matching and the three counting primitives.

use regex::Regex;

use crate::catalog::MatchPolicy;
use crate::error::CatalogError;

/// A list of literal patterns compiled under one [`MatchPolicy`].
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<(String, Regex)>,
}

fn starts_with_word_char(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_')
}

fn ends_with_word_char(s: &str) -> bool {
    s.chars().last().is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Builds the regex source for one literal under `policy`.
fn pattern_source(pattern: &str, policy: MatchPolicy) -> String {
    let mut src = String::new();
    if !policy.case_sensitive {
        src.push_str("(?i)");
    }
    if policy.whole_word && starts_with_word_char(pattern) {
        src.push_str(r"\b");
    }
    src.push_str(&regex::escape(pattern));
    if policy.whole_word && ends_with_word_char(pattern) {
        src.push_str(r"\b");
    }
    src
}

impl PatternSet {
    pub fn compile<S: AsRef<str>>(patterns: &[S], policy: MatchPolicy) -> Result<Self, CatalogError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(&pattern_source(p, policy))
                    .map(|re| (p.to_string(), re))
                    .map_err(|source| CatalogError::Pattern {
                        pattern: p.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|(_, re)| re.is_match(text))
    }

    /// Number of paragraphs containing at least one pattern.
    pub fn count_paragraph_presence<S: AsRef<str>>(&self, paragraphs: &[S]) -> usize {
        paragraphs
            .iter()
            .filter(|p| self.is_match(p.as_ref()))
            .count()
    }

    /// Number of distinct patterns occurring anywhere in `text`.
    pub fn count_unique_present(&self, text: &str) -> usize {
        self.patterns
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .count()
    }

    /// Sum of non-overlapping occurrence counts of every pattern.
    pub fn count_total_occurrences(&self, text: &str) -> usize {
        self.patterns
            .iter()
            .map(|(_, re)| re.find_iter(text).count())
            .sum()
    }

    /// Per-pattern occurrence counts, skipping patterns that never occur.
    pub fn occurrences_by_pattern(&self, text: &str) -> Vec<(String, usize)> {
        self.patterns
            .iter()
            .filter_map(|(p, re)| {
                let n = re.find_iter(text).count();
                (n > 0).then(|| (p.clone(), n))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBSTRING: MatchPolicy = MatchPolicy {
        case_sensitive: true,
        whole_word: false,
    };
    const WORDS: MatchPolicy = MatchPolicy {
        case_sensitive: false,
        whole_word: true,
    };

    #[test]
    fn paragraph_presence_counts_each_paragraph_once() {
        let set = PatternSet::compile(&["sea", "sky"], SUBSTRING).unwrap();
        let paragraphs = ["sea and sky and sea", "nothing here", "sky"];
        assert_eq!(set.count_paragraph_presence(&paragraphs), 2);
    }

    #[test]
    fn unique_patterns_ignore_frequency() {
        let set = PatternSet::compile(&["sea", "sky", "sun"], SUBSTRING).unwrap();
        assert_eq!(set.count_unique_present("sea sea sea sky"), 2);
    }

    #[test]
    fn total_occurrences_sum_over_patterns() {
        let set = PatternSet::compile(&["sea", "sky"], SUBSTRING).unwrap();
        assert_eq!(set.count_total_occurrences("sea sea sky seasons"), 4);
    }

    #[test]
    fn substring_policy_is_case_sensitive() {
        let set = PatternSet::compile(&["Sea"], SUBSTRING).unwrap();
        assert_eq!(set.count_total_occurrences("sea Sea SEA"), 1);
    }

    #[test]
    fn whole_word_policy_folds_case_and_respects_boundaries() {
        let set = PatternSet::compile(&["my"], WORDS).unwrap();
        assert_eq!(set.count_total_occurrences("My economy room was my favourite"), 2);
    }

    #[test]
    fn whole_word_skips_boundary_next_to_punctuation() {
        let set = PatternSet::compile(&["Q:", "booking.com"], WORDS).unwrap();
        assert_eq!(set.count_total_occurrences("Q: is it on Booking.com?"), 2);
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let set = PatternSet::compile(&["$100 (approx.)"], SUBSTRING).unwrap();
        assert_eq!(set.count_total_occurrences("about $100 (approx.) total"), 1);
    }

    #[test]
    fn occurrences_by_pattern_lists_hits_only() {
        let set = PatternSet::compile(&["a", "b", "c"], WORDS).unwrap();
        let hits = set.occurrences_by_pattern("a b a");
        assert_eq!(hits, vec![("a".to_string(), 2), ("b".to_string(), 1)]);
    }
}
