use content_grade::{
    analyze, estimate_confidence, estimate_trend, AnalysisHint, Axis, ConfidenceConfig,
    TrendDirection,
};
use proptest::prelude::*;

const VOCAB: &[&str] = &[
    "I", "we", "my", "the", "a", "and", "of", "garden", "river", "morning", "sunset", "loved",
    "happy", "felt", "quiet", "bright", "warm", "sweet", "scent", "breakfast", "room", "price",
    "obviously", "truly", "plan", "station", "review", "walked", "table", "stone", "path", "old",
];

fn paragraph() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 4..24).prop_map(|words| words.join(" "))
}

fn document() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(paragraph(), 0..12)
}

fn render(paragraphs: &[String]) -> String {
    paragraphs.iter().map(|p| format!("<p>{p}.</p>")).collect()
}

proptest! {
    #[test]
    fn scores_stay_in_range(text in ".{0,400}") {
        let result = analyze(&text, &AnalysisHint::default());
        for score in [result.h_score, result.q_score, result.c_score, result.total_score] {
            prop_assert!((0.0..=100.0).contains(&score), "score out of range: {}", score);
        }
        prop_assert!((0.0..=15.0).contains(&result.ai_penalty));
    }

    #[test]
    fn total_follows_weighted_formula(paragraphs in document()) {
        let result = analyze(&render(&paragraphs), &AnalysisHint::default());
        let expected = (0.35 * result.h_score + 0.35 * result.q_score + 0.30 * result.c_score
            - result.ai_penalty)
            .max(0.0);
        prop_assert!((result.total_score - expected).abs() < 1e-9);
        prop_assert_eq!(result.is_high_quality, result.total_score >= 75.0);
        prop_assert_eq!(result.is_acceptable, result.total_score >= 25.0);
    }

    #[test]
    fn analysis_is_deterministic(paragraphs in document(), keyphrase in prop::option::of("[a-z]{3,8}")) {
        let text = render(&paragraphs);
        let hint = AnalysisHint { keyphrase };
        prop_assert_eq!(analyze(&text, &hint), analyze(&text, &hint));
    }

    #[test]
    fn weak_points_are_below_half_credit(paragraphs in document()) {
        let result = analyze(&render(&paragraphs), &AnalysisHint::default());
        for wp in &result.weak_points {
            if wp.axis != Axis::Filler {
                prop_assert!(wp.score_ratio < 0.5, "{} at {}", wp.criterion_id, wp.score_ratio);
            }
        }
        prop_assert!(result.recommendations.len() <= result.weak_points.len());
    }

    #[test]
    fn appending_a_paragraph_never_lowers_pattern_axes(
        paragraphs in document(),
        extra in paragraph(),
    ) {
        let hint = AnalysisHint::default();
        let before = analyze(&render(&paragraphs), &hint);
        let mut longer = paragraphs.clone();
        longer.push(extra);
        let after = analyze(&render(&longer), &hint);
        prop_assert!(after.h_score >= before.h_score, "{} < {}", after.h_score, before.h_score);
        prop_assert!(after.q_score >= before.q_score, "{} < {}", after.q_score, before.q_score);
        prop_assert!(after.ai_penalty >= before.ai_penalty);
    }

    #[test]
    fn confidence_percentage_is_bounded(scores in prop::collection::vec(0.0f64..=100.0, 0..60)) {
        let report = estimate_confidence(&scores, &ConfidenceConfig::default());
        prop_assert!((0.0..=100.0).contains(&report.percentage));
        prop_assert_eq!(report.sample_count, scores.len());
    }

    #[test]
    fn trend_direction_matches_slope(scores in prop::collection::vec(0.0f64..=100.0, 3..30)) {
        let trend = estimate_trend(&scores, 10);
        let expected = if trend.slope > 1.0 {
            TrendDirection::Improving
        } else if trend.slope < -1.0 {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        };
        prop_assert_eq!(trend.direction, expected);
        prop_assert_eq!(trend.window_size, scores.len().min(10));
    }
}
