use content_grade::advice::FILLER_CRITERION;
use content_grade::{
    analyze, default_analyzer, AnalysisHint, Analyzer, Axis, CriteriaCatalog, Priority,
};

const SCENES: [&str; 10] = [
    "I arrived at the small inn in the morning and felt happy to see the garden glowing in bright light after the long walk from the old town.",
    "My first walk took me along the river, where the quiet murmur of the water made me glad and relaxed for the whole afternoon.",
    "We sat on the balcony at sunset and were delighted by the sweet scent of pine drifting up from the hills below.",
    "In the evening I was surprised by how soft and warm the air felt as the breeze moved across the terrace.",
    "Our host served a savory soup with a salty flavor that I enjoyed slowly while watching the sky over the courtyard.",
    "I was amazed by the fragrant aroma of cedar that we smelled near the lobby the next day.",
    "On the last day I felt grateful and a little nostalgic as the colorful lanterns on the street began shining.",
    "We were excited to hear music and the rustling of leaves while I stood by the window later that night.",
    "I was impressed by the vivid colors of the mountain at dawn and thrilled by the echo of birdsong in the valley.",
    "My final memory is the smooth texture of the silky stones on the beach, which left me happy and moved.",
];

/// Ten personal paragraphs under one heading, about 2200 characters of text.
fn travel_log() -> String {
    let mut html = String::from("<h2>Three days by the river</h2>");
    for scene in SCENES {
        html.push_str("<p>");
        html.push_str(scene);
        html.push_str(" The path wound past old stone walls, low wooden fences and a few tidy homes before it reached the next bend.</p>");
    }
    html
}

#[test]
fn personal_travel_log_is_acceptable_but_not_high_quality() {
    let result = analyze(&travel_log(), &AnalysisHint::default());
    assert!(result.h_score > 60.0, "expected strong human voice, got {}", result.h_score);
    assert!(result.q_score >= 40.0, "five senses should be covered, got {}", result.q_score);
    assert!(result.c_score < 10.0, "no commercial content, got {}", result.c_score);
    assert_eq!(result.ai_penalty, 0.0);
    assert!(
        result.total_score >= 25.0 && result.total_score < 75.0,
        "total should sit between thresholds, got {}",
        result.total_score
    );
    assert!(result.is_acceptable);
    assert!(!result.is_high_quality);
}

#[test]
fn five_senses_qualify_in_travel_log() {
    let result = analyze(&travel_log(), &AnalysisHint::default());
    let quality = result.axis(Axis::Quality).unwrap();
    let senses = &quality.details["five_senses"];
    assert_eq!(senses.score, senses.max, "all sense categories present: {:?}", senses.raw_metric);
}

#[test]
fn missing_commercial_content_yields_high_priority_advice() {
    let result = analyze(&travel_log(), &AnalysisHint::default());
    let cta = result
        .recommendations
        .iter()
        .find(|r| r.axis == Axis::Commercial && r.criterion_id == "call_to_action")
        .expect("call_to_action should be recommended");
    assert_eq!(cta.priority, Priority::High);
    assert!(!cta.message.is_empty());
    assert!(
        result
            .weak_points
            .iter()
            .all(|wp| wp.criterion_id != "first_person"),
        "first person voice is fully covered"
    );
}

#[test]
fn empty_document_is_zeroed() {
    let result = analyze("", &AnalysisHint::default());
    assert_eq!(result.total_score, 0.0);
    assert_eq!(result.h_score, 0.0);
    assert_eq!(result.q_score, 0.0);
    assert_eq!(result.c_score, 0.0);
    assert_eq!(result.ai_penalty, 0.0);
    assert!(result.weak_points.is_empty());
    assert!(result.recommendations.is_empty());
    assert!(!result.is_acceptable);
}

#[test]
fn document_without_any_pattern_scores_zero_on_human_axis() {
    let text = "<p>Zzzz qqqq xxxx yyyy wwww vvvv.</p><p>Kkkk jjjj hhhh gggg ffff.</p>";
    let result = analyze(text, &AnalysisHint::default());
    assert_eq!(result.h_score, 0.0);
    assert_eq!(result.q_score, 0.0);
    assert!(result.total_score < 25.0);
}

#[test]
fn total_matches_weighted_formula() {
    let result = analyze(&travel_log(), &AnalysisHint::default());
    let expected =
        (result.h_score * 0.35 + result.q_score * 0.35 + result.c_score * 0.30 - result.ai_penalty).max(0.0);
    assert!(
        (result.total_score - expected).abs() < 1e-9,
        "total {} != {}",
        result.total_score,
        expected
    );
}

#[test]
fn analysis_is_idempotent() {
    let hint = AnalysisHint::with_keyphrase("river inn");
    let first = analyze(&travel_log(), &hint);
    let second = analyze(&travel_log(), &hint);
    assert_eq!(first, second);
}

#[test]
fn filler_phrases_are_counted_and_penalised() {
    let text = "<p>Obviously the view from the garden was absolutely stunning at sunset.</p>";
    let result = analyze(text, &AnalysisHint::default());
    assert_eq!(result.filler.occurrences, 2);
    assert!((result.ai_penalty - 0.3).abs() < 1e-9, "got {}", result.ai_penalty);
    assert!(
        result.weak_points.iter().all(|wp| wp.axis != Axis::Filler),
        "small penalty should not produce a filler weak point"
    );
}

#[test]
fn heavy_filler_is_capped_and_reported() {
    let text = "<p>Obviously the room was absolutely lovely and truly calm.</p>".repeat(60);
    let result = analyze(&text, &AnalysisHint::default());
    assert_eq!(result.ai_penalty, 15.0);
    let filler = result
        .weak_points
        .iter()
        .find(|wp| wp.axis == Axis::Filler)
        .expect("filler weak point");
    assert_eq!(filler.criterion_id, FILLER_CRITERION);
    assert_eq!(filler.score_ratio, 0.0);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.axis == Axis::Filler && r.priority == Priority::High));
}

#[test]
fn json_output_has_expected_keys() {
    let result = analyze(&travel_log(), &AnalysisHint::default());
    let json = serde_json::to_value(&result).unwrap();
    for key in [
        "h_score",
        "q_score",
        "c_score",
        "ai_penalty",
        "total_score",
        "weak_points",
        "recommendations",
        "is_high_quality",
        "is_acceptable",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    let first = &json["recommendations"][0];
    assert!(first["axis"].is_string());
    assert!(["high", "medium", "low"].contains(&first["priority"].as_str().unwrap()));
}

#[test]
fn keyphrase_in_intro_raises_commercial_score() {
    let without = analyze(&travel_log(), &AnalysisHint::default());
    let with = analyze(&travel_log(), &AnalysisHint::with_keyphrase("small inn"));
    assert!(
        with.c_score > without.c_score,
        "{} should exceed {}",
        with.c_score,
        without.c_score
    );
}

#[test]
fn custom_catalog_changes_thresholds() {
    let mut catalog = CriteriaCatalog::builtin().unwrap();
    catalog.scoring.thresholds.acceptable = 5.0;
    catalog.scoring.thresholds.high_quality = 10.0;
    let analyzer = Analyzer::new(catalog).unwrap();
    let result = analyzer.analyze(&travel_log(), &AnalysisHint::default());
    assert!(result.is_high_quality);
}

#[test]
fn default_analyzer_uses_builtin_catalog() {
    let builtin = CriteriaCatalog::builtin().unwrap();
    let analyzer = default_analyzer();
    assert_eq!(analyzer.catalog().version, builtin.version);
    let hint = AnalysisHint::default();
    assert_eq!(analyzer.analyze(&travel_log(), &hint), analyze(&travel_log(), &hint));
}

#[test]
fn catalog_with_oversized_filler_cap_is_refused() {
    let mut catalog = CriteriaCatalog::builtin().unwrap();
    catalog.filler.cap = 60.0;
    assert!(Analyzer::new(catalog).is_err(), "penalty must stay within 15");
}

#[test]
fn repeated_pattern_cannot_inflate_diversity() {
    let mut catalog = CriteriaCatalog::builtin().unwrap();
    let purpose = catalog
        .axes
        .human
        .iter_mut()
        .find(|c| c.id == "purpose")
        .unwrap();
    purpose.rule = content_grade::catalog::CriterionRule::PatternList {
        patterns: vec!["vacation".to_string(); 4],
        min_count: 6,
        counting: content_grade::catalog::Counting::Breadth,
    };
    assert!(Analyzer::new(catalog).is_err());
}
