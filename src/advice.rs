//! Weak-point extraction and the remediation message table.
//!
//! The table below is the single registry of messages keyed by
//! `(axis, criterion_id)`. Catalog validation refuses criteria that have
//! neither a table entry nor their own `advice`, so the scorer's ids and the
//! table cannot drift apart silently.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::axis::AxisResult;
use crate::catalog::{Axis, CriteriaCatalog};

/// Criterion id of the synthetic weak point raised for filler phrasing.
pub const FILLER_CRITERION: &str = "filler_language";

/// Criteria achieving less than this share of their maximum are weak.
pub const WEAK_RATIO: f64 = 0.5;

/// Weak points below this ratio produce high-priority recommendations.
pub const HIGH_PRIORITY_RATIO: f64 = 0.3;

// ---------------------------------------------------------------------------
// Message table
// ---------------------------------------------------------------------------

type MessageTable = HashMap<Axis, HashMap<&'static str, &'static str>>;

static MESSAGES: Lazy<MessageTable> = Lazy::new(|| {
    let entries: &[(Axis, &str, &str)] = &[
        // Human voice
        (Axis::Human, "chronology", "Walk the reader through the stay in order: arrival, evening, the next morning. Time markers make the account feel lived."),
        (Axis::Human, "emotion", "Say how things felt. Name the moment you were surprised, relaxed or disappointed instead of only describing facilities."),
        (Axis::Human, "purpose", "State why the trip happened (an anniversary, a family weekend, a work trip) so readers with the same purpose recognise themselves."),
        (Axis::Human, "scene", "Describe concrete scenes: the view from the window, the lobby at night, the street outside."),
        (Axis::Human, "first_person", "Write from your own point of view. First-person narration reads as a real visit rather than a brochure."),
        // Quality of description
        (Axis::Quality, "objective_facts", "Add verifiable facts: address, price per night, check-in and check-out times, parking, phone number."),
        (Axis::Quality, "five_senses", "Cover at least four senses: what you saw, heard, smelled, tasted and touched. Two concrete details per sense is enough."),
        (Axis::Quality, "cuisine", "Describe the meals: the breakfast, the dinner course, signature dishes and where the ingredients come from."),
        (Axis::Quality, "facilities", "Describe the room and facilities: bed, bath, amenities, Wi-Fi, shared spaces."),
        // Commercial / structure
        (Axis::Commercial, "h2_headings", "Break the article into more sections with second-level headings (around six)."),
        (Axis::Commercial, "h3_headings", "Add third-level subheadings inside the longer sections."),
        (Axis::Commercial, "keyword_density", "Adjust keyphrase usage so it makes up roughly 0.5% to 2.5% of the text."),
        (Axis::Commercial, "keyword_in_intro", "Mention the keyphrase within the first 200 characters."),
        (Axis::Commercial, "word_count", "Bring the article length into the 2,000 to 3,500 range."),
        (Axis::Commercial, "call_to_action", "Close sections with a clear call to action such as checking availability or booking."),
        (Axis::Commercial, "booking_links", "Link to the official site or booking platforms where readers can reserve."),
        (Axis::Commercial, "price_plans", "Mention concrete plans, rates and current deals."),
        (Axis::Commercial, "comparison", "Compare with nearby alternatives so readers can judge value."),
        (Axis::Commercial, "faq", "Add a short FAQ answering the questions guests usually ask."),
        (Axis::Commercial, "pros_cons", "List honest pros and cons; a stated drawback makes the praise more credible."),
        (Axis::Commercial, "target_audience", "Say who the place is best for: couples, families, solo travellers."),
        (Axis::Commercial, "seasonal", "Add seasonal information: the best time to visit and what changes through the year."),
        (Axis::Commercial, "access", "Explain how to get there: nearest station, bus, airport transfer, driving directions."),
        (Axis::Commercial, "reviews", "Cite guest reviews or ratings to back up your impressions."),
        // Filler
        (Axis::Filler, FILLER_CRITERION, "Cut stock intensifiers and filler phrases; replace them with specific detail."),
    ];
    let mut table = MessageTable::new();
    for &(axis, id, message) in entries {
        table.entry(axis).or_default().insert(id, message);
    }
    table
});

/// Built-in remediation message for a criterion, if one exists.
pub fn message_for(axis: Axis, criterion_id: &str) -> Option<&'static str> {
    MESSAGES.get(&axis)?.get(criterion_id).copied()
}

// ---------------------------------------------------------------------------
// Weak points and recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakPoint {
    pub axis: Axis,
    pub criterion_id: String,
    pub score_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub axis: Axis,
    pub criterion_id: String,
    pub message: String,
    pub priority: Priority,
}

/// Criteria below [`WEAK_RATIO`], in axis order, plus a filler weak point
/// when the penalty reaches `filler_weak_point_min`.
pub fn extract_weak_points(
    axes: &[AxisResult],
    ai_penalty: f64,
    penalty_cap: f64,
    filler_weak_point_min: f64,
) -> Vec<WeakPoint> {
    let mut weak: Vec<WeakPoint> = axes
        .iter()
        .flat_map(|result| {
            result
                .details
                .values()
                .filter(|d| d.ratio() < WEAK_RATIO)
                .map(move |d| WeakPoint {
                    axis: result.axis,
                    criterion_id: d.criterion_id.clone(),
                    score_ratio: d.ratio(),
                })
        })
        .collect();

    if ai_penalty >= filler_weak_point_min && penalty_cap > 0.0 {
        weak.push(WeakPoint {
            axis: Axis::Filler,
            criterion_id: FILLER_CRITERION.to_string(),
            score_ratio: (1.0 - ai_penalty / penalty_cap).clamp(0.0, 1.0),
        });
    }
    weak
}

/// Maps weak points to messages. Points without a message are dropped.
pub fn recommend(catalog: &CriteriaCatalog, weak_points: &[WeakPoint]) -> Vec<Recommendation> {
    weak_points
        .iter()
        .filter_map(|wp| {
            let Some(message) = catalog.advice_for(wp.axis, &wp.criterion_id) else {
                warn!(axis = %wp.axis, criterion = %wp.criterion_id, "no remediation message");
                return None;
            };
            Some(Recommendation {
                axis: wp.axis,
                criterion_id: wp.criterion_id.clone(),
                message,
                priority: if wp.score_ratio < HIGH_PRIORITY_RATIO {
                    Priority::High
                } else {
                    Priority::Medium
                },
            })
        })
        .collect()
}
