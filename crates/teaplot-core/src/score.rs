//! Field-weighted relevance scoring.
//!
//! Every field that contains the query (case-insensitive substring, matched
//! with [`QueryPattern`] like the highlighter) adds a fixed weight to the
//! entity's score. Weights are additive across fields.
//!
//! | Kind | Field | Weight |
//! |------|-------|--------|
//! | cultivar | name (exact) | 100 |
//! | cultivar | name (partial, only without exact) | 50 |
//! | cultivar | location | 30 |
//! | cultivar | aroma | 20 |
//! | cultivar | generation | 15 |
//! | cultivar | note | 10 |
//! | growth | notes | 40 |
//! | growth | weather | 20 |
//! | growth | date (`YYYY-MM-DD` text) | 15 |
//! | health | description | 40 |
//! | health | any symptom (flat) | 30 |
//! | health | cause | 25 |
//! | health | treatment | 20 |

use crate::highlight::QueryPattern;
use crate::models::{Cultivar, EntityRef, GrowthRecord, HealthIssue};

pub const NAME_EXACT: u32 = 100;
pub const NAME_PARTIAL: u32 = 50;
pub const LOCATION: u32 = 30;
pub const AROMA: u32 = 20;
pub const GENERATION: u32 = 15;
pub const NOTE: u32 = 10;

pub const GROWTH_NOTES: u32 = 40;
pub const GROWTH_WEATHER: u32 = 20;
pub const GROWTH_DATE: u32 = 15;

pub const HEALTH_DESCRIPTION: u32 = 40;
pub const HEALTH_SYMPTOM: u32 = 30;
pub const HEALTH_CAUSE: u32 = 25;
pub const HEALTH_TREATMENT: u32 = 20;

/// Score `entity` against `query`.
///
/// Returns 0 for an empty or whitespace-only query.
pub fn score(entity: EntityRef<'_>, query: &str) -> u32 {
    score_with(entity, &QueryPattern::new(query))
}

/// Score `entity` against an already compiled query.
pub fn score_with(entity: EntityRef<'_>, pattern: &QueryPattern) -> u32 {
    if pattern.is_empty() {
        return 0;
    }
    match entity {
        EntityRef::Cultivar(c) => score_cultivar(c, pattern),
        EntityRef::Growth(g) => score_growth(g, pattern),
        EntityRef::Health(h) => score_health(h, pattern),
    }
}

/// Case-insensitive substring test; `needle` must already be lowercase.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn weight(hit: bool, w: u32) -> u32 {
    if hit {
        w
    } else {
        0
    }
}

fn score_cultivar(c: &Cultivar, p: &QueryPattern) -> u32 {
    let name_score = if p.is_full_match(&c.name) {
        NAME_EXACT
    } else if p.is_match(&c.name) {
        NAME_PARTIAL
    } else {
        0
    };

    name_score
        + weight(p.is_match(&c.location), LOCATION)
        + weight(p.is_match(&c.aroma), AROMA)
        + weight(p.is_match(&c.note), NOTE)
        + weight(p.is_match(&c.generation), GENERATION)
}

fn score_growth(g: &GrowthRecord, p: &QueryPattern) -> u32 {
    weight(p.is_match(&g.notes), GROWTH_NOTES)
        + weight(p.is_match(g.weather.as_str()), GROWTH_WEATHER)
        + weight(p.is_match(&g.date.to_string()), GROWTH_DATE)
}

fn score_health(h: &HealthIssue, p: &QueryPattern) -> u32 {
    let symptom_hit = h.symptoms.iter().any(|s| p.is_match(s));
    weight(p.is_match(&h.description), HEALTH_DESCRIPTION)
        + weight(symptom_hit, HEALTH_SYMPTOM)
        + weight(h.cause.as_deref().is_some_and(|s| p.is_match(s)), HEALTH_CAUSE)
        + weight(
            h.treatment.as_deref().is_some_and(|s| p.is_match(s)),
            HEALTH_TREATMENT,
        )
}
