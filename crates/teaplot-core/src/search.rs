//! Faceted search across cultivars, growth records, and health issues.
//!
//! The search operates entirely on caller-owned slices. Nothing is indexed
//! or cached; every call recomputes from scratch.
//!
//! # Algorithm
//!
//! 1. Expand the category (`all` → all three kinds).
//! 2. Apply structural predicates (status, location, generation, date
//!    range, severity) as cheap rejects.
//! 3. With a non-empty query, require at least one searchable field to
//!    contain the query (case-insensitive). The same [`QueryPattern`]
//!    drives this filter, scoring, and highlighting, so every survivor
//!    scores above zero and carries at least one marked fragment.
//! 4. Score each survivor ([`crate::score`]), collect highlight fragments
//!    ([`crate::highlight`]), resolve the owning cultivar's name for
//!    growth and health records.
//! 5. Drop duplicate composite ids, then stable-sort by the requested
//!    field and direction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::highlight::QueryPattern;
use crate::models::{
    Cultivar, EntityKind, EntityRef, GrowthRecord, HealthIssue, Severity, SortOrder,
};
use crate::score::{contains_ci, score_with};

/// Label used when a record's owning cultivar cannot be resolved.
pub const UNKNOWN_CULTIVAR: &str = "Unknown cultivar";

/// Which entity collections a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    #[default]
    All,
    Teas,
    Growth,
    Health,
}

impl SearchCategory {
    fn includes(&self, kind: EntityKind) -> bool {
        match self {
            Self::All => true,
            Self::Teas => kind == EntityKind::Tea,
            Self::Growth => kind == EntityKind::Growth,
            Self::Health => kind == EntityKind::Health,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Relevance,
    Date,
    Name,
    GrowthScore,
    GerminationRate,
}

/// Query-time search state. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    /// Free-text query; empty disables text matching and scoring.
    pub query: String,
    pub category: SearchCategory,
    /// Matches cultivar status or health-issue status by wire name.
    pub status: Option<String>,
    /// Case-insensitive substring of the cultivar location.
    pub location: Option<String>,
    /// Exact cultivar generation label.
    pub generation: Option<String>,
    /// Inclusive lower bound on record/issue date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on record/issue date.
    pub date_to: Option<NaiveDate>,
    pub severity: Option<Severity>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

/// One field of a result that contains the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub field: &'static str,
    pub value: String,
    pub highlighted: String,
}

/// A ranked search hit referencing its source entity.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<'a> {
    /// Composite id: `"<type>-<entity id>"`.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub title: String,
    pub description: String,
    pub entity: EntityRef<'a>,
    pub score: u32,
    pub highlights: Vec<Highlight>,
}

/// Run a faceted search over the three entity collections.
pub fn search<'a>(
    cultivars: &'a [Cultivar],
    growth_records: &'a [GrowthRecord],
    health_issues: &'a [HealthIssue],
    filters: &SearchFilters,
) -> Vec<SearchResult<'a>> {
    let query = filters.query.trim();
    let pattern = QueryPattern::new(query);

    let names: HashMap<&str, &str> = cultivars
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();
    let owner_name = |id: &str| names.get(id).copied().unwrap_or(UNKNOWN_CULTIVAR);

    let mut entities: Vec<EntityRef<'a>> = Vec::new();
    if filters.category.includes(EntityKind::Tea) {
        entities.extend(
            cultivars
                .iter()
                .filter(|c| cultivar_passes(c, filters))
                .map(EntityRef::Cultivar),
        );
    }
    if filters.category.includes(EntityKind::Growth) {
        entities.extend(
            growth_records
                .iter()
                .filter(|g| in_range(g.date, filters))
                .map(EntityRef::Growth),
        );
    }
    if filters.category.includes(EntityKind::Health) {
        entities.extend(
            health_issues
                .iter()
                .filter(|h| health_passes(h, filters))
                .map(EntityRef::Health),
        );
    }

    let structural = entities.len();
    let mut seen: HashSet<String> = HashSet::new();
    let mut results: Vec<SearchResult<'a>> = Vec::new();

    for entity in entities {
        let fragments = highlights(entity, &pattern);
        if !pattern.is_empty() && fragments.is_empty() {
            continue;
        }

        let id = format!("{}-{}", entity.kind().as_str(), entity.id());
        if !seen.insert(id.clone()) {
            continue;
        }

        let (title, description) = describe(entity, &owner_name);
        results.push(SearchResult {
            id,
            kind: entity.kind(),
            title,
            description,
            entity,
            score: score_with(entity, &pattern),
            highlights: fragments,
        });
    }

    sort_results(&mut results, filters.sort_by, filters.sort_order);

    tracing::debug!(
        query,
        category = ?filters.category,
        structural,
        matched = results.len(),
        "search complete"
    );

    results
}

/// Stable-sort results by `field`, then apply `order`.
pub fn sort_results(results: &mut [SearchResult<'_>], field: SortField, order: SortOrder) {
    results.sort_by(|a, b| order.apply(compare(a, b, field)));
}

fn compare(a: &SearchResult<'_>, b: &SearchResult<'_>, field: SortField) -> Ordering {
    match field {
        SortField::Relevance => a.score.cmp(&b.score),
        SortField::Date => a.entity.date_key().cmp(&b.entity.date_key()),
        SortField::Name => a.title.cmp(&b.title),
        SortField::GrowthScore => cultivar_metric(a, |c| f64::from(c.growth_score))
            .total_cmp(&cultivar_metric(b, |c| f64::from(c.growth_score))),
        SortField::GerminationRate => cultivar_metric(a, |c| c.germination_rate)
            .total_cmp(&cultivar_metric(b, |c| c.germination_rate)),
    }
}

/// Numeric sort key for cultivar results; other kinds contribute 0.
fn cultivar_metric(r: &SearchResult<'_>, f: impl Fn(&Cultivar) -> f64) -> f64 {
    match r.entity {
        EntityRef::Cultivar(c) => f(c),
        _ => 0.0,
    }
}

fn cultivar_passes(c: &Cultivar, filters: &SearchFilters) -> bool {
    if let Some(status) = &filters.status {
        if c.status.as_str() != status {
            return false;
        }
    }
    if let Some(loc) = &filters.location {
        if !contains_ci(&c.location, &loc.to_lowercase()) {
            return false;
        }
    }
    if let Some(generation) = &filters.generation {
        if &c.generation != generation {
            return false;
        }
    }
    true
}

fn health_passes(h: &HealthIssue, filters: &SearchFilters) -> bool {
    if !in_range(h.date, filters) {
        return false;
    }
    if let Some(severity) = filters.severity {
        if h.severity != severity {
            return false;
        }
    }
    if let Some(status) = &filters.status {
        if h.status.as_str() != status {
            return false;
        }
    }
    true
}

fn in_range(date: NaiveDate, filters: &SearchFilters) -> bool {
    filters.date_from.map_or(true, |from| date >= from)
        && filters.date_to.map_or(true, |to| date <= to)
}

/// Every `(field, value)` pair of an entity that is eligible for highlighting.
fn text_fields(entity: EntityRef<'_>) -> Vec<(&'static str, String)> {
    match entity {
        EntityRef::Cultivar(c) => vec![
            ("name", c.name.clone()),
            ("generation", c.generation.clone()),
            ("location", c.location.clone()),
            ("aroma", c.aroma.clone()),
            ("note", c.note.clone()),
        ],
        EntityRef::Growth(g) => vec![
            ("notes", g.notes.clone()),
            ("weather", g.weather.as_str().to_string()),
            ("date", g.date.to_string()),
        ],
        EntityRef::Health(h) => {
            let mut fields = vec![("description", h.description.clone())];
            fields.extend(h.symptoms.iter().map(|s| ("symptoms", s.clone())));
            fields.extend(h.cause.iter().map(|s| ("cause", s.clone())));
            fields.extend(h.treatment.iter().map(|s| ("treatment", s.clone())));
            fields
        }
    }
}

fn highlights(entity: EntityRef<'_>, pattern: &QueryPattern) -> Vec<Highlight> {
    if pattern.is_empty() {
        return Vec::new();
    }
    text_fields(entity)
        .into_iter()
        .filter(|(_, value)| pattern.is_match(value))
        .map(|(field, value)| Highlight {
            field,
            highlighted: pattern.highlight(&value),
            value,
        })
        .collect()
}

fn describe<'n>(entity: EntityRef<'_>, owner_name: &impl Fn(&str) -> &'n str) -> (String, String) {
    match entity {
        EntityRef::Cultivar(c) => (
            c.name.clone(),
            format!("{} · {} · {}", c.generation, c.location, c.year),
        ),
        EntityRef::Growth(g) => (
            format!("{} — growth record", owner_name(&g.cultivar_id)),
            format!(
                "{}: {}cm, {} leaves, {}",
                g.date,
                g.height,
                g.leaf_count,
                g.weather.as_str()
            ),
        ),
        EntityRef::Health(h) => (
            format!("{} — health issue", owner_name(&h.cultivar_id)),
            format!(
                "{} ({}): {}",
                h.issue_type.as_str(),
                h.severity.as_str(),
                h.description
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::MARK_OPEN;
    use crate::models::{CultivarStatus, IssueStatus, IssueType, Weather};

    fn cultivar(id: &str, name: &str, year: i32) -> Cultivar {
        Cultivar {
            id: id.into(),
            name: name.into(),
            generation: "F1".into(),
            location: "Shizuoka".into(),
            year,
            germination_rate: 60.0,
            growth_score: 3,
            disease_resistance: 3,
            aroma: "grassy".into(),
            note: String::new(),
            status: CultivarStatus::Active,
            images: Vec::new(),
        }
    }

    fn growth(id: &str, cultivar_id: &str, date: &str, notes: &str) -> GrowthRecord {
        GrowthRecord {
            id: id.into(),
            cultivar_id: cultivar_id.into(),
            date: date.parse().unwrap(),
            height: 20.0,
            leaf_count: 10,
            weather: Weather::Sunny,
            temperature: 18.0,
            notes: notes.into(),
            image: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn issue(id: &str, cultivar_id: &str, severity: Severity, description: &str) -> HealthIssue {
        HealthIssue {
            id: id.into(),
            cultivar_id: cultivar_id.into(),
            date: "2024-06-10".parse().unwrap(),
            issue_type: IssueType::Pest,
            severity,
            description: description.into(),
            symptoms: vec!["curled leaves".into()],
            cause: None,
            treatment: Some("neem oil".into()),
            status: IssueStatus::Open,
            resolved_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn filters(query: &str) -> SearchFilters {
        SearchFilters {
            query: query.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_query_returns_all_unscored() {
        let cs = vec![cultivar("c1", "Yabukita", 2020), cultivar("c2", "Okumidori", 2021)];
        let gs = vec![growth("g1", "c1", "2024-04-01", "first flush")];
        let hs = vec![issue("h1", "c2", Severity::Low, "aphids")];

        let results = search(&cs, &gs, &hs, &filters(""));
        assert_eq!(results.len(), 4);
        for r in &results {
            assert_eq!(r.score, 0);
            assert!(r.highlights.is_empty());
        }
    }

    #[test]
    fn test_empty_inputs_yield_empty_results() {
        let results = search(&[], &[], &[], &filters("anything"));
        assert!(results.is_empty());
    }

    #[test]
    fn test_relevance_order_and_composite_ids() {
        let cs = vec![cultivar("c2", "Yabukitax", 2020), cultivar("c1", "Yabukita", 2020)];
        let results = search(&cs, &[], &[], &filters("yabukita"));
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "tea-c1");
        assert_eq!(results[0].score, 100);
        assert_eq!(results[1].id, "tea-c2");
        assert_eq!(results[1].score, 50);
        assert_eq!(results[0].highlights[0].field, "name");
        assert_eq!(results[0].highlights[0].highlighted, "<mark>Yabukita</mark>");
    }

    #[test]
    fn test_text_filter_excludes_non_matching() {
        let cs = vec![cultivar("c1", "Yabukita", 2020), cultivar("c2", "Okumidori", 2021)];
        let results = search(&cs, &[], &[], &filters("okumi"));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Okumidori");
    }

    #[test]
    fn test_category_restricts_kinds() {
        let cs = vec![cultivar("c1", "Rainy Hill", 2020)];
        let gs = vec![growth("g1", "c1", "2024-04-01", "rainy morning")];
        let mut f = filters("rainy");
        f.category = SearchCategory::Growth;
        let results = search(&cs, &gs, &[], &f);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, EntityKind::Growth);
        assert_eq!(results[0].title, "Rainy Hill — growth record");
    }

    #[test]
    fn test_unknown_owner_falls_back() {
        let gs = vec![growth("g1", "missing", "2024-04-01", "")];
        let results = search(&[], &gs, &[], &filters(""));
        assert_eq!(results[0].title, format!("{} — growth record", UNKNOWN_CULTIVAR));
    }

    #[test]
    fn test_structural_filters() {
        let mut discarded = cultivar("c2", "Benifuuki", 2019);
        discarded.status = CultivarStatus::Discarded;
        let cs = vec![cultivar("c1", "Yabukita", 2020), discarded];
        let hs = vec![
            issue("h1", "c1", Severity::High, "blight"),
            issue("h2", "c1", Severity::Low, "minor spots"),
        ];

        let mut f = filters("");
        f.category = SearchCategory::Teas;
        f.status = Some("discarded".into());
        let results = search(&cs, &[], &hs, &f);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Benifuuki");

        let mut f = filters("");
        f.category = SearchCategory::Health;
        f.severity = Some(Severity::High);
        let results = search(&cs, &[], &hs, &f);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "health-h1");
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let gs = vec![
            growth("g1", "c1", "2024-03-31", ""),
            growth("g2", "c1", "2024-04-01", ""),
            growth("g3", "c1", "2024-04-30", ""),
            growth("g4", "c1", "2024-05-01", ""),
        ];
        let mut f = filters("");
        f.date_from = Some("2024-04-01".parse().unwrap());
        f.date_to = Some("2024-04-30".parse().unwrap());
        let ids: Vec<String> = search(&[], &gs, &[], &f).into_iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"growth-g2".to_string()));
        assert!(ids.contains(&"growth-g3".to_string()));
    }

    #[test]
    fn test_name_sort_both_directions() {
        let cs = vec![cultivar("b", "B", 2020), cultivar("a", "A", 2020)];
        let mut f = filters("");
        f.sort_by = SortField::Name;
        f.sort_order = SortOrder::Asc;
        let titles: Vec<String> = search(&cs, &[], &[], &f).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["A", "B"]);

        f.sort_order = SortOrder::Desc;
        let titles: Vec<String> = search(&cs, &[], &[], &f).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn test_date_sort_mixes_kinds_on_one_timeline() {
        let cs = vec![cultivar("c1", "Yabukita", 2023)];
        let gs = vec![growth("g1", "c1", "2022-06-01", "")];
        let mut f = filters("");
        f.sort_by = SortField::Date;
        let ids: Vec<String> = search(&cs, &gs, &[], &f).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["tea-c1", "growth-g1"]);
    }

    #[test]
    fn test_growth_score_sort_non_cultivars_tie_at_zero() {
        let mut high = cultivar("c1", "High", 2020);
        high.growth_score = 5;
        let mut low = cultivar("c2", "Low", 2020);
        low.growth_score = 1;
        let cs = vec![low, high];
        let gs = vec![growth("g1", "c1", "2024-01-01", "")];
        let mut f = filters("");
        f.sort_by = SortField::GrowthScore;
        let ids: Vec<String> = search(&cs, &gs, &[], &f).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["tea-c1", "tea-c2", "growth-g1"]);
    }

    #[test]
    fn test_duplicate_entities_produce_one_result() {
        let cs = vec![cultivar("c1", "Yabukita", 2020), cultivar("c1", "Yabukita", 2020)];
        let results = search(&cs, &[], &[], &filters("yabu"));
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_query_spanning_two_fields_matches_nothing() {
        // "Yabukita" is the name and "F1" the generation; no single field
        // holds both.
        let cs = vec![cultivar("c1", "Yabukita", 2020)];
        let results = search(&cs, &[], &[], &filters("yabukita f1"));
        assert!(results.is_empty());
    }

    #[test]
    fn test_every_text_match_is_scored_and_marked() {
        let cs = vec![
            cultivar("c1", "Yabukita", 2020),
            cultivar("c2", "İzmir", 2021),
            cultivar("c3", "Kelvin", 2022),
        ];
        let gs = vec![growth("g1", "c1", "2024-04-01", "first flush in Shizuoka")];
        for query in ["shizuoka", "i̇zmir", "k", "f1", "2024-04"] {
            for r in search(&cs, &gs, &[], &filters(query)) {
                assert!(r.score > 0, "{} scored 0 for {:?}", r.id, query);
                assert!(!r.highlights.is_empty());
                for h in &r.highlights {
                    assert!(h.highlighted.contains(MARK_OPEN), "{:?} in {}", query, h.value);
                }
            }
        }
        // Lowercasing would turn "İzmir" into "i̇zmir"; the matcher's case
        // folding does not, so the name is not a hit.
        assert!(search(&cs, &[], &[], &filters("i̇zmir")).is_empty());
    }
}
