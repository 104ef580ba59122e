//! Facet counts over a search result list.
//!
//! Each facet is a count breakdown of the results by one categorical
//! attribute. Maps are keyed by the attribute's wire value and ordered by
//! key so output is deterministic.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::EntityRef;
use crate::search::SearchResult;

/// Result counts per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub teas: usize,
    pub growth: usize,
    pub health: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub total: usize,
    pub kinds: KindCounts,
    pub cultivar_status: BTreeMap<String, usize>,
    pub location: BTreeMap<String, usize>,
    pub generation: BTreeMap<String, usize>,
    pub weather: BTreeMap<String, usize>,
    pub issue_type: BTreeMap<String, usize>,
    pub severity: BTreeMap<String, usize>,
    pub issue_status: BTreeMap<String, usize>,
}

fn bump(map: &mut BTreeMap<String, usize>, key: &str) {
    *map.entry(key.to_string()).or_insert(0) += 1;
}

/// Compute facet counts for `results`.
pub fn compute_facets(results: &[SearchResult<'_>]) -> Facets {
    let mut facets = Facets {
        total: results.len(),
        ..Default::default()
    };

    for r in results {
        match r.entity {
            EntityRef::Cultivar(c) => {
                facets.kinds.teas += 1;
                bump(&mut facets.cultivar_status, c.status.as_str());
                bump(&mut facets.location, &c.location);
                bump(&mut facets.generation, &c.generation);
            }
            EntityRef::Growth(g) => {
                facets.kinds.growth += 1;
                bump(&mut facets.weather, g.weather.as_str());
            }
            EntityRef::Health(h) => {
                facets.kinds.health += 1;
                bump(&mut facets.issue_type, h.issue_type.as_str());
                bump(&mut facets.severity, h.severity.as_str());
                bump(&mut facets.issue_status, h.status.as_str());
            }
        }
    }

    facets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cultivar, CultivarStatus, HealthIssue, IssueStatus, IssueType, Severity};
    use crate::search::{search, SearchFilters};

    fn cultivar(id: &str, location: &str, status: CultivarStatus) -> Cultivar {
        Cultivar {
            id: id.into(),
            name: format!("Line {}", id),
            generation: "F3".into(),
            location: location.into(),
            year: 2022,
            germination_rate: 55.0,
            growth_score: 2,
            disease_resistance: 2,
            aroma: String::new(),
            note: String::new(),
            status,
            images: Vec::new(),
        }
    }

    #[test]
    fn test_empty_results() {
        let facets = compute_facets(&[]);
        assert_eq!(facets, Facets::default());
    }

    #[test]
    fn test_counts_by_attribute() {
        let cs = vec![
            cultivar("1", "Kagoshima", CultivarStatus::Active),
            cultivar("2", "Kagoshima", CultivarStatus::Discarded),
            cultivar("3", "Uji", CultivarStatus::Active),
        ];
        let hs = vec![HealthIssue {
            id: "h1".into(),
            cultivar_id: "1".into(),
            date: "2024-07-01".parse().unwrap(),
            issue_type: IssueType::Nutrition,
            severity: Severity::Medium,
            description: "yellowing".into(),
            symptoms: Vec::new(),
            cause: None,
            treatment: None,
            status: IssueStatus::InProgress,
            resolved_at: None,
            created_at: None,
            updated_at: None,
        }];

        let results = search(&cs, &[], &hs, &SearchFilters::default());
        let facets = compute_facets(&results);

        assert_eq!(facets.total, 4);
        assert_eq!(facets.kinds.teas, 3);
        assert_eq!(facets.kinds.health, 1);
        assert_eq!(facets.location.get("Kagoshima"), Some(&2));
        assert_eq!(facets.location.get("Uji"), Some(&1));
        assert_eq!(facets.cultivar_status.get("active"), Some(&2));
        assert_eq!(facets.issue_status.get("in_progress"), Some(&1));
        assert!(facets.weather.is_empty());
    }
}
