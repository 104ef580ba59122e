//! Query suggestions for the search box.
//!
//! Candidates come from the search history first, then from cultivar
//! names, locations, generations, and aromas. Matching is a
//! case-insensitive substring test on the typed prefix.

use std::collections::HashSet;

use crate::models::Cultivar;

pub fn suggest(prefix: &str, cultivars: &[Cultivar], history: &[String], limit: usize) -> Vec<String> {
    let needle = prefix.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }

    let candidates = history
        .iter()
        .map(String::as_str)
        .chain(cultivars.iter().map(|c| c.name.as_str()))
        .chain(cultivars.iter().map(|c| c.location.as_str()))
        .chain(cultivars.iter().map(|c| c.generation.as_str()))
        .chain(cultivars.iter().map(|c| c.aroma.as_str()));

    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for candidate in candidates {
        let lower = candidate.to_lowercase();
        if candidate.is_empty() || !lower.contains(&needle) || !seen.insert(lower) {
            continue;
        }
        out.push(candidate.to_string());
        if out.len() == limit {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CultivarStatus;

    fn cultivar(name: &str, location: &str) -> Cultivar {
        Cultivar {
            id: name.to_lowercase(),
            name: name.into(),
            generation: "F1".into(),
            location: location.into(),
            year: 2020,
            germination_rate: 50.0,
            growth_score: 3,
            disease_resistance: 3,
            aroma: "sweet".into(),
            note: String::new(),
            status: CultivarStatus::Active,
            images: Vec::new(),
        }
    }

    #[test]
    fn test_history_comes_first_and_dedupes() {
        let cs = vec![cultivar("Sayamakaori", "Sayama"), cultivar("Yabukita", "Shizuoka")];
        let history = vec!["sayamakaori".to_string()];
        let out = suggest("saya", &cs, &history, 10);
        assert_eq!(out, vec!["sayamakaori", "Sayama"]);
    }

    #[test]
    fn test_blank_prefix_and_limit() {
        let cs = vec![cultivar("A1", "X"), cultivar("A2", "Y"), cultivar("A3", "Z")];
        assert!(suggest("  ", &cs, &[], 10).is_empty());
        assert_eq!(suggest("a", &cs, &[], 2), vec!["A1", "A2"]);
    }
}
