//! Loading trial data from a JSON file.
//!
//! The dataset is one JSON object holding the three entity collections.
//! Any collection may be omitted. Out-of-range values and dangling
//! cultivar references are reported as warnings; they never fail the load.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use teaplot_core::models::{Cultivar, GrowthRecord, HealthIssue};
use teaplot_core::search::{search, SearchFilters, SearchResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub cultivars: Vec<Cultivar>,
    pub growth_records: Vec<GrowthRecord>,
    pub health_issues: Vec<HealthIssue>,
}

impl Dataset {
    /// Run a faceted search over this dataset.
    pub fn search(&self, filters: &SearchFilters) -> Vec<SearchResult<'_>> {
        search(
            &self.cultivars,
            &self.growth_records,
            &self.health_issues,
            filters,
        )
    }

    /// Human-readable problems with the data.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let ids: HashSet<&str> = self.cultivars.iter().map(|c| c.id.as_str()).collect();

        for c in &self.cultivars {
            if !(0.0..=100.0).contains(&c.germination_rate) {
                warnings.push(format!(
                    "cultivar {}: germination rate {} outside 0-100",
                    c.id, c.germination_rate
                ));
            }
            if !(1..=5).contains(&c.growth_score) {
                warnings.push(format!(
                    "cultivar {}: growth score {} outside 1-5",
                    c.id, c.growth_score
                ));
            }
            if !(1..=5).contains(&c.disease_resistance) {
                warnings.push(format!(
                    "cultivar {}: disease resistance {} outside 1-5",
                    c.id, c.disease_resistance
                ));
            }
        }

        for g in &self.growth_records {
            if g.height < 0.0 {
                warnings.push(format!("growth record {}: negative height {}", g.id, g.height));
            }
            if !ids.contains(g.cultivar_id.as_str()) {
                warnings.push(format!(
                    "growth record {}: unknown cultivar {}",
                    g.id, g.cultivar_id
                ));
            }
        }

        for h in &self.health_issues {
            if !ids.contains(h.cultivar_id.as_str()) {
                warnings.push(format!(
                    "health issue {}: unknown cultivar {}",
                    h.id, h.cultivar_id
                ));
            }
        }

        warnings
    }
}

/// Read and parse the dataset at `path`, logging validation warnings.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
    let dataset: Dataset = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset: {}", path.display()))?;

    for warning in dataset.validate() {
        tracing::warn!("{}", warning);
    }
    tracing::info!(
        cultivars = dataset.cultivars.len(),
        growth_records = dataset.growth_records.len(),
        health_issues = dataset.health_issues.len(),
        "dataset loaded"
    );

    Ok(dataset)
}
