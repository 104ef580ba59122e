//! TOML configuration.
//!
//! ```toml
//! [data]
//! path = "./data/trials.json"
//! state_path = "./data/state.json"   # optional
//!
//! [search]
//! default_sort = "relevance"          # relevance | date | name | growthScore | germinationRate
//! default_order = "desc"
//! result_limit = 20
//! history_capacity = 10
//! suggestion_limit = 8
//!
//! [analysis]
//! value_field = "value"
//! default_aggregation = "average"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use teaplot_core::analysis::{AggregationType, DEFAULT_VALUE_FIELD};
use teaplot_core::history::DEFAULT_CAPACITY;
use teaplot_core::models::SortOrder;
use teaplot_core::search::SortField;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// JSON dataset with `cultivars`, `growthRecords`, `healthIssues`.
    pub path: PathBuf,
    /// JSON key-value file for search history.
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}

impl DataConfig {
    /// The configured state file, or `state.json` next to the dataset.
    pub fn state_path(&self) -> PathBuf {
        match &self.state_path {
            Some(p) => p.clone(),
            None => self
                .path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("state.json"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default)]
    pub default_sort: SortField,
    #[serde(default)]
    pub default_order: SortOrder,
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_sort: SortField::default(),
            default_order: SortOrder::default(),
            result_limit: default_result_limit(),
            history_capacity: default_history_capacity(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

fn default_result_limit() -> usize {
    20
}
fn default_history_capacity() -> usize {
    DEFAULT_CAPACITY
}
fn default_suggestion_limit() -> usize {
    8
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_value_field")]
    pub value_field: String,
    #[serde(default)]
    pub default_aggregation: AggregationType,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            value_field: default_value_field(),
            default_aggregation: AggregationType::default(),
        }
    }
}

fn default_value_field() -> String {
    DEFAULT_VALUE_FIELD.to_string()
}

impl Config {
    /// A config with every default and the given dataset path.
    pub fn minimal(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data: DataConfig {
                path: data_path.into(),
                state_path: None,
            },
            search: SearchConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.data.path.as_os_str().is_empty() {
        anyhow::bail!("data.path must not be empty");
    }
    if config.search.result_limit < 1 {
        anyhow::bail!("search.result_limit must be >= 1");
    }
    if config.search.history_capacity < 1 {
        anyhow::bail!("search.history_capacity must be >= 1");
    }
    if config.search.suggestion_limit < 1 {
        anyhow::bail!("search.suggestion_limit must be >= 1");
    }
    if config.analysis.value_field.trim().is_empty() {
        anyhow::bail!("analysis.value_field must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: Config = toml::from_str("[data]\npath = \"trials.json\"\n").unwrap();
        assert_eq!(config.search.result_limit, 20);
        assert_eq!(config.search.default_sort, SortField::Relevance);
        assert_eq!(config.search.default_order, SortOrder::Desc);
        assert_eq!(config.analysis.value_field, "value");
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_sort_field_uses_camel_case() {
        let config: Config = toml::from_str(
            "[data]\npath = \"t.json\"\n[search]\ndefault_sort = \"growthScore\"\ndefault_order = \"asc\"\n",
        )
        .unwrap();
        assert_eq!(config.search.default_sort, SortField::GrowthScore);
        assert_eq!(config.search.default_order, SortOrder::Asc);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config: Config =
            toml::from_str("[data]\npath = \"t.json\"\n[search]\nresult_limit = 0\n").unwrap();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("search.result_limit"));
    }

    #[test]
    fn test_state_path_defaults_next_to_dataset() {
        let config = Config::minimal("/srv/trials/data.json");
        assert_eq!(config.data.state_path(), PathBuf::from("/srv/trials/state.json"));
    }
}
