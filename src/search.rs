//! `teaplot search`: faceted search over the dataset.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use teaplot_core::facets::compute_facets;
use teaplot_core::highlight::{MARK_CLOSE, MARK_OPEN};
use teaplot_core::history::SearchHistory;
use teaplot_core::search::{SearchFilters, SearchResult};

use crate::config::Config;
use crate::dataset::load_dataset;
use crate::facets::print_facets;
use crate::kv_file::JsonFileStore;

/// Command-line options for a search, before validation.
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub query: String,
    pub category: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub generation: Option<String>,
    pub severity: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<usize>,
    pub facets: bool,
    pub json: bool,
    pub record_history: bool,
}

/// Parse a wire tag (`"teas"`, `"growthScore"`, `"high"`) into one of the
/// core's serde enums.
pub fn parse_tag<T: DeserializeOwned>(tag: &str, what: &str) -> Result<T> {
    serde_json::from_value(Value::String(tag.to_string()))
        .with_context(|| format!("Unknown {}: '{}'", what, tag))
}

fn parse_date(s: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("{} must be a YYYY-MM-DD date, got '{}'", flag, s))
}

/// Turn CLI options into [`SearchFilters`], filling sort defaults from config.
pub fn build_filters(config: &Config, args: &SearchArgs) -> Result<SearchFilters> {
    Ok(SearchFilters {
        query: args.query.clone(),
        category: match &args.category {
            Some(c) => parse_tag(c, "category")?,
            None => Default::default(),
        },
        status: args.status.clone(),
        location: args.location.clone(),
        generation: args.generation.clone(),
        date_from: args.from.as_deref().map(|s| parse_date(s, "--from")).transpose()?,
        date_to: args.to.as_deref().map(|s| parse_date(s, "--to")).transpose()?,
        severity: args
            .severity
            .as_deref()
            .map(|s| parse_tag(s, "severity"))
            .transpose()?,
        sort_by: match &args.sort {
            Some(s) => parse_tag(s, "sort field")?,
            None => config.search.default_sort,
        },
        sort_order: match &args.order {
            Some(o) => parse_tag(o, "sort order")?,
            None => config.search.default_order,
        },
    })
}

pub fn run_search(config: &Config, args: &SearchArgs) -> Result<()> {
    let filters = build_filters(config, args)?;
    let dataset = load_dataset(&config.data.path)?;

    let results = dataset.search(&filters);
    let total = results.len();
    let limit = args.limit.unwrap_or(config.search.result_limit);
    let shown = &results[..total.min(limit)];

    if args.record_history && !filters.query.trim().is_empty() {
        let store = JsonFileStore::new(config.data.state_path());
        let mut history = SearchHistory::load(&store, config.search.history_capacity)?;
        history.record(&filters.query);
        history.save(&store)?;
    }

    if args.json {
        let mut out = json!({
            "query": filters.query,
            "total": total,
            "results": shown,
        });
        if args.facets {
            out["facets"] = serde_json::to_value(compute_facets(&results))?;
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    println!("{} result(s), showing {}:", total, shown.len());
    println!();
    for (i, r) in shown.iter().enumerate() {
        print_result(i + 1, r);
    }

    if args.facets {
        print_facets(&compute_facets(&results));
    }

    Ok(())
}

fn print_result(rank: usize, r: &SearchResult<'_>) {
    println!("{}. [{}] {}  (score {})", rank, r.kind.as_str(), r.title, r.score);
    println!("   {}", r.description);
    for h in &r.highlights {
        let shown = h.highlighted.replace(MARK_OPEN, "[").replace(MARK_CLOSE, "]");
        println!("   {}: {}", h.field, shown);
    }
    println!("   id: {}", r.id);
    println!();
}
