//! `teaplot history` and `teaplot suggest`.

use anyhow::Result;

use teaplot_core::history::SearchHistory;
use teaplot_core::suggest::suggest;

use crate::config::Config;
use crate::dataset::load_dataset;
use crate::kv_file::JsonFileStore;

pub fn run_history(config: &Config, clear: bool) -> Result<()> {
    let store = JsonFileStore::new(config.data.state_path());
    let mut history = SearchHistory::load(&store, config.search.history_capacity)?;

    if clear {
        history.clear(&store)?;
        println!("Search history cleared.");
        return Ok(());
    }

    if history.is_empty() {
        println!("No search history.");
        return Ok(());
    }
    for (i, q) in history.entries().iter().enumerate() {
        println!("{:>3}. {}", i + 1, q);
    }
    Ok(())
}

pub fn run_suggest(config: &Config, prefix: &str) -> Result<()> {
    let store = JsonFileStore::new(config.data.state_path());
    let history = SearchHistory::load(&store, config.search.history_capacity)?;
    let dataset = load_dataset(&config.data.path)?;

    let suggestions = suggest(
        prefix,
        &dataset.cultivars,
        history.entries(),
        config.search.suggestion_limit,
    );
    if suggestions.is_empty() {
        println!("No suggestions.");
    }
    for s in suggestions {
        println!("{}", s);
    }
    Ok(())
}
