//! `teaplot facets`: count breakdowns over the whole dataset.

use anyhow::Result;
use std::collections::BTreeMap;

use teaplot_core::facets::{compute_facets, Facets};
use teaplot_core::search::SearchFilters;

use crate::config::Config;
use crate::dataset::load_dataset;
use crate::search::parse_tag;

pub fn run_facets(config: &Config, category: Option<&str>, json: bool) -> Result<()> {
    let filters = SearchFilters {
        category: match category {
            Some(c) => parse_tag(c, "category")?,
            None => Default::default(),
        },
        ..Default::default()
    };
    let dataset = load_dataset(&config.data.path)?;
    let facets = compute_facets(&dataset.search(&filters));

    if json {
        println!("{}", serde_json::to_string_pretty(&facets)?);
    } else {
        print_facets(&facets);
    }
    Ok(())
}

/// Print facet tables, skipping empty facets.
pub fn print_facets(facets: &Facets) {
    println!("Facets ({} total)", facets.total);
    println!("================");
    println!(
        "  teas: {}   growth: {}   health: {}",
        facets.kinds.teas, facets.kinds.growth, facets.kinds.health
    );

    let tables: [(&str, &BTreeMap<String, usize>); 7] = [
        ("Cultivar status", &facets.cultivar_status),
        ("Location", &facets.location),
        ("Generation", &facets.generation),
        ("Weather", &facets.weather),
        ("Issue type", &facets.issue_type),
        ("Severity", &facets.severity),
        ("Issue status", &facets.issue_status),
    ];

    for (name, counts) in tables {
        if counts.is_empty() {
            continue;
        }
        println!();
        println!("  {}:", name);
        for (value, count) in counts {
            println!("    {:<24} {:>6}", value, count);
        }
    }
    println!();
}
