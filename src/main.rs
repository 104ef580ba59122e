//! # teaplot CLI
//!
//! The `teaplot` binary searches and analyzes tea-cultivar breeding-trial
//! data.
//!
//! ## Usage
//!
//! ```bash
//! teaplot --config ./config/teaplot.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `teaplot search "<query>"` | Ranked faceted search across all records |
//! | `teaplot analyze --entity <kind>` | Custom filters + aggregation |
//! | `teaplot facets` | Count breakdowns over the dataset |
//! | `teaplot history` | Show or clear recent searches |
//! | `teaplot suggest <prefix>` | Query suggestions |
//!
//! ## Examples
//!
//! ```bash
//! # Relevance-ranked search over cultivars, growth and health records
//! teaplot search "yabukita"
//!
//! # Open high-severity health issues, newest first
//! teaplot search "" --category health --severity high --status open --sort date
//!
//! # Median plant height per cultivar, ignoring seedlings under 10cm
//! teaplot analyze --entity growth --value-field height \
//!     --group-by cultivarId --aggregate median --where height:greater_than:10
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use teaplot::analyze::{self, AnalyzeArgs};
use teaplot::config;
use teaplot::facets;
use teaplot::history_cmd;
use teaplot::search::{self, SearchArgs};

/// teaplot: search and analysis for tea-cultivar breeding trials.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/teaplot.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "teaplot",
    about = "teaplot: search and analysis for tea-cultivar breeding trials",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/teaplot.toml")]
    config: PathBuf,

    /// Log progress to stderr (`RUST_LOG` overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search cultivars, growth records, and health issues.
    ///
    /// An empty query lists every record that passes the structural
    /// filters, unscored.
    Search {
        /// Free-text query (may be empty).
        query: String,

        /// `all`, `teas`, `growth`, or `health`.
        #[arg(long)]
        category: Option<String>,

        /// Cultivar status (`active`, `discarded`) or issue status
        /// (`open`, `in_progress`, `resolved`, `recurred`).
        #[arg(long)]
        status: Option<String>,

        /// Cultivar location substring.
        #[arg(long)]
        location: Option<String>,

        /// Exact cultivar generation label.
        #[arg(long)]
        generation: Option<String>,

        /// Health-issue severity: `low`, `medium`, or `high`.
        #[arg(long)]
        severity: Option<String>,

        /// Only records dated on or after this day (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,

        /// Only records dated on or before this day (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,

        /// `relevance`, `date`, `name`, `growthScore`, or `germinationRate`.
        #[arg(long)]
        sort: Option<String>,

        /// `asc` or `desc`.
        #[arg(long)]
        order: Option<String>,

        /// Maximum number of results to print.
        #[arg(long)]
        limit: Option<usize>,

        /// Also print facet counts for the full result set.
        #[arg(long)]
        facets: bool,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Do not record this query in the search history.
        #[arg(long)]
        no_history: bool,
    },

    /// Filter one collection and aggregate a numeric field.
    Analyze {
        /// `teas`, `growth`, or `health`.
        #[arg(long)]
        entity: String,

        /// Numeric field to aggregate (default from config).
        #[arg(long)]
        value_field: Option<String>,

        /// `count`, `sum`, `average`, `min`, `max`, or `median`.
        #[arg(long)]
        aggregate: Option<String>,

        /// Field to group rows by.
        #[arg(long)]
        group_by: Option<String>,

        /// Filter condition `FIELD:OP:VALUE`; repeatable, combined with AND.
        #[arg(long = "where")]
        conditions: Vec<String>,

        /// Output-row field to sort on numerically.
        #[arg(long)]
        sort_by: Option<String>,

        /// `asc` or `desc`.
        #[arg(long)]
        order: Option<String>,

        /// Keep at most this many output rows.
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show facet counts over the dataset.
    Facets {
        /// `all`, `teas`, `growth`, or `health`.
        #[arg(long)]
        category: Option<String>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List recent searches.
    History {
        /// Forget all recorded searches.
        #[arg(long)]
        clear: bool,
    },

    /// Suggest queries matching a prefix.
    Suggest {
        prefix: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Search {
            query,
            category,
            status,
            location,
            generation,
            severity,
            from,
            to,
            sort,
            order,
            limit,
            facets,
            json,
            no_history,
        } => {
            let args = SearchArgs {
                query,
                category,
                status,
                location,
                generation,
                severity,
                from,
                to,
                sort,
                order,
                limit,
                facets,
                json,
                record_history: !no_history,
            };
            search::run_search(&cfg, &args)?;
        }
        Commands::Analyze {
            entity,
            value_field,
            aggregate,
            group_by,
            conditions,
            sort_by,
            order,
            limit,
            json,
        } => {
            let args = AnalyzeArgs {
                entity,
                value_field,
                aggregate,
                group_by,
                conditions,
                sort_by,
                order,
                limit,
                json,
            };
            analyze::run_analyze(&cfg, &args)?;
        }
        Commands::Facets { category, json } => {
            facets::run_facets(&cfg, category.as_deref(), json)?;
        }
        Commands::History { clear } => {
            history_cmd::run_history(&cfg, clear)?;
        }
        Commands::Suggest { prefix } => {
            history_cmd::run_suggest(&cfg, &prefix)?;
        }
    }

    Ok(())
}
