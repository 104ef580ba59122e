//! # teaplot
//!
//! A local-first record keeper for tea-cultivar breeding trials.
//!
//! teaplot loads cultivars, growth records, and health issues from a JSON
//! dataset and answers two kinds of questions over them: ranked faceted
//! search across all three collections, and ad-hoc numeric analysis
//! (custom filters, group-by aggregation, summary statistics, insights).
//! The algorithms live in [`teaplot_core`]; this crate supplies config,
//! data loading, persisted search history, and the CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────────────┐   ┌──────────┐
//! │ JSON dataset│──▶│ teaplot-core          │──▶│   CLI    │
//! │ (caller)    │   │ search / filter / agg │   │ teaplot  │
//! └─────────────┘   └──────────┬───────────┘   └──────────┘
//!                              │
//!                       ┌──────▼──────┐
//!                       │ state.json  │  search history
//!                       └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! teaplot search "yabukita"
//! teaplot search "" --category health --severity high --sort date
//! teaplot analyze --entity growth --value-field height --group-by cultivarId --aggregate median
//! teaplot facets
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`dataset`] | JSON dataset loading and validation |
//! | [`kv_file`] | JSON-file key-value store |
//! | [`search`] | `search` command |
//! | [`analyze`] | `analyze` command |
//! | [`facets`] | `facets` command |
//! | [`history_cmd`] | `history` and `suggest` commands |

pub mod analyze;
pub mod config;
pub mod dataset;
pub mod facets;
pub mod history_cmd;
pub mod kv_file;
pub mod search;
