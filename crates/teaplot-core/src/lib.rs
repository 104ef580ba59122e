//! # teaplot core
//!
//! Shared, WASM-safe logic for teaplot: the breeding-trial data model,
//! relevance scoring, highlighting, faceted search, custom filters,
//! aggregation, and the key-value store abstraction.
//!
//! This crate contains no filesystem I/O. Every query operation is a pure
//! function of caller-owned collections and returns freshly allocated
//! results; nothing is cached between calls.

pub mod analysis;
pub mod facets;
pub mod filter;
pub mod highlight;
pub mod history;
pub mod models;
pub mod score;
pub mod search;
pub mod store;
pub mod suggest;
