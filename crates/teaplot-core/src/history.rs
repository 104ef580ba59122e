//! Recent search queries.
//!
//! [`SearchHistory`] is an explicit context object: the caller loads it
//! from a [`KvStore`], records queries, and saves it back. There is no
//! process-wide history.

use anyhow::Result;
use serde_json::Value;

use crate::store::KvStore;

/// Storage key holding the history as a JSON array of strings.
pub const HISTORY_KEY: &str = "search_history";

pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHistory {
    capacity: usize,
    entries: Vec<String>,
}

impl SearchHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    /// Load the history stored under [`HISTORY_KEY`].
    ///
    /// A missing key yields an empty history. A payload that is not an
    /// array of strings is discarded with a warning.
    pub fn load(store: &dyn KvStore, capacity: usize) -> Result<Self> {
        let mut history = Self::new(capacity);
        match store.get(HISTORY_KEY)? {
            None => {}
            Some(value) => match serde_json::from_value::<Vec<String>>(value) {
                Ok(entries) => {
                    history.entries = entries;
                    history.entries.truncate(history.capacity);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed search history");
                }
            },
        }
        Ok(history)
    }

    pub fn save(&self, store: &dyn KvStore) -> Result<()> {
        store.set(
            HISTORY_KEY,
            Value::Array(self.entries.iter().cloned().map(Value::String).collect()),
        )
    }

    /// Forget every entry, in memory and in `store`.
    pub fn clear(&mut self, store: &dyn KvStore) -> Result<()> {
        self.entries.clear();
        store.remove(HISTORY_KEY)
    }

    /// Record `query` as the most recent search.
    ///
    /// Blank queries are ignored. A case-insensitive duplicate moves to
    /// the front instead of appearing twice.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        let lower = query.to_lowercase();
        self.entries.retain(|e| e.to_lowercase() != lower);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.capacity);
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
