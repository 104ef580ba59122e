//! In-memory [`KvStore`] implementation for tests and WASM targets.
//!
//! Uses a `HashMap` behind `std::sync::RwLock` for thread safety.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use serde_json::Value;

use super::KvStore;

/// In-memory store; contents vanish with the value.
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_remove() {
        let store = InMemoryStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.set("k", json!(["a", "b"])).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!(["a", "b"])));
        assert_eq!(store.len(), 1);

        store.set("k", json!([])).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!([])));

        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = InMemoryStore::default();
        assert!(store.remove("never-set").is_ok());
    }
}
