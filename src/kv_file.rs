//! JSON-file [`KvStore`] backend.
//!
//! The whole store is one JSON object on disk. Every `set`/`remove`
//! reads the file, applies the change, and rewrites it. A missing file
//! reads as an empty store.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use teaplot_core::store::KvStore;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file: {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", self.path.display()))?;
        match value {
            Value::Object(map) => Ok(map),
            _ => bail!(
                "State file {} must contain a JSON object",
                self.path.display()
            ),
        }
    }

    fn write_all(&self, map: Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&Value::Object(map))?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value);
        self.write_all(map)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.read_all()?;
        if map.remove(key).is_some() {
            self.write_all(map)?;
        }
        Ok(())
    }
}
