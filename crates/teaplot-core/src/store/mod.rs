//! Key-value storage abstraction.
//!
//! The [`KvStore`] trait is the only persistence surface the core knows
//! about. Values are JSON documents addressed by string keys; the
//! application decides where they live (memory, a JSON file, browser
//! storage).
//!
//! Implementations must be `Send + Sync` so one store can back several
//! callers.

pub mod memory;

use anyhow::Result;
use serde_json::Value;

/// Abstract key-value backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get`](KvStore::get) | Read the value stored under a key |
/// | [`set`](KvStore::set) | Insert or replace a value |
/// | [`remove`](KvStore::remove) | Delete a key (no-op if absent) |
pub trait KvStore: Send + Sync {
    /// Read the value under `key`, or `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Insert or replace the value under `key`.
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Delete `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}
