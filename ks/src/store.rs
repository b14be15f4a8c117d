//! Store trait, entry type and the in-memory backend

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::StoreError;

/// A stored value with its optional expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Raw string value
    pub value: String,
    /// When the entry stops being readable (None = never)
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    pub fn new(value: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Check whether the entry has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Persistence port for string key-value pairs
///
/// Implementations must treat expired entries as absent.
pub trait KeyValueStore {
    /// Read the live value for `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous entry
    fn set(&mut self, key: &str, value: &str, expires_at: Option<DateTime<Utc>>) -> Result<(), StoreError>;

    /// Write several values that share one expiry
    ///
    /// Backends that can should apply the whole batch in a single write, so a
    /// failure leaves either all of the values or none of them.
    fn set_many(&mut self, batch: &[(&str, &str)], expires_at: Option<DateTime<Utc>>) -> Result<(), StoreError> {
        for (key, value) in batch {
            self.set(key, value, expires_at)?;
        }
        Ok(())
    }

    /// Remove `key` if present
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// List live keys in sorted order
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Read `key` and decode it as JSON
pub fn get_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode `value` as JSON and write it under `key`
pub fn set_json<T, S>(store: &mut S, key: &str, value: &T, expires_at: Option<DateTime<Utc>>) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw, expires_at)
}

/// In-memory store, used for tests and when no store path is configured
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Utc::now();
        Ok(self
            .entries
            .get(key)
            .filter(|e| !e.is_expired(now))
            .map(|e| e.value.clone()))
    }

    fn set(&mut self, key: &str, value: &str, expires_at: Option<DateTime<Utc>>) -> Result<(), StoreError> {
        debug!(%key, "MemoryStore::set: called");
        self.entries.insert(key.to_string(), Entry::new(value, expires_at));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        debug!(%key, "MemoryStore::remove: called");
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let now = Utc::now();
        Ok(self
            .entries
            .iter()
            .filter(|(_, e)| !e.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
