//! JSON file backend

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use tracing::{debug, info};

use crate::StoreError;
use crate::store::{Entry, KeyValueStore};

/// A store persisted as one JSON document
///
/// Reads are served from the copy loaded at open or at the last write. Every write
/// takes an exclusive lock on a sibling `.lock` file, re-reads the document, applies
/// the change, and replaces the file through a rename so other processes sharing
/// the file never observe a partial write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, Entry>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories as needed
    ///
    /// A missing or empty file is an empty store; a file that does not parse is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let entries = read_entries(&path)?;
        debug!(?path, entries = entries.len(), "Opened key-value store");
        Ok(Self { path, entries })
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Apply `change` to the on-disk document under the file lock
    fn mutate<F>(&mut self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, Entry>),
    {
        let lock_path = self.lock_path();
        let lock = fs::File::create(&lock_path).map_err(|e| StoreError::io(&lock_path, e))?;
        lock.lock_exclusive().map_err(|source| StoreError::Lock {
            path: lock_path.clone(),
            source,
        })?;

        let mut entries = read_entries(&self.path)?;
        change(&mut entries);

        let now = Utc::now();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        if entries.len() != before {
            info!(pruned = before - entries.len(), "Pruned expired entries");
        }

        let content = serde_json::to_string_pretty(&entries)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, content).map_err(|e| StoreError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        self.entries = entries;
        // Lock is released when `lock` drops
        drop(lock);
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, Entry>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    Ok(serde_json::from_str(&content)?)
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Utc::now();
        Ok(self
            .entries
            .get(key)
            .filter(|e| !e.is_expired(now))
            .map(|e| e.value.clone()))
    }

    fn set(&mut self, key: &str, value: &str, expires_at: Option<DateTime<Utc>>) -> Result<(), StoreError> {
        debug!(%key, value_len = value.len(), "JsonFileStore::set: called");
        self.mutate(|entries| {
            entries.insert(key.to_string(), Entry::new(value, expires_at));
        })
    }

    fn set_many(&mut self, batch: &[(&str, &str)], expires_at: Option<DateTime<Utc>>) -> Result<(), StoreError> {
        debug!(count = batch.len(), "JsonFileStore::set_many: called");
        self.mutate(|entries| {
            for (key, value) in batch {
                entries.insert(key.to_string(), Entry::new(*value, expires_at));
            }
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        debug!(%key, "JsonFileStore::remove: called");
        if !self.entries.contains_key(key) && !self.path.exists() {
            return Ok(());
        }
        self.mutate(|entries| {
            entries.remove(key);
        })
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
