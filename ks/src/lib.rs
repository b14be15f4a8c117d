//! KeyStore - small persistent key-value store
//!
//! Stores string values under string keys, each with an optional expiry.
//! Expired entries read as absent and are pruned on the next write.
//!
//! # Backends
//!
//! - [`MemoryStore`] - in-process map, nothing survives the process
//! - [`JsonFileStore`] - a single JSON document on disk, rewritten atomically
//!
//! # Layout
//!
//! ```text
//! state.json
//! {
//!   "<key>": { "value": "...", "expires_at": "2026-01-01T00:00:00Z" | null }
//! }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use keystore::{JsonFileStore, KeyValueStore, get_json, set_json};
//!
//! let mut store = JsonFileStore::open("state.json")?;
//! set_json(&mut store, "history", &vec!["first"], None)?;
//! let history: Option<Vec<String>> = get_json(&store, "history")?;
//! ```

mod error;
mod file;
mod store;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use store::{Entry, KeyValueStore, MemoryStore, get_json, set_json};
