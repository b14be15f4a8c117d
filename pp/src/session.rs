//! Session state and its persistence
//!
//! [`SessionState`] holds what one play session has accumulated. [`Session`]
//! binds it to a [`KeyValueStore`] and writes each change through. Store
//! failures are logged and never fail the operation that triggered them.

use std::collections::{BTreeMap, HashSet};

use keystore::{KeyValueStore, get_json, set_json};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Number of prompts kept in the history
pub const HISTORY_LIMIT: usize = 50;

/// Store keys for session data
pub mod keys {
    pub const SHOWN_PROMPTS: &str = "shownPrompts";
    pub const PROMPT_HISTORY: &str = "promptHistory";
    pub const BAD_PROMPTS: &str = "badPrompts";
    pub const TOTAL_GENERATED: &str = "totalGenerated";
    pub const CATEGORY_USAGE: &str = "categoryUsage";

    /// Every key cleared by a session reset
    pub const SESSION: [&str; 5] = [SHOWN_PROMPTS, PROMPT_HISTORY, BAD_PROMPTS, TOTAL_GENERATED, CATEGORY_USAGE];
}

/// What a session has accumulated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Rendered prompts shown since the last reset or exhaustion
    pub shown_prompts: HashSet<String>,
    /// Most recent first, at most [`HISTORY_LIMIT`] entries
    pub prompt_history: Vec<String>,
    /// Prompts the players flagged
    pub bad_prompts: Vec<String>,
    pub total_generated: u64,
    pub category_usage: BTreeMap<String, u64>,
}

impl SessionState {
    /// Account for a prompt that was just shown
    pub fn record_accepted(&mut self, prompt: &str, category: Option<&str>) {
        self.shown_prompts.insert(prompt.to_string());

        self.prompt_history.insert(0, prompt.to_string());
        self.prompt_history.truncate(HISTORY_LIMIT);

        self.total_generated += 1;

        if let Some(category) = category {
            *self.category_usage.entry(category.to_string()).or_insert(0) += 1;
        }
    }

    /// Flip a prompt's membership in the bad list, returning whether it is now bad
    pub fn toggle_bad(&mut self, prompt: &str) -> bool {
        if let Some(pos) = self.bad_prompts.iter().position(|p| p == prompt) {
            self.bad_prompts.remove(pos);
            false
        } else {
            self.bad_prompts.push(prompt.to_string());
            true
        }
    }

    pub fn is_bad(&self, prompt: &str) -> bool {
        self.bad_prompts.iter().any(|p| p == prompt)
    }

    /// The most recently shown prompt
    pub fn latest(&self) -> Option<&str> {
        self.prompt_history.first().map(String::as_str)
    }

    fn shown_sorted(&self) -> Vec<&str> {
        let mut shown: Vec<&str> = self.shown_prompts.iter().map(String::as_str).collect();
        shown.sort_unstable();
        shown
    }

    /// Encoded values of every key `record_accepted` changes
    fn accepted_batch(&self, with_usage: bool) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut batch = vec![
            (keys::SHOWN_PROMPTS, serde_json::to_string(&self.shown_sorted())?),
            (keys::PROMPT_HISTORY, serde_json::to_string(&self.prompt_history)?),
            (keys::TOTAL_GENERATED, serde_json::to_string(&self.total_generated)?),
        ];
        if with_usage {
            batch.push((keys::CATEGORY_USAGE, serde_json::to_string(&self.category_usage)?));
        }
        Ok(batch)
    }
}

/// Session state backed by a store
pub struct Session {
    state: SessionState,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("state", &self.state).finish_non_exhaustive()
    }
}

impl Session {
    /// Restore a session from `store`
    ///
    /// Each field falls back to its empty value when its key is missing or unreadable.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let state = SessionState {
            shown_prompts: load_or_default::<Vec<String>>(store.as_ref(), keys::SHOWN_PROMPTS)
                .into_iter()
                .collect(),
            prompt_history: {
                let mut history: Vec<String> = load_or_default(store.as_ref(), keys::PROMPT_HISTORY);
                history.truncate(HISTORY_LIMIT);
                history
            },
            bad_prompts: load_or_default(store.as_ref(), keys::BAD_PROMPTS),
            total_generated: load_counter(store.as_ref(), keys::TOTAL_GENERATED),
            category_usage: load_or_default(store.as_ref(), keys::CATEGORY_USAGE),
        };
        debug!(
            shown = state.shown_prompts.len(),
            history = state.prompt_history.len(),
            total = state.total_generated,
            "Session::load: restored"
        );
        Self { state, store }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    /// Record a shown prompt and persist the affected keys in one batch
    pub fn record_accepted(&mut self, prompt: &str, category: Option<&str>) {
        debug!(%prompt, ?category, "Session::record_accepted: called");
        self.state.record_accepted(prompt, category);

        let batch = match self.state.accepted_batch(category.is_some()) {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, "Failed to encode session state");
                return;
            }
        };
        let pairs: Vec<(&str, &str)> = batch.iter().map(|(key, value)| (*key, value.as_str())).collect();
        if let Err(e) = self.store.set_many(&pairs, None) {
            warn!(error = %e, "Failed to persist accepted prompt");
        }
    }

    /// Toggle a prompt in the bad list and persist it
    pub fn toggle_bad(&mut self, prompt: &str) -> bool {
        let now_bad = self.state.toggle_bad(prompt);
        debug!(%prompt, now_bad, "Session::toggle_bad: toggled");
        save(self.store.as_mut(), keys::BAD_PROMPTS, &self.state.bad_prompts);
        now_bad
    }

    /// Forget which prompts were shown, keeping history and counters
    pub fn clear_shown(&mut self) {
        debug!(cleared = self.state.shown_prompts.len(), "Session::clear_shown: called");
        self.state.shown_prompts.clear();
        save(self.store.as_mut(), keys::SHOWN_PROMPTS, &Vec::<String>::new());
    }

    /// Clear everything the session accumulated, in memory and in the store
    pub fn reset(&mut self) {
        self.state = SessionState::default();
        for key in keys::SESSION {
            if let Err(e) = self.store.remove(key) {
                warn!(%key, error = %e, "Failed to remove session key");
            }
        }
        info!("Session reset");
    }
}

fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match get_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) if e.is_decode() => {
            warn!(%key, error = %e, "Stored session value is malformed, using default");
            T::default()
        }
        Err(e) => {
            warn!(%key, error = %e, "Failed to load session key, using default");
            T::default()
        }
    }
}

/// Counters may have been written as a JSON number or as a quoted decimal string
fn load_counter(store: &dyn KeyValueStore, key: &str) -> u64 {
    let value: serde_json::Value = match get_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => return 0,
        Err(e) => {
            warn!(%key, error = %e, "Failed to load counter, using 0");
            return 0;
        }
    };

    let parsed = match &value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        warn!(%key, %value, "Counter is not a non-negative integer, using 0");
        0
    })
}

fn save<T>(store: &mut dyn KeyValueStore, key: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    if let Err(e) = set_json(store, key, value, None) {
        warn!(%key, error = %e, "Failed to persist session key");
    }
}
