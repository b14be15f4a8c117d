//! Mode frequency preferences
//!
//! Preferences are stored apart from session data: each mode's frequency is kept
//! under its own key with a one-year expiry, and a session reset leaves them alone.

use chrono::{Duration, Utc};
use keystore::KeyValueStore;
use tracing::{debug, warn};

use crate::mode::{Mode, ModeFrequency};

/// How long a saved preference stays valid
pub const PREFERENCE_TTL_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModePreferences {
    pub drinking: ModeFrequency,
    pub challenge: ModeFrequency,
}

impl ModePreferences {
    /// Read both preferences, treating anything missing or unrecognised as `off`
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let prefs = Self {
            drinking: load_frequency(store, Mode::Drinking),
            challenge: load_frequency(store, Mode::Challenge),
        };
        debug!(?prefs, "ModePreferences::load: loaded");
        prefs
    }

    /// Write both preferences with a fresh expiry
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let expires_at = Utc::now() + Duration::days(PREFERENCE_TTL_DAYS);
        for mode in Mode::ALL {
            let key = mode.preference_key();
            if let Err(e) = store.set(key, self.frequency(mode).name(), Some(expires_at)) {
                warn!(%key, error = %e, "Failed to save mode preference");
            }
        }
    }

    pub fn frequency(&self, mode: Mode) -> ModeFrequency {
        match mode {
            Mode::Drinking => self.drinking,
            Mode::Challenge => self.challenge,
        }
    }

    pub fn set(&mut self, mode: Mode, freq: ModeFrequency) {
        match mode {
            Mode::Drinking => self.drinking = freq,
            Mode::Challenge => self.challenge = freq,
        }
    }
}

fn load_frequency(store: &dyn KeyValueStore, mode: Mode) -> ModeFrequency {
    let key = mode.preference_key();
    match store.get(key) {
        // Accept the bare word as well as a JSON-quoted one
        Ok(Some(raw)) => raw.trim().trim_matches('"').parse().unwrap_or_else(|e| {
            warn!(%key, error = %e, "Ignoring unrecognised mode preference");
            ModeFrequency::Off
        }),
        Ok(None) => ModeFrequency::Off,
        Err(e) => {
            warn!(%key, error = %e, "Failed to load mode preference");
            ModeFrequency::Off
        }
    }
}
