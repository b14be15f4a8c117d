//! Game orchestration
//!
//! Ties content, session and preferences together behind the operations a
//! front end needs: generate, flag, switch category or modes, reset.

use keystore::KeyValueStore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::content::ContentDocument;
use crate::mode::{Mode, ModeFrequency};
use crate::pool::build_pool;
use crate::preferences::ModePreferences;
use crate::sampler::{DEFAULT_MAX_ATTEMPTS, GeneratedPrompt, generate_unique};
use crate::session::{Session, SessionState};

/// Result of one generate request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// A new prompt, already recorded in the session
    Prompt(GeneratedPrompt),
    /// Nothing matches the current category and modes
    EmptyPool,
    /// No unseen prompt was found; the shown set has been cleared
    Exhausted,
    /// A generation is already in flight
    Busy,
    /// No content is loaded
    Disabled,
}

/// One player group's game
#[derive(Debug)]
pub struct Game {
    content: Option<ContentDocument>,
    session: Session,
    preferences: ModePreferences,
    category: Option<String>,
    max_attempts: usize,
    busy: bool,
    rng: StdRng,
}

impl Game {
    /// Create a game over `content`, restoring session and preferences from `store`
    ///
    /// Restored preferences are written back so their expiry runs from this game.
    /// `content = None` produces a disabled game on which generate is a no-op.
    pub fn new(content: Option<ContentDocument>, store: Box<dyn KeyValueStore>) -> Self {
        let mut session = Session::load(store);
        let preferences = ModePreferences::load(session.store());
        preferences.save(session.store_mut());
        if content.is_none() {
            warn!("No content loaded, generation disabled");
        }
        Self {
            content,
            session,
            preferences,
            category: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            busy: false,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Use a fixed seed so generation is reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&ContentDocument> {
        self.content.as_ref()
    }

    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    pub fn preferences(&self) -> ModePreferences {
        self.preferences
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Restrict generation to one category, or None for all
    ///
    /// The name may also be a word list; templates drawing from it are then included.
    pub fn set_category(&mut self, category: Option<String>) {
        debug!(?category, "Game::set_category: called");
        if let (Some(name), Some(content)) = (category.as_deref(), self.content.as_ref())
            && !content.has_category(name)
            && !content.word_lists.contains_key(name)
        {
            warn!(%name, "Category not found in content");
        }
        self.category = category;
    }

    /// Change a mode's frequency and persist the preference
    pub fn set_frequency(&mut self, mode: Mode, freq: ModeFrequency) {
        debug!(%mode, %freq, "Game::set_frequency: called");
        self.preferences.set(mode, freq);
        self.preferences.save(self.session.store_mut());
    }

    /// Number of entries the next generation would sample from
    pub fn pool_size(&self) -> usize {
        self.content.as_ref().map_or(0, |content| {
            build_pool(
                content,
                self.category.as_deref(),
                self.preferences.drinking,
                self.preferences.challenge,
            )
            .len()
        })
    }

    /// Claim the busy flag ahead of a generation
    ///
    /// Returns false, and the request should be dropped, when the game is disabled
    /// or another generation has not finished yet.
    pub fn begin_generate(&mut self) -> bool {
        if self.content.is_none() || self.busy {
            debug!(busy = self.busy, "Game::begin_generate: refused");
            return false;
        }
        self.busy = true;
        true
    }

    /// Run the generation claimed by [`Game::begin_generate`] and release the flag
    pub fn finish_generate(&mut self) -> GenerateOutcome {
        let outcome = self.run_generation();
        self.busy = false;
        outcome
    }

    /// Generate the next prompt in one step
    pub fn generate(&mut self) -> GenerateOutcome {
        if !self.begin_generate() {
            return if self.content.is_none() {
                GenerateOutcome::Disabled
            } else {
                GenerateOutcome::Busy
            };
        }
        self.finish_generate()
    }

    fn run_generation(&mut self) -> GenerateOutcome {
        let Some(content) = self.content.as_ref() else {
            return GenerateOutcome::Disabled;
        };

        let pool = build_pool(
            content,
            self.category.as_deref(),
            self.preferences.drinking,
            self.preferences.challenge,
        );
        if pool.is_empty() {
            info!(category = ?self.category, "No prompts available for current selection");
            return GenerateOutcome::EmptyPool;
        }

        let generated = generate_unique(
            &pool,
            content,
            &self.session.state().shown_prompts,
            self.max_attempts,
            &mut self.rng,
        );

        match generated {
            Some(prompt) => {
                self.session.record_accepted(&prompt.text, Some(&prompt.category));
                GenerateOutcome::Prompt(prompt)
            }
            None => {
                info!(
                    shown = self.session.state().shown_prompts.len(),
                    "All prompts seen, starting a fresh round"
                );
                self.session.clear_shown();
                GenerateOutcome::Exhausted
            }
        }
    }

    /// Toggle a prompt in the bad list, returning whether it is now flagged
    pub fn toggle_bad(&mut self, prompt: &str) -> bool {
        self.session.toggle_bad(prompt)
    }

    /// Toggle the most recent prompt, or None if nothing was shown yet
    pub fn downvote_latest(&mut self) -> Option<bool> {
        let latest = self.session.state().latest()?.to_string();
        Some(self.session.toggle_bad(&latest))
    }

    /// Clear the session; mode preferences are kept
    pub fn reset(&mut self) {
        self.session.reset();
    }
}
