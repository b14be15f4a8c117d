//! partyprompt - party-game prompt generator
//!
//! Draws "who in the room would..." prompts from a content document of static
//! prompts, slot templates and word lists. A session remembers what was shown so
//! nothing repeats until every prompt has been seen, and players can flag prompts
//! that fell flat for export as a report.
//!
//! # Flow
//!
//! ```text
//! ContentDocument ──build_pool──▶ [PromptSource] ──generate_unique──▶ GeneratedPrompt
//!        ▲                  ▲                          │
//!   category filter   ModePreferences             Session (KeyValueStore)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use keystore::MemoryStore;
//! use partyprompt::{ContentDocument, Game, GenerateOutcome};
//!
//! let content = ContentDocument::embedded()?;
//! let mut game = Game::new(Some(content), Box::new(MemoryStore::new()));
//! if let GenerateOutcome::Prompt(prompt) = game.generate() {
//!     println!("{}", prompt.text);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod content;
pub mod display;
pub mod game;
pub mod mode;
pub mod pool;
pub mod preferences;
pub mod repl;
pub mod report;
pub mod sampler;
pub mod session;
pub mod slots;
pub mod stats;

pub use content::{ContentDocument, ContentError, SlotValue, Template};
pub use game::{Game, GenerateOutcome};
pub use mode::{Mode, ModeFrequency};
pub use pool::{PromptSource, SourceKind, build_pool};
pub use preferences::ModePreferences;
pub use report::bad_prompt_report;
pub use sampler::{DEFAULT_MAX_ATTEMPTS, GeneratedPrompt, generate_unique};
pub use session::{HISTORY_LIMIT, Session, SessionState};
pub use slots::fill_slots;
pub use stats::{most_frequent_category, total_possible_prompts};
