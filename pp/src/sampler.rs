//! Uniqueness sampler
//!
//! Rejection sampling over a pool: draw a source, render it, keep it if it hasn't
//! been shown yet. The attempt budget bounds the loop, so a pool that is nearly or
//! fully used up is declared exhausted rather than searched forever. With few
//! combinations left the declaration can come early; that trade is accepted.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use tracing::debug;

use crate::content::ContentDocument;
use crate::mode::Mode;
use crate::pool::PromptSource;

/// Default number of draws before declaring exhaustion
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// A rendered prompt and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedPrompt {
    pub text: String,
    pub category: String,
    pub mode: Option<Mode>,
}

/// Draw a prompt that is not in `seen`
///
/// Returns None when the pool is empty or when `max_attempts` draws all produced
/// already-seen text. Callers tell the two apart by checking the pool first.
pub fn generate_unique<R>(
    pool: &[PromptSource<'_>],
    content: &ContentDocument,
    seen: &HashSet<String>,
    max_attempts: usize,
    rng: &mut R,
) -> Option<GeneratedPrompt>
where
    R: Rng + ?Sized,
{
    debug!(pool_size = pool.len(), seen = seen.len(), max_attempts, "generate_unique: called");
    if pool.is_empty() {
        debug!("generate_unique: empty pool");
        return None;
    }

    for attempt in 0..max_attempts {
        let source = pool.choose(rng)?;
        let text = source.render(content, rng);
        if !seen.contains(&text) {
            debug!(attempt, category = source.category, "generate_unique: found unseen prompt");
            return Some(GeneratedPrompt {
                text,
                category: source.category.to_string(),
                mode: source.mode,
            });
        }
    }

    debug!(max_attempts, "generate_unique: attempt budget spent, exhausted");
    None
}
