//! Slot filling
//!
//! Replaces each `{name}` placeholder in a template pattern with one value drawn
//! from the slot's candidates. Placeholders that cannot be resolved are left in
//! the output as written.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::content::{ContentDocument, SlotValue, Template};

/// Render `template` by filling every placeholder from `content`
///
/// Each occurrence is drawn independently, so a name used twice may receive two
/// different values. Identical RNG state yields identical output.
pub fn fill_slots<R>(template: &Template, content: &ContentDocument, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let mut out = String::with_capacity(template.pattern.len() + 32);
    let mut rest = template.pattern.as_str();

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(['{', '}']) else {
            break;
        };

        // "{}" or a second "{" before the closing brace: copy through and rescan
        if close == 0 || after[close..].starts_with('{') {
            out.push_str(&rest[..open + 1 + close]);
            rest = &after[close..];
            continue;
        }

        let name = &after[..close];
        out.push_str(&rest[..open]);
        match resolve(template, name, content, rng) {
            Some(value) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Pick a value for one placeholder, or None if it has nothing to draw from
fn resolve<'a, R>(template: &'a Template, name: &str, content: &'a ContentDocument, rng: &mut R) -> Option<&'a str>
where
    R: Rng + ?Sized,
{
    let choices = match template.slots.get(name) {
        Some(SlotValue::Literal(options)) => options.as_slice(),
        Some(SlotValue::Reference(list)) => match content.word_list(list) {
            Some(words) => words,
            None => {
                debug!(%name, %list, "fill_slots: word list not found, leaving placeholder");
                return None;
            }
        },
        None => {
            debug!(%name, "fill_slots: no slot for placeholder");
            return None;
        }
    };

    choices.choose(rng).map(String::as_str)
}
