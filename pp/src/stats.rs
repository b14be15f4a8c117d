//! Session and content statistics

use std::collections::BTreeMap;

use crate::content::{ContentDocument, SlotValue};

/// Number of distinct prompts the base content can produce
///
/// Static prompts count once each. A template contributes the product of its
/// slots' candidate counts; a slot whose word list is missing counts as one,
/// since it renders as the bare placeholder. Mode templates are not counted.
pub fn total_possible_prompts(content: &ContentDocument) -> u128 {
    let statics = content.static_prompt_count() as u128;

    let templates = content.templates.iter().fold(0u128, |total, template| {
        let combinations = template.slots.values().fold(1u128, |product, slot| {
            let options = match slot {
                SlotValue::Literal(options) => options.len(),
                SlotValue::Reference(list) => content.word_list(list).map_or(1, <[String]>::len),
            };
            product.saturating_mul(options as u128)
        });
        total.saturating_add(combinations)
    });

    statics.saturating_add(templates)
}

/// Display name of the most used category, or None before anything was generated
///
/// Ties go to the category that sorts first.
pub fn most_frequent_category(usage: &BTreeMap<String, u64>, content: &ContentDocument) -> Option<String> {
    usage
        .iter()
        .filter(|(_, count)| **count > 0)
        .fold(None, |best: Option<(&String, u64)>, (name, &count)| match best {
            Some((_, top)) if top >= count => best,
            _ => Some((name, count)),
        })
        .map(|(name, _)| content.display_name(name).to_string())
}
