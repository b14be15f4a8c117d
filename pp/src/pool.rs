//! Pool building
//!
//! A pool is the multiset of prompt sources one generation samples from.
//! Frequencies are expressed by repetition: a mode at `high` contributes four
//! copies of its template group.

use rand::Rng;
use tracing::debug;

use crate::content::{ContentDocument, Template};
use crate::mode::{Mode, ModeFrequency};
use crate::slots::fill_slots;

/// Category tag for base templates that don't declare one
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// What a pool entry renders from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind<'a> {
    Static(&'a str),
    Template(&'a Template),
}

/// One pool entry, borrowed from the content document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptSource<'a> {
    pub kind: SourceKind<'a>,
    pub category: &'a str,
    pub mode: Option<Mode>,
}

impl PromptSource<'_> {
    /// Produce the prompt text; templates are re-filled on every call
    pub fn render<R>(&self, content: &ContentDocument, rng: &mut R) -> String
    where
        R: Rng + ?Sized,
    {
        match self.kind {
            SourceKind::Static(text) => text.to_string(),
            SourceKind::Template(template) => fill_slots(template, content, rng),
        }
    }
}

/// Build the candidate pool for one generation
///
/// Static prompts are included when the filter is unset or names their category.
/// Base templates are included when the filter is unset, equals the template's
/// category, or names a word list one of its slots draws from. Mode templates
/// ignore the filter and are repeated by their frequency weight.
pub fn build_pool<'a>(
    content: &'a ContentDocument,
    category: Option<&str>,
    drinking: ModeFrequency,
    challenge: ModeFrequency,
) -> Vec<PromptSource<'a>> {
    debug!(?category, %drinking, %challenge, "build_pool: called");
    let mut pool = Vec::new();

    for (name, prompts) in &content.static_prompts {
        if category.is_some_and(|c| c != name.as_str()) {
            continue;
        }
        pool.extend(prompts.iter().map(|text| PromptSource {
            kind: SourceKind::Static(text),
            category: name,
            mode: None,
        }));
    }

    for template in &content.templates {
        if !template_matches(template, category) {
            continue;
        }
        pool.push(PromptSource {
            kind: SourceKind::Template(template),
            category: template.category.as_deref().unwrap_or(UNKNOWN_CATEGORY),
            mode: None,
        });
    }

    add_mode_group(&mut pool, content, Mode::Drinking, drinking);
    add_mode_group(&mut pool, content, Mode::Challenge, challenge);

    debug!(pool_size = pool.len(), "build_pool: done");
    pool
}

fn template_matches(template: &Template, category: Option<&str>) -> bool {
    match category {
        None => true,
        Some(filter) => template.category.as_deref() == Some(filter) || template.draws_from(filter),
    }
}

fn add_mode_group<'a>(pool: &mut Vec<PromptSource<'a>>, content: &'a ContentDocument, mode: Mode, freq: ModeFrequency) {
    let templates = content.mode_templates(mode);
    for _ in 0..freq.weight() {
        pool.extend(templates.iter().map(|template| PromptSource {
            kind: SourceKind::Template(template),
            category: mode.name(),
            mode: Some(mode),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SlotValue;
    use proptest::prelude::*;

    fn content() -> ContentDocument {
        let mut doc = ContentDocument::default();
        doc.word_lists
            .insert("places".to_string(), vec!["the zoo".to_string(), "church".to_string()]);
        doc.static_prompts.insert(
            "chaos".to_string(),
            vec!["Who started it?".to_string(), "Who ran?".to_string()],
        );
        doc.static_prompts
            .insert("money".to_string(), vec!["Who never tips?".to_string()]);
        doc.templates = vec![
            Template::new("Who would nap at {place}?")
                .with_slot("place", SlotValue::reference("places"))
                .in_category("money"),
            Template::new("Who is {adj}?")
                .with_slot("adj", SlotValue::literal(["loud", "late"]))
                .in_category("chaos"),
            Template::new("Who is the worst?"),
        ];
        doc.drinking_templates = vec![Template::new("Everyone drinks!"), Template::new("Dictator drinks!")];
        doc.challenge_templates =
            vec![Template::new("Act out {scene}!").with_slot("scene", SlotValue::literal(["a breakup"]))];
        doc
    }

    fn count_mode(pool: &[PromptSource<'_>], mode: Mode) -> usize {
        pool.iter().filter(|s| s.mode == Some(mode)).count()
    }

    #[test]
    fn test_unfiltered_modes_off() {
        let doc = content();
        let pool = build_pool(&doc, None, ModeFrequency::Off, ModeFrequency::Off);
        assert_eq!(pool.len(), doc.static_prompt_count() + doc.templates.len());
        assert!(pool.iter().all(|s| s.mode.is_none()));
    }

    #[test]
    fn test_category_filter() {
        let doc = content();
        let pool = build_pool(&doc, Some("chaos"), ModeFrequency::Off, ModeFrequency::Off);
        // Two static prompts plus the chaos template
        assert_eq!(pool.len(), 3);
        assert!(pool.iter().all(|s| s.category == "chaos"));
    }

    #[test]
    fn test_filter_matches_referenced_word_list() {
        let doc = content();
        let pool = build_pool(&doc, Some("places"), ModeFrequency::Off, ModeFrequency::Off);
        assert_eq!(pool.len(), 1);
        match pool[0].kind {
            SourceKind::Template(t) => assert_eq!(t.pattern, "Who would nap at {place}?"),
            SourceKind::Static(_) => panic!("expected template"),
        }
        // The entry keeps its declared category
        assert_eq!(pool[0].category, "money");
    }

    #[test]
    fn test_unknown_category_tag() {
        let doc = content();
        let pool = build_pool(&doc, None, ModeFrequency::Off, ModeFrequency::Off);
        let untagged = pool
            .iter()
            .find(|s| matches!(s.kind, SourceKind::Template(t) if t.category.is_none()))
            .unwrap();
        assert_eq!(untagged.category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn test_unmatched_filter_modes_off_is_empty() {
        let doc = content();
        let pool = build_pool(&doc, Some("nothing-here"), ModeFrequency::Off, ModeFrequency::Off);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_mode_groups_ignore_filter() {
        let doc = content();
        let pool = build_pool(&doc, Some("nothing-here"), ModeFrequency::High, ModeFrequency::Low);
        assert_eq!(count_mode(&pool, Mode::Drinking), 4 * doc.drinking_templates.len());
        assert_eq!(count_mode(&pool, Mode::Challenge), doc.challenge_templates.len());
        assert_eq!(pool.len(), 4 * 2 + 1);
        for source in &pool {
            assert_eq!(source.category, source.mode.unwrap().name());
        }
    }

    #[test]
    fn test_single_drinking_template_at_med() {
        let mut doc = content();
        doc.drinking_templates = vec![Template::new("Everyone drinks!")];
        for filter in [None, Some("chaos"), Some("money"), Some("nothing-here")] {
            let pool = build_pool(&doc, filter, ModeFrequency::Med, ModeFrequency::Off);
            let copies = pool
                .iter()
                .filter(|s| matches!(s.kind, SourceKind::Template(t) if t.pattern == "Everyone drinks!"))
                .count();
            assert_eq!(copies, 2, "filter {filter:?}");
        }
    }

    #[test]
    fn test_render_static_passes_through() {
        let doc = content();
        let source = PromptSource {
            kind: SourceKind::Static("Who never tips?"),
            category: "money",
            mode: None,
        };
        let mut rng = rand::rng();
        assert_eq!(source.render(&doc, &mut rng), "Who never tips?");
    }

    fn frequency() -> impl Strategy<Value = ModeFrequency> {
        prop::sample::select(ModeFrequency::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_mode_weight_adds_exact_copies(
            drinking in frequency(),
            challenge in frequency(),
            filter in prop::option::of(prop::sample::select(vec!["chaos", "money", "places", "nothing-here"])),
        ) {
            let doc = content();
            let base = build_pool(&doc, filter, ModeFrequency::Off, ModeFrequency::Off).len();
            let pool = build_pool(&doc, filter, drinking, challenge);
            prop_assert_eq!(
                pool.len(),
                base + drinking.weight() * doc.drinking_templates.len()
                    + challenge.weight() * doc.challenge_templates.len()
            );
        }
    }
}
