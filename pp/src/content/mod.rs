//! Content document: word lists, static prompts and templates
//!
//! The document is loaded once and only ever read afterwards. Everything the
//! generator needs is reachable from [`ContentDocument`].

mod embedded;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::mode::Mode;

/// Errors that can occur while loading content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read content from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid content document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where a slot draws its candidates from
///
/// In JSON a literal is an array of strings and a reference is a bare string
/// naming one of the document's word lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    Literal(Vec<String>),
    Reference(String),
}

impl SlotValue {
    pub fn literal<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Literal(options.into_iter().map(Into::into).collect())
    }

    pub fn reference(list: impl Into<String>) -> Self {
        Self::Reference(list.into())
    }

    /// Check whether this slot draws from the named word list
    pub fn references(&self, list: &str) -> bool {
        matches!(self, Self::Reference(name) if name == list)
    }
}

/// A prompt pattern with `{name}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub pattern: String,

    #[serde(default)]
    pub slots: BTreeMap<String, SlotValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Template {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            slots: BTreeMap::new(),
            category: None,
        }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: SlotValue) -> Self {
        self.slots.insert(name.into(), value);
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check whether any slot draws from the named word list
    pub fn draws_from(&self, list: &str) -> bool {
        self.slots.values().any(|v| v.references(list))
    }
}

/// Display information for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo<'a> {
    pub key: &'a str,
    pub display_name: &'a str,
    pub description: Option<&'a str>,
    pub static_count: usize,
}

/// The whole content document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentDocument {
    /// Named word lists referenced by template slots
    pub word_lists: BTreeMap<String, Vec<String>>,

    /// Pre-written prompts keyed by category
    pub static_prompts: BTreeMap<String, Vec<String>>,

    /// Base templates
    pub templates: Vec<Template>,

    /// Templates mixed in by drinking mode
    pub drinking_templates: Vec<Template>,

    /// Templates mixed in by challenge mode
    pub challenge_templates: Vec<Template>,

    pub category_display_names: BTreeMap<String, String>,

    pub category_descriptions: BTreeMap<String, String>,
}

impl ContentDocument {
    /// Parse a document from JSON text
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let doc: Self = serde_json::from_str(json)?;
        debug!(
            word_lists = doc.word_lists.len(),
            categories = doc.static_prompts.len(),
            templates = doc.templates.len(),
            "ContentDocument::from_json: parsed"
        );
        Ok(doc)
    }

    /// Load a document from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        debug!(?path, "ContentDocument::load: called");
        let json = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_json(&json)?;
        info!("Loaded content from: {}", path.display());
        Ok(doc)
    }

    /// The document compiled into the binary
    pub fn embedded() -> Result<Self, ContentError> {
        debug!("ContentDocument::embedded: called");
        Self::from_json(embedded::PROMPTS)
    }

    pub fn word_list(&self, name: &str) -> Option<&[String]> {
        self.word_lists.get(name).map(Vec::as_slice)
    }

    /// Templates belonging to a bonus mode
    pub fn mode_templates(&self, mode: Mode) -> &[Template] {
        match mode {
            Mode::Drinking => &self.drinking_templates,
            Mode::Challenge => &self.challenge_templates,
        }
    }

    /// Display name for a category, falling back to the key itself
    pub fn display_name<'a>(&'a self, category: &'a str) -> &'a str {
        self.category_display_names
            .get(category)
            .map(String::as_str)
            .unwrap_or(category)
    }

    /// Selectable categories, in key order
    pub fn categories(&self) -> Vec<CategoryInfo<'_>> {
        self.static_prompts
            .iter()
            .map(|(key, prompts)| CategoryInfo {
                key,
                display_name: self.display_name(key),
                description: self.category_descriptions.get(key).map(String::as_str),
                static_count: prompts.len(),
            })
            .collect()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.static_prompts.contains_key(category)
    }

    /// Total number of static prompts across all categories
    pub fn static_prompt_count(&self) -> usize {
        self.static_prompts.values().map(Vec::len).sum()
    }
}
