//! Embedded content
//!
//! The default content document, compiled into the binary so the generator
//! works without any files on disk.

/// Default content document (JSON)
pub const PROMPTS: &str = include_str!("../../content/prompts.json");
