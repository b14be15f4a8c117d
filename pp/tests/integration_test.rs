//! Integration tests for partyprompt
//!
//! These run whole games against the embedded content and a file-backed store.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::{Duration, Utc};
use keystore::{Entry, JsonFileStore, KeyValueStore};
use partyprompt::{ContentDocument, Game, GenerateOutcome, Mode, ModeFrequency, bad_prompt_report};
use tempfile::TempDir;

fn open_game(path: &Path, seed: u64) -> Game {
    let content = ContentDocument::embedded().expect("embedded content parses");
    let store = JsonFileStore::open(path).expect("Failed to open store");
    Game::new(Some(content), Box::new(store)).with_seed(seed)
}

fn next_text(game: &mut Game) -> String {
    match game.generate() {
        GenerateOutcome::Prompt(prompt) => prompt.text,
        other => panic!("expected a prompt, got {other:?}"),
    }
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_session_survives_restart() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("state.json");

    let shown: Vec<String> = {
        let mut game = open_game(&path, 1);
        (0..3).map(|_| next_text(&mut game)).collect()
    };

    let game = open_game(&path, 2);
    let state = game.session();
    assert_eq!(state.total_generated, 3);
    assert_eq!(state.prompt_history.len(), 3);
    assert_eq!(state.prompt_history[0], shown[2], "history is most recent first");
    for text in &shown {
        assert!(state.shown_prompts.contains(text));
    }
    assert_eq!(state.category_usage.values().sum::<u64>(), 3);
}

#[test]
fn test_restarted_game_does_not_repeat() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("state.json");

    let mut seen = HashSet::new();
    {
        let mut game = open_game(&path, 7);
        game.set_category(Some("theTruthComesOut".to_string()));
        for _ in 0..3 {
            seen.insert(next_text(&mut game));
        }
    }

    let mut game = open_game(&path, 7);
    game.set_category(Some("theTruthComesOut".to_string()));
    for _ in 0..3 {
        let text = next_text(&mut game);
        assert!(seen.insert(text.clone()), "repeated after restart: {text}");
    }
}

#[test]
fn test_reset_keeps_mode_preferences() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("state.json");

    {
        let mut game = open_game(&path, 3);
        game.set_frequency(Mode::Drinking, ModeFrequency::High);
        next_text(&mut game);
        game.downvote_latest();
        game.reset();
    }

    let store = JsonFileStore::open(&path).expect("Failed to open store");
    assert_eq!(store.get("drinkingModeFrequency").unwrap().as_deref(), Some("high"));
    assert_eq!(store.get("challengeModeFrequency").unwrap().as_deref(), Some("off"));
    for key in ["shownPrompts", "promptHistory", "badPrompts", "totalGenerated", "categoryUsage"] {
        assert_eq!(store.get(key).unwrap(), None, "{key} should be cleared");
    }

    let game = open_game(&path, 3);
    assert_eq!(game.preferences().drinking, ModeFrequency::High);
    assert_eq!(game.session().total_generated, 0);
}

#[test]
fn test_starting_a_game_extends_preference_expiry() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("state.json");

    {
        let mut store = JsonFileStore::open(&path).expect("Failed to open store");
        store
            .set("drinkingModeFrequency", "low", Some(Utc::now() + Duration::days(1)))
            .expect("Failed to seed preference");
    }

    let game = open_game(&path, 4);
    assert_eq!(game.preferences().drinking, ModeFrequency::Low);

    let raw = fs::read_to_string(&path).expect("Failed to read store");
    let entries: BTreeMap<String, Entry> = serde_json::from_str(&raw).expect("store is JSON");
    let floor = Utc::now() + Duration::days(364);
    for key in ["drinkingModeFrequency", "challengeModeFrequency"] {
        let expires_at = entries[key].expires_at.expect("preference has an expiry");
        assert!(expires_at > floor, "{key} expiry was not refreshed");
    }
    assert_eq!(entries["drinkingModeFrequency"].value, "low");
}

// =============================================================================
// Flagging and reports
// =============================================================================

#[test]
fn test_flagged_prompts_reach_the_report() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("state.json");

    let first = {
        let mut game = open_game(&path, 11);
        let first = next_text(&mut game);
        assert_eq!(game.downvote_latest(), Some(true));
        let second = next_text(&mut game);
        assert!(game.toggle_bad(&second));
        assert!(!game.toggle_bad(&second));
        first
    };

    let game = open_game(&path, 11);
    assert_eq!(game.session().bad_prompts, vec![first.clone()]);

    let report = bad_prompt_report(&game.session().bad_prompts).expect("one flagged prompt");
    assert!(report.contains(&first));
    assert!(report.ends_with("Total: 1 prompts"));
}

// =============================================================================
// Categories and modes
// =============================================================================

#[test]
fn test_category_filter_with_embedded_content() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut game = open_game(&temp_dir.path().join("state.json"), 5);
    game.set_category(Some("dollarsAndSense".to_string()));

    for _ in 0..3 {
        match game.generate() {
            GenerateOutcome::Prompt(prompt) => {
                assert_eq!(prompt.category, "dollarsAndSense");
                assert_eq!(prompt.mode, None);
            }
            other => panic!("expected a prompt, got {other:?}"),
        }
    }
}

#[test]
fn test_embedded_templates_are_fully_filled() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut game = open_game(&temp_dir.path().join("state.json"), 9);
    game.set_frequency(Mode::Drinking, ModeFrequency::High);
    game.set_frequency(Mode::Challenge, ModeFrequency::High);

    for _ in 0..40 {
        let text = next_text(&mut game);
        assert!(!text.contains('{') && !text.contains('}'), "unfilled slot in: {text}");
    }
}
