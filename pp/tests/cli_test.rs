//! CLI tests for the pp binary
//!
//! Each test gets its own config pointing the store and log directory into a
//! temp dir, so runs never touch the user's data.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    dir: TempDir,
    config: PathBuf,
}

impl Env {
    fn new() -> Self {
        Self::with_extra("")
    }

    fn with_extra(extra: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = dir.path().join("partyprompt.yml");
        let yaml = format!(
            "store-path: \"{}\"\nlog-dir: \"{}\"\ntransition-delay-ms: 0\n{}",
            dir.path().join("state.json").display(),
            dir.path().join("logs").display(),
            extra
        );
        fs::write(&config, yaml).expect("Failed to write config");
        Self { dir, config }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn pp(&self) -> Command {
        let mut cmd = Command::cargo_bin("pp").expect("binary builds");
        cmd.arg("--config").arg(&self.config).env("NO_COLOR", "1");
        cmd
    }
}

#[test]
fn test_next_prints_a_prompt() {
    let env = Env::new();
    env.pp()
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_next_with_category_short_flag() {
    let env = Env::new();
    env.pp()
        .args(["next", "-k", "dollarsAndSense", "-n", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dollars & Sense"));
}

#[test]
fn test_stats_counts_generated_prompts() {
    let env = Env::new();
    env.pp().args(["next", "-n", "2"]).assert().success();
    env.pp()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Prompts generated:   2"))
        .stdout(predicate::str::contains("Current pool:"));
}

#[test]
fn test_categories_lists_embedded_categories() {
    let env = Env::new();
    env.pp()
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("dollarsAndSense"))
        .stdout(predicate::str::contains("Dollars & Sense"));
}

#[test]
fn test_report_when_nothing_flagged() {
    let env = Env::new();
    env.pp()
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("No bad prompts"));
}

#[test]
fn test_bad_then_report() {
    let env = Env::new();
    env.pp()
        .args(["bad", "Who is always late?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Flagged"));
    env.pp()
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Who is always late?"))
        .stdout(predicate::str::contains("Total: 1 prompts"));
}

#[test]
fn test_report_to_file() {
    let env = Env::new();
    let out = env.path().join("report.txt");
    env.pp().args(["bad", "Who is always late?"]).assert().success();
    env.pp().arg("report").arg("-o").arg(&out).assert().success();

    let written = fs::read_to_string(&out).expect("report written");
    assert!(written.starts_with("Subject: Bad People - Bad Prompts List"));
    assert!(written.contains("Who is always late?"));
}

#[test]
fn test_bad_without_history() {
    let env = Env::new();
    env.pp()
        .arg("bad")
        .assert()
        .success()
        .stdout(predicate::str::contains("No prompts shown yet"));
}

#[test]
fn test_modes_survive_reset() {
    let env = Env::new();
    env.pp()
        .args(["modes", "--drinking", "high"])
        .assert()
        .success()
        .stdout(predicate::str::contains("high"));
    env.pp().arg("next").assert().success();
    env.pp()
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session cleared"));

    env.pp()
        .arg("modes")
        .assert()
        .success()
        .stdout(predicate::str::contains("drinking   high"))
        .stdout(predicate::str::contains("challenge  off"));
    env.pp()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Prompts generated:   0"));
}

#[test]
fn test_unknown_frequency_is_rejected() {
    let env = Env::new();
    env.pp().args(["modes", "--challenge", "sometimes"]).assert().failure();
}

#[test]
fn test_missing_content_disables_generation() {
    let env = Env::with_extra("content-path: \"/nonexistent/prompts.json\"\n");
    env.pp()
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("No content loaded"));
}

#[test]
fn test_custom_content_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let content = dir.path().join("prompts.json");
    fs::write(
        &content,
        r#"{ "staticPrompts": { "solo": ["Who would eat the last slice?"] } }"#,
    )
    .expect("Failed to write content");

    let env = Env::with_extra(&format!("content-path: \"{}\"\n", content.display()));
    env.pp()
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("Who would eat the last slice?"));
    env.pp()
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("You've seen all the prompts"));
    env.pp()
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("Who would eat the last slice?"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    Command::cargo_bin("pp")
        .expect("binary builds")
        .arg("--config")
        .arg(dir.path().join("nope.yml"))
        .arg("stats")
        .assert()
        .failure();
}
