//! pp - party-game prompt generator
//!
//! CLI entry point for one-shot commands and interactive play.

use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use keystore::{JsonFileStore, KeyValueStore, MemoryStore};
use partyprompt::cli::{Cli, Command};
use partyprompt::config::Config;
use partyprompt::repl::PlaySession;
use partyprompt::report::REPORT_SUBJECT;
use partyprompt::{ContentDocument, Game, Mode, ModeFrequency, bad_prompt_report, display};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>, log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("partyprompt.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn load_content(config: &Config) -> Option<ContentDocument> {
    let loaded = match &config.content_path {
        Some(path) => ContentDocument::load(path),
        None => ContentDocument::embedded(),
    };
    match loaded {
        Ok(content) => Some(content),
        Err(e) => {
            warn!(error = %e, "Failed to load content");
            eprintln!("{} Failed to load content: {}", "✗".red(), e);
            None
        }
    }
}

fn open_store(config: &Config) -> Box<dyn KeyValueStore> {
    match JsonFileStore::open(&config.store_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(path = %config.store_path.display(), error = %e, "Store unavailable, session will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref(), &config.log_dir)
        .context("Failed to setup logging")?;

    info!("partyprompt starting");

    let game = Game::new(load_content(&config), open_store(&config)).with_max_attempts(config.max_attempts);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Next { category, count } => cmd_next(game, category, count),
        Command::Play { category } => cmd_play(game, category, &config),
        Command::Categories => cmd_categories(&game),
        Command::History { limit } => {
            display::print_history(&game, limit);
            Ok(())
        }
        Command::Stats => {
            display::print_stats(&game);
            Ok(())
        }
        Command::Bad { prompt } => cmd_bad(game, prompt),
        Command::Report { output } => cmd_report(&game, output.as_deref()),
        Command::Modes { drinking, challenge } => cmd_modes(game, drinking, challenge),
        Command::Reset => cmd_reset(game),
    }
}

fn cmd_next(mut game: Game, category: Option<String>, count: usize) -> Result<()> {
    debug!(?category, count, "cmd_next: called");
    game.set_category(category);
    for _ in 0..count {
        let outcome = game.generate();
        display::print_outcome(&outcome, &game);
    }
    Ok(())
}

fn cmd_play(mut game: Game, category: Option<String>, config: &Config) -> Result<()> {
    debug!(?category, "cmd_play: called");
    game.set_category(category);
    let mut session = PlaySession::new(game, Duration::from_millis(config.transition_delay_ms));
    session.run()
}

fn cmd_categories(game: &Game) -> Result<()> {
    match game.content() {
        Some(content) => display::print_categories(content, None),
        None => println!("No content loaded"),
    }
    Ok(())
}

fn cmd_bad(mut game: Game, prompt: Option<String>) -> Result<()> {
    debug!(?prompt, "cmd_bad: called");
    let (text, flagged) = match prompt {
        Some(text) => {
            let flagged = game.toggle_bad(&text);
            (text, flagged)
        }
        None => {
            let Some(text) = game.session().latest().map(str::to_string) else {
                println!("No prompts shown yet");
                return Ok(());
            };
            let flagged = game.toggle_bad(&text);
            (text, flagged)
        }
    };

    if flagged {
        println!("{} Flagged: {}", "✗".red(), text);
    } else {
        println!("{} Unflagged: {}", "✓".green(), text);
    }
    Ok(())
}

fn cmd_report(game: &Game, output: Option<&Path>) -> Result<()> {
    let Some(body) = bad_prompt_report(&game.session().bad_prompts) else {
        println!("No bad prompts");
        return Ok(());
    };

    match output {
        Some(path) => {
            let report = format!("Subject: {}\n\n{}\n", REPORT_SUBJECT, body);
            fs::write(path, report).context(format!("Failed to write report to {}", path.display()))?;
            println!("{} Report written to {}", "✓".green(), path.display());
        }
        None => {
            println!("{}", REPORT_SUBJECT.bold());
            println!();
            println!("{}", body);
        }
    }
    Ok(())
}

fn cmd_modes(mut game: Game, drinking: Option<ModeFrequency>, challenge: Option<ModeFrequency>) -> Result<()> {
    for (mode, freq) in [(Mode::Drinking, drinking), (Mode::Challenge, challenge)] {
        if let Some(freq) = freq {
            game.set_frequency(mode, freq);
        }
    }
    display::print_modes(game.preferences());
    Ok(())
}

fn cmd_reset(mut game: Game) -> Result<()> {
    game.reset();
    println!("{} Session cleared (mode settings kept)", "✓".green());
    Ok(())
}
