//! Interactive play
//!
//! Enter draws the next prompt; slash commands flag prompts, switch category and
//! modes, and show history and stats.

use std::thread;
use std::time::Duration;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::display;
use crate::game::Game;
use crate::mode::{Mode, ModeFrequency};

/// Interactive play session
pub struct PlaySession {
    game: Game,
    transition_delay: Duration,
}

enum SlashResult {
    Continue,
    Quit,
}

impl PlaySession {
    pub fn new(game: Game, transition_delay: Duration) -> Self {
        Self { game, transition_delay }
    }

    /// Run the play loop until /quit or Ctrl+D
    pub fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            match rl.readline(&format!("{} ", ">".bright_green())) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        self.next_prompt();
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        println!("{} Press Enter for a prompt, or {} for commands", "?".yellow(), "/help".yellow());
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn next_prompt(&mut self) {
        if !self.game.begin_generate() {
            let outcome = self.game.generate();
            display::print_outcome(&outcome, &self.game);
            return;
        }
        if !self.transition_delay.is_zero() {
            thread::sleep(self.transition_delay);
        }
        let outcome = self.game.finish_generate();
        debug!(?outcome, "PlaySession::next_prompt: generated");
        display::print_outcome(&outcome, &self.game);
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Bad People".bright_cyan().bold());
        println!("The party game that reveals who your friends really are");
        match self.game.category() {
            Some(category) => println!("Category: {}", category.cyan()),
            None => println!("Category: {}", "all".cyan()),
        }
        if !self.game.is_enabled() {
            println!("{} No content loaded, prompts are unavailable", "✗".red());
        }
        println!(
            "Press {} for a prompt, {} for help, {} to quit",
            "Enter".yellow(),
            "/help".yellow(),
            "/quit".yellow()
        );
        println!();
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");
        let arg = parts.get(1..).map(|rest| rest.join(" ")).filter(|s| !s.is_empty());

        match cmd {
            "/help" | "/h" => self.print_help(),
            "/quit" | "/q" | "/exit" => return SlashResult::Quit,
            "/next" | "/n" => self.next_prompt(),
            "/bad" | "/b" => match self.game.downvote_latest() {
                Some(true) => println!("{} Flagged as bad", "✗".red()),
                Some(false) => println!("{} Unflagged", "✓".green()),
                None => println!("{}", "Nothing to flag yet.".dimmed()),
            },
            "/history" => display::print_history(&self.game, usize::MAX),
            "/stats" => display::print_stats(&self.game),
            "/categories" => match self.game.content() {
                Some(content) => display::print_categories(content, self.game.category()),
                None => println!("{}", "No content loaded.".dimmed()),
            },
            "/category" | "/c" => {
                self.game.set_category(arg.clone());
                match arg {
                    Some(name) => println!("Category: {}", name.cyan()),
                    None => println!("Category: {}", "all".cyan()),
                }
            }
            "/drinking" => self.set_frequency(Mode::Drinking, arg.as_deref()),
            "/challenge" => self.set_frequency(Mode::Challenge, arg.as_deref()),
            "/modes" => display::print_modes(self.game.preferences()),
            "/reset" => {
                self.game.reset();
                println!("{}", "Session cleared.".dimmed());
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        SlashResult::Continue
    }

    fn set_frequency(&mut self, mode: Mode, arg: Option<&str>) {
        let Some(arg) = arg else {
            println!("  {:10} {}", mode.name(), self.game.preferences().frequency(mode).to_string().cyan());
            return;
        };
        match arg.parse::<ModeFrequency>() {
            Ok(freq) => {
                self.game.set_frequency(mode, freq);
                println!("{} mode: {}", mode.name(), freq.to_string().cyan());
            }
            Err(e) => println!("{} {}", "?".yellow(), e),
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:22} Next prompt", "Enter, /next".yellow());
        println!("  {:22} Flag or unflag the last prompt", "/bad".yellow());
        println!("  {:22} Show prompt history", "/history".yellow());
        println!("  {:22} Show session stats", "/stats".yellow());
        println!("  {:22} List categories", "/categories".yellow());
        println!("  {:22} Pick a category (none = all)", "/category [NAME]".yellow());
        println!("  {:22} Drinking mode frequency", "/drinking off|low|med|high".yellow());
        println!("  {:22} Challenge mode frequency", "/challenge off|low|med|high".yellow());
        println!("  {:22} Show mode frequencies", "/modes".yellow());
        println!("  {:22} Clear the session", "/reset".yellow());
        println!("  {:22} Exit", "/quit".yellow());
        println!();
    }
}
