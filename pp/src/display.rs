//! Terminal output shared by the one-shot commands and interactive play

use colored::*;

use crate::content::ContentDocument;
use crate::game::{Game, GenerateOutcome};
use crate::mode::Mode;
use crate::preferences::ModePreferences;
use crate::stats::{most_frequent_category, total_possible_prompts};

/// Shown when a generation finds nothing new
pub const EXHAUSTED_MESSAGE: &str = "🎉 You've seen all the prompts! Ask again to restart.";

pub fn print_outcome(outcome: &GenerateOutcome, game: &Game) {
    match outcome {
        GenerateOutcome::Prompt(prompt) => {
            let tag = match prompt.mode {
                Some(Mode::Drinking) => format!("[{}] ", "drinking".bright_yellow()),
                Some(Mode::Challenge) => format!("[{}] ", "challenge".bright_magenta()),
                None => String::new(),
            };
            let category = game
                .content()
                .map(|c| c.display_name(&prompt.category).to_string())
                .unwrap_or_else(|| prompt.category.clone());
            println!("{}{}", tag, prompt.text.bold());
            println!("  {}", category.dimmed());
        }
        GenerateOutcome::EmptyPool => {
            println!("{} No prompts available for this category", "!".yellow());
        }
        GenerateOutcome::Exhausted => println!("{}", EXHAUSTED_MESSAGE),
        GenerateOutcome::Busy => println!("{}", "Still generating...".dimmed()),
        GenerateOutcome::Disabled => {
            println!("{} No content loaded, nothing to generate", "✗".red());
        }
    }
}

pub fn print_categories(content: &ContentDocument, selected: Option<&str>) {
    for info in content.categories() {
        let marker = if selected == Some(info.key) { "*".green() } else { " ".normal() };
        println!(
            "{} {} {} ({} prompts)",
            marker,
            info.key.cyan(),
            info.display_name.bold(),
            info.static_count
        );
        if let Some(description) = info.description {
            println!("    {}", description.dimmed());
        }
    }
}

pub fn print_history(game: &Game, limit: usize) {
    let state = game.session();
    if state.prompt_history.is_empty() {
        println!("{}", "No prompts shown yet.".dimmed());
        return;
    }
    for (i, prompt) in state.prompt_history.iter().take(limit).enumerate() {
        let flag = if state.is_bad(prompt) { " ✗".red() } else { "".normal() };
        println!("{:>3}. {}{}", i + 1, prompt, flag);
    }
}

pub fn print_stats(game: &Game) {
    let state = game.session();
    let favourite = game
        .content()
        .and_then(|c| most_frequent_category(&state.category_usage, c))
        .unwrap_or_else(|| "None yet".to_string());
    let possible = game
        .content()
        .map(|c| total_possible_prompts(c).to_string())
        .unwrap_or_else(|| "n/a".to_string());

    println!("{}", "Session Stats".bright_cyan());
    println!("  Prompts generated:   {}", state.total_generated);
    println!("  Favourite category:  {}", favourite);
    println!("  Possible prompts:    {}", possible);
    println!("  Current pool:        {}", game.pool_size());
    println!("  Seen this round:     {}", state.shown_prompts.len());
    println!("  Flagged as bad:      {}", state.bad_prompts.len());
}

pub fn print_modes(prefs: ModePreferences) {
    for mode in Mode::ALL {
        println!("  {:10} {}", mode.name(), prefs.frequency(mode).to_string().cyan());
    }
}
