//! CLI argument parsing for partyprompt

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::mode::ModeFrequency;

#[derive(Parser, Debug)]
#[command(name = "pp")]
#[command(author, version, about = "Party-game prompt generator", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the next prompt(s)
    Next {
        /// Only draw from this category (or word list)
        #[arg(short = 'k', long)]
        category: Option<String>,

        /// Number of prompts to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Play interactively, one prompt per Enter
    Play {
        /// Start with this category selected
        #[arg(short = 'k', long)]
        category: Option<String>,
    },

    /// List categories
    Categories,

    /// Show recently shown prompts
    History {
        /// Maximum entries to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Show session statistics
    Stats,

    /// Flag or unflag a prompt as bad (default: the last one shown)
    Bad {
        /// Prompt text
        prompt: Option<String>,
    },

    /// Print the bad prompt report
    Report {
        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or change bonus mode frequencies
    Modes {
        /// Drinking mode frequency
        #[arg(long, value_enum)]
        drinking: Option<ModeFrequency>,

        /// Challenge mode frequency
        #[arg(long, value_enum)]
        challenge: Option<ModeFrequency>,
    },

    /// Clear session data (mode settings are kept)
    Reset,
}
