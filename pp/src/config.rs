//! Configuration for partyprompt

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::sampler::DEFAULT_MAX_ATTEMPTS;

/// Default delay between asking for a prompt and showing it, in milliseconds
pub const DEFAULT_TRANSITION_DELAY_MS: u64 = 400;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content document to load; the embedded document is used when unset
    #[serde(rename = "content-path")]
    pub content_path: Option<PathBuf>,

    /// File holding session data and preferences
    #[serde(rename = "store-path")]
    pub store_path: PathBuf,

    /// Directory for the log file
    #[serde(rename = "log-dir")]
    pub log_dir: PathBuf,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Draws per generation before declaring every prompt seen
    #[serde(rename = "max-attempts")]
    pub max_attempts: usize,

    /// Pause before revealing a prompt in interactive play
    #[serde(rename = "transition-delay-ms")]
    pub transition_delay_ms: u64,
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("partyprompt")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_path: None,
            store_path: data_dir().join("state.json"),
            log_dir: data_dir().join("logs"),
            log_level: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            transition_delay_ms: DEFAULT_TRANSITION_DELAY_MS,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// An explicit path must load. Otherwise `./partyprompt.yml`, then
    /// `~/.config/partyprompt/partyprompt.yml`, then defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from("partyprompt.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("partyprompt").join("partyprompt.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}
