//! Bonus game modes and their frequency settings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A bonus content group mixed into the pool on top of the base content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Drinking,
    Challenge,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Drinking, Mode::Challenge];

    /// Name used as the category tag for this mode's templates
    pub fn name(&self) -> &'static str {
        match self {
            Self::Drinking => "drinking",
            Self::Challenge => "challenge",
        }
    }

    /// Store key holding the user's frequency preference for this mode
    pub fn preference_key(&self) -> &'static str {
        match self {
            Self::Drinking => "drinkingModeFrequency",
            Self::Challenge => "challengeModeFrequency",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How often a mode's templates show up
///
/// The weight is the number of times the whole mode group is repeated in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModeFrequency {
    #[default]
    Off,
    Low,
    Med,
    High,
}

impl ModeFrequency {
    pub const ALL: [ModeFrequency; 4] = [Self::Off, Self::Low, Self::Med, Self::High];

    /// Number of copies of the mode group added to the pool
    pub fn weight(self) -> usize {
        match self {
            Self::Off => 0,
            Self::Low => 1,
            Self::Med => 2,
            Self::High => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Low => "low",
            Self::Med => "med",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ModeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown mode frequency '{0}' (expected off, low, med or high)")]
pub struct ParseFrequencyError(pub String);

impl FromStr for ModeFrequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "low" => Ok(Self::Low),
            "med" | "medium" => Ok(Self::Med),
            "high" => Ok(Self::High),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}
