//! CLI command implementations for Ludo.

pub(crate) mod logger;
pub(crate) mod replay;
pub(crate) mod rules;
pub(crate) mod run;
pub(crate) mod tournament;
pub(crate) mod watch;

mod output;
mod view;

use clap::{Args, ValueEnum};
use ludo::game::{Rules, RulesError};
use ludo::strategy::Strategy;
use ludo::tournament::{MatchConfig, Seat, default_seats};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// Structured text for LLM consumption.
    Llm,
}

/// Output format for the `replay` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReplayFormat {
    /// Interactive TUI.
    Tui,
    /// Plain text output.
    Text,
    /// Structured text for LLM consumption.
    Llm,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Built-in rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RulesPreset {
    /// One die, six to enter, six rolls again.
    Classic,
    /// Two dice, ten or more to enter, doubles roll again.
    TwoDice,
}

impl RulesPreset {
    fn rules(self) -> Rules {
        match self {
            Self::Classic => Rules::classic(),
            Self::TwoDice => Rules::two_dice(),
        }
    }
}

/// Seating and rule options shared by every command that starts a match.
#[derive(Args, Debug, Clone)]
pub(crate) struct MatchArgs {
    /// Seats as color[:strategy[:name]], e.g. `red:runner blue:random:Bob`
    #[arg(value_name = "SEAT")]
    seats: Vec<Seat>,

    /// Player count when no seats are given (2-4)
    #[arg(short = 'n', long, default_value = "4")]
    players: usize,

    /// Strategy for every generated seat
    #[arg(long, default_value = "first")]
    strategy: Strategy,

    /// Built-in rule set
    #[arg(long, value_enum, default_value = "classic")]
    preset: RulesPreset,

    /// Rules JSON file; missing fields take their classic value
    #[arg(long, conflicts_with = "preset")]
    rules: Option<PathBuf>,

    /// Maximum turns before the game is called a draw
    #[arg(short = 't', long, default_value = "2000")]
    max_turns: u32,
}

impl MatchArgs {
    /// Seats and match configuration these options describe.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules file cannot be loaded.
    pub(crate) fn resolve(&self) -> Result<(Vec<Seat>, MatchConfig), CliError> {
        let seats = if self.seats.is_empty() {
            default_seats(self.players, self.strategy)
        } else {
            self.seats.clone()
        };

        let rules = match &self.rules {
            Some(path) => Rules::from_json_file(path).map_err(|e| {
                CliError::new(format!("Failed to load rules {}: {e}", path.display()))
            })?,
            None => self.preset.rules(),
        };

        Ok((
            seats,
            MatchConfig {
                rules,
                max_turns: self.max_turns,
            },
        ))
    }
}

/// Seed from the command line, or one drawn from the clock.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    })
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ludo::tournament::TournamentError> for CliError {
    fn from(e: ludo::tournament::TournamentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ludo::replay::ReplayError> for CliError {
    fn from(e: ludo::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<RulesError> for CliError {
    fn from(e: RulesError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ludo::Color;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        game: MatchArgs,
    }

    #[test]
    fn test_default_seats_when_none_given() {
        let harness = Harness::parse_from(["ludo", "-n", "3", "--strategy", "runner"]);
        let (seats, config) = harness.game.resolve().unwrap();
        assert_eq!(seats.len(), 3);
        assert!(seats.iter().all(|s| s.strategy == Strategy::Runner));
        assert_eq!(config.rules, Rules::classic());
        assert_eq!(config.max_turns, 2000);
    }

    #[test]
    fn test_explicit_seats_and_preset() {
        let harness = Harness::parse_from([
            "ludo",
            "green:cautious:Gus",
            "red",
            "--preset",
            "two-dice",
            "-t",
            "300",
        ]);
        let (seats, config) = harness.game.resolve().unwrap();
        assert_eq!(seats[0].color, Color::Green);
        assert_eq!(seats[0].name, "Gus");
        assert_eq!(seats[1].strategy, Strategy::First);
        assert_eq!(config.rules, Rules::two_dice());
        assert_eq!(config.max_turns, 300);
    }

    #[test]
    fn test_bad_seat_is_rejected() {
        assert!(Harness::try_parse_from(["ludo", "purple"]).is_err());
    }

    #[test]
    fn test_missing_rules_file() {
        let harness = Harness::parse_from(["ludo", "--rules", "/nonexistent/rules.json"]);
        let err = harness.game.resolve().unwrap_err();
        assert!(err.to_string().contains("Failed to load rules"));
    }

    #[test]
    fn test_explicit_seed_wins() {
        assert_eq!(resolve_seed(Some(9)), 9);
    }
}
