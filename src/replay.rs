//! Game replay and viewing system.
//!
//! Because games are fully determined by their seed, replay requires only:
//! - `seed: u64` - drives star placement, dice and random strategies
//! - `seats: Vec<Seat>` - color, name and strategy of each player
//! - `config: MatchConfig` - rules and turn cap
//!
//! No state deltas needed. To view turn N, re-run the simulation from turn 0 to N.
//!
//! # Time Travel
//!
//! - **Forward**: Continue stepping the simulation
//! - **Backward**: Re-run from turn 0 to (`current_turn` - 1)
//! - **Jump to turn N**: Re-run from turn 0 to N

mod render;
mod text;

pub use render::{Glyph, ansi_color, board_glyphs, phase_text, render_ascii};
pub use text::render_llm;

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::{GameEvent, GameState};
use crate::tournament::{MatchConfig, MatchRunner, Seat, TournamentError};

/// Minimal recording - just seed, seats, and config.
///
/// Because the game is deterministic, this is all we need to replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    /// Match seed.
    pub seed: u64,
    /// Seats in turn order.
    pub seats: Vec<Seat>,
    /// Match configuration.
    pub config: MatchConfig,
}

impl Recording {
    /// Create a new recording from match inputs.
    #[must_use]
    pub fn new(seed: u64, seats: Vec<Seat>, config: MatchConfig) -> Self {
        Self {
            seed,
            seats,
            config,
        }
    }

    /// Save recording to a file as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file operations fail.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string_pretty(self).map_err(ReplayError::Format)?;
        fs::write(path, json).map_err(ReplayError::Io)
    }

    /// Load recording from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a recording.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = fs::read_to_string(path).map_err(ReplayError::Io)?;
        serde_json::from_str(&json).map_err(ReplayError::Format)
    }
}

/// Error type for replay operations.
#[derive(Debug)]
pub enum ReplayError {
    /// The recording describes a match that cannot be set up.
    Setup(TournamentError),
    /// Turn number out of bounds.
    TurnOutOfBounds {
        /// Requested turn.
        requested: u32,
        /// Maximum turn (inclusive).
        max_turn: u32,
    },
    /// Game is already over.
    GameOver,
    /// Recording file could not be read or written.
    Io(io::Error),
    /// Recording JSON is malformed.
    Format(serde_json::Error),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup(e) => write!(f, "Cannot set up recorded match: {e}"),
            Self::TurnOutOfBounds { requested, max_turn } => {
                write!(f, "Turn {requested} out of bounds (max: {max_turn})")
            }
            Self::GameOver => write!(f, "Game is already over"),
            Self::Io(e) => write!(f, "Recording I/O error: {e}"),
            Self::Format(e) => write!(f, "Invalid recording: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Setup(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Format(e) => Some(e),
            _ => None,
        }
    }
}

/// Replay engine - steps through game deterministically.
///
/// Since games are deterministic, this engine can:
/// - Step forward by playing one turn
/// - Step backward by replaying from turn 0
/// - Jump to any turn by replaying from turn 0
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    recording: Recording,
    runner: MatchRunner,
    last_events: Vec<GameEvent>,
}

impl ReplayEngine {
    /// Create a new replay engine from a recording, starting at turn 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorded match cannot be set up.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        Self::new_at_turn(recording, 0)
    }

    /// Create a new replay engine at a specific turn.
    ///
    /// This replays from turn 0 to the target turn, stopping early if the
    /// game ends first.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorded match cannot be set up.
    pub fn new_at_turn(recording: Recording, target_turn: u32) -> Result<Self, ReplayError> {
        let runner = MatchRunner::new(recording.seed, &recording.seats, &recording.config)
            .map_err(ReplayError::Setup)?;
        let mut engine = Self {
            recording,
            runner,
            last_events: Vec::new(),
        };

        while engine.turn() < target_turn && !engine.runner.is_finished() {
            engine.last_events.clear();
            engine.runner.play_turn(&mut engine.last_events);
        }

        Ok(engine)
    }

    /// Get the recording.
    #[must_use]
    pub const fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Get current turn number.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.runner.state().turn()
    }

    /// Get current game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        self.runner.state()
    }

    /// Check if the game is over (won, or the turn cap was reached).
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.runner.is_finished()
    }

    /// Events produced by the most recent turn.
    #[must_use]
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    /// Step forward one turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is already over.
    pub fn step_forward(&mut self) -> Result<(), ReplayError> {
        if self.runner.is_finished() {
            return Err(ReplayError::GameOver);
        }
        self.last_events.clear();
        self.runner.play_turn(&mut self.last_events);
        Ok(())
    }

    /// Step backward one turn.
    ///
    /// This replays from turn 0 to (`current_turn` - 1).
    ///
    /// # Errors
    ///
    /// Returns an error if already at turn 0.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        let current = self.turn();
        if current == 0 {
            return Err(ReplayError::TurnOutOfBounds {
                requested: 0,
                max_turn: self.recording.config.max_turns,
            });
        }
        self.goto_turn(current - 1)
    }

    /// Jump to a specific turn.
    ///
    /// This replays from turn 0 to the target turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the turn is past the turn cap.
    pub fn goto_turn(&mut self, target_turn: u32) -> Result<(), ReplayError> {
        let max_turn = self.recording.config.max_turns;
        if target_turn > max_turn {
            return Err(ReplayError::TurnOutOfBounds {
                requested: target_turn,
                max_turn,
            });
        }

        let recording = self.recording.clone();
        *self = Self::new_at_turn(recording, target_turn)?;
        Ok(())
    }

    /// Render current state to ASCII for terminal viewing.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        render_ascii(self.state(), self.turn())
    }

    /// Render current state to structured text for LLM consumption.
    #[must_use]
    pub fn render_llm(&self) -> String {
        render_llm(self.state(), self.turn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Strategy;
    use crate::tournament::default_seats;
    use tempfile::NamedTempFile;

    fn recording() -> Recording {
        Recording::new(42, default_seats(3, Strategy::Random), MatchConfig::default())
    }

    #[test]
    fn test_recording_save_load_roundtrip() {
        let recording = recording();
        let temp_file = NamedTempFile::new().expect("create temp file");
        recording.save(temp_file.path()).expect("save recording");

        let loaded = Recording::load(temp_file.path()).expect("load recording");
        assert_eq!(loaded, recording);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let temp_file = NamedTempFile::new().expect("create temp file");
        std::fs::write(temp_file.path(), "not json").expect("write");
        assert!(matches!(
            Recording::load(temp_file.path()),
            Err(ReplayError::Format(_))
        ));
    }

    #[test]
    fn test_replay_error_display() {
        let err = ReplayError::TurnOutOfBounds {
            requested: 1500,
            max_turn: 1000,
        };
        assert!(format!("{err}").contains("1500"));
        assert!(format!("{err}").contains("1000"));

        let err = ReplayError::GameOver;
        assert!(format!("{err}").contains("over"));
    }

    #[test]
    fn test_step_back_matches_goto() {
        let mut engine = ReplayEngine::new(recording()).unwrap();
        for _ in 0..10 {
            engine.step_forward().unwrap();
        }
        assert_eq!(engine.turn(), 10);
        let at_ten = engine.render_llm();

        engine.step_forward().unwrap();
        engine.step_backward().unwrap();
        assert_eq!(engine.turn(), 10);
        assert_eq!(engine.render_llm(), at_ten);

        let direct = ReplayEngine::new_at_turn(recording(), 10).unwrap();
        assert_eq!(direct.render_llm(), at_ten);
    }

    #[test]
    fn test_last_events_cover_one_turn() {
        let mut engine = ReplayEngine::new(recording()).unwrap();
        engine.step_forward().unwrap();
        let events = engine.last_events();
        assert!(matches!(
            events.first(),
            Some(GameEvent::TurnStarted { player: 0, turn: 0 })
        ));
        assert!(matches!(
            events.last(),
            Some(GameEvent::TurnEnded { player: 0, .. })
        ));
    }

    #[test]
    fn test_goto_past_cap() {
        let mut engine = ReplayEngine::new(recording()).unwrap();
        assert!(matches!(
            engine.goto_turn(5000),
            Err(ReplayError::TurnOutOfBounds { .. })
        ));
        assert!(engine.step_backward().is_err());
    }
}
