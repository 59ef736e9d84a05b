// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Ludo: a deterministic rules engine for the classic race game, with star
//! tiles, a match simulator and a terminal viewer.
//!
//! This crate provides:
//! - Board geometry for the standard four-color cross board
//! - A statekeeper that turns dice rolls and pawn choices into events
//! - Configurable rule variants (one or two dice, entry and bonus rules,
//!   overshoot handling, star outcome weights)
//! - Seeded, reproducible matches between built-in strategies
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / Viewer / Replay             │
//! ├─────────────────────────────────────┤
//! │   Match Runner + Strategies         │
//! ├─────────────────────────────────────┤
//! │   Statekeeper (GameState, events)   │
//! ├─────────────────────────────────────┤
//! │   Board, Pawns, Stars, Rules        │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use ludo::{MatchConfig, Strategy, run_game, tournament::default_seats};
//!
//! let seats = default_seats(4, Strategy::Runner);
//! let result = run_game(7, &seats, &MatchConfig::default()).unwrap();
//! assert_eq!(result.seed, 7);
//! ```

pub mod error;
pub mod game;
pub mod replay;
pub mod strategy;
pub mod tournament;

pub use error::{MoveRejection, SetupError, TurnError, TurnResult};

// Re-export key game types at crate root for convenience
pub use game::{
    Board, Color, Coord, EventSink, GameEvent, GameState, Phase, Player, PlayerId, Roll, Rules,
    StarEffect,
};
pub use strategy::{PawnChooser, Strategy};
pub use tournament::{GameResult, MatchConfig, Seat, run_game};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_compose() {
        let seats = tournament::default_seats(2, Strategy::First);
        let config = MatchConfig {
            max_turns: 3,
            ..MatchConfig::default()
        };
        let result = run_game(1, &seats, &config).unwrap();
        assert_eq!(result.player_stats.len(), 2);
        assert_eq!(result.player_stats[1].color, Color::Blue);
    }
}
