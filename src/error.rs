//! Error types for move and turn resolution.
//!
//! Illegal moves are ordinary values here, not failures: the statekeeper
//! hands a [`MoveRejection`] back and leaves the game state untouched.

use std::fmt;

use serde::Serialize;

use crate::game::{Color, Phase, PlayerId};

/// Why a pawn could not take a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MoveRejection {
    /// The pawn is at base and the roll does not satisfy the entry rule.
    NeedsEntryRoll {
        /// Total that was rolled.
        rolled: u8,
    },
    /// The roll would carry the pawn past the terminal cell.
    Overshoot {
        /// Total that was rolled.
        rolled: u8,
        /// Cells left between the pawn and the terminal cell.
        remaining: u8,
    },
    /// The pawn already reached the terminal cell.
    AlreadyFinished,
    /// A roll of zero moves nothing.
    ZeroRoll,
    /// The current player has no pawn with this index.
    NoSuchPawn {
        /// Requested pawn index.
        index: usize,
    },
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeedsEntryRoll { rolled } => {
                write!(f, "rolled {rolled}, which does not bring a pawn out of base")
            }
            Self::Overshoot { rolled, remaining } => {
                write!(f, "rolled {rolled} but only {remaining} cells remain to home")
            }
            Self::AlreadyFinished => write!(f, "pawn already finished"),
            Self::ZeroRoll => write!(f, "cannot move by zero"),
            Self::NoSuchPawn { index } => write!(f, "no pawn with index {index}"),
        }
    }
}

impl std::error::Error for MoveRejection {}

/// A statekeeper operation that was not allowed in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    /// The operation needs a different phase of the turn cycle.
    WrongPhase {
        /// Name of the phase the operation expects.
        expected: &'static str,
        /// Phase the game is actually in.
        found: Phase,
    },
    /// A submitted roll does not match the dice in play.
    InvalidRoll {
        /// Number of dice the rules require.
        expected_dice: u8,
        /// Number of dice that were submitted.
        got_dice: u8,
    },
    /// A submitted die face is outside 1..=6.
    InvalidFace(u8),
    /// The chosen pawn cannot move with the current roll.
    Rejected {
        /// Player whose pawn was rejected.
        player: PlayerId,
        /// Why the move was rejected.
        reason: MoveRejection,
    },
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongPhase { expected, found } => {
                write!(f, "expected phase {expected}, game is in {found}")
            }
            Self::InvalidRoll {
                expected_dice,
                got_dice,
            } => write!(f, "expected {expected_dice} dice, got {got_dice}"),
            Self::InvalidFace(face) => write!(f, "die face {face} is outside 1..=6"),
            Self::Rejected { player, reason } => {
                write!(f, "move rejected for player {player}: {reason}")
            }
        }
    }
}

impl std::error::Error for TurnError {}

/// Result type for statekeeper operations.
pub type TurnResult<T> = Result<T, TurnError>;

/// A game could not be set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    /// Fewer than two seats.
    TooFewPlayers(usize),
    /// More seats than colors.
    TooManyPlayers(usize),
    /// Two seats picked the same color.
    DuplicateColor(Color),
    /// A player's id does not match its seat.
    SeatMismatch {
        /// Seat position.
        seat: usize,
        /// Id the player carries.
        id: PlayerId,
    },
    /// The board has fewer free track cells than requested stars.
    NotEnoughStarCells {
        /// Stars requested.
        requested: usize,
        /// Cells that may hold a star.
        available: usize,
    },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPlayers(n) => write!(f, "need at least 2 players, got {n}"),
            Self::TooManyPlayers(n) => write!(f, "at most 4 players can sit, got {n}"),
            Self::DuplicateColor(color) => write!(f, "color {color} is taken twice"),
            Self::SeatMismatch { seat, id } => {
                write!(f, "player in seat {seat} has id {id}")
            }
            Self::NotEnoughStarCells {
                requested,
                available,
            } => write!(
                f,
                "cannot place {requested} stars, only {available} cells available"
            ),
        }
    }
}

impl std::error::Error for SetupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_display() {
        let err = MoveRejection::Overshoot {
            rolled: 5,
            remaining: 2,
        };
        let text = err.to_string();
        assert!(text.contains('5'));
        assert!(text.contains('2'));
    }

    #[test]
    fn test_turn_error_display() {
        let err = TurnError::Rejected {
            player: 1,
            reason: MoveRejection::AlreadyFinished,
        };
        assert!(err.to_string().contains("finished"));

        let err = TurnError::InvalidFace(9);
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn test_setup_error_display() {
        let err = SetupError::DuplicateColor(Color::Green);
        assert!(err.to_string().contains("green"));
        assert!(SetupError::TooFewPlayers(1).to_string().contains('1'));
    }
}
