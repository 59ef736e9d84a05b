//! Game layer for Ludo.
//!
//! Implements the rules on a fixed 15x15 board:
//! - Board geometry: shared track, home stretches, bases, safe cells
//! - Pawns and their progress counters
//! - Star tiles with random outcomes
//! - Rule configuration and dice
//! - The statekeeper turn machine and the events it emits

mod board;
mod dice;
mod events;
mod invariants;
mod pawn;
mod player;
mod rules;
mod star;
mod state;

pub use board::{
    Board, CellKind, Color, Coord, GRID_SIZE, HOME_LEN, PAWNS_PER_PLAYER, ParseColorError,
    TRACK_LEN,
};
pub use dice::{DIE_FACES, MAX_DICE, Roll};
pub use events::{EventSink, GameEvent, LogSink, NullSink};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use pawn::{Pawn, PawnId, Step};
pub use player::{Player, PlayerId};
pub use rules::{BonusRule, EntryRule, Overshoot, Rules, RulesError, StarWeights};
pub use star::{Star, StarEffect, place_stars};
pub use state::{GameState, MoveOutcome, MovePreview, Phase};
