//! Star tiles.
//!
//! A star sits on a fixed track cell. A pawn that lands exactly on it draws
//! one outcome from [`StarEffect`]; the statekeeper applies the outcome.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::game::{Board, Coord};

/// Outcome of landing on a star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarEffect {
    /// Nothing happens.
    NoEffect,
    /// The player rolls again.
    RollAgain,
    /// The pawn jumps to a random cell free of opponents.
    Teleport,
    /// The pawn goes back to base.
    SendHome,
}

impl StarEffect {
    /// All outcomes, in the order used by [`crate::game::StarWeights`].
    pub const ALL: [StarEffect; 4] = [
        StarEffect::NoEffect,
        StarEffect::RollAgain,
        StarEffect::Teleport,
        StarEffect::SendHome,
    ];

    /// Position in [`StarEffect::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            StarEffect::NoEffect => 0,
            StarEffect::RollAgain => 1,
            StarEffect::Teleport => 2,
            StarEffect::SendHome => 3,
        }
    }
}

impl fmt::Display for StarEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StarEffect::NoEffect => "no effect",
            StarEffect::RollAgain => "roll again",
            StarEffect::Teleport => "teleport",
            StarEffect::SendHome => "send home",
        };
        f.write_str(name)
    }
}

/// A bonus/penalty tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    track_index: usize,
    coord: Coord,
    triggered: u32,
}

impl Star {
    /// Create a star on a track cell.
    ///
    /// Returns `None` if the index is off the track.
    #[must_use]
    pub fn new(board: &Board, track_index: usize) -> Option<Self> {
        let coord = board.track_coord(track_index)?;
        Some(Self {
            track_index,
            coord,
            triggered: 0,
        })
    }

    /// Track index the star sits on.
    #[must_use]
    pub const fn track_index(&self) -> usize {
        self.track_index
    }

    /// Grid coordinate the star sits on.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        self.coord
    }

    /// How many times a pawn has landed here.
    #[must_use]
    pub const fn triggered(&self) -> u32 {
        self.triggered
    }

    /// Whether a pawn standing on `coord` landed exactly on this star.
    #[must_use]
    pub fn check_exact_collision(&self, coord: Coord) -> bool {
        self.coord == coord
    }

    pub(crate) fn record_trigger(&mut self) {
        self.triggered += 1;
    }
}

/// Place `count` stars on a uniform random sample of free track cells.
///
/// Stars come back sorted by track index.
///
/// # Errors
///
/// Returns an error if there are fewer free cells than stars.
pub fn place_stars<R: Rng + ?Sized>(
    board: &Board,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Star>, SetupError> {
    let candidates = board.star_candidates();
    if candidates.len() < count {
        log::error!(
            "cannot place {count} stars, only {} cells available",
            candidates.len()
        );
        return Err(SetupError::NotEnoughStarCells {
            requested: count,
            available: candidates.len(),
        });
    }

    let mut indices: Vec<usize> = candidates.choose_multiple(rng, count).copied().collect();
    indices.sort_unstable();

    let stars: Vec<Star> = indices
        .into_iter()
        .filter_map(|index| Star::new(board, index))
        .collect();
    log::debug!(
        "placed {} stars at track cells {:?}",
        stars.len(),
        stars.iter().map(Star::track_index).collect::<Vec<_>>()
    );
    Ok(stars)
}
