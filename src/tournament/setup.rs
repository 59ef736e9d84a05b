//! Seating and deterministic game setup.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::{Board, Color, GameState, Player, PlayerId, Rules, place_stars};
use crate::strategy::Strategy;
use crate::tournament::TournamentError;

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Display name.
    pub name: String,
    /// Pawn color.
    pub color: Color,
    /// How pawns are picked.
    pub strategy: Strategy,
}

impl Seat {
    /// A seat named after its color.
    #[must_use]
    pub fn new(color: Color, strategy: Strategy) -> Self {
        Self {
            name: capitalize(color.name()),
            color,
            strategy,
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.color, self.strategy)
    }
}

/// Error returned when a seat description cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeatError(String);

impl fmt::Display for ParseSeatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid seat: {}", self.0)
    }
}

impl std::error::Error for ParseSeatError {}

impl FromStr for Seat {
    type Err = ParseSeatError;

    /// Parse `color[:strategy[:name]]`, e.g. `red:runner:Alice`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let color: Color = parts
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|e| ParseSeatError(format!("{e}")))?;
        let strategy = match parts.next() {
            Some(text) if !text.is_empty() => text
                .parse()
                .map_err(|e| ParseSeatError(format!("{e}")))?,
            _ => Strategy::default(),
        };
        let mut seat = Seat::new(color, strategy);
        if let Some(name) = parts.next().filter(|n| !n.is_empty()) {
            seat.name = name.to_string();
        }
        Ok(seat)
    }
}

/// `count` seats in color order, all playing `strategy`.
#[must_use]
pub fn default_seats(count: usize, strategy: Strategy) -> Vec<Seat> {
    Color::ALL
        .iter()
        .take(count)
        .map(|&color| Seat::new(color, strategy))
        .collect()
}

/// Check seat count and color uniqueness.
///
/// # Errors
///
/// Returns the first problem with the seating.
pub fn validate_seats(seats: &[Seat]) -> Result<(), TournamentError> {
    if seats.len() < 2 {
        return Err(TournamentError::TooFewPlayers(seats.len()));
    }
    if seats.len() > Color::ALL.len() {
        return Err(TournamentError::TooManyPlayers(seats.len()));
    }
    for (i, seat) in seats.iter().enumerate() {
        if seats[..i].iter().any(|s| s.color == seat.color) {
            return Err(TournamentError::DuplicateColor(seat.color));
        }
    }
    Ok(())
}

/// Build a fresh game: players in seating order, stars placed with `rng`.
///
/// # Errors
///
/// Returns an error for bad seating or rules that do not fit the board.
pub fn new_game<R: Rng + ?Sized>(
    seats: &[Seat],
    rules: &Rules,
    rng: &mut R,
) -> Result<GameState, TournamentError> {
    validate_seats(seats)?;
    let board = Arc::new(Board::standard());
    rules.validate(&board).map_err(TournamentError::Rules)?;

    let stars = place_stars(&board, rules.star_count, rng).map_err(TournamentError::Setup)?;
    let players = seats
        .iter()
        .enumerate()
        .map(|(i, seat)| {
            #[allow(clippy::cast_possible_truncation)]
            let id = i as PlayerId;
            Player::new(id, seat.name.clone(), seat.color)
        })
        .collect();

    GameState::new(board, *rules, players, stars).map_err(TournamentError::Setup)
}
