//! Board position table.
//!
//! The standard board is a 15×15 grid with a 52-cell shared track running
//! clockwise around the center, four private home stretches and four bases.
//! A pawn's progress counter is translated into a grid coordinate here and
//! nowhere else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Width and height of the board grid.
pub const GRID_SIZE: u8 = 15;

/// Number of cells on the shared track.
pub const TRACK_LEN: usize = 52;

/// Number of private cells per color, terminal cell included.
pub const HOME_LEN: u8 = 6;

/// Pawns owned by every player.
pub const PAWNS_PER_PLAYER: usize = 4;

/// A cell on the board grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Column.
    pub x: u8,
    /// Row.
    pub y: u8,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance to another coordinate.
    #[must_use]
    pub const fn chebyshev(self, other: Self) -> u8 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Player color. Declaration order is the seating (and turn) order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Starts on the left arm.
    Red,
    /// Starts on the top arm.
    Blue,
    /// Starts on the right arm.
    Yellow,
    /// Starts on the bottom arm.
    Green,
}

impl Color {
    /// All colors in seating order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Yellow, Color::Green];

    /// Position of this color in seating order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Yellow => 2,
            Color::Green => 3,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Green => "green",
        }
    }

    /// Single-letter tag used by the text renderers.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Green => 'G',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown color name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown color '{}' (expected red, blue, yellow or green)",
            self.0
        )
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(Color::Red),
            "blue" | "b" => Ok(Color::Blue),
            "yellow" | "y" => Ok(Color::Yellow),
            "green" | "g" => Ok(Color::Green),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

/// Shared track, clockwise from Red's start cell.
const TRACK: [(u8, u8); TRACK_LEN] = [
    (1, 6), (2, 6), (3, 6), (4, 6), (5, 6),
    (6, 5), (6, 4), (6, 3), (6, 2), (6, 1), (6, 0),
    (7, 0),
    (8, 0), (8, 1), (8, 2), (8, 3), (8, 4), (8, 5),
    (9, 6), (10, 6), (11, 6), (12, 6), (13, 6), (14, 6),
    (14, 7),
    (14, 8), (13, 8), (12, 8), (11, 8), (10, 8), (9, 8),
    (8, 9), (8, 10), (8, 11), (8, 12), (8, 13), (8, 14),
    (7, 14),
    (6, 14), (6, 13), (6, 12), (6, 11), (6, 10), (6, 9),
    (5, 8), (4, 8), (3, 8), (2, 8), (1, 8), (0, 8),
    (0, 7),
    (0, 6),
];

/// Track index of each color's start cell, in seating order.
const START_OFFSETS: [usize; 4] = [0, 13, 26, 39];

/// Distance from a start cell to the extra safe cell further along.
const SAFE_STEP: usize = 8;

/// Home stretches, outermost cell first; the last cell is terminal.
const HOME_STRETCHES: [[(u8, u8); HOME_LEN as usize]; 4] = [
    [(1, 7), (2, 7), (3, 7), (4, 7), (5, 7), (6, 7)],
    [(7, 1), (7, 2), (7, 3), (7, 4), (7, 5), (7, 6)],
    [(13, 7), (12, 7), (11, 7), (10, 7), (9, 7), (8, 7)],
    [(7, 13), (7, 12), (7, 11), (7, 10), (7, 9), (7, 8)],
];

/// Base slots, one per pawn.
const BASES: [[(u8, u8); PAWNS_PER_PLAYER]; 4] = [
    [(2, 2), (3, 2), (2, 3), (3, 3)],
    [(11, 2), (12, 2), (11, 3), (12, 3)],
    [(11, 11), (12, 11), (11, 12), (12, 12)],
    [(2, 11), (3, 11), (2, 12), (3, 12)],
];

fn coords<const N: usize>(cells: [(u8, u8); N]) -> [Coord; N] {
    cells.map(|(x, y)| Coord::new(x, y))
}

/// What occupies a grid coordinate on an empty board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Shared track cell.
    Track {
        /// Index along the track.
        index: usize,
        /// Whether capture is disallowed here.
        safe: bool,
    },
    /// Private home stretch cell of a color.
    Home {
        /// Owning color.
        color: Color,
        /// Whether this is the terminal cell.
        terminal: bool,
    },
    /// Base slot of a color.
    Base(Color),
    /// Not part of any path.
    Empty,
}

/// Immutable board layout shared by every game.
#[derive(Debug, Clone)]
pub struct Board {
    track: Vec<Coord>,
    safe: Vec<bool>,
    start_offsets: [usize; 4],
    home: [[Coord; HOME_LEN as usize]; 4],
    bases: [[Coord; PAWNS_PER_PLAYER]; 4],
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    /// The standard four-color board.
    #[must_use]
    pub fn standard() -> Self {
        let track: Vec<Coord> = coords(TRACK).to_vec();
        let mut safe = vec![false; track.len()];
        for start in START_OFFSETS {
            safe[start] = true;
            safe[(start + SAFE_STEP) % TRACK_LEN] = true;
        }

        Self {
            track,
            safe,
            start_offsets: START_OFFSETS,
            home: HOME_STRETCHES.map(coords),
            bases: BASES.map(coords),
        }
    }

    /// Number of cells on the shared track.
    #[must_use]
    pub fn track_len(&self) -> usize {
        self.track.len()
    }

    /// Number of shared cells a pawn walks before its home stretch.
    #[must_use]
    pub fn shared_len(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation)]
        let len = (self.track.len() - 1) as u8;
        len
    }

    /// Number of private home cells per color.
    #[must_use]
    pub const fn home_len(&self) -> u8 {
        HOME_LEN
    }

    /// Progress value of the terminal (finished) cell.
    #[must_use]
    pub fn terminal(&self) -> u8 {
        self.shared_len() + self.home_len()
    }

    /// Track index of a color's start cell.
    #[must_use]
    pub const fn start_index(&self, color: Color) -> usize {
        self.start_offsets[color.index()]
    }

    /// Track index of the last shared cell a color visits.
    #[must_use]
    pub fn home_entry_index(&self, color: Color) -> usize {
        (self.start_index(color) + usize::from(self.shared_len()) - 1) % self.track_len()
    }

    /// Whether capture is disallowed on a track cell.
    #[must_use]
    pub fn is_safe(&self, track_index: usize) -> bool {
        self.safe.get(track_index).copied().unwrap_or(false)
    }

    /// Coordinate of a track cell.
    #[must_use]
    pub fn track_coord(&self, track_index: usize) -> Option<Coord> {
        self.track.get(track_index).copied()
    }

    /// Track index for a pawn of `color` at `progress`, if it is on the track.
    #[must_use]
    pub fn track_index(&self, color: Color, progress: u8) -> Option<usize> {
        if progress == 0 || progress > self.shared_len() {
            return None;
        }
        Some((self.start_index(color) + usize::from(progress) - 1) % self.track_len())
    }

    /// Progress a pawn of `color` has when standing on a track cell.
    ///
    /// Returns `None` for the one cell a color never walks over.
    #[must_use]
    pub fn progress_at(&self, color: Color, track_index: usize) -> Option<u8> {
        if track_index >= self.track_len() {
            return None;
        }
        let offset = (track_index + self.track_len() - self.start_index(color)) % self.track_len();
        let progress = u8::try_from(offset + 1).ok()?;
        (progress <= self.shared_len()).then_some(progress)
    }

    /// Grid coordinate for pawn `pawn_index` of `color` at `progress`.
    ///
    /// Pawns at base occupy their own base slot.
    #[must_use]
    pub fn coord_of(&self, color: Color, pawn_index: usize, progress: u8) -> Option<Coord> {
        if progress == 0 {
            return self.bases[color.index()].get(pawn_index).copied();
        }
        if let Some(index) = self.track_index(color, progress) {
            return self.track_coord(index);
        }
        let home_step = progress.checked_sub(self.shared_len() + 1)?;
        self.home[color.index()].get(usize::from(home_step)).copied()
    }

    /// Track cells where a star may be placed.
    ///
    /// Safe cells and home-entry cells are excluded.
    #[must_use]
    pub fn star_candidates(&self) -> Vec<usize> {
        (0..self.track_len())
            .filter(|&index| !self.is_safe(index))
            .filter(|&index| {
                Color::ALL
                    .iter()
                    .all(|&color| self.home_entry_index(color) != index)
            })
            .collect()
    }

    /// Classify a grid coordinate.
    #[must_use]
    pub fn cell_kind(&self, coord: Coord) -> CellKind {
        if let Some(index) = self.track.iter().position(|&c| c == coord) {
            return CellKind::Track {
                index,
                safe: self.is_safe(index),
            };
        }
        for color in Color::ALL {
            if let Some(step) = self.home[color.index()].iter().position(|&c| c == coord) {
                return CellKind::Home {
                    color,
                    terminal: step + 1 == usize::from(HOME_LEN),
                };
            }
            if self.bases[color.index()].contains(&coord) {
                return CellKind::Base(color);
            }
        }
        CellKind::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_track_is_a_closed_loop() {
        let board = Board::standard();
        assert_eq!(board.track_len(), TRACK_LEN);

        for i in 0..board.track_len() {
            let a = board.track_coord(i).unwrap();
            let b = board.track_coord((i + 1) % board.track_len()).unwrap();
            assert_eq!(a.chebyshev(b), 1, "cells {i} and {} are not adjacent", i + 1);
        }
    }

    #[test]
    fn test_cells_are_unique() {
        let board = Board::standard();
        let mut seen = HashSet::new();
        for i in 0..board.track_len() {
            assert!(seen.insert(board.track_coord(i).unwrap()));
        }
        for color in Color::ALL {
            for p in board.shared_len() + 1..=board.terminal() {
                assert!(seen.insert(board.coord_of(color, 0, p).unwrap()));
            }
            for pawn in 0..PAWNS_PER_PLAYER {
                assert!(seen.insert(board.coord_of(color, pawn, 0).unwrap()));
            }
        }
    }

    #[test]
    fn test_progress_limits() {
        let board = Board::standard();
        assert_eq!(board.shared_len(), 51);
        assert_eq!(board.terminal(), 57);
        assert!(board.coord_of(Color::Red, 0, 58).is_none());
    }

    #[test]
    fn test_progress_maps_to_start_cell() {
        let board = Board::standard();
        assert_eq!(board.track_index(Color::Red, 1), Some(0));
        assert_eq!(board.track_index(Color::Blue, 1), Some(13));
        assert_eq!(board.track_index(Color::Yellow, 1), Some(26));
        assert_eq!(board.track_index(Color::Green, 1), Some(39));
        assert!(board.is_safe(13));
    }

    #[test]
    fn test_track_index_wraps() {
        let board = Board::standard();
        // Green walks past the end of the track array back to index 0.
        assert_eq!(board.track_index(Color::Green, 14), Some(0));
        assert_eq!(board.track_index(Color::Green, 51), Some(37));
        assert_eq!(board.home_entry_index(Color::Green), 37);
        assert_eq!(board.track_index(Color::Green, 52), None);
    }

    #[test]
    fn test_progress_at_inverts_track_index() {
        let board = Board::standard();
        for color in Color::ALL {
            for p in 1..=board.shared_len() {
                let index = board.track_index(color, p).unwrap();
                assert_eq!(board.progress_at(color, index), Some(p));
            }
            let skipped = (board.start_index(color) + TRACK_LEN - 1) % TRACK_LEN;
            assert_eq!(board.progress_at(color, skipped), None);
        }
    }

    #[test]
    fn test_home_stretch_follows_home_entry() {
        let board = Board::standard();
        for color in Color::ALL {
            let entry = board.coord_of(color, 0, board.shared_len()).unwrap();
            let first_home = board.coord_of(color, 0, board.shared_len() + 1).unwrap();
            assert_eq!(entry.chebyshev(first_home), 1);
        }
    }

    #[test]
    fn test_star_candidates_skip_restricted() {
        let board = Board::standard();
        let candidates = board.star_candidates();
        assert_eq!(candidates.len(), TRACK_LEN - 8 - 4);
        for color in Color::ALL {
            assert!(!candidates.contains(&board.start_index(color)));
            assert!(!candidates.contains(&board.home_entry_index(color)));
        }
    }

    #[test]
    fn test_cell_kind() {
        let board = Board::standard();
        assert_eq!(
            board.cell_kind(Coord::new(1, 6)),
            CellKind::Track { index: 0, safe: true }
        );
        assert_eq!(
            board.cell_kind(Coord::new(6, 7)),
            CellKind::Home { color: Color::Red, terminal: true }
        );
        assert_eq!(board.cell_kind(Coord::new(2, 2)), CellKind::Base(Color::Red));
        assert_eq!(board.cell_kind(Coord::new(0, 0)), CellKind::Empty);
    }

    #[test]
    fn test_color_parse() {
        assert_eq!("Red".parse::<Color>(), Ok(Color::Red));
        assert_eq!("g".parse::<Color>(), Ok(Color::Green));
        assert!("purple".parse::<Color>().is_err());
    }
}
