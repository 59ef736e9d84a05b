//! ASCII renderer for terminal viewing with ANSI colors.
//!
//! [`board_glyphs`] turns a game into a grid of symbols; the ANSI renderer
//! here and the ratatui viewer both draw from it.

// Allow format! with push_str for readability
#![allow(clippy::format_push_string)]

use std::collections::HashMap;

use crate::game::{Board, CellKind, Color, Coord, GRID_SIZE, GameState, Phase};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GRAY: &str = "\x1b[90m";
const WHITE: &str = "\x1b[37m";

/// One drawn board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Symbol to draw.
    pub symbol: char,
    /// Owning color, if any.
    pub color: Option<Color>,
    /// Pawns stand here.
    pub occupied: bool,
}

impl Glyph {
    const fn plain(symbol: char) -> Self {
        Self {
            symbol,
            color: None,
            occupied: false,
        }
    }

    const fn colored(symbol: char, color: Color) -> Self {
        Self {
            symbol,
            color: Some(color),
            occupied: false,
        }
    }
}

/// Build the 15x15 symbol grid, row by row.
///
/// Pawns show as their color letter, or a digit when several of one color
/// share a cell; `@` marks opponents sharing a safe cell. Empty cells:
/// `.` track, `o` safe, `*` star, `-` home stretch, `#` home, `_` base.
#[must_use]
pub fn board_glyphs(state: &GameState) -> Vec<Vec<Glyph>> {
    let board = state.board();
    let occupants = occupants(state);
    let stars: Vec<Coord> = state.stars().iter().map(|s| s.coord()).collect();

    (0..GRID_SIZE)
        .map(|y| {
            (0..GRID_SIZE)
                .map(|x| {
                    let coord = Coord::new(x, y);
                    occupants.get(&coord).map_or_else(
                        || cell_glyph(board, coord, stars.contains(&coord)),
                        |colors| pawn_glyph(colors),
                    )
                })
                .collect()
        })
        .collect()
}

fn occupants(state: &GameState) -> HashMap<Coord, Vec<Color>> {
    let board = state.board();
    let mut map: HashMap<Coord, Vec<Color>> = HashMap::new();
    for player in state.players() {
        for (index, pawn) in player.pawns().iter().enumerate() {
            if let Some(coord) = board.coord_of(player.color, index, pawn.progress()) {
                map.entry(coord).or_default().push(player.color);
            }
        }
    }
    map
}

fn pawn_glyph(colors: &[Color]) -> Glyph {
    let Some(&first) = colors.first() else {
        return Glyph::plain(' ');
    };
    if colors.iter().any(|&c| c != first) {
        return Glyph {
            symbol: '@',
            color: None,
            occupied: true,
        };
    }
    let symbol = match colors.len() {
        1 => first.letter(),
        #[allow(clippy::cast_possible_truncation)]
        n => char::from_digit(n as u32, 10).unwrap_or('+'),
    };
    Glyph {
        symbol,
        color: Some(first),
        occupied: true,
    }
}

fn cell_glyph(board: &Board, coord: Coord, star: bool) -> Glyph {
    match board.cell_kind(coord) {
        CellKind::Track { .. } if star => Glyph::plain('*'),
        CellKind::Track { safe: true, .. } => Glyph::plain('o'),
        CellKind::Track { .. } => Glyph::plain('.'),
        CellKind::Home {
            color,
            terminal: true,
        } => Glyph::colored('#', color),
        CellKind::Home { color, .. } => Glyph::colored('-', color),
        CellKind::Base(color) => Glyph::colored('_', color),
        CellKind::Empty => Glyph::plain(' '),
    }
}

/// ANSI escape for a color.
#[must_use]
pub const fn ansi_color(color: Color) -> &'static str {
    match color {
        Color::Red => "\x1b[31m",
        Color::Blue => "\x1b[34m",
        Color::Yellow => "\x1b[33m",
        Color::Green => "\x1b[32m",
    }
}

/// Render game state to ASCII with ANSI colors.
///
/// Output format:
/// ```text
/// Turn 42    Blue to roll               [Red 1/4] [Blue 0/4]
/// ┌───────────────────────────────┐
/// │ _ _ . . . .   . . . . . . _ _ │
/// │ ...                           │
/// └───────────────────────────────┘
///
/// Legend: .=track o=safe *=star -=home stretch #=home _=base
///
/// Red (first):   home 1  in play 2  captures 3  captured 0  stars 1
/// ```
#[must_use]
pub fn render_ascii(state: &GameState, turn: u32) -> String {
    let mut output = String::new();

    render_header(&mut output, state, turn);
    render_board(&mut output, state);

    output.push_str(
        "\nLegend: .=track o=safe *=star -=home stretch #=home _=base  \
         R/B/Y/G=pawn 2-4=stacked @=mixed\n\n",
    );

    render_player_stats(&mut output, state);

    output
}

fn render_header(output: &mut String, state: &GameState, turn: u32) {
    let status = phase_text(state);
    let left = format!("Turn {turn}    {status}");
    output.push_str(&left);
    let padding = 44usize.saturating_sub(left.chars().count());
    output.push_str(&" ".repeat(padding));

    let terminal = state.terminal();
    for player in state.players() {
        let color = ansi_color(player.color);
        output.push_str(&format!(
            "{color}[{} {}/4]{RESET} ",
            player.name,
            player.pawns_home(terminal)
        ));
    }
    output.push('\n');
}

/// One-line description of the phase.
#[must_use]
pub fn phase_text(state: &GameState) -> String {
    let name = |id| {
        state
            .player(id)
            .map_or_else(|| format!("player {id}"), |p| p.name.clone())
    };
    match state.phase() {
        Phase::AwaitingRoll { player } => format!("{} to roll", name(player)),
        Phase::Resolving { player, roll } => format!("{} moves {roll}", name(player)),
        Phase::GameOver { winner } => format!("{} wins!", name(winner)),
    }
}

fn render_board(output: &mut String, state: &GameState) {
    let width = usize::from(GRID_SIZE) * 2 + 1;
    output.push('┌');
    output.push_str(&"─".repeat(width));
    output.push_str("┐\n");

    for row in board_glyphs(state) {
        output.push_str("│ ");
        for glyph in row {
            push_glyph(output, glyph);
            output.push(' ');
        }
        output.push_str("│\n");
    }

    output.push('└');
    output.push_str(&"─".repeat(width));
    output.push_str("┘\n");
}

fn push_glyph(output: &mut String, glyph: Glyph) {
    let symbol = glyph.symbol;
    match (glyph.color, glyph.occupied) {
        (Some(color), true) => {
            output.push_str(&format!("{BOLD}{}{symbol}{RESET}", ansi_color(color)));
        }
        (Some(color), false) => {
            output.push_str(&format!("{}{symbol}{RESET}", ansi_color(color)));
        }
        (None, true) => output.push_str(&format!("{BOLD}{WHITE}{symbol}{RESET}")),
        (None, false) if symbol == '*' => output.push_str(&format!("{BOLD}{WHITE}*{RESET}")),
        (None, false) => output.push_str(&format!("{GRAY}{symbol}{RESET}")),
    }
}

fn render_player_stats(output: &mut String, state: &GameState) {
    let terminal = state.terminal();
    for player in state.players() {
        let color = ansi_color(player.color);
        output.push_str(&format!(
            "{color}{:<10}{RESET} home {}  in play {}  captures {}  captured {}  stars {}\n",
            player.name,
            player.pawns_home(terminal),
            player.pawns_in_play(terminal),
            player.captures,
            player.times_captured,
            player.stars_triggered,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{PawnId, Player, Rules, Star};
    use std::sync::Arc;

    fn game() -> GameState {
        let board = Board::standard();
        let stars = vec![Star::new(&board, 3).unwrap()];
        let players = vec![
            Player::new(0, "Ann", Color::Red),
            Player::new(1, "Bob", Color::Blue),
        ];
        GameState::new(Arc::new(board), Rules::classic(), players, stars).unwrap()
    }

    #[test]
    fn test_glyph_grid_shape() {
        let glyphs = board_glyphs(&game());
        assert_eq!(glyphs.len(), 15);
        assert!(glyphs.iter().all(|row| row.len() == 15));
    }

    #[test]
    fn test_star_and_pawns_drawn() {
        let mut state = game();
        let glyphs = board_glyphs(&state);
        let star = state.stars()[0].coord();
        assert_eq!(glyphs[usize::from(star.y)][usize::from(star.x)].symbol, '*');

        state.place_pawn(PawnId { player: 0, index: 0 }, 4);
        state.place_pawn(PawnId { player: 0, index: 1 }, 4);
        let glyphs = board_glyphs(&state);
        let cell = glyphs[usize::from(star.y)][usize::from(star.x)];
        assert_eq!(cell.symbol, '2');
        assert_eq!(cell.color, Some(Color::Red));
        assert!(cell.occupied);
    }

    #[test]
    fn test_mixed_safe_cell() {
        let mut state = game();
        // Track cell 13, Blue's start.
        state.place_pawn(PawnId { player: 0, index: 0 }, 14);
        state.place_pawn(PawnId { player: 1, index: 0 }, 1);
        let coord = state.board().track_coord(13).unwrap();
        let glyphs = board_glyphs(&state);
        assert_eq!(glyphs[usize::from(coord.y)][usize::from(coord.x)].symbol, '@');
    }

    #[test]
    fn test_render_ascii_contains_names() {
        let text = render_ascii(&game(), 3);
        assert!(text.contains("Turn 3"));
        assert!(text.contains("Ann to roll"));
        assert!(text.contains("Bob"));
        assert!(text.contains("Legend"));
    }
}
