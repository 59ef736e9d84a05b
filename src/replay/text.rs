//! Structured text output for LLM consumption.
//!
//! This format is optimized for machine readability while remaining
//! human-parseable. Positions are given both as route progress and as
//! board locations.

// Allow format! with push_str for readability - the allocation overhead is negligible for text rendering
#![allow(clippy::format_push_string)]

use crate::game::{GameState, Pawn, Phase, Player};

/// Render game state to structured text format for LLM consumption.
///
/// Output format:
/// ```text
/// === TURN 42 ===
/// PHASE: Blue moves 4
///
/// BOARD:
/// - Stars on track cells: 5, 17, 30, 44
///
/// PLAYER 0 (Red, Ann):
/// - Pawn 0: track cell 12 (progress 13)
/// - Pawn 1: base
/// - Pawn 2: home stretch 3/6 (progress 54)
/// - Pawn 3: finished
/// - Captures: 2, captured: 1, stars: 1
///
/// GAME STATUS: In progress, leader Red
/// ```
#[must_use]
pub fn render_llm(state: &GameState, turn: u32) -> String {
    let mut output = String::new();

    output.push_str(&format!("=== TURN {turn} ===\n"));
    render_phase(&mut output, state);
    render_board(&mut output, state);

    for player in state.players() {
        render_player_status(&mut output, state, player);
    }

    render_game_status(&mut output, state);

    output
}

fn render_phase(output: &mut String, state: &GameState) {
    let describe = |id| {
        state
            .player(id)
            .map_or_else(|| format!("player {id}"), |p| p.color.to_string())
    };
    let text = match state.phase() {
        Phase::AwaitingRoll { player } => format!("{} to roll", describe(player)),
        Phase::Resolving { player, roll } => {
            let pawns: Vec<String> = state
                .eligible_pawns()
                .iter()
                .map(ToString::to_string)
                .collect();
            format!(
                "{} moves {roll}, eligible pawns [{}]",
                describe(player),
                pawns.join(", ")
            )
        }
        Phase::GameOver { winner } => format!("{} has won", describe(winner)),
    };
    output.push_str(&format!("PHASE: {text}\n\n"));
}

fn render_board(output: &mut String, state: &GameState) {
    let stars: Vec<String> = state
        .stars()
        .iter()
        .map(|s| s.track_index().to_string())
        .collect();
    output.push_str("BOARD:\n");
    if stars.is_empty() {
        output.push_str("- No stars\n");
    } else {
        output.push_str(&format!("- Stars on track cells: {}\n", stars.join(", ")));
    }
    output.push('\n');
}

fn render_player_status(output: &mut String, state: &GameState, player: &Player) {
    output.push_str(&format!(
        "PLAYER {} ({}, {}):\n",
        player.id,
        capitalized(player.color.name()),
        player.name
    ));
    for (index, pawn) in player.pawns().iter().enumerate() {
        output.push_str(&format!(
            "- Pawn {index}: {}\n",
            pawn_location(state, player, pawn)
        ));
    }
    output.push_str(&format!(
        "- Captures: {}, captured: {}, stars: {}\n\n",
        player.captures, player.times_captured, player.stars_triggered
    ));
}

fn pawn_location(state: &GameState, player: &Player, pawn: &Pawn) -> String {
    let board = state.board();
    let progress = pawn.progress();
    if pawn.is_at_base() {
        return "base".to_string();
    }
    if pawn.is_finished(state.terminal()) {
        return "finished".to_string();
    }
    if let Some(index) = board.track_index(player.color, progress) {
        let mut text = format!("track cell {index} (progress {progress})");
        if board.is_safe(index) {
            text.push_str(", safe");
        }
        if state.stars().iter().any(|s| s.track_index() == index) {
            text.push_str(", on a star");
        }
        return text;
    }
    let step = progress - board.shared_len();
    format!(
        "home stretch {step}/{} (progress {progress})",
        board.home_len()
    )
}

fn render_game_status(output: &mut String, state: &GameState) {
    let name = |id| {
        state
            .player(id)
            .map_or_else(|| format!("player {id}"), |p| capitalized(p.color.name()))
    };
    match state.winner() {
        Some(winner) => {
            output.push_str(&format!("GAME STATUS: Over, winner {}\n", name(winner)));
        }
        None => {
            let leader = state
                .standings()
                .first()
                .map_or_else(|| "none".to_string(), |&id| name(id));
            output.push_str(&format!("GAME STATUS: In progress, leader {leader}\n"));
        }
    }
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
