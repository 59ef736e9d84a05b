//! Replay command implementation.

use super::view::{ViewOptions, run_tui};
use super::{CliError, ReplayFormat};
use ludo::game::PlayerId;
use ludo::replay::{Recording, ReplayEngine, ReplayError, render_ascii, render_llm};
use std::path::Path;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
pub(crate) fn execute(
    recording_path: &Path,
    format: ReplayFormat,
    turn: Option<u32>,
    player: Option<PlayerId>,
    speed: u64,
) -> Result<(), CliError> {
    let recording = Recording::load(recording_path).map_err(|e| {
        CliError::new(format!(
            "Failed to load recording {}: {e}",
            recording_path.display()
        ))
    })?;

    let engine = match turn {
        Some(target_turn) => ReplayEngine::new_at_turn(recording, target_turn)?,
        None => ReplayEngine::new(recording)?,
    };

    match format {
        ReplayFormat::Tui => run_tui(
            engine,
            ViewOptions {
                title: "Ludo Replay",
                speed_ms: speed,
                autoplay: false,
                player_view: player.and_then(|p| p.checked_sub(1)),
            },
        ),
        ReplayFormat::Text => print_replay(engine, Style::Text),
        ReplayFormat::Llm => print_replay(engine, Style::Llm),
    }
}

#[derive(Clone, Copy)]
enum Style {
    Text,
    Llm,
}

fn print_replay(mut engine: ReplayEngine, style: Style) -> Result<(), CliError> {
    let recording = engine.recording();
    match style {
        Style::Text => println!("Replay of game (seed: {})", recording.seed),
        Style::Llm => {
            println!("# Game Replay");
            println!("Seed: {}", recording.seed);
        }
    }
    println!("Max turns: {}", recording.config.max_turns);
    println!();

    loop {
        match style {
            Style::Text => {
                println!("{}", render_ascii(engine.state(), engine.turn()));
                for event in engine.last_events() {
                    println!("  {event}");
                }
                println!();
            }
            Style::Llm => {
                println!("{}", render_llm(engine.state(), engine.turn()));
                println!();
                println!("---");
                println!();
            }
        }

        match engine.step_forward() {
            Ok(()) => {}
            Err(ReplayError::GameOver) => break,
            Err(e) => return Err(e.into()),
        }
    }

    match style {
        Style::Text => println!("=== GAME OVER ==="),
        Style::Llm => println!("# GAME OVER"),
    }
    Ok(())
}
