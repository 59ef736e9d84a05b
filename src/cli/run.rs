//! Run command implementation.

use super::output::{JsonRunOutput, format_text};
use super::{CliError, MatchArgs, OutputFormat, resolve_seed};
use ludo::game::{EventSink, GameEvent};
use ludo::replay::{Recording, render_llm};
use ludo::tournament::MatchRunner;
use std::path::PathBuf;

/// Prints each event as it happens and keeps a copy.
struct EchoSink {
    echo: bool,
    events: Vec<GameEvent>,
}

impl EventSink for EchoSink {
    fn emit(&mut self, event: GameEvent) {
        if self.echo {
            println!("{event}");
        }
        self.events.push(event);
    }
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the match cannot be set up or the recording cannot
/// be saved.
pub(crate) fn execute(
    game: &MatchArgs,
    seed: Option<u64>,
    format: OutputFormat,
    save: Option<PathBuf>,
    events: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let (seats, config) = game.resolve()?;
    let seed = resolve_seed(seed);
    let text = format == OutputFormat::Text;

    if text && !quiet {
        println!("Running game with seed {seed}...");
        let names: Vec<String> = seats.iter().map(ToString::to_string).collect();
        println!("Players: {}", names.join(", "));
        println!();
    }

    let mut runner = MatchRunner::new(seed, &seats, &config)?;
    let mut sink = EchoSink {
        echo: text && events,
        events: Vec::new(),
    };
    while runner.step(&mut sink) {}
    let result = runner.result();
    log::info!(
        "seed {seed}: {} turns, {} events",
        result.turns_played,
        sink.events.len()
    );

    if let Some(save_path) = save {
        let recording = Recording::new(seed, seats, config);
        recording
            .save(&save_path)
            .map_err(|e| CliError::new(format!("Failed to save recording: {e}")))?;
        if text && !quiet {
            println!("Recording saved to: {}", save_path.display());
            println!();
        }
    }

    match format {
        OutputFormat::Text => {
            if events {
                println!();
            }
            print!("{}", format_text(&result));
        }
        OutputFormat::Json => {
            let output = JsonRunOutput {
                result: &result,
                events: events.then_some(sink.events.as_slice()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Llm => {
            let state = runner.state();
            println!("{}", render_llm(state, state.turn()));
            println!();
            println!("=== FINAL RESULT ===");
            println!();
            let winner = result
                .winner
                .and_then(|id| result.player_stats.get(usize::from(id)));
            match winner {
                Some(stats) => println!("Winner: Player {} ({})", stats.player_id, stats.name),
                None => println!("Result: Draw"),
            }
            println!("Total turns: {}", result.turns_played);
            println!();
            println!("Pawns home:");
            for stats in &result.player_stats {
                println!(
                    "  Player {} ({}): {}/4",
                    stats.player_id, stats.name, stats.pawns_home
                );
            }
        }
    }

    Ok(())
}
