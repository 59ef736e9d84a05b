//! Tournament command implementation.

// Throughput figures
#![allow(clippy::cast_precision_loss)]

use super::output::{
    JsonTournamentResult, TournamentStats, format_tournament_csv, format_tournament_text,
};
use super::{CliError, MatchArgs, TournamentFormat, resolve_seed};
use indicatif::{ProgressBar, ProgressStyle};
use ludo::game::Board;
use ludo::tournament::{run_game, validate_seats};
use rayon::prelude::*;
use std::time::Instant;

/// Execute the tournament command.
///
/// Game `i` uses seed `base + i`, so any single game can be rerun with
/// `ludo run --seed`.
///
/// # Errors
///
/// Returns an error if the seating or rules are invalid.
pub(crate) fn execute(
    game: &MatchArgs,
    games: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    format: TournamentFormat,
    progress: bool,
) -> Result<(), CliError> {
    let (seats, config) = game.resolve()?;
    validate_seats(&seats)?;
    config.rules.validate(&Board::standard())?;

    if let Some(num_threads) = threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
    {
        log::warn!("thread pool already initialized: {e}");
    }

    let base_seed = resolve_seed(seed);
    log::info!("tournament: {games} games from seed {base_seed}");

    let pb = if progress {
        let style = ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})",
            )
            .map_err(|e| CliError::new(format!("Bad progress template: {e}")))?
            .progress_chars("=>-");
        let pb = ProgressBar::new(games);
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let num_seats = seats.len();

    // Each worker folds into its own tally; tallies are merged at the end.
    let stats = (0..games)
        .into_par_iter()
        .fold(
            || TournamentStats::new(num_seats),
            |mut local_stats, i| {
                let game_seed = base_seed.wrapping_add(i);
                match run_game(game_seed, &seats, &config) {
                    Ok(result) => local_stats.add_result(&result),
                    Err(e) => log::error!("game {game_seed} failed: {e}"),
                }
                if let Some(pb) = &pb {
                    pb.inc(1);
                }
                local_stats
            },
        )
        .reduce(
            || TournamentStats::new(num_seats),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let games_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.games_played as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    match format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats, &seats));
            println!();
            println!(
                "Duration: {:.2}s ({games_per_sec:.0} games/sec)",
                duration.as_secs_f64()
            );
        }
        TournamentFormat::Json => {
            let json_result = JsonTournamentResult::from_stats(&stats, &seats);
            println!("{}", serde_json::to_string_pretty(&json_result)?);
        }
        TournamentFormat::Csv => {
            print!("{}", format_tournament_csv(&stats, &seats));
        }
    }

    Ok(())
}
