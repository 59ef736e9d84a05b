//! Watch command implementation - Interactive TUI viewer.

use super::view::{ViewOptions, run_tui};
use super::{CliError, MatchArgs, resolve_seed};
use ludo::game::PlayerId;
use ludo::replay::{Recording, ReplayEngine};

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the match cannot be set up or the TUI fails.
pub(crate) fn execute(
    game: &MatchArgs,
    seed: Option<u64>,
    speed: u64,
    player: Option<PlayerId>,
) -> Result<(), CliError> {
    let (seats, config) = game.resolve()?;
    let seed = resolve_seed(seed);
    log::info!("watching seed {seed}");

    let engine = ReplayEngine::new(Recording::new(seed, seats, config))?;
    run_tui(
        engine,
        ViewOptions {
            title: "Ludo Viewer",
            speed_ms: speed,
            autoplay: false,
            player_view: player.and_then(|p| p.checked_sub(1)),
        },
    )
}
