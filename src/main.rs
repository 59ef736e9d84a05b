//! Ludo CLI - Command-line interface for running and viewing Ludo games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Ludo - a deterministic race game engine with star tiles
#[derive(Parser, Debug)]
#[command(name = "ludo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single game between built-in strategies
    Run {
        #[command(flatten)]
        game: cli::MatchArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format: text, json, or llm
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Print every game event
        #[arg(short, long)]
        events: bool,

        /// Suppress the header output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive TUI to watch a game step by step
    Watch {
        #[command(flatten)]
        game: cli::MatchArgs,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Turn delay in milliseconds (default: 500)
        #[arg(long, default_value = "500")]
        speed: u64,

        /// Highlight player N's pawns (1-4, default: none)
        #[arg(short, long)]
        player: Option<u8>,
    },

    /// Replay a recorded game
    Replay {
        /// Recording file (JSON)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: tui, text, or llm
        #[arg(short, long, default_value = "tui")]
        format: cli::ReplayFormat,

        /// Start at specific turn
        #[arg(short, long)]
        turn: Option<u32>,

        /// Highlight player N's pawns (1-4, default: none)
        #[arg(short, long)]
        player: Option<u8>,

        /// Turn delay in milliseconds when playing (default: 500)
        #[arg(long, default_value = "500")]
        speed: u64,
    },

    /// Run many parallel games and aggregate statistics
    Tournament {
        #[command(flatten)]
        game: cli::MatchArgs,

        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Print a rule preset, or validate a rules file
    Rules {
        /// Rules JSON file to validate
        file: Option<PathBuf>,

        /// Preset to print when no file is given
        #[arg(long, value_enum, default_value = "classic")]
        preset: cli::RulesPreset,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    cli::logger::init(args.verbose);

    let result = match args.command {
        Commands::Run {
            game,
            seed,
            format,
            save,
            events,
            quiet,
        } => cli::run::execute(&game, seed, format, save, events, quiet),

        Commands::Watch {
            game,
            seed,
            speed,
            player,
        } => cli::watch::execute(&game, seed, speed, player),

        Commands::Replay {
            recording,
            format,
            turn,
            player,
            speed,
        } => cli::replay::execute(&recording, format, turn, player, speed),

        Commands::Tournament {
            game,
            games,
            seed,
            threads,
            format,
            progress,
        } => cli::tournament::execute(&game, games, seed, threads, format, progress),

        Commands::Rules { file, preset } => cli::rules::execute(file.as_deref(), preset),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_global_verbosity() {
        let args = Args::parse_from(["ludo", "tournament", "-vv", "--games", "3"]);
        assert_eq!(args.verbose, 2);
        assert!(matches!(args.command, Commands::Tournament { games: 3, .. }));
    }
}
