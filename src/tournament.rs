//! Match runner for Ludo games.
//!
//! Provides a pure function interface: `(seed, seats, config) -> GameResult`
//!
//! The runner handles:
//! - Deterministic setup (star placement) from the seed
//! - Rolling dice and asking each seat's strategy for a pawn
//! - A turn cap so pathological games still end
//! - Per-player statistics for the tournament tables

mod setup;

pub use setup::{ParseSeatError, Seat, default_seats, new_game, validate_seats};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::game::{Color, EventSink, GameState, Phase, PlayerId, Rules, RulesError};
use crate::strategy::{PawnChooser, Strategy};

/// Configuration for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Rules in force.
    pub rules: Rules,
    /// Turns before the game is called a draw.
    pub max_turns: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rules: Rules::classic(),
            max_turns: 2000,
        }
    }
}

/// Statistics for a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    /// Player identifier.
    pub player_id: PlayerId,
    /// Display name.
    pub name: String,
    /// Pawn color.
    pub color: Color,
    /// Strategy that played the seat.
    pub strategy: Strategy,
    /// Pawns on the terminal cell at the end.
    pub pawns_home: usize,
    /// Opponent pawns sent back to base.
    pub captures: u32,
    /// Own pawns sent back to base by opponents.
    pub times_captured: u32,
    /// Stars landed on.
    pub stars_triggered: u32,
    /// Sum of pawn progress at the end.
    pub total_progress: u32,
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// The winning player (None if the turn cap was hit).
    pub winner: Option<PlayerId>,
    /// Total turns played.
    pub turns_played: u32,
    /// Pawn moves made.
    pub moves: u32,
    /// Per-player statistics, in seating order.
    pub player_stats: Vec<PlayerStats>,
    /// Player ids, best first.
    pub standings: Vec<PlayerId>,
    /// The seed used for this game.
    pub seed: u64,
}

/// Error type for match setup.
#[derive(Debug)]
pub enum TournamentError {
    /// Not enough players (minimum 2).
    TooFewPlayers(usize),
    /// Too many players (maximum 4).
    TooManyPlayers(usize),
    /// Two seats share a color.
    DuplicateColor(Color),
    /// The rules are invalid.
    Rules(RulesError),
    /// The game could not be built.
    Setup(SetupError),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewPlayers(n) => write!(f, "Too few players: {n} (minimum 2)"),
            Self::TooManyPlayers(n) => write!(f, "Too many players: {n} (maximum 4)"),
            Self::DuplicateColor(color) => write!(f, "Color {color} is used by two seats"),
            Self::Rules(e) => write!(f, "Invalid rules: {e}"),
            Self::Setup(e) => write!(f, "Game setup failed: {e}"),
        }
    }
}

impl std::error::Error for TournamentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rules(e) => Some(e),
            Self::Setup(e) => Some(e),
            _ => None,
        }
    }
}

/// Run a complete game with the given seed and seats.
///
/// This is the main entry point - a pure function from inputs to result.
///
/// # Determinism
///
/// Given the same seed, seats and config, this function always produces
/// the same `GameResult`.
///
/// # Errors
///
/// Returns an error if:
/// - Number of seats is outside valid range (2-4)
/// - Two seats share a color
/// - The rules are invalid
pub fn run_game(
    seed: u64,
    seats: &[Seat],
    config: &MatchConfig,
) -> Result<GameResult, TournamentError> {
    let runner = MatchRunner::new(seed, seats, config)?;
    Ok(runner.run(&mut crate::game::NullSink))
}

/// Drives one game action by action.
///
/// All randomness comes from a single `StdRng` seeded from the match seed,
/// so a runner can be rebuilt and replayed to any point.
#[derive(Debug, Clone)]
pub struct MatchRunner {
    state: GameState,
    strategies: Vec<Strategy>,
    rng: StdRng,
    config: MatchConfig,
    seed: u64,
    moves: u32,
}

impl MatchRunner {
    /// Set up a match.
    ///
    /// # Errors
    ///
    /// Returns an error for bad seating or rules.
    pub fn new(seed: u64, seats: &[Seat], config: &MatchConfig) -> Result<Self, TournamentError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = new_game(seats, &config.rules, &mut rng)?;
        log::debug!("match {seed}: {} seats", seats.len());

        Ok(Self {
            state,
            strategies: seats.iter().map(|s| s.strategy).collect(),
            rng,
            config: *config,
            seed,
            moves: 0,
        })
    }

    /// Current game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The match seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether the game is won or the turn cap is reached.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_game_over() || self.state.turn() >= self.config.max_turns
    }

    /// Perform one action: roll the dice or move a pawn.
    ///
    /// Returns `false` once the match is finished.
    pub fn step(&mut self, sink: &mut impl EventSink) -> bool {
        if self.is_finished() {
            return false;
        }
        match self.state.phase() {
            Phase::GameOver { .. } => false,
            Phase::AwaitingRoll { player } => match self.state.roll_dice(&mut self.rng, sink) {
                Ok(_) => true,
                Err(e) => {
                    log::error!("player {player} could not roll: {e}");
                    false
                }
            },
            Phase::Resolving { player, .. } => {
                let eligible = self.state.eligible_pawns();
                if eligible.is_empty() {
                    log::error!("player {player} is resolving a roll with no eligible pawn");
                    return false;
                }
                let Some(strategy) = self.strategies.get_mut(usize::from(player)) else {
                    return false;
                };
                let pick = strategy.choose(&self.state, &eligible, &mut self.rng);
                match self.state.move_pawn(pick, &mut self.rng, sink) {
                    Ok(_) => {
                        self.moves += 1;
                        crate::game::assert_invariants(&self.state);
                        true
                    }
                    Err(e) => {
                        log::error!("{strategy} picked pawn {pick} for player {player}: {e}");
                        false
                    }
                }
            }
        }
    }

    /// Play until the current player's turn ends or the match finishes.
    ///
    /// Returns `false` once the match is finished.
    pub fn play_turn(&mut self, sink: &mut impl EventSink) -> bool {
        let turn = self.state.turn();
        while self.state.turn() == turn {
            if !self.step(sink) {
                return false;
            }
        }
        !self.is_finished()
    }

    /// Run the match to the end.
    #[must_use]
    pub fn run(mut self, sink: &mut impl EventSink) -> GameResult {
        while self.step(sink) {}
        if !self.state.is_game_over() {
            log::info!(
                "match {} hit the {} turn cap, calling it a draw",
                self.seed,
                self.config.max_turns
            );
        }
        self.result()
    }

    /// Summarize the match as it stands.
    #[must_use]
    pub fn result(&self) -> GameResult {
        let terminal = self.state.terminal();
        let player_stats = self
            .state
            .players()
            .iter()
            .zip(&self.strategies)
            .map(|(player, &strategy)| PlayerStats {
                player_id: player.id,
                name: player.name.clone(),
                color: player.color,
                strategy,
                pawns_home: player.pawns_home(terminal),
                captures: player.captures,
                times_captured: player.times_captured,
                stars_triggered: player.stars_triggered,
                total_progress: player.total_progress(),
            })
            .collect();

        GameResult {
            winner: self.state.winner(),
            turns_played: self.state.turn(),
            moves: self.moves,
            player_stats,
            standings: self.state.standings(),
            seed: self.seed,
        }
    }
}
