//! Pawn choice for simulated players.
//!
//! The statekeeper only knows which pawns may move; something has to pick
//! one. [`PawnChooser`] is that seam, and [`Strategy`] provides the built-in
//! choosers used by the match runner and the CLI.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::game::GameState;

/// Picks which eligible pawn to move.
pub trait PawnChooser {
    /// Return one element of `eligible`, which is never empty.
    fn choose(&mut self, state: &GameState, eligible: &[usize], rng: &mut dyn RngCore) -> usize;
}

/// Built-in pawn choosers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Always the lowest-numbered eligible pawn.
    #[default]
    First,
    /// Uniformly random.
    Random,
    /// The pawn furthest along.
    Runner,
    /// Capture if possible, then bring a pawn out, then run.
    Aggressive,
    /// Prefer safe cells and the home stretch.
    Cautious,
}

impl Strategy {
    /// All built-in strategies.
    pub const ALL: [Strategy; 5] = [
        Strategy::First,
        Strategy::Random,
        Strategy::Runner,
        Strategy::Aggressive,
        Strategy::Cautious,
    ];

    /// Lowercase name used on the command line and in JSON.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::First => "first",
            Strategy::Random => "random",
            Strategy::Runner => "runner",
            Strategy::Aggressive => "aggressive",
            Strategy::Cautious => "cautious",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyError(String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Strategy::ALL.iter().map(|s| s.name()).collect();
        write!(
            f,
            "unknown strategy '{}' (expected one of: {})",
            self.0,
            names.join(", ")
        )
    }
}

impl std::error::Error for ParseStrategyError {}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == lower)
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}

impl PawnChooser for Strategy {
    fn choose(&mut self, state: &GameState, eligible: &[usize], rng: &mut dyn RngCore) -> usize {
        let Some(&first) = eligible.first() else {
            return 0;
        };
        match self {
            Strategy::First => first,
            Strategy::Random => eligible.choose(rng).copied().unwrap_or(first),
            Strategy::Runner => best_by(eligible, first, |index| progress(state, index)),
            Strategy::Aggressive => best_by(eligible, first, |index| {
                let Some(preview) = state.preview_move(index) else {
                    return 0;
                };
                let capture = u32::from(preview.captures > 0);
                let entry = u32::from(preview.step.entered);
                capture * 1000 + entry * 100 + u32::from(preview.step.from)
            }),
            Strategy::Cautious => best_by(eligible, first, |index| {
                let Some(preview) = state.preview_move(index) else {
                    return 0;
                };
                let off_track = preview.step.to > state.board().shared_len();
                let shelter = u32::from(off_track || preview.lands_on_safe);
                let star = u32::from(!preview.lands_on_star);
                shelter * 1000 + star * 100 + u32::from(preview.step.to)
            }),
        }
    }
}

fn progress(state: &GameState, index: usize) -> u32 {
    state
        .current_player()
        .pawn(index)
        .map_or(0, |pawn| u32::from(pawn.progress()))
}

/// Highest score wins; ties go to the earlier pawn.
fn best_by(eligible: &[usize], first: usize, score: impl Fn(usize) -> u32) -> usize {
    let mut best = first;
    let mut best_score = score(first);
    for &index in eligible.iter().skip(1) {
        let s = score(index);
        if s > best_score {
            best = index;
            best_score = s;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Color, NullSink, PawnId, Player, Roll, Rules};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    fn game() -> GameState {
        let players = vec![
            Player::new(0, "A", Color::Red),
            Player::new(1, "B", Color::Blue),
        ];
        let rules = Rules {
            star_count: 0,
            ..Rules::classic()
        };
        GameState::new(Arc::new(Board::standard()), rules, players, Vec::new()).unwrap()
    }

    #[test]
    fn test_parse_roundtrip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!("RUNNER".parse::<Strategy>().unwrap(), Strategy::Runner);
        assert!("sleepy".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_runner_picks_furthest() {
        let mut state = game();
        state.place_pawn(PawnId { player: 0, index: 0 }, 5);
        state.place_pawn(PawnId { player: 0, index: 2 }, 30);
        state.submit_roll(Roll::single(2), &mut NullSink).unwrap();
        let eligible = state.eligible_pawns();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(Strategy::Runner.choose(&state, &eligible, &mut rng), 2);
        assert_eq!(Strategy::First.choose(&state, &eligible, &mut rng), 0);
    }

    #[test]
    fn test_aggressive_prefers_capture() {
        let mut state = game();
        let blue = Board::standard().progress_at(Color::Blue, 11).unwrap();
        state.place_pawn(PawnId { player: 1, index: 0 }, blue);
        state.place_pawn(PawnId { player: 0, index: 0 }, 30);
        state.place_pawn(PawnId { player: 0, index: 1 }, 9);
        state.submit_roll(Roll::single(3), &mut NullSink).unwrap();
        let eligible = state.eligible_pawns();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(Strategy::Aggressive.choose(&state, &eligible, &mut rng), 1);
    }

    #[test]
    fn test_cautious_prefers_safe_cell() {
        let mut state = game();
        // Progress 9 is track cell 8, a safe cell.
        state.place_pawn(PawnId { player: 0, index: 0 }, 30);
        state.place_pawn(PawnId { player: 0, index: 3 }, 5);
        state.submit_roll(Roll::single(4), &mut NullSink).unwrap();
        let eligible = state.eligible_pawns();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(Strategy::Cautious.choose(&state, &eligible, &mut rng), 3);
    }

    #[test]
    fn test_random_stays_eligible() {
        let mut state = game();
        state.place_pawn(PawnId { player: 0, index: 1 }, 3);
        state.place_pawn(PawnId { player: 0, index: 3 }, 20);
        state.submit_roll(Roll::single(1), &mut NullSink).unwrap();
        let eligible = state.eligible_pawns();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let pick = Strategy::Random.choose(&state, &eligible, &mut rng);
            assert!(eligible.contains(&pick));
        }
    }
}
