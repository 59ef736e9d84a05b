//! Game invariants - sanity checks that detect bugs.
//!
//! A correctly implemented statekeeper never trips these. They are used by
//! debug builds of the match runner and by the property and fuzz tests.

use std::collections::HashMap;

use crate::game::{GameState, Phase};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let board = state.board();
    let terminal = state.terminal();

    // Counters stay on the route
    for player in state.players() {
        for pawn in player.pawns() {
            if pawn.progress() > terminal {
                violations.push(InvariantViolation {
                    message: format!(
                        "{} has progress {} past terminal {terminal}",
                        pawn.id(),
                        pawn.progress()
                    ),
                });
            }
        }
    }

    // Opponents never share an unsafe shared cell: landing there captures
    let mut owners: HashMap<usize, u8> = HashMap::new();
    for player in state.players() {
        for pawn in player.pawns() {
            let Some(index) = board.track_index(player.color, pawn.progress()) else {
                continue;
            };
            if board.is_safe(index) {
                continue;
            }
            match owners.get(&index) {
                Some(&owner) if owner != player.id => violations.push(InvariantViolation {
                    message: format!(
                        "players {owner} and {} both occupy unsafe cell {index}",
                        player.id
                    ),
                }),
                _ => {
                    owners.insert(index, player.id);
                }
            }
        }
    }

    // Game over exactly when someone has all pawns home
    let winners: Vec<u8> = state
        .players()
        .iter()
        .filter(|p| p.has_won(terminal))
        .map(|p| p.id)
        .collect();
    match state.phase() {
        Phase::GameOver { winner } => {
            if !winners.contains(&winner) {
                violations.push(InvariantViolation {
                    message: format!("player {winner} declared winner without all pawns home"),
                });
            }
        }
        phase => {
            if !winners.is_empty() {
                violations.push(InvariantViolation {
                    message: format!("players {winners:?} finished but game is in {phase}"),
                });
            }
        }
    }

    // Exactly one current player, seated at the table
    let current = usize::from(state.phase().player());
    if current >= state.players().len() {
        violations.push(InvariantViolation {
            message: format!(
                "current player {current} outside {} seats",
                state.players().len()
            ),
        });
    }

    if let Some(roll) = state.pending_roll()
        && (!roll.faces_valid() || roll.dice_count() != state.rules().dice_count)
    {
        violations.push(InvariantViolation {
            message: format!("pending roll {roll} does not match the dice in play"),
        });
    }

    // Stars sit on distinct track cells
    let stars = state.stars();
    for (i, star) in stars.iter().enumerate() {
        if stars[..i]
            .iter()
            .any(|other| other.track_index() == star.track_index())
        {
            violations.push(InvariantViolation {
                message: format!("two stars on track cell {}", star.track_index()),
            });
        }
        if board.track_coord(star.track_index()) != Some(star.coord()) {
            violations.push(InvariantViolation {
                message: format!("star at {} is off its track cell", star.coord()),
            });
        }
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
