#![no_main]

//! Full game turn fuzzer.
//!
//! Feeds arbitrary dice faces and pawn choices through the statekeeper
//! under arbitrary rule knobs:
//! 1. Submit a roll (possibly with bad faces or the wrong dice count)
//! 2. Move an arbitrary pawn index (possibly ineligible)
//! 3. Check invariants after every accepted action
//!
//! Rejected input must leave the state untouched.

use std::sync::Arc;

use arbitrary::Arbitrary;
use ludo::game::{
    BonusRule, Board, Color, EntryRule, GameState, NullSink, Overshoot, Phase, Player, Roll,
    Rules, StarWeights, check_invariants, place_stars,
};
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A fuzzer-generated action.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzAction {
    /// Submit a roll with these faces.
    Roll { first: u8, second: Option<u8> },
    /// Move the pawn at this index.
    Move { pawn: u8 },
    /// Roll with the game's own dice.
    RandomRoll,
}

/// Structured input for full game fuzzing.
#[derive(Arbitrary, Debug)]
struct GameTurnInput {
    players: u8,
    two_dice: bool,
    entry_at_least: Option<u8>,
    overshoot: u8,
    grace: u8,
    star_count: u8,
    weights: [u8; 4],
    bonus_on_capture: bool,
    max_consecutive_bonus: Option<u8>,
    rng_seed: u64,
    actions: Vec<FuzzAction>,
}

impl GameTurnInput {
    fn rules(&self) -> Rules {
        let base = if self.two_dice {
            Rules::two_dice()
        } else {
            Rules::classic()
        };
        Rules {
            entry: self.entry_at_least.map_or(base.entry, EntryRule::AtLeast),
            bonus: if self.two_dice { BonusRule::Doubles } else { BonusRule::MaxFace },
            overshoot: match self.overshoot % 3 {
                0 => Overshoot::Reject,
                1 => Overshoot::Clamp,
                _ => Overshoot::Grace(self.grace % 7),
            },
            star_count: usize::from(self.star_count % 12),
            star_weights: StarWeights {
                no_effect: u32::from(self.weights[0]),
                roll_again: u32::from(self.weights[1]),
                teleport: u32::from(self.weights[2]),
                send_home: u32::from(self.weights[3]),
            },
            bonus_on_capture: self.bonus_on_capture,
            max_consecutive_bonus: self.max_consecutive_bonus,
            ..base
        }
    }
}

fuzz_target!(|input: GameTurnInput| {
    let rules = input.rules();
    let board = Arc::new(Board::standard());
    if rules.validate(&board).is_err() {
        return;
    }

    let player_count = usize::from(input.players % 3) + 2;
    let players = Color::ALL
        .iter()
        .take(player_count)
        .enumerate()
        .map(|(i, &color)| Player::new(i as u8, color.name(), color))
        .collect();

    let mut rng = StdRng::seed_from_u64(input.rng_seed);
    let Ok(stars) = place_stars(&board, rules.star_count, &mut rng) else {
        return;
    };
    let Ok(mut state) = GameState::new(board, rules, players, stars) else {
        return;
    };

    let violations = check_invariants(&state);
    assert!(violations.is_empty(), "Invariants violated at start: {violations:?}");

    for action in input.actions.iter().take(500) {
        let before_phase = state.phase();
        let before_turn = state.turn();

        let accepted = match *action {
            FuzzAction::Roll { first, second } => {
                let roll = match second {
                    Some(second) => Roll::pair(first, second),
                    None => Roll::single(first),
                };
                state.submit_roll(roll, &mut NullSink).is_ok()
            }
            FuzzAction::Move { pawn } => state
                .move_pawn(usize::from(pawn), &mut rng, &mut NullSink)
                .is_ok(),
            FuzzAction::RandomRoll => state.roll_dice(&mut rng, &mut NullSink).is_ok(),
        };

        if !accepted {
            assert_eq!(state.phase(), before_phase, "rejected action changed phase");
            assert_eq!(state.turn(), before_turn, "rejected action changed turn");
        }
        assert!(state.turn() >= before_turn);

        let violations = check_invariants(&state);
        assert!(violations.is_empty(), "Invariants violated after {action:?}: {violations:?}");

        if matches!(state.phase(), Phase::GameOver { .. }) {
            break;
        }
    }
});
