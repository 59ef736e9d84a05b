#![no_main]

//! Rules file fuzzer.
//!
//! Arbitrary text must either fail to parse or validate, or yield rules a
//! short match can be played under.

use libfuzzer_sys::fuzz_target;
use ludo::game::{Board, Rules};
use ludo::strategy::Strategy;
use ludo::tournament::{MatchConfig, default_seats, run_game};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(rules) = Rules::from_json_str(text) else {
        return;
    };
    if rules.validate(&Board::standard()).is_err() {
        return;
    }

    let config = MatchConfig {
        rules,
        max_turns: 50,
    };
    let result = run_game(0, &default_seats(2, Strategy::Random), &config);
    assert!(result.is_ok(), "validated rules failed to start: {result:?}");
});
