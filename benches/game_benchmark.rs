//! Benchmarks for running complete games.
//!
//! The match loop is the hot path of the tournament command.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use ludo::game::{NullSink, Rules};
use ludo::strategy::Strategy;
use ludo::tournament::{MatchConfig, MatchRunner, default_seats, run_game};

fn bench_single_game(c: &mut Criterion) {
    let seats = default_seats(2, Strategy::Runner);
    let config = MatchConfig::default();

    c.bench_function("single_game_2p", |b| {
        b.iter(|| {
            let result = run_game(black_box(42), black_box(&seats), black_box(&config));
            black_box(result)
        });
    });
}

fn bench_single_game_4p(c: &mut Criterion) {
    // One seat per built-in strategy that looks ahead
    let seats = vec![
        "red:runner".parse().unwrap(),
        "blue:aggressive".parse().unwrap(),
        "yellow:cautious".parse().unwrap(),
        "green:random".parse().unwrap(),
    ];
    let config = MatchConfig::default();

    c.bench_function("single_game_4p", |b| {
        b.iter(|| {
            let result = run_game(black_box(42), black_box(&seats), black_box(&config));
            black_box(result)
        });
    });
}

fn bench_game_batch(c: &mut Criterion) {
    // Sequential, without parallel overhead
    let seats = default_seats(4, Strategy::First);
    let config = MatchConfig {
        rules: Rules::two_dice(),
        ..MatchConfig::default()
    };

    c.bench_function("10_games_sequential_two_dice", |b| {
        b.iter(|| {
            for seed in 0..10u64 {
                let result = run_game(black_box(seed), black_box(&seats), black_box(&config));
                let _ = black_box(result);
            }
        });
    });
}

fn bench_turns(c: &mut Criterion) {
    // Cost of single turns, setup excluded
    let seats = default_seats(4, Strategy::Aggressive);
    let config = MatchConfig::default();
    let runner = MatchRunner::new(7, &seats, &config).unwrap();

    c.bench_function("100_turns_4p", |b| {
        b.iter_batched(
            || runner.clone(),
            |mut runner| {
                for _ in 0..100 {
                    if !runner.play_turn(&mut NullSink) {
                        break;
                    }
                }
                black_box(runner.state().turn())
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_single_game,
    bench_single_game_4p,
    bench_game_batch,
    bench_turns
);
criterion_main!(benches);
