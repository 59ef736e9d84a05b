//! Output formatting utilities for CLI.

// Rates and averages over game counts
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::format_push_string)]

use ludo::game::GameEvent;
use ludo::tournament::{GameResult, Seat};
use serde::Serialize;

/// JSON output of the `run` command.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunOutput<'a> {
    /// The finished game.
    #[serde(flatten)]
    pub(super) result: &'a GameResult,
    /// Every event, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) events: Option<&'a [GameEvent]>,
}

/// Format a game result as human-readable text.
pub(super) fn format_text(result: &GameResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Game Result (seed: {})\n", result.seed));
    let winner = result
        .winner
        .and_then(|id| result.player_stats.get(usize::from(id)));
    match winner {
        Some(stats) => output.push_str(&format!(
            "  Winner: {} ({}, {})\n",
            stats.name, stats.color, stats.strategy
        )),
        None => output.push_str("  Winner: Draw\n"),
    }
    output.push_str(&format!(
        "  Turns: {}  Moves: {}\n\n",
        result.turns_played, result.moves
    ));

    for (rank, &id) in result.standings.iter().enumerate() {
        let Some(stats) = result.player_stats.get(usize::from(id)) else {
            continue;
        };
        output.push_str(&format!(
            "  {}. {:<10} {:<7} {:<10} home {}/4  progress {:>3}  captures {}  captured {}  stars {}\n",
            rank + 1,
            stats.name,
            stats.color.name(),
            stats.strategy.name(),
            stats.pawns_home,
            stats.total_progress,
            stats.captures,
            stats.times_captured,
            stats.stars_triggered,
        ));
    }

    output
}

/// Tournament statistics for aggregated results, indexed by seat.
#[derive(Debug, Default, Clone, PartialEq)]
pub(super) struct TournamentStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Win count per seat.
    pub(super) wins: Vec<u64>,
    /// Games that hit the turn cap.
    pub(super) draws: u64,
    /// Sum of 1-based finishing places per seat.
    rank_sums: Vec<u64>,
    /// Captures made per seat.
    captures: Vec<u64>,
    /// Pawns lost to captures per seat.
    times_captured: Vec<u64>,
    /// Stars landed on per seat.
    stars: Vec<u64>,
    /// Pawns home at game end per seat.
    pawns_home: Vec<u64>,
    /// Total turns across all games.
    total_turns: u64,
}

impl TournamentStats {
    /// Create new stats for n seats.
    pub(super) fn new(num_seats: usize) -> Self {
        Self {
            games_played: 0,
            wins: vec![0; num_seats],
            draws: 0,
            rank_sums: vec![0; num_seats],
            captures: vec![0; num_seats],
            times_captured: vec![0; num_seats],
            stars: vec![0; num_seats],
            pawns_home: vec![0; num_seats],
            total_turns: 0,
        }
    }

    /// Add a game result to the stats.
    pub(super) fn add_result(&mut self, result: &GameResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);

        match result.winner {
            Some(winner) => {
                if let Some(wins) = self.wins.get_mut(usize::from(winner)) {
                    *wins += 1;
                }
            }
            None => self.draws += 1,
        }

        for (place, &id) in result.standings.iter().enumerate() {
            if let Some(sum) = self.rank_sums.get_mut(usize::from(id)) {
                *sum += place as u64 + 1;
            }
        }

        for (i, stats) in result.player_stats.iter().enumerate() {
            if i < self.captures.len() {
                self.captures[i] += u64::from(stats.captures);
                self.times_captured[i] += u64::from(stats.times_captured);
                self.stars[i] += u64::from(stats.stars_triggered);
                self.pawns_home[i] += stats.pawns_home as u64;
            }
        }
    }

    /// Fold another partial tally into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        fn add(into: &mut [u64], from: &[u64]) {
            for (a, b) in into.iter_mut().zip(from) {
                *a += b;
            }
        }
        self.games_played += other.games_played;
        self.draws += other.draws;
        self.total_turns += other.total_turns;
        add(&mut self.wins, &other.wins);
        add(&mut self.rank_sums, &other.rank_sums);
        add(&mut self.captures, &other.captures);
        add(&mut self.times_captured, &other.times_captured);
        add(&mut self.stars, &other.stars);
        add(&mut self.pawns_home, &other.pawns_home);
    }

    fn per_game(&self, total: u64) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        total as f64 / self.games_played as f64
    }

    fn seat_mean(&self, column: &[u64], seat: usize) -> f64 {
        self.per_game(column.get(seat).copied().unwrap_or(0))
    }

    /// Get win rate for a seat (0.0-1.0).
    pub(super) fn win_rate(&self, seat: usize) -> f64 {
        self.seat_mean(&self.wins, seat)
    }

    /// Average finishing place, 1 being best.
    pub(super) fn avg_rank(&self, seat: usize) -> f64 {
        self.seat_mean(&self.rank_sums, seat)
    }

    /// Average captures made per game.
    pub(super) fn avg_captures(&self, seat: usize) -> f64 {
        self.seat_mean(&self.captures, seat)
    }

    /// Average pawns lost per game.
    pub(super) fn avg_times_captured(&self, seat: usize) -> f64 {
        self.seat_mean(&self.times_captured, seat)
    }

    /// Average stars landed on per game.
    pub(super) fn avg_stars(&self, seat: usize) -> f64 {
        self.seat_mean(&self.stars, seat)
    }

    /// Average pawns home at game end.
    pub(super) fn avg_pawns_home(&self, seat: usize) -> f64 {
        self.seat_mean(&self.pawns_home, seat)
    }

    /// Share of games that hit the turn cap.
    pub(super) fn draw_rate(&self) -> f64 {
        self.per_game(self.draws)
    }

    /// Get average game length.
    pub(super) fn avg_turns(&self) -> f64 {
        self.per_game(self.total_turns)
    }
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Total games played.
    games_played: u64,
    /// Per-seat statistics.
    players: Vec<JsonTournamentPlayer>,
    /// Number of draws.
    draws: u64,
    /// Average game length in turns.
    avg_turns: f64,
}

/// JSON-serializable per-seat tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentPlayer {
    /// Seat index (0-based).
    player: usize,
    /// The seat.
    seat: Seat,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average finishing place.
    avg_rank: f64,
    /// Average captures made.
    avg_captures: f64,
    /// Average pawns lost to captures.
    avg_times_captured: f64,
    /// Average stars landed on.
    avg_stars: f64,
    /// Average pawns home at game end.
    avg_pawns_home: f64,
}

impl JsonTournamentResult {
    /// Create from stats and seats.
    pub(super) fn from_stats(stats: &TournamentStats, seats: &[Seat]) -> Self {
        let players = seats
            .iter()
            .enumerate()
            .map(|(i, seat)| JsonTournamentPlayer {
                player: i,
                seat: seat.clone(),
                wins: stats.wins.get(i).copied().unwrap_or(0),
                win_rate: stats.win_rate(i),
                avg_rank: stats.avg_rank(i),
                avg_captures: stats.avg_captures(i),
                avg_times_captured: stats.avg_times_captured(i),
                avg_stars: stats.avg_stars(i),
                avg_pawns_home: stats.avg_pawns_home(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            players,
            draws: stats.draws,
            avg_turns: stats.avg_turns(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats, seats: &[Seat]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Tournament Results ({} games)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for (i, seat) in seats.iter().enumerate() {
        let wins = stats.wins.get(i).copied().unwrap_or(0);
        output.push_str(&format!(
            "  {seat}: {:.1}% ({wins} wins, avg place {:.2})\n",
            stats.win_rate(i) * 100.0,
            stats.avg_rank(i),
        ));
    }
    output.push_str(&format!(
        "  Draws: {} ({:.1}%)\n\n",
        stats.draws,
        stats.draw_rate() * 100.0
    ));

    output.push_str("Per Game:\n");
    for (i, seat) in seats.iter().enumerate() {
        output.push_str(&format!(
            "  {}: captures {:.2}  captured {:.2}  stars {:.2}  home {:.2}\n",
            seat.name,
            stats.avg_captures(i),
            stats.avg_times_captured(i),
            stats.avg_stars(i),
            stats.avg_pawns_home(i),
        ));
    }

    output.push_str(&format!("\nAverage Game Length: {:.0} turns\n", stats.avg_turns()));

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats, seats: &[Seat]) -> String {
    let mut output = String::new();

    output.push_str(
        "player,name,color,strategy,wins,win_rate,avg_rank,avg_captures,avg_times_captured,avg_stars,avg_pawns_home\n",
    );

    for (i, seat) in seats.iter().enumerate() {
        output.push_str(&format!(
            "{},{},{},{},{},{:.4},{:.3},{:.3},{:.3},{:.3},{:.3}\n",
            i,
            seat.name,
            seat.color.name(),
            seat.strategy.name(),
            stats.wins.get(i).copied().unwrap_or(0),
            stats.win_rate(i),
            stats.avg_rank(i),
            stats.avg_captures(i),
            stats.avg_times_captured(i),
            stats.avg_stars(i),
            stats.avg_pawns_home(i),
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludo::strategy::Strategy;
    use ludo::tournament::{MatchConfig, default_seats, run_game};

    fn results(count: u64) -> Vec<GameResult> {
        let seats = default_seats(2, Strategy::Runner);
        let config = MatchConfig {
            max_turns: 40,
            ..MatchConfig::default()
        };
        (0..count)
            .map(|seed| run_game(seed, &seats, &config).unwrap())
            .collect()
    }

    #[test]
    fn test_merge_equals_sequential() {
        let games = results(6);
        let mut all = TournamentStats::new(2);
        for r in &games {
            all.add_result(r);
        }

        let mut left = TournamentStats::new(2);
        let mut right = TournamentStats::new(2);
        for r in &games[..2] {
            left.add_result(r);
        }
        for r in &games[2..] {
            right.add_result(r);
        }
        left.merge(&right);

        assert_eq!(left, all);
        assert_eq!(all.games_played, 6);
    }

    #[test]
    fn test_rates_sum_to_one() {
        let mut stats = TournamentStats::new(2);
        for r in &results(5) {
            stats.add_result(r);
        }
        let total = stats.win_rate(0) + stats.win_rate(1) + stats.draw_rate();
        assert!((total - 1.0).abs() < 1e-9);
        let rank = stats.avg_rank(0) + stats.avg_rank(1);
        assert!((rank - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let stats = TournamentStats::new(3);
        assert!(stats.win_rate(0).abs() < f64::EPSILON);
        assert!(stats.avg_turns().abs() < f64::EPSILON);
    }

    #[test]
    fn test_csv_has_row_per_seat() {
        let seats = default_seats(3, Strategy::Cautious);
        let csv = format_tournament_csv(&TournamentStats::new(3), &seats);
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.lines().nth(2).unwrap().starts_with("1,Blue,blue,cautious,"));
    }

    #[test]
    fn test_format_text_lists_standings() {
        let result = &results(1)[0];
        let text = format_text(result);
        assert!(text.contains("seed: 0"));
        assert!(text.contains("  1. "));
        assert!(text.contains("  2. "));
    }
}
