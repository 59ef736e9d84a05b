//! Statekeeper: the turn machine.
//!
//! A [`GameState`] owns the players, stars and rules of one game and moves
//! through [`Phase`]s as dice are rolled and pawns are chosen. Every
//! operation takes an [`EventSink`]; illegal requests come back as
//! [`TurnError`] values and leave the state untouched.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::error::{MoveRejection, SetupError, TurnError, TurnResult};
use crate::game::{
    Board, Color, Coord, DIE_FACES, EventSink, GameEvent, PawnId, Player, PlayerId, Roll, Rules,
    Star, StarEffect, Step,
};

/// Where the game is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for the player to roll.
    AwaitingRoll {
        /// Player to roll.
        player: PlayerId,
    },
    /// A roll is in; waiting for the player to pick a pawn.
    Resolving {
        /// Player to move.
        player: PlayerId,
        /// The roll to spend.
        roll: Roll,
    },
    /// Someone brought all four pawns home.
    GameOver {
        /// The winner.
        winner: PlayerId,
    },
}

impl Phase {
    /// Short name used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Phase::AwaitingRoll { .. } => "awaiting-roll",
            Phase::Resolving { .. } => "resolving",
            Phase::GameOver { .. } => "game-over",
        }
    }

    /// Player the phase belongs to. For a finished game this is the winner.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        match self {
            Phase::AwaitingRoll { player } | Phase::Resolving { player, .. } => *player,
            Phase::GameOver { winner } => *winner,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::AwaitingRoll { player } => write!(f, "awaiting-roll(player {player})"),
            Phase::Resolving { player, roll } => {
                write!(f, "resolving(player {player}, roll {roll})")
            }
            Phase::GameOver { winner } => write!(f, "game-over(winner {winner})"),
        }
    }
}

/// What a legal move would do, computed without changing the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePreview {
    /// The step the pawn would take.
    pub step: Step,
    /// Opponent pawns that would be sent to base.
    pub captures: usize,
    /// The pawn would land on a star.
    pub lands_on_star: bool,
    /// The pawn would land on a safe track cell.
    pub lands_on_safe: bool,
}

/// Everything that resulted from one accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    /// The step taken, before any star effect.
    pub step: Step,
    /// Opponent pawns sent back to base.
    pub captured: Vec<PawnId>,
    /// Star outcome that was applied, if the pawn landed on a star.
    pub star: Option<StarEffect>,
    /// The same player rolls again.
    pub extra_roll: bool,
    /// Set when the move won the game.
    pub winner: Option<PlayerId>,
}

/// Complete state of one game.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Arc<Board>,
    rules: Rules,
    players: Vec<Player>,
    stars: Vec<Star>,
    phase: Phase,
    turn: u32,
    bonus_streak: u8,
    turn_open: bool,
}

impl GameState {
    /// Start a game. Player 0 acts first.
    ///
    /// # Errors
    ///
    /// Returns an error unless there are 2 to 4 players with distinct colors
    /// and ids matching their seats.
    pub fn new(
        board: Arc<Board>,
        rules: Rules,
        players: Vec<Player>,
        stars: Vec<Star>,
    ) -> Result<Self, SetupError> {
        if players.len() < 2 {
            return Err(SetupError::TooFewPlayers(players.len()));
        }
        if players.len() > Color::ALL.len() {
            return Err(SetupError::TooManyPlayers(players.len()));
        }
        for (seat, player) in players.iter().enumerate() {
            if usize::from(player.id) != seat {
                return Err(SetupError::SeatMismatch {
                    seat,
                    id: player.id,
                });
            }
            if players[..seat].iter().any(|p| p.color == player.color) {
                return Err(SetupError::DuplicateColor(player.color));
            }
        }

        log::info!(
            "new game: {} players, {} stars",
            players.len(),
            stars.len()
        );
        Ok(Self {
            board,
            rules,
            players,
            stars,
            phase: Phase::AwaitingRoll { player: 0 },
            turn: 0,
            bonus_streak: 0,
            turn_open: false,
        })
    }

    /// Board layout.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Shared handle to the board.
    #[must_use]
    pub fn board_arc(&self) -> Arc<Board> {
        Arc::clone(&self.board)
    }

    /// Rules in force.
    #[must_use]
    pub const fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Players in seating order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// A player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(id))
    }

    /// Stars on the board.
    #[must_use]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed turns.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Progress value of the terminal cell.
    #[must_use]
    pub fn terminal(&self) -> u8 {
        self.board.terminal()
    }

    /// Player whose turn it is (the winner once the game is over).
    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[usize::from(self.phase.player())]
    }

    /// Whether someone has won.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    /// The winner, if any.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Roll that is waiting to be spent.
    #[must_use]
    pub const fn pending_roll(&self) -> Option<Roll> {
        match self.phase {
            Phase::Resolving { roll, .. } => Some(roll),
            _ => None,
        }
    }

    /// Grid coordinate of a pawn.
    #[must_use]
    pub fn pawn_coord(&self, id: PawnId) -> Option<Coord> {
        let player = self.player(id.player)?;
        let index = usize::from(id.index);
        let pawn = player.pawn(index)?;
        self.board.coord_of(player.color, index, pawn.progress())
    }

    /// Pawns standing on a shared track cell.
    #[must_use]
    pub fn pawns_on_track(&self, track_index: usize) -> Vec<PawnId> {
        self.players
            .iter()
            .flat_map(|player| {
                player.pawns().iter().filter(move |pawn| {
                    self.board.track_index(player.color, pawn.progress()) == Some(track_index)
                })
            })
            .map(|pawn| pawn.id())
            .collect()
    }

    /// Player ids ordered best first: winner, then pawns home, then
    /// total progress. Ties keep seating order.
    #[must_use]
    pub fn standings(&self) -> Vec<PlayerId> {
        let terminal = self.terminal();
        let mut order: Vec<&Player> = self.players.iter().collect();
        order.sort_by_key(|p| {
            std::cmp::Reverse((
                self.winner() == Some(p.id),
                p.pawns_home(terminal),
                p.total_progress(),
            ))
        });
        order.into_iter().map(|p| p.id).collect()
    }

    /// Roll the current player's dice and submit the result.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::WrongPhase`] unless the game awaits a roll.
    pub fn roll_dice<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        sink: &mut impl EventSink,
    ) -> TurnResult<Roll> {
        let Phase::AwaitingRoll { player } = self.phase else {
            return Err(self.wrong_phase("awaiting-roll"));
        };
        let roll = self.players[usize::from(player)].dice_roll(rng, self.rules.dice_count);
        self.submit_roll(roll, sink)?;
        Ok(roll)
    }

    /// Accept a roll resolved elsewhere (a physical die, a network peer).
    ///
    /// If no pawn can use the roll, `NoLegalMove` is emitted and the turn
    /// passes to the next player without a bonus.
    ///
    /// # Errors
    ///
    /// Returns an error if the game does not await a roll, or the roll has
    /// the wrong number of dice or an impossible face.
    pub fn submit_roll(&mut self, roll: Roll, sink: &mut impl EventSink) -> TurnResult<()> {
        let Phase::AwaitingRoll { player } = self.phase else {
            return Err(self.wrong_phase("awaiting-roll"));
        };
        if roll.dice_count() != self.rules.dice_count {
            return Err(TurnError::InvalidRoll {
                expected_dice: self.rules.dice_count,
                got_dice: roll.dice_count(),
            });
        }
        if !roll.faces_valid() {
            let face = roll.faces().iter().copied().find(|f| !(1..=DIE_FACES).contains(f));
            return Err(TurnError::InvalidFace(face.unwrap_or(0)));
        }

        if !self.turn_open {
            self.turn_open = true;
            sink.emit(GameEvent::TurnStarted {
                player,
                turn: self.turn,
            });
        }
        sink.emit(GameEvent::DiceRolled { player, roll });
        self.phase = Phase::Resolving { player, roll };

        if self.eligible_pawns().is_empty() {
            log::debug!("player {player} has no move for {roll}");
            sink.emit(GameEvent::NoLegalMove { player, roll });
            self.end_turn(player, sink);
        }
        Ok(())
    }

    /// Indices of the current player's pawns that can use the pending roll.
    ///
    /// Empty outside the resolving phase.
    #[must_use]
    pub fn eligible_pawns(&self) -> Vec<usize> {
        let Phase::Resolving { player, roll } = self.phase else {
            return Vec::new();
        };
        let terminal = self.terminal();
        self.players[usize::from(player)]
            .pawns()
            .iter()
            .enumerate()
            .filter(|(_, pawn)| pawn.plan(roll.total(), &self.rules, terminal).is_ok())
            .map(|(index, _)| index)
            .collect()
    }

    /// Work out what moving a pawn would do, without doing it.
    ///
    /// Returns `None` outside the resolving phase or for an illegal pawn.
    #[must_use]
    pub fn preview_move(&self, pawn_index: usize) -> Option<MovePreview> {
        let Phase::Resolving { player, roll } = self.phase else {
            return None;
        };
        let owner = &self.players[usize::from(player)];
        let step = owner
            .pawn(pawn_index)?
            .plan(roll.total(), &self.rules, self.terminal())
            .ok()?;

        let Some(track_index) = self.board.track_index(owner.color, step.to) else {
            return Some(MovePreview {
                step,
                captures: 0,
                lands_on_star: false,
                lands_on_safe: false,
            });
        };
        let lands_on_safe = self.board.is_safe(track_index);
        let captures = if lands_on_safe {
            0
        } else {
            self.pawns_on_track(track_index)
                .iter()
                .filter(|id| id.player != player)
                .count()
        };
        let lands_on_star = self.stars.iter().any(|s| s.track_index() == track_index);

        Some(MovePreview {
            step,
            captures,
            lands_on_star,
            lands_on_safe,
        })
    }

    /// Move one of the current player's pawns by the pending roll.
    ///
    /// Resolution order: step, capture, star, win check, turn advance.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::WrongPhase`] unless a roll is pending, and
    /// [`TurnError::Rejected`] if the pawn cannot use it. A rejection also
    /// emits `MoveRejected`; the state is unchanged either way.
    pub fn move_pawn<R: Rng + ?Sized>(
        &mut self,
        pawn_index: usize,
        rng: &mut R,
        sink: &mut impl EventSink,
    ) -> TurnResult<MoveOutcome> {
        let Phase::Resolving { player, roll } = self.phase else {
            return Err(self.wrong_phase("resolving"));
        };
        let seat = usize::from(player);
        let terminal = self.terminal();
        let rules = self.rules;

        let Some(pawn) = self.players[seat].pawn_mut(pawn_index) else {
            let reason = MoveRejection::NoSuchPawn { index: pawn_index };
            let index = u8::try_from(pawn_index).unwrap_or(u8::MAX);
            sink.emit(GameEvent::MoveRejected {
                pawn: PawnId { player, index },
                reason,
            });
            return Err(TurnError::Rejected { player, reason });
        };
        let pawn_id = pawn.id();
        let step = match pawn.advance(roll.total(), &rules, terminal) {
            Ok(step) => step,
            Err(reason) => {
                log::debug!("{pawn_id} rejected: {reason}");
                sink.emit(GameEvent::MoveRejected {
                    pawn: pawn_id,
                    reason,
                });
                return Err(TurnError::Rejected { player, reason });
            }
        };

        sink.emit(GameEvent::PawnMoved {
            pawn: pawn_id,
            from: step.from,
            to: step.to,
        });
        if step.finished {
            sink.emit(GameEvent::PawnFinished { pawn: pawn_id });
        }

        let captured = self.resolve_capture(seat, pawn_index, sink);
        let star = self.resolve_star(seat, pawn_index, rng, sink);

        if self.players[seat].has_won(terminal) {
            log::info!("player {player} ({}) wins", self.players[seat].name);
            self.phase = Phase::GameOver { winner: player };
            self.turn_open = false;
            sink.emit(GameEvent::PlayerWon { player });
            return Ok(MoveOutcome {
                step,
                captured,
                star,
                extra_roll: false,
                winner: Some(player),
            });
        }

        let earned = rules.bonus.earns_bonus(&roll)
            || star == Some(StarEffect::RollAgain)
            || (rules.bonus_on_capture && !captured.is_empty());
        let extra_roll = earned && self.grant_bonus(player);
        if extra_roll {
            self.phase = Phase::AwaitingRoll { player };
        } else {
            self.end_turn(player, sink);
        }

        Ok(MoveOutcome {
            step,
            captured,
            star,
            extra_roll,
            winner: None,
        })
    }

    /// Put a pawn on any progress value, ignoring the rules.
    ///
    /// Used to set up positions for analysis and tests. Returns `false` if
    /// the pawn does not exist or `progress` is past the terminal cell.
    pub fn place_pawn(&mut self, id: PawnId, progress: u8) -> bool {
        if progress > self.terminal() {
            return false;
        }
        let Some(pawn) = self
            .players
            .get_mut(usize::from(id.player))
            .and_then(|p| p.pawn_mut(usize::from(id.index)))
        else {
            return false;
        };
        pawn.place(progress);
        true
    }

    fn wrong_phase(&self, expected: &'static str) -> TurnError {
        TurnError::WrongPhase {
            expected,
            found: self.phase,
        }
    }

    fn grant_bonus(&mut self, player: PlayerId) -> bool {
        if let Some(cap) = self.rules.max_consecutive_bonus
            && self.bonus_streak >= cap
        {
            log::debug!("player {player} reached {cap} bonus rolls, bonus forfeited");
            return false;
        }
        self.bonus_streak = self.bonus_streak.saturating_add(1);
        log::trace!("player {player} rolls again (streak {})", self.bonus_streak);
        true
    }

    fn end_turn(&mut self, player: PlayerId, sink: &mut impl EventSink) {
        #[allow(clippy::cast_possible_truncation)]
        let next = ((usize::from(player) + 1) % self.players.len()) as PlayerId;
        self.bonus_streak = 0;
        self.turn_open = false;
        self.turn += 1;
        self.phase = Phase::AwaitingRoll { player: next };
        sink.emit(GameEvent::TurnEnded { player, next });
    }

    /// Send every opponent pawn on the mover's cell back to base, unless the
    /// cell is safe or off the shared track.
    fn resolve_capture(
        &mut self,
        seat: usize,
        pawn_index: usize,
        sink: &mut impl EventSink,
    ) -> Vec<PawnId> {
        let color = self.players[seat].color;
        let Some(mover) = self.players[seat].pawn(pawn_index) else {
            return Vec::new();
        };
        let by = mover.id();
        let Some(track_index) = self.board.track_index(color, mover.progress()) else {
            return Vec::new();
        };
        if self.board.is_safe(track_index) {
            return Vec::new();
        }

        let mut captured = Vec::new();
        for (other_seat, other) in self.players.iter_mut().enumerate() {
            if other_seat == seat {
                continue;
            }
            let other_color = other.color;
            let mut lost = 0;
            for victim in other.pawns_mut() {
                if self.board.track_index(other_color, victim.progress()) != Some(track_index) {
                    continue;
                }
                let from = victim.send_to_base();
                log::debug!("{by} captured {} on cell {track_index}", victim.id());
                captured.push(victim.id());
                sink.emit(GameEvent::PawnCaptured {
                    pawn: victim.id(),
                    by,
                    track_index,
                    from,
                });
                lost += 1;
            }
            other.times_captured += lost;
        }
        #[allow(clippy::cast_possible_truncation)]
        let count = captured.len() as u32;
        self.players[seat].captures += count;
        captured
    }

    /// Apply a star if the pawn landed exactly on one. Returns the outcome
    /// actually applied.
    fn resolve_star<R: Rng + ?Sized>(
        &mut self,
        seat: usize,
        pawn_index: usize,
        rng: &mut R,
        sink: &mut impl EventSink,
    ) -> Option<StarEffect> {
        let color = self.players[seat].color;
        let pawn = self.players[seat].pawn(pawn_index)?;
        let pawn_id = pawn.id();
        let from = pawn.progress();
        self.board.track_index(color, from)?;
        let coord = self.board.coord_of(color, pawn_index, from)?;
        let slot = self
            .stars
            .iter()
            .position(|star| star.check_exact_collision(coord))?;

        self.stars[slot].record_trigger();
        self.players[seat].stars_triggered += 1;

        let drawn = self.rules.star_weights.draw(rng);
        let (effect, to) = match drawn {
            StarEffect::NoEffect | StarEffect::RollAgain => (drawn, from),
            StarEffect::SendHome => (StarEffect::SendHome, 0),
            StarEffect::Teleport => match self.teleport_target(seat, from, rng) {
                Some(target) => (StarEffect::Teleport, target),
                None => {
                    log::warn!("no free cell to teleport {pawn_id} to, star has no effect");
                    (StarEffect::NoEffect, from)
                }
            },
        };
        if to != from
            && let Some(pawn) = self.players[seat].pawn_mut(pawn_index)
        {
            pawn.place(to);
        }

        log::debug!("{pawn_id} hit star at {coord}: {effect}");
        sink.emit(GameEvent::StarEffect {
            pawn: pawn_id,
            effect,
            from,
            to,
        });
        Some(effect)
    }

    /// Uniform pick among shared cells that hold no opponent pawn, other
    /// than the cell the pawn stands on.
    fn teleport_target<R: Rng + ?Sized>(&self, seat: usize, from: u8, rng: &mut R) -> Option<u8> {
        let color = self.players[seat].color;
        let occupied: Vec<usize> = self
            .players
            .iter()
            .filter(|p| usize::from(p.id) != seat)
            .flat_map(|p| {
                p.pawns()
                    .iter()
                    .filter_map(move |pawn| self.board.track_index(p.color, pawn.progress()))
            })
            .collect();

        let targets: Vec<u8> = (1..=self.board.shared_len())
            .filter(|&progress| progress != from)
            .filter(|&progress| {
                self.board
                    .track_index(color, progress)
                    .is_some_and(|index| !occupied.contains(&index))
            })
            .collect();
        targets.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{NullSink, Overshoot, StarWeights};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn two_player_game(rules: Rules, stars: Vec<Star>) -> GameState {
        let players = vec![
            Player::new(0, "A", Color::Red),
            Player::new(1, "B", Color::Blue),
        ];
        GameState::new(Arc::new(Board::standard()), rules, players, stars).unwrap()
    }

    fn no_stars() -> Rules {
        Rules {
            star_count: 0,
            ..Rules::classic()
        }
    }

    #[test]
    fn test_new_rejects_bad_seating() {
        let board = Arc::new(Board::standard());
        let one = vec![Player::new(0, "A", Color::Red)];
        assert_eq!(
            GameState::new(Arc::clone(&board), Rules::classic(), one, Vec::new()).unwrap_err(),
            SetupError::TooFewPlayers(1)
        );

        let dup = vec![
            Player::new(0, "A", Color::Red),
            Player::new(1, "B", Color::Red),
        ];
        assert_eq!(
            GameState::new(Arc::clone(&board), Rules::classic(), dup, Vec::new()).unwrap_err(),
            SetupError::DuplicateColor(Color::Red)
        );

        let swapped = vec![
            Player::new(1, "A", Color::Red),
            Player::new(0, "B", Color::Blue),
        ];
        assert!(matches!(
            GameState::new(board, Rules::classic(), swapped, Vec::new()),
            Err(SetupError::SeatMismatch { seat: 0, id: 1 })
        ));
    }

    #[test]
    fn test_six_enters_and_rolls_again() {
        let mut state = two_player_game(no_stars(), Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        let mut events = Vec::new();

        state.submit_roll(Roll::single(6), &mut events).unwrap();
        assert_eq!(state.eligible_pawns(), vec![0, 1, 2, 3]);

        let outcome = state.move_pawn(0, &mut rng, &mut events).unwrap();
        assert!(outcome.step.entered);
        assert!(outcome.extra_roll);
        assert_eq!(state.players()[0].pawns()[0].progress(), 1);
        assert_eq!(state.phase(), Phase::AwaitingRoll { player: 0 });
        assert_eq!(state.turn(), 0);
    }

    #[test]
    fn test_no_legal_move_passes_turn() {
        let mut state = two_player_game(no_stars(), Vec::new());
        let mut events = Vec::new();

        state.submit_roll(Roll::single(3), &mut events).unwrap();
        assert_eq!(state.phase(), Phase::AwaitingRoll { player: 1 });
        assert_eq!(state.turn(), 1);
        assert!(events.contains(&GameEvent::NoLegalMove {
            player: 0,
            roll: Roll::single(3)
        }));
        assert_eq!(
            events.last(),
            Some(&GameEvent::TurnEnded { player: 0, next: 1 })
        );
    }

    #[test]
    fn test_wrong_phase() {
        let mut state = two_player_game(no_stars(), Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        let err = state.move_pawn(0, &mut rng, &mut NullSink).unwrap_err();
        assert!(matches!(
            err,
            TurnError::WrongPhase {
                expected: "resolving",
                ..
            }
        ));

        state.submit_roll(Roll::single(6), &mut NullSink).unwrap();
        let err = state.submit_roll(Roll::single(6), &mut NullSink).unwrap_err();
        assert!(matches!(err, TurnError::WrongPhase { .. }));
    }

    #[test]
    fn test_invalid_rolls() {
        let mut state = two_player_game(no_stars(), Vec::new());
        assert_eq!(
            state.submit_roll(Roll::pair(3, 4), &mut NullSink),
            Err(TurnError::InvalidRoll {
                expected_dice: 1,
                got_dice: 2
            })
        );
        assert_eq!(
            state.submit_roll(Roll::single(7), &mut NullSink),
            Err(TurnError::InvalidFace(7))
        );
        assert_eq!(state.phase(), Phase::AwaitingRoll { player: 0 });
    }

    #[test]
    fn test_rejected_move_leaves_state() {
        let mut state = two_player_game(no_stars(), Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        state.place_pawn(PawnId { player: 0, index: 0 }, 10);
        state.submit_roll(Roll::single(2), &mut NullSink).unwrap();

        let mut events = Vec::new();
        let err = state.move_pawn(1, &mut rng, &mut events).unwrap_err();
        assert_eq!(
            err,
            TurnError::Rejected {
                player: 0,
                reason: MoveRejection::NeedsEntryRoll { rolled: 2 }
            }
        );
        assert!(matches!(events[0], GameEvent::MoveRejected { .. }));
        assert_eq!(
            state.phase(),
            Phase::Resolving {
                player: 0,
                roll: Roll::single(2)
            }
        );

        let err = state.move_pawn(9, &mut rng, &mut NullSink).unwrap_err();
        assert!(matches!(
            err,
            TurnError::Rejected {
                reason: MoveRejection::NoSuchPawn { index: 9 },
                ..
            }
        ));
    }

    #[test]
    fn test_capture_on_shared_cell() {
        let mut state = two_player_game(no_stars(), Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        let board = Board::standard();

        // Blue pawn on track cell 20, red pawn three cells behind it.
        let blue_progress = board.progress_at(Color::Blue, 20).unwrap();
        let red_progress = board.progress_at(Color::Red, 20).unwrap() - 3;
        assert!(!board.is_safe(20));
        let victim = PawnId { player: 1, index: 2 };
        state.place_pawn(victim, blue_progress);
        state.place_pawn(PawnId { player: 0, index: 0 }, red_progress);

        let mut events = Vec::new();
        state.submit_roll(Roll::single(3), &mut events).unwrap();
        let outcome = state.move_pawn(0, &mut rng, &mut events).unwrap();

        assert_eq!(outcome.captured, vec![victim]);
        assert!(state.players()[1].pawns()[2].is_at_base());
        assert_eq!(state.players()[0].captures, 1);
        assert_eq!(state.players()[1].times_captured, 1);
        assert!(events.contains(&GameEvent::PawnCaptured {
            pawn: victim,
            by: PawnId { player: 0, index: 0 },
            track_index: 20,
            from: blue_progress,
        }));
    }

    #[test]
    fn test_no_capture_on_safe_cell() {
        let mut state = two_player_game(no_stars(), Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        let board = Board::standard();

        // Track cell 13 is Blue's start and safe.
        assert!(board.is_safe(13));
        state.place_pawn(PawnId { player: 1, index: 0 }, 1);
        state.place_pawn(PawnId { player: 0, index: 0 }, 10);
        state.submit_roll(Roll::single(4), &mut NullSink).unwrap();
        let outcome = state.move_pawn(0, &mut rng, &mut NullSink).unwrap();

        assert!(outcome.captured.is_empty());
        assert_eq!(state.players()[1].pawns()[0].progress(), 1);
        assert_eq!(state.pawns_on_track(13).len(), 2);
    }

    #[test]
    fn test_multiple_pawns_captured() {
        let mut state = two_player_game(no_stars(), Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        let blue = Board::standard().progress_at(Color::Blue, 30).unwrap();
        state.place_pawn(PawnId { player: 1, index: 0 }, blue);
        state.place_pawn(PawnId { player: 1, index: 3 }, blue);
        state.place_pawn(PawnId { player: 0, index: 1 }, 29);

        let mut events = Vec::new();
        state.submit_roll(Roll::single(2), &mut events).unwrap();
        let outcome = state.move_pawn(1, &mut rng, &mut events).unwrap();

        assert_eq!(outcome.captured.len(), 2);
        let captures = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PawnCaptured { .. }))
            .count();
        assert_eq!(captures, 2);
    }

    #[test]
    fn test_overshoot_scenario() {
        let mut state = two_player_game(no_stars(), Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        let pawn = PawnId { player: 0, index: 0 };
        state.place_pawn(pawn, 55);
        state.submit_roll(Roll::single(5), &mut NullSink).unwrap();

        // Only pawn in play overshoots: no legal move, turn passes.
        assert_eq!(state.phase(), Phase::AwaitingRoll { player: 1 });
        assert_eq!(state.players()[0].pawns()[0].progress(), 55);
        assert!(state.move_pawn(0, &mut rng, &mut NullSink).is_err());
    }

    #[test]
    fn test_win_ends_game() {
        let mut state = two_player_game(no_stars(), Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        for index in 0..3 {
            state.place_pawn(PawnId { player: 0, index }, 57);
        }
        state.place_pawn(PawnId { player: 0, index: 3 }, 53);

        let mut events = Vec::new();
        state.submit_roll(Roll::single(4), &mut events).unwrap();
        let outcome = state.move_pawn(3, &mut rng, &mut events).unwrap();

        assert_eq!(outcome.winner, Some(0));
        assert!(state.is_game_over());
        assert_eq!(state.winner(), Some(0));
        assert_eq!(events.last(), Some(&GameEvent::PlayerWon { player: 0 }));
        assert!(state.roll_dice(&mut rng, &mut NullSink).is_err());
        assert_eq!(state.standings()[0], 0);
    }

    #[test]
    fn test_bonus_cap() {
        let rules = Rules {
            max_consecutive_bonus: Some(1),
            ..no_stars()
        };
        let mut state = two_player_game(rules, Vec::new());
        let mut rng = StdRng::seed_from_u64(0);

        state.submit_roll(Roll::single(6), &mut NullSink).unwrap();
        assert!(state.move_pawn(0, &mut rng, &mut NullSink).unwrap().extra_roll);
        state.submit_roll(Roll::single(6), &mut NullSink).unwrap();
        assert!(!state.move_pawn(0, &mut rng, &mut NullSink).unwrap().extra_roll);
        assert_eq!(state.phase(), Phase::AwaitingRoll { player: 1 });
    }

    #[test]
    fn test_bonus_on_capture() {
        let rules = Rules {
            bonus_on_capture: true,
            ..no_stars()
        };
        let mut state = two_player_game(rules, Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        let blue = Board::standard().progress_at(Color::Blue, 22).unwrap();
        state.place_pawn(PawnId { player: 1, index: 0 }, blue);
        state.place_pawn(PawnId { player: 0, index: 0 }, 21);

        state.submit_roll(Roll::single(2), &mut NullSink).unwrap();
        let outcome = state.move_pawn(0, &mut rng, &mut NullSink).unwrap();
        assert!(outcome.extra_roll);
        assert_eq!(state.phase(), Phase::AwaitingRoll { player: 0 });
    }

    fn star_game(weights: StarWeights, star_cell: usize) -> GameState {
        let board = Board::standard();
        let rules = Rules {
            star_weights: weights,
            overshoot: Overshoot::Reject,
            ..Rules::classic()
        };
        let star = Star::new(&board, star_cell).unwrap();
        two_player_game(rules, vec![star])
    }

    fn only(effect: StarEffect) -> StarWeights {
        let mut weights = StarWeights {
            no_effect: 0,
            roll_again: 0,
            teleport: 0,
            send_home: 0,
        };
        match effect {
            StarEffect::NoEffect => weights.no_effect = 1,
            StarEffect::RollAgain => weights.roll_again = 1,
            StarEffect::Teleport => weights.teleport = 1,
            StarEffect::SendHome => weights.send_home = 1,
        }
        weights
    }

    #[test]
    fn test_star_send_home() {
        let mut state = star_game(only(StarEffect::SendHome), 5);
        let mut rng = StdRng::seed_from_u64(1);
        state.place_pawn(PawnId { player: 0, index: 0 }, 3);

        let mut events = Vec::new();
        state.submit_roll(Roll::single(3), &mut events).unwrap();
        let outcome = state.move_pawn(0, &mut rng, &mut events).unwrap();

        assert_eq!(outcome.star, Some(StarEffect::SendHome));
        assert!(state.players()[0].pawns()[0].is_at_base());
        assert_eq!(state.stars()[0].triggered(), 1);
        assert!(events.contains(&GameEvent::StarEffect {
            pawn: PawnId { player: 0, index: 0 },
            effect: StarEffect::SendHome,
            from: 6,
            to: 0,
        }));
    }

    #[test]
    fn test_star_roll_again() {
        let mut state = star_game(only(StarEffect::RollAgain), 5);
        let mut rng = StdRng::seed_from_u64(1);
        state.place_pawn(PawnId { player: 0, index: 0 }, 4);

        state.submit_roll(Roll::single(2), &mut NullSink).unwrap();
        let outcome = state.move_pawn(0, &mut rng, &mut NullSink).unwrap();
        assert!(outcome.extra_roll);
        assert_eq!(state.phase(), Phase::AwaitingRoll { player: 0 });
    }

    #[test]
    fn test_star_teleport_avoids_opponents() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..30 {
            let mut state = star_game(only(StarEffect::Teleport), 5);
            let blue = Board::standard().progress_at(Color::Blue, 30).unwrap();
            state.place_pawn(PawnId { player: 1, index: 0 }, blue);
            state.place_pawn(PawnId { player: 0, index: 0 }, 4);

            state.submit_roll(Roll::single(2), &mut NullSink).unwrap();
            let outcome = state.move_pawn(0, &mut rng, &mut NullSink).unwrap();
            assert_eq!(outcome.star, Some(StarEffect::Teleport));

            let progress = state.players()[0].pawns()[0].progress();
            assert!((1..=51).contains(&progress));
            assert_ne!(progress, 6);
            assert_ne!(
                state.board().track_index(Color::Red, progress),
                Some(30)
            );
            assert!(state.players()[1].pawns()[0].progress() == blue);
        }
    }

    #[test]
    fn test_star_needs_exact_landing() {
        let mut state = star_game(only(StarEffect::SendHome), 5);
        let mut rng = StdRng::seed_from_u64(1);
        state.place_pawn(PawnId { player: 0, index: 0 }, 4);

        // Passes over cell 5 and stops on 6.
        state.submit_roll(Roll::single(3), &mut NullSink).unwrap();
        let outcome = state.move_pawn(0, &mut rng, &mut NullSink).unwrap();
        assert_eq!(outcome.star, None);
        assert_eq!(state.players()[0].pawns()[0].progress(), 7);
    }

    #[test]
    fn test_preview_matches_move() {
        let mut state = star_game(only(StarEffect::NoEffect), 5);
        let blue = Board::standard().progress_at(Color::Blue, 9).unwrap();
        state.place_pawn(PawnId { player: 1, index: 0 }, blue);
        state.place_pawn(PawnId { player: 0, index: 0 }, 4);
        state.place_pawn(PawnId { player: 0, index: 1 }, 8);
        state.submit_roll(Roll::single(2), &mut NullSink).unwrap();

        let star = state.preview_move(0).unwrap();
        assert!(star.lands_on_star);
        assert_eq!(star.captures, 0);

        let capture = state.preview_move(1).unwrap();
        assert_eq!(capture.captures, 1);
        assert_eq!(capture.step.to, 10);

        assert!(state.preview_move(2).is_none());
    }

    #[test]
    fn test_turn_events_bracket() {
        let mut state = two_player_game(no_stars(), Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        let mut events = Vec::new();

        state.submit_roll(Roll::single(6), &mut events).unwrap();
        state.move_pawn(0, &mut rng, &mut events).unwrap();
        state.submit_roll(Roll::single(2), &mut events).unwrap();
        state.move_pawn(0, &mut rng, &mut events).unwrap();

        let started = events
            .iter()
            .filter(|e| matches!(e, GameEvent::TurnStarted { .. }))
            .count();
        assert_eq!(started, 1);
        assert_eq!(
            events.last(),
            Some(&GameEvent::TurnEnded { player: 0, next: 1 })
        );
    }
}
