//! Game notifications.
//!
//! The statekeeper reports everything that happens through an
//! [`EventSink`] handed to each operation. Renderers, sound and alert layers
//! consume these; the core never depends on them.

use serde::Serialize;

use crate::error::MoveRejection;
use crate::game::{PawnId, PlayerId, Roll, StarEffect};

/// Something that happened during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A player's turn began.
    TurnStarted {
        /// Player to act.
        player: PlayerId,
        /// Number of completed turns before this one.
        turn: u32,
    },
    /// Dice were rolled or a resolved roll was submitted.
    DiceRolled {
        /// Player who rolled.
        player: PlayerId,
        /// The roll.
        roll: Roll,
    },
    /// No pawn of the player can use the roll.
    NoLegalMove {
        /// Player who rolled.
        player: PlayerId,
        /// The roll.
        roll: Roll,
    },
    /// A chosen pawn could not move.
    MoveRejected {
        /// The pawn.
        pawn: PawnId,
        /// Why.
        reason: MoveRejection,
    },
    /// A pawn moved along its route.
    PawnMoved {
        /// The pawn.
        pawn: PawnId,
        /// Progress before.
        from: u8,
        /// Progress after.
        to: u8,
    },
    /// A pawn reached the terminal cell.
    PawnFinished {
        /// The pawn.
        pawn: PawnId,
    },
    /// A pawn was sent back to base by an opponent.
    PawnCaptured {
        /// Captured pawn.
        pawn: PawnId,
        /// Pawn that landed on it.
        by: PawnId,
        /// Track cell of the capture.
        track_index: usize,
        /// Progress the captured pawn lost.
        from: u8,
    },
    /// A star outcome was applied.
    StarEffect {
        /// Pawn that landed on the star.
        pawn: PawnId,
        /// Outcome applied.
        effect: StarEffect,
        /// Progress before.
        from: u8,
        /// Progress after.
        to: u8,
    },
    /// A player's turn ended.
    TurnEnded {
        /// Player whose turn ended.
        player: PlayerId,
        /// Player to act next.
        next: PlayerId,
    },
    /// Every pawn of a player reached home.
    PlayerWon {
        /// The winner.
        player: PlayerId,
    },
}

impl GameEvent {
    /// Player the event is about.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        match self {
            Self::TurnStarted { player, .. }
            | Self::DiceRolled { player, .. }
            | Self::NoLegalMove { player, .. }
            | Self::TurnEnded { player, .. }
            | Self::PlayerWon { player } => *player,
            Self::MoveRejected { pawn, .. }
            | Self::PawnMoved { pawn, .. }
            | Self::PawnFinished { pawn }
            | Self::PawnCaptured { pawn, .. }
            | Self::StarEffect { pawn, .. } => pawn.player,
        }
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TurnStarted { player, turn } => write!(f, "turn {turn}: player {player} to act"),
            Self::DiceRolled { player, roll } => write!(f, "player {player} rolled {roll}"),
            Self::NoLegalMove { player, roll } => {
                write!(f, "player {player} cannot use {roll}")
            }
            Self::MoveRejected { pawn, reason } => write!(f, "{pawn} rejected: {reason}"),
            Self::PawnMoved { pawn, from, to } => write!(f, "{pawn} moved {from} -> {to}"),
            Self::PawnFinished { pawn } => write!(f, "{pawn} reached home"),
            Self::PawnCaptured { pawn, by, track_index, .. } => {
                write!(f, "{by} captured {pawn} on cell {track_index}")
            }
            Self::StarEffect { pawn, effect, from, to } => {
                write!(f, "{pawn} hit a star: {effect} ({from} -> {to})")
            }
            Self::TurnEnded { player, next } => {
                write!(f, "player {player} done, player {next} next")
            }
            Self::PlayerWon { player } => write!(f, "player {player} wins"),
        }
    }
}

/// Receiver of game events.
pub trait EventSink {
    /// Accept one event.
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Writes every event to the `log` facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::PlayerWon { .. } => log::info!(target: "ludo::events", "{event}"),
            _ => log::debug!(target: "ludo::events", "{event}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<GameEvent> = Vec::new();
        sink.emit(GameEvent::PlayerWon { player: 1 });
        NullSink.emit(GameEvent::PlayerWon { player: 2 });
        assert_eq!(sink, vec![GameEvent::PlayerWon { player: 1 }]);
    }

    #[test]
    fn test_event_player() {
        let pawn = PawnId { player: 3, index: 1 };
        assert_eq!(GameEvent::PawnFinished { pawn }.player(), 3);
        assert_eq!(GameEvent::TurnEnded { player: 0, next: 1 }.player(), 0);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = GameEvent::PawnMoved {
            pawn: PawnId { player: 0, index: 2 },
            from: 3,
            to: 8,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""event":"pawn_moved""#));
        assert!(json.contains(r#""to":8"#));
    }
}
