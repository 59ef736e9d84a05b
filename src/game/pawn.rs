//! Pawn movement.

use serde::{Deserialize, Serialize};

use crate::error::MoveRejection;
use crate::game::{Overshoot, PlayerId, Rules};

/// Identifies one pawn in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PawnId {
    /// Owning player.
    pub player: PlayerId,
    /// Index of the pawn within its player's four.
    pub index: u8,
}

impl std::fmt::Display for PawnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}#{}", self.player, self.index)
    }
}

/// Result of a legal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Progress before the step.
    pub from: u8,
    /// Progress after the step.
    pub to: u8,
    /// The pawn left base with this step.
    pub entered: bool,
    /// The pawn reached the terminal cell with this step.
    pub finished: bool,
}

/// One game piece.
///
/// `progress` is 0 at base, then counts cells walked along the owning
/// color's route up to the terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pawn {
    id: PawnId,
    progress: u8,
}

impl Pawn {
    /// A pawn at base.
    #[must_use]
    pub const fn new(id: PawnId) -> Self {
        Self { id, progress: 0 }
    }

    /// This pawn's identifier.
    #[must_use]
    pub const fn id(&self) -> PawnId {
        self.id
    }

    /// Current progress counter.
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// Whether the pawn is at base.
    #[must_use]
    pub const fn is_at_base(&self) -> bool {
        self.progress == 0
    }

    /// Whether the pawn stands on the terminal cell.
    #[must_use]
    pub const fn is_finished(&self, terminal: u8) -> bool {
        self.progress >= terminal
    }

    /// Work out where a roll of `dice` would take this pawn.
    ///
    /// Does not change the pawn.
    ///
    /// # Errors
    ///
    /// Returns why the step is illegal.
    pub fn plan(&self, dice: u8, rules: &Rules, terminal: u8) -> Result<Step, MoveRejection> {
        if dice == 0 {
            return Err(MoveRejection::ZeroRoll);
        }
        if self.is_finished(terminal) {
            return Err(MoveRejection::AlreadyFinished);
        }

        if self.is_at_base() {
            if !rules.entry.allows(dice) {
                return Err(MoveRejection::NeedsEntryRoll { rolled: dice });
            }
            return Ok(Step {
                from: 0,
                to: 1,
                entered: true,
                finished: terminal <= 1,
            });
        }

        let target = u16::from(self.progress) + u16::from(dice);
        let remaining = terminal - self.progress;
        let to = if target <= u16::from(terminal) {
            // target fits in u8 because it does not exceed terminal
            u8::try_from(target).unwrap_or(terminal)
        } else {
            let over = target - u16::from(terminal);
            match rules.overshoot {
                Overshoot::Clamp => terminal,
                Overshoot::Grace(grace) if over <= u16::from(grace) => terminal,
                Overshoot::Reject | Overshoot::Grace(_) => {
                    return Err(MoveRejection::Overshoot {
                        rolled: dice,
                        remaining,
                    });
                }
            }
        };

        Ok(Step {
            from: self.progress,
            to,
            entered: false,
            finished: to == terminal,
        })
    }

    /// Move the pawn by a roll of `dice`.
    ///
    /// A rejected move leaves the pawn where it was.
    ///
    /// # Errors
    ///
    /// Returns why the step is illegal.
    pub fn advance(&mut self, dice: u8, rules: &Rules, terminal: u8) -> Result<Step, MoveRejection> {
        let step = self.plan(dice, rules, terminal)?;
        self.progress = step.to;
        Ok(step)
    }

    /// Return the pawn to base. Returns the progress it had.
    pub fn send_to_base(&mut self) -> u8 {
        std::mem::replace(&mut self.progress, 0)
    }

    /// Put the pawn on an arbitrary progress value.
    pub(crate) fn place(&mut self, progress: u8) {
        self.progress = progress;
    }
}
