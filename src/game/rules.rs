//! Rule configuration.
//!
//! Every variant knob of the game lives in [`Rules`]. Rules are plain data:
//! they can be built in code, loaded from a JSON file, and are validated
//! against a [`Board`] before a game starts.

use std::fmt;
use std::fs;
use std::path::Path;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};

use crate::game::{Board, DIE_FACES, MAX_DICE, Roll, StarEffect};

/// Which rolls bring a pawn out of base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryRule {
    /// The roll total must equal this value.
    Exact(u8),
    /// The roll total must be at least this value.
    AtLeast(u8),
}

impl EntryRule {
    /// Whether a roll total lets a pawn leave base.
    #[must_use]
    pub const fn allows(self, total: u8) -> bool {
        match self {
            EntryRule::Exact(value) => total == value,
            EntryRule::AtLeast(value) => total >= value,
        }
    }
}

/// Which rolls keep the same player rolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusRule {
    /// Every die shows its highest face.
    MaxFace,
    /// Two dice show the same face.
    Doubles,
    /// Rolls never grant a bonus.
    Never,
}

impl BonusRule {
    /// Whether a roll earns another roll.
    #[must_use]
    pub fn earns_bonus(self, roll: &Roll) -> bool {
        match self {
            BonusRule::MaxFace => roll.is_max(),
            BonusRule::Doubles => roll.is_doubles(),
            BonusRule::Never => false,
        }
    }
}

/// What happens when a roll would carry a pawn past the terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overshoot {
    /// The move is rejected.
    Reject,
    /// The pawn stops on the terminal cell.
    Clamp,
    /// Overshooting by at most this many cells still finishes.
    Grace(u8),
}

/// Relative weights of the star outcomes.
///
/// The probability of an outcome is its weight divided by the sum of all
/// weights. With the default 1:1:1:1 every outcome has probability 1/4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarWeights {
    /// Weight of [`StarEffect::NoEffect`].
    pub no_effect: u32,
    /// Weight of [`StarEffect::RollAgain`].
    pub roll_again: u32,
    /// Weight of [`StarEffect::Teleport`].
    pub teleport: u32,
    /// Weight of [`StarEffect::SendHome`].
    pub send_home: u32,
}

impl Default for StarWeights {
    fn default() -> Self {
        Self {
            no_effect: 1,
            roll_again: 1,
            teleport: 1,
            send_home: 1,
        }
    }
}

impl StarWeights {
    /// Weights in [`StarEffect::ALL`] order.
    #[must_use]
    pub const fn as_array(&self) -> [u32; 4] {
        [self.no_effect, self.roll_again, self.teleport, self.send_home]
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.as_array().iter().map(|&w| u64::from(w)).sum()
    }

    /// Draw one outcome.
    ///
    /// All-zero weights always yield [`StarEffect::NoEffect`]. Weights are
    /// summed as `u64`, so any four `u32` weights are accepted.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> StarEffect {
        match WeightedIndex::new(self.as_array().map(u64::from)) {
            Ok(dist) => StarEffect::ALL[dist.sample(rng)],
            Err(_) => StarEffect::NoEffect,
        }
    }
}

/// Complete rule set for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Dice rolled per turn (1 or 2).
    pub dice_count: u8,
    /// Rolls that bring a pawn out of base.
    pub entry: EntryRule,
    /// Rolls that keep the same player rolling.
    pub bonus: BonusRule,
    /// Handling of rolls that pass the terminal cell.
    pub overshoot: Overshoot,
    /// Number of star tiles placed at setup.
    pub star_count: usize,
    /// Star outcome weights.
    pub star_weights: StarWeights,
    /// Capturing a pawn earns another roll.
    pub bonus_on_capture: bool,
    /// Cap on consecutive bonus rolls; the next bonus is forfeited.
    pub max_consecutive_bonus: Option<u8>,
}

impl Default for Rules {
    fn default() -> Self {
        Self::classic()
    }
}

impl Rules {
    /// One die, a six to enter, a six to roll again.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            dice_count: 1,
            entry: EntryRule::Exact(DIE_FACES),
            bonus: BonusRule::MaxFace,
            overshoot: Overshoot::Reject,
            star_count: 4,
            star_weights: StarWeights::default(),
            bonus_on_capture: false,
            max_consecutive_bonus: None,
        }
    }

    /// Two dice, ten or more to enter, doubles to roll again, and a pawn
    /// one cell past home still counts as finished.
    #[must_use]
    pub fn two_dice() -> Self {
        Self {
            dice_count: 2,
            entry: EntryRule::AtLeast(10),
            bonus: BonusRule::Doubles,
            overshoot: Overshoot::Grace(1),
            ..Self::classic()
        }
    }

    /// Check that the rules make sense on `board`.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self, board: &Board) -> Result<(), RulesError> {
        if self.dice_count == 0 || self.dice_count > MAX_DICE {
            return Err(RulesError::InvalidDiceCount(self.dice_count));
        }

        let min_total = self.dice_count;
        let max_total = self.dice_count * DIE_FACES;
        let reachable = match self.entry {
            EntryRule::Exact(value) => (min_total..=max_total).contains(&value),
            EntryRule::AtLeast(value) => value <= max_total,
        };
        if !reachable {
            return Err(RulesError::UnreachableEntry {
                entry: self.entry,
                max_total,
            });
        }

        if self.bonus == BonusRule::Doubles && self.dice_count < 2 {
            return Err(RulesError::DoublesNeedTwoDice);
        }

        let available = board.star_candidates().len();
        if self.star_count > available {
            return Err(RulesError::TooManyStars {
                requested: self.star_count,
                available,
            });
        }

        if self.star_count > 0 && self.star_weights.total() == 0 {
            return Err(RulesError::ZeroStarWeights);
        }

        Ok(())
    }

    /// Parse rules from JSON. Missing fields take their classic value.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, RulesError> {
        serde_json::from_str(json).map_err(RulesError::Parse)
    }

    /// Load rules from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, RulesError> {
        let text = fs::read_to_string(path).map_err(RulesError::Io)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, RulesError> {
        serde_json::to_string_pretty(self).map_err(RulesError::Parse)
    }
}

/// Invalid or unreadable rule configuration.
#[derive(Debug)]
pub enum RulesError {
    /// Dice count outside 1..=2.
    InvalidDiceCount(u8),
    /// No roll can ever satisfy the entry rule.
    UnreachableEntry {
        /// The configured entry rule.
        entry: EntryRule,
        /// Highest total the dice can show.
        max_total: u8,
    },
    /// The doubles bonus needs two dice.
    DoublesNeedTwoDice,
    /// More stars than free track cells.
    TooManyStars {
        /// Requested star count.
        requested: usize,
        /// Cells that may hold a star.
        available: usize,
    },
    /// Stars are enabled but every outcome has weight zero.
    ZeroStarWeights,
    /// Rules file could not be read.
    Io(std::io::Error),
    /// Rules JSON could not be parsed or written.
    Parse(serde_json::Error),
}

impl fmt::Display for RulesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDiceCount(n) => write!(f, "dice_count must be 1 or 2, got {n}"),
            Self::UnreachableEntry { entry, max_total } => {
                write!(f, "entry rule {entry:?} can never be met (max roll {max_total})")
            }
            Self::DoublesNeedTwoDice => write!(f, "the doubles bonus needs dice_count = 2"),
            Self::TooManyStars {
                requested,
                available,
            } => write!(f, "{requested} stars requested but only {available} cells are free"),
            Self::ZeroStarWeights => write!(f, "all star weights are zero"),
            Self::Io(e) => write!(f, "cannot read rules: {e}"),
            Self::Parse(e) => write!(f, "invalid rules JSON: {e}"),
        }
    }
}

impl std::error::Error for RulesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}
