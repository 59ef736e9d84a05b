//! Dice rolls.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of faces on a die.
pub const DIE_FACES: u8 = 6;

/// Maximum number of dice a rule set may use.
pub const MAX_DICE: u8 = 2;

/// The faces shown by one roll of one or two dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roll {
    faces: [u8; MAX_DICE as usize],
    count: u8,
}

impl Roll {
    /// A roll of a single die.
    #[must_use]
    pub const fn single(face: u8) -> Self {
        Self {
            faces: [face, 0],
            count: 1,
        }
    }

    /// A roll of two dice.
    #[must_use]
    pub const fn pair(first: u8, second: u8) -> Self {
        Self {
            faces: [first, second],
            count: 2,
        }
    }

    /// Roll `dice_count` dice (clamped to 1..=2).
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, dice_count: u8) -> Self {
        let first = rng.gen_range(1..=DIE_FACES);
        if dice_count >= 2 {
            Self::pair(first, rng.gen_range(1..=DIE_FACES))
        } else {
            Self::single(first)
        }
    }

    /// Faces shown, one per die.
    #[must_use]
    pub fn faces(&self) -> &[u8] {
        &self.faces[..usize::from(self.count)]
    }

    /// Number of dice rolled.
    #[must_use]
    pub const fn dice_count(&self) -> u8 {
        self.count
    }

    /// Sum of all faces; this is how far a pawn moves.
    #[must_use]
    pub fn total(&self) -> u8 {
        self.faces().iter().sum()
    }

    /// Whether two dice show the same face.
    #[must_use]
    pub fn is_doubles(&self) -> bool {
        self.count == 2 && self.faces[0] == self.faces[1]
    }

    /// Whether every die shows its highest face.
    #[must_use]
    pub fn is_max(&self) -> bool {
        self.faces().iter().all(|&face| face == DIE_FACES)
    }

    /// Whether every face is a legal die face.
    #[must_use]
    pub fn faces_valid(&self) -> bool {
        self.faces().iter().all(|face| (1..=DIE_FACES).contains(face))
    }
}

impl std::fmt::Display for Roll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.faces() {
            [a, b] => write!(f, "{a}+{b}={}", self.total()),
            _ => write!(f, "{}", self.total()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_roll_totals() {
        assert_eq!(Roll::single(4).total(), 4);
        assert_eq!(Roll::pair(3, 5).total(), 8);
        assert_eq!(Roll::pair(3, 5).faces(), &[3, 5]);
    }

    #[test]
    fn test_doubles_and_max() {
        assert!(Roll::pair(2, 2).is_doubles());
        assert!(!Roll::single(2).is_doubles());
        assert!(Roll::single(6).is_max());
        assert!(Roll::pair(6, 6).is_max());
        assert!(!Roll::pair(6, 5).is_max());
    }

    #[test]
    fn test_random_rolls_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let one = Roll::roll(&mut rng, 1);
            assert_eq!(one.dice_count(), 1);
            assert!((1..=6).contains(&one.total()));

            let two = Roll::roll(&mut rng, 2);
            assert!(two.faces_valid());
            assert!((2..=12).contains(&two.total()));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Roll::single(6).to_string(), "6");
        assert_eq!(Roll::pair(1, 4).to_string(), "1+4=5");
    }
}
