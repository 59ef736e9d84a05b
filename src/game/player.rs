//! Player state management.

use rand::Rng;

use crate::game::{Color, PAWNS_PER_PLAYER, Pawn, PawnId, Roll};

/// Seat index of a player, in turn order starting at 0.
pub type PlayerId = u8;

/// One player and the four pawns they own.
#[derive(Debug, Clone)]
pub struct Player {
    /// Seat index.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Color; decides start cell and home stretch.
    pub color: Color,
    pawns: [Pawn; PAWNS_PER_PLAYER],
    /// Opponent pawns this player sent back to base.
    pub captures: u32,
    /// Times one of this player's pawns was captured.
    pub times_captured: u32,
    /// Stars this player's pawns landed on.
    pub stars_triggered: u32,
}

impl Player {
    /// Create a player with all pawns at base.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, color: Color) -> Self {
        let pawns = std::array::from_fn(|index| {
            #[allow(clippy::cast_possible_truncation)]
            let index = index as u8;
            Pawn::new(PawnId { player: id, index })
        });

        Self {
            id,
            name: name.into(),
            color,
            pawns,
            captures: 0,
            times_captured: 0,
            stars_triggered: 0,
        }
    }

    /// Roll this player's dice.
    pub fn dice_roll<R: Rng + ?Sized>(&self, rng: &mut R, dice_count: u8) -> Roll {
        let roll = Roll::roll(rng, dice_count);
        log::trace!("{} ({}) rolled {roll}", self.name, self.color);
        roll
    }

    /// All four pawns.
    #[must_use]
    pub fn pawns(&self) -> &[Pawn; PAWNS_PER_PLAYER] {
        &self.pawns
    }

    /// A pawn by index.
    #[must_use]
    pub fn pawn(&self, index: usize) -> Option<&Pawn> {
        self.pawns.get(index)
    }

    /// A pawn by index, mutably.
    #[must_use]
    pub fn pawn_mut(&mut self, index: usize) -> Option<&mut Pawn> {
        self.pawns.get_mut(index)
    }

    pub(crate) fn pawns_mut(&mut self) -> &mut [Pawn; PAWNS_PER_PLAYER] {
        &mut self.pawns
    }

    /// Pawns that reached the terminal cell.
    #[must_use]
    pub fn pawns_home(&self, terminal: u8) -> usize {
        self.pawns.iter().filter(|p| p.is_finished(terminal)).count()
    }

    /// Pawns out of base and not yet finished.
    #[must_use]
    pub fn pawns_in_play(&self, terminal: u8) -> usize {
        self.pawns
            .iter()
            .filter(|p| !p.is_at_base() && !p.is_finished(terminal))
            .count()
    }

    /// Whether every pawn reached the terminal cell.
    #[must_use]
    pub fn has_won(&self, terminal: u8) -> bool {
        self.pawns_home(terminal) == PAWNS_PER_PLAYER
    }

    /// Sum of all pawn progress; used to rank unfinished games.
    #[must_use]
    pub fn total_progress(&self) -> u32 {
        self.pawns.iter().map(|p| u32::from(p.progress())).sum()
    }
}
