//! Score accumulator - running total of destroyed piece values
//!
//! The total only grows during a session; `reset` is for a new game.

use crate::piece::Piece;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    total: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a destroyed piece and return the new total.
    pub fn add(&mut self, piece: &Piece) -> u32 {
        self.total = self.total.saturating_add(piece.score_value);
        self.total
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn reset(&mut self) {
        self.total = 0;
    }
}
