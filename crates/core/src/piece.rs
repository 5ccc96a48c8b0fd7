//! Pieces - the gems and bombs that occupy grid cells.

use crate::types::{GemKind, Pos};

/// Stable identity of a piece for its whole lifetime.
///
/// Presentation layers key their visuals on this id; it is never reused
/// within a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

/// A piece on the board.
///
/// `pos` always equals the coordinates of the cell holding the piece; only the
/// grid pipeline writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: GemKind,
    pub is_bomb: bool,
    pub blast_radius: u8,
    pub score_value: u32,
    pub pos: Pos,
    /// Set by match detection, cleared at the start of every detection pass.
    pub matched: bool,
}

impl Piece {
    /// True for the plain bomb that neighbors can set off.
    pub fn is_normal_bomb(&self) -> bool {
        self.is_bomb && self.kind == GemKind::NormalBomb
    }

    pub fn to_ref(&self) -> PieceRef {
        PieceRef {
            id: self.id,
            pos: self.pos,
        }
    }
}

/// A piece as recorded by match detection: its id and where it was.
///
/// Lookups resolve the ref against the grid and ignore it when the cell no
/// longer holds the same piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRef {
    pub id: PieceId,
    pub pos: Pos,
}
