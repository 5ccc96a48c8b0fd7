//! Grid module - fixed-size storage of board cells
//!
//! The grid is a `width x height` array where each cell is empty or holds one
//! piece. Uses a flat vector in column-major order so a column is contiguous,
//! which is what compaction and refill walk.
//! Coordinates: (x, y) with x = 0 on the left and y = 0 on the bottom row.
//!
//! Out-of-bounds reads return `None`, exactly like an empty cell, so callers
//! treat edges and corners uniformly.

use crate::piece::{Piece, PieceRef};
use crate::types::Pos;

/// The board grid, `width` columns by `height` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, column-major order (x * height + y)
    cells: Vec<Option<Piece>>,
}

impl Grid {
    /// Create an empty grid. Dimensions never change afterwards.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if !self.is_inside(x, y) {
            return None;
        }
        Some((x as usize) * (self.height as usize) + (y as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn is_inside(&self, x: i8, y: i8) -> bool {
        x >= 0 && y >= 0 && (x as u8) < self.width && (y as u8) < self.height
    }

    /// Piece at (x, y). Empty and out-of-bounds cells both read as `None`.
    pub fn get(&self, x: i8, y: i8) -> Option<&Piece> {
        self.index(x, y).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, x: i8, y: i8) -> Option<&mut Piece> {
        let i = self.index(x, y)?;
        self.cells[i].as_mut()
    }

    /// Piece at `pos`.
    pub fn at(&self, pos: Pos) -> Option<&Piece> {
        self.get(pos.x, pos.y)
    }

    /// Piece recorded as `r`, if its cell still holds that same piece.
    pub fn resolve(&self, r: PieceRef) -> Option<&Piece> {
        self.at(r.pos).filter(|p| p.id == r.id)
    }

    pub fn resolve_mut(&mut self, r: PieceRef) -> Option<&mut Piece> {
        self.get_mut(r.pos.x, r.pos.y).filter(|p| p.id == r.id)
    }

    /// Overwrite cell (x, y). The piece is stored as given; keeping its `pos`
    /// in sync is the caller's job.
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, piece: Option<Piece>) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = piece;
                true
            }
            None => false,
        }
    }

    /// Remove and return the piece at (x, y).
    pub fn take(&mut self, x: i8, y: i8) -> Option<Piece> {
        let i = self.index(x, y)?;
        self.cells[i].take()
    }

    /// Check if position is within bounds and empty
    pub fn is_empty_at(&self, x: i8, y: i8) -> bool {
        self.is_inside(x, y) && self.get(x, y).is_none()
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Reset the transient `matched` flag on every piece.
    pub fn clear_matched(&mut self) {
        for piece in self.cells.iter_mut().flatten() {
            piece.matched = false;
        }
    }

    /// Iterate over every occupied cell.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten()
    }

    /// Remove every piece, returning them in column-major order.
    pub fn drain(&mut self) -> Vec<Piece> {
        self.cells.iter_mut().filter_map(Option::take).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceId;
    use crate::types::GemKind;

    fn gem(id: u32, x: i8, y: i8) -> Piece {
        Piece {
            id: PieceId(id),
            kind: GemKind::Red,
            is_bomb: false,
            blast_radius: 0,
            score_value: 10,
            pos: Pos::new(x, y),
            matched: false,
        }
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(7, 5);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(0, 4), Some(4));
        assert_eq!(grid.index(1, 0), Some(5));
        assert_eq!(grid.index(6, 4), Some(34));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(7, 0), None);
        assert_eq!(grid.index(0, 5), None);
    }

    #[test]
    fn test_set_get_take() {
        let mut grid = Grid::new(7, 7);
        assert!(grid.set(2, 3, Some(gem(1, 2, 3))));
        assert_eq!(grid.get(2, 3).map(|p| p.id), Some(PieceId(1)));
        assert_eq!(grid.occupied(), 1);

        let taken = grid.take(2, 3);
        assert_eq!(taken.map(|p| p.id), Some(PieceId(1)));
        assert!(grid.get(2, 3).is_none());
        assert!(grid.take(2, 3).is_none());
    }

    #[test]
    fn test_out_of_bounds_reads_empty() {
        let mut grid = Grid::new(3, 3);
        assert!(grid.get(-1, 0).is_none());
        assert!(grid.get(0, 3).is_none());
        assert!(grid.get_mut(3, 0).is_none());
        assert!(!grid.set(3, 3, Some(gem(1, 3, 3))));
        assert!(!grid.is_empty_at(-1, -1));
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_clear_matched_and_drain() {
        let mut grid = Grid::new(3, 3);
        let mut p = gem(1, 0, 0);
        p.matched = true;
        grid.set(0, 0, Some(p));
        grid.set(1, 1, Some(gem(2, 1, 1)));

        grid.clear_matched();
        assert!(grid.pieces().all(|p| !p.matched));

        let drained = grid.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_resolve_checks_identity() {
        let mut grid = Grid::new(3, 3);
        let p = gem(7, 1, 2);
        grid.set(1, 2, Some(p));
        assert!(grid.resolve(p.to_ref()).is_some());

        grid.set(1, 2, Some(gem(8, 1, 2)));
        assert!(grid.resolve(p.to_ref()).is_none());
        assert!(grid.resolve_mut(p.to_ref()).is_none());
    }
}
