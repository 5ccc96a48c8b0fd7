//! Match detection and bomb area marking
//!
//! A detection pass flags every matched piece on the grid and records it two
//! ways: as [`MatchGroup`]s (pieces connected by overlapping lines) and as the
//! flattened match set the cascade destroys. Both hold [`PieceRef`]s, so a
//! piece that has since left its cell is simply skipped by whoever resolves it.
//!
//! The matcher also owns the ledger of bombs promoted during the current
//! cascade step. A group cannot set those off until the ledger is cleared,
//! but another bomb's blast still can.

use crate::grid::Grid;
use crate::piece::{PieceId, PieceRef};
use crate::types::{Pos, PROMOTION_GROUP_SIZE};

/// Pieces connected by matching lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchGroup {
    pieces: Vec<PieceRef>,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces.iter().any(|r| r.id == id)
    }

    pub fn pieces(&self) -> &[PieceRef] {
        &self.pieces
    }

    fn overlaps(&self, candidates: &[PieceRef]) -> bool {
        candidates.iter().any(|c| self.contains(c.id))
    }
}

/// Keep the first occurrence of every piece.
fn dedup_refs(refs: &mut Vec<PieceRef>) {
    let mut seen: Vec<PieceId> = Vec::with_capacity(refs.len());
    refs.retain(|r| {
        if seen.contains(&r.id) {
            false
        } else {
            seen.push(r.id);
            true
        }
    });
}

#[derive(Debug, Clone, Default)]
pub struct Matcher {
    groups: Vec<MatchGroup>,
    matches: Vec<PieceRef>,
    new_bombs: Vec<PieceId>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop groups, the match set and the promotion ledger.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.matches.clear();
        self.new_bombs.clear();
    }

    /// Run a full detection pass.
    ///
    /// `triggers` are the two pieces of the swap that started the turn, or
    /// empty for the re-scan after a refill. When both triggers are bombs they
    /// match each other regardless of their kinds or positions.
    pub fn find_all_matches(&mut self, grid: &mut Grid, triggers: &[PieceRef]) {
        self.clear();
        grid.clear_matched();

        if let [a, b] = triggers {
            let both_bombs = [*a, *b]
                .iter()
                .all(|r| grid.resolve(*r).is_some_and(|p| p.is_bomb));
            if both_bombs {
                self.mark_and_merge(grid, &[*a]);
                self.mark_and_merge(grid, &[*b]);
            }
        }

        for x in 0..grid.width() as i8 {
            for y in 0..grid.height() as i8 {
                let Some(center) = grid.get(x, y).copied() else {
                    continue;
                };
                for (dx, dy) in [(1, 0), (0, 1)] {
                    let line = match (grid.get(x - dx, y - dy), grid.get(x + dx, y + dy)) {
                        (Some(a), Some(b)) if a.kind == center.kind && b.kind == center.kind => {
                            [center.to_ref(), a.to_ref(), b.to_ref()]
                        }
                        _ => continue,
                    };
                    self.mark_and_merge(grid, &line);
                }
            }
        }

        for group in &mut self.groups {
            dedup_refs(&mut group.pieces);
        }
        self.matches = self
            .groups
            .iter()
            .flat_map(|g| g.pieces.iter().copied())
            .collect();
    }

    /// Flag `candidates` and merge them into the first group sharing a piece.
    fn mark_and_merge(&mut self, grid: &mut Grid, candidates: &[PieceRef]) {
        for r in candidates {
            if let Some(p) = grid.resolve_mut(*r) {
                p.matched = true;
            }
        }

        match self.groups.iter_mut().find(|g| g.overlaps(candidates)) {
            Some(group) => group.pieces.extend_from_slice(candidates),
            None => self.groups.push(MatchGroup {
                pieces: candidates.to_vec(),
            }),
        }
    }

    /// Look for bombs set off by the current groups.
    ///
    /// Each group position is checked along with its four orthogonal
    /// neighbors. A bomb on the position itself goes off whatever its kind; a
    /// neighboring bomb goes off only if it is a normal bomb. Bombs in the
    /// promotion ledger are skipped here, though a blast that reaches one
    /// still sets it off. Returns true if any bomb went off.
    pub fn check_for_bombs(&mut self, grid: &mut Grid) -> bool {
        let positions: Vec<Pos> = self
            .groups
            .iter()
            .flat_map(|g| g.pieces.iter().map(|r| r.pos))
            .collect();

        let mut triggered = false;
        for pos in positions {
            triggered |= self.try_detonate(grid, pos, true);
            for neighbor in pos.neighbors() {
                triggered |= self.try_detonate(grid, neighbor, false);
            }
        }
        triggered
    }

    fn try_detonate(&mut self, grid: &mut Grid, pos: Pos, any_bomb: bool) -> bool {
        let Some(bomb) = grid.at(pos).copied() else {
            return false;
        };
        if !bomb.is_bomb || self.new_bombs.contains(&bomb.id) {
            return false;
        }
        if !any_bomb && !bomb.is_normal_bomb() {
            return false;
        }
        self.mark_bomb_area(grid, pos, bomb.blast_radius);
        true
    }

    /// Flag and collect every piece in the square of side `2 * radius + 1`
    /// around `center`, clipped to the board.
    ///
    /// A bomb caught in the square that was not flagged yet marks its own
    /// area in turn. The flag is set before recursing, so each bomb expands
    /// at most once and the chain always ends.
    pub fn mark_bomb_area(&mut self, grid: &mut Grid, center: Pos, radius: u8) {
        self.mark_area(grid, center, radius);
        dedup_refs(&mut self.matches);
    }

    fn mark_area(&mut self, grid: &mut Grid, center: Pos, radius: u8) {
        let r = radius as i16;
        let (cx, cy) = (center.x as i16, center.y as i16);
        let x_range = (cx - r).max(0)..=(cx + r).min(grid.width() as i16 - 1);
        let y_range = (cy - r).max(0)..=(cy + r).min(grid.height() as i16 - 1);

        for x in x_range {
            for y in y_range.clone() {
                let Some(piece) = grid.get_mut(x as i8, y as i8) else {
                    continue;
                };
                let can_explode = piece.is_bomb && !piece.matched;
                piece.matched = true;
                let (at, blast) = (piece.to_ref(), piece.blast_radius);
                self.matches.push(at);
                if can_explode {
                    self.mark_area(grid, at.pos, blast);
                }
            }
        }
    }

    pub fn groups(&self) -> &[MatchGroup] {
        &self.groups
    }

    /// The match set of the last pass, plus anything bomb marking added.
    pub fn matches(&self) -> &[PieceRef] {
        &self.matches
    }

    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Bombs promoted during the current cascade step.
    pub fn new_bombs(&self) -> &[PieceId] {
        &self.new_bombs
    }

    /// First group containing `id` that is large enough to promote it.
    pub fn promotion_group(&self, id: PieceId) -> Option<&MatchGroup> {
        self.groups
            .iter()
            .find(|g| g.len() >= PROMOTION_GROUP_SIZE && g.contains(id))
    }

    pub(crate) fn remove_match(&mut self, id: PieceId) {
        self.matches.retain(|r| r.id != id);
    }

    pub(crate) fn register_bomb(&mut self, id: PieceId) {
        self.new_bombs.push(id);
    }

    pub fn clear_new_bombs(&mut self) {
        self.new_bombs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;
    use crate::types::GemKind;

    const STRIPES: [GemKind; 5] = [
        GemKind::Blue,
        GemKind::Green,
        GemKind::Red,
        GemKind::Yellow,
        GemKind::Purple,
    ];

    fn piece(id: u32, kind: GemKind, x: i8, y: i8) -> Piece {
        Piece {
            id: PieceId(id),
            kind,
            is_bomb: kind == GemKind::NormalBomb,
            blast_radius: 1,
            score_value: 10,
            pos: Pos::new(x, y),
            matched: false,
        }
    }

    /// 7x7 board where no three neighbors in a line share a kind.
    fn striped() -> Grid {
        let mut grid = Grid::new(7, 7);
        for x in 0..7i8 {
            for y in 0..7i8 {
                let kind = STRIPES[(x + 2 * y) as usize % 5];
                let id = (x as u32) * 7 + y as u32 + 1;
                grid.set(x, y, Some(piece(id, kind, x, y)));
            }
        }
        grid
    }

    fn put(grid: &mut Grid, kind: GemKind, x: i8, y: i8) {
        let id = grid.get(x, y).map(|p| p.id.0).unwrap_or(1000 + (x * 7 + y) as u32);
        grid.set(x, y, Some(piece(id, kind, x, y)));
    }

    #[test]
    fn test_striped_board_has_no_matches() {
        let mut grid = striped();
        let mut matcher = Matcher::new();
        matcher.find_all_matches(&mut grid, &[]);
        assert!(!matcher.has_matches());
        assert!(matcher.groups().is_empty());
    }

    #[test]
    fn test_three_in_a_row() {
        let mut grid = striped();
        for x in 2..=4 {
            put(&mut grid, GemKind::Yellow, x, 3);
        }
        let mut matcher = Matcher::new();
        matcher.find_all_matches(&mut grid, &[]);

        assert_eq!(matcher.groups().len(), 1);
        assert_eq!(matcher.groups()[0].len(), 3);
        assert_eq!(matcher.matches().len(), 3);
        for r in matcher.matches() {
            assert!(grid.resolve(*r).unwrap().matched);
        }
        assert_eq!(grid.pieces().filter(|p| p.matched).count(), 3);
    }

    #[test]
    fn test_five_in_a_row_is_one_group() {
        let mut grid = striped();
        for x in 1..=5 {
            put(&mut grid, GemKind::Blue, x, 3);
        }
        let trigger = grid.get(3, 3).unwrap().id;
        let mut matcher = Matcher::new();
        matcher.find_all_matches(&mut grid, &[]);

        assert_eq!(matcher.groups().len(), 1);
        assert_eq!(matcher.groups()[0].len(), 5);
        assert_eq!(matcher.matches().len(), 5);
        assert!(matcher.promotion_group(trigger).is_some());
    }

    #[test]
    fn test_crossing_lines_merge() {
        let mut grid = striped();
        for x in 1..=3 {
            put(&mut grid, GemKind::Yellow, x, 1);
        }
        for y in 2..=3 {
            put(&mut grid, GemKind::Yellow, 2, y);
        }
        let mut matcher = Matcher::new();
        matcher.find_all_matches(&mut grid, &[]);

        assert_eq!(matcher.groups().len(), 1);
        assert_eq!(matcher.groups()[0].len(), 5);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let mut grid = striped();
        for y in 0..=2 {
            put(&mut grid, GemKind::Green, 4, y);
        }
        let mut matcher = Matcher::new();
        matcher.find_all_matches(&mut grid, &[]);
        let first = matcher.matches().to_vec();
        let flagged = grid.clone();

        matcher.find_all_matches(&mut grid, &[]);
        assert_eq!(matcher.matches(), first.as_slice());
        assert_eq!(grid, flagged);
    }

    #[test]
    fn test_bomb_pair_triggers_match() {
        let mut grid = striped();
        put(&mut grid, GemKind::NormalBomb, 0, 0);
        put(&mut grid, GemKind::NormalBomb, 6, 6);
        let a = grid.get(0, 0).unwrap().to_ref();
        let b = grid.get(6, 6).unwrap().to_ref();

        let mut matcher = Matcher::new();
        matcher.find_all_matches(&mut grid, &[a, b]);
        assert_eq!(matcher.matches().len(), 2);

        matcher.find_all_matches(&mut grid, &[a]);
        assert!(!matcher.has_matches());
    }

    #[test]
    fn test_neighbor_bombs_chain() {
        let mut grid = striped();
        for x in 1..=3 {
            put(&mut grid, GemKind::Blue, x, 1);
        }
        put(&mut grid, GemKind::NormalBomb, 2, 2);
        put(&mut grid, GemKind::NormalBomb, 2, 3);

        let mut matcher = Matcher::new();
        matcher.find_all_matches(&mut grid, &[]);
        assert!(matcher.check_for_bombs(&mut grid));

        let mut cells: Vec<(i8, i8)> = matcher
            .matches()
            .iter()
            .map(|r| (r.pos.x, r.pos.y))
            .collect();
        cells.sort();
        let mut expected: Vec<(i8, i8)> = (1..=3)
            .flat_map(|x| (1..=4).map(move |y| (x, y)))
            .collect();
        expected.sort();
        assert_eq!(cells, expected);
    }

    #[test]
    fn test_color_bomb_needs_to_be_matched() {
        let mut grid = striped();
        for x in 1..=3 {
            put(&mut grid, GemKind::Blue, x, 1);
        }
        let mut bomb = piece(500, GemKind::Red, 2, 2);
        bomb.is_bomb = true;
        grid.set(2, 2, Some(bomb));

        let mut matcher = Matcher::new();
        matcher.find_all_matches(&mut grid, &[]);
        assert!(!matcher.check_for_bombs(&mut grid));
    }

    #[test]
    fn test_ledger_bombs_do_not_go_off() {
        let mut grid = striped();
        for x in 1..=3 {
            put(&mut grid, GemKind::Blue, x, 1);
        }
        put(&mut grid, GemKind::NormalBomb, 2, 2);
        let bomb = grid.get(2, 2).unwrap().id;

        let mut matcher = Matcher::new();
        matcher.find_all_matches(&mut grid, &[]);
        matcher.register_bomb(bomb);
        assert!(!matcher.check_for_bombs(&mut grid));

        matcher.clear_new_bombs();
        assert!(matcher.check_for_bombs(&mut grid));
    }

    #[test]
    fn test_mark_bomb_area_clips_to_board() {
        let mut grid = striped();
        let mut matcher = Matcher::new();
        matcher.mark_bomb_area(&mut grid, Pos::new(0, 0), 1);
        assert_eq!(matcher.matches().len(), 4);

        matcher.clear();
        grid.clear_matched();
        matcher.mark_bomb_area(&mut grid, Pos::new(3, 3), 0);
        assert_eq!(matcher.matches().len(), 1);
    }

    #[test]
    fn test_mark_bomb_area_terminates_on_full_bomb_board() {
        let mut grid = Grid::new(7, 7);
        for x in 0..7 {
            for y in 0..7 {
                let mut p = piece((x * 7 + y) as u32 + 1, GemKind::NormalBomb, x, y);
                p.blast_radius = 2;
                grid.set(x, y, Some(p));
            }
        }
        let mut matcher = Matcher::new();
        matcher.mark_bomb_area(&mut grid, Pos::new(3, 3), 2);
        assert_eq!(matcher.matches().len(), 49);
        assert!(grid.pieces().all(|p| p.matched));
    }
}
