//! Cascade steps - destruction, bomb promotion, compaction and refill
//!
//! Each step is one call on [`Board`]; [`crate::game::Game`] decides the order
//! and the pauses between them. A full step runs:
//!
//! 1. [`Board::destroy_matches`] without bombs, then [`Board::promote_triggers`]
//! 2. [`Board::check_for_bombs`], and if anything went off,
//!    [`Board::destroy_matches`] with bombs
//! 3. [`Board::clear_new_bombs`]
//! 4. [`Board::compact_columns`]
//! 5. [`Board::refill`]
//! 6. a new detection pass, repeating from 1 while it finds matches

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::piece::{Piece, PieceRef};
use crate::port::Presentation;
use crate::types::{GemKind, Pos};

impl Board {
    /// Destroy every piece in the match set that is still on the board.
    ///
    /// Bombs are left in place unless `destroy_bombs` is set. Each destroyed
    /// piece is scored and despawned once. Returns the number destroyed.
    pub fn destroy_matches(&mut self, destroy_bombs: bool, port: &mut impl Presentation) -> u32 {
        let targets: Vec<PieceRef> = self.matcher.matches().to_vec();
        let mut destroyed = 0;
        for r in targets {
            let Some(piece) = self.grid.resolve(r).copied() else {
                continue;
            };
            if piece.is_bomb && !destroy_bombs {
                continue;
            }
            self.grid.take(r.pos.x, r.pos.y);
            self.credit(&piece, port);
            port.despawn_piece(&piece);
            destroyed += 1;
        }
        destroyed
    }

    /// Turn swap triggers that ended up in a large enough group into bombs.
    ///
    /// `triggers` are the swapped pieces as they were when the match check
    /// ran. A promoted trigger leaves the match set and a bomb of its kind
    /// appears at its position, registered as new for this step. If that cell
    /// is still occupied, the occupant is scored and despawned first.
    /// Returns the number of bombs created.
    pub fn promote_triggers(&mut self, triggers: &[Piece], port: &mut impl Presentation) -> u32 {
        let mut created = 0;
        for trigger in triggers {
            if self.matcher.promotion_group(trigger.id).is_none() {
                continue;
            }
            self.matcher.remove_match(trigger.id);

            let pos = trigger.pos;
            if let Some(occupant) = self.grid.take(pos.x, pos.y) {
                self.credit(&occupant, port);
                port.despawn_piece(&occupant);
            }

            let bomb = self.spawner.bomb(trigger.kind, pos, &self.config);
            self.grid.set(pos.x, pos.y, Some(bomb));
            self.matcher.register_bomb(bomb.id);
            port.spawn_piece(&bomb, 0);
            created += 1;
        }
        created
    }

    /// Let bombs promoted in this step go off in later steps.
    pub fn clear_new_bombs(&mut self) {
        self.matcher.clear_new_bombs();
    }

    /// Let pieces fall into the empty cells below them.
    ///
    /// Columns keep their order; afterwards no piece has an empty cell
    /// directly below it. Returns the number of pieces moved.
    pub fn compact_columns(&mut self, port: &mut impl Presentation) -> u32 {
        let mut moved = 0;
        for x in 0..self.grid.width() as i8 {
            let mut empty = 0i8;
            for y in 0..self.grid.height() as i8 {
                if self.grid.is_empty_at(x, y) {
                    empty += 1;
                    continue;
                }
                if empty == 0 {
                    continue;
                }
                let Some(mut piece) = self.grid.take(x, y) else {
                    continue;
                };
                let from = piece.pos;
                piece.pos = Pos::new(x, y - empty);
                self.grid.set(x, y - empty, Some(piece));
                port.on_piece_moved(piece.id, from, piece.pos);
                moved += 1;
            }
        }
        moved
    }

    /// Fill every empty cell with a new piece.
    ///
    /// Columns left to right, each bottom to top. The kind is drawn from the
    /// configured kinds minus those of the right, left and bottom neighbors;
    /// when that leaves nothing, from all configured kinds. Every spawn rolls
    /// the bomb chance. Returns the number of pieces spawned.
    pub fn refill(&mut self, port: &mut impl Presentation) -> u32 {
        let mut spawned = 0;
        for x in 0..self.grid.width() as i8 {
            let mut index = 0;
            for y in 0..self.grid.height() as i8 {
                if !self.grid.is_empty_at(x, y) {
                    continue;
                }
                let excluded: ArrayVec<GemKind, 3> = [(x + 1, y), (x - 1, y), (x, y - 1)]
                    .into_iter()
                    .filter_map(|(nx, ny)| self.grid.get(nx, ny).map(|p| p.kind))
                    .collect();
                let Some(kind) = self.spawner.draw_kind(&self.config.kinds, &excluded) else {
                    continue;
                };

                let pos = Pos::new(x, y);
                let piece = self.spawner.spawn(kind, pos, &self.config);
                self.grid.set(x, y, Some(piece));
                port.spawn_piece(&piece, index + self.config.drop_height);
                index += 1;
                spawned += 1;
            }
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::striped;
    use crate::config::GameConfig;
    use crate::port::{BoardEvent, EventLog};

    fn quiet() -> GameConfig {
        GameConfig::default().with_bomb_chance(0.0)
    }

    #[test]
    fn test_three_match_destroys_without_promotion() {
        let mut board = striped(quiet());
        for x in 2..=4 {
            board.place(GemKind::Yellow, Pos::new(x, 3));
        }
        let trigger = *board.grid().get(3, 3).unwrap();
        board.find_all_matches(&[]);

        let mut log = EventLog::new();
        assert_eq!(board.destroy_matches(false, &mut log), 3);
        assert_eq!(board.promote_triggers(&[trigger], &mut log), 0);
        assert_eq!(board.score(), 30);
        assert_eq!(board.grid().occupied(), 46);
        assert_eq!(log.despawned().count(), 3);
    }

    #[test]
    fn test_five_match_promotes_trigger() {
        let mut board = striped(quiet());
        for x in 1..=5 {
            board.place(GemKind::Blue, Pos::new(x, 3));
        }
        let trigger = *board.grid().get(3, 3).unwrap();
        let other = *board.grid().get(3, 4).unwrap();
        board.find_all_matches(&[trigger.to_ref(), other.to_ref()]);
        assert_eq!(board.matcher().groups().len(), 1);
        assert_eq!(board.matcher().groups()[0].len(), 5);

        let mut log = EventLog::new();
        assert_eq!(board.destroy_matches(false, &mut log), 5);
        assert_eq!(board.score(), 50);
        assert_eq!(board.promote_triggers(&[trigger, other], &mut log), 1);

        let bomb = *board.grid().get(3, 3).unwrap();
        assert!(bomb.is_bomb);
        assert_eq!(bomb.kind, GemKind::Blue);
        assert_eq!(board.matcher().new_bombs(), &[bomb.id]);
        assert!(board.matcher().matches().iter().all(|r| r.id != trigger.id));
        assert_eq!(board.matcher().matches().len(), 4);

        // The new bomb sits on its own trigger position but cannot go off yet.
        assert!(!board.check_for_bombs());
        assert_eq!(board.score(), 50);
    }

    #[test]
    fn test_destruction_skips_bombs_unless_authorized() {
        let mut board = Board::from_layout(quiet(), &["...", "***", "..."]).unwrap();
        board.find_all_matches(&[]);
        assert_eq!(board.matcher().matches().len(), 3);

        assert_eq!(board.destroy_matches(false, &mut ()), 0);
        assert_eq!(board.destroy_matches(true, &mut ()), 3);
        assert_eq!(board.grid().occupied(), 0);
        assert_eq!(board.score(), 30);
    }

    #[test]
    fn test_destruction_scores_each_piece_once() {
        let mut board = striped(quiet());
        for x in 1..=3 {
            board.place(GemKind::Blue, Pos::new(x, 1));
        }
        board.place(GemKind::NormalBomb, Pos::new(2, 2));
        board.place(GemKind::NormalBomb, Pos::new(2, 3));
        board.find_all_matches(&[]);

        let mut log = EventLog::new();
        assert_eq!(board.destroy_matches(false, &mut log), 3);
        assert!(board.check_for_bombs());
        assert_eq!(board.destroy_matches(true, &mut log), 9);
        assert_eq!(board.destroy_matches(true, &mut log), 0);

        let despawned: u32 = log.despawned().map(|p| p.score_value).sum();
        assert_eq!(log.despawned().count(), 12);
        assert_eq!(board.score(), despawned);
        assert_eq!(log.last_score(), Some(120));
    }

    #[test]
    fn test_compaction_closes_gaps() {
        let mut board = Board::from_layout(quiet(), &["RB.", "..G", "Y.P", ".RB"]).unwrap();
        let top_red = board.grid().get(0, 3).unwrap().id;

        let mut log = EventLog::new();
        let moved = board.compact_columns(&mut log);
        assert_eq!(moved, 3);

        let grid = board.grid();
        assert_eq!(grid.get(0, 0).unwrap().kind, GemKind::Yellow);
        assert_eq!(grid.get(0, 1).map(|p| p.id), Some(top_red));
        assert!(grid.get(0, 2).is_none());
        assert_eq!(grid.get(1, 1).unwrap().kind, GemKind::Blue);
        assert_eq!(grid.get(2, 2).unwrap().kind, GemKind::Green);

        for x in 0..grid.width() as i8 {
            for y in 1..grid.height() as i8 {
                if grid.get(x, y).is_some() {
                    assert!(grid.get(x, y - 1).is_some(), "gap below ({x}, {y})");
                }
            }
        }
        for piece in grid.pieces() {
            assert_eq!(grid.at(piece.pos).map(|p| p.id), Some(piece.id));
        }
        assert!(log
            .events()
            .iter()
            .all(|e| matches!(e, BoardEvent::Moved { .. })));
    }

    #[test]
    fn test_refill_avoids_neighbor_kinds() {
        let config = quiet().with_kinds(&[
            GemKind::Red,
            GemKind::Green,
            GemKind::Blue,
            GemKind::Yellow,
        ]);
        for seed in 1..30 {
            let config = config.clone().with_seed(seed);
            let mut board = Board::from_layout(config, &["...", "R.G", "YBY"]).unwrap();
            let mut log = EventLog::new();
            board.refill(&mut log);

            assert!(board.grid().is_full());
            assert_eq!(board.grid().get(1, 1).unwrap().kind, GemKind::Yellow);
        }
    }

    #[test]
    fn test_refill_falls_back_when_every_kind_is_excluded() {
        let config = quiet().with_kinds(&[GemKind::Red, GemKind::Green, GemKind::Blue]);
        let mut board = Board::from_layout(config, &["R.G", "BBB"]).unwrap();
        assert_eq!(board.refill(&mut ()), 1);
        assert!(board.grid().is_full());
    }

    #[test]
    fn test_refill_drop_heights_count_per_column() {
        let mut board = Board::from_layout(quiet(), &["...", "...", "B.G"]).unwrap();
        let mut log = EventLog::new();
        assert_eq!(board.refill(&mut log), 7);

        let mut heights: Vec<(i8, i8, i32)> = log
            .events()
            .iter()
            .filter_map(|e| match e {
                BoardEvent::Spawned { piece, drop_height } => {
                    Some((piece.pos.x, piece.pos.y, *drop_height))
                }
                _ => None,
            })
            .collect();
        heights.sort();
        assert_eq!(
            heights,
            vec![
                (0, 1, 0),
                (0, 2, 1),
                (1, 0, 0),
                (1, 1, 1),
                (1, 2, 2),
                (2, 1, 0),
                (2, 2, 1)
            ]
        );
    }
}
