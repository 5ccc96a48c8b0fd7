//! Board - the grid together with the state the rules keep about it
//!
//! A [`Board`] bundles the grid, the matcher, the spawner (RNG and ids), the
//! score and the configuration. Operations that produce visible changes take
//! a [`Presentation`] and report through it; the board itself never talks to
//! the outside world.
//!
//! The cascade steps live in [`crate::cascade`] as further `impl Board` blocks.

use thiserror::Error;

use crate::config::GameConfig;
use crate::grid::Grid;
use crate::matcher::Matcher;
use crate::piece::{Piece, PieceId, PieceRef};
use crate::port::Presentation;
use crate::score::Score;
use crate::spawner::Spawner;
use crate::types::{GemKind, Pos, MAX_BOARD_SIDE, SETUP_REROLL_LIMIT};

/// Why a scenario layout could not be turned into a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has no cells")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell code {code:?} at row {row}, column {col}")]
    UnknownCode { row: usize, col: usize, code: char },
    #[error("layout is {width}x{height}, the largest board side is {max}")]
    TooLarge {
        width: usize,
        height: usize,
        max: u8,
    },
}

#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) grid: Grid,
    pub(crate) matcher: Matcher,
    pub(crate) spawner: Spawner,
    pub(crate) score: Score,
    pub(crate) config: GameConfig,
}

impl Board {
    /// Create an empty board sized by `config`.
    pub fn new(config: GameConfig) -> Self {
        Self {
            grid: Grid::new(config.width, config.height),
            matcher: Matcher::new(),
            spawner: Spawner::new(config.seed),
            score: Score::new(),
            config,
        }
    }

    /// Build a board from rows of cell codes, top row first.
    ///
    /// `B G R Y P` are ordinary gems, the same letters in lowercase are color
    /// bombs of that kind, `*` is a normal bomb and `.` an empty cell. The
    /// layout sets the board size; everything else comes from `config`. No
    /// presentation calls are made.
    ///
    /// ```
    /// use match3_core::{Board, GameConfig};
    ///
    /// let board = Board::from_layout(GameConfig::default(), &["RG.", "b*Y"]).unwrap();
    /// assert_eq!(board.grid().width(), 3);
    /// assert!(board.grid().get(0, 0).unwrap().is_bomb);
    /// assert!(board.grid().get(2, 1).is_none());
    /// ```
    pub fn from_layout(mut config: GameConfig, rows: &[&str]) -> Result<Self, LayoutError> {
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let height = rows.len();
        if width == 0 {
            return Err(LayoutError::Empty);
        }
        let max = MAX_BOARD_SIDE as usize;
        if width > max || height > max {
            return Err(LayoutError::TooLarge {
                width,
                height,
                max: MAX_BOARD_SIDE,
            });
        }

        config.width = width as u8;
        config.height = height as u8;
        let mut board = Board::new(config);

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LayoutError::Ragged {
                    row,
                    expected: width,
                    found,
                });
            }
            let y = (height - 1 - row) as i8;
            for (col, code) in line.chars().enumerate() {
                let pos = Pos::new(col as i8, y);
                if code == '.' {
                    continue;
                }
                let unknown = LayoutError::UnknownCode { row, col, code };
                if code.is_ascii_lowercase() {
                    let kind = GemKind::from_char(code.to_ascii_uppercase())
                        .filter(|k| k.is_color())
                        .ok_or(unknown)?;
                    board.place_bomb(kind, pos);
                } else {
                    let kind = GemKind::from_char(code).ok_or(unknown)?;
                    board.place(kind, pos);
                }
            }
        }
        Ok(board)
    }

    /// Put a fresh piece of `kind` at `pos`, replacing whatever was there.
    /// Scenario setup only: no bomb roll, no presentation call.
    pub fn place(&mut self, kind: GemKind, pos: Pos) -> Option<PieceId> {
        let piece = self.spawner.gem(kind, pos, &self.config);
        self.grid.set(pos.x, pos.y, Some(piece)).then_some(piece.id)
    }

    /// Like [`Board::place`], but the piece is a bomb of `kind`.
    pub fn place_bomb(&mut self, kind: GemKind, pos: Pos) -> Option<PieceId> {
        let piece = self.spawner.bomb(kind, pos, &self.config);
        self.grid.set(pos.x, pos.y, Some(piece)).then_some(piece.id)
    }

    /// Fill every empty cell for a new game.
    ///
    /// Cells are visited column by column, bottom to top. A kind that would
    /// complete a line with the two cells to the left or the two cells below
    /// is redrawn, up to a fixed number of times. Each spawn rolls the bomb
    /// chance. Returns the number of pieces spawned.
    pub fn populate(&mut self, port: &mut impl Presentation) -> u32 {
        let mut spawned = 0;
        for x in 0..self.grid.width() as i8 {
            for y in 0..self.grid.height() as i8 {
                if !self.grid.is_empty_at(x, y) {
                    continue;
                }
                let pos = Pos::new(x, y);
                let Some(mut kind) = self.spawner.draw_any(&self.config.kinds) else {
                    continue;
                };
                let mut rerolls = 0;
                while self.matches_at(pos, kind) && rerolls < SETUP_REROLL_LIMIT {
                    if let Some(k) = self.spawner.draw_any(&self.config.kinds) {
                        kind = k;
                    }
                    rerolls += 1;
                }
                let piece = self.spawner.spawn(kind, pos, &self.config);
                self.grid.set(x, y, Some(piece));
                port.spawn_piece(&piece, y as i32 + self.config.drop_height);
                spawned += 1;
            }
        }
        spawned
    }

    /// True if `kind` at `pos` would complete a line with the two cells to
    /// its left or the two cells below it.
    pub fn matches_at(&self, pos: Pos, kind: GemKind) -> bool {
        let same = |dx: i8, dy: i8| {
            self.grid
                .get(pos.x + dx, pos.y + dy)
                .is_some_and(|p| p.kind == kind)
        };
        (same(-1, 0) && same(-2, 0)) || (same(0, -1) && same(0, -2))
    }

    /// Exchange the pieces at `a` and `b`, keeping their positions in sync.
    ///
    /// Both cells must be occupied; no adjacency or state check is made
    /// here. Returns false and leaves the grid untouched otherwise.
    pub fn swap(&mut self, a: Pos, b: Pos, port: &mut impl Presentation) -> bool {
        if a == b || self.grid.at(a).is_none() || self.grid.at(b).is_none() {
            return false;
        }
        let (Some(mut first), Some(mut second)) =
            (self.grid.take(a.x, a.y), self.grid.take(b.x, b.y))
        else {
            return false;
        };
        first.pos = b;
        second.pos = a;
        self.grid.set(b.x, b.y, Some(first));
        self.grid.set(a.x, a.y, Some(second));
        port.on_piece_moved(first.id, a, b);
        port.on_piece_moved(second.id, b, a);
        true
    }

    pub fn find_all_matches(&mut self, triggers: &[PieceRef]) {
        self.matcher.find_all_matches(&mut self.grid, triggers);
    }

    pub fn check_for_bombs(&mut self) -> bool {
        self.matcher.check_for_bombs(&mut self.grid)
    }

    pub fn mark_bomb_area(&mut self, center: Pos, radius: u8) {
        self.matcher.mark_bomb_area(&mut self.grid, center, radius);
    }

    /// True if `r` is still on the board and flagged by the last pass.
    pub fn is_matched(&self, r: PieceRef) -> bool {
        self.grid.resolve(r).is_some_and(|p| p.matched)
    }

    /// Remove every piece and reset the score, reporting both.
    pub fn clear(&mut self, port: &mut impl Presentation) {
        for piece in self.grid.drain() {
            port.despawn_piece(&piece);
        }
        self.matcher.clear();
        self.score.reset();
        port.on_score_changed(0);
    }

    pub(crate) fn credit(&mut self, piece: &Piece, port: &mut impl Presentation) {
        let total = self.score.add(piece);
        port.on_score_changed(total);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn score(&self) -> u32 {
        self.score.total()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

/// 7x7 board where no two neighbors in a row or column share a kind.
#[cfg(test)]
pub(crate) fn striped(config: GameConfig) -> Board {
    const STRIPES: [GemKind; 5] = [
        GemKind::Blue,
        GemKind::Green,
        GemKind::Red,
        GemKind::Yellow,
        GemKind::Purple,
    ];
    let mut board = Board::new(config.with_size(7, 7));
    for x in 0..7i8 {
        for y in 0..7i8 {
            board.place(STRIPES[(x + 2 * y) as usize % 5], Pos::new(x, y));
        }
    }
    board
}
