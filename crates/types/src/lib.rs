//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, making them usable
//! in any context (rules engine, terminal view, input mapping).
//!
//! # Board Dimensions
//!
//! The default playfield is 7x7. Coordinates are `(x, y)` with `x` growing to
//! the right and `y` growing upward: `y = 0` is the bottom row and gravity
//! pulls pieces toward smaller `y`.
//!
//! # Phase Timing Constants
//!
//! Timing values are in milliseconds. They pace the presentation only; the
//! rules produce the same result with every delay set to zero.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Host loop interval (~60 FPS) |
//! | `SWAP_CHECK_MS` | 500 | Swap animation before the match check |
//! | `REVERT_SETTLE_MS` | 500 | Settle time after a rejected swap is undone |
//! | `BOMB_CHAIN_MS` | 500 | Pause before a bomb chain is destroyed |
//! | `COMPACT_DELAY_MS` | 200 | Pause before columns collapse |
//! | `REFILL_DELAY_MS` | 50 | Pause before empty cells are refilled |
//! | `RESCAN_DELAY_MS` | 500 | Pause before the board is re-scanned |
//! | `DROP_STEP_MS` | 50 | Extra time per falling or spawned piece |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Direction, GemKind, Pos, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let kind = GemKind::from_char('R').unwrap();
//! assert_eq!(kind, GemKind::Red);
//! assert_eq!(kind.as_char(), 'R');
//!
//! let p = Pos::new(3, 3);
//! assert_eq!(p.step(Direction::Up), Pos::new(3, 4));
//! assert!(p.is_adjacent(Pos::new(2, 3)));
//!
//! assert_eq!(BOARD_WIDTH, 7);
//! assert_eq!(BOARD_HEIGHT, 7);
//! ```

/// Board width in cells (7 columns)
pub const BOARD_WIDTH: u8 = 7;

/// Board height in cells (7 rows)
pub const BOARD_HEIGHT: u8 = 7;

/// Largest supported board side (coordinates are stored as `i8`).
pub const MAX_BOARD_SIDE: u8 = 64;

/// Host loop interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Swap animation time before the swapped pieces are checked.
pub const SWAP_CHECK_MS: u32 = 500;

/// Settle time after a non-matching swap is undone.
pub const REVERT_SETTLE_MS: u32 = 500;

/// Pause between finding a bomb chain and destroying it.
pub const BOMB_CHAIN_MS: u32 = 500;

/// Pause between destruction and column compaction.
pub const COMPACT_DELAY_MS: u32 = 200;

/// Pause between compaction and refill.
pub const REFILL_DELAY_MS: u32 = 50;

/// Pause between refill and the follow-up match scan.
pub const RESCAN_DELAY_MS: u32 = 500;

/// Extra pacing per piece that fell or spawned.
pub const DROP_STEP_MS: u32 = 50;

/// Points credited per destroyed piece unless configured otherwise.
pub const DEFAULT_SCORE_VALUE: u32 = 10;

/// Bomb blast radius unless configured otherwise (3x3 blast).
pub const DEFAULT_BLAST_RADIUS: u8 = 1;

/// Chance, in percent, that a spawn becomes a normal bomb.
pub const DEFAULT_BOMB_CHANCE: f32 = 2.0;

/// Minimum match group size for a swapped piece to become a bomb.
pub const PROMOTION_GROUP_SIZE: usize = 4;

/// Re-draw limit when avoiding pre-made lines during initial population.
pub const SETUP_REROLL_LIMIT: u32 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(SWAP_CHECK_MS, 500);
        assert_eq!(REVERT_SETTLE_MS, 500);
        assert_eq!(BOMB_CHAIN_MS, 500);
        assert_eq!(COMPACT_DELAY_MS, 200);
        assert_eq!(REFILL_DELAY_MS, 50);
        assert_eq!(RESCAN_DELAY_MS, 500);
        assert_eq!(DROP_STEP_MS, 50);
    }

    #[test]
    fn gem_kind_char_codes_round_trip() {
        for kind in GemKind::ALL {
            assert_eq!(GemKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(GemKind::from_char('r'), None);
        assert_eq!(GemKind::from_char('?'), None);
    }

    #[test]
    fn pos_neighbors_are_left_right_down_up() {
        let p = Pos::new(2, 2);
        assert_eq!(
            p.neighbors(),
            [Pos::new(1, 2), Pos::new(3, 2), Pos::new(2, 1), Pos::new(2, 3)]
        );
    }

    #[test]
    fn adjacency_is_orthogonal_only() {
        let p = Pos::new(2, 2);
        assert!(p.is_adjacent(Pos::new(2, 3)));
        assert!(!p.is_adjacent(Pos::new(3, 3)));
        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Pos::new(4, 2)));
    }
}

/// Gem kinds
///
/// Five colors plus the reserved normal bomb kind:
/// - **Blue**, **Green**, **Red**, **Yellow**, **Purple**: ordinary gems. A
///   color bomb keeps one of these kinds and still line-matches with it.
/// - **NormalBomb**: the plain bomb, not tied to a color. It only line-matches
///   with other normal bombs and can be set off by an adjacent match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GemKind {
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    NormalBomb,
}

impl GemKind {
    /// Number of kinds, including the normal bomb.
    pub const COUNT: usize = 6;

    /// Every kind, in index order.
    pub const ALL: [GemKind; Self::COUNT] = [
        GemKind::Blue,
        GemKind::Green,
        GemKind::Red,
        GemKind::Yellow,
        GemKind::Purple,
        GemKind::NormalBomb,
    ];

    /// The ordinary (color) kinds.
    pub const COLORS: [GemKind; 5] = [
        GemKind::Blue,
        GemKind::Green,
        GemKind::Red,
        GemKind::Yellow,
        GemKind::Purple,
    ];

    /// Stable index, usable for per-kind tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_color(self) -> bool {
        self != GemKind::NormalBomb
    }

    /// Parse a layout code (`B G R Y P *`).
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_types::GemKind;
    ///
    /// assert_eq!(GemKind::from_char('B'), Some(GemKind::Blue));
    /// assert_eq!(GemKind::from_char('*'), Some(GemKind::NormalBomb));
    /// assert_eq!(GemKind::from_char('x'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'B' => Some(GemKind::Blue),
            'G' => Some(GemKind::Green),
            'R' => Some(GemKind::Red),
            'Y' => Some(GemKind::Yellow),
            'P' => Some(GemKind::Purple),
            '*' => Some(GemKind::NormalBomb),
            _ => None,
        }
    }

    /// Layout code for this kind.
    pub fn as_char(self) -> char {
        match self {
            GemKind::Blue => 'B',
            GemKind::Green => 'G',
            GemKind::Red => 'R',
            GemKind::Yellow => 'Y',
            GemKind::Purple => 'P',
            GemKind::NormalBomb => '*',
        }
    }

    /// Lowercase name, for logs and status lines.
    pub fn as_str(self) -> &'static str {
        match self {
            GemKind::Blue => "blue",
            GemKind::Green => "green",
            GemKind::Red => "red",
            GemKind::Yellow => "yellow",
            GemKind::Purple => "purple",
            GemKind::NormalBomb => "bomb",
        }
    }
}

/// A cell coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pos {
    pub x: i8,
    pub y: i8,
}

impl Pos {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    /// The four orthogonal neighbors: left, right, down, up.
    pub fn neighbors(self) -> [Pos; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }

    /// True when `other` shares an edge with `self`.
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dx = (self.x as i16 - other.x as i16).abs();
        let dy = (self.y as i16 - other.y as i16).abs();
        dx + dy == 1
    }
}

/// Swap / cursor directions. `Up` is toward larger `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }
}

/// Turn state: whether the board accepts a swap.
///
/// - **Move**: idle, one swap may be submitted
/// - **Wait**: a swap is being checked or a cascade is resolving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TurnState {
    #[default]
    Move,
    Wait,
}

/// Board actions produced by the input layer
///
/// Cursor movement doubles as the swap direction while a gem is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    /// Move the cursor (or swap the selected gem) in a direction
    Move(Direction),
    /// Select the gem under the cursor, or drop the selection
    Select,
    /// Drop the current selection
    Cancel,
    /// Start a new game
    Restart,
}
