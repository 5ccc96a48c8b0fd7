use crate::types::{GemKind, TurnState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSnapshot {
    pub kind: GemKind,
    pub is_bomb: bool,
    pub matched: bool,
}

impl CellSnapshot {
    /// Layout code for the cell: the kind letter, lowercase for color bombs.
    pub fn code(&self) -> char {
        let c = self.kind.as_char();
        if self.is_bomb && self.kind.is_color() {
            c.to_ascii_lowercase()
        } else {
            c
        }
    }
}

/// Plain copy of what a presentation needs to draw one frame.
///
/// Cells are stored row-major with `y = 0` (the bottom row) first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<Option<CellSnapshot>>,
    pub score: u32,
    pub state: TurnState,
    /// Cascade round of the turn in progress, 0 when idle.
    pub cascade_round: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.cells.clear();
        self.score = 0;
        self.state = TurnState::Move;
        self.cascade_round = 0;
    }

    pub fn cell(&self, x: i8, y: i8) -> Option<CellSnapshot> {
        if x < 0 || y < 0 || x as u8 >= self.width || y as u8 >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    pub fn playable(&self) -> bool {
        self.state == TurnState::Move
    }

    /// Rows of layout codes, top row first, `.` for empty cells.
    pub fn rows(&self) -> Vec<String> {
        (0..self.height as i8)
            .rev()
            .map(|y| {
                (0..self.width as i8)
                    .map(|x| self.cell(x, y).map_or('.', |c| c.code()))
                    .collect()
            })
            .collect()
    }
}
