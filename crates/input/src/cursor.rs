//! Board cursor and selection.
//!
//! Direction keys move the cursor. Once a gem is selected, the next direction
//! key asks to swap it with its neighbor in that direction instead, and the
//! cursor follows the selected gem.

use crate::types::{BoardAction, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: Pos,
    selected: Option<Pos>,
    width: u8,
    height: u8,
}

impl Cursor {
    /// Cursor for a `width x height` board, starting in the middle.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            pos: Pos::new((width / 2) as i8, (height / 2) as i8),
            selected: None,
            width,
            height,
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    fn is_inside(&self, p: Pos) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as u8) < self.width && (p.y as u8) < self.height
    }

    /// Apply an action. Returns the swap to submit, if the action makes one.
    pub fn apply(&mut self, action: BoardAction) -> Option<(Pos, Pos)> {
        match action {
            BoardAction::Move(dir) => {
                let target = self.pos.step(dir);
                if !self.is_inside(target) {
                    return None;
                }
                self.pos = target;
                self.selected.take().map(|from| (from, target))
            }
            BoardAction::Select => {
                self.selected = match self.selected {
                    Some(_) => None,
                    None => Some(self.pos),
                };
                None
            }
            BoardAction::Cancel | BoardAction::Restart => {
                self.selected = None;
                None
            }
        }
    }
}
