//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! Pure (no I/O), so it can be unit-tested. The board is drawn with the top
//! row (largest `y`) first, each cell `cell_w` columns wide.

use crate::core::{CellSnapshot, GameSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GemKind, Pos, TurnState};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Cursor and selection to highlight on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorView {
    pub pos: Pos,
    pub selected: Option<Pos>,
}

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell keeps the board roughly square.
        Self { cell_w: 2 }
    }
}

/// Screen placement of the board frame.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        cursor: Option<&CursorView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let w = snap.width as u16 * self.cell_w + 2;
        let h = snap.height as u16 + 2;
        let frame = Frame {
            x: viewport.width.saturating_sub(w + 16) / 2,
            y: viewport.height.saturating_sub(h) / 2,
            w,
            h,
        };

        let board_bg = CellStyle::new(BOARD_BG, BOARD_BG);
        fb.fill_rect(frame.x + 1, frame.y + 1, w - 2, h - 2, ' ', board_bg);
        draw_border(fb, frame, CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK));

        for y in 0..snap.height as i8 {
            for x in 0..snap.width as i8 {
                self.draw_cell(fb, frame, snap, Pos::new(x, y), cursor);
            }
        }

        draw_side_panel(fb, snap, viewport, frame);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        cursor: Option<&CursorView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    /// Screen column and row of the top-left corner of board cell `pos`.
    fn cell_origin(&self, frame: Frame, snap: &GameSnapshot, pos: Pos) -> (u16, u16) {
        let row = (snap.height as i16 - 1 - pos.y as i16) as u16;
        (frame.x + 1 + pos.x as u16 * self.cell_w, frame.y + 1 + row)
    }

    fn draw_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        snap: &GameSnapshot,
        pos: Pos,
        cursor: Option<&CursorView>,
    ) {
        let mut bg = BOARD_BG;
        if let Some(c) = cursor {
            if c.selected == Some(pos) {
                bg = BOARD_BG.lighten();
            } else if c.pos == pos {
                bg = Rgb::new(70, 70, 90);
            }
        }

        let (px, py) = self.cell_origin(frame, snap, pos);
        fb.fill_rect(px, py, self.cell_w, 1, ' ', CellStyle::new(BOARD_BG, bg));

        match snap.cell(pos.x, pos.y) {
            Some(cell) => {
                let mut style = CellStyle::new(kind_color(cell.kind), bg).bold();
                if cell.matched {
                    style = style.dim();
                }
                fb.put_char(px, py, glyph(&cell), style);
            }
            None => {
                let style = CellStyle::new(Rgb::new(90, 90, 100), bg).dim();
                fb.put_char(px, py, '·', style);
            }
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, f: Frame, style: CellStyle) {
    if f.w < 2 || f.h < 2 {
        return;
    }
    let (right, bottom) = (f.x + f.w - 1, f.y + f.h - 1);
    fb.put_char(f.x, f.y, '┌', style);
    fb.put_char(right, f.y, '┐', style);
    fb.put_char(f.x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);
    for x in f.x + 1..right {
        fb.put_char(x, f.y, '─', style);
        fb.put_char(x, bottom, '─', style);
    }
    for y in f.y + 1..bottom {
        fb.put_char(f.x, y, '│', style);
        fb.put_char(right, y, '│', style);
    }
}

fn draw_side_panel(fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport, frame: Frame) {
    let x = frame.x.saturating_add(frame.w).saturating_add(2);
    if x >= viewport.width || viewport.width - x < 10 {
        return;
    }

    let label = CellStyle::default().bold();
    let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);
    let hint = value.dim();

    let mut y = frame.y;
    fb.put_str(x, y, "SCORE", label);
    fb.put_u32(x, y + 1, snap.score, value);
    y += 3;

    fb.put_str(x, y, "STATE", label);
    let state = match snap.state {
        TurnState::Move => "MOVE",
        TurnState::Wait => "WAIT",
    };
    fb.put_str(x, y + 1, state, value);
    if snap.cascade_round > 0 {
        let end = fb.put_str(x + 5, y + 1, "x", hint);
        fb.put_u32(end, y + 1, snap.cascade_round, hint);
    }
    y += 3;

    for line in ["arrows move", "space select", "r restart", "q quit"] {
        fb.put_str(x, y, line, hint);
        y += 1;
    }
}

/// Board glyph for a cell.
pub fn glyph(cell: &CellSnapshot) -> char {
    match (cell.is_bomb, cell.kind) {
        (true, GemKind::NormalBomb) => '✱',
        (true, _) => '◆',
        (false, _) => '●',
    }
}

pub fn kind_color(kind: GemKind) -> Rgb {
    match kind {
        GemKind::Blue => Rgb::new(80, 120, 240),
        GemKind::Green => Rgb::new(100, 220, 120),
        GemKind::Red => Rgb::new(230, 80, 80),
        GemKind::Yellow => Rgb::new(240, 220, 80),
        GemKind::Purple => Rgb::new(200, 120, 220),
        GemKind::NormalBomb => Rgb::WHITE,
    }
}
