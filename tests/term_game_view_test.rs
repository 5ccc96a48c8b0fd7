use match3::core::{Board, Game, GameConfig, GameSnapshot};
use match3::term::{CursorView, GameView, Viewport};
use match3::types::{Pos, TurnState};

/// 5x5 board, exactly framed by a 12x7 viewport (no side panel).
fn snapshot() -> GameSnapshot {
    let board = Board::from_layout(
        GameConfig::default(),
        &["*....", ".....", ".....", ".....", "B...y"],
    )
    .unwrap();
    Game::with_board(board, ()).snapshot()
}

#[test]
fn term_view_renders_border_corners() {
    let fb = GameView::default().render(&snapshot(), None, Viewport::new(12, 7));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(11, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 6).unwrap().ch, '└');
    assert_eq!(fb.get(11, 6).unwrap().ch, '┘');
}

#[test]
fn term_view_draws_top_row_first() {
    let fb = GameView::default().render(&snapshot(), None, Viewport::new(12, 7));

    // Inside border: (1,1) origin, each cell two columns wide.
    assert_eq!(fb.get(1, 1).unwrap().ch, '✱');
    assert_eq!(fb.get(1, 5).unwrap().ch, '●');
    assert_eq!(fb.get(9, 5).unwrap().ch, '◆');
    assert_eq!(fb.get(3, 5).unwrap().ch, '·');

    let empty = fb.cells().iter().filter(|c| c.ch == '·').count();
    assert_eq!(empty, 22);
}

#[test]
fn term_view_highlights_cursor_and_selection() {
    let view = GameView::default();
    let vp = Viewport::new(12, 7);
    let plain = view.render(&snapshot(), None, vp);

    let cursor = CursorView {
        pos: Pos::new(1, 0),
        selected: Some(Pos::new(0, 0)),
    };
    let fb = view.render(&snapshot(), Some(&cursor), vp);

    let bg = |fb: &match3::term::FrameBuffer, x, y| fb.get(x, y).unwrap().style.bg;
    assert_ne!(bg(&fb, 3, 5), bg(&plain, 3, 5));
    assert_ne!(bg(&fb, 1, 5), bg(&plain, 1, 5));
    assert_ne!(bg(&fb, 1, 5), bg(&fb, 3, 5));
    assert_eq!(bg(&fb, 5, 5), bg(&plain, 5, 5));
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut snap = snapshot();
    snap.score = 1234;
    snap.state = TurnState::Wait;
    snap.cascade_round = 2;

    let fb = GameView::default().render(&snap, None, Viewport::new(40, 12));
    let rows: Vec<String> = (0..fb.height()).map(|y| fb.row_text(y)).collect();

    let score_row = rows.iter().position(|r| r.contains("SCORE")).unwrap();
    assert!(rows[score_row + 1].contains("1234"));

    let state_row = rows.iter().position(|r| r.contains("STATE")).unwrap();
    assert!(rows[state_row + 1].contains("WAIT"));
    assert!(rows[state_row + 1].contains("x2"));
}

#[test]
fn term_view_render_into_reuses_buffer() {
    let view = GameView::default();
    let snap = snapshot();
    let mut fb = view.render(&snap, None, Viewport::new(30, 10));
    view.render_into(&snap, None, Viewport::new(12, 7), &mut fb);

    assert_eq!((fb.width(), fb.height()), (12, 7));
    assert_eq!(fb, view.render(&snap, None, Viewport::new(12, 7)));
}
