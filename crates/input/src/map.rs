//! Key mapping from terminal events to board actions.

use crate::types::{BoardAction, Direction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to board actions.
pub fn handle_key_event(key: KeyEvent) -> Option<BoardAction> {
    match key.code {
        // Cursor / swap direction
        KeyCode::Left
        | KeyCode::Char('h')
        | KeyCode::Char('H')
        | KeyCode::Char('a')
        | KeyCode::Char('A') => Some(BoardAction::Move(Direction::Left)),
        KeyCode::Right
        | KeyCode::Char('l')
        | KeyCode::Char('L')
        | KeyCode::Char('d')
        | KeyCode::Char('D') => Some(BoardAction::Move(Direction::Right)),
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(BoardAction::Move(Direction::Up)),
        KeyCode::Down
        | KeyCode::Char('j')
        | KeyCode::Char('J')
        | KeyCode::Char('s')
        | KeyCode::Char('S') => Some(BoardAction::Move(Direction::Down)),

        // Selection
        KeyCode::Char(' ') | KeyCode::Enter => Some(BoardAction::Select),
        KeyCode::Esc | KeyCode::Backspace => Some(BoardAction::Cancel),

        // Restart
        KeyCode::Char('r') | KeyCode::Char('R') => Some(BoardAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
