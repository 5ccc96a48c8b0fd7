//! Terminal input module.
//!
//! Independent of any UI framework: maps `crossterm` key events into
//! [`crate::types::BoardAction`] and tracks the board cursor, turning a
//! selection plus a direction into a swap request.

pub mod cursor;
pub mod map;

pub use match3_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, should_quit};
