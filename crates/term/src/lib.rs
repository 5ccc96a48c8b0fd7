//! Terminal board renderer.
//!
//! A small game-oriented rendering layer: the board view draws into a plain
//! framebuffer, and the renderer flushes only what changed to the terminal.
//!
//! - Keep `core` deterministic and testable
//! - Keep drawing pure so views can be checked cell by cell
//! - Two terminal columns per board cell for a roughly square board

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use match3_core as core;
pub use match3_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{CursorView, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, ChangedRuns, Run, TerminalRenderer};
