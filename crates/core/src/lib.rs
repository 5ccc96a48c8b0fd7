//! Core rules module - pure, deterministic, and testable
//!
//! This crate holds the match-3 rules: the grid, match detection, bomb chains,
//! the cascade that destroys, compacts and refills, the turn state machine and
//! the score. It has no dependency on a terminal, a clock or any I/O; the
//! outside world is reached only through the [`Presentation`] trait.
//!
//! - **Deterministic**: the same seed and the same swaps give the same game
//! - **Testable**: [`EventLog`] records every visible change
//! - **Portable**: runs headless, in a terminal, or behind any other front end
//!
//! # Module Structure
//!
//! - [`grid`]: fixed-size cell storage, out-of-bounds reads as empty
//! - [`matcher`]: line detection, match groups, bomb area marking
//! - [`board`]: grid plus matcher, spawner, score and config; layouts
//! - [`cascade`]: destruction, bomb promotion, compaction and refill
//! - [`game`]: the `Move`/`Wait` state machine and phase timing
//! - [`port`]: the presentation trait and the recording [`EventLog`]
//! - [`config`]: tuning, environment overrides and validation
//! - [`rng`]: seeded LCG for reproducible games
//!
//! # Example
//!
//! ```
//! use match3_core::{EventLog, Game, GameConfig};
//! use match3_types::{Pos, TurnState};
//!
//! let mut game = Game::new(GameConfig::default().with_seed(42), EventLog::new());
//! game.start();
//! assert_eq!(game.presentation().spawned().count(), 49);
//!
//! if game.try_swap(Pos::new(0, 0), Pos::new(1, 0)) {
//!     assert_eq!(game.state(), TurnState::Wait);
//!     game.run_until_idle();
//! }
//! assert_eq!(game.state(), TurnState::Move);
//! ```
//!
//! # Timing
//!
//! Call [`Game::tick`](game::Game::tick) every frame with the elapsed time;
//! the phase delays in [`config::Delays`] decide when each cascade phase
//! runs. They change nothing but pacing.

pub mod board;
pub mod cascade;
pub mod config;
pub mod game;
pub mod grid;
pub mod matcher;
pub mod piece;
pub mod port;
pub mod rng;
pub mod score;
pub mod snapshot;
pub mod spawner;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LayoutError};
pub use config::{ConfigError, Delays, GameConfig};
pub use game::{Game, TurnSummary};
pub use grid::Grid;
pub use matcher::{MatchGroup, Matcher};
pub use piece::{Piece, PieceId, PieceRef};
pub use port::{BoardEvent, EventLog, Presentation};
pub use rng::SimpleRng;
pub use score::Score;
pub use snapshot::{CellSnapshot, GameSnapshot};
pub use spawner::Spawner;
