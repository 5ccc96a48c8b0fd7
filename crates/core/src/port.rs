//! Presentation port - how the rules tell the outside world what happened
//!
//! The core owns every position and every decision; a presentation only
//! listens. All methods default to no-ops, so an implementation overrides the
//! calls it cares about. `()` ignores everything, [`EventLog`] records it.

use crate::piece::{Piece, PieceId};
use crate::types::{Pos, TurnState};

#[allow(unused_variables)]
pub trait Presentation {
    /// A piece entered the grid. `drop_height` is how many rows above its
    /// cell it should appear to fall from.
    fn spawn_piece(&mut self, piece: &Piece, drop_height: i32) {}

    /// A piece left the grid. Called exactly once per piece.
    fn despawn_piece(&mut self, piece: &Piece) {}

    fn on_score_changed(&mut self, total: u32) {}

    /// A piece moved between cells (swap, revert or falling).
    fn on_piece_moved(&mut self, id: PieceId, from: Pos, to: Pos) {}

    fn on_state_changed(&mut self, state: TurnState) {}
}

impl Presentation for () {}

/// One presentation call, as recorded by [`EventLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    Spawned { piece: Piece, drop_height: i32 },
    Despawned(Piece),
    ScoreChanged(u32),
    Moved { id: PieceId, from: Pos, to: Pos },
    StateChanged(TurnState),
}

/// Presentation that records every call, for headless observers and tests.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<BoardEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty.
    pub fn take(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn spawned(&self) -> impl Iterator<Item = &Piece> {
        self.events.iter().filter_map(|e| match e {
            BoardEvent::Spawned { piece, .. } => Some(piece),
            _ => None,
        })
    }

    pub fn despawned(&self) -> impl Iterator<Item = &Piece> {
        self.events.iter().filter_map(|e| match e {
            BoardEvent::Despawned(piece) => Some(piece),
            _ => None,
        })
    }

    /// Last score reported, if any.
    pub fn last_score(&self) -> Option<u32> {
        self.events.iter().rev().find_map(|e| match e {
            BoardEvent::ScoreChanged(total) => Some(*total),
            _ => None,
        })
    }
}

impl Presentation for EventLog {
    fn spawn_piece(&mut self, piece: &Piece, drop_height: i32) {
        self.events.push(BoardEvent::Spawned {
            piece: *piece,
            drop_height,
        });
    }

    fn despawn_piece(&mut self, piece: &Piece) {
        self.events.push(BoardEvent::Despawned(*piece));
    }

    fn on_score_changed(&mut self, total: u32) {
        self.events.push(BoardEvent::ScoreChanged(total));
    }

    fn on_piece_moved(&mut self, id: PieceId, from: Pos, to: Pos) {
        self.events.push(BoardEvent::Moved { id, from, to });
    }

    fn on_state_changed(&mut self, state: TurnState) {
        self.events.push(BoardEvent::StateChanged(state));
    }
}
