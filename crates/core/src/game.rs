//! Game - the turn state machine and phase sequencer
//!
//! The game accepts one swap at a time. An accepted swap moves the state to
//! `Wait`, and the rest of the turn runs as a chain of phases, each started
//! once its delay has elapsed:
//!
//! ```text
//! CheckSwap -> (no match) RevertSettle -> Move
//! CheckSwap -> Destroy -> [DestroyChain] -> Compact -> Refill -> Rescan
//! Rescan    -> (matches) Destroy ...
//! Rescan    -> (stable)  Move
//! ```
//!
//! Delays only pace the presentation: [`Game::run_until_idle`] skips them and
//! ends in exactly the same board as ticking through them.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::config::GameConfig;
use crate::piece::{Piece, PieceRef};
use crate::port::Presentation;
use crate::snapshot::{CellSnapshot, GameSnapshot};
use crate::types::{Pos, TurnState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    CheckSwap,
    RevertSettle,
    Destroy,
    DestroyChain,
    Compact,
    Refill,
    Rescan,
}

/// What one completed turn did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnSummary {
    pub from: Pos,
    pub to: Pos,
    /// False when the swap made no match and was reverted.
    pub matched: bool,
    /// Destroy steps run, including the one right after the swap.
    pub cascade_rounds: u32,
    pub destroyed: u32,
    pub bombs_created: u32,
    pub score_gained: u32,
}

impl TurnSummary {
    fn new(from: Pos, to: Pos) -> Self {
        Self {
            from,
            to,
            matched: false,
            cascade_rounds: 0,
            destroyed: 0,
            bombs_created: 0,
            score_gained: 0,
        }
    }
}

pub struct Game<P: Presentation = ()> {
    board: Board,
    port: P,
    state: TurnState,
    started: bool,

    pending: Option<Phase>,
    phase_timer_ms: u32,

    /// The swapped pieces, kept until the first destroy step promotes them.
    triggers: ArrayVec<Piece, 2>,
    turn: Option<TurnSummary>,
    score_at_swap: u32,
    last_turn: Option<TurnSummary>,
}

impl<P: Presentation> Game<P> {
    /// Create a game with an empty board; call [`Game::start`] to fill it.
    pub fn new(config: GameConfig, port: P) -> Self {
        Self::from_parts(Board::new(config), port, false)
    }

    /// Create a game around an existing board, already started.
    pub fn with_board(board: Board, port: P) -> Self {
        Self::from_parts(board, port, true)
    }

    fn from_parts(board: Board, port: P, started: bool) -> Self {
        Self {
            board,
            port,
            state: TurnState::Move,
            started,
            pending: None,
            phase_timer_ms: 0,
            triggers: ArrayVec::new(),
            turn: None,
            score_at_swap: 0,
            last_turn: None,
        }
    }

    /// Populate the board. Only the first call does anything.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.board.populate(&mut self.port);
        self.port.on_score_changed(self.board.score());
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Throw the board away and deal a new one. Refused while a turn is
    /// resolving.
    pub fn restart(&mut self) -> bool {
        if self.state != TurnState::Move {
            return false;
        }
        self.board.clear(&mut self.port);
        self.board.populate(&mut self.port);
        self.started = true;
        self.last_turn = None;
        true
    }

    /// Submit a swap between two cells.
    ///
    /// Accepted only while in `Move`, for two in-bounds, orthogonally
    /// adjacent, occupied cells. On acceptance the pieces trade places and
    /// the game waits for the match check.
    pub fn try_swap(&mut self, from: Pos, to: Pos) -> bool {
        if self.state != TurnState::Move || !from.is_adjacent(to) {
            return false;
        }
        let grid = self.board.grid();
        if grid.at(from).is_none() || grid.at(to).is_none() {
            return false;
        }
        if !self.board.swap(from, to, &mut self.port) {
            return false;
        }

        self.triggers.clear();
        for pos in [to, from] {
            if let Some(piece) = self.board.grid().at(pos) {
                self.triggers.push(*piece);
            }
        }
        self.turn = Some(TurnSummary::new(from, to));
        self.score_at_swap = self.board.score();
        self.set_state(TurnState::Wait);
        self.schedule(Phase::CheckSwap, self.board.config().delays.swap_check_ms);
        true
    }

    /// Advance the phase timer by `elapsed_ms`, running every phase whose
    /// delay has run out. Leftover time carries into the next phase.
    /// Returns true if any phase ran.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let mut budget = elapsed_ms;
        let mut progressed = false;
        while let Some(phase) = self.pending {
            if self.phase_timer_ms > budget {
                self.phase_timer_ms -= budget;
                break;
            }
            budget -= self.phase_timer_ms;
            self.pending = None;
            self.phase_timer_ms = 0;
            self.run_phase(phase);
            progressed = true;
        }
        progressed
    }

    /// Run every pending phase without waiting. Returns the number of phases
    /// run.
    pub fn run_until_idle(&mut self) -> u32 {
        let mut phases = 0;
        while let Some(phase) = self.pending.take() {
            self.phase_timer_ms = 0;
            self.run_phase(phase);
            phases += 1;
        }
        phases
    }

    /// True while a turn is resolving.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    fn schedule(&mut self, phase: Phase, delay_ms: u32) {
        self.pending = Some(phase);
        self.phase_timer_ms = delay_ms;
    }

    fn set_state(&mut self, state: TurnState) {
        if self.state != state {
            self.state = state;
            self.port.on_state_changed(state);
        }
    }

    fn run_phase(&mut self, phase: Phase) {
        let delays = self.board.config().delays;
        match phase {
            Phase::CheckSwap => {
                let refs: ArrayVec<PieceRef, 2> =
                    self.triggers.iter().map(Piece::to_ref).collect();
                self.board.find_all_matches(&refs);
                let matched = refs.iter().any(|r| self.board.is_matched(*r));

                if matched {
                    if let Some(turn) = self.turn.as_mut() {
                        turn.matched = true;
                    }
                    self.schedule(Phase::Destroy, 0);
                } else {
                    self.triggers.clear();
                    if let Some(turn) = self.turn {
                        self.board.swap(turn.to, turn.from, &mut self.port);
                    }
                    self.schedule(Phase::RevertSettle, delays.revert_settle_ms);
                }
            }
            Phase::RevertSettle => self.finish_turn(),
            Phase::Destroy => {
                let destroyed = self.board.destroy_matches(false, &mut self.port);
                let triggers = std::mem::take(&mut self.triggers);
                let created = self.board.promote_triggers(&triggers, &mut self.port);
                if let Some(turn) = self.turn.as_mut() {
                    turn.cascade_rounds += 1;
                    turn.destroyed += destroyed;
                    turn.bombs_created += created;
                }

                if self.board.check_for_bombs() {
                    self.schedule(Phase::DestroyChain, delays.bomb_chain_ms);
                } else {
                    self.board.clear_new_bombs();
                    self.schedule(Phase::Compact, delays.compact_ms);
                }
            }
            Phase::DestroyChain => {
                let destroyed = self.board.destroy_matches(true, &mut self.port);
                if let Some(turn) = self.turn.as_mut() {
                    turn.destroyed += destroyed;
                }
                self.board.clear_new_bombs();
                self.schedule(Phase::Compact, delays.compact_ms);
            }
            Phase::Compact => {
                let moved = self.board.compact_columns(&mut self.port);
                let wait = delays.refill_ms + delays.drop_step_ms.saturating_mul(moved);
                self.schedule(Phase::Refill, wait);
            }
            Phase::Refill => {
                let spawned = self.board.refill(&mut self.port);
                let wait = delays.rescan_ms + delays.drop_step_ms.saturating_mul(spawned);
                self.schedule(Phase::Rescan, wait);
            }
            Phase::Rescan => {
                self.board.find_all_matches(&[]);
                if self.board.matcher().has_matches() {
                    self.schedule(Phase::Destroy, 0);
                } else {
                    self.finish_turn();
                }
            }
        }
    }

    fn finish_turn(&mut self) {
        if let Some(mut turn) = self.turn.take() {
            turn.score_gained = self.board.score().saturating_sub(self.score_at_swap);
            self.last_turn = Some(turn);
        }
        self.set_state(TurnState::Move);
    }

    /// Take the summary of the last completed turn, if not taken yet.
    pub fn take_last_turn(&mut self) -> Option<TurnSummary> {
        self.last_turn.take()
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.board.score()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn presentation(&self) -> &P {
        &self.port
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        let grid = self.board.grid();
        out.width = grid.width();
        out.height = grid.height();
        out.cells.clear();
        for y in 0..grid.height() as i8 {
            for x in 0..grid.width() as i8 {
                out.cells.push(grid.get(x, y).map(|p| CellSnapshot {
                    kind: p.kind,
                    is_bomb: p.is_bomb,
                    matched: p.matched,
                }));
            }
        }
        out.score = self.board.score();
        out.state = self.state;
        out.cascade_round = self.turn.map_or(0, |t| t.cascade_rounds);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
