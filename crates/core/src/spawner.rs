//! Spawner - creates pieces with fresh ids
//!
//! Owns the game RNG and the id counter, so every random choice the rules make
//! (kind draws, bomb rolls) comes from one seeded sequence.

use crate::config::GameConfig;
use crate::piece::{Piece, PieceId};
use crate::rng::SimpleRng;
use crate::types::{GemKind, Pos};

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: SimpleRng,
    next_id: u32,
}

impl Spawner {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// A piece of `kind` at `pos`. The normal bomb kind always yields a bomb.
    pub fn gem(&mut self, kind: GemKind, pos: Pos, config: &GameConfig) -> Piece {
        if kind == GemKind::NormalBomb {
            return self.bomb(kind, pos, config);
        }
        Piece {
            id: self.next_id(),
            kind,
            is_bomb: false,
            blast_radius: 0,
            score_value: config.score_value,
            pos,
            matched: false,
        }
    }

    /// A bomb of `kind` (a color bomb, or the normal bomb) at `pos`.
    pub fn bomb(&mut self, kind: GemKind, pos: Pos, config: &GameConfig) -> Piece {
        Piece {
            id: self.next_id(),
            kind,
            is_bomb: true,
            blast_radius: config.blast_radius_of(kind),
            score_value: config.score_value,
            pos,
            matched: false,
        }
    }

    /// Spawn `kind` at `pos`, rolling the configured chance of a normal bomb
    /// instead.
    pub fn spawn(&mut self, kind: GemKind, pos: Pos, config: &GameConfig) -> Piece {
        if self.rng.chance(config.bomb_chance) {
            self.bomb(GemKind::NormalBomb, pos, config)
        } else {
            self.gem(kind, pos, config)
        }
    }

    /// Draw a kind uniformly from `kinds`, skipping any in `excluded`.
    ///
    /// When the exclusion leaves nothing to draw, it is ignored and the draw
    /// is made from all of `kinds`. Returns `None` only for an empty palette.
    pub fn draw_kind(&mut self, kinds: &[GemKind], excluded: &[GemKind]) -> Option<GemKind> {
        let allowed = |k: &&GemKind| !excluded.contains(k);
        let n = kinds.iter().filter(allowed).count();
        if n == 0 {
            return self.rng.choose(kinds);
        }
        let i = self.rng.next_range(n as u32) as usize;
        kinds.iter().filter(allowed).nth(i).copied()
    }

    /// Draw from the whole palette.
    pub fn draw_any(&mut self, kinds: &[GemKind]) -> Option<GemKind> {
        self.rng.choose(kinds)
    }
}
