//! Game configuration - read-only to the rules.
//!
//! Defaults: a 7x7 board, five colors, a 2% normal bomb chance, radius 1
//! blasts and 10 points per piece.
//!
//! # Environment Variables
//!
//! - `MATCH3_SEED`: RNG seed (default: 1)
//! - `MATCH3_WIDTH` / `MATCH3_HEIGHT`: board size (default: 7)
//! - `MATCH3_BOMB_CHANCE`: percent chance a spawn is a normal bomb (default: 2)
//! - `MATCH3_INSTANT`: set to "1" or "true" to zero every phase delay
//!
//! Unparsable values fall back to the default; [`GameConfig::validate`] then
//! rejects combinations the rules cannot play.

use thiserror::Error;

use crate::types::{
    GemKind, BOARD_HEIGHT, BOARD_WIDTH, BOMB_CHAIN_MS, COMPACT_DELAY_MS, DEFAULT_BLAST_RADIUS,
    DEFAULT_BOMB_CHANCE, DEFAULT_SCORE_VALUE, DROP_STEP_MS, MAX_BOARD_SIDE, REFILL_DELAY_MS,
    RESCAN_DELAY_MS, REVERT_SETTLE_MS, SWAP_CHECK_MS,
};

/// Smallest palette that still lets refill avoid trivial matches.
pub const MIN_KINDS: usize = 3;

/// Smallest board side that can hold a line match.
pub const MIN_BOARD_SIDE: u8 = 3;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("board size {width}x{height} is outside {min}..={max}")]
    InvalidSize {
        width: u8,
        height: u8,
        min: u8,
        max: u8,
    },
    #[error("at least {min} distinct ordinary kinds are required, got {found}")]
    TooFewKinds { min: usize, found: usize },
    #[error("the normal bomb cannot be drawn as an ordinary kind")]
    BombInPalette,
    #[error("bomb chance {0} is outside 0..100")]
    BombChance(f32),
}

/// Pacing between cascade phases, in milliseconds.
///
/// Purely presentational: any values, including all zeros, give the same
/// board outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    pub swap_check_ms: u32,
    pub revert_settle_ms: u32,
    pub bomb_chain_ms: u32,
    pub compact_ms: u32,
    pub refill_ms: u32,
    pub rescan_ms: u32,
    /// Added once per piece that fell (before refill) or spawned (before re-scan).
    pub drop_step_ms: u32,
}

impl Delays {
    pub const ZERO: Delays = Delays {
        swap_check_ms: 0,
        revert_settle_ms: 0,
        bomb_chain_ms: 0,
        compact_ms: 0,
        refill_ms: 0,
        rescan_ms: 0,
        drop_step_ms: 0,
    };
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            swap_check_ms: SWAP_CHECK_MS,
            revert_settle_ms: REVERT_SETTLE_MS,
            bomb_chain_ms: BOMB_CHAIN_MS,
            compact_ms: COMPACT_DELAY_MS,
            refill_ms: REFILL_DELAY_MS,
            rescan_ms: RESCAN_DELAY_MS,
            drop_step_ms: DROP_STEP_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: u8,
    pub height: u8,
    /// Ordinary kinds drawn by population and refill.
    pub kinds: Vec<GemKind>,
    /// Percent chance (0..100) that any spawn is replaced by a normal bomb.
    pub bomb_chance: f32,
    /// Blast radius per kind, indexed by [`GemKind::index`].
    pub blast_radius: [u8; GemKind::COUNT],
    pub score_value: u32,
    /// Presentation hint: rows above the board a spawn starts falling from.
    pub drop_height: i32,
    pub delays: Delays,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            kinds: GemKind::COLORS.to_vec(),
            bomb_chance: DEFAULT_BOMB_CHANCE,
            blast_radius: [DEFAULT_BLAST_RADIUS; GemKind::COUNT],
            score_value: DEFAULT_SCORE_VALUE,
            drop_height: 0,
            delays: Delays::default(),
            seed: 1,
        }
    }
}

impl GameConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let seed = env::var("MATCH3_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);
        let width = env::var("MATCH3_WIDTH")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.width);
        let height = env::var("MATCH3_HEIGHT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.height);
        let bomb_chance = env::var("MATCH3_BOMB_CHANCE")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.bomb_chance);
        let instant = env::var("MATCH3_INSTANT")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            width,
            height,
            bomb_chance,
            seed,
            delays: if instant {
                Delays::ZERO
            } else {
                defaults.delays
            },
            ..defaults
        }
    }

    /// Check the configuration is playable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let side_ok = |s: u8| (MIN_BOARD_SIDE..=MAX_BOARD_SIDE).contains(&s);
        if !side_ok(self.width) || !side_ok(self.height) {
            return Err(ConfigError::InvalidSize {
                width: self.width,
                height: self.height,
                min: MIN_BOARD_SIDE,
                max: MAX_BOARD_SIDE,
            });
        }

        if self.kinds.contains(&GemKind::NormalBomb) {
            return Err(ConfigError::BombInPalette);
        }

        let mut distinct = self.kinds.clone();
        distinct.sort();
        distinct.dedup();
        if distinct.len() < MIN_KINDS {
            return Err(ConfigError::TooFewKinds {
                min: MIN_KINDS,
                found: distinct.len(),
            });
        }

        if !(0.0..100.0).contains(&self.bomb_chance) {
            return Err(ConfigError::BombChance(self.bomb_chance));
        }

        Ok(())
    }

    pub fn blast_radius_of(&self, kind: GemKind) -> u8 {
        self.blast_radius[kind.index()]
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_size(mut self, width: u8, height: u8) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_bomb_chance(mut self, percent: f32) -> Self {
        self.bomb_chance = percent;
        self
    }

    pub fn with_kinds(mut self, kinds: &[GemKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    pub fn with_blast_radius(mut self, kind: GemKind, radius: u8) -> Self {
        self.blast_radius[kind.index()] = radius;
        self
    }

    /// Zero every phase delay (tests, headless runs).
    pub fn instant(mut self) -> Self {
        self.delays = Delays::ZERO;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.width, 7);
        assert_eq!(config.height, 7);
        assert_eq!(config.kinds.len(), 5);
        assert_eq!(config.blast_radius_of(GemKind::NormalBomb), 1);
    }

    #[test]
    fn test_rejects_bad_size() {
        let config = GameConfig::default().with_size(2, 7);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSize { width: 2, .. })
        ));
        let config = GameConfig::default().with_size(7, 65);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_small_palette() {
        let config =
            GameConfig::default().with_kinds(&[GemKind::Red, GemKind::Red, GemKind::Blue]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooFewKinds { min: 3, found: 2 })
        );
    }

    #[test]
    fn test_rejects_bomb_in_palette() {
        let config = GameConfig::default().with_kinds(&[
            GemKind::Red,
            GemKind::Blue,
            GemKind::NormalBomb,
        ]);
        assert_eq!(config.validate(), Err(ConfigError::BombInPalette));
    }

    #[test]
    fn test_rejects_bomb_chance_out_of_range() {
        assert!(GameConfig::default().with_bomb_chance(-1.0).validate().is_err());
        assert!(GameConfig::default().with_bomb_chance(100.5).validate().is_err());
        assert!(GameConfig::default().with_bomb_chance(100.0).validate().is_err());
        assert!(GameConfig::default().with_bomb_chance(99.5).validate().is_ok());
        assert!(GameConfig::default().with_bomb_chance(0.0).validate().is_ok());
    }

    #[test]
    fn test_instant_zeroes_delays() {
        let config = GameConfig::default().instant();
        assert_eq!(config.delays, Delays::ZERO);
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::BombChance(150.0);
        assert_eq!(err.to_string(), "bomb chance 150 is outside 0..100");
    }
}
