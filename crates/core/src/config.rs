//! Engine configuration
//!
//! All values are fixed for the lifetime of an engine. The three layouts the
//! game ships with differ only in grid width, speed decay and leveling cadence,
//! so they are presets over one struct rather than separate engines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::Randomizer;
use crate::types::{
    BASE_FALL_MS, CLEAR_EFFECT_MS, COMPACT_BOARD_WIDTH, COMPACT_LINES_PER_LEVEL,
    COMPACT_SPEED_DECAY, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DESKTOP_LINES_PER_LEVEL,
    DESKTOP_SPEED_DECAY, MIN_BOARD_SIDE, MIN_FALL_MS,
};

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("board {axis} must be at least {min} cells, got {value}")]
    BoardTooSmall {
        axis: &'static str,
        value: u8,
        min: u8,
    },
    #[error("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },
    #[error("min_fall_ms ({min}) must not exceed base_fall_ms ({base})")]
    FloorAboveBase { min: u32, base: u32 },
    #[error("speed_decay must be in (0, 1], got {0}")]
    SpeedDecay(f64),
    #[error("lines_per_level must be greater than zero")]
    ZeroLinesPerLevel,
}

/// Load-time engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board_width: u8,
    pub board_height: u8,
    /// Gravity interval at level 1.
    pub base_fall_ms: u32,
    /// Gravity interval floor.
    pub min_fall_ms: u32,
    /// Multiplier applied to the gravity interval per level gained.
    pub speed_decay: f64,
    pub lines_per_level: u32,
    /// Blink duration for cleared rows. Zero disables the effect.
    pub clear_effect_ms: u32,
    pub randomizer: Randomizer,
}

impl EngineConfig {
    /// 12x20 board, 10 lines per level, gentle speed-up.
    pub fn desktop() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            base_fall_ms: BASE_FALL_MS,
            min_fall_ms: MIN_FALL_MS,
            speed_decay: DESKTOP_SPEED_DECAY,
            lines_per_level: DESKTOP_LINES_PER_LEVEL,
            clear_effect_ms: CLEAR_EFFECT_MS,
            randomizer: Randomizer::Uniform,
        }
    }

    /// 10x20 board, 5 lines per level, steep speed-up.
    pub fn compact() -> Self {
        Self {
            board_width: COMPACT_BOARD_WIDTH,
            speed_decay: COMPACT_SPEED_DECAY,
            lines_per_level: COMPACT_LINES_PER_LEVEL,
            ..Self::desktop()
        }
    }

    /// Desktop board with the compact leveling cadence.
    pub fn alternate() -> Self {
        Self {
            speed_decay: COMPACT_SPEED_DECAY,
            lines_per_level: COMPACT_LINES_PER_LEVEL,
            ..Self::desktop()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width < MIN_BOARD_SIDE {
            return Err(ConfigError::BoardTooSmall {
                axis: "width",
                value: self.board_width,
                min: MIN_BOARD_SIDE,
            });
        }
        if self.board_height < MIN_BOARD_SIDE {
            return Err(ConfigError::BoardTooSmall {
                axis: "height",
                value: self.board_height,
                min: MIN_BOARD_SIDE,
            });
        }
        if self.base_fall_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "base_fall_ms",
            });
        }
        if self.min_fall_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "min_fall_ms",
            });
        }
        if self.min_fall_ms > self.base_fall_ms {
            return Err(ConfigError::FloorAboveBase {
                min: self.min_fall_ms,
                base: self.base_fall_ms,
            });
        }
        if !(self.speed_decay > 0.0 && self.speed_decay <= 1.0) {
            return Err(ConfigError::SpeedDecay(self.speed_decay));
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::desktop()
    }
}
