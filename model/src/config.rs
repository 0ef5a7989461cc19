use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::MAX_TILE_VALUE;

/// Largest piece value of the classic game. Reaching it ends the game.
pub const MAX_PIECE: u32 = 2048;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cells on one side of the square field.
    pub size: usize,
    /// A tile of this value ends the game.
    pub max_piece: u32,
    /// Chance that a spawned tile is a 4 rather than a 2.
    pub four_probability: f64,
    /// Tiles placed on the field when a game starts.
    pub initial_tiles: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 4,
            max_piece: MAX_PIECE,
            four_probability: 0.1,
            initial_tiles: 2,
        }
    }
}

impl GameConfig {
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidConfig("size must be positive".into()));
        }
        if self.max_piece < 4 || self.max_piece > MAX_TILE_VALUE || !self.max_piece.is_power_of_two() {
            return Err(Error::InvalidConfig(format!(
                "max_piece must be a power of two between 4 and {}, got {}",
                MAX_TILE_VALUE, self.max_piece
            )));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(Error::InvalidConfig(format!(
                "four_probability must be within [0, 1], got {}",
                self.four_probability
            )));
        }
        if self.initial_tiles > self.size * self.size {
            return Err(Error::InvalidConfig(format!(
                "{} initial tiles do not fit a {}x{} field",
                self.initial_tiles, self.size, self.size
            )));
        }
        Ok(())
    }
}
