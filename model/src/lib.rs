//! Rules of 2048: a square field of tiles that slide and merge when tilted.
//!
//! - `field`: the grid, its tiles and the per-side perspective remap.
//! - `game`: tilting, scoring and game-over detection on top of a field.

pub mod config;
pub mod error;
pub mod field;
pub mod game;

pub use config::{GameConfig, MAX_PIECE};
pub use error::{Error, Result};
pub use field::{Field, Side, Tile, MAX_TILE_VALUE};
pub use game::Game;
