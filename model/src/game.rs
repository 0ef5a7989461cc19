use std::fmt;
use std::hash::{Hash, Hasher};

use log::{debug, info, trace};
use ndarray::Array2;
use rand::Rng;

use crate::config::GameConfig;
use crate::error::Result;
use crate::field::{Field, Side, Tile};

/// State of one game: the field plus score bookkeeping.
///
/// Two games are equal when their [`fmt::Display`] renderings are equal.
#[derive(Clone, Debug)]
pub struct Game {
    field: Field,
    score: u32,
    max_score: u32,
    game_over: bool,
    config: GameConfig,
}

impl Game {
    /// An empty game on a `size` x `size` field with score 0.
    ///
    /// # Panics
    /// If `size` is zero.
    pub fn new(size: usize) -> Self {
        Self::build(Field::new(size), GameConfig::with_size(size))
    }

    pub fn with_config(config: &GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(Field::new(config.size), config.clone()))
    }

    /// A game with the given tile values, indexed `[[row, col]]` with row 0
    /// at the bottom (0 for empty), and the given bookkeeping. The game-over
    /// flag is taken as is.
    pub fn from_values(
        values: &Array2<u32>,
        score: u32,
        max_score: u32,
        game_over: bool,
    ) -> Result<Self> {
        let field = Field::from_array(values)?;
        let config = GameConfig::with_size(field.size());
        Ok(Self {
            score,
            max_score,
            game_over,
            ..Self::build(field, config)
        })
    }

    fn build(field: Field, config: GameConfig) -> Self {
        Self {
            field,
            score: 0,
            max_score: 0,
            game_over: false,
            config,
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Tile at `(col, row)`, or `None` if the cell is empty.
    ///
    /// # Panics
    /// If the coordinates are outside the field.
    pub fn tile(&self, col: usize, row: usize) -> Option<Tile> {
        self.field.tile(col, row)
    }

    pub fn size(&self) -> usize {
        self.field.size()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best score so far. Updated when a game ends.
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Empty the field and reset the score. The max score survives.
    pub fn clear(&mut self) {
        self.score = 0;
        self.game_over = false;
        self.field.clear();
        debug!("cleared {0}x{0} field", self.size());
    }

    /// Put `tile` on the field at its own coordinates. No merging happens.
    pub fn add_tile(&mut self, tile: Tile) -> Result<()> {
        self.field.add_tile(tile)?;
        debug!(
            "added {} at ({}, {})",
            tile.value(),
            tile.col(),
            tile.row()
        );
        self.check_game_over();
        Ok(())
    }

    /// Place a random tile on a random empty cell: a 2, or a 4 with the
    /// configured probability. Returns `None` if the field is full.
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Tile> {
        let cells = self.field.free_cells();
        if cells.is_empty() {
            return None;
        }
        let (col, row) = cells[rng.gen_range(0..cells.len())];
        let value = if rng.gen_bool(self.config.four_probability) {
            4
        } else {
            2
        };
        let tile = Tile::new(value, col, row);
        if let Err(e) = self.add_tile(tile) {
            panic!("free cell ({}, {}) rejected a tile: {}", col, row, e);
        }
        Some(tile)
    }

    /// Clear the field and spawn the configured number of starting tiles.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.clear();
        for _ in 0..self.config.initial_tiles {
            self.spawn_tile(rng);
        }
    }

    /// Tilt the field towards `side`. Returns true iff any tile moved.
    ///
    /// Tiles slide as far as they can. Two equal tiles meeting in the
    /// direction of motion merge into one of twice the value, which is added
    /// to the score. A tile produced by a merge does not merge again in the
    /// same tilt, so of three equal tiles in a line the two leading ones
    /// merge and the trailing one stops behind them. Tiles of
    /// [`MAX_TILE_VALUE`](crate::field::MAX_TILE_VALUE) never merge.
    pub fn tilt(&mut self, side: Side) -> bool {
        let size = self.field.size();
        let mut merged = Array2::from_elem((size, size), false);
        let mut changed = false;
        let mut gained: u32 = 0;
        {
            let mut view = self.field.view_from(side);
            for col in 0..size {
                for row in (0..size).rev() {
                    let tile = match view.viewed_tile(col, row) {
                        Some(tile) => tile,
                        None => continue,
                    };
                    let landing = landing_row(&view, col, row, &tile, &mut merged);
                    if landing == row {
                        continue;
                    }
                    match view.move_tile(col, landing, tile) {
                        Ok(true) => gained = gained.saturating_add(tile.value() * 2),
                        Ok(false) => {}
                        Err(e) => panic!("tilt {:?} computed an illegal move: {}", side, e),
                    }
                    trace!("{side:?}: ({col}, {row}) -> ({col}, {landing})");
                    changed = true;
                }
            }
        }
        self.score = self.score.saturating_add(gained);
        debug!("tilt {side:?}: changed={changed} gained={gained} score={}", self.score);
        self.check_game_over();
        changed
    }

    fn check_game_over(&mut self) {
        let over = is_game_over(&self.field, self.config.max_piece);
        if over && !self.game_over {
            self.max_score = self.max_score.max(self.score);
            info!(
                "game over: score {} (max: {})",
                self.score, self.max_score
            );
        }
        self.game_over = over;
    }
}

/// Row where the tile at logical `(col, row)` comes to rest when sliding
/// towards increasing rows. Marks the cell in `merged` when it lands on a
/// tile it merges with that has not merged yet.
fn landing_row(
    field: &Field,
    col: usize,
    row: usize,
    tile: &Tile,
    merged: &mut Array2<bool>,
) -> usize {
    let top = field.size() - 1;
    for i in row + 1..=top {
        if let Some(above) = field.viewed_tile(col, i) {
            if !above.merges_with(tile) || merged[[i, col]] {
                return i - 1;
            }
            merged[[i, col]] = true;
            return i;
        }
    }
    top
}

/// True if a tile of `max_piece` is on the field or no tilt can change it.
pub fn is_game_over(field: &Field, max_piece: u32) -> bool {
    max_tile_exists(field, max_piece) || !at_least_one_move_exists(field)
}

pub fn max_tile_exists(field: &Field, max_piece: u32) -> bool {
    field.tiles().any(|tile| tile.value() == max_piece)
}

pub fn at_least_one_move_exists(field: &Field) -> bool {
    !field.is_full() || equal_neighbors_exist(field)
}

/// True if two orthogonally adjacent tiles would merge.
pub fn equal_neighbors_exist(field: &Field) -> bool {
    let size = field.size();
    let merges = |tile: &Tile, col: usize, row: usize| {
        col < size && row < size && field.tile(col, row).map_or(false, |other| tile.merges_with(&other))
    };
    for col in 0..size {
        for row in 0..size {
            let tile = match field.tile(col, row) {
                Some(tile) => tile,
                None => continue,
            };
            if merges(&tile, col + 1, row) || merges(&tile, col, row + 1) {
                return true;
            }
        }
    }
    false
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "[")?;
        for row in (0..self.size()).rev() {
            for col in 0..self.size() {
                match self.tile(col, row) {
                    Some(tile) => write!(f, "|{:4}", tile.value())?,
                    None => write!(f, "|    ")?,
                }
            }
            writeln!(f, "|")?;
        }
        let over = if self.game_over { "over" } else { "not over" };
        writeln!(
            f,
            "] {} (max: {}) (game is {}) ",
            self.score, self.max_score, over
        )
    }
}

impl PartialEq for Game {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Game {}

impl Hash for Game {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}
