use std::ops::{Deref, DerefMut};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use Side::{East, North, South, West};

/// Largest tile value. Tiles of this value no longer merge, so a merge can
/// never leave the `u32` range.
pub const MAX_TILE_VALUE: u32 = 1 << 30;

/// Edge of the field tiles are tilted towards. Also names the perspective the
/// field is viewed from: looking from `side`, that edge is the top row.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    pub const ALL: [Side; 4] = [North, East, South, West];

    /// Physical (column, row) of the logical cell `(col, row)` when the field
    /// is viewed from this side. Increasing logical row always runs towards
    /// `self`.
    pub fn to_physical(self, size: usize, col: usize, row: usize) -> (usize, usize) {
        let last = size - 1;
        match self {
            North => (col, row),
            East => (row, last - col),
            South => (last - col, last - row),
            West => (last - row, col),
        }
    }

    /// Inverse of [`Side::to_physical`].
    pub fn to_logical(self, size: usize, col: usize, row: usize) -> (usize, usize) {
        let last = size - 1;
        match self {
            North => (col, row),
            East => (last - row, col),
            South => (last - col, last - row),
            West => (row, last - col),
        }
    }
}

/// A numbered tile. Tiles are values: moving or merging one produces a new
/// tile at the destination.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Tile {
    value: u32,
    col: usize,
    row: usize,
}

impl Tile {
    pub fn try_new(value: u32, col: usize, row: usize) -> Result<Self> {
        if value < 2 || value > MAX_TILE_VALUE || !value.is_power_of_two() {
            return Err(Error::InvalidValue(value));
        }
        Ok(Self { value, col, row })
    }

    /// # Panics
    /// If `value` is not a power of two between 2 and [`MAX_TILE_VALUE`].
    pub fn new(value: u32, col: usize, row: usize) -> Self {
        match Self::try_new(value, col, row) {
            Ok(tile) => tile,
            Err(e) => panic!("{}", e),
        }
    }

    /// True if `self` and `other` combine into one tile of twice the value.
    pub fn merges_with(&self, other: &Tile) -> bool {
        self.value == other.value && self.value < MAX_TILE_VALUE
    }

    pub fn value(&self) -> u32 {
        self.value
    }
    pub fn col(&self) -> usize {
        self.col
    }
    pub fn row(&self) -> usize {
        self.row
    }

    fn moved_to(self, col: usize, row: usize) -> Self {
        Self { col, row, ..self }
    }

    fn merged_at(self, col: usize, row: usize) -> Self {
        Self {
            value: self.value * 2,
            col,
            row,
        }
    }
}

impl From<Tile> for u32 {
    fn from(tile: Tile) -> u32 {
        tile.value
    }
}

/// Square grid of tile slots. Column 0, row 0 is the lower-left corner.
///
/// Plain accessors work in physical coordinates. [`Field::viewed_tile`] and
/// [`Field::move_tile`] work in logical coordinates, translated through the
/// current perspective.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    cells: Array2<Option<Tile>>,
    perspective: Side,
}

impl Field {
    /// # Panics
    /// If `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "field size must be positive");
        Self {
            cells: Array2::default((size, size)),
            perspective: North,
        }
    }

    /// Build a field from tile values indexed `[[row, col]]`, row 0 at the
    /// bottom. Zero means an empty cell.
    pub fn from_array(array: &Array2<u32>) -> Result<Self> {
        let (h, w) = (array.shape()[0], array.shape()[1]);
        if h != w || h == 0 {
            return Err(Error::InvalidConfig(format!(
                "field must be square and non-empty, got {h}x{w}"
            )));
        }
        let mut field = Self::new(h);
        for ((row, col), &v) in array.indexed_iter() {
            if v != 0 {
                field.cells[[row, col]] = Some(Tile::try_new(v, col, row)?);
            }
        }
        Ok(field)
    }

    /// Tile values indexed `[[row, col]]`, zero for empty cells.
    pub fn into_array(&self) -> Array2<u32> {
        self.cells.map(|cell| cell.map_or(0, u32::from))
    }

    pub fn size(&self) -> usize {
        self.cells.shape()[0]
    }

    pub fn perspective(&self) -> Side {
        self.perspective
    }

    fn check_bounds(&self, col: usize, row: usize) -> Result<()> {
        let size = self.size();
        if col >= size || row >= size {
            return Err(Error::OutOfBounds { col, row, size });
        }
        Ok(())
    }

    pub fn checked_tile(&self, col: usize, row: usize) -> Result<Option<Tile>> {
        self.check_bounds(col, row)?;
        Ok(self.cells[[row, col]])
    }

    /// Tile at physical `(col, row)`, ignoring the perspective.
    ///
    /// # Panics
    /// If the coordinates are outside the field.
    pub fn tile(&self, col: usize, row: usize) -> Option<Tile> {
        match self.checked_tile(col, row) {
            Ok(tile) => tile,
            Err(e) => panic!("{}", e),
        }
    }

    fn physical(&self, col: usize, row: usize) -> Result<(usize, usize)> {
        self.check_bounds(col, row)?;
        Ok(self.perspective.to_physical(self.size(), col, row))
    }

    /// Tile at logical `(col, row)` under the current perspective.
    ///
    /// # Panics
    /// If the coordinates are outside the field.
    pub fn viewed_tile(&self, col: usize, row: usize) -> Option<Tile> {
        match self.physical(col, row) {
            Ok((col, row)) => self.cells[[row, col]],
            Err(e) => panic!("{}", e),
        }
    }

    /// Place `tile` at its own coordinates. The cell must be empty.
    pub fn add_tile(&mut self, tile: Tile) -> Result<()> {
        let (col, row) = (tile.col, tile.row);
        if self.checked_tile(col, row)?.is_some() {
            return Err(Error::Occupied { col, row });
        }
        self.cells[[row, col]] = Some(tile);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
        self.perspective = North;
    }

    pub fn set_viewing_perspective(&mut self, side: Side) {
        self.perspective = side;
    }

    /// View the field from `side` until the returned guard is dropped, which
    /// puts the perspective back to `North`.
    pub fn view_from(&mut self, side: Side) -> SideView<'_> {
        self.set_viewing_perspective(side);
        SideView { field: self }
    }

    /// Move `tile` to logical `(col, row)`. Returns true if it merged with an
    /// equal tile already there, producing one tile of twice the value.
    ///
    /// Fails without touching the field if the destination holds a tile
    /// `tile` does not merge with, or `tile` is not the one stored at its
    /// coordinates.
    pub fn move_tile(&mut self, col: usize, row: usize, tile: Tile) -> Result<bool> {
        let (dst_col, dst_row) = self.physical(col, row)?;
        let (src_col, src_row) = (tile.col, tile.row);
        if self.checked_tile(src_col, src_row)? != Some(tile) {
            return Err(Error::NotOnBoard {
                col: src_col,
                row: src_row,
            });
        }
        if (dst_col, dst_row) == (src_col, src_row) {
            return Ok(false);
        }
        let (placed, merged) = match self.cells[[dst_row, dst_col]] {
            None => (tile.moved_to(dst_col, dst_row), false),
            Some(other) if tile.merges_with(&other) => (tile.merged_at(dst_col, dst_row), true),
            Some(other) => {
                return Err(Error::ValueMismatch {
                    col: dst_col,
                    row: dst_row,
                    expected: tile.value,
                    found: other.value,
                })
            }
        };
        self.cells[[src_row, src_col]] = None;
        self.cells[[dst_row, dst_col]] = Some(placed);
        Ok(merged)
    }

    /// Physical coordinates of every empty cell, column-major.
    pub fn free_cells(&self) -> Vec<(usize, usize)> {
        let size = self.size();
        let mut result = Vec::new();
        for col in 0..size {
            for row in 0..size {
                if self.cells[[row, col]].is_none() {
                    result.push((col, row));
                }
            }
        }
        result
    }

    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.iter().filter_map(|cell| *cell)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// Mutable access to a [`Field`] seen from some side. Restores the default
/// perspective on drop.
pub struct SideView<'a> {
    field: &'a mut Field,
}

impl Deref for SideView<'_> {
    type Target = Field;
    fn deref(&self) -> &Field {
        self.field
    }
}

impl DerefMut for SideView<'_> {
    fn deref_mut(&mut self) -> &mut Field {
        self.field
    }
}

impl Drop for SideView<'_> {
    fn drop(&mut self) {
        self.field.set_viewing_perspective(North);
    }
}
