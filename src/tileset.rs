//! The tile set: ordered, id-indexed tile ownership
//!
//! A `TileSet` exclusively owns its tiles. Tile maps elsewhere refer to
//! these tiles by id only, so the set maintains an id -> index lookup
//! map rebuilt by one owned method on every structural mutation. The
//! `tile_width` field reinterprets the flat tile sequence as a 2-D pixel
//! grid for editors; it changes nothing about storage order.

use std::collections::HashMap;
use thiserror::Error;

use crate::tile::{Tile, TileError, TILE_SIZE};

/// Error type for tile set access failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileSetError {
    /// Pixel coordinate outside the grid implied by tile_width
    #[error("pixel ({x}, {y}) outside tile set bounds {width}x{height}")]
    PixelOutOfBounds { x: usize, y: usize, width: usize, height: usize },
    /// Underlying tile mutation failed
    #[error(transparent)]
    Tile(#[from] TileError),
}

/// An ordered collection of owned tiles with id lookup and a grid shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileSet {
    tiles: Vec<Tile>,
    by_id: HashMap<String, usize>,
    tile_width: usize,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with a grid width in tiles (columns).
    pub fn with_tile_width(tile_width: usize) -> Self {
        TileSet { tile_width, ..Self::default() }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(index)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Tile> {
        self.by_id.get(id).and_then(|&i| self.tiles.get(i))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Append a tile.
    pub fn add(&mut self, tile: Tile) {
        self.tiles.push(tile);
        self.rebuild_index();
    }

    /// Insert a tile at a position, shifting later entries.
    pub fn insert(&mut self, index: usize, tile: Tile) {
        let index = index.min(self.tiles.len());
        self.tiles.insert(index, tile);
        self.rebuild_index();
    }

    /// Remove a tile by id; returns it if present.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Tile> {
        let index = self.by_id.get(id).copied()?;
        let tile = self.tiles.remove(index);
        self.rebuild_index();
        Some(tile)
    }

    /// Move the tile at `from` to position `to`, shifting the rest.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.tiles.len() || to >= self.tiles.len() {
            return false;
        }
        let tile = self.tiles.remove(from);
        self.tiles.insert(to, tile);
        self.rebuild_index();
        true
    }

    /// Rebuild the id lookup map from the ordered list.
    ///
    /// Duplicate ids keep the first occurrence.
    fn rebuild_index(&mut self) {
        self.by_id.clear();
        for (i, tile) in self.tiles.iter().enumerate() {
            self.by_id.entry(tile.id().to_string()).or_insert(i);
        }
    }

    /// Grid width in tiles (columns). Zero means no grid shape.
    pub fn tile_width(&self) -> usize {
        self.tile_width
    }

    pub fn set_tile_width(&mut self, tile_width: usize) {
        self.tile_width = tile_width;
    }

    /// Grid height in tiles implied by the width: `ceil(len / width)`.
    pub fn row_count(&self) -> usize {
        if self.tile_width == 0 {
            return 0;
        }
        self.tiles.len().div_ceil(self.tile_width)
    }

    /// Grid width in pixels.
    pub fn width_px(&self) -> usize {
        self.tile_width * TILE_SIZE
    }

    /// Grid height in pixels.
    pub fn height_px(&self) -> usize {
        self.row_count() * TILE_SIZE
    }

    /// Flat tile index for a pixel coordinate, if inside the grid.
    fn tile_index_at_pixel(&self, x: usize, y: usize) -> Option<usize> {
        if self.tile_width == 0 || x >= self.width_px() || y >= self.height_px() {
            return None;
        }
        let index = (y / TILE_SIZE) * self.tile_width + x / TILE_SIZE;
        (index < self.tiles.len()).then_some(index)
    }

    /// Read the palette index at a pixel coordinate in the grid.
    pub fn pixel_at(&self, x: usize, y: usize) -> Result<u8, TileSetError> {
        let index = self.tile_index_at_pixel(x, y).ok_or(TileSetError::PixelOutOfBounds {
            x,
            y,
            width: self.width_px(),
            height: self.height_px(),
        })?;
        Ok(self.tiles[index].value_at((y % TILE_SIZE) * TILE_SIZE + x % TILE_SIZE)?)
    }

    /// Write the palette index at a pixel coordinate in the grid.
    ///
    /// Returns `Ok(true)` if the stored value changed.
    pub fn set_pixel_at(&mut self, x: usize, y: usize, value: u8) -> Result<bool, TileSetError> {
        let index = self.tile_index_at_pixel(x, y).ok_or(TileSetError::PixelOutOfBounds {
            x,
            y,
            width: self.width_px(),
            height: self.height_px(),
        })?;
        Ok(self.tiles[index].set_value_at((y % TILE_SIZE) * TILE_SIZE + x % TILE_SIZE, value)?)
    }
}

impl FromIterator<Tile> for TileSet {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        let mut set = TileSet::new();
        set.tiles = iter.into_iter().collect();
        set.rebuild_index();
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(n: usize, width: usize) -> TileSet {
        let mut set = TileSet::with_tile_width(width);
        for i in 0..n {
            set.add(Tile::blank(format!("t{}", i)));
        }
        set
    }

    #[test]
    fn test_lookup_after_structural_mutations() {
        let mut set = set_of(3, 0);
        assert_eq!(set.index_of("t1"), Some(1));

        set.remove_by_id("t0");
        assert_eq!(set.index_of("t1"), Some(0));
        assert_eq!(set.index_of("t2"), Some(1));

        set.insert(0, Tile::blank("t9"));
        assert_eq!(set.index_of("t9"), Some(0));
        assert_eq!(set.index_of("t1"), Some(1));
    }

    #[test]
    fn test_reorder() {
        let mut set = set_of(3, 0);
        assert!(set.reorder(0, 2));
        assert_eq!(set.index_of("t0"), Some(2));
        assert_eq!(set.index_of("t1"), Some(0));
        assert!(!set.reorder(0, 3));
    }

    #[test]
    fn test_row_count() {
        assert_eq!(set_of(8, 4).row_count(), 2);
        assert_eq!(set_of(9, 4).row_count(), 3);
        assert_eq!(set_of(8, 0).row_count(), 0);
        assert_eq!(set_of(0, 4).row_count(), 0);
    }

    #[test]
    fn test_pixel_accessors_map_to_tiles() {
        let mut set = set_of(4, 2);
        // Pixel (9, 10) lands in tile row 1, col 1 -> tile index 3,
        // local pixel (1, 2).
        assert_eq!(set.set_pixel_at(9, 10, 7), Ok(true));
        assert_eq!(set.pixel_at(9, 10), Ok(7));
        assert_eq!(set.get(3).unwrap().value_at(2 * TILE_SIZE + 1), Ok(7));
    }

    #[test]
    fn test_pixel_accessors_reject_out_of_bounds() {
        let mut set = set_of(4, 2);
        // Grid is 16x16 px.
        assert!(matches!(set.pixel_at(16, 0), Err(TileSetError::PixelOutOfBounds { .. })));
        assert!(matches!(set.pixel_at(0, 16), Err(TileSetError::PixelOutOfBounds { .. })));
        assert!(matches!(
            set.set_pixel_at(20, 20, 1),
            Err(TileSetError::PixelOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_pixel_accessors_reject_ragged_tail() {
        // 3 tiles at width 2: the grid is 2x2 tiles but index 3 is absent.
        let set = set_of(3, 2);
        assert!(set.pixel_at(0, 8).is_ok()); // tile 2 exists
        assert!(set.pixel_at(8, 8).is_err()); // tile 3 does not
    }

    #[test]
    fn test_zero_width_rejects_all_pixels() {
        let set = set_of(4, 0);
        assert!(set.pixel_at(0, 0).is_err());
    }
}
