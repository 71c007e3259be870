//! Grid capability shared by tile sets and tile maps
//!
//! Preview renderers and hit-testing only need a uniform way to ask
//! "what tile is at this index / under this pixel". `TileGridProvider`
//! is that seam: `TileSet` and `TileMap` implement it independently,
//! with no shared state between them.

use crate::tile::TILE_SIZE;
use crate::tilemap::TileMap;
use crate::tileset::TileSet;

/// What a grid cell resolves to, with the attributes a renderer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileInfo {
    pub tile_id: String,
    /// Flat cell index in row-major order.
    pub tile_index: usize,
    pub row: usize,
    pub column: usize,
    pub flip_h: bool,
    pub flip_v: bool,
    pub palette_slot: u8,
}

/// Uniform read access to any grid of tiles.
pub trait TileGridProvider {
    fn tile_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn row_count(&self) -> usize;

    /// Cell info at a flat row-major index, if occupied.
    fn tile_info_by_index(&self, index: usize) -> Option<TileInfo>;

    /// Cell info under a pixel coordinate, if inside the grid.
    fn tile_info_by_pixel(&self, x: usize, y: usize) -> Option<TileInfo> {
        let columns = self.column_count();
        if columns == 0 {
            return None;
        }
        let (column, row) = (x / TILE_SIZE, y / TILE_SIZE);
        if column >= columns || row >= self.row_count() {
            return None;
        }
        self.tile_info_by_index(row * columns + column)
    }
}

impl TileGridProvider for TileSet {
    fn tile_count(&self) -> usize {
        self.len()
    }

    fn column_count(&self) -> usize {
        self.tile_width()
    }

    fn row_count(&self) -> usize {
        TileSet::row_count(self)
    }

    fn tile_info_by_index(&self, index: usize) -> Option<TileInfo> {
        let columns = self.tile_width();
        if columns == 0 {
            return None;
        }
        let tile = self.get(index)?;
        Some(TileInfo {
            tile_id: tile.id().to_string(),
            tile_index: index,
            row: index / columns,
            column: index % columns,
            flip_h: false,
            flip_v: false,
            palette_slot: 0,
        })
    }
}

impl TileGridProvider for TileMap {
    fn tile_count(&self) -> usize {
        self.cells().len()
    }

    fn column_count(&self) -> usize {
        self.columns()
    }

    fn row_count(&self) -> usize {
        self.rows()
    }

    fn tile_info_by_index(&self, index: usize) -> Option<TileInfo> {
        let columns = self.columns();
        if columns == 0 {
            return None;
        }
        let cell = self.cells().get(index)?;
        Some(TileInfo {
            tile_id: cell.tile_id.clone(),
            tile_index: index,
            row: index / columns,
            column: index % columns,
            flip_h: cell.flip_h,
            flip_v: cell.flip_v,
            palette_slot: cell.palette_slot,
        })
    }
}
