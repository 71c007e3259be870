//! Tile maps: grids of weak tile references plus render attributes
//!
//! A tile map never owns tiles. Each cell carries a tile id naming an
//! entry in some `TileSet`, together with the per-cell attributes the
//! hardware cares about: flip flags, palette slot, priority. A cell
//! whose id no longer resolves is a handled case - consumers fall back
//! to a designated blank tile rather than fail.

use std::collections::HashMap;
use thiserror::Error;

/// Error type for tile map construction and cell access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileMapError {
    /// Cell coordinate outside the grid
    #[error("cell ({row}, {column}) out of range, map is {rows}x{columns}")]
    CellOutOfRange { row: usize, column: usize, rows: usize, columns: usize },
    /// Construction with a cell list that does not fill the grid
    #[error("{actual} cells supplied, {rows}x{columns} map requires {expected}")]
    WrongCellCount { rows: usize, columns: usize, expected: usize, actual: usize },
}

/// One cell of a tile map: a weak tile reference plus attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileMapTile {
    /// Id of the referenced tile in the associated tile set.
    pub tile_id: String,
    /// Resolved hardware tile index (final position + map vram offset).
    /// Assigned by the bundle optimizer; zero until then.
    pub tile_index: usize,
    pub flip_h: bool,
    pub flip_v: bool,
    /// Which palette slot of the map this cell renders with.
    pub palette_slot: u8,
    pub priority: bool,
    /// Exempt this cell's tile from deduplication.
    pub always_keep: bool,
}

impl TileMapTile {
    pub fn for_tile(tile_id: impl Into<String>) -> Self {
        TileMapTile { tile_id: tile_id.into(), ..Self::default() }
    }
}

/// A rows x columns grid of tile references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    id: String,
    pub title: String,
    rows: usize,
    columns: usize,
    cells: Vec<TileMapTile>,
    /// When false the bundle optimizer keeps every referenced tile
    /// verbatim, duplicates included.
    pub optimise: bool,
    /// Base added to each cell's final tile index to form the hardware
    /// tile-memory address.
    pub vram_offset: usize,
    /// Palette ids bound to this map's palette slots, in slot order.
    pub palette_slots: Vec<String>,
}

impl TileMap {
    /// Create a map of the given shape with every cell referencing one tile.
    pub fn filled_with(
        id: impl Into<String>,
        title: impl Into<String>,
        rows: usize,
        columns: usize,
        tile_id: &str,
    ) -> Self {
        TileMap {
            id: id.into(),
            title: title.into(),
            rows,
            columns,
            cells: vec![TileMapTile::for_tile(tile_id); rows * columns],
            optimise: true,
            vram_offset: 0,
            palette_slots: Vec::new(),
        }
    }

    /// Create a map from an explicit cell list in row-major order.
    ///
    /// # Errors
    ///
    /// Rejects cell lists that do not exactly fill the grid.
    pub fn with_cells(
        id: impl Into<String>,
        title: impl Into<String>,
        rows: usize,
        columns: usize,
        cells: Vec<TileMapTile>,
    ) -> Result<Self, TileMapError> {
        let expected = rows * columns;
        if cells.len() != expected {
            return Err(TileMapError::WrongCellCount {
                rows,
                columns,
                expected,
                actual: cells.len(),
            });
        }
        Ok(TileMap {
            id: id.into(),
            title: title.into(),
            rows,
            columns,
            cells,
            optimise: true,
            vram_offset: 0,
            palette_slots: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[TileMapTile] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [TileMapTile] {
        &mut self.cells
    }

    pub fn cell(&self, row: usize, column: usize) -> Result<&TileMapTile, TileMapError> {
        self.check_bounds(row, column)?;
        Ok(&self.cells[row * self.columns + column])
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Result<&mut TileMapTile, TileMapError> {
        self.check_bounds(row, column)?;
        Ok(&mut self.cells[row * self.columns + column])
    }

    pub fn set_cell(
        &mut self,
        row: usize,
        column: usize,
        cell: TileMapTile,
    ) -> Result<(), TileMapError> {
        *self.cell_mut(row, column)? = cell;
        Ok(())
    }

    fn check_bounds(&self, row: usize, column: usize) -> Result<(), TileMapError> {
        if row >= self.rows || column >= self.columns {
            return Err(TileMapError::CellOutOfRange {
                row,
                column,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(())
    }
}

/// An ordered, id-indexed collection of tile maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileMapList {
    maps: Vec<TileMap>,
    by_id: HashMap<String, usize>,
}

impl TileMapList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileMap> {
        self.maps.iter()
    }

    pub fn get(&self, index: usize) -> Option<&TileMap> {
        self.maps.get(index)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&TileMap> {
        self.by_id.get(id).and_then(|&i| self.maps.get(i))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn add(&mut self, map: TileMap) {
        self.maps.push(map);
        self.rebuild_index();
    }

    pub fn remove_by_id(&mut self, id: &str) -> Option<TileMap> {
        let index = self.by_id.get(id).copied()?;
        let map = self.maps.remove(index);
        self.rebuild_index();
        Some(map)
    }

    /// Rebuild the id lookup map; duplicate ids keep the first occurrence.
    fn rebuild_index(&mut self) {
        self.by_id.clear();
        for (i, map) in self.maps.iter().enumerate() {
            self.by_id.entry(map.id().to_string()).or_insert(i);
        }
    }
}

impl FromIterator<TileMap> for TileMapList {
    fn from_iter<I: IntoIterator<Item = TileMap>>(iter: I) -> Self {
        let mut list = TileMapList::new();
        list.maps = iter.into_iter().collect();
        list.rebuild_index();
        list
    }
}
