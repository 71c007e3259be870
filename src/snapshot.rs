//! JSON snapshot schema
//!
//! The serialized form consumed by undo stacks, persistence and worker
//! message passing. The schema is part of the tool's contract:
//! `deserialize(serialize(x)) == x` for every field, and pixel data
//! travels as the tile's canonical 128-char hex string. All invariant
//! checks run on the way in, so a malformed document is rejected at this
//! boundary rather than surfacing later as a corrupt tile.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::color::Rgb;
use crate::palette::{Palette, PaletteList};
use crate::system::System;
use crate::tile::Tile;
use crate::tilemap::{TileMap, TileMapList, TileMapTile};
use crate::tileset::TileSet;

/// Error type for snapshot IO failures
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A complete editing session: everything the editor persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub system: System,
    pub tile_set: TileSet,
    pub tile_maps: TileMapList,
    pub palettes: PaletteList,
}

impl Project {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

// --- Tile -------------------------------------------------------------

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TileRepr {
    tile_id: String,
    tile_data: String,
}

impl Serialize for Tile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TileRepr { tile_id: self.id().to_string(), tile_data: self.to_hex() }
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = TileRepr::deserialize(deserializer)?;
        Tile::from_hex(repr.tile_id, &repr.tile_data).map_err(D::Error::custom)
    }
}

// --- TileSet ----------------------------------------------------------

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TileSetRepr {
    tile_width: usize,
    tiles: Vec<Tile>,
}

impl Serialize for TileSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TileSetRepr { tile_width: self.tile_width(), tiles: self.iter().cloned().collect() }
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TileSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = TileSetRepr::deserialize(deserializer)?;
        let mut set: TileSet = repr.tiles.into_iter().collect();
        set.set_tile_width(repr.tile_width);
        Ok(set)
    }
}

// --- Palette ----------------------------------------------------------

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaletteRepr {
    palette_id: String,
    title: String,
    system: System,
    colours: Vec<Rgb>,
}

impl Serialize for Palette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PaletteRepr {
            palette_id: self.id().to_string(),
            title: self.title.clone(),
            system: self.system(),
            colours: self.colours().to_vec(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PaletteRepr::deserialize(deserializer)?;
        Palette::with_colours(repr.palette_id, repr.title, repr.system, repr.colours)
            .map_err(D::Error::custom)
    }
}

impl Serialize for PaletteList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for PaletteList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let palettes = Vec::<Palette>::deserialize(deserializer)?;
        Ok(palettes.into_iter().collect())
    }
}

// --- TileMap ----------------------------------------------------------

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TileMapTileRepr {
    tile_id: String,
    #[serde(default)]
    tile_index: usize,
    #[serde(default)]
    flip_h: bool,
    #[serde(default)]
    flip_v: bool,
    #[serde(default)]
    palette_slot: u8,
    #[serde(default)]
    priority: bool,
    #[serde(default)]
    always_keep: bool,
}

impl Serialize for TileMapTile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TileMapTileRepr {
            tile_id: self.tile_id.clone(),
            tile_index: self.tile_index,
            flip_h: self.flip_h,
            flip_v: self.flip_v,
            palette_slot: self.palette_slot,
            priority: self.priority,
            always_keep: self.always_keep,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TileMapTile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = TileMapTileRepr::deserialize(deserializer)?;
        Ok(TileMapTile {
            tile_id: repr.tile_id,
            tile_index: repr.tile_index,
            flip_h: repr.flip_h,
            flip_v: repr.flip_v,
            palette_slot: repr.palette_slot,
            priority: repr.priority,
            always_keep: repr.always_keep,
        })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TileMapRepr {
    tile_map_id: String,
    title: String,
    rows: usize,
    columns: usize,
    optimise: bool,
    vram_offset: usize,
    palette_slots: Vec<String>,
    tiles: Vec<TileMapTile>,
}

impl Serialize for TileMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TileMapRepr {
            tile_map_id: self.id().to_string(),
            title: self.title.clone(),
            rows: self.rows(),
            columns: self.columns(),
            optimise: self.optimise,
            vram_offset: self.vram_offset,
            palette_slots: self.palette_slots.clone(),
            tiles: self.cells().to_vec(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TileMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = TileMapRepr::deserialize(deserializer)?;
        let mut map = TileMap::with_cells(repr.tile_map_id, repr.title, repr.rows, repr.columns, repr.tiles)
            .map_err(D::Error::custom)?;
        map.optimise = repr.optimise;
        map.vram_offset = repr.vram_offset;
        map.palette_slots = repr.palette_slots;
        Ok(map)
    }
}

impl Serialize for TileMapList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for TileMapList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let maps = Vec::<TileMap>::deserialize(deserializer)?;
        Ok(maps.into_iter().collect())
    }
}
