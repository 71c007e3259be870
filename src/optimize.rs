//! Tile-map bundle optimizer
//!
//! Takes one or more tile maps, the tile set they reference and the
//! project's palettes, and produces a minimal self-consistent bundle for
//! ROM inclusion: duplicate tile content collapses to a single entry,
//! unreferenced tiles and palettes are dropped, and every surviving cell
//! is stamped with its final hardware tile index (position in the output
//! set plus the map's vram offset).
//!
//! Pure function over input snapshots: nothing is mutated, no state is
//! kept between calls.

use std::collections::HashMap;

use crate::palette::PaletteList;
use crate::tile::Tile;
use crate::tilemap::{TileMap, TileMapList};
use crate::tileset::TileSet;

/// The optimized (tile set, tile maps, palettes) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub tile_set: TileSet,
    pub tile_maps: TileMapList,
    pub palettes: PaletteList,
    /// Non-fatal conditions encountered: dangling references rebound to
    /// the blank tile, palette slots the input list could not fill.
    pub warnings: Vec<String>,
}

/// Produce a deduplicated, address-correlated bundle.
///
/// Maps with `optimise == false` keep every cell's tile verbatim, as do
/// individual cells flagged `always_keep`; everything else is rewritten
/// to the first tile seen with identical pixel content. Cells whose tile
/// id no longer resolves are rebound to a synthetic blank tile rather
/// than failing.
pub fn optimize(tile_maps: &TileMapList, tile_set: &TileSet, palettes: &PaletteList) -> Bundle {
    let mut warnings = Vec::new();

    // Working copy of the tile set with a blank fallback tile appended.
    let mut working = tile_set.clone();
    let blank_id = unused_id(&working, "blank");
    working.add(Tile::blank(blank_id.clone()));

    // Content table: canonical hex encoding -> first tile id with that
    // content. First-seen id wins.
    let mut content: HashMap<String, String> = HashMap::new();
    for tile in working.iter() {
        content.entry(tile.to_hex()).or_insert_with(|| tile.id().to_string());
    }

    // Rebind dangling references, then rewrite deduplicable cells to
    // their canonical id.
    let mut maps: Vec<TileMap> = tile_maps.iter().cloned().collect();
    for map in &mut maps {
        let optimise = map.optimise;
        let map_id = map.id().to_string();
        for cell in map.cells_mut() {
            if !working.contains(&cell.tile_id) {
                warnings.push(format!(
                    "tile map '{}': tile '{}' not found, using blank tile",
                    map_id, cell.tile_id
                ));
                cell.tile_id = blank_id.clone();
            }
            if optimise && !cell.always_keep {
                if let Some(tile) = working.get_by_id(&cell.tile_id) {
                    cell.tile_id = content[&tile.to_hex()].clone();
                }
            }
        }
    }

    // Gather surviving tiles in first-referenced order.
    let mut final_index: HashMap<String, usize> = HashMap::new();
    let mut output_set = TileSet::with_tile_width(tile_set.tile_width());
    for map in &maps {
        for cell in map.cells() {
            if !final_index.contains_key(&cell.tile_id) {
                // Resolution is guaranteed: every cell id was either
                // verified present or rebound to the blank tile above.
                if let Some(tile) = working.get_by_id(&cell.tile_id) {
                    final_index.insert(cell.tile_id.clone(), output_set.len());
                    output_set.add(tile.clone());
                }
            }
        }
    }

    // Stamp final hardware indices and bind palette slots.
    for map in &mut maps {
        let vram_offset = map.vram_offset;
        for cell in map.cells_mut() {
            cell.tile_index = final_index[&cell.tile_id] + vram_offset;
        }

        let slots_needed =
            map.cells().iter().map(|c| c.palette_slot as usize + 1).max().unwrap_or(0);
        let mut slots = Vec::with_capacity(slots_needed);
        for slot in 0..slots_needed {
            match palettes.get(slot).or_else(|| palettes.get(palettes.len().wrapping_sub(1))) {
                Some(palette) => slots.push(palette.id().to_string()),
                None => warnings.push(format!(
                    "tile map '{}': no palette available for slot {}",
                    map.id(),
                    slot
                )),
            }
        }
        map.palette_slots = slots;
    }

    // Keep only the palettes some map actually binds, in first-referenced
    // order.
    let mut output_palettes = PaletteList::new();
    for map in &maps {
        for palette_id in &map.palette_slots {
            if !output_palettes.contains(palette_id) {
                if let Some(palette) = palettes.get_by_id(palette_id) {
                    output_palettes.add(palette.clone());
                }
            }
        }
    }

    Bundle {
        tile_set: output_set,
        tile_maps: maps.into_iter().collect(),
        palettes: output_palettes,
        warnings,
    }
}

/// First id of the form `base`, `base1`, `base2`... not present in the set.
fn unused_id(tile_set: &TileSet, base: &str) -> String {
    if !tile_set.contains(base) {
        return base.to_string();
    }
    let mut n = 1usize;
    loop {
        let candidate = format!("{}{}", base, n);
        if !tile_set.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
