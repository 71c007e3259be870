//! Image import: photograph in, tile project out
//!
//! Converts an arbitrary RGB image into a palette, a tile set and a
//! covering tile map for a target system. Colour reduction goes through
//! the quantization engine, either free-form (derive representatives) or
//! matched against a fixed hardware palette. Pixel-to-tile conversion is
//! parallelized across 8x8 blocks; each block writes a disjoint tile, so
//! the blocks are embarrassingly parallel.

use image::RgbImage;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::color::Rgb;
use crate::palette::{Palette, PaletteError, PaletteList};
use crate::quantize::{colour_counts, match_to_palette, reduce_to_limit, ColourMatch};
use crate::snapshot::Project;
use crate::system::System;
use crate::tile::{Tile, PIXELS_PER_TILE, TILE_SIZE};
use crate::tilemap::{TileMap, TileMapList};
use crate::tileset::TileSet;

/// Tolerance step for free-form colour grouping.
const GROUP_FACTOR_STEP: u16 = 4;
/// Tolerance step when reducing an already-matched population.
const MATCHED_FACTOR_STEP: u16 = 16;

/// Error type for image import failures
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("image is empty")]
    EmptyImage,
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Tile(#[from] crate::tile::TileError),
}

/// How an image should be converted.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub system: System,
    /// Project and palette title; defaults to "imported".
    pub title: String,
    /// Fixed hardware palette to match against instead of deriving
    /// representatives freely.
    pub match_palette: Option<Vec<Rgb>>,
}

impl ImportOptions {
    pub fn new(system: System) -> Self {
        ImportOptions { system, title: "imported".to_string(), match_palette: None }
    }
}

/// A converted image plus anything worth telling the user about.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub project: Project,
    pub warnings: Vec<String>,
}

/// Import an image file and convert it to a tile project.
pub fn import_image<P: AsRef<Path>>(
    path: P,
    options: &ImportOptions,
) -> Result<ImportResult, ImportError> {
    let image = image::open(path)?.to_rgb8();
    convert_image(&image, options)
}

/// Convert an in-memory RGB image to a tile project.
///
/// The image is covered with 8x8 blocks; partial edge blocks are padded
/// with palette index 0.
pub fn convert_image(
    image: &RgbImage,
    options: &ImportOptions,
) -> Result<ImportResult, ImportError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ImportError::EmptyImage);
    }
    let mut warnings = Vec::new();

    let observed = colour_counts(
        image.pixels().map(|p| Rgb::new(p.0[0], p.0[1], p.0[2])),
    );

    let limit = options.system.colour_count();
    let (groups, extra_remaps) = match &options.match_palette {
        Some(targets) => {
            let result = match_to_palette(&observed, targets, GROUP_FACTOR_STEP);
            // Only targets that absorbed pixels matter for the output
            // palette; reduce further if more of them survive than the
            // system palette holds.
            let used: Vec<ColourMatch> =
                result.matches.into_iter().filter(|m| m.count > 0).collect();
            let groups = reduce_to_limit(&used, limit, MATCHED_FACTOR_STEP);
            let mut extra = Vec::new();
            for leftover in result.unmatched {
                warnings.push(format!(
                    "colour {} matched no palette entry, assigned to nearest",
                    leftover.hex
                ));
                extra.push(leftover);
            }
            (groups, extra)
        }
        None => (reduce_to_limit(&observed, limit, GROUP_FACTOR_STEP), Vec::new()),
    };

    // Representative hex -> palette slot, then fold in every absorbed
    // original hex.
    let mut slot_of: HashMap<String, u8> = HashMap::new();
    for (slot, group) in groups.iter().enumerate() {
        slot_of.insert(group.hex.clone(), slot as u8);
        for hex in &group.matched_colours {
            slot_of.insert(hex.clone(), slot as u8);
        }
    }
    // Saturation leftovers still get a home: the nearest representative.
    for leftover in &extra_remaps {
        let slot = nearest_group(&groups, leftover.rgb());
        slot_of.insert(leftover.hex.clone(), slot);
        for hex in &leftover.matched_colours {
            slot_of.insert(hex.clone(), slot);
        }
    }

    // Pad the palette out to the system's fixed size.
    let mut colours: Vec<Rgb> = groups.iter().map(|g| g.rgb()).collect();
    colours.resize(limit, Rgb::new(0, 0, 0));
    let palette = Palette::with_colours("palette0", options.title.clone(), options.system, colours)?;

    let columns = (width as usize).div_ceil(TILE_SIZE);
    let rows = (height as usize).div_ceil(TILE_SIZE);

    // Each block maps to exactly one output tile, so blocks convert in
    // parallel.
    let tiles: Vec<Tile> = (0..rows * columns)
        .into_par_iter()
        .map(|block| {
            let (block_row, block_col) = (block / columns, block % columns);
            let mut data = [0u8; PIXELS_PER_TILE];
            for y in 0..TILE_SIZE {
                for x in 0..TILE_SIZE {
                    let px = (block_col * TILE_SIZE + x) as u32;
                    let py = (block_row * TILE_SIZE + y) as u32;
                    if px < width && py < height {
                        let p = image.get_pixel(px, py);
                        let hex = Rgb::new(p.0[0], p.0[1], p.0[2]).to_hex();
                        data[y * TILE_SIZE + x] = slot_of.get(&hex).copied().unwrap_or(0);
                    }
                }
            }
            Tile::from_bytes(format!("tile{}", block), &data)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut tile_set: TileSet = tiles.into_iter().collect();
    tile_set.set_tile_width(columns);

    let mut map = TileMap::filled_with("tilemap0", options.title.clone(), rows, columns, "");
    for (i, cell) in map.cells_mut().iter_mut().enumerate() {
        cell.tile_id = format!("tile{}", i);
    }
    map.palette_slots = vec!["palette0".to_string()];

    let mut palettes = PaletteList::new();
    palettes.add(palette);
    let tile_maps: TileMapList = [map].into_iter().collect();

    Ok(ImportResult {
        project: Project {
            title: options.title.clone(),
            system: options.system,
            tile_set,
            tile_maps,
            palettes,
        },
        warnings,
    })
}

/// Slot of the representative nearest to `colour` by squared distance.
fn nearest_group(groups: &[ColourMatch], colour: Rgb) -> u8 {
    let mut best = 0u8;
    let mut best_dist = u32::MAX;
    for (slot, group) in groups.iter().enumerate() {
        let dr = group.r as i32 - colour.r as i32;
        let dg = group.g as i32 - colour.g as i32;
        let db = group.b as i32 - colour.b as i32;
        let dist = (dr * dr + dg * dg + db * db) as u32;
        if dist < best_dist {
            best_dist = dist;
            best = slot as u8;
        }
    }
    best
}
