//! Tilegfx - tile graphics engine for 8-bit console targets
//!
//! This library provides functionality to:
//! - Model tiles, palettes, tile sets and tile maps for Master System,
//!   Game Gear, Game Boy and NES targets
//! - Encode and decode tiles to each console's planar binary format
//! - Quantize and match photographic colours into hardware palettes
//! - Optimize tile maps into minimal deduplicated ROM-ready bundles

pub mod cli;
pub mod codec;
pub mod color;
pub mod grid;
pub mod import;
pub mod optimize;
pub mod palette;
pub mod palettes;
pub mod quantize;
pub mod snapshot;
pub mod system;
pub mod tile;
pub mod tilemap;
pub mod tileset;
