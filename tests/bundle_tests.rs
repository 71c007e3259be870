//! Cross-module scenario tests
//!
//! These exercise the full pipeline the editor drives: build or import a
//! project, optimize it into a bundle, encode it for the target system,
//! and round-trip the whole document through JSON on disk.

use std::fs;

use image::{Rgb as ImageRgb, RgbImage};
use tilegfx::codec::{decode_tile_set, encode_tile, encode_tile_set};
use tilegfx::import::{convert_image, ImportOptions};
use tilegfx::optimize::optimize;
use tilegfx::palette::{Palette, PaletteList};
use tilegfx::snapshot::Project;
use tilegfx::system::System;
use tilegfx::tile::{Tile, PIXELS_PER_TILE};
use tilegfx::tilemap::{TileMap, TileMapList, TileMapTile};
use tilegfx::tileset::TileSet;

fn tile_with(id: &str, fill: u8) -> Tile {
    Tile::from_bytes(id, &[fill; PIXELS_PER_TILE]).unwrap()
}

/// A small project with one duplicate tile pair referenced by one map.
fn sample_project(system: System) -> Project {
    let mut tile_set = TileSet::with_tile_width(2);
    tile_set.add(tile_with("t0", 0));
    tile_set.add(tile_with("t1", 2));
    tile_set.add(tile_with("t2", 1));
    tile_set.add(tile_with("t3", 2));

    let cells = ["t0", "t1", "t2", "t3"]
        .iter()
        .map(|&t| TileMapTile::for_tile(t))
        .collect();
    let map = TileMap::with_cells("m0", "Screen", 2, 2, cells).unwrap();

    let mut palettes = PaletteList::new();
    palettes.add(Palette::new("p0", "Default", system));

    Project {
        title: "fixture".to_string(),
        system,
        tile_set,
        tile_maps: [map].into_iter().collect::<TileMapList>(),
        palettes,
    }
}

#[test]
fn optimized_bundle_encodes_address_correlated() {
    let project = sample_project(System::Ms);
    let bundle = optimize(&project.tile_maps, &project.tile_set, &project.palettes);

    // Duplicate pair collapsed.
    assert_eq!(bundle.tile_set.len(), 3);

    let bytes = encode_tile_set(System::Ms, &bundle.tile_set);
    assert_eq!(bytes.len(), 3 * 32);

    // Every cell's stamped index addresses the right tile in the
    // encoded buffer.
    let map = bundle.tile_maps.get(0).unwrap();
    for cell in map.cells() {
        let tile = bundle.tile_set.get_by_id(&cell.tile_id).unwrap();
        let offset = cell.tile_index * 32;
        assert_eq!(&bytes[offset..offset + 32], encode_tile(System::Ms, tile).as_slice());
    }
}

#[test]
fn optimizing_twice_changes_nothing() {
    let project = sample_project(System::Gb);
    let first = optimize(&project.tile_maps, &project.tile_set, &project.palettes);
    let second = optimize(&first.tile_maps, &first.tile_set, &first.palettes);

    assert_eq!(encode_tile_set(System::Gb, &first.tile_set), encode_tile_set(System::Gb, &second.tile_set));
    for (a, b) in first.tile_maps.iter().zip(second.tile_maps.iter()) {
        for (ca, cb) in a.cells().iter().zip(b.cells().iter()) {
            assert_eq!(ca.tile_index, cb.tile_index);
        }
    }
}

#[test]
fn binary_roundtrip_through_decode() {
    let project = sample_project(System::Nes);
    let bytes = encode_tile_set(System::Nes, &project.tile_set);
    let decoded = decode_tile_set(System::Nes, &bytes, 2).unwrap();

    assert_eq!(decoded.len(), project.tile_set.len());
    for (original, roundtripped) in project.tile_set.iter().zip(decoded.iter()) {
        assert_eq!(original.data(), roundtripped.data());
    }
    // Decode/encode is bijective on well-formed buffers.
    assert_eq!(encode_tile_set(System::Nes, &decoded), bytes);
}

#[test]
fn project_roundtrips_through_disk() {
    let project = sample_project(System::Gg);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.json");

    fs::write(&path, project.to_json().unwrap()).unwrap();
    let loaded = Project::from_json(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(loaded, project);
}

#[test]
fn imported_image_optimizes_into_minimal_bundle() {
    // Four 8x8 blocks, but only two distinct block contents.
    let image = RgbImage::from_fn(16, 16, |x, _| {
        if x < 8 {
            ImageRgb([200, 40, 40])
        } else {
            ImageRgb([40, 40, 200])
        }
    });
    let result = convert_image(&image, &ImportOptions::new(System::Ms)).unwrap();
    let project = result.project;
    assert_eq!(project.tile_set.len(), 4);

    let bundle = optimize(&project.tile_maps, &project.tile_set, &project.palettes);
    assert_eq!(bundle.tile_set.len(), 2);

    // Left column cells share one tile, right column cells the other.
    let map = bundle.tile_maps.get(0).unwrap();
    assert_eq!(map.cells()[0].tile_index, map.cells()[2].tile_index);
    assert_eq!(map.cells()[1].tile_index, map.cells()[3].tile_index);
    assert_ne!(map.cells()[0].tile_index, map.cells()[1].tile_index);
}

#[test]
fn game_boy_black_screen_is_all_zero_bytes() {
    let mut tile_set = TileSet::with_tile_width(1);
    tile_set.add(Tile::blank("t0"));
    let bytes = encode_tile_set(System::Gb, &tile_set);
    assert_eq!(bytes, vec![0u8; 16]);

    let decoded = decode_tile_set(System::Gb, &bytes, 1).unwrap();
    assert!(decoded.get(0).unwrap().data().iter().all(|&p| p == 0));
}

#[test]
fn dangling_reference_survives_full_pipeline() {
    let mut project = sample_project(System::Ms);
    project.tile_set.remove_by_id("t2");

    let bundle = optimize(&project.tile_maps, &project.tile_set, &project.palettes);
    assert_eq!(bundle.warnings.len(), 1);

    // The rebound cell still encodes - to an all-zero tile.
    let map = bundle.tile_maps.get(0).unwrap();
    let rebound = bundle.tile_set.get_by_id(&map.cells()[2].tile_id).unwrap();
    assert!(rebound.data().iter().all(|&p| p == 0));

    let bytes = encode_tile_set(System::Ms, &bundle.tile_set);
    assert_eq!(bytes.len(), bundle.tile_set.len() * 32);
}

#[test]
fn matched_import_stays_within_hardware_colours() {
    let mut options = ImportOptions::new(System::Ms);
    options.match_palette = Some(tilegfx::palettes::MASTER_SYSTEM.to_vec());

    let image = RgbImage::from_fn(8, 8, |x, y| {
        ImageRgb([(x * 30) as u8, (y * 30) as u8, 120])
    });
    let result = convert_image(&image, &options).unwrap();
    let palette = result.project.palettes.get(0).unwrap();
    for &colour in palette.colours() {
        // Every output colour is displayable: 2 bits per channel.
        assert_eq!(colour, System::Ms.nearest_displayable(colour));
    }
}
