//! Per-system planar tile codecs
//!
//! Consoles store an 8x8 tile as N parallel bit planes, one bit per
//! pixel per plane. Master System and Game Gear interleave 4 planes per
//! row (32 bytes/tile, MSB-first); Game Boy interleaves 2 planes per row
//! with the low bit at the low column (16 bytes/tile); NES stores its 2
//! planes as separate 8-byte blocks (16 bytes/tile, MSB-first).
//!
//! Every transform here is a pure function. Pixel bits beyond a
//! system's depth are dropped by the plane masks, never reported as an
//! error; decode output is always within the system's depth.

use thiserror::Error;

use crate::system::System;
use crate::tile::{Tile, TileError, PIXELS_PER_TILE, TILE_SIZE};
use crate::tileset::TileSet;

/// Error type for decode-boundary failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Byte slice was not exactly one encoded tile for the system
    #[error("{actual} bytes supplied, system '{system}' tile is {expected} bytes")]
    BadTileLength { system: System, expected: usize, actual: usize },
    /// Buffer length is not a whole number of encoded tiles
    #[error("{actual} bytes supplied, not a multiple of system '{system}' tile size {tile_size}")]
    MisalignedBuffer { system: System, tile_size: usize, actual: usize },
    /// Decoded pixels failed tile construction (cannot happen for
    /// in-depth planes, kept for the boundary contract)
    #[error(transparent)]
    Tile(#[from] TileError),
}

/// Encode a tile's pixel buffer in the Master System 4bpp layout.
///
/// Four planes interleaved per row, 4 bytes/row, MSB-first: column 0 is
/// bit 7 of each plane byte.
pub fn encode_master_system(pixels: &[u8; PIXELS_PER_TILE]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for row in 0..TILE_SIZE {
        for col in 0..TILE_SIZE {
            let value = pixels[row * TILE_SIZE + col];
            for plane in 0..4 {
                if value & (1 << plane) != 0 {
                    out[row * 4 + plane] |= 1 << (7 - col);
                }
            }
        }
    }
    out
}

/// Decode 32 Master System bytes back to a flat pixel buffer.
pub fn decode_master_system(bytes: &[u8; 32]) -> [u8; PIXELS_PER_TILE] {
    let mut pixels = [0u8; PIXELS_PER_TILE];
    for row in 0..TILE_SIZE {
        for col in 0..TILE_SIZE {
            let mut value = 0u8;
            for plane in 0..4 {
                if bytes[row * 4 + plane] & (1 << (7 - col)) != 0 {
                    value |= 1 << plane;
                }
            }
            pixels[row * TILE_SIZE + col] = value;
        }
    }
    pixels
}

/// Encode in the Game Gear layout.
///
/// The VDP is the same video core as the Master System's, so the tile
/// layout is byte-identical.
pub fn encode_game_gear(pixels: &[u8; PIXELS_PER_TILE]) -> [u8; 32] {
    encode_master_system(pixels)
}

/// Decode 32 Game Gear bytes back to a flat pixel buffer.
pub fn decode_game_gear(bytes: &[u8; 32]) -> [u8; PIXELS_PER_TILE] {
    decode_master_system(bytes)
}

/// Encode in the Game Boy 2bpp layout.
///
/// Two planes interleaved per row, 2 bytes/row, low bit at the low
/// column: column 0 is bit 0 of each plane byte.
pub fn encode_game_boy(pixels: &[u8; PIXELS_PER_TILE]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for row in 0..TILE_SIZE {
        for col in 0..TILE_SIZE {
            let value = pixels[row * TILE_SIZE + col];
            for plane in 0..2 {
                if value & (1 << plane) != 0 {
                    out[row * 2 + plane] |= 1 << col;
                }
            }
        }
    }
    out
}

/// Decode 16 Game Boy bytes back to a flat pixel buffer.
pub fn decode_game_boy(bytes: &[u8; 16]) -> [u8; PIXELS_PER_TILE] {
    let mut pixels = [0u8; PIXELS_PER_TILE];
    for row in 0..TILE_SIZE {
        for col in 0..TILE_SIZE {
            let mut value = 0u8;
            for plane in 0..2 {
                if bytes[row * 2 + plane] & (1 << col) != 0 {
                    value |= 1 << plane;
                }
            }
            pixels[row * TILE_SIZE + col] = value;
        }
    }
    pixels
}

/// Encode in the NES 2bpp layout.
///
/// Two planes as separate 8-byte blocks, one byte per row per block,
/// MSB-first: plane 0 fills bytes 0..8, plane 1 fills bytes 8..16.
pub fn encode_nes(pixels: &[u8; PIXELS_PER_TILE]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for row in 0..TILE_SIZE {
        for col in 0..TILE_SIZE {
            let value = pixels[row * TILE_SIZE + col];
            if value & 1 != 0 {
                out[row] |= 1 << (7 - col);
            }
            if value & 2 != 0 {
                out[8 + row] |= 1 << (7 - col);
            }
        }
    }
    out
}

/// Decode 16 NES bytes back to a flat pixel buffer.
pub fn decode_nes(bytes: &[u8; 16]) -> [u8; PIXELS_PER_TILE] {
    let mut pixels = [0u8; PIXELS_PER_TILE];
    for row in 0..TILE_SIZE {
        for col in 0..TILE_SIZE {
            let mut value = 0u8;
            if bytes[row] & (1 << (7 - col)) != 0 {
                value |= 1;
            }
            if bytes[8 + row] & (1 << (7 - col)) != 0 {
                value |= 2;
            }
            pixels[row * TILE_SIZE + col] = value;
        }
    }
    pixels
}

/// Encode one tile for a target system.
pub fn encode_tile(system: System, tile: &Tile) -> Vec<u8> {
    match system {
        System::Ms => encode_master_system(tile.data()).to_vec(),
        System::Gg => encode_game_gear(tile.data()).to_vec(),
        System::Gb => encode_game_boy(tile.data()).to_vec(),
        System::Nes => encode_nes(tile.data()).to_vec(),
    }
}

/// Decode one encoded tile for a target system.
///
/// # Errors
///
/// Rejects byte slices that are not exactly `system.bytes_per_tile()`
/// long.
pub fn decode_tile(system: System, id: impl Into<String>, bytes: &[u8]) -> Result<Tile, CodecError> {
    let expected = system.bytes_per_tile();
    if bytes.len() != expected {
        return Err(CodecError::BadTileLength { system, expected, actual: bytes.len() });
    }
    let pixels = match system {
        System::Ms => {
            let mut buf = [0u8; 32];
            buf.copy_from_slice(bytes);
            decode_master_system(&buf)
        }
        System::Gg => {
            let mut buf = [0u8; 32];
            buf.copy_from_slice(bytes);
            decode_game_gear(&buf)
        }
        System::Gb => {
            let mut buf = [0u8; 16];
            buf.copy_from_slice(bytes);
            decode_game_boy(&buf)
        }
        System::Nes => {
            let mut buf = [0u8; 16];
            buf.copy_from_slice(bytes);
            decode_nes(&buf)
        }
    };
    Ok(Tile::from_bytes(id, &pixels)?)
}

/// Encode every tile of a set, concatenated in storage order.
pub fn encode_tile_set(system: System, tile_set: &TileSet) -> Vec<u8> {
    let mut out = Vec::with_capacity(tile_set.len() * system.bytes_per_tile());
    for tile in tile_set.iter() {
        out.extend_from_slice(&encode_tile(system, tile));
    }
    out
}

/// Decode a buffer of concatenated encoded tiles into a tile set.
///
/// Tiles are assigned sequential ids `tile0`, `tile1`, ...
///
/// # Errors
///
/// Rejects buffers whose length is not a whole number of tiles.
pub fn decode_tile_set(
    system: System,
    bytes: &[u8],
    tile_width: usize,
) -> Result<TileSet, CodecError> {
    let tile_size = system.bytes_per_tile();
    if bytes.len() % tile_size != 0 {
        return Err(CodecError::MisalignedBuffer { system, tile_size, actual: bytes.len() });
    }
    let mut set = TileSet::with_tile_width(tile_width);
    for (i, chunk) in bytes.chunks_exact(tile_size).enumerate() {
        set.add(decode_tile(system, format!("tile{}", i), chunk)?);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Checkerboard of max-index and 0, max in the top-left corner.
    fn checkerboard(max: u8) -> [u8; PIXELS_PER_TILE] {
        let mut pixels = [0u8; PIXELS_PER_TILE];
        for row in 0..TILE_SIZE {
            for col in 0..TILE_SIZE {
                if (row + col) % 2 == 0 {
                    pixels[row * TILE_SIZE + col] = max;
                }
            }
        }
        pixels
    }

    /// Pseudo-random but deterministic in-depth pixel pattern.
    fn scramble(max: u8) -> [u8; PIXELS_PER_TILE] {
        let mut pixels = [0u8; PIXELS_PER_TILE];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i * 7 + 3) % (max as usize + 1)) as u8;
        }
        pixels
    }

    #[test]
    fn test_ms_all_zero() {
        assert_eq!(encode_master_system(&[0; PIXELS_PER_TILE]), [0u8; 32]);
        assert_eq!(decode_master_system(&[0; 32]), [0; PIXELS_PER_TILE]);
    }

    #[test]
    fn test_ms_all_max() {
        assert_eq!(encode_master_system(&[15; PIXELS_PER_TILE]), [0xFF; 32]);
        assert_eq!(decode_master_system(&[0xFF; 32]), [15; PIXELS_PER_TILE]);
    }

    #[test]
    fn test_ms_checkerboard_vector() {
        let bytes = encode_master_system(&checkerboard(15));
        // Even rows: pixels at columns 0,2,4,6 -> bits 7,5,3,1 of every
        // plane; odd rows shifted one column right.
        for row in 0..TILE_SIZE {
            let expected = if row % 2 == 0 { 0xAA } else { 0x55 };
            for plane in 0..4 {
                assert_eq!(bytes[row * 4 + plane], expected, "row {} plane {}", row, plane);
            }
        }
    }

    #[test]
    fn test_ms_single_pixel_vector() {
        let mut pixels = [0u8; PIXELS_PER_TILE];
        pixels[0] = 1;
        let bytes = encode_master_system(&pixels);
        assert_eq!(bytes[0], 0x80);
        assert!(bytes[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_ms_roundtrip() {
        let pixels = scramble(15);
        assert_eq!(decode_master_system(&encode_master_system(&pixels)), pixels);
    }

    #[test]
    fn test_gg_matches_ms_layout() {
        let pixels = scramble(15);
        assert_eq!(encode_game_gear(&pixels), encode_master_system(&pixels));
        assert_eq!(decode_game_gear(&encode_game_gear(&pixels)), pixels);
    }

    #[test]
    fn test_gb_all_black_tile_is_16_zero_bytes() {
        assert_eq!(encode_game_boy(&[0; PIXELS_PER_TILE]), [0u8; 16]);
        assert_eq!(decode_game_boy(&[0u8; 16]), [0; PIXELS_PER_TILE]);
    }

    #[test]
    fn test_gb_all_max() {
        assert_eq!(encode_game_boy(&[3; PIXELS_PER_TILE]), [0xFF; 16]);
    }

    #[test]
    fn test_gb_checkerboard_vector() {
        let bytes = encode_game_boy(&checkerboard(3));
        // Low bit at low column: even rows have columns 0,2,4,6 set ->
        // bits 0,2,4,6 -> 0x55 in both planes.
        for row in 0..TILE_SIZE {
            let expected = if row % 2 == 0 { 0x55 } else { 0xAA };
            assert_eq!(bytes[row * 2], expected, "row {} plane 0", row);
            assert_eq!(bytes[row * 2 + 1], expected, "row {} plane 1", row);
        }
    }

    #[test]
    fn test_gb_single_pixel_vector() {
        let mut pixels = [0u8; PIXELS_PER_TILE];
        pixels[0] = 1;
        let bytes = encode_game_boy(&pixels);
        assert_eq!(bytes[0], 0x01);
        assert!(bytes[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_gb_roundtrip() {
        let pixels = scramble(3);
        assert_eq!(decode_game_boy(&encode_game_boy(&pixels)), pixels);
    }

    #[test]
    fn test_nes_plane_blocks_not_interleaved() {
        let mut pixels = [0u8; PIXELS_PER_TILE];
        pixels[7 * TILE_SIZE] = 2; // bottom-left pixel, plane 1 only
        let bytes = encode_nes(&pixels);
        assert_eq!(&bytes[0..8], &[0u8; 8]); // plane 0 empty
        assert_eq!(bytes[8 + 7], 0x80); // plane 1, last row, MSB
    }

    #[test]
    fn test_nes_checkerboard_vector() {
        let bytes = encode_nes(&checkerboard(3));
        for row in 0..TILE_SIZE {
            let expected = if row % 2 == 0 { 0xAA } else { 0x55 };
            assert_eq!(bytes[row], expected, "plane 0 row {}", row);
            assert_eq!(bytes[8 + row], expected, "plane 1 row {}", row);
        }
    }

    #[test]
    fn test_nes_all_max() {
        assert_eq!(encode_nes(&[3; PIXELS_PER_TILE]), [0xFF; 16]);
    }

    #[test]
    fn test_nes_roundtrip() {
        let pixels = scramble(3);
        assert_eq!(decode_nes(&encode_nes(&pixels)), pixels);
    }

    #[test]
    fn test_out_of_depth_bits_masked_on_2bpp() {
        // Value 7 on a 2-plane system contributes only its low 2 bits.
        let mut pixels = [0u8; PIXELS_PER_TILE];
        pixels[0] = 7;
        let mut expected = [0u8; PIXELS_PER_TILE];
        expected[0] = 3;
        assert_eq!(decode_game_boy(&encode_game_boy(&pixels)), expected);
        assert_eq!(decode_nes(&encode_nes(&pixels)), expected);
    }

    #[test]
    fn test_decode_tile_rejects_wrong_length() {
        let err = decode_tile(System::Ms, "t", &[0u8; 16]).unwrap_err();
        assert_eq!(
            err,
            CodecError::BadTileLength { system: System::Ms, expected: 32, actual: 16 }
        );
        assert!(decode_tile(System::Gb, "t", &[0u8; 32]).is_err());
    }

    #[test]
    fn test_tile_roundtrip_all_systems() {
        for system in System::ALL {
            let tile = Tile::from_bytes("t", &scramble(system.max_index())).unwrap();
            let encoded = encode_tile(system, &tile);
            assert_eq!(encoded.len(), system.bytes_per_tile());
            let decoded = decode_tile(system, "t", &encoded).unwrap();
            assert_eq!(decoded, tile, "round-trip failed for {}", system);
        }
    }

    #[test]
    fn test_tile_set_roundtrip() {
        let mut set = TileSet::with_tile_width(2);
        for i in 0..4u8 {
            set.add(Tile::from_bytes(format!("tile{}", i), &[i % 4; PIXELS_PER_TILE]).unwrap());
        }
        let bytes = encode_tile_set(System::Nes, &set);
        assert_eq!(bytes.len(), 4 * 16);
        let decoded = decode_tile_set(System::Nes, &bytes, 2).unwrap();
        assert_eq!(decoded.len(), 4);
        for i in 0..4 {
            assert_eq!(decoded.get(i).unwrap().data(), set.get(i).unwrap().data());
        }
    }

    #[test]
    fn test_decode_tile_set_rejects_misaligned_buffer() {
        let err = decode_tile_set(System::Gb, &[0u8; 20], 1).unwrap_err();
        assert_eq!(
            err,
            CodecError::MisalignedBuffer { system: System::Gb, tile_size: 16, actual: 20 }
        );
    }
}
