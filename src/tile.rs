//! The atomic 8x8 tile
//!
//! A tile is a fixed buffer of 64 palette indices plus a string id. The
//! buffer length is an invariant, not a runtime property: the type holds
//! a `[u8; 64]` and every constructor that takes external data checks
//! the size at the boundary. Mutators report whether the stored value
//! actually changed so callers can skip redundant re-renders.

use thiserror::Error;

use crate::color::{parse_hex_pair, ColorError};

/// Tile edge length in pixels.
pub const TILE_SIZE: usize = 8;
/// Pixels per tile.
pub const PIXELS_PER_TILE: usize = TILE_SIZE * TILE_SIZE;
/// Length of a tile's canonical hex encoding (two chars per pixel).
pub const TILE_HEX_LEN: usize = PIXELS_PER_TILE * 2;
/// Largest palette index any supported system can address (4bpp).
pub const MAX_PIXEL_VALUE: u8 = 15;

/// Error type for tile construction and mutation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    /// Pixel index outside 0..64
    #[error("pixel index {0} out of range, tile has {PIXELS_PER_TILE} pixels")]
    IndexOutOfRange(usize),
    /// Palette index value above the widest supported bit depth
    #[error("pixel value {0} out of range, maximum is {MAX_PIXEL_VALUE}")]
    ValueOutOfRange(u8),
    /// Byte slice was not exactly one tile long
    #[error("tile data is {0} bytes, expected {PIXELS_PER_TILE}")]
    BadLength(usize),
    /// Hex string was not exactly 128 chars
    #[error("tile hex string is {0} chars, expected {TILE_HEX_LEN}")]
    BadHexLength(usize),
    /// Hex string contained an invalid character
    #[error(transparent)]
    Colour(#[from] ColorError),
}

/// An 8x8 tile of palette indices with a unique string id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    id: String,
    data: [u8; PIXELS_PER_TILE],
}

impl Tile {
    /// Create an all-zero (blank) tile.
    pub fn blank(id: impl Into<String>) -> Self {
        Tile { id: id.into(), data: [0; PIXELS_PER_TILE] }
    }

    /// Create a tile from a 128-char hex string, two chars per pixel.
    ///
    /// # Errors
    ///
    /// Rejects strings that are not exactly 128 hex chars, and pixel
    /// values above 15.
    pub fn from_hex(id: impl Into<String>, hex: &str) -> Result<Self, TileError> {
        if hex.len() != TILE_HEX_LEN {
            return Err(TileError::BadHexLength(hex.len()));
        }
        let mut data = [0u8; PIXELS_PER_TILE];
        for (i, pixel) in data.iter_mut().enumerate() {
            let value = parse_hex_pair(&hex[i * 2..i * 2 + 2])?;
            if value > MAX_PIXEL_VALUE {
                return Err(TileError::ValueOutOfRange(value));
            }
            *pixel = value;
        }
        Ok(Tile { id: id.into(), data })
    }

    /// Create a tile from a raw 64-byte slice of palette indices.
    ///
    /// # Errors
    ///
    /// Rejects slices that are not exactly 64 bytes, and pixel values
    /// above 15.
    pub fn from_bytes(id: impl Into<String>, bytes: &[u8]) -> Result<Self, TileError> {
        if bytes.len() != PIXELS_PER_TILE {
            return Err(TileError::BadLength(bytes.len()));
        }
        let mut data = [0u8; PIXELS_PER_TILE];
        for (pixel, &value) in data.iter_mut().zip(bytes) {
            if value > MAX_PIXEL_VALUE {
                return Err(TileError::ValueOutOfRange(value));
            }
            *pixel = value;
        }
        Ok(Tile { id: id.into(), data })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// The flat pixel buffer, row-major.
    pub fn data(&self) -> &[u8; PIXELS_PER_TILE] {
        &self.data
    }

    /// Read the pixel at a flat index.
    pub fn value_at(&self, index: usize) -> Result<u8, TileError> {
        self.data.get(index).copied().ok_or(TileError::IndexOutOfRange(index))
    }

    /// Write the pixel at a flat index.
    ///
    /// Returns `Ok(true)` if the stored value changed, `Ok(false)` for a
    /// no-op write. Callers use this to decide whether a re-render is
    /// needed.
    pub fn set_value_at(&mut self, index: usize, value: u8) -> Result<bool, TileError> {
        if value > MAX_PIXEL_VALUE {
            return Err(TileError::ValueOutOfRange(value));
        }
        let slot = self.data.get_mut(index).ok_or(TileError::IndexOutOfRange(index))?;
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        Ok(true)
    }

    /// Replace every occurrence of one palette index with another.
    ///
    /// Returns `Ok(true)` if at least one pixel changed.
    pub fn replace_colour(&mut self, from: u8, to: u8) -> Result<bool, TileError> {
        if from > MAX_PIXEL_VALUE {
            return Err(TileError::ValueOutOfRange(from));
        }
        if to > MAX_PIXEL_VALUE {
            return Err(TileError::ValueOutOfRange(to));
        }
        let mut changed = false;
        for pixel in &mut self.data {
            if *pixel == from && from != to {
                *pixel = to;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Swap two palette indices throughout the tile.
    ///
    /// Returns `Ok(true)` if at least one pixel changed.
    pub fn swap_colours(&mut self, a: u8, b: u8) -> Result<bool, TileError> {
        if a > MAX_PIXEL_VALUE {
            return Err(TileError::ValueOutOfRange(a));
        }
        if b > MAX_PIXEL_VALUE {
            return Err(TileError::ValueOutOfRange(b));
        }
        if a == b {
            return Ok(false);
        }
        let mut changed = false;
        for pixel in &mut self.data {
            if *pixel == a {
                *pixel = b;
                changed = true;
            } else if *pixel == b {
                *pixel = a;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Canonical 128-char uppercase hex encoding of the pixel buffer.
    ///
    /// Two tiles with identical pixel content produce identical strings,
    /// which is what the bundle optimizer content-addresses on.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(TILE_HEX_LEN);
        for &pixel in &self.data {
            out.push_str(&format!("{:02X}", pixel));
        }
        out
    }

    /// A copy of this tile mirrored left-to-right.
    pub fn mirrored_horizontal(&self) -> Tile {
        let mut data = [0u8; PIXELS_PER_TILE];
        for row in 0..TILE_SIZE {
            for col in 0..TILE_SIZE {
                data[row * TILE_SIZE + col] = self.data[row * TILE_SIZE + (TILE_SIZE - 1 - col)];
            }
        }
        Tile { id: self.id.clone(), data }
    }

    /// A copy of this tile mirrored top-to-bottom.
    pub fn mirrored_vertical(&self) -> Tile {
        let mut data = [0u8; PIXELS_PER_TILE];
        for row in 0..TILE_SIZE {
            let src = (TILE_SIZE - 1 - row) * TILE_SIZE;
            data[row * TILE_SIZE..row * TILE_SIZE + TILE_SIZE]
                .copy_from_slice(&self.data[src..src + TILE_SIZE]);
        }
        Tile { id: self.id.clone(), data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_tile_is_all_zero() {
        let tile = Tile::blank("t0");
        assert_eq!(tile.id(), "t0");
        assert!(tile.data().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_from_hex_roundtrip() {
        let hex: String = (0..PIXELS_PER_TILE).map(|i| format!("{:02X}", i % 16)).collect();
        let tile = Tile::from_hex("t1", &hex).unwrap();
        assert_eq!(tile.to_hex(), hex);
        assert_eq!(tile.value_at(0).unwrap(), 0);
        assert_eq!(tile.value_at(15).unwrap(), 15);
    }

    #[test]
    fn test_from_hex_rejects_wrong_length() {
        assert_eq!(Tile::from_hex("t", "00FF"), Err(TileError::BadHexLength(4)));
        let too_long = "00".repeat(PIXELS_PER_TILE + 1);
        assert_eq!(Tile::from_hex("t", &too_long), Err(TileError::BadHexLength(130)));
    }

    #[test]
    fn test_from_hex_rejects_out_of_depth_value() {
        let hex = format!("{}{}", "10", "00".repeat(PIXELS_PER_TILE - 1));
        assert_eq!(Tile::from_hex("t", &hex), Err(TileError::ValueOutOfRange(16)));
    }

    #[test]
    fn test_from_hex_rejects_bad_digit() {
        let hex = format!("{}{}", "0Z", "00".repeat(PIXELS_PER_TILE - 1));
        assert!(matches!(Tile::from_hex("t", &hex), Err(TileError::Colour(_))));
    }

    #[test]
    fn test_from_bytes_rejects_misaligned_slice() {
        assert_eq!(Tile::from_bytes("t", &[0u8; 63]), Err(TileError::BadLength(63)));
        assert_eq!(Tile::from_bytes("t", &[0u8; 65]), Err(TileError::BadLength(65)));
    }

    #[test]
    fn test_set_value_at_reports_change() {
        let mut tile = Tile::blank("t");
        assert_eq!(tile.set_value_at(10, 3), Ok(true));
        // Writing the same value again is a distinguishable no-op.
        assert_eq!(tile.set_value_at(10, 3), Ok(false));
        assert_eq!(tile.value_at(10), Ok(3));
    }

    #[test]
    fn test_set_value_at_bounds() {
        let mut tile = Tile::blank("t");
        assert_eq!(tile.set_value_at(64, 1), Err(TileError::IndexOutOfRange(64)));
        assert_eq!(tile.set_value_at(0, 16), Err(TileError::ValueOutOfRange(16)));
    }

    #[test]
    fn test_replace_colour() {
        let mut tile = Tile::blank("t");
        tile.set_value_at(0, 5).unwrap();
        tile.set_value_at(1, 5).unwrap();
        assert_eq!(tile.replace_colour(5, 7), Ok(true));
        assert_eq!(tile.value_at(0), Ok(7));
        assert_eq!(tile.value_at(1), Ok(7));
        // Nothing left at index 5
        assert_eq!(tile.replace_colour(5, 7), Ok(false));
    }

    #[test]
    fn test_swap_colours() {
        let mut tile = Tile::blank("t");
        tile.set_value_at(0, 1).unwrap();
        tile.set_value_at(1, 2).unwrap();
        assert_eq!(tile.swap_colours(1, 2), Ok(true));
        assert_eq!(tile.value_at(0), Ok(2));
        assert_eq!(tile.value_at(1), Ok(1));
        assert_eq!(tile.swap_colours(3, 3), Ok(false));
    }

    #[test]
    fn test_mirrored_horizontal() {
        let mut tile = Tile::blank("t");
        tile.set_value_at(0, 9).unwrap(); // top-left
        let mirrored = tile.mirrored_horizontal();
        assert_eq!(mirrored.value_at(7), Ok(9)); // now top-right
        assert_eq!(mirrored.value_at(0), Ok(0));
        assert_eq!(mirrored.id(), "t");
    }

    #[test]
    fn test_mirrored_vertical() {
        let mut tile = Tile::blank("t");
        tile.set_value_at(3, 9).unwrap(); // row 0, col 3
        let mirrored = tile.mirrored_vertical();
        assert_eq!(mirrored.value_at(7 * TILE_SIZE + 3), Ok(9)); // row 7, col 3
    }

    #[test]
    fn test_mirror_twice_is_identity() {
        let hex: String = (0..PIXELS_PER_TILE).map(|i| format!("{:02X}", (i * 7) % 16)).collect();
        let tile = Tile::from_hex("t", &hex).unwrap();
        assert_eq!(tile.mirrored_horizontal().mirrored_horizontal(), tile);
        assert_eq!(tile.mirrored_vertical().mirrored_vertical(), tile);
    }
}
