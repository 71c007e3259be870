//! Target console systems and their fixed graphics parameters
//!
//! Every codec, palette and quantization decision keys off the target
//! system: Master System and Game Gear store 4 bits per pixel, Game Boy
//! and NES store 2. Once a caller has named a system explicitly there is
//! no guessing - an unknown tag is an error, never a silent default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::color::Rgb;
use crate::palettes;

/// Error for an unrecognized system tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported system '{0}', expected one of: ms, gg, gb, nes")]
pub struct UnsupportedSystem(pub String);

/// A supported target console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum System {
    /// Sega Master System
    Ms,
    /// Sega Game Gear
    Gg,
    /// Nintendo Game Boy
    Gb,
    /// Nintendo Entertainment System
    Nes,
}

impl System {
    /// All supported systems, in tag order.
    pub const ALL: [System; 4] = [System::Ms, System::Gg, System::Gb, System::Nes];

    /// Bits stored per pixel (number of bit planes).
    pub fn bits_per_pixel(self) -> u8 {
        match self {
            System::Ms | System::Gg => 4,
            System::Gb | System::Nes => 2,
        }
    }

    /// Number of colours a palette for this system holds.
    pub fn colour_count(self) -> usize {
        match self {
            System::Ms | System::Gg => 16,
            System::Gb | System::Nes => 4,
        }
    }

    /// Largest palette index a pixel may carry on this system.
    pub fn max_index(self) -> u8 {
        (1 << self.bits_per_pixel()) - 1
    }

    /// Encoded size of one 8x8 tile in bytes.
    pub fn bytes_per_tile(self) -> usize {
        8 * self.bits_per_pixel() as usize
    }

    /// The short tag used in snapshots and on the command line.
    pub fn tag(self) -> &'static str {
        match self {
            System::Ms => "ms",
            System::Gg => "gg",
            System::Gb => "gb",
            System::Nes => "nes",
        }
    }

    /// Round an arbitrary RGB colour to the nearest colour the system's
    /// video hardware can actually display.
    ///
    /// Master System has 2 bits per channel, Game Gear 4. Game Boy maps
    /// via luminance onto its 4 green shades; NES picks the nearest entry
    /// of its fixed 64-colour master palette.
    pub fn nearest_displayable(self, colour: Rgb) -> Rgb {
        match self {
            System::Ms => Rgb::new(
                round_channel(colour.r, 85),
                round_channel(colour.g, 85),
                round_channel(colour.b, 85),
            ),
            System::Gg => Rgb::new(
                round_channel(colour.r, 17),
                round_channel(colour.g, 17),
                round_channel(colour.b, 17),
            ),
            System::Gb => {
                let shades = palettes::GAME_BOY_SHADES;
                // Darkest shade is index 0; brighter luminance picks a later slot.
                let lum = luminance(colour);
                let slot = (lum as usize * shades.len() / 256).min(shades.len() - 1);
                shades[slot]
            }
            System::Nes => nearest_in(&palettes::NES_MASTER, colour),
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for System {
    type Err = UnsupportedSystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" => Ok(System::Ms),
            "gg" => Ok(System::Gg),
            "gb" => Ok(System::Gb),
            "nes" => Ok(System::Nes),
            other => Err(UnsupportedSystem(other.to_string())),
        }
    }
}

/// Round a channel value to the nearest multiple of `step`.
fn round_channel(value: u8, step: u16) -> u8 {
    let rounded = ((value as u16 + step / 2) / step) * step;
    rounded.min(255) as u8
}

/// Integer approximation of perceptual luminance (ITU-R BT.601 weights).
fn luminance(colour: Rgb) -> u8 {
    let lum = (299 * colour.r as u32 + 587 * colour.g as u32 + 114 * colour.b as u32) / 1000;
    lum.min(255) as u8
}

/// Nearest colour in `table` by squared RGB distance; first entry wins ties.
fn nearest_in(table: &[Rgb], colour: Rgb) -> Rgb {
    let mut best = table[0];
    let mut best_dist = u32::MAX;
    for &candidate in table {
        let dr = candidate.r as i32 - colour.r as i32;
        let dg = candidate.g as i32 - colour.g as i32;
        let db = candidate.b as i32 - colour.b as i32;
        let dist = (dr * dr + dg * dg + db * db) as u32;
        if dist < best_dist {
            best_dist = dist;
            best = candidate;
        }
    }
    best
}
