//! Built-in hardware reference palettes.
//!
//! These are the fixed colour sets the target consoles can physically
//! display, exposed as owned constant tables. Image import matches
//! photographic colours against them with `--match-palette`.

use crate::color::Rgb;

/// List of all available built-in palette names.
const BUILTIN_NAMES: &[&str] = &["master-system", "game-boy", "nes"];

/// The full Master System ramp: 2 bits per channel, 64 colours.
///
/// Hardware colour byte is `--BBGGRR`, so the table is ordered with red
/// varying fastest.
pub const MASTER_SYSTEM: [Rgb; 64] = master_system_ramp();

/// The four DMG green shades, darkest first.
/// Reference: https://lospec.com/palette-list/nintendo-gameboy-bgb
pub const GAME_BOY_SHADES: [Rgb; 4] = [
    Rgb::new(0x0F, 0x38, 0x0F),
    Rgb::new(0x30, 0x62, 0x30),
    Rgb::new(0x8B, 0xAC, 0x0F),
    Rgb::new(0x9B, 0xBC, 0x0F),
];

/// Canonical NES (2C02) master palette, 64 entries in hardware order.
/// Reference: https://www.nesdev.org/wiki/PPU_palettes
pub const NES_MASTER: [Rgb; 64] = [
    Rgb::new(0x7C, 0x7C, 0x7C), Rgb::new(0x00, 0x00, 0xFC), Rgb::new(0x00, 0x00, 0xBC), Rgb::new(0x44, 0x28, 0xBC),
    Rgb::new(0x94, 0x00, 0x84), Rgb::new(0xA8, 0x00, 0x20), Rgb::new(0xA8, 0x10, 0x00), Rgb::new(0x88, 0x14, 0x00),
    Rgb::new(0x50, 0x30, 0x00), Rgb::new(0x00, 0x78, 0x00), Rgb::new(0x00, 0x68, 0x00), Rgb::new(0x00, 0x58, 0x00),
    Rgb::new(0x00, 0x40, 0x58), Rgb::new(0x00, 0x00, 0x00), Rgb::new(0x00, 0x00, 0x00), Rgb::new(0x00, 0x00, 0x00),
    Rgb::new(0xBC, 0xBC, 0xBC), Rgb::new(0x00, 0x78, 0xF8), Rgb::new(0x00, 0x58, 0xF8), Rgb::new(0x68, 0x44, 0xFC),
    Rgb::new(0xD8, 0x00, 0xCC), Rgb::new(0xE4, 0x00, 0x58), Rgb::new(0xF8, 0x38, 0x00), Rgb::new(0xE4, 0x5C, 0x10),
    Rgb::new(0xAC, 0x7C, 0x00), Rgb::new(0x00, 0xB8, 0x00), Rgb::new(0x00, 0xA8, 0x00), Rgb::new(0x00, 0xA8, 0x44),
    Rgb::new(0x00, 0x88, 0x88), Rgb::new(0x00, 0x00, 0x00), Rgb::new(0x00, 0x00, 0x00), Rgb::new(0x00, 0x00, 0x00),
    Rgb::new(0xF8, 0xF8, 0xF8), Rgb::new(0x3C, 0xBC, 0xFC), Rgb::new(0x68, 0x88, 0xFC), Rgb::new(0x98, 0x78, 0xF8),
    Rgb::new(0xF8, 0x78, 0xF8), Rgb::new(0xF8, 0x58, 0x98), Rgb::new(0xF8, 0x78, 0x58), Rgb::new(0xFC, 0xA0, 0x44),
    Rgb::new(0xF8, 0xB8, 0x00), Rgb::new(0xB8, 0xF8, 0x18), Rgb::new(0x58, 0xD8, 0x54), Rgb::new(0x58, 0xF8, 0x98),
    Rgb::new(0x00, 0xE8, 0xD8), Rgb::new(0x78, 0x78, 0x78), Rgb::new(0x00, 0x00, 0x00), Rgb::new(0x00, 0x00, 0x00),
    Rgb::new(0xFC, 0xFC, 0xFC), Rgb::new(0xA4, 0xE4, 0xFC), Rgb::new(0xB8, 0xB8, 0xF8), Rgb::new(0xD8, 0xB8, 0xF8),
    Rgb::new(0xF8, 0xB8, 0xF8), Rgb::new(0xF8, 0xA4, 0xC0), Rgb::new(0xF0, 0xD0, 0xB0), Rgb::new(0xFC, 0xE0, 0xA8),
    Rgb::new(0xF8, 0xD8, 0x78), Rgb::new(0xD8, 0xF8, 0x78), Rgb::new(0xB8, 0xF8, 0xB8), Rgb::new(0xB8, 0xF8, 0xD8),
    Rgb::new(0x00, 0xFC, 0xFC), Rgb::new(0xF8, 0xD8, 0xF8), Rgb::new(0x00, 0x00, 0x00), Rgb::new(0x00, 0x00, 0x00),
];

/// Build the full 64-entry Master System ramp at compile time.
const fn master_system_ramp() -> [Rgb; 64] {
    const LEVELS: [u8; 4] = [0, 85, 170, 255];
    let mut table = [Rgb::new(0, 0, 0); 64];
    let mut i = 0;
    while i < 64 {
        table[i] = Rgb::new(LEVELS[i & 3], LEVELS[(i >> 2) & 3], LEVELS[(i >> 4) & 3]);
        i += 1;
    }
    table
}

/// Returns a list of all available built-in palette names.
pub fn list_builtins() -> Vec<&'static str> {
    BUILTIN_NAMES.to_vec()
}

/// Returns a built-in palette table by name, or None if not found.
pub fn get_builtin(name: &str) -> Option<&'static [Rgb]> {
    match name {
        "master-system" => Some(&MASTER_SYSTEM),
        "game-boy" => Some(&GAME_BOY_SHADES),
        "nes" => Some(&NES_MASTER),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_builtins() {
        let builtins = list_builtins();
        assert!(builtins.contains(&"master-system"));
        assert!(builtins.contains(&"game-boy"));
        assert!(builtins.contains(&"nes"));
        assert_eq!(builtins.len(), 3);
    }

    #[test]
    fn test_master_system_ramp_corners() {
        assert_eq!(MASTER_SYSTEM[0], Rgb::new(0, 0, 0));
        assert_eq!(MASTER_SYSTEM[3], Rgb::new(255, 0, 0));
        assert_eq!(MASTER_SYSTEM[12], Rgb::new(0, 255, 0));
        assert_eq!(MASTER_SYSTEM[48], Rgb::new(0, 0, 255));
        assert_eq!(MASTER_SYSTEM[63], Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_master_system_ramp_is_distinct() {
        for i in 0..64 {
            for j in (i + 1)..64 {
                assert_ne!(MASTER_SYSTEM[i], MASTER_SYSTEM[j], "entries {} and {} collide", i, j);
            }
        }
    }

    #[test]
    fn test_game_boy_shades_darkest_first() {
        assert_eq!(GAME_BOY_SHADES[0], Rgb::new(0x0F, 0x38, 0x0F));
        assert_eq!(GAME_BOY_SHADES[3], Rgb::new(0x9B, 0xBC, 0x0F));
    }

    #[test]
    fn test_nes_master_known_entries() {
        assert_eq!(NES_MASTER[0], Rgb::new(0x7C, 0x7C, 0x7C));
        assert_eq!(NES_MASTER[32], Rgb::new(0xF8, 0xF8, 0xF8));
    }

    #[test]
    fn test_get_builtin_nonexistent() {
        assert!(get_builtin("nonexistent").is_none());
        assert!(get_builtin("").is_none());
        assert!(get_builtin("Master-System").is_none()); // case-sensitive
    }

    #[test]
    fn test_get_builtin_lengths() {
        assert_eq!(get_builtin("master-system").unwrap().len(), 64);
        assert_eq!(get_builtin("game-boy").unwrap().len(), 4);
        assert_eq!(get_builtin("nes").unwrap().len(), 64);
    }
}
