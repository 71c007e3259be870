//! Palettes and the ordered palette list
//!
//! A palette's colour count is fixed by its target system: 16 entries
//! for Master System and Game Gear, 4 for Game Boy and NES. That count
//! is an invariant - slot access is bounds-checked and construction from
//! external data rejects wrong-sized colour sets.

use std::collections::HashMap;
use thiserror::Error;

use crate::color::Rgb;
use crate::system::System;

/// Error type for palette construction and slot access
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// Colour slot outside the palette's fixed size
    #[error("colour slot {index} out of range, palette has {len} slots")]
    SlotOutOfRange { index: usize, len: usize },
    /// Construction with the wrong number of colours for the system
    #[error("{actual} colours supplied, system '{system}' requires exactly {expected}")]
    WrongColourCount { system: System, expected: usize, actual: usize },
}

/// An ordered set of RGB colours sized for a target system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    id: String,
    pub title: String,
    system: System,
    colours: Vec<Rgb>,
}

impl Palette {
    /// Create a palette filled with black, sized for the system.
    pub fn new(id: impl Into<String>, title: impl Into<String>, system: System) -> Self {
        Palette {
            id: id.into(),
            title: title.into(),
            system,
            colours: vec![Rgb::new(0, 0, 0); system.colour_count()],
        }
    }

    /// Create a palette from an explicit colour set.
    ///
    /// # Errors
    ///
    /// Rejects colour sets whose length is not the system's fixed count.
    pub fn with_colours(
        id: impl Into<String>,
        title: impl Into<String>,
        system: System,
        colours: Vec<Rgb>,
    ) -> Result<Self, PaletteError> {
        let expected = system.colour_count();
        if colours.len() != expected {
            return Err(PaletteError::WrongColourCount {
                system,
                expected,
                actual: colours.len(),
            });
        }
        Ok(Palette { id: id.into(), title: title.into(), system, colours })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn system(&self) -> System {
        self.system
    }

    pub fn colours(&self) -> &[Rgb] {
        &self.colours
    }

    /// Read the colour in a slot.
    pub fn colour_at(&self, index: usize) -> Result<Rgb, PaletteError> {
        self.colours
            .get(index)
            .copied()
            .ok_or(PaletteError::SlotOutOfRange { index, len: self.colours.len() })
    }

    /// Write the colour in a slot.
    ///
    /// Returns `Ok(true)` if the stored colour changed.
    pub fn set_colour_at(&mut self, index: usize, colour: Rgb) -> Result<bool, PaletteError> {
        let len = self.colours.len();
        let slot = self
            .colours
            .get_mut(index)
            .ok_or(PaletteError::SlotOutOfRange { index, len })?;
        if *slot == colour {
            return Ok(false);
        }
        *slot = colour;
        Ok(true)
    }
}

/// An ordered, id-indexed collection of palettes.
///
/// The id lookup map is owned alongside the ordered list and rebuilt by
/// a single method on every structural mutation, never left to drift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteList {
    palettes: Vec<Palette>,
    by_id: HashMap<String, usize>,
}

impl PaletteList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Palette> {
        self.palettes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Palette> {
        self.palettes.get(index)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Palette> {
        self.by_id.get(id).and_then(|&i| self.palettes.get(i))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Append a palette.
    pub fn add(&mut self, palette: Palette) {
        self.palettes.push(palette);
        self.rebuild_index();
    }

    /// Insert a palette at a position, shifting later entries.
    pub fn insert(&mut self, index: usize, palette: Palette) {
        let index = index.min(self.palettes.len());
        self.palettes.insert(index, palette);
        self.rebuild_index();
    }

    /// Remove a palette by id; returns it if present.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Palette> {
        let index = self.by_id.get(id).copied()?;
        let palette = self.palettes.remove(index);
        self.rebuild_index();
        Some(palette)
    }

    /// Rebuild the id lookup map from the ordered list.
    ///
    /// Duplicate ids keep the first occurrence.
    fn rebuild_index(&mut self) {
        self.by_id.clear();
        for (i, palette) in self.palettes.iter().enumerate() {
            self.by_id.entry(palette.id().to_string()).or_insert(i);
        }
    }
}

impl FromIterator<Palette> for PaletteList {
    fn from_iter<I: IntoIterator<Item = Palette>>(iter: I) -> Self {
        let mut list = PaletteList::new();
        list.palettes = iter.into_iter().collect();
        list.rebuild_index();
        list
    }
}
