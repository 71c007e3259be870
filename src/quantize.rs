//! Colour quantization and fixed-palette matching
//!
//! Reduces an observed colour population (each colour with a usage
//! count) to a small representative set, or matches it against a fixed
//! hardware palette. The algorithm is deliberately greedy and
//! popularity-first rather than cluster-optimal: the most-used colour
//! always wins as a representative, the tolerance window is a symmetric
//! per-channel cube, and the factor steps are fixed - so the exact
//! output for a given photograph is reproducible run to run.

use std::collections::HashMap;

use crate::color::Rgb;

/// Tolerance factor ceiling for fixed-target matching.
pub const FACTOR_SATURATION: u16 = 256;

/// A representative colour with the observed colours it absorbed.
///
/// `matched_colours` lists every original hex value that maps to this
/// representative; an original colour is either a representative itself
/// or appears in exactly one representative's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColourMatch {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub hex: String,
    pub count: u32,
    pub matched_colours: Vec<String>,
}

impl ColourMatch {
    pub fn new(colour: Rgb, count: u32) -> Self {
        ColourMatch {
            r: colour.r,
            g: colour.g,
            b: colour.b,
            hex: colour.to_hex(),
            count,
            matched_colours: Vec::new(),
        }
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Result of matching observed colours against a fixed target palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteMatchResult {
    /// One entry per target colour, in target order. Targets that
    /// absorbed nothing are still present with a zero count.
    pub matches: Vec<ColourMatch>,
    /// Observed colours that found no home even at factor saturation.
    /// Best-effort leftovers - surfaced, never dropped silently.
    pub unmatched: Vec<ColourMatch>,
}

/// Build the observed-colour population from a pixel stream, in
/// first-seen order.
pub fn colour_counts(pixels: impl IntoIterator<Item = Rgb>) -> Vec<ColourMatch> {
    let mut counts: HashMap<Rgb, u32> = HashMap::new();
    let mut order: Vec<Rgb> = Vec::new();
    for pixel in pixels {
        let entry = counts.entry(pixel).or_insert(0);
        if *entry == 0 {
            order.push(pixel);
        }
        *entry += 1;
    }
    order.into_iter().map(|c| ColourMatch::new(c, counts[&c])).collect()
}

/// One greedy grouping pass at a fixed tolerance factor.
///
/// Candidates are sorted by usage count descending (stable, so
/// equal-count colours keep their input order). Each colour in that
/// order becomes a base unless an earlier base already absorbed it; a
/// base absorbs every remaining colour whose R, G and B all fall within
/// `[base - factor/2, base + factor/2]`, summing counts and taking over
/// its matched hex values. First base in popularity order wins - by
/// contract, not accident.
pub fn group_similar_colours(colours: &[ColourMatch], factor: u16) -> Vec<ColourMatch> {
    let mut pool: Vec<ColourMatch> = colours.to_vec();
    pool.sort_by(|a, b| b.count.cmp(&a.count));

    let mut groups: Vec<ColourMatch> = Vec::new();
    while !pool.is_empty() {
        let mut base = pool.remove(0);
        let mut remaining = Vec::with_capacity(pool.len());
        for candidate in pool {
            if within_window(base.rgb(), candidate.rgb(), factor) {
                absorb(&mut base, candidate);
            } else {
                remaining.push(candidate);
            }
        }
        pool = remaining;
        groups.push(base);
    }
    groups
}

/// Group colours, stepping the tolerance factor until at most `limit`
/// representatives remain.
///
/// Each iteration re-runs the grouping on the previous result set with
/// the factor increased by `step`, so every original colour stays
/// accounted for through its group's `matched_colours`.
pub fn reduce_to_limit(colours: &[ColourMatch], limit: usize, step: u16) -> Vec<ColourMatch> {
    let step = step.max(1);
    // Grouping can never go below one group, so a zero limit is treated
    // as one.
    let limit = limit.max(1);
    let mut factor = step;
    let mut groups = group_similar_colours(colours, factor);
    while groups.len() > limit {
        factor += step;
        groups = group_similar_colours(&groups, factor);
    }
    groups
}

/// Match observed colours against a fixed target palette.
///
/// The targets are the bases: never replaced, never dropped, kept in
/// target order even when they absorb nothing. The tolerance factor
/// grows from `step` until every observed colour has a home or the
/// factor saturates at 256; leftovers are returned, not lost.
pub fn match_to_palette(
    colours: &[ColourMatch],
    targets: &[Rgb],
    step: u16,
) -> PaletteMatchResult {
    let step = step.max(1);
    let mut matches: Vec<ColourMatch> =
        targets.iter().map(|&t| ColourMatch::new(t, 0)).collect();

    let mut pool: Vec<ColourMatch> = colours.to_vec();
    pool.sort_by(|a, b| b.count.cmp(&a.count));

    let mut factor = step;
    loop {
        let mut remaining = Vec::with_capacity(pool.len());
        for candidate in pool {
            let home = matches
                .iter_mut()
                .find(|target| within_window(target.rgb(), candidate.rgb(), factor));
            match home {
                Some(target) => absorb(target, candidate),
                None => remaining.push(candidate),
            }
        }
        pool = remaining;
        if pool.is_empty() || factor >= FACTOR_SATURATION {
            break;
        }
        factor = (factor + step).min(FACTOR_SATURATION);
    }

    PaletteMatchResult { matches, unmatched: pool }
}

/// Map every original hex value to its representative's hex value.
pub fn remap_table(groups: &[ColourMatch]) -> HashMap<String, String> {
    let mut table = HashMap::new();
    for group in groups {
        table.insert(group.hex.clone(), group.hex.clone());
        for absorbed in &group.matched_colours {
            table.insert(absorbed.clone(), group.hex.clone());
        }
    }
    table
}

/// True when every channel of `candidate` lies within the symmetric
/// window of half `factor` around `base`.
fn within_window(base: Rgb, candidate: Rgb, factor: u16) -> bool {
    let half = (factor / 2) as i32;
    (base.r as i32 - candidate.r as i32).abs() <= half
        && (base.g as i32 - candidate.g as i32).abs() <= half
        && (base.b as i32 - candidate.b as i32).abs() <= half
}

/// Fold `candidate` into `base`: counts sum, and both the candidate's
/// own hex and everything it had already absorbed move across.
fn absorb(base: &mut ColourMatch, candidate: ColourMatch) {
    base.count += candidate.count;
    if candidate.hex != base.hex {
        base.matched_colours.push(candidate.hex);
    }
    base.matched_colours.extend(candidate.matched_colours);
}
