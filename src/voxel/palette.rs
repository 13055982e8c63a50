//! Palettes and palette index maps
//!
//! A palette is exactly 256 RGBA entries — the output format reserves
//! a fixed-size color table and index 0 means "empty", so anything
//! other than 256 entries is rejected up front, before any generation
//! work runs. The index map picks which of those 256 slots trunk and
//! leaf cells may use; well-known sheet names carry their own slot
//! assignments.

use std::num::NonZeroU8;
use std::ops::Range;
use std::path::Path;

use crate::core::error::Error;
use crate::core::types::Result;

/// Number of entries in a palette.
pub const PALETTE_SIZE: usize = 256;

/// An exactly-256-entry RGBA color table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
}

impl Palette {
    /// Validate a color table. Anything but exactly 256 entries fails.
    pub fn new(colors: Vec<[u8; 4]>) -> Result<Self> {
        if colors.len() != PALETTE_SIZE {
            return Err(Error::PaletteFormat {
                expected: PALETTE_SIZE,
                found: colors.len(),
            });
        }
        Ok(Self { colors })
    }

    /// Decode a palette sheet from a PNG file.
    ///
    /// Any image shape works (16x16 and 256x1 sheets are the common
    /// ones) as long as it holds exactly 256 pixels; they are read in
    /// row order.
    pub fn from_png(path: &Path) -> Result<Self> {
        let sheet = image::open(path)
            .map_err(|e| Error::PaletteImage(e.to_string()))?
            .to_rgba8();
        let colors = sheet.pixels().map(|p| p.0).collect();
        Self::new(colors)
    }

    /// Built-in fallback sheet: transparent index 0, a green ramp in
    /// the default leaf slots, a brown ramp in the default trunk
    /// slots, neutral grays elsewhere.
    pub fn builtin() -> Self {
        let mut colors = vec![[0u8, 0, 0, 0]; PALETTE_SIZE];
        for (i, color) in colors.iter_mut().enumerate().skip(1) {
            let v = (64 + (i % 16) * 12) as u8;
            *color = [v, v, v, 255];
        }
        for i in 9..=17usize {
            let g = (120 + (i - 9) * 12) as u8;
            colors[i] = [40, g, 30, 255];
        }
        for i in 57..=65usize {
            let r = (90 + (i - 57) * 6) as u8;
            colors[i] = [r, r / 2 + 20, 25, 255];
        }
        Self { colors }
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }
}

/// Palette slots usable by trunk and leaf cells.
///
/// Both lists are non-empty and hold indices in 1..=255; the color
/// pass cycles through them in shuffled cell order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteIndexMap {
    trunk: Vec<NonZeroU8>,
    leaf: Vec<NonZeroU8>,
}

/// Default two-tone trunk slots.
const DEFAULT_TRUNK: [u8; 2] = [57, 65];
/// Default two-tone leaf slots.
const DEFAULT_LEAF: [u8; 2] = [9, 17];

impl Default for PaletteIndexMap {
    fn default() -> Self {
        Self::new(&DEFAULT_TRUNK, &DEFAULT_LEAF)
    }
}

impl PaletteIndexMap {
    /// Build a map from raw index lists. Zero entries (the "empty"
    /// index) are dropped; a list left empty falls back to the default
    /// slots for its category.
    pub fn new(trunk: &[u8], leaf: &[u8]) -> Self {
        Self {
            trunk: sanitize(trunk, &DEFAULT_TRUNK),
            leaf: sanitize(leaf, &DEFAULT_LEAF),
        }
    }

    /// Slot assignment for a named palette sheet (file name or stem).
    /// Unknown names get the default map.
    pub fn for_palette(name: &str) -> Self {
        let stem = name.strip_suffix(".png").unwrap_or(name);
        match stem {
            "blossom" => Self::new(&span(57..65), &span(9..25)),
            "oak1" => Self::new(&span(65..73), &span(9..17)),
            "tree_basic" | "autumn" | "birch" | "dead" | "oak2" | "tree_sapling"
            | "pine_basic" | "redpine" | "pine_sapling" | "scotspine" => {
                Self::new(&span(57..65), &span(9..17))
            }
            _ => Self::default(),
        }
    }

    /// Trunk slot for the k-th cell in shuffled order.
    pub fn trunk_index(&self, k: usize) -> NonZeroU8 {
        self.trunk[k % self.trunk.len()]
    }

    /// Leaf slot for the k-th cell in shuffled order.
    pub fn leaf_index(&self, k: usize) -> NonZeroU8 {
        self.leaf[k % self.leaf.len()]
    }

    pub fn trunk(&self) -> &[NonZeroU8] {
        &self.trunk
    }

    pub fn leaf(&self) -> &[NonZeroU8] {
        &self.leaf
    }
}

fn sanitize(indices: &[u8], fallback: &[u8]) -> Vec<NonZeroU8> {
    let cleaned: Vec<NonZeroU8> = indices.iter().copied().filter_map(NonZeroU8::new).collect();
    if cleaned.is_empty() {
        fallback.iter().copied().filter_map(NonZeroU8::new).collect()
    } else {
        cleaned
    }
}

fn span(range: Range<u8>) -> Vec<u8> {
    range.collect()
}
