//! Palette color assignment
//!
//! Resolves every trunk and leaf cell to a concrete palette index.
//! Each category's coordinate list is shuffled with the shared
//! generator and the category's slots are cycled over the shuffled
//! order, which interleaves the palette variants across the model
//! instead of painting spatial bands. Trunk is assigned first; leaf
//! writes only land on cells no color has claimed yet.

use rand::seq::SliceRandom;
use rand_pcg::Pcg64Mcg;

use crate::voxel::grid::{Cell, GridBuilder, VoxelGrid};
use crate::voxel::palette::PaletteIndexMap;

/// Consume the builder and return the fully colored grid.
pub fn assign_colors(
    builder: GridBuilder,
    slots: &PaletteIndexMap,
    rng: &mut Pcg64Mcg,
) -> VoxelGrid {
    let (mut grid, mut trunk, mut leaves) = builder.into_parts();

    trunk.shuffle(rng);
    for (k, &pos) in trunk.iter().enumerate() {
        grid.set_color(pos, slots.trunk_index(k));
    }

    leaves.shuffle(rng);
    for (k, &pos) in leaves.iter().enumerate() {
        if grid.get(pos) == Some(Cell::Leaf) {
            grid.set_color(pos, slots.leaf_index(k));
        }
    }

    grid
}
