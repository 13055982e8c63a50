//! Tree generation pipeline — grows a skeleton and rasterizes it into
//! a colored voxel model.
//!
//! The pipeline orchestrates:
//! 1. Skeleton growth (forking crown or spine + laterals, per style)
//! 2. Branch rasterization into the 256³ grid
//! 3. Foliage scatter around the skeleton's anchor points
//! 4. Palette index assignment
//!
//! All four stages draw from one seeded generator in a fixed order, so
//! a parameter set maps to exactly one model.

pub mod config;
pub mod foliage;
pub mod growth;

pub use config::{FoliageStyle, TreeParams, TreeStyle};
pub use growth::{BranchSegment, TreeSkeleton, grow};

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::vox;
use crate::voxel::color::assign_colors;
use crate::voxel::grid::{GridBuilder, VoxelGrid};
use crate::voxel::palette::{Palette, PaletteIndexMap};
use crate::voxel::stamp::stamp_segment;

/// Orchestrates tree generation: skeleton → rasterize → foliage → color.
///
/// Holds clamped parameters and no other state; every call reseeds
/// from them, so one generator yields the same model every time.
pub struct TreeGenerator {
    params: TreeParams,
}

impl TreeGenerator {
    /// Create a generator, clamping parameters into their valid ranges.
    pub fn new(params: TreeParams) -> Self {
        Self { params: params.clamped() }
    }

    /// Create a generator from a style preset and a seed.
    pub fn from_style(style: TreeStyle, seed: u64) -> Self {
        let mut params = TreeParams::from_style(style);
        params.seed = seed;
        Self::new(params)
    }

    /// The clamped parameters this generator runs with.
    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// Build the colored voxel grid for these parameters.
    pub fn build_grid(&self, slots: &PaletteIndexMap) -> VoxelGrid {
        let mut rng = Pcg64Mcg::seed_from_u64(self.params.seed);

        // 1. Grow the branch skeleton
        let skeleton = grow(&self.params, &mut rng);
        log::debug!(
            "Grew {} segments with {} foliage anchors",
            skeleton.segments.len(),
            skeleton.anchors.len()
        );

        // 2. Rasterize branch segments into the grid
        let mut builder = GridBuilder::new();
        for segment in &skeleton.segments {
            stamp_segment(
                &mut builder,
                segment.start,
                segment.end,
                segment.start_radius,
                segment.end_radius,
            );
        }

        // 3. Scatter foliage around the anchors
        foliage::scatter(&self.params, &skeleton.anchors, &mut builder, &mut rng);
        log::debug!(
            "Rasterized {} trunk cells and {} leaf cells",
            builder.trunk_cells().len(),
            builder.leaf_cells().len()
        );

        // 4. Assign palette slots
        assign_colors(builder, slots, &mut rng)
    }

    /// Generate a complete .vox model as bytes.
    pub fn generate(&self, palette: &Palette, slots: &PaletteIndexMap) -> Vec<u8> {
        let grid = self.build_grid(slots);
        let bytes = vox::encode(&grid, palette);
        log::debug!("Encoded {} voxels into {} bytes", grid.len(), bytes.len());
        bytes
    }
}
