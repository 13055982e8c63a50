//! Voxtree - a procedural voxel tree generator

pub mod core;
pub mod generation;
pub mod vox;
pub mod voxel;

pub use generation::{FoliageStyle, TreeGenerator, TreeParams, TreeStyle};
pub use voxel::{Palette, PaletteIndexMap};
