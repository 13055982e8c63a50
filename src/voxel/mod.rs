//! Voxel grid data structures and operations

pub mod color;
pub mod grid;
pub mod palette;
pub mod stamp;

pub use color::assign_colors;
pub use grid::{Cell, GRID_SIZE, GridBuilder, VoxelGrid, in_bounds};
pub use palette::{PALETTE_SIZE, Palette, PaletteIndexMap};
pub use stamp::{stamp_ball, stamp_segment};
