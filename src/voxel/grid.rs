//! Sparse voxel occupancy grid
//!
//! Trees are rasterized into a fixed 256^3 volume. The grid stores only
//! occupied cells, keyed by a packed (x, y, z) coordinate, so a typical
//! tree costs memory proportional to its voxel count rather than the
//! full volume. Coordinates are y-up; anything outside [0, 256) on any
//! axis is silently discarded at the write sites.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::num::NonZeroU8;

use glam::IVec3;

/// Edge length of the model volume in cells.
pub const GRID_SIZE: i32 = 256;

/// Whether a cell coordinate is addressable in the model volume.
#[inline]
pub fn in_bounds(pos: IVec3) -> bool {
    pos.x >= 0 && pos.x < GRID_SIZE
        && pos.y >= 0 && pos.y < GRID_SIZE
        && pos.z >= 0 && pos.z < GRID_SIZE
}

/// Pack an in-bounds cell coordinate into a sortable key (x-major, then y, then z).
#[inline]
fn pack_key(pos: IVec3) -> u32 {
    ((pos.x as u32) << 16) | ((pos.y as u32) << 8) | (pos.z as u32)
}

#[inline]
fn unpack_key(key: u32) -> IVec3 {
    IVec3::new(
        ((key >> 16) & 0xFF) as i32,
        ((key >> 8) & 0xFF) as i32,
        (key & 0xFF) as i32,
    )
}

/// Contents of one occupied cell.
///
/// Cells start life as a material category (trunk or leaf) and are
/// resolved to a palette index by the color assignment pass. Palette
/// index 0 means "empty" in the output format, so a colored cell holds
/// a `NonZeroU8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Trunk,
    Leaf,
    Colored(NonZeroU8),
}

/// Sparse cell map for one tree model.
#[derive(Debug, Default, Clone)]
pub struct VoxelGrid {
    cells: HashMap<u32, Cell>,
}

impl VoxelGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Look up a cell. Out-of-bounds coordinates are simply absent.
    pub fn get(&self, pos: IVec3) -> Option<Cell> {
        if !in_bounds(pos) {
            return None;
        }
        self.cells.get(&pack_key(pos)).copied()
    }

    /// Overwrite a cell's category with a resolved palette index.
    pub fn set_color(&mut self, pos: IVec3, index: NonZeroU8) {
        if !in_bounds(pos) {
            return;
        }
        self.cells.insert(pack_key(pos), Cell::Colored(index));
    }

    /// Colored cells in canonical order: ascending x, then y, then z.
    ///
    /// Cells still holding an unresolved category are skipped, so the
    /// result is exactly what the serializer emits.
    pub fn sorted_cells(&self) -> Vec<(IVec3, NonZeroU8)> {
        let mut cells: Vec<(u32, NonZeroU8)> = self
            .cells
            .iter()
            .filter_map(|(&key, cell)| match cell {
                Cell::Colored(index) => Some((key, *index)),
                _ => None,
            })
            .collect();
        cells.sort_unstable_by_key(|&(key, _)| key);
        cells
            .into_iter()
            .map(|(key, index)| (unpack_key(key), index))
            .collect()
    }
}

/// Accumulates a grid during rasterization.
///
/// Alongside the occupancy map it keeps the trunk and leaf coordinates
/// in insertion order, so the color pass can shuffle and cycle over
/// them without re-deriving membership from the grid. Both lists are
/// duplicate-free: a cell joins a list only when its write actually
/// claims the cell.
#[derive(Debug, Default)]
pub struct GridBuilder {
    grid: VoxelGrid,
    trunk: Vec<IVec3>,
    leaves: Vec<IVec3>,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a cell for the trunk. Out-of-bounds or already-occupied
    /// cells are left untouched.
    pub fn stamp_trunk(&mut self, pos: IVec3) {
        if !in_bounds(pos) {
            return;
        }
        if let Entry::Vacant(slot) = self.grid.cells.entry(pack_key(pos)) {
            slot.insert(Cell::Trunk);
            self.trunk.push(pos);
        }
    }

    /// Claim a cell for foliage. Trunk occupancy wins: a leaf only ever
    /// lands in an empty cell.
    pub fn mark_leaf(&mut self, pos: IVec3) {
        if !in_bounds(pos) {
            return;
        }
        if let Entry::Vacant(slot) = self.grid.cells.entry(pack_key(pos)) {
            slot.insert(Cell::Leaf);
            self.leaves.push(pos);
        }
    }

    pub fn trunk_cells(&self) -> &[IVec3] {
        &self.trunk
    }

    pub fn leaf_cells(&self) -> &[IVec3] {
        &self.leaves
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Tear down into the grid plus the two coordinate lists.
    pub fn into_parts(self) -> (VoxelGrid, Vec<IVec3>, Vec<IVec3>) {
        (self.grid, self.trunk, self.leaves)
    }
}
