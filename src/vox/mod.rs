//! MagicaVoxel .vox container writer
//!
//! Encodes a colored grid plus its palette into the chunked container:
//! `"VOX "` magic and version 150, then a MAIN chunk nesting SIZE
//! (volume dimensions), XYZI (voxel records) and RGBA (the color
//! table). Every chunk is framed as a 4-byte ASCII tag, an i32 content
//! length and an i32 children length; MAIN carries no content of its
//! own and declares the true byte length of its nested chunks. All
//! integers are little-endian.

use std::path::Path;

use crate::core::types::Result;
use crate::voxel::grid::{GRID_SIZE, VoxelGrid};
use crate::voxel::palette::{PALETTE_SIZE, Palette};

/// File magic.
pub const VOX_MAGIC: &[u8; 4] = b"VOX ";
/// Container format version.
pub const VOX_VERSION: i32 = 150;

/// Append one framed chunk.
fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], content: &[u8], children: &[u8]) {
    out.extend_from_slice(tag);
    out.extend_from_slice(&(content.len() as i32).to_le_bytes());
    out.extend_from_slice(&(children.len() as i32).to_le_bytes());
    out.extend_from_slice(content);
    out.extend_from_slice(children);
}

/// Encode a finished grid and its palette into a .vox byte buffer.
///
/// Records follow the grid's canonical cell order. The grid is y-up
/// while the format is z-up, so each record is written as
/// (x, z, y, color index).
pub fn encode(grid: &VoxelGrid, palette: &Palette) -> Vec<u8> {
    let mut size = Vec::with_capacity(12);
    for extent in [GRID_SIZE; 3] {
        size.extend_from_slice(&extent.to_le_bytes());
    }

    let cells = grid.sorted_cells();
    let mut xyzi = Vec::with_capacity(4 + cells.len() * 4);
    xyzi.extend_from_slice(&(cells.len() as i32).to_le_bytes());
    for (pos, index) in &cells {
        xyzi.extend_from_slice(&[pos.x as u8, pos.z as u8, pos.y as u8, index.get()]);
    }

    let mut rgba = Vec::with_capacity(PALETTE_SIZE * 4);
    for color in palette.colors() {
        rgba.extend_from_slice(color);
    }

    let mut children = Vec::new();
    write_chunk(&mut children, b"SIZE", &size, &[]);
    write_chunk(&mut children, b"XYZI", &xyzi, &[]);
    write_chunk(&mut children, b"RGBA", &rgba, &[]);

    let mut out = Vec::with_capacity(8 + 12 + children.len());
    out.extend_from_slice(VOX_MAGIC);
    out.extend_from_slice(&VOX_VERSION.to_le_bytes());
    write_chunk(&mut out, b"MAIN", &[], &children);
    out
}

/// Write an encoded model to disk, creating parent directories as
/// needed.
pub fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
