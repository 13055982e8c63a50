//! Capsule rasterization into the voxel grid
//!
//! Branch segments are tapered capsules in continuous space. Rasterizing
//! one walks sample points along the axis at half-cell spacing and stamps
//! a solid ball at each sample, with the radius interpolated between the
//! segment's endpoint radii. Stamping is idempotent, so the heavy overlap
//! between neighboring balls just re-touches the same cells.

use glam::Vec3;

use crate::voxel::grid::GridBuilder;

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Rasterize a tapered capsule into the builder as trunk cells.
///
/// Sample count scales with segment length (two samples per cell of
/// length, minimum one step) so thin diagonal segments stay gap-free.
pub fn stamp_segment(
    builder: &mut GridBuilder,
    start: Vec3,
    end: Vec3,
    start_radius: f32,
    end_radius: f32,
) {
    let delta = end - start;
    let steps = (delta.length() * 2.0).round().max(1.0) as i32;
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let center = start + delta * t;
        let radius = lerp(start_radius, end_radius, t);
        stamp_ball(builder, center, radius);
    }
}

/// Stamp every cell whose integer offset from the center lies within
/// the Euclidean ball of the given radius.
///
/// Radius 0 stamps exactly the cell containing the center. Cells
/// falling outside the grid are dropped by the builder.
pub fn stamp_ball(builder: &mut GridBuilder, center: Vec3, radius: f32) {
    let reach = radius.ceil() as i32;
    let r2 = radius * radius;
    for dx in -reach..=reach {
        for dy in -reach..=reach {
            for dz in -reach..=reach {
                let d2 = (dx * dx + dy * dy + dz * dz) as f32;
                if d2 <= r2 {
                    let offset = Vec3::new(dx as f32, dy as f32, dz as f32);
                    builder.stamp_trunk((center + offset).floor().as_ivec3());
                }
            }
        }
    }
}
