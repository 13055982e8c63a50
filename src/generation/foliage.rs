//! Foliage generation
//!
//! Fills leaf cells around the skeleton's anchor points. Two
//! strategies, selectable per tree:
//! - `Walk`: lattice random walks radiating from every anchor, biased
//!   vertically by gravity — a loose, open canopy
//! - `Clusters`: biased ellipsoid blobs around a sampled subset of
//!   anchors with ~30% porosity — compact needle masses
//!
//! Leaves only ever claim empty cells; trunk occupancy always wins.

use glam::{IVec3, Vec3};
use rand::Rng;
use rand_pcg::Pcg64Mcg;

use crate::generation::config::{FoliageStyle, TreeParams};
use crate::voxel::grid::GridBuilder;

/// Scatter leaf cells for the configured strategy.
pub fn scatter(
    params: &TreeParams,
    anchors: &[Vec3],
    builder: &mut GridBuilder,
    rng: &mut Pcg64Mcg,
) {
    match params.foliage {
        FoliageStyle::Walk => scatter_walks(params, anchors, builder, rng),
        FoliageStyle::Clusters => scatter_clusters(params, anchors, builder, rng),
    }
}

/// Per anchor: `5·leafiness` independent walks of `50·leafiness` steps.
/// Each step records the current cell, then moves one cell along a
/// random axis; vertical steps pick their sign by weighing a uniform
/// draw against gravity. Walks may wander out of the grid and keep
/// going; out-of-bounds cells are simply dropped.
fn scatter_walks(
    params: &TreeParams,
    anchors: &[Vec3],
    builder: &mut GridBuilder,
    rng: &mut Pcg64Mcg,
) {
    let walks = (5.0 * params.leafiness) as u32;
    let steps = (50.0 * params.leafiness) as u32;

    for anchor in anchors {
        let start = anchor.floor().as_ivec3();
        for _ in 0..walks {
            let mut cell = start;
            for _ in 0..steps {
                builder.mark_leaf(cell);
                match rng.random_range(1..=6) {
                    1 => cell.x -= 1,
                    2 => cell.x += 1,
                    3 | 4 => {
                        let up = rng.random_range(-1.0..1.0f32) < params.gravity;
                        cell.y += if up { 1 } else { -1 };
                    }
                    5 => cell.z -= 1,
                    _ => cell.z += 1,
                }
            }
        }
    }
}

/// Grow ellipsoid blobs around a without-replacement sample of anchors
/// sized by leafiness. Each source runs `max(1, 4·leafiness)` passes
/// over the offsets within its ellipsoid; offsets on the disfavored
/// side of the bias axis are rejected outright, the rest survive a 30%
/// porosity roll per pass.
fn scatter_clusters(
    params: &TreeParams,
    anchors: &[Vec3],
    builder: &mut GridBuilder,
    rng: &mut Pcg64Mcg,
) {
    let radius = params.leaf_radius as i32;
    let stretch = params.leaf_stretch;
    let bias = params.leaf_bias;
    let passes = ((4.0 * params.leafiness) as u32).max(1);
    let fraction = params.leafiness.clamp(0.1, 2.0);
    let count = ((anchors.len() as f32 * fraction) as usize).min(anchors.len());
    let r2 = (radius * radius) as f32;

    let sources = rand::seq::index::sample(rng, anchors.len(), count);
    for source in sources.iter() {
        let center = anchors[source].floor().as_ivec3();
        for _ in 0..passes {
            for dx in -radius..=radius {
                for dy in -radius..=radius {
                    for dz in -radius..=radius {
                        let dist = (dx * dx + dz * dz) as f32 + (dy as f32 * stretch).powi(2);
                        if dist > r2 {
                            continue;
                        }
                        if bias < 0.0 && dy > 0 {
                            continue;
                        }
                        if bias > 0.0 && dy < 0 {
                            continue;
                        }
                        if rng.random_range(0.0..1.0f32) < 0.3 {
                            continue;
                        }
                        builder.mark_leaf(center + IVec3::new(dx, dy, dz));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> Pcg64Mcg {
        Pcg64Mcg::seed_from_u64(seed)
    }

    fn walk_params(leafiness: f32) -> TreeParams {
        TreeParams {
            foliage: FoliageStyle::Walk,
            leafiness,
            ..TreeParams::broadleaf()
        }
    }

    fn cluster_params() -> TreeParams {
        TreeParams {
            foliage: FoliageStyle::Clusters,
            ..TreeParams::conifer()
        }
    }

    #[test]
    fn test_zero_leafiness_walks_nothing() {
        let mut builder = GridBuilder::new();
        let mut r = rng(1);
        scatter(
            &walk_params(0.0),
            &[Vec3::new(128.0, 128.0, 128.0)],
            &mut builder,
            &mut r,
        );

        assert!(builder.leaf_cells().is_empty());
        // No draws were consumed either
        let mut fresh = rng(1);
        assert_eq!(r.random_range(0u32..1000), fresh.random_range(0u32..1000));
    }

    #[test]
    fn test_walks_stay_near_anchor() {
        let mut builder = GridBuilder::new();
        let anchor = Vec3::new(128.0, 128.0, 128.0);
        scatter(&walk_params(1.0), &[anchor], &mut builder, &mut rng(2));

        assert!(!builder.leaf_cells().is_empty());
        // 50 steps bound the wander distance per axis
        for cell in builder.leaf_cells() {
            assert!((cell.x - 128).abs() <= 50);
            assert!((cell.y - 128).abs() <= 50);
            assert!((cell.z - 128).abs() <= 50);
        }
    }

    #[test]
    fn test_walks_are_deterministic() {
        let anchors = [Vec3::new(100.0, 150.0, 100.0), Vec3::new(140.0, 160.0, 120.0)];
        let mut a = GridBuilder::new();
        let mut b = GridBuilder::new();
        scatter(&walk_params(1.0), &anchors, &mut a, &mut rng(9));
        scatter(&walk_params(1.0), &anchors, &mut b, &mut rng(9));

        assert_eq!(a.leaf_cells(), b.leaf_cells());
    }

    #[test]
    fn test_cluster_negative_bias_stays_below_anchor() {
        let params = TreeParams {
            leaf_bias: -1.0,
            ..cluster_params()
        };
        let anchor = Vec3::new(128.0, 128.0, 128.0);
        let mut builder = GridBuilder::new();
        scatter(&params, &[anchor], &mut builder, &mut rng(3));

        assert!(!builder.leaf_cells().is_empty());
        for cell in builder.leaf_cells() {
            assert!(cell.y <= 128);
        }
    }

    #[test]
    fn test_cluster_stretch_flattens_vertically() {
        // stretch 3 with radius 2 leaves only the dy = 0 slab
        let params = TreeParams {
            leaf_bias: 0.0,
            leaf_stretch: 3.0,
            leaf_radius: 2.0,
            ..cluster_params()
        };
        let anchor = Vec3::new(60.0, 60.0, 60.0);
        let mut builder = GridBuilder::new();
        scatter(&params, &[anchor], &mut builder, &mut rng(4));

        assert!(!builder.leaf_cells().is_empty());
        for cell in builder.leaf_cells() {
            assert_eq!(cell.y, 60);
        }
    }

    #[test]
    fn test_clusters_only_fill_empty_cells() {
        let params = cluster_params();
        let anchor = Vec3::new(128.0, 128.0, 128.0);
        let mut builder = GridBuilder::new();
        builder.stamp_trunk(IVec3::new(128, 128, 128));
        scatter(&params, &[anchor], &mut builder, &mut rng(5));

        for cell in builder.leaf_cells() {
            assert_ne!(*cell, IVec3::new(128, 128, 128));
        }
    }
}
