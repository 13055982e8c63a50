//! Branch skeleton growth
//!
//! Turns a parameter set into a `TreeSkeleton`: tapered branch segments
//! to rasterize, plus foliage anchor points for the leaf pass. Two
//! models share the segment representation:
//! - broadleaf: a depth-first forking walk where length, radius, fork
//!   probability and jitter are all curves over normalized depth
//! - conifer: a single jittered vertical spine that sheds drooping
//!   lateral walks once it clears the bare-trunk height
//!
//! All random draws go through the shared generator in a fixed
//! depth-first order, so a seed fully determines the skeleton. The
//! broadleaf expansion runs on an explicit stack instead of recursing;
//! a child resolves its direction jitter only when popped, which keeps
//! the exact draw sequence of the recursive formulation (the second
//! fork arm draws after the first arm's whole subtree).

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg64Mcg;

use crate::generation::config::{TreeParams, TreeStyle};
use crate::voxel::grid::GRID_SIZE;

/// A branch segment with tapered radius.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub start_radius: f32,
    pub end_radius: f32,
}

/// Growth output: segments to rasterize plus foliage anchor points.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TreeSkeleton {
    pub segments: Vec<BranchSegment>,
    pub anchors: Vec<Vec3>,
}

/// Pending node on the expansion stack.
///
/// A non-root node stores its parent's direction plus the jitter
/// amplitude to apply; the draw happens when the node is popped.
struct GrowthNode {
    position: Vec3,
    direction: Vec3,
    depth: u32,
    pending_jitter: Option<f32>,
}

/// One uniform draw mapped to [-half, half). Always consumes exactly
/// one draw, so a zero amplitude cannot shift the draw sequence.
#[inline]
fn symmetric(rng: &mut Pcg64Mcg, half: f32) -> f32 {
    rng.random_range(-1.0..1.0f32) * half
}

#[inline]
fn normalize_or_up(v: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(Vec3::Y)
}

/// Jitter a direction by a symmetric offset per component, then
/// re-normalize.
fn jitter(rng: &mut Pcg64Mcg, direction: Vec3, half: f32) -> Vec3 {
    normalize_or_up(Vec3::new(
        direction.x + symmetric(rng, half),
        direction.y + symmetric(rng, half),
        direction.z + symmetric(rng, half),
    ))
}

/// Grid-space root of every tree: bottom face center.
fn root_position() -> Vec3 {
    Vec3::new((GRID_SIZE / 2) as f32, 0.0, (GRID_SIZE / 2) as f32)
}

/// Grow a skeleton for the configured style.
pub fn grow(params: &TreeParams, rng: &mut Pcg64Mcg) -> TreeSkeleton {
    match params.style {
        TreeStyle::Broadleaf => grow_broadleaf(params, rng),
        TreeStyle::Conifer => grow_conifer(params, rng),
    }
}

fn grow_broadleaf(params: &TreeParams, rng: &mut Pcg64Mcg) -> TreeSkeleton {
    let n = params.iterations.max(1) as f32;
    let scale = 150.0 * params.size / n;
    let trunk_radius = params.trunk_size * params.size * 6.0;
    let wide = params.wide.min(0.95);
    let len0 = scale * (1.0 - wide);
    let len1 = scale * wide;

    // Depth curves over t = sqrt(depth / n): length redistributes
    // between len0 and len1, radius tapers linearly to 0 at full depth.
    let t_at = |depth: u32| (depth as f32 / n).sqrt();
    let radius_at = |depth: u32| (1.0 - t_at(depth)) * trunk_radius;

    let mut skeleton = TreeSkeleton::default();
    let mut stack = vec![GrowthNode {
        position: root_position(),
        direction: Vec3::Y,
        depth: 0,
        pending_jitter: None,
    }];

    while let Some(node) = stack.pop() {
        let direction = match node.pending_jitter {
            Some(half) => jitter(rng, node.direction, half),
            None => node.direction,
        };

        let t = t_at(node.depth);
        let length = len0 + t * (len1 - len0);
        let end = node.position + direction * length;
        skeleton.segments.push(BranchSegment {
            start: node.position,
            end,
            start_radius: radius_at(node.depth),
            end_radius: radius_at(node.depth + 1),
        });

        if node.depth + 1 < params.iterations {
            // Fork with probability t, widening with spread; otherwise
            // extend a single child with twist jitter growing by depth
            let fork = rng.random_range(0.0..1.0f32) < t;
            let (count, var) = if fork {
                (2, 2.0 * params.spread * t)
            } else {
                (1, (node.depth + 1) as f32 * 0.2 * params.twist)
            };
            // Fork arms are identical until popped; the top of the
            // stack becomes the first arm and draws first
            for _ in 0..count {
                stack.push(GrowthNode {
                    position: end,
                    direction,
                    depth: node.depth + 1,
                    pending_jitter: Some(var),
                });
            }
        } else {
            // Terminal: anchor the tip and the segment midpoint
            skeleton.anchors.push(end);
            skeleton.anchors.push((node.position + end) / 2.0);
        }
    }

    skeleton
}

/// Fixed conifer spine step length in cells.
const SPINE_STEP: f32 = 5.0;

fn grow_conifer(params: &TreeParams, rng: &mut Pcg64Mcg) -> TreeSkeleton {
    let spine_steps = (20.0 * params.size).floor() as u32;
    let n = spine_steps.max(1) as f32;
    let trunk_width = params.size * params.trunk_size;
    let trunk_height = params.trunk_height * 10.0;
    let lateral_budget = params.branch_density * 30.0;
    let lateral_len = params.branch_length * 20.0 * params.size;
    let twist_rate = params.twist / n;

    let mut skeleton = TreeSkeleton::default();
    let mut position = root_position();
    let mut direction = Vec3::Y;

    for depth in 0..spine_steps {
        let t = depth as f32 / n;
        let radius = (1.0 - t * t) * trunk_width;
        let end = position + direction * SPINE_STEP;
        skeleton.segments.push(BranchSegment {
            start: position,
            end,
            start_radius: radius,
            end_radius: radius,
        });

        // Laterals spawn once the spine clears the bare trunk, thinning
        // toward the tip; the terminal node still sheds its single one
        if end.y > trunk_height {
            let falloff = 1.0 - (depth + 1) as f32 / n;
            let count = (falloff * lateral_budget + 1.0) as u32;
            for _ in 0..count {
                let heading = rng.random_range(0.0..std::f32::consts::TAU);
                let pitch = rng.random_range(0.5..1.0f32) * params.branch_dir;
                let lateral_dir =
                    normalize_or_up(Vec3::new(heading.cos(), pitch, heading.sin()));
                let length = falloff * lateral_len * rng.random_range(0.5..1.5f32);
                let spawn = position.lerp(end, rng.random_range(0.0..1.0f32));
                walk_lateral(&mut skeleton, rng, spawn, lateral_dir, length + 3.0);
            }
        }

        if depth + 1 < spine_steps {
            let var = (depth + 1) as f32 * 0.1 * twist_rate;
            direction = jitter(rng, direction, var);
            position = end;
        } else {
            skeleton.anchors.push(end);
            skeleton.anchors.push((position + end) / 2.0);
        }
    }

    skeleton
}

/// Walk a drooping lateral branch: radius-zero segments in ~3-cell
/// steps, jittering the heading each step with a constant upward drift,
/// anchoring foliage at every step endpoint.
fn walk_lateral(
    skeleton: &mut TreeSkeleton,
    rng: &mut Pcg64Mcg,
    start: Vec3,
    direction: Vec3,
    total_len: f32,
) {
    let steps = (total_len / 3.0).ceil().max(1.0);
    let step_len = total_len / steps;
    let drift = 1.0 / steps;
    let mut position = start;
    let mut direction = direction;

    for _ in 0..steps as u32 {
        let end = position + direction * step_len;
        direction = normalize_or_up(Vec3::new(
            direction.x + symmetric(rng, drift),
            direction.y + symmetric(rng, drift) + 0.4 * drift,
            direction.z + symmetric(rng, drift),
        ));
        skeleton.segments.push(BranchSegment {
            start: position,
            end,
            start_radius: 0.0,
            end_radius: 0.0,
        });
        skeleton.anchors.push(end);
        position = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> Pcg64Mcg {
        Pcg64Mcg::seed_from_u64(seed)
    }

    #[test]
    fn test_zero_iterations_root_is_terminal() {
        let params = TreeParams {
            iterations: 0,
            ..TreeParams::broadleaf()
        }
        .clamped();
        let skeleton = grow(&params, &mut rng(1));

        assert_eq!(skeleton.segments.len(), 1);
        assert_eq!(skeleton.anchors.len(), 2);

        let segment = &skeleton.segments[0];
        assert_eq!(segment.start, root_position());
        assert_eq!(skeleton.anchors[0], segment.end);
        assert_eq!(skeleton.anchors[1], (segment.start + segment.end) / 2.0);
    }

    #[test]
    fn test_broadleaf_is_deterministic() {
        let params = TreeParams::broadleaf();
        let a = grow(&params, &mut rng(42));
        let b = grow(&params, &mut rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let params = TreeParams::broadleaf();
        let a = grow(&params, &mut rng(1));
        let b = grow(&params, &mut rng(2));
        assert_ne!(a, b);
    }

    #[test]
    fn test_broadleaf_depth_produces_chain() {
        // Every level contributes at least one segment even if no fork
        // ever fires
        let params = TreeParams::broadleaf();
        let skeleton = grow(&params, &mut rng(7));
        assert!(skeleton.segments.len() >= params.iterations as usize);
        assert!(!skeleton.anchors.is_empty());
    }

    #[test]
    fn test_broadleaf_radius_tapers_to_zero() {
        let params = TreeParams::broadleaf();
        let skeleton = grow(&params, &mut rng(3));

        let trunk_radius = params.trunk_size * params.size * 6.0;
        assert_eq!(skeleton.segments[0].start_radius, trunk_radius);
        for segment in &skeleton.segments {
            assert!(segment.start_radius >= 0.0);
            assert!(segment.start_radius <= trunk_radius);
        }
        let min_end = skeleton
            .segments
            .iter()
            .map(|s| s.end_radius)
            .fold(f32::INFINITY, f32::min);
        assert_eq!(min_end, 0.0);
    }

    #[test]
    fn test_conifer_spine_and_laterals() {
        let params = TreeParams::conifer();
        let skeleton = grow(&params, &mut rng(5));

        // Default size 1.0 gives a 20-node spine; every lateral walk
        // segment is radius zero
        let spine: Vec<_> = skeleton
            .segments
            .iter()
            .filter(|s| s.start_radius > 0.0)
            .collect();
        let laterals = skeleton.segments.len() - spine.len();
        assert!(spine.len() >= 19);
        assert!(laterals > 0);
        assert!(skeleton.anchors.len() > 2);
    }

    #[test]
    fn test_conifer_is_deterministic() {
        let params = TreeParams::conifer();
        let a = grow(&params, &mut rng(99));
        let b = grow(&params, &mut rng(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_direction_falls_back_to_up() {
        assert_eq!(normalize_or_up(Vec3::ZERO), Vec3::Y);
    }

    #[test]
    fn test_symmetric_draw_with_zero_amplitude() {
        // Consumes a draw but contributes nothing
        let mut a = rng(11);
        let mut b = rng(11);
        assert_eq!(symmetric(&mut a, 0.0), 0.0);
        symmetric(&mut b, 1.0);
        assert_eq!(a.random_range(0u32..1000), b.random_range(0u32..1000));
    }
}
