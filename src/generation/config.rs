//! Tree generation parameters
//!
//! One `TreeParams` value fully determines one tree: identical params
//! (seed included) always reproduce the identical model byte-for-byte.
//! Every scalar has a documented valid range and is clamped into it by
//! `clamped()` — out-of-range input is never an error.

use serde::{Deserialize, Serialize};

/// Growth model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeStyle {
    /// Recursive forking skeleton with a rounded crown.
    #[default]
    Broadleaf,
    /// Single spine with drooping lateral branches.
    Conifer,
}

/// Foliage placement strategy, selectable independently of the growth
/// style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoliageStyle {
    /// Lattice random walks radiating from each anchor.
    #[default]
    Walk,
    /// Ellipsoidal blobs grown around a sampled subset of anchors.
    Clusters,
}

/// Parameters for tree generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Growth model.
    pub style: TreeStyle,
    /// Foliage strategy.
    pub foliage: FoliageStyle,
    /// RNG seed, clamped to [1, 9999].
    pub seed: u64,
    /// Broadleaf recursion depth, clamped to [0, 15].
    pub iterations: u32,
    /// Overall scale, clamped to [0.1, 3.0].
    pub size: f32,
    /// Trunk thickness factor, clamped to [1.0, 3.0].
    pub trunk_size: f32,
    /// Direction jitter strength, clamped to [0.0, 3.0].
    pub twist: f32,
    /// Broadleaf fork fan-out angle, clamped to [0.0, 1.0].
    pub spread: f32,
    /// Broadleaf length redistribution toward deep branches,
    /// clamped to [0.0, 1.0] (capped at 0.95 inside the model).
    pub wide: f32,
    /// Conifer bare-trunk height factor (x10 cells), clamped to [0.0, 5.0].
    pub trunk_height: f32,
    /// Conifer laterals per spine node (x30), clamped to [0.0, 3.0].
    pub branch_density: f32,
    /// Conifer lateral length factor (x20 x size), clamped to [0.0, 3.0].
    pub branch_length: f32,
    /// Conifer lateral vertical pitch, clamped to [-5.0, 5.0].
    pub branch_dir: f32,
    /// Foliage amount for both strategies, clamped to [0.0, 3.0].
    pub leafiness: f32,
    /// Walk-foliage vertical drift bias, clamped to [-1.0, 1.0].
    pub gravity: f32,
    /// Cluster ellipsoid radius in cells, clamped to [1.0, 4.0].
    pub leaf_radius: f32,
    /// Cluster vertical flattening, clamped to [0.5, 3.0].
    pub leaf_stretch: f32,
    /// Cluster vertical asymmetry, clamped to [-1.0, 1.0].
    pub leaf_bias: f32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::broadleaf()
    }
}

impl TreeParams {
    /// Broadleaf preset — forking crown with walk foliage.
    pub fn broadleaf() -> Self {
        Self {
            style: TreeStyle::Broadleaf,
            foliage: FoliageStyle::Walk,
            seed: 1,
            iterations: 12,
            size: 1.0,
            trunk_size: 1.0,
            twist: 0.5,
            spread: 0.5,
            wide: 0.5,
            trunk_height: 1.0,
            branch_density: 1.0,
            branch_length: 1.0,
            branch_dir: -0.5,
            leafiness: 1.0,
            gravity: 0.0,
            leaf_radius: 2.0,
            leaf_stretch: 1.5,
            leaf_bias: -0.3,
        }
    }

    /// Conifer preset — tall spine, drooping laterals, clustered needles.
    pub fn conifer() -> Self {
        Self {
            style: TreeStyle::Conifer,
            foliage: FoliageStyle::Clusters,
            trunk_size: 2.0,
            ..Self::broadleaf()
        }
    }

    /// Create params from style preset.
    pub fn from_style(style: TreeStyle) -> Self {
        match style {
            TreeStyle::Broadleaf => Self::broadleaf(),
            TreeStyle::Conifer => Self::conifer(),
        }
    }

    /// Return a copy with every field clamped into its valid range.
    pub fn clamped(&self) -> Self {
        Self {
            style: self.style,
            foliage: self.foliage,
            seed: self.seed.clamp(1, 9999),
            iterations: self.iterations.min(15),
            size: self.size.clamp(0.1, 3.0),
            trunk_size: self.trunk_size.clamp(1.0, 3.0),
            twist: self.twist.clamp(0.0, 3.0),
            spread: self.spread.clamp(0.0, 1.0),
            wide: self.wide.clamp(0.0, 1.0),
            trunk_height: self.trunk_height.clamp(0.0, 5.0),
            branch_density: self.branch_density.clamp(0.0, 3.0),
            branch_length: self.branch_length.clamp(0.0, 3.0),
            branch_dir: self.branch_dir.clamp(-5.0, 5.0),
            leafiness: self.leafiness.clamp(0.0, 3.0),
            gravity: self.gravity.clamp(-1.0, 1.0),
            leaf_radius: self.leaf_radius.clamp(1.0, 4.0),
            leaf_stretch: self.leaf_stretch.clamp(0.5, 3.0),
            leaf_bias: self.leaf_bias.clamp(-1.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_broadleaf() {
        let params = TreeParams::default();
        assert_eq!(params.style, TreeStyle::Broadleaf);
        assert_eq!(params.foliage, FoliageStyle::Walk);
        assert_eq!(params.seed, 1);
        assert_eq!(params.iterations, 12);
    }

    #[test]
    fn test_conifer_preset() {
        let params = TreeParams::conifer();
        assert_eq!(params.style, TreeStyle::Conifer);
        assert_eq!(params.foliage, FoliageStyle::Clusters);
        // Conifers carry a thicker trunk by default
        assert!(params.trunk_size > TreeParams::broadleaf().trunk_size);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let params = TreeParams {
            seed: 0,
            iterations: 99,
            size: 50.0,
            trunk_size: 0.0,
            branch_dir: 12.0,
            leaf_bias: -7.0,
            gravity: 2.0,
            ..TreeParams::broadleaf()
        }
        .clamped();

        assert_eq!(params.seed, 1);
        assert_eq!(params.iterations, 15);
        assert_eq!(params.size, 3.0);
        assert_eq!(params.trunk_size, 1.0);
        assert_eq!(params.branch_dir, 5.0);
        assert_eq!(params.leaf_bias, -1.0);
        assert_eq!(params.gravity, 1.0);
    }

    #[test]
    fn test_in_range_values_survive_clamping() {
        let params = TreeParams::conifer();
        assert_eq!(params.clamped(), params);
    }

    #[test]
    fn test_partial_params_file() {
        let params: TreeParams =
            serde_json::from_str(r#"{"style": "conifer", "seed": 7, "leafiness": 1.8}"#)
                .unwrap();
        assert_eq!(params.style, TreeStyle::Conifer);
        assert_eq!(params.seed, 7);
        assert_eq!(params.leafiness, 1.8);
        // Unspecified fields fall back to the broadleaf defaults
        assert_eq!(params.iterations, 12);
    }
}
