//! Random-forest trainer
//!
//! Fits an ensemble of regression trees, each on a bootstrap sample drawn
//! from a deterministic RNG, so the same data and configuration always
//! produce an identical model.

use lifespan_core::{ForestModel, ARTIFACT_VERSION};
use tracing::debug;

use crate::deterministic::{bootstrap_indices, LcgRng};
use crate::errors::TrainerError;
use crate::tree::{TreeBuilder, TreeConfig};

/// Forest training configuration
#[derive(Clone, Debug)]
pub struct ForestConfig {
    pub num_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: i64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            num_trees: 100,
            max_depth: 16,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

/// Random-forest trainer
pub struct ForestTrainer {
    config: ForestConfig,
}

impl ForestTrainer {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    /// Train a forest on a row-major design matrix and target vector.
    pub fn train(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<ForestModel, TrainerError> {
        if features.is_empty() {
            return Err(TrainerError::Training(
                "cannot train on an empty design matrix".into(),
            ));
        }
        if features.len() != targets.len() {
            return Err(TrainerError::Training(format!(
                "{} feature rows but {} targets",
                features.len(),
                targets.len()
            )));
        }
        if self.config.num_trees == 0 {
            return Err(TrainerError::Training("num_trees must be positive".into()));
        }

        let feature_count = features[0].len();
        let n_samples = features.len();

        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
        };
        let builder = TreeBuilder::new(features, targets, tree_config);

        let mut rng = LcgRng::new(self.config.seed);
        let mut trees = Vec::with_capacity(self.config.num_trees);

        for tree_idx in 0..self.config.num_trees {
            let sample = bootstrap_indices(n_samples, &mut rng);
            trees.push(builder.build(&sample));
            debug!("trained tree {}/{}", tree_idx + 1, self.config.num_trees);
        }

        Ok(ForestModel::new(ARTIFACT_VERSION, feature_count, trees))
    }
}
