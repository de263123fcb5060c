//! Random-forest model representation and evaluation
//!
//! Trees are stored as flat node arrays and walked iteratively. The model is
//! read-only after training: evaluation has no hidden state and identical
//! inputs always produce identical outputs.

use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

/// A decision tree node (internal or leaf)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Feature index to compare (for internal nodes)
    pub feature_index: u16,
    /// Threshold value for comparison
    pub threshold: f64,
    /// Index of left child node
    pub left: u32,
    /// Index of right child node
    pub right: u32,
    /// Leaf value (None for internal nodes)
    pub value: Option<f64>,
}

/// A single regression tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// A fitted random-forest regressor
///
/// The prediction is the mean of the per-tree leaf values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForestModel {
    /// Model format version for compatibility
    pub version: u32,
    /// Number of input features expected
    pub feature_count: usize,
    /// Regression trees in the ensemble
    pub trees: Vec<Tree>,
}

/// Evaluate a single tree on a feature vector
fn eval_tree(tree: &Tree, features: &[f64]) -> f64 {
    let mut idx = 0usize;

    loop {
        if idx >= tree.nodes.len() {
            // Safety: invalid tree structure
            return 0.0;
        }

        let node = &tree.nodes[idx];

        if let Some(value) = node.value {
            return value;
        }

        let feature_idx = node.feature_index as usize;
        if feature_idx >= features.len() {
            // Safety: feature index out of bounds
            return 0.0;
        }

        idx = if features[feature_idx] <= node.threshold {
            node.left as usize
        } else {
            node.right as usize
        };
    }
}

impl ForestModel {
    pub fn new(version: u32, feature_count: usize, trees: Vec<Tree>) -> Self {
        Self {
            version,
            feature_count,
            trees,
        }
    }

    /// Evaluate the forest on a feature vector.
    ///
    /// Returns the mean of the tree outputs, or 0.0 for an empty forest
    /// (`validate` rejects empty forests before they reach this point).
    pub fn predict(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }

        let sum: f64 = self.trees.iter().map(|tree| eval_tree(tree, features)).sum();
        sum / self.trees.len() as f64
    }

    /// Validate the model structure
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.trees.is_empty() {
            return Err(ArtifactError::Invalid("model has no trees".into()));
        }

        if self.feature_count == 0 {
            return Err(ArtifactError::Invalid("model has no features".into()));
        }

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ArtifactError::Invalid(format!(
                    "tree {tree_idx} has no nodes"
                )));
            }

            for (node_idx, node) in tree.nodes.iter().enumerate() {
                if node.value.is_some() {
                    // Leaf node: children must be unset
                    if node.left != 0 || node.right != 0 {
                        return Err(ArtifactError::Invalid(format!(
                            "leaf node {node_idx} in tree {tree_idx} has non-zero children"
                        )));
                    }
                } else {
                    // Internal node: children and feature index must be in range
                    if node.left as usize >= tree.nodes.len() {
                        return Err(ArtifactError::Invalid(format!(
                            "node {node_idx} in tree {tree_idx} has invalid left child {}",
                            node.left
                        )));
                    }
                    if node.right as usize >= tree.nodes.len() {
                        return Err(ArtifactError::Invalid(format!(
                            "node {node_idx} in tree {tree_idx} has invalid right child {}",
                            node.right
                        )));
                    }
                    if node.feature_index as usize >= self.feature_count {
                        return Err(ArtifactError::Invalid(format!(
                            "node {node_idx} in tree {tree_idx} has invalid feature index {}",
                            node.feature_index
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
