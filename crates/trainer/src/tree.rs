//! Regression tree construction
//!
//! Exact-greedy CART: every distinct threshold of every feature is scored
//! by variance reduction, with deterministic tie-breaking so the same
//! sample always yields the same tree. Leaves hold the mean target of
//! their samples.

use lifespan_core::{Node, Tree};

use crate::deterministic::SplitTieBreaker;

/// Growth limits for a single tree
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 16,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// Best split found for one node
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

impl SplitCandidate {
    fn tie_breaker(&self) -> SplitTieBreaker {
        SplitTieBreaker::new(self.feature_idx, self.threshold)
    }
}

/// Builds regression trees over a shared row-major design matrix.
///
/// Row indices select the working sample, so bootstrap samples with
/// repeated rows need no copying.
pub struct TreeBuilder<'a> {
    config: TreeConfig,
    features: &'a [Vec<f64>],
    targets: &'a [f64],
    feature_count: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(features: &'a [Vec<f64>], targets: &'a [f64], config: TreeConfig) -> Self {
        assert_eq!(features.len(), targets.len());

        let feature_count = features.first().map_or(0, Vec::len);

        Self {
            config,
            features,
            targets,
            feature_count,
        }
    }

    /// Build one tree over the given row indices.
    pub fn build(&self, indices: &[usize]) -> Tree {
        let mut nodes = Vec::new();
        self.build_node(indices, 0, &mut nodes);
        Tree { nodes }
    }

    fn build_node(&self, indices: &[usize], depth: usize, nodes: &mut Vec<Node>) -> u32 {
        let current_idx = nodes.len() as u32;
        let leaf_value = self.mean_target(indices);

        if depth >= self.config.max_depth || indices.len() < self.config.min_samples_split {
            nodes.push(leaf(leaf_value));
            return current_idx;
        }

        let split = match self.find_best_split(indices) {
            Some(split) => split,
            None => {
                nodes.push(leaf(leaf_value));
                return current_idx;
            }
        };

        let (left_indices, right_indices) =
            self.split_samples(indices, split.feature_idx, split.threshold);

        if left_indices.len() < self.config.min_samples_leaf
            || right_indices.len() < self.config.min_samples_leaf
        {
            nodes.push(leaf(leaf_value));
            return current_idx;
        }

        // Reserve the current node, children are patched in afterwards
        nodes.push(Node {
            feature_index: split.feature_idx as u16,
            threshold: split.threshold,
            left: 0,
            right: 0,
            value: None,
        });

        let left_idx = self.build_node(&left_indices, depth + 1, nodes);
        let right_idx = self.build_node(&right_indices, depth + 1, nodes);

        nodes[current_idx as usize].left = left_idx;
        nodes[current_idx as usize].right = right_idx;

        current_idx
    }

    /// Score every candidate threshold of every feature by variance
    /// reduction; `None` when no split separates the sample.
    fn find_best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&idx| self.targets[idx]).sum();
        let total_sumsq: f64 = indices
            .iter()
            .map(|&idx| self.targets[idx] * self.targets[idx])
            .sum();
        let parent_sse = total_sumsq - total_sum * total_sum / n as f64;

        let mut best: Option<SplitCandidate> = None;

        for feature_idx in 0..self.feature_count {
            let mut order: Vec<usize> = indices.to_vec();
            order.sort_by(|&a, &b| {
                self.features[a][feature_idx].total_cmp(&self.features[b][feature_idx])
            });

            let mut left_sum = 0.0;
            let mut left_sumsq = 0.0;

            for position in 0..n - 1 {
                let idx = order[position];
                let target = self.targets[idx];
                left_sum += target;
                left_sumsq += target * target;

                let value = self.features[idx][feature_idx];
                let next_value = self.features[order[position + 1]][feature_idx];
                if value == next_value {
                    continue;
                }

                let left_n = position + 1;
                let right_n = n - left_n;
                if left_n < self.config.min_samples_leaf
                    || right_n < self.config.min_samples_leaf
                {
                    continue;
                }

                // Midpoint threshold; fall back to the left value when the
                // midpoint rounds up to the next value.
                let midpoint = 0.5 * (value + next_value);
                let threshold = if midpoint < next_value { midpoint } else { value };

                let right_sum = total_sum - left_sum;
                let right_sumsq = total_sumsq - left_sumsq;
                let left_sse = left_sumsq - left_sum * left_sum / left_n as f64;
                let right_sse = right_sumsq - right_sum * right_sum / right_n as f64;
                let gain = parent_sse - left_sse - right_sse;

                if gain <= 0.0 {
                    continue;
                }

                let candidate = SplitCandidate {
                    feature_idx,
                    threshold,
                    gain,
                };

                best = match best {
                    None => Some(candidate),
                    Some(current) => {
                        if candidate.gain > current.gain
                            || (candidate.gain == current.gain
                                && candidate.tie_breaker().precedes(&current.tie_breaker()))
                        {
                            Some(candidate)
                        } else {
                            Some(current)
                        }
                    }
                };
            }
        }

        best
    }

    fn split_samples(
        &self,
        indices: &[usize],
        feature_idx: usize,
        threshold: f64,
    ) -> (Vec<usize>, Vec<usize>) {
        let mut left = Vec::new();
        let mut right = Vec::new();

        for &idx in indices {
            if self.features[idx][feature_idx] <= threshold {
                left.push(idx);
            } else {
                right.push(idx);
            }
        }

        (left, right)
    }

    fn mean_target(&self, indices: &[usize]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        let sum: f64 = indices.iter().map(|&idx| self.targets[idx]).sum();
        sum / indices.len() as f64
    }
}

fn leaf(value: f64) -> Node {
    Node {
        feature_index: 0,
        threshold: 0.0,
        left: 0,
        right: 0,
        value: Some(value),
    }
}
