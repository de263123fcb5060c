//! Deterministic utilities for reproducible training
//!
//! Provides an LCG-based RNG plus shuffling, bootstrap sampling, and split
//! tie-breaking, so that the same dataset and configuration produce an
//! identical model on every run and platform.

use std::cmp::Ordering;
use std::num::Wrapping;

/// Linear Congruential Generator for deterministic pseudo-randomness
/// Uses constants from Numerical Recipes (glibc)
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: Wrapping<i64>,
}

impl LcgRng {
    // LCG constants (compatible with glibc)
    const MULTIPLIER: i64 = 1103515245;
    const INCREMENT: i64 = 12345;
    const MODULUS: i64 = 1 << 31;

    pub fn new(seed: i64) -> Self {
        Self {
            state: Wrapping(seed.abs() % Self::MODULUS),
        }
    }

    /// Generate next random i64 in range [0, MODULUS)
    pub fn next_i64(&mut self) -> i64 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        (self.state.0 & (Self::MODULUS - 1)).abs()
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: i64) -> i64 {
        if max <= 0 {
            return 0;
        }
        self.next_i64() % max
    }
}

/// Deterministic Fisher-Yates permutation of `0..n`.
pub fn shuffled_indices(n: usize, seed: i64) -> Vec<usize> {
    let mut rng = LcgRng::new(seed);
    let mut indices: Vec<usize> = (0..n).collect();

    for i in (1..n).rev() {
        let j = rng.next_range(i as i64 + 1) as usize;
        indices.swap(i, j);
    }

    indices
}

/// Sample `n` row indices with replacement.
pub fn bootstrap_indices(n: usize, rng: &mut LcgRng) -> Vec<usize> {
    (0..n).map(|_| rng.next_range(n as i64) as usize).collect()
}

/// Deterministic tie-breaker for split selection.
///
/// When two candidate splits have exactly equal gain, the one with the
/// lower (feature index, threshold) pair wins, independent of scan order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitTieBreaker {
    pub feature_idx: usize,
    pub threshold: f64,
}

impl SplitTieBreaker {
    pub fn new(feature_idx: usize, threshold: f64) -> Self {
        Self {
            feature_idx,
            threshold,
        }
    }

    /// Total order over candidates; thresholds are always finite here.
    pub fn precedes(&self, other: &Self) -> bool {
        match self.feature_idx.cmp(&other.feature_idx) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.threshold.total_cmp(&other.threshold) == Ordering::Less,
        }
    }
}
