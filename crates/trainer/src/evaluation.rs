//! Held-out evaluation: deterministic splitting and regression metrics
//!
//! The metric report is informational only; no control decision depends on
//! it. It is logged after training and embedded in the artifact metadata.

use std::collections::BTreeMap;

use crate::deterministic::shuffled_indices;

/// Row indices of a deterministic train/test partition.
#[derive(Clone, Debug)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with the seed and carve off the test fraction.
pub fn train_test_split(n: usize, test_fraction: f64, seed: i64) -> TrainTestSplit {
    let order = shuffled_indices(n, seed);
    let test_len = ((n as f64) * test_fraction).ceil() as usize;
    let test_len = test_len.min(n);

    TrainTestSplit {
        test: order[..test_len].to_vec(),
        train: order[test_len..].to_vec(),
    }
}

/// Regression metrics over a held-out set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluationReport {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
    /// 100 minus the mean absolute percentage error
    pub accuracy_pct: f64,
}

impl EvaluationReport {
    /// Compute all metrics for paired actual/predicted values.
    ///
    /// Lifespan labels are bounded away from zero, so MAPE is defined.
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Self {
        let n = actual.len();
        if n == 0 || n != predicted.len() {
            return Self::default();
        }

        let nf = n as f64;
        let mut abs_sum = 0.0;
        let mut sq_sum = 0.0;
        let mut pct_sum = 0.0;

        for (a, p) in actual.iter().zip(predicted) {
            let err = a - p;
            abs_sum += err.abs();
            sq_sum += err * err;
            if *a != 0.0 {
                pct_sum += (err / a).abs();
            }
        }

        let mae = abs_sum / nf;
        let mse = sq_sum / nf;
        let rmse = mse.sqrt();

        let mean_actual = actual.iter().sum::<f64>() / nf;
        let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual) * (a - mean_actual)).sum();
        let r2 = if ss_tot == 0.0 {
            if sq_sum == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - sq_sum / ss_tot
        };

        let mape = pct_sum / nf * 100.0;

        Self {
            mae,
            mse,
            rmse,
            r2,
            accuracy_pct: 100.0 - mape,
        }
    }

    /// Stable key/value view for artifact metadata.
    pub fn as_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("mae".to_string(), self.mae),
            ("mse".to_string(), self.mse),
            ("rmse".to_string(), self.rmse),
            ("r2".to_string(), self.r2),
            ("accuracy_pct".to_string(), self.accuracy_pct),
        ])
    }
}
