//! Fitted transforms shared by the training and prediction paths
//!
//! Encoders and the scaler are fit exactly once, over the full training set,
//! and are immutable afterwards. They travel inside the model artifact so
//! that prediction-time transforms are byte-for-byte the ones fit at
//! training time; nothing is ever refit from a single inference record.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::PredictError;
use crate::record::{columns, UsageRecord, FEATURE_COUNT};

/// Categorical-to-integer code mapping for one column.
///
/// Codes are dense in `[0, k)` and assigned in lexicographic order of the
/// distinct training values. The ordering is arbitrary by contract; it only
/// has to be stable once fit, which the sorted assignment guarantees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryEncoder {
    column: String,
    codes: BTreeMap<String, i64>,
}

impl CategoryEncoder {
    /// Fit an encoder from the column's training values.
    pub fn fit<'a, I>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        let codes = distinct
            .into_iter()
            .enumerate()
            .map(|(code, value)| (value.to_string(), code as i64))
            .collect();

        Self {
            column: column.to_string(),
            codes,
        }
    }

    /// Map a value to its training-time code.
    ///
    /// A value never seen during training is an error; producing an
    /// arbitrary code silently is disallowed.
    pub fn encode(&self, value: &str) -> Result<i64, PredictError> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| PredictError::UnknownCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Number of distinct categories seen during training.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Per-column standardization: `(x - mean) / std`.
///
/// A constant column (std == 0) is centered but not divided, so fit never
/// fails and the transform stays defined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Fit per-column (mean, std) over column-major training data.
    ///
    /// Uses the population standard deviation, matching the reference
    /// scaler. Columns must be non-empty and of equal length.
    pub fn fit(columns: &[Vec<f64>]) -> Self {
        let mut mean = Vec::with_capacity(columns.len());
        let mut std = Vec::with_capacity(columns.len());

        for column in columns {
            let n = column.len() as f64;
            let m = if column.is_empty() {
                0.0
            } else {
                column.iter().sum::<f64>() / n
            };
            let variance = if column.is_empty() {
                0.0
            } else {
                column.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / n
            };

            mean.push(m);
            std.push(variance.sqrt());
        }

        Self { mean, std }
    }

    /// Standardize one value of column `index`.
    pub fn transform_value(&self, index: usize, value: f64) -> f64 {
        let divisor = if self.std[index] == 0.0 {
            1.0
        } else {
            self.std[index]
        };
        (value - self.mean[index]) / divisor
    }

    /// Number of fitted columns.
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    pub fn mean(&self, index: usize) -> f64 {
        self.mean[index]
    }

    pub fn std(&self, index: usize) -> f64 {
        self.std[index]
    }
}

/// All transforms fit during training, bundled as one immutable value.
///
/// Constructed once by the training pipeline and passed by reference into
/// every prediction; there is no process-wide fitted state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittedTransforms {
    pub device_model: CategoryEncoder,
    pub operating_system: CategoryEncoder,
    pub gender: CategoryEncoder,
    pub scaler: StandardScaler,
}

impl FittedTransforms {
    /// Assemble the fixed 8-column feature vector for a record.
    ///
    /// Device model and operating system are validated against their
    /// encoders even though only the gender code enters the vector; an
    /// unseen value in any categorical column is rejected here.
    pub fn feature_vector(
        &self,
        record: &UsageRecord,
    ) -> Result<[f64; FEATURE_COUNT], PredictError> {
        self.device_model.encode(&record.device_model)?;
        self.operating_system.encode(&record.operating_system)?;
        let gender_code = self.gender.encode(&record.gender)?;

        let numeric = record.numeric_values();
        let mut scaled = [0.0; columns::NUMERIC.len()];
        for (index, value) in numeric.iter().enumerate() {
            scaled[index] = self.scaler.transform_value(index, *value);
        }

        // columns::FEATURES order: the seven scaled numerics with the
        // gender code spliced in before the behavior class.
        Ok([
            scaled[0],
            scaled[1],
            scaled[2],
            scaled[3],
            scaled[4],
            scaled[5],
            gender_code as f64,
            scaled[6],
        ])
    }

    /// Structural consistency check used at artifact load time.
    pub fn validate(&self) -> Result<(), String> {
        if self.scaler.len() != columns::NUMERIC.len() {
            return Err(format!(
                "scaler covers {} columns, expected {}",
                self.scaler.len(),
                columns::NUMERIC.len()
            ));
        }
        if self.device_model.is_empty() || self.operating_system.is_empty() || self.gender.is_empty()
        {
            return Err("an encoder has no categories".into());
        }
        Ok(())
    }
}
