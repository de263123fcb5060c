//! The prediction entry point consumed by the hosting UI
//!
//! A `Predictor` owns a validated, read-only artifact for the process
//! lifetime. Prediction is a pure function of that fitted state and the
//! input record; every failure is a typed value the caller can render.

use std::path::Path;

use tracing::debug;

use crate::artifact::ModelArtifact;
use crate::error::{ArtifactError, PredictError};
use crate::record::{RawInput, UsageRecord};

/// Prediction-time facade over a loaded model artifact.
pub struct Predictor {
    artifact: ModelArtifact,
}

impl Predictor {
    /// Wrap an in-memory artifact, validating it first.
    pub fn new(artifact: ModelArtifact) -> Result<Self, ArtifactError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    /// Load the artifact from disk. Called once at host startup; any
    /// failure here must be surfaced before a prediction UI is shown.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact = ModelArtifact::load(path)?;
        Ok(Self { artifact })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Estimate lifespan in months from raw form fields.
    pub fn predict(&self, input: &RawInput) -> Result<f64, PredictError> {
        let record = UsageRecord::from_raw(input)?;
        self.predict_record(&record)
    }

    /// Estimate lifespan in months from an already parsed record.
    pub fn predict_record(&self, record: &UsageRecord) -> Result<f64, PredictError> {
        let features = self.artifact.transforms.feature_vector(record)?;
        let months = self.artifact.model.predict(&features);
        debug!(months, "lifespan estimated");
        Ok(months)
    }
}
