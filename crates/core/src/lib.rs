//! Prediction-time core for the phone lifespan estimator
//!
//! Holds everything the external form needs to turn raw input fields into a
//! lifespan estimate, plus the shared types the offline trainer fits and
//! serializes.
//!
//! Modules:
//! - `record`: raw input fields, typed usage records, column schema
//! - `transforms`: fitted categorical encoders and the standard scaler
//! - `forest`: random-forest model representation and evaluation
//! - `artifact`: the serialized model artifact (save/load/verify)
//! - `canonical`: canonical JSON helpers for hashable artifacts
//! - `predictor`: the `predict(record) -> months` entry point
//! - `error`: typed prediction and artifact errors

pub mod artifact;
pub mod canonical;
pub mod error;
pub mod forest;
pub mod predictor;
pub mod record;
pub mod transforms;

pub use artifact::{ArtifactMetadata, ModelArtifact, ARTIFACT_VERSION};
pub use error::{ArtifactError, PredictError};
pub use forest::{ForestModel, Node, Tree};
pub use predictor::Predictor;
pub use record::{columns, RawInput, UsageRecord, FEATURE_COUNT};
pub use transforms::{CategoryEncoder, FittedTransforms, StandardScaler};

/// Crate version string recorded in artifact metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
