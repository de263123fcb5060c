//! Offline trainer for the phone lifespan estimator
//!
//! Synthesizes lifespan labels from usage telemetry, fits the categorical
//! encoders and the feature scaler, trains a deterministic random-forest
//! regressor, and packages everything as a single model artifact for the
//! prediction-time consumer.

pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod evaluation;
pub mod labels;
pub mod pipeline;
pub mod trainer;
pub mod tree;

use std::path::Path;

pub use dataset::Dataset;
pub use deterministic::{LcgRng, SplitTieBreaker};
pub use errors::TrainerError;
pub use evaluation::{train_test_split, EvaluationReport, TrainTestSplit};
pub use pipeline::{PipelineConfig, TrainingOutcome};
pub use trainer::{ForestConfig, ForestTrainer};
pub use tree::{TreeBuilder, TreeConfig};

/// Train a model directly from a CSV file with the default configuration.
pub fn train_model_from_csv(path: &Path) -> Result<TrainingOutcome, TrainerError> {
    pipeline::run(path, &PipelineConfig::default())
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
