//! End-to-end training pipeline
//!
//! One linear pass: load and impute the dataset, fit the transforms,
//! synthesize labels, assemble the design matrix, split, train, evaluate,
//! and package the artifact. The run either completes with an artifact or
//! fails with a typed error; there is no partial state.

use std::path::Path;

use lifespan_core::record::columns;
use lifespan_core::{
    ArtifactMetadata, CategoryEncoder, FittedTransforms, ModelArtifact, StandardScaler,
};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::errors::TrainerError;
use crate::evaluation::{train_test_split, EvaluationReport};
use crate::labels::synthesize_labels;
use crate::trainer::{ForestConfig, ForestTrainer};

/// Full pipeline configuration.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub forest: ForestConfig,
    pub test_fraction: f64,
    pub split_seed: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            forest: ForestConfig::default(),
            test_fraction: 0.2,
            split_seed: 42,
        }
    }
}

/// Result of one training run.
#[derive(Clone, Debug)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub report: EvaluationReport,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Run the pipeline over a CSV dataset.
pub fn run<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<TrainingOutcome, TrainerError> {
    let dataset = Dataset::from_csv(path)?;
    info!(rows = dataset.len(), "dataset loaded");
    for (name, (min, max)) in columns::NUMERIC.iter().zip(dataset.numeric_stats()) {
        debug!("  {name}: min={min}, max={max}");
    }

    let transforms = fit_transforms(&dataset);
    let targets = synthesize_labels(&dataset.records);

    // Training rows went through the same parser as inference input, so
    // feature assembly cannot fail here; surface it defensively anyway.
    let mut features = Vec::with_capacity(dataset.len());
    for record in &dataset.records {
        let vector = transforms
            .feature_vector(record)
            .map_err(|err| TrainerError::Training(err.to_string()))?;
        features.push(vector.to_vec());
    }

    let split = train_test_split(dataset.len(), config.test_fraction, config.split_seed);
    info!(
        train = split.train.len(),
        test = split.test.len(),
        "train/test split"
    );

    let x_train: Vec<Vec<f64>> = split.train.iter().map(|&idx| features[idx].clone()).collect();
    let y_train: Vec<f64> = split.train.iter().map(|&idx| targets[idx]).collect();

    let model = ForestTrainer::new(config.forest.clone()).train(&x_train, &y_train)?;
    info!(trees = model.trees.len(), "forest trained");

    let actual: Vec<f64> = split.test.iter().map(|&idx| targets[idx]).collect();
    let predicted: Vec<f64> = split
        .test
        .iter()
        .map(|&idx| model.predict(&features[idx]))
        .collect();
    let report = EvaluationReport::compute(&actual, &predicted);

    let metadata = ArtifactMetadata {
        produced_by: crate::VERSION.to_string(),
        created_at: chrono::Utc::now().timestamp(),
        feature_count: model.feature_count,
        tree_count: model.trees.len(),
        training_rows: split.train.len(),
        metrics: report.as_map(),
    };

    Ok(TrainingOutcome {
        artifact: ModelArtifact {
            model,
            transforms,
            metadata,
        },
        report,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    })
}

/// Fit encoders and the scaler once, over the full dataset.
fn fit_transforms(dataset: &Dataset) -> FittedTransforms {
    let records = &dataset.records;

    let device_model = CategoryEncoder::fit(
        columns::DEVICE_MODEL,
        records.iter().map(|r| r.device_model.as_str()),
    );
    let operating_system = CategoryEncoder::fit(
        columns::OPERATING_SYSTEM,
        records.iter().map(|r| r.operating_system.as_str()),
    );
    let gender = CategoryEncoder::fit(columns::GENDER, records.iter().map(|r| r.gender.as_str()));

    let mut numeric_columns: Vec<Vec<f64>> =
        vec![Vec::with_capacity(records.len()); columns::NUMERIC.len()];
    for record in records {
        for (column, value) in numeric_columns.iter_mut().zip(record.numeric_values()) {
            column.push(value);
        }
    }
    let scaler = StandardScaler::fit(&numeric_columns);

    FittedTransforms {
        device_model,
        operating_system,
        gender,
        scaler,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "User ID,Device Model,Operating System,App Usage Time (min/day),Screen On Time (hours/day),Battery Drain (mAh/day),Number of Apps Installed,Data Usage (MB/day),Age,Gender,User Behavior Class";

    fn synthetic_csv(rows: usize) -> NamedTempFile {
        let devices = ["Google Pixel 5", "iPhone 12", "OnePlus 9"];
        let systems = ["Android", "iOS", "Android"];
        let genders = ["Male", "Female"];

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for i in 0..rows {
            let device_idx = i % devices.len();
            writeln!(
                file,
                "{},{},{},{},{},{},{},{},{},{},{}",
                i + 1,
                devices[device_idx],
                systems[device_idx],
                60 + (i % 10) * 40,
                1.0 + (i % 8) as f64,
                400 + (i % 12) * 150,
                20 + (i % 15) * 5,
                300 + (i % 9) * 120,
                18 + (i % 30),
                genders[i % 2],
                1 + (i % 5),
            )
            .unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn small_config() -> PipelineConfig {
        PipelineConfig {
            forest: ForestConfig {
                num_trees: 8,
                max_depth: 6,
                ..ForestConfig::default()
            },
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let file = synthetic_csv(40);
        let outcome = run(file.path(), &small_config()).unwrap();

        assert_eq!(outcome.artifact.model.trees.len(), 8);
        assert_eq!(outcome.train_rows, 32);
        assert_eq!(outcome.test_rows, 8);
        assert_eq!(outcome.artifact.metadata.training_rows, 32);
        assert!(outcome.report.rmse.is_finite());
        assert!(outcome.artifact.validate().is_ok());
    }

    #[test]
    fn test_pipeline_is_deterministic_modulo_timestamp() {
        let file = synthetic_csv(40);
        let config = small_config();

        let outcome1 = run(file.path(), &config).unwrap();
        let outcome2 = run(file.path(), &config).unwrap();

        assert_eq!(outcome1.artifact.model, outcome2.artifact.model);
        assert_eq!(outcome1.artifact.transforms, outcome2.artifact.transforms);
        assert_eq!(outcome1.report, outcome2.report);
    }

    #[test]
    fn test_missing_file_is_a_dataset_error() {
        let err = run("/nonexistent/data.csv", &small_config()).unwrap_err();
        assert!(matches!(err, TrainerError::Dataset(_)));
    }
}
