//! Integration tests for the training pipeline
//!
//! Ensures identical artifacts across runs and exercises the full
//! train-save-load-predict path, including the error scenarios the
//! prediction UI relies on.

use std::io::Write;

use lifespan_core::{ModelArtifact, PredictError, Predictor, RawInput};
use lifespan_trainer::{pipeline, ForestConfig, PipelineConfig, TrainerError};
use tempfile::NamedTempFile;

const HEADER: &str = "User ID,Device Model,Operating System,App Usage Time (min/day),Screen On Time (hours/day),Battery Drain (mAh/day),Number of Apps Installed,Data Usage (MB/day),Age,Gender,User Behavior Class";

const DEVICES: [&str; 3] = ["Google Pixel 5", "iPhone 12", "OnePlus 9"];
const SYSTEMS: [&str; 3] = ["Android", "iOS", "Android"];

/// Deterministic synthetic dataset covering all rule branches.
fn synthetic_csv(rows: usize) -> NamedTempFile {
    let genders = ["Male", "Female"];

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for i in 0..rows {
        let device_idx = i % DEVICES.len();
        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{},{},{}",
            i + 1,
            DEVICES[device_idx],
            SYSTEMS[device_idx],
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
            num_trees: 10,
            max_depth: 8,
            ..ForestConfig::default()
        },
        ..PipelineConfig::default()
    }
}

fn sample_input() -> RawInput {
    RawInput {
        app_usage_min_per_day: "220".into(),
        screen_on_hours_per_day: "4.5".into(),
        battery_drain_mah_per_day: "1200".into(),
        apps_installed: "55".into(),
        data_usage_mb_per_day: "900".into(),
        age: "31".into(),
        gender: "Female".into(),
        user_behavior_class: "3".into(),
        device_model: "Google Pixel 5".into(),
        operating_system: "Android".into(),
    }
}

#[test]
fn test_deterministic_training() {
    let file = synthetic_csv(60);
    let config = small_config();

    let outcome1 = pipeline::run(file.path(), &config).unwrap();
    let outcome2 = pipeline::run(file.path(), &config).unwrap();

    // Model and transforms are byte-identical across runs
    assert_eq!(outcome1.artifact.model, outcome2.artifact.model);
    assert_eq!(outcome1.artifact.transforms, outcome2.artifact.transforms);

    let json1 = lifespan_core::canonical::canonical_json_string(&outcome1.artifact.model).unwrap();
    let json2 = lifespan_core::canonical::canonical_json_string(&outcome2.artifact.model).unwrap();
    assert_eq!(json1, json2);
}

#[test]
fn test_artifact_round_trip_preserves_predictions() {
    let file = synthetic_csv(60);
    let outcome = pipeline::run(file.path(), &small_config()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifact.json");
    outcome.artifact.save(&path).unwrap();

    let loaded = ModelArtifact::load(&path).unwrap();
    assert_eq!(loaded, outcome.artifact);

    let before = Predictor::new(outcome.artifact).unwrap();
    let after = Predictor::load(&path).unwrap();

    for device_idx in 0..DEVICES.len() {
        let mut input = sample_input();
        input.device_model = DEVICES[device_idx].into();
        input.operating_system = SYSTEMS[device_idx].into();

        let a = before.predict(&input).unwrap();
        let b = after.predict(&input).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn test_predictions_stay_in_label_range() {
    let file = synthetic_csv(60);
    let outcome = pipeline::run(file.path(), &small_config()).unwrap();
    let predictor = Predictor::new(outcome.artifact).unwrap();

    // Leaf values are means of clamped labels, so estimates cannot
    // leave the label range.
    let months = predictor.predict(&sample_input()).unwrap();
    assert!((12.0..=60.0).contains(&months), "estimate {months}");
}

#[test]
fn test_unseen_device_model_is_rejected_not_fatal() {
    let file = synthetic_csv(40);
    let outcome = pipeline::run(file.path(), &small_config()).unwrap();
    let predictor = Predictor::new(outcome.artifact).unwrap();

    let mut input = sample_input();
    input.device_model = "Nokia 3310".into();

    let err = predictor.predict(&input).unwrap_err();
    assert!(matches!(err, PredictError::UnknownCategory { .. }));

    // The predictor keeps working after the failure
    assert!(predictor.predict(&sample_input()).is_ok());
}

#[test]
fn test_malformed_form_field_names_the_field() {
    let file = synthetic_csv(40);
    let outcome = pipeline::run(file.path(), &small_config()).unwrap();
    let predictor = Predictor::new(outcome.artifact).unwrap();

    let mut input = sample_input();
    input.apps_installed = "many".into();

    let err = predictor.predict(&input).unwrap_err();
    match err {
        PredictError::InvalidInput { field, .. } => {
            assert_eq!(field, "Number of Apps Installed")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_required_column_fails_before_fitting() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "User ID,Device Model,Operating System,Gender").unwrap();
    writeln!(file, "1,Google Pixel 5,Android,Male").unwrap();
    file.flush().unwrap();

    let err = pipeline::run(file.path(), &small_config()).unwrap_err();
    assert!(matches!(err, TrainerError::MissingColumn(_)));
}

#[test]
fn test_empty_dataset_fails_before_fitting() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    file.flush().unwrap();

    let err = pipeline::run(file.path(), &small_config()).unwrap_err();
    assert!(matches!(err, TrainerError::EmptyDataset));
}

#[test]
fn test_tampered_artifact_is_rejected_at_load() {
    let file = synthetic_csv(40);
    let outcome = pipeline::run(file.path(), &small_config()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifact.json");
    outcome.artifact.save(&path).unwrap();

    let mut json = std::fs::read_to_string(&path).unwrap();
    json.push('\n');
    std::fs::write(&path, json).unwrap();

    assert!(Predictor::load(&path).is_err());
}

#[test]
fn test_metrics_are_recorded_in_metadata() {
    let file = synthetic_csv(60);
    let outcome = pipeline::run(file.path(), &small_config()).unwrap();

    let metrics = &outcome.artifact.metadata.metrics;
    for key in ["mae", "mse", "rmse", "r2", "accuracy_pct"] {
        assert!(metrics.contains_key(key), "missing metric {key}");
    }
    assert_eq!(outcome.artifact.metadata.tree_count, 10);
}
