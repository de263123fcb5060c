//! Lifespan trainer CLI
//!
//! Deterministic offline trainer producing the model artifact consumed by
//! the prediction UI.

use anyhow::{Context, Result};
use clap::Parser;
use lifespan_trainer::{pipeline, ForestConfig, PipelineConfig};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "lifespan-train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deterministic random-forest trainer for phone lifespan estimation", long_about = None)]
struct Args {
    /// Input CSV dataset with the usage telemetry schema
    #[arg(short, long)]
    input: PathBuf,

    /// Output path for the model artifact
    #[arg(short, long, default_value = "models/lifespan/artifact.json")]
    output: PathBuf,

    /// Number of trees in the forest
    #[arg(long, default_value = "100")]
    trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value = "16")]
    max_depth: usize,

    /// Minimum samples required to split a node
    #[arg(long, default_value = "2")]
    min_samples_split: usize,

    /// Minimum samples per leaf
    #[arg(long, default_value = "1")]
    min_samples_leaf: usize,

    /// Random seed for bootstrap sampling and the train/test split
    #[arg(long, default_value = "42")]
    seed: i64,

    /// Held-out fraction for evaluation
    #[arg(long, default_value = "0.2")]
    test_fraction: f64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Phone lifespan trainer v{}", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig {
        forest: ForestConfig {
            num_trees: args.trees,
            max_depth: args.max_depth,
            min_samples_split: args.min_samples_split,
            min_samples_leaf: args.min_samples_leaf,
            seed: args.seed,
        },
        test_fraction: args.test_fraction,
        split_seed: args.seed,
    };

    info!("Training configuration:");
    info!("  Trees: {}", config.forest.num_trees);
    info!("  Max depth: {}", config.forest.max_depth);
    info!("  Min samples per split: {}", config.forest.min_samples_split);
    info!("  Min samples per leaf: {}", config.forest.min_samples_leaf);
    info!("  Seed: {}", config.forest.seed);
    info!("  Test fraction: {}", config.test_fraction);

    info!("Loading dataset from: {}", args.input.display());
    let outcome = pipeline::run(&args.input, &config).context("Training failed")?;

    info!("Evaluation on {} held-out rows:", outcome.test_rows);
    info!("  MAE:  {:.2} months", outcome.report.mae);
    info!("  MSE:  {:.2}", outcome.report.mse);
    info!("  RMSE: {:.2} months", outcome.report.rmse);
    info!("  R²:   {:.2}", outcome.report.r2);
    info!("  Accuracy: {:.2}%", outcome.report.accuracy_pct);

    let hash = outcome
        .artifact
        .save(&args.output)
        .context("Failed to write model artifact")?;

    info!("Artifact: {}", args.output.display());
    info!("Hash: {hash}");

    Ok(())
}
