use thiserror::Error;

/// Errors returned by the offline trainer.
///
/// Dataset problems are fatal to the run and are raised before any fitting
/// is attempted.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("dataset has no rows")]
    EmptyDataset,

    #[error("training error: {0}")]
    Training(String),
}
