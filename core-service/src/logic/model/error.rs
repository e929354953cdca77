//! Model errors

use std::path::PathBuf;

use crate::logic::features::LayoutMismatchError;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    #[error("Model contains no trees")]
    EmptyForest,

    #[error("Malformed model: {0}")]
    Malformed(String),

    #[error("Invalid training data: {0}")]
    InvalidTrainingData(String),

    #[error("Training worker panicked")]
    WorkerPanicked,
}
