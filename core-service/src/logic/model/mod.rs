//! Model Module - classifier, random forest and persisted artifact
//!
//! Training produces a [`ModelArtifact`]; serving only needs a
//! [`Classifier`].

pub mod artifact;
pub mod error;
pub mod forest;
pub mod inference;
pub mod metrics;
pub mod tree;
pub mod types;

// Re-export common types
pub use artifact::{LoadedModel, ModelArtifact, ModelMetadata};
pub use error::ModelError;
pub use forest::{ClassWeight, ForestParams, MaxFeatures, RandomForest};
pub use inference::{classify, Classifier};
pub use metrics::{ConfusionMatrix, EvaluationReport};
pub use types::{Label, Prediction};
