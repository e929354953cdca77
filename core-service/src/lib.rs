//! Fallwatch Core
//!
//! Feature builder, random-forest fall classifier, and the offline trainer
//! that fits it from labeled accelerometer recordings.
//!
//! ```text
//!  dataset/<activity>/*.csv ──► dataset ──► features ──► model::RandomForest
//!                                                            │
//!                                              models/*.json ◄┘ (ModelArtifact)
//! ```

pub mod constants;
pub mod logic;

pub use logic::features::{build_features, FeatureVector, Reading};
pub use logic::model::{classify, Classifier, Label, LoadedModel, ModelArtifact, ModelError, Prediction};
