//! Model Artifact - persisted forest plus the layout it was trained on
//!
//! The file is a single JSON document. Loading checks the embedded feature
//! layout against the compiled one before the forest is ever used.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::logic::features::LayoutInfo;
use super::error::ModelError;
use super::forest::{ForestParams, RandomForest};

pub const MODEL_TYPE: &str = "random_forest";

/// Training provenance stored alongside the forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_type: String,
    pub layout: LayoutInfo,
    pub params: ForestParams,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Fraction in [0, 1]; `None` when the test split was empty
    pub test_accuracy: Option<f64>,
    pub trained_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    pub forest: RandomForest,
}

/// Artifact as read from disk
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub artifact: ModelArtifact,
    pub path: PathBuf,
    /// Hex SHA-256 of the raw file
    pub sha256: String,
}

impl ModelArtifact {
    pub fn new(forest: RandomForest, train_rows: usize, test_rows: usize, test_accuracy: Option<f64>) -> Self {
        Self {
            metadata: ModelMetadata {
                model_type: MODEL_TYPE.to_string(),
                layout: LayoutInfo::current(),
                params: forest.params().clone(),
                train_rows,
                test_rows,
                test_accuracy,
                trained_at: Utc::now(),
            },
            forest,
        }
    }

    /// Write the artifact, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ModelError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let bytes = serde_json::to_vec(self)?;
        fs::write(path, &bytes).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("Model saved to {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Read and validate an artifact.
    pub fn load(path: &Path) -> Result<LoadedModel, ModelError> {
        log::info!("Loading model from: {}", path.display());

        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
        artifact.metadata.layout.check()?;
        artifact.forest.validate()?;

        log::info!(
            "Model loaded: {} trees, trained {} (sha256 {})",
            artifact.forest.n_trees(),
            artifact.metadata.trained_at.to_rfc3339(),
            &sha256[..12]
        );

        Ok(LoadedModel {
            artifact,
            path: path.to_path_buf(),
            sha256,
        })
    }
}
