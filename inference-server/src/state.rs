//! Shared application state
//!
//! The model handle is decided once at startup and never changes. The
//! latest-reading snapshot is a single slot replaced whole under a lock.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fallwatch_core::{Classifier, ModelArtifact, Prediction, Reading};
use parking_lot::RwLock;
use serde::Serialize;

use crate::config::Config;
use crate::error::AppError;

// ============================================================================
// MODEL HANDLE
// ============================================================================

pub enum ModelState {
    Ready {
        classifier: Arc<dyn Classifier>,
        /// Hex SHA-256 of the artifact file, when loaded from disk
        sha256: Option<String>,
        trained_at: Option<DateTime<Utc>>,
    },
    /// Degraded mode: inference requests are refused
    Unavailable { reason: String },
}

impl ModelState {
    /// Load the artifact at `path`. Failure is logged and yields
    /// `Unavailable`; it never aborts startup.
    pub fn load(path: &Path) -> Self {
        match ModelArtifact::load(path) {
            Ok(loaded) => {
                tracing::info!(
                    "Model ready: {} ({} trees, sha256 {})",
                    loaded.path.display(),
                    loaded.artifact.forest.n_trees(),
                    loaded.sha256
                );
                ModelState::Ready {
                    trained_at: Some(loaded.artifact.metadata.trained_at),
                    sha256: Some(loaded.sha256),
                    classifier: Arc::new(loaded.artifact.forest),
                }
            }
            Err(e) => {
                tracing::error!("Failed to load model at {}: {}", path.display(), e);
                ModelState::Unavailable { reason: e.to_string() }
            }
        }
    }

    pub fn ready(classifier: Arc<dyn Classifier>) -> Self {
        ModelState::Ready { classifier, sha256: None, trained_at: None }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ModelState::Unavailable { reason: reason.into() }
    }

    pub fn classifier(&self) -> Result<Arc<dyn Classifier>, AppError> {
        match self {
            ModelState::Ready { classifier, .. } => Ok(Arc::clone(classifier)),
            ModelState::Unavailable { reason } => Err(AppError::ModelUnavailable(reason.clone())),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready { .. })
    }
}

// ============================================================================
// LATEST READING
// ============================================================================

pub const WAITING_LABEL: &str = "waiting...";

/// Most recent successful inference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestSnapshot {
    pub acc_x: f64,
    pub acc_y: f64,
    pub acc_z: f64,
    pub label: String,
    pub prob_fall: Option<f64>,
}

impl Default for LatestSnapshot {
    fn default() -> Self {
        Self {
            acc_x: 0.0,
            acc_y: 0.0,
            acc_z: 0.0,
            label: WAITING_LABEL.to_string(),
            prob_fall: None,
        }
    }
}

impl LatestSnapshot {
    pub fn new(reading: Reading, prediction: &Prediction) -> Self {
        Self {
            acc_x: reading.acc_x,
            acc_y: reading.acc_y,
            acc_z: reading.acc_z,
            label: prediction.label.as_str().to_string(),
            prob_fall: prediction.prob_fall,
        }
    }
}

/// Single-slot cell; writers swap the whole record, readers clone it
#[derive(Debug, Default)]
pub struct LatestReading {
    slot: RwLock<LatestSnapshot>,
}

impl LatestReading {
    pub fn get(&self) -> LatestSnapshot {
        self.slot.read().clone()
    }

    pub fn replace(&self, snapshot: LatestSnapshot) {
        *self.slot.write() = snapshot;
    }
}

// ============================================================================
// APP STATE
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<ModelState>,
    /// `None` when live reading is disabled
    pub latest: Option<Arc<LatestReading>>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, model: ModelState) -> Self {
        Self {
            model: Arc::new(model),
            latest: config.live_reading.then(|| Arc::new(LatestReading::default())),
            config,
        }
    }
}
