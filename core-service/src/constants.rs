//! Central Configuration Constants
//!
//! Single source of truth for defaults shared by the trainer and the server.

use std::path::PathBuf;

/// Model artifact location, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "models/fall_detection_rf_model.json";

/// Root of the labeled recordings
pub const DEFAULT_DATASET_DIR: &str = "dataset";

/// Share of every label held out for evaluation
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Fallwatch";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model path from environment or use default
pub fn get_model_path() -> PathBuf {
    std::env::var("MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Get dataset directory from environment or use default
pub fn get_dataset_dir() -> PathBuf {
    std::env::var("DATASET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATASET_DIR))
}

/// Parse an env var, falling back to `default` when unset or invalid
pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
