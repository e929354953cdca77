//! Feature Vector - Core data structure for model input
//!
//! The only way to obtain a [`FeatureVector`] is [`build_features`], so the
//! training pipeline and the inference server cannot drift apart.

use serde::{Deserialize, Serialize};
use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT};

// ============================================================================
// RAW READING
// ============================================================================

/// One tri-axial accelerometer sample (engineering units, usually g)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    pub acc_x: f64,
    pub acc_y: f64,
    pub acc_z: f64,
}

impl Reading {
    pub fn new(acc_x: f64, acc_y: f64, acc_z: f64) -> Self {
        Self { acc_x, acc_y, acc_z }
    }
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Feature values in the order defined by `FEATURE_LAYOUT`. Immutable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Get values as array reference
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        FEATURE_LAYOUT
            .iter()
            .position(|&n| n == name)
            .and_then(|i| self.get(i))
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::Value::Object(
            FEATURE_LAYOUT
                .iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), serde_json::json!(value)))
                .collect(),
        )
    }
}

impl From<Reading> for FeatureVector {
    fn from(reading: Reading) -> Self {
        build_features(reading)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Map a raw reading to `[x, y, z, resultant, |x|, |y|, |z|]`.
pub fn build_features(reading: Reading) -> FeatureVector {
    let Reading { acc_x, acc_y, acc_z } = reading;
    let resultant = (acc_x * acc_x + acc_y * acc_y + acc_z * acc_z).sqrt();

    FeatureVector {
        values: [
            acc_x,
            acc_y,
            acc_z,
            resultant,
            acc_x.abs(),
            acc_y.abs(),
            acc_z.abs(),
        ],
    }
}
