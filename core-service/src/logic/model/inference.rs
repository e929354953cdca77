//! Inference - classifier seam between a fitted model and its callers
//!
//! The server only sees `dyn Classifier`; it never depends on how the model
//! was trained or stored.

use crate::logic::features::{build_features, FeatureVector, Reading};
use super::types::{Label, Prediction};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Binary fall / stable classifier
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Label;

    /// Probability of the fall class. Classifiers without a probability
    /// output keep the default, which the caller reports as null.
    fn predict_probability(&self, _features: &FeatureVector) -> Option<f64> {
        None
    }
}

/// Build features for a reading and run both classifier outputs.
pub fn classify(model: &dyn Classifier, reading: Reading) -> Prediction {
    let features = build_features(reading);
    let label = model.predict(&features);
    let prob_fall = model
        .predict_probability(&features)
        .filter(|p| p.is_finite());

    log::trace!("features={} label={}", features.to_log_entry(), label);

    Prediction { label, prob_fall }
}
