//! Features Module - Feature Construction
//!
//! One builder, shared by the offline trainer and the inference server.

pub mod layout;
pub mod vector;


// Re-export common types
pub use layout::{layout_hash, LayoutInfo, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use vector::{build_features, FeatureVector, Reading};
