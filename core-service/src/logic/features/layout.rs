//! Feature layout shared by the trainer and the inference server
//!
//! Any change to the names below, including their order, must bump
//! `FEATURE_VERSION`. Model artifacts record the layout they were fitted
//! against and are refused when it no longer matches.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

/// Bumped whenever `FEATURE_LAYOUT` changes
pub const FEATURE_VERSION: u8 = 1;

/// Column order of every feature vector
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    "acc_x",
    "acc_y",
    "acc_z",
    // sqrt(x² + y² + z²)
    "resultant",
    "abs_x",
    "abs_y",
    "abs_z",
];

pub const FEATURE_COUNT: usize = 7;

/// CRC32 over the version byte and the NUL-terminated names
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(b"\0");
    }
    hasher.finalize()
}

/// Layout fingerprint stored in model artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    /// Layout compiled into this binary
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_names: FEATURE_LAYOUT.map(String::from).to_vec(),
        }
    }

    /// Ok when `self` describes the compiled layout
    pub fn check(&self) -> Result<(), LayoutMismatchError> {
        let current = Self::current();
        if self.version == current.version && self.hash == current.hash {
            return Ok(());
        }
        Err(LayoutMismatchError {
            expected_version: current.version,
            expected_hash: current.hash,
            found_version: self.version,
            found_hash: self.hash,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "model was trained on feature layout v{found_version} ({found_hash:08x}), \
     this build uses v{expected_version} ({expected_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub found_version: u8,
    pub found_hash: u32,
}
