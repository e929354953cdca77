//! Dataset Module - labeled accelerometer recordings for offline training
//!
//! Layout on disk: `<dataset_dir>/<activity>/<recording>.csv`. The activity
//! folder name decides the label; unknown activities are ignored.

pub mod columns;
pub mod reader;
pub mod split;


use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::logic::features::{build_features, FeatureVector, Reading, FEATURE_COUNT};
use crate::logic::model::Label;

pub use columns::{normalize_column, resolve_axis_columns, AxisColumns};
pub use reader::{read_readings, sniff_delimiter};
pub use split::{stratified_split, Split};

/// Activity folders recorded as falls
pub const FALL_CLASSES: &[&str] = &["freefall", "runfall", "walkfall"];

/// Activity folders recorded as non-fall movements
pub const NON_FALL_CLASSES: &[&str] = &["downsit", "runsit", "walksit"];

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No acceleration columns in {}", .0.display())]
    UnresolvedColumns(PathBuf),
}

/// Label for an activity folder name (trimmed, case-insensitive)
pub fn label_for_folder(name: &str) -> Option<Label> {
    let key = name.trim().to_lowercase();
    if FALL_CLASSES.contains(&key.as_str()) {
        Some(Label::Fall)
    } else if NON_FALL_CLASSES.contains(&key.as_str()) {
        Some(Label::Stable)
    } else {
        None
    }
}

// ============================================================================
// TRAINING SET
// ============================================================================

/// Feature rows with their labels, built through the shared feature builder
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    features: Vec<FeatureVector>,
    labels: Vec<Label>,
}

impl TrainingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reading: Reading, label: Label) {
        self.features.push(build_features(reading));
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// `[stable, fall]` row counts
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0; 2];
        for label in &self.labels {
            counts[label.index()] += 1;
        }
        counts
    }

    /// Rows at `indices`, in that order
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            features: indices.iter().map(|&i| self.features[i]).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Row-major `len × FEATURE_COUNT` matrix
    pub fn to_matrix(&self) -> Array2<f64> {
        let mut x = Array2::zeros((self.len(), FEATURE_COUNT));
        for (mut row, features) in x.rows_mut().into_iter().zip(&self.features) {
            for (cell, value) in row.iter_mut().zip(features.as_slice()) {
                *cell = *value;
            }
        }
        x
    }
}

// ============================================================================
// INGESTION
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub folders_used: usize,
    pub folders_skipped: usize,
    pub files_used: usize,
    pub files_skipped: usize,
}

/// Walk `base_dir` and collect every resolvable row.
///
/// Only an unreadable `base_dir` is an error; bad files are skipped.
/// Folders and files are visited in name order so the row order, and hence
/// the split, is reproducible.
pub fn load_dataset(base_dir: &Path) -> Result<(TrainingSet, IngestStats), DatasetError> {
    let mut set = TrainingSet::new();
    let mut stats = IngestStats::default();

    for folder in sorted_entries(base_dir)? {
        if !folder.is_dir() {
            continue;
        }
        let name = folder.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let Some(label) = label_for_folder(&name) else {
            log::debug!("Skipping folder with unknown activity: {}", name);
            stats.folders_skipped += 1;
            continue;
        };
        stats.folders_used += 1;

        let files = match sorted_entries(&folder) {
            Ok(files) => files,
            Err(e) => {
                log::warn!("{}", e);
                continue;
            }
        };

        for file in files.into_iter().filter(|p| is_csv(p)) {
            match read_readings(&file) {
                Ok(readings) => {
                    log::debug!("{}: {} rows ({})", file.display(), readings.len(), label);
                    for reading in readings {
                        set.push(reading, label);
                    }
                    stats.files_used += 1;
                }
                Err(e) => {
                    log::debug!("Skipping file: {}", e);
                    stats.files_skipped += 1;
                }
            }
        }
    }

    Ok((set, stats))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let io_err = |source: std::io::Error| DatasetError::Io { path: dir.to_path_buf(), source };
    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect::<Vec<_>>();
    entries.sort();
    Ok(entries)
}

fn is_csv(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"))
}
