//! Offline Trainer - dataset → random forest → model artifact

use std::path::PathBuf;

use crate::constants;
use crate::logic::dataset::{self, stratified_split, DatasetError, IngestStats};
use crate::logic::model::{EvaluationReport, ForestParams, ModelArtifact, ModelError, RandomForest};

#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub dataset_dir: PathBuf,
    pub model_path: PathBuf,
    pub test_fraction: f64,
    /// The forest seed also drives the split
    pub forest: ForestParams,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from(constants::DEFAULT_DATASET_DIR),
            model_path: PathBuf::from(constants::DEFAULT_MODEL_PATH),
            test_fraction: constants::DEFAULT_TEST_FRACTION,
            forest: ForestParams::default(),
        }
    }
}

impl TrainerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = ForestParams::default();
        Self {
            dataset_dir: constants::get_dataset_dir(),
            model_path: constants::get_model_path(),
            test_fraction: constants::DEFAULT_TEST_FRACTION,
            forest: ForestParams {
                n_estimators: constants::env_or("TRAIN_TREES", defaults.n_estimators),
                seed: constants::env_or("TRAIN_SEED", defaults.seed),
                ..defaults
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("No usable data files found in {}. Ensure folders and CSV columns are correct.", .0.display())]
    NoUsableData(PathBuf),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug)]
pub struct TrainingOutcome {
    pub stats: IngestStats,
    pub train_rows: usize,
    pub test_rows: usize,
    /// `None` when the held-out split is empty
    pub report: Option<EvaluationReport>,
    pub model_path: PathBuf,
}

/// Load, split, fit, evaluate and save. Nothing is written on failure.
pub fn train(config: &TrainerConfig) -> Result<TrainingOutcome, TrainError> {
    log::info!("Loading dataset from {}", config.dataset_dir.display());
    let (data, stats) = dataset::load_dataset(&config.dataset_dir)?;

    if data.is_empty() {
        return Err(TrainError::NoUsableData(config.dataset_dir.clone()));
    }

    let [stable, fall] = data.class_counts();
    log::info!(
        "Loaded {} rows from {} files (stable={}, fall={}, skipped files={})",
        data.len(),
        stats.files_used,
        stable,
        fall,
        stats.files_skipped
    );

    let split = stratified_split(data.labels(), config.test_fraction, config.forest.seed);
    let train_set = data.subset(&split.train);
    let test_set = data.subset(&split.test);

    let forest = RandomForest::fit(&train_set.to_matrix(), train_set.labels(), &config.forest)?;

    let report = if test_set.is_empty() {
        log::warn!("Test split is empty; skipping evaluation");
        None
    } else {
        let predicted: Vec<_> = test_set
            .features()
            .iter()
            .map(|f| forest.predict_row(f.as_slice()))
            .collect();
        Some(EvaluationReport::evaluate(test_set.labels(), &predicted))
    };

    let artifact = ModelArtifact::new(
        forest,
        train_set.len(),
        test_set.len(),
        report.as_ref().map(EvaluationReport::accuracy),
    );
    artifact.save(&config.model_path)?;

    Ok(TrainingOutcome {
        stats,
        train_rows: train_set.len(),
        test_rows: test_set.len(),
        report,
        model_path: config.model_path.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{build_features, Reading};
    use crate::logic::model::{Classifier, Label};
    use std::fs;
    use tempfile::tempdir;

    fn config(root: &std::path::Path) -> TrainerConfig {
        TrainerConfig {
            dataset_dir: root.join("dataset"),
            model_path: root.join("models").join("model.json"),
            forest: ForestParams { n_estimators: 20, n_jobs: Some(2), ..Default::default() },
            ..Default::default()
        }
    }

    fn recording(rows: impl Iterator<Item = (f64, f64, f64)>) -> String {
        let mut csv = String::from("time;accelerationX;accelerationY;accelerationZ\n");
        for (i, (x, y, z)) in rows.enumerate() {
            csv.push_str(&format!("{};{};{};{}\n", i, x, y, z));
        }
        csv
    }

    #[test]
    fn test_end_to_end_training() {
        let root = tempdir().unwrap();
        let cfg = config(root.path());
        let sit = cfg.dataset_dir.join("downsit");
        let fall = cfg.dataset_dir.join("freefall");
        fs::create_dir_all(&sit).unwrap();
        fs::create_dir_all(&fall).unwrap();
        fs::write(
            sit.join("s1.csv"),
            recording((0..60).map(|i| (0.01 * i as f64, -0.02, 0.97 - 0.002 * i as f64))),
        )
        .unwrap();
        fs::write(
            fall.join("f1.csv"),
            recording((0..20).map(|i| (2.0 + 0.1 * i as f64, -2.5, 1.8 + 0.05 * i as f64))),
        )
        .unwrap();

        let outcome = train(&cfg).unwrap();

        assert_eq!(outcome.train_rows + outcome.test_rows, 80);
        assert_eq!(outcome.test_rows, 16);
        let report = outcome.report.unwrap();
        assert!(report.accuracy() > 0.9);
        assert!(cfg.model_path.exists());

        let loaded = ModelArtifact::load(&cfg.model_path).unwrap();
        assert_eq!(loaded.artifact.metadata.train_rows, 64);
        let impact = build_features(Reading::new(3.0, -2.5, 2.5));
        assert_eq!(loaded.artifact.forest.predict(&impact), Label::Fall);
    }

    #[test]
    fn test_no_usable_data_writes_nothing() {
        let root = tempdir().unwrap();
        let cfg = config(root.path());
        fs::create_dir_all(cfg.dataset_dir.join("unknown_activity")).unwrap();
        fs::write(cfg.dataset_dir.join("unknown_activity").join("a.csv"), "x,y,z\n1,2,3\n").unwrap();
        fs::create_dir_all(cfg.dataset_dir.join("runsit")).unwrap();
        fs::write(cfg.dataset_dir.join("runsit").join("gyro.csv"), "gx,gy,gz\n1,2,3\n").unwrap();

        let err = train(&cfg).unwrap_err();

        assert!(matches!(err, TrainError::NoUsableData(_)));
        assert!(!cfg.model_path.exists());
    }
}
