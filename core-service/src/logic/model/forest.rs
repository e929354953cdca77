//! Random Forest - bagged ensemble of weighted CART trees
//!
//! Probabilities are the mean of the per-tree leaf distributions; the label
//! is the arg-max of that mean (ties resolve to stable).

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureVector, FEATURE_COUNT};
use super::error::ModelError;
use super::inference::Classifier;
use super::tree::{DecisionTree, TreeParams};
use super::types::{Label, N_CLASSES};

// ============================================================================
// PARAMETERS
// ============================================================================

/// Number of features tried per split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// ⌊√n_features⌋, at least 1
    Sqrt,
    All,
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        match self {
            MaxFeatures::Sqrt => ((n_features as f64).sqrt() as usize).max(1),
            MaxFeatures::All => n_features.max(1),
        }
    }
}

/// Class re-weighting against label imbalance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    Uniform,
    /// `n / (n_classes * count_c)` over the whole training set
    Balanced,
    /// Same formula, recomputed on every tree's bootstrap sample
    BalancedSubsample,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub class_weight: ClassWeight,
    pub seed: u64,
    /// Worker threads; `None` uses every available core
    #[serde(default, skip_serializing)]
    pub n_jobs: Option<usize>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 400,
            max_depth: None,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            class_weight: ClassWeight::BalancedSubsample,
            seed: 42,
            n_jobs: None,
        }
    }
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit on a row-major matrix; `y[i]` labels row `i`.
    pub fn fit(x: &Array2<f64>, y: &[Label], params: &ForestParams) -> Result<Self, ModelError> {
        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(ModelError::InvalidTrainingData("no training rows".to_string()));
        }
        if n_samples != y.len() {
            return Err(ModelError::InvalidTrainingData(format!(
                "{} rows but {} labels",
                n_samples,
                y.len()
            )));
        }
        if params.n_estimators == 0 {
            return Err(ModelError::InvalidTrainingData("n_estimators must be > 0".to_string()));
        }

        let classes: Vec<usize> = y.iter().map(Label::index).collect();
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split.max(2),
            min_samples_leaf: params.min_samples_leaf.max(1),
            max_features: params.max_features.resolve(x.ncols()),
        };
        let all_rows: Vec<usize> = (0..n_samples).collect();
        let global_weight = class_weights(&classes, &all_rows, params.class_weight);

        // Seeds are fixed up front so the result does not depend on scheduling
        let mut master = StdRng::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_estimators).map(|_| master.gen()).collect();

        let workers = params
            .n_jobs
            .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
            .unwrap_or(1)
            .clamp(1, seeds.len());
        let chunk_size = seeds.len().div_ceil(workers);

        log::info!(
            "Fitting {} trees on {} rows ({} worker threads)",
            params.n_estimators,
            n_samples,
            workers
        );

        let grow = |seed: u64| -> DecisionTree {
            let mut rng = StdRng::seed_from_u64(seed);
            let samples: Vec<usize> = if params.bootstrap {
                (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
            } else {
                (0..n_samples).collect()
            };
            let weight = match params.class_weight {
                ClassWeight::BalancedSubsample => {
                    class_weights(&classes, &samples, ClassWeight::BalancedSubsample)
                }
                _ => global_weight,
            };
            DecisionTree::fit(x, &classes, &samples, &weight, &tree_params, &mut rng)
        };

        let grow = &grow;
        let trees = std::thread::scope(|scope| {
            let handles: Vec<_> = seeds
                .chunks(chunk_size)
                .map(move |chunk| scope.spawn(move || chunk.iter().map(|&s| grow(s)).collect::<Vec<_>>()))
                .collect();

            let mut trees = Vec::with_capacity(seeds.len());
            for handle in handles {
                trees.extend(handle.join().map_err(|_| ModelError::WorkerPanicked)?);
            }
            Ok::<_, ModelError>(trees)
        })?;

        Ok(Self {
            params: params.clone(),
            n_features: x.ncols(),
            trees,
        })
    }

    /// Mean class distribution over all trees
    pub fn predict_proba_row(&self, row: &[f64]) -> [f64; N_CLASSES] {
        let mut sum = [0.0; N_CLASSES];
        for tree in &self.trees {
            let dist = tree.predict_distribution(row);
            for (acc, p) in sum.iter_mut().zip(dist) {
                *acc += p;
            }
        }
        let n = self.trees.len().max(1) as f64;
        sum.map(|s| s / n)
    }

    pub fn predict_row(&self, row: &[f64]) -> Label {
        let proba = self.predict_proba_row(row);
        if proba[Label::Fall.index()] > proba[Label::Stable.index()] {
            Label::Fall
        } else {
            Label::Stable
        }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Reject forests that cannot score a `FEATURE_COUNT` vector
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }
        if self.n_features != FEATURE_COUNT {
            return Err(ModelError::Malformed(format!(
                "forest expects {} features, layout has {}",
                self.n_features, FEATURE_COUNT
            )));
        }
        if let Some(i) = self.trees.iter().position(|t| !t.is_well_formed(self.n_features)) {
            return Err(ModelError::Malformed(format!("tree {} is malformed", i)));
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn predict(&self, features: &FeatureVector) -> Label {
        self.predict_row(features.as_slice())
    }

    fn predict_probability(&self, features: &FeatureVector) -> Option<f64> {
        Some(self.predict_proba_row(features.as_slice())[Label::Fall.index()])
    }
}

/// Per-class multipliers for the given sample multiset
fn class_weights(classes: &[usize], samples: &[usize], mode: ClassWeight) -> [f64; N_CLASSES] {
    if mode == ClassWeight::Uniform {
        return [1.0; N_CLASSES];
    }

    let mut counts = [0usize; N_CLASSES];
    for &i in samples {
        counts[classes[i]] += 1;
    }
    let present = counts.iter().filter(|&&c| c > 0).count().max(1);
    let n = samples.len() as f64;

    counts.map(|c| if c == 0 { 1.0 } else { n / (present as f64 * c as f64) })
}
