//! Stratified train/test split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::logic::model::Label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Row indices, ascending
    pub train: Vec<usize>,
    /// Row indices, ascending
    pub test: Vec<usize>,
}

/// Split row indices so each label keeps its share in both halves.
///
/// Per label, `round(n * test_fraction)` rows go to test, clamped so both
/// halves keep at least one row when the label has two or more. A label
/// with a single row stays in train.
pub fn stratified_split(labels: &[Label], test_fraction: f64, seed: u64) -> Split {
    let mut rng = StdRng::seed_from_u64(seed);
    let fraction = test_fraction.clamp(0.0, 1.0);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [Label::Stable, Label::Fall] {
        let mut rows: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == class)
            .map(|(i, _)| i)
            .collect();
        let n = rows.len();
        if n == 0 {
            continue;
        }

        rows.shuffle(&mut rng);
        let wanted = (n as f64 * fraction).round() as usize;
        let n_test = if n >= 2 { wanted.clamp(1, n - 1) } else { 0 };

        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Split { train, test }
}
