//! Decision Tree - weighted Gini CART used as the forest's base learner
//!
//! Nodes live in a flat arena; node 0 is the root. A sample goes left when
//! `x[feature] <= threshold`.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::types::N_CLASSES;

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// `None` grows until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features examined per split before the search may widen
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Weighted class proportions of the training samples that reached it
    Leaf { distribution: [f64; N_CLASSES] },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

/// Range of the shared index buffer still waiting to be grown
struct Pending {
    node: usize,
    start: usize,
    end: usize,
    depth: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    /// Number of samples going left once the range is sorted by `feature`
    left_count: usize,
    impurity: f64,
}

impl DecisionTree {
    /// Grow a tree over `samples` (row indices into `x`, duplicates allowed).
    ///
    /// `class_weight[c]` multiplies every sample of class `c` when computing
    /// impurity and leaf distributions.
    pub fn fit(
        x: &Array2<f64>,
        y: &[usize],
        samples: &[usize],
        class_weight: &[f64; N_CLASSES],
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = x.ncols();
        let mut idx = samples.to_vec();
        let mut nodes = vec![placeholder()];
        let mut stack = vec![Pending { node: 0, start: 0, end: idx.len(), depth: 0 }];
        let mut features: Vec<usize> = (0..n_features).collect();

        while let Some(Pending { node, start, end, depth }) = stack.pop() {
            let range = &mut idx[start..end];
            let totals = class_totals(range, y, class_weight);
            let n = range.len();

            let splittable = n >= params.min_samples_split
                && n >= 2 * params.min_samples_leaf
                && params.max_depth.map_or(true, |max| depth < max)
                && totals.iter().filter(|&&w| w > 0.0).count() > 1;

            let best = if splittable {
                features.shuffle(rng);
                find_best_split(x, y, range, class_weight, params, &features)
            } else {
                None
            };

            let Some(best) = best else {
                nodes[node] = Node::Leaf { distribution: normalize(totals) };
                continue;
            };

            range.sort_by(|&a, &b| x[[a, best.feature]].total_cmp(&x[[b, best.feature]]));

            let left = nodes.len();
            let right = left + 1;
            nodes.push(placeholder());
            nodes.push(placeholder());
            nodes[node] = Node::Split {
                feature: best.feature,
                threshold: best.threshold,
                left,
                right,
            };

            let mid = start + best.left_count;
            stack.push(Pending { node: right, start: mid, end, depth: depth + 1 });
            stack.push(Pending { node: left, start, end: mid, depth: depth + 1 });
        }

        Self { nodes }
    }

    /// Class distribution of the leaf reached by `row`
    pub fn predict_distribution(&self, row: &[f64]) -> [f64; N_CLASSES] {
        let mut current = 0;
        loop {
            match &self.nodes[current] {
                Node::Leaf { distribution } => return *distribution,
                Node::Split { feature, threshold, left, right } => {
                    current = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Node::Split { left, right, .. } = &self.nodes[node] {
                stack.push((*left, depth + 1));
                stack.push((*right, depth + 1));
            }
        }
        max_depth
    }

    /// Structural sanity check used after deserialization
    pub fn is_well_formed(&self, n_features: usize) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(i, node)| match node {
                Node::Leaf { distribution } => distribution.iter().all(|p| p.is_finite()),
                Node::Split { feature, left, right, .. } => {
                    *feature < n_features
                        && *left > i
                        && *right > i
                        && *left < self.nodes.len()
                        && *right < self.nodes.len()
                }
            })
    }
}

// ============================================================================
// SPLIT SEARCH
// ============================================================================

/// Examine `max_features` features in the shuffled order; when none of them
/// admits a valid split, keep going through the rest.
fn find_best_split(
    x: &Array2<f64>,
    y: &[usize],
    range: &[usize],
    class_weight: &[f64; N_CLASSES],
    params: &TreeParams,
    features: &[usize],
) -> Option<BestSplit> {
    let mut best: Option<BestSplit> = None;
    let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(range.len());

    for (visited, &feature) in features.iter().enumerate() {
        if visited >= params.max_features && best.is_some() {
            break;
        }

        sorted.clear();
        sorted.extend(range.iter().map(|&i| (x[[i, feature]], y[i])));
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        if let Some(candidate) = best_threshold(&sorted, class_weight, params.min_samples_leaf) {
            if best.as_ref().map_or(true, |b| candidate.1 < b.impurity) {
                best = Some(BestSplit {
                    feature,
                    threshold: candidate.0,
                    left_count: candidate.2,
                    impurity: candidate.1,
                });
            }
        }
    }

    best
}

/// Sweep a feature sorted ascending; returns `(threshold, impurity, left_count)`
/// of the lowest weighted child Gini.
fn best_threshold(
    sorted: &[(f64, usize)],
    class_weight: &[f64; N_CLASSES],
    min_leaf: usize,
) -> Option<(f64, f64, usize)> {
    let n = sorted.len();
    let mut right = [0.0; N_CLASSES];
    for &(_, class) in sorted {
        right[class] += class_weight[class];
    }
    let mut left = [0.0; N_CLASSES];
    let mut best: Option<(f64, f64, usize)> = None;

    for i in 1..n {
        let (prev_value, prev_class) = sorted[i - 1];
        left[prev_class] += class_weight[prev_class];
        right[prev_class] -= class_weight[prev_class];

        if i < min_leaf || n - i < min_leaf {
            continue;
        }
        let value = sorted[i].0;
        if !(prev_value < value) {
            continue;
        }

        let left_weight: f64 = left.iter().sum();
        let right_weight: f64 = right.iter().sum();
        let impurity = left_weight * gini(&left) + right_weight * gini(&right);

        if best.map_or(true, |(_, b, _)| impurity < b) {
            let mut threshold = prev_value + (value - prev_value) / 2.0;
            if threshold >= value {
                threshold = prev_value;
            }
            best = Some((threshold, impurity, i));
        }
    }

    best
}

fn gini(weights: &[f64; N_CLASSES]) -> f64 {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - weights.iter().map(|w| (w / total).powi(2)).sum::<f64>()
}

fn class_totals(range: &[usize], y: &[usize], class_weight: &[f64; N_CLASSES]) -> [f64; N_CLASSES] {
    let mut totals = [0.0; N_CLASSES];
    for &i in range {
        totals[y[i]] += class_weight[y[i]];
    }
    totals
}

fn normalize(totals: [f64; N_CLASSES]) -> [f64; N_CLASSES] {
    let sum: f64 = totals.iter().sum();
    if sum <= 0.0 {
        return [1.0 / N_CLASSES as f64; N_CLASSES];
    }
    totals.map(|w| w / sum)
}

fn placeholder() -> Node {
    Node::Leaf { distribution: [0.0; N_CLASSES] }
}
