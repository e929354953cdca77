//! Evaluation metrics for the held-out split

use std::fmt;

use super::types::{Label, N_CLASSES};

/// `matrix[actual][predicted]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub matrix: [[usize; N_CLASSES]; N_CLASSES],
}

impl ConfusionMatrix {
    pub fn from_labels(y_true: &[Label], y_pred: &[Label]) -> Self {
        let mut matrix = [[0usize; N_CLASSES]; N_CLASSES];
        for (actual, predicted) in y_true.iter().zip(y_pred) {
            matrix[actual.index()][predicted.index()] += 1;
        }
        Self { matrix }
    }

    pub fn total(&self) -> usize {
        self.matrix.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..N_CLASSES).map(|c| self.matrix[c][c]).sum()
    }

    pub fn support(&self, class: usize) -> usize {
        self.matrix[class].iter().sum()
    }

    fn predicted(&self, class: usize) -> usize {
        self.matrix.iter().map(|row| row[class]).sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .matrix
            .iter()
            .flatten()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);

        for (i, row) in self.matrix.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|v| format!("{:>width$}", v)).collect();
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i + 1 == N_CLASSES { "]]" } else { "]" };
            write!(f, "{}{}{}", open, cells.join(" "), close)?;
            if i + 1 < N_CLASSES {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Accuracy, confusion matrix and per-class precision / recall / F1.
/// Undefined ratios (zero denominators) are reported as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub confusion: ConfusionMatrix,
    pub per_class: [ClassMetrics; N_CLASSES],
}

impl EvaluationReport {
    pub fn evaluate(y_true: &[Label], y_pred: &[Label]) -> Self {
        let confusion = ConfusionMatrix::from_labels(y_true, y_pred);
        let per_class = std::array::from_fn(|class| {
            let tp = confusion.matrix[class][class] as f64;
            let precision = ratio(tp, confusion.predicted(class) as f64);
            let recall = ratio(tp, confusion.support(class) as f64);
            ClassMetrics {
                precision,
                recall,
                f1: ratio(2.0 * precision * recall, precision + recall),
                support: confusion.support(class),
            }
        });

        Self { confusion, per_class }
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.confusion.correct() as f64, self.confusion.total() as f64)
    }

    pub fn macro_avg(&self) -> ClassMetrics {
        let n = N_CLASSES as f64;
        ClassMetrics {
            precision: self.per_class.iter().map(|m| m.precision).sum::<f64>() / n,
            recall: self.per_class.iter().map(|m| m.recall).sum::<f64>() / n,
            f1: self.per_class.iter().map(|m| m.f1).sum::<f64>() / n,
            support: self.confusion.total(),
        }
    }

    pub fn weighted_avg(&self) -> ClassMetrics {
        let total = self.confusion.total() as f64;
        let weighted = |pick: fn(&ClassMetrics) -> f64| {
            ratio(
                self.per_class.iter().map(|m| pick(m) * m.support as f64).sum(),
                total,
            )
        };
        ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: self.confusion.total(),
        }
    }
}

/// Text layout of a classification report
impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for (class, metrics) in self.per_class.iter().enumerate() {
            write_row(f, &class.to_string(), metrics)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy(),
            self.confusion.total()
        )?;
        write_row(f, "macro avg", &self.macro_avg())?;
        write_row(f, "weighted avg", &self.weighted_avg())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, name: &str, m: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
        name, m.precision, m.recall, m.f1, m.support
    )
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}
