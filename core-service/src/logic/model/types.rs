//! Model types - labels and prediction output

use serde::{Deserialize, Serialize};

/// Number of output classes (stable, fall)
pub const N_CLASSES: usize = 2;

/// Binary ground truth / prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Stable = 0,
    Fall = 1,
}

impl Label {
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Label::Stable),
            1 => Some(Label::Fall),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Stable => "stable",
            Label::Fall => "fall",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prediction output
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Label,
    /// Probability of the fall class, when the classifier exposes one
    pub prob_fall: Option<f64>,
}

impl Prediction {
    /// Numeric class (0 = stable, 1 = fall)
    pub fn class(&self) -> u8 {
        self.label.index() as u8
    }
}
