//! Classifier output and the verdict shown to the user

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class predicted by the churn classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnLabel {
    /// Class 0
    NoChurn,
    /// Class 1
    Churn,
}

impl ChurnLabel {
    /// Map a raw class index from the classifier
    pub fn from_class(class: i64) -> anyhow::Result<Self> {
        match class {
            0 => Ok(ChurnLabel::NoChurn),
            1 => Ok(ChurnLabel::Churn),
            other => anyhow::bail!("classifier returned unknown class {}", other),
        }
    }

    pub fn is_churn(self) -> bool {
        self == ChurnLabel::Churn
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChurnLabel::NoChurn => f.write_str("no_churn"),
            ChurnLabel::Churn => f.write_str("churn"),
        }
    }
}

/// User-facing reading of one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Label as decided by the classifier
    pub label: ChurnLabel,
    /// "likely to churn" / "not likely to churn"
    pub verdict: String,
    /// Probability of the churn class (0.0 - 1.0)
    pub probability: f64,
    /// Probability with two decimals
    pub probability_display: String,
}

impl Verdict {
    pub const CHURN: &'static str = "likely to churn";
    pub const NO_CHURN: &'static str = "not likely to churn";

    /// Turn a classifier label and churn probability into a verdict.
    ///
    /// The label alone decides the verdict; the probability is carried for
    /// display and never overrides it.
    pub fn interpret(label: ChurnLabel, probability: f64) -> Self {
        let verdict = match label {
            ChurnLabel::Churn => Self::CHURN,
            ChurnLabel::NoChurn => Self::NO_CHURN,
        };

        Self {
            label,
            verdict: verdict.to_string(),
            probability,
            probability_display: format!("{:.2}", probability),
        }
    }

    /// Full sentence as rendered on the page
    pub fn message(&self) -> String {
        match self.label {
            ChurnLabel::Churn => format!(
                "Customer is likely to churn (Probability: {})",
                self.probability_display
            ),
            ChurnLabel::NoChurn => format!(
                "Customer is NOT likely to churn (Probability: {})",
                self.probability_display
            ),
        }
    }
}
