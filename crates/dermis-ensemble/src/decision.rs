//! The arbitration rule and the values the ensemble reports.

use dermis_model::{ClassDistribution, Label};

/// Which branch of the arbitration rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arbitration {
    /// Both classifiers returned the same label.
    Agreement,
    /// The classifiers disagreed and the arbitration value was positive.
    TrustedA,
    /// The classifiers disagreed and the arbitration value was zero or negative.
    TrustedB,
}

impl Arbitration {
    /// Apply the rule to the two labels and the scaled arbitration value.
    ///
    /// Returns the final label together with the branch taken. The final
    /// label is always the trusted classifier's own output.
    #[must_use]
    pub fn resolve(model_a: Label, model_b: Label, arbitration_value: f64) -> (Label, Self) {
        if model_a == model_b {
            (model_a, Self::Agreement)
        } else if arbitration_value > 0.0 {
            (model_a, Self::TrustedA)
        } else {
            (model_b, Self::TrustedB)
        }
    }

    /// Human-readable justification reported with every decision.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Agreement => "Both models agree.",
            Self::TrustedA => "Model A trusted (high-asymmetry lesion — A's specialization).",
            Self::TrustedB => "Model B trusted (low-asymmetry lesion — B's specialization).",
        }
    }

    /// Short machine-readable tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Agreement => "agreement",
            Self::TrustedA => "trusted-a",
            Self::TrustedB => "trusted-b",
        }
    }
}

/// The full observable output of one ensemble prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Final label.
    pub label: Label,
    /// Classifier A's label.
    pub model_a: Label,
    /// Classifier B's label.
    pub model_b: Label,
    /// Branch of the arbitration rule taken.
    pub arbitration: Arbitration,
    /// Scaled vector component the rule inspected.
    pub arbitration_value: f64,
}

impl Decision {
    /// Reason string for the branch taken.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.arbitration.reason()
    }
}

/// Per-classifier probability estimates, or a marker that they are not available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfidenceScores {
    /// Both classifiers produced `[P(benign), P(malignant)]`.
    Available {
        /// Classifier A's estimate.
        model_a: ClassDistribution,
        /// Classifier B's estimate.
        model_b: ClassDistribution,
    },
    /// At least one classifier cannot estimate probabilities.
    Unavailable,
}

impl ConfidenceScores {
    /// Return `true` for [`ConfidenceScores::Available`].
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}
