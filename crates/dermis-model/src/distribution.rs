use crate::label::Label;

/// Two-class probability distribution: `[P(benign), P(malignant)]`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClassDistribution {
    probs: [f64; 2],
}

impl ClassDistribution {
    /// Create a distribution from raw class probabilities.
    #[must_use]
    pub fn new(probs: [f64; 2]) -> Self {
        Self { probs }
    }

    /// Create a distribution from the probability of the malignant class.
    #[must_use]
    pub fn from_malignant(p: f64) -> Self {
        Self::new([1.0 - p, p])
    }

    /// Return `P(benign)`.
    #[must_use]
    pub fn benign(&self) -> f64 {
        self.probs[0]
    }

    /// Return `P(malignant)`.
    #[must_use]
    pub fn malignant(&self) -> f64 {
        self.probs[1]
    }

    /// Return the more probable label; ties go to [`Label::Benign`].
    #[must_use]
    pub fn predicted_label(&self) -> Label {
        if self.probs[1] > self.probs[0] {
            Label::Malignant
        } else {
            Label::Benign
        }
    }

    /// Return the probabilities as an array.
    #[must_use]
    pub fn as_array(&self) -> [f64; 2] {
        self.probs
    }

    /// Return the probabilities as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }

    /// `true` if both entries are finite, non-negative and sum to 1.
    pub(crate) fn is_valid(&self) -> bool {
        self.probs.iter().all(|p| p.is_finite() && *p >= 0.0)
            && ((self.probs[0] + self.probs[1]) - 1.0).abs() < 1e-6
    }
}
