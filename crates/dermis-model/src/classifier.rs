//! The classifier seam shared by every fitted model family.

use std::fmt;

use crate::distribution::ClassDistribution;
use crate::error::ModelError;
use crate::forest::RandomForest;
use crate::knn::KNearestNeighbors;
use crate::label::Label;
use crate::linear::LinearMargin;

/// Model family of a fitted classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierKind {
    /// [`KNearestNeighbors`].
    KNearestNeighbors,
    /// [`RandomForest`].
    RandomForest,
    /// [`LinearMargin`].
    LinearMargin,
}

impl ClassifierKind {
    /// Kebab-case name of the family.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KNearestNeighbors => "k-nearest-neighbors",
            Self::RandomForest => "random-forest",
            Self::LinearMargin => "linear-margin",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fitted, read-only binary classifier.
///
/// Implementations are immutable after construction, so one instance can be
/// shared across threads.
pub trait Classifier: Send + Sync {
    /// Model family.
    fn kind(&self) -> ClassifierKind;

    /// Number of features each sample must have.
    fn n_features(&self) -> usize;

    /// Predict the label of one sample.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PredictionFeatureMismatch`] when `sample.len() != n_features()`.
    fn predict(&self, sample: &[f64]) -> Result<Label, ModelError>;

    /// Estimate `[P(benign), P(malignant)]` for one sample.
    ///
    /// # Errors
    ///
    /// The default returns [`ModelError::ProbabilityUnsupported`].
    fn predict_proba(&self, sample: &[f64]) -> Result<ClassDistribution, ModelError> {
        let _ = sample;
        Err(ModelError::ProbabilityUnsupported { kind: self.kind() })
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::RandomForest
    }

    fn n_features(&self) -> usize {
        RandomForest::n_features(self)
    }

    fn predict(&self, sample: &[f64]) -> Result<Label, ModelError> {
        RandomForest::predict(self, sample)
    }

    fn predict_proba(&self, sample: &[f64]) -> Result<ClassDistribution, ModelError> {
        RandomForest::predict_proba(self, sample)
    }
}

/// Any fitted classifier that can be stored in an artifact file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum FittedClassifier {
    /// k-nearest neighbours.
    KNearestNeighbors(KNearestNeighbors),
    /// Random forest.
    RandomForest(RandomForest),
    /// Linear margin model.
    LinearMargin(LinearMargin),
}

impl FittedClassifier {
    fn inner(&self) -> &dyn Classifier {
        match self {
            Self::KNearestNeighbors(m) => m,
            Self::RandomForest(m) => m,
            Self::LinearMargin(m) => m,
        }
    }

    /// Re-check the structural invariants of the wrapped model.
    ///
    /// # Errors
    ///
    /// Returns the same errors the wrapped model's constructor would.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::KNearestNeighbors(m) => m.validate(),
            Self::RandomForest(m) => m.validate(),
            Self::LinearMargin(m) => m.validate(),
        }
    }
}

impl Classifier for FittedClassifier {
    fn kind(&self) -> ClassifierKind {
        self.inner().kind()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn predict(&self, sample: &[f64]) -> Result<Label, ModelError> {
        self.inner().predict(sample)
    }

    fn predict_proba(&self, sample: &[f64]) -> Result<ClassDistribution, ModelError> {
        self.inner().predict_proba(sample)
    }
}

impl From<KNearestNeighbors> for FittedClassifier {
    fn from(model: KNearestNeighbors) -> Self {
        Self::KNearestNeighbors(model)
    }
}

impl From<RandomForest> for FittedClassifier {
    fn from(model: RandomForest) -> Self {
        Self::RandomForest(model)
    }
}

impl From<LinearMargin> for FittedClassifier {
    fn from(model: LinearMargin) -> Self {
        Self::LinearMargin(model)
    }
}
