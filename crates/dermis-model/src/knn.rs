//! k-nearest-neighbours inference over stored reference samples.

use crate::classifier::{Classifier, ClassifierKind};
use crate::distribution::ClassDistribution;
use crate::error::ModelError;
use crate::label::Label;

/// How neighbour votes are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Weighting {
    /// Every neighbour counts once.
    Uniform,
    /// Neighbours count by inverse Euclidean distance. Exact matches, if
    /// any, take all the weight.
    Distance,
}

/// A fitted k-nearest-neighbours classifier using Euclidean distance.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct KNearestNeighbors {
    samples: Vec<Vec<f64>>,
    labels: Vec<Label>,
    k: usize,
    weighting: Weighting,
    n_features: usize,
}

impl KNearestNeighbors {
    /// Build a classifier from reference samples and their labels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ModelError::EmptyReferenceSet`] | `samples` is empty |
    /// | [`ModelError::ZeroFeatures`] | samples have no columns |
    /// | [`ModelError::FeatureCountMismatch`] | ragged sample rows |
    /// | [`ModelError::NonFiniteParameter`] | a sample value is NaN or infinite |
    /// | [`ModelError::LabelCountMismatch`] | `labels.len() != samples.len()` |
    /// | [`ModelError::InvalidNeighbourCount`] | `k` is zero or exceeds the sample count |
    pub fn new(
        samples: Vec<Vec<f64>>,
        labels: Vec<Label>,
        k: usize,
        weighting: Weighting,
    ) -> Result<Self, ModelError> {
        let n_features = samples.first().map_or(0, Vec::len);
        let model = Self {
            samples,
            labels,
            k,
            weighting,
            n_features,
        };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.samples.is_empty() {
            return Err(ModelError::EmptyReferenceSet);
        }
        if self.n_features == 0 {
            return Err(ModelError::ZeroFeatures);
        }
        for (row, sample) in self.samples.iter().enumerate() {
            if sample.len() != self.n_features {
                return Err(ModelError::FeatureCountMismatch {
                    expected: self.n_features,
                    got: sample.len(),
                    row,
                });
            }
            if !sample.iter().all(|v| v.is_finite()) {
                return Err(ModelError::NonFiniteParameter {
                    parameter: "reference sample",
                    index: row,
                });
            }
        }
        if self.labels.len() != self.samples.len() {
            return Err(ModelError::LabelCountMismatch {
                samples: self.samples.len(),
                labels: self.labels.len(),
            });
        }
        if self.k == 0 || self.k > self.samples.len() {
            return Err(ModelError::InvalidNeighbourCount {
                k: self.k,
                n_samples: self.samples.len(),
            });
        }
        Ok(())
    }

    /// Return the number of neighbours consulted.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Return the vote weighting scheme.
    #[must_use]
    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    /// Return the number of stored reference samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Return the `k` nearest reference samples as `(distance, label)`,
    /// closest first. Equidistant samples keep their stored order.
    fn neighbours(&self, sample: &[f64]) -> Vec<(f64, Label)> {
        let mut distances: Vec<(f64, Label)> = self
            .samples
            .iter()
            .zip(&self.labels)
            .map(|(reference, &label)| {
                let d2: f64 = reference
                    .iter()
                    .zip(sample)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum();
                (d2.sqrt(), label)
            })
            .collect();
        distances.sort_by(|a, b| a.0.total_cmp(&b.0));
        distances.truncate(self.k);
        distances
    }
}

impl Classifier for KNearestNeighbors {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::KNearestNeighbors
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, sample: &[f64]) -> Result<Label, ModelError> {
        Ok(self.predict_proba(sample)?.predicted_label())
    }

    fn predict_proba(&self, sample: &[f64]) -> Result<ClassDistribution, ModelError> {
        if sample.len() != self.n_features {
            return Err(ModelError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        let neighbours = self.neighbours(sample);
        let exact = neighbours.iter().any(|(d, _)| *d == 0.0);

        let mut votes = [0.0f64; 2];
        for (distance, label) in &neighbours {
            let weight = match self.weighting {
                Weighting::Uniform => 1.0,
                Weighting::Distance if exact => {
                    if *distance == 0.0 { 1.0 } else { 0.0 }
                }
                Weighting::Distance => 1.0 / distance,
            };
            votes[label.index()] += weight;
        }
        let total = votes[0] + votes[1];
        Ok(ClassDistribution::new(votes.map(|v| v / total)))
    }
}
