//! Random forest inference.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::distribution::ClassDistribution;
use crate::error::ModelError;
use crate::label::Label;
use crate::tree::DecisionTree;

/// A fitted random forest: the mean of its trees' leaf distributions.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

impl RandomForest {
    /// Assemble a forest from fitted trees.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ModelError::EmptyForest`] | `trees` is empty |
    /// | [`ModelError::TreeFeatureMismatch`] | trees disagree on their feature count |
    pub fn new(trees: Vec<DecisionTree>) -> Result<Self, ModelError> {
        let n_features = trees.first().ok_or(ModelError::EmptyForest)?.n_features();
        let forest = Self { trees, n_features };
        forest.validate()?;
        Ok(forest)
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }
        for (tree_index, tree) in self.trees.iter().enumerate() {
            tree.validate()?;
            if tree.n_features() != self.n_features {
                return Err(ModelError::TreeFeatureMismatch {
                    expected: self.n_features,
                    got: tree.n_features(),
                    tree_index,
                });
            }
        }
        Ok(())
    }

    /// Predict the label for a single sample (argmax of the mean distribution).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f64]) -> Result<Label, ModelError> {
        Ok(self.predict_proba(sample)?.predicted_label())
    }

    /// Return the mean leaf distribution over all trees.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn predict_proba(&self, sample: &[f64]) -> Result<ClassDistribution, ModelError> {
        if sample.len() != self.n_features {
            return Err(ModelError::PredictionFeatureMismatch {
                expected: self.n_features,
                got: sample.len(),
            });
        }
        let mut sum = [0.0f64; 2];
        for tree in &self.trees {
            let proba = tree.predict_proba(sample)?;
            sum[0] += proba.benign();
            sum[1] += proba.malignant();
        }
        let n = self.trees.len() as f64;
        Ok(ClassDistribution::new(sum.map(|v| v / n)))
    }

    /// Predict labels for a batch of samples in parallel.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PredictionFeatureMismatch`] if any sample has the wrong feature count.
    pub fn predict_batch(&self, samples: &[Vec<f64>]) -> Result<Vec<Label>, ModelError> {
        samples
            .into_par_iter()
            .map(|sample| self.predict(sample))
            .collect()
    }

    /// Return the number of features the forest expects.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Return the number of trees.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
