//! Per-feature standardisation: `(x - mean) / scale`.

use tracing::{debug, instrument};

use crate::error::ModelError;

/// A fitted standard scaler.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler from per-feature means and scales.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ModelError::ZeroFeatures`] | `mean` is empty |
    /// | [`ModelError::FeatureCountMismatch`] | `scale.len() != mean.len()` |
    /// | [`ModelError::NonFiniteParameter`] | a mean or scale is NaN or infinite |
    /// | [`ModelError::ZeroScale`] | a scale is zero |
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ModelError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Fit means and population standard deviations column-wise.
    ///
    /// Columns with zero deviation get a scale of 1 so they pass through centred.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ModelError::EmptyDataset`] | `samples` is empty |
    /// | [`ModelError::ZeroFeatures`] | samples have no columns |
    /// | [`ModelError::FeatureCountMismatch`] | ragged sample rows |
    /// | [`ModelError::NonFiniteParameter`] | a sample value is NaN or infinite |
    #[instrument(skip_all, fields(n_samples = samples.len()))]
    pub fn fit(samples: &[Vec<f64>]) -> Result<Self, ModelError> {
        let first = samples.first().ok_or(ModelError::EmptyDataset)?;
        let n_features = first.len();
        if n_features == 0 {
            return Err(ModelError::ZeroFeatures);
        }
        for (row, sample) in samples.iter().enumerate() {
            if sample.len() != n_features {
                return Err(ModelError::FeatureCountMismatch {
                    expected: n_features,
                    got: sample.len(),
                    row,
                });
            }
            if !sample.iter().all(|v| v.is_finite()) {
                return Err(ModelError::NonFiniteParameter {
                    parameter: "training sample",
                    index: row,
                });
            }
        }

        let n = samples.len() as f64;
        let mut mean = vec![0.0f64; n_features];
        for sample in samples {
            for (m, v) in mean.iter_mut().zip(sample) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0f64; n_features];
        for sample in samples {
            for ((acc, v), m) in var.iter_mut().zip(sample).zip(&mean) {
                *acc += (v - m).powi(2);
            }
        }
        let scale: Vec<f64> = var
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std == 0.0 { 1.0 } else { std }
            })
            .collect();

        debug!(n_features, "scaler fitted");
        Self::new(mean, scale)
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.mean.is_empty() {
            return Err(ModelError::ZeroFeatures);
        }
        if self.scale.len() != self.mean.len() {
            return Err(ModelError::FeatureCountMismatch {
                expected: self.mean.len(),
                got: self.scale.len(),
                row: 0,
            });
        }
        if let Some(index) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(ModelError::NonFiniteParameter {
                parameter: "mean",
                index,
            });
        }
        if let Some(index) = self.scale.iter().position(|s| !s.is_finite()) {
            return Err(ModelError::NonFiniteParameter {
                parameter: "scale",
                index,
            });
        }
        if let Some(feature_index) = self.scale.iter().position(|s| *s == 0.0) {
            return Err(ModelError::ZeroScale { feature_index });
        }
        Ok(())
    }

    /// Standardise one sample.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn transform(&self, sample: &[f64]) -> Result<Vec<f64>, ModelError> {
        if sample.len() != self.mean.len() {
            return Err(ModelError::PredictionFeatureMismatch {
                expected: self.mean.len(),
                got: sample.len(),
            });
        }
        Ok(sample
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }

    /// Return the number of features.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Return the per-feature means.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Return the per-feature scales.
    #[must_use]
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}
