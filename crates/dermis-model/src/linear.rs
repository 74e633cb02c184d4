//! Linear decision-function classifier with optional Platt calibration.

use crate::classifier::{Classifier, ClassifierKind};
use crate::distribution::ClassDistribution;
use crate::error::ModelError;
use crate::label::Label;

/// Sigmoid calibration of a decision value `f`:
/// `P(malignant) = 1 / (1 + exp(a·f + b))`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlattScaling {
    /// Slope (negative for a well-oriented model).
    pub a: f64,
    /// Offset.
    pub b: f64,
}

/// A linear classifier: malignant when `w·x + b > 0`.
///
/// Probability estimates are only available when the model carries
/// [`PlattScaling`] parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LinearMargin {
    weights: Vec<f64>,
    intercept: f64,
    platt: Option<PlattScaling>,
}

impl LinearMargin {
    /// Build a model from its weights and intercept.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ZeroFeatures`] for empty weights and
    /// [`ModelError::NonFiniteParameter`] for any NaN or infinite coefficient.
    pub fn new(weights: Vec<f64>, intercept: f64, platt: Option<PlattScaling>) -> Result<Self, ModelError> {
        let model = Self {
            weights,
            intercept,
            platt,
        };
        model.validate()?;
        Ok(model)
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.weights.is_empty() {
            return Err(ModelError::ZeroFeatures);
        }
        if let Some(index) = self.weights.iter().position(|w| !w.is_finite()) {
            return Err(ModelError::NonFiniteParameter {
                parameter: "weight",
                index,
            });
        }
        if !self.intercept.is_finite() {
            return Err(ModelError::NonFiniteParameter {
                parameter: "intercept",
                index: 0,
            });
        }
        if let Some(PlattScaling { a, b }) = self.platt {
            if let Some(index) = [a, b].iter().position(|v| !v.is_finite()) {
                return Err(ModelError::NonFiniteParameter {
                    parameter: "platt coefficient",
                    index,
                });
            }
        }
        Ok(())
    }

    /// Return `w·x + b`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PredictionFeatureMismatch`] when `sample.len() != n_features`.
    pub fn decision_function(&self, sample: &[f64]) -> Result<f64, ModelError> {
        if sample.len() != self.weights.len() {
            return Err(ModelError::PredictionFeatureMismatch {
                expected: self.weights.len(),
                got: sample.len(),
            });
        }
        let dot: f64 = self.weights.iter().zip(sample).map(|(w, x)| w * x).sum();
        Ok(dot + self.intercept)
    }

    /// Return the calibration parameters, if any.
    #[must_use]
    pub fn platt(&self) -> Option<PlattScaling> {
        self.platt
    }
}

impl Classifier for LinearMargin {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::LinearMargin
    }

    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, sample: &[f64]) -> Result<Label, ModelError> {
        if self.decision_function(sample)? > 0.0 {
            Ok(Label::Malignant)
        } else {
            Ok(Label::Benign)
        }
    }

    fn predict_proba(&self, sample: &[f64]) -> Result<ClassDistribution, ModelError> {
        let PlattScaling { a, b } = self.platt.ok_or(ModelError::ProbabilityUnsupported {
            kind: ClassifierKind::LinearMargin,
        })?;
        let f = self.decision_function(sample)?;
        Ok(ClassDistribution::from_malignant(1.0 / (1.0 + (a * f + b).exp())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(platt: Option<PlattScaling>) -> LinearMargin {
        LinearMargin::new(vec![1.0, -2.0], 0.5, platt).unwrap()
    }

    #[test]
    fn sign_of_margin_decides() {
        let m = model(None);
        assert_eq!(m.predict(&[1.0, 0.0]).unwrap(), Label::Malignant);
        assert_eq!(m.predict(&[0.0, 1.0]).unwrap(), Label::Benign);
        // Exactly on the boundary is benign.
        assert_eq!(m.predict(&[-0.5, 0.0]).unwrap(), Label::Benign);
    }

    #[test]
    fn uncalibrated_has_no_probabilities() {
        let err = model(None).predict_proba(&[1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::ProbabilityUnsupported { kind: ClassifierKind::LinearMargin }
        ));
    }

    #[test]
    fn platt_sigmoid() {
        let m = model(Some(PlattScaling { a: -2.0, b: 0.0 }));
        let proba = m.predict_proba(&[-0.5, 0.0]).unwrap();
        assert!((proba.malignant() - 0.5).abs() < 1e-12);
        let proba = m.predict_proba(&[1.0, 0.0]).unwrap();
        let expected = 1.0 / (1.0 + (-3.0f64).exp());
        assert!((proba.malignant() - expected).abs() < 1e-12);
        assert!((proba.benign() + proba.malignant() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(
            LinearMargin::new(vec![], 0.0, None).unwrap_err(),
            ModelError::ZeroFeatures
        ));
        assert!(LinearMargin::new(vec![f64::INFINITY], 0.0, None).is_err());
        assert!(LinearMargin::new(vec![1.0], f64::NAN, None).is_err());
        assert!(LinearMargin::new(vec![1.0], 0.0, Some(PlattScaling { a: f64::NAN, b: 0.0 })).is_err());
    }

    #[test]
    fn wrong_sample_width() {
        let err = model(None).decision_function(&[1.0]).unwrap_err();
        assert!(matches!(err, ModelError::PredictionFeatureMismatch { expected: 2, got: 1 }));
    }
}
