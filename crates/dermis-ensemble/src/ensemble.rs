//! The loaded scaler + two classifiers, and the prediction entry points.

use std::path::{Path, PathBuf};

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, instrument};

use dermis_model::{Classifier, FittedClassifier, ModelError, StandardScaler};

use crate::decision::{Arbitration, ConfidenceScores, Decision};
use crate::error::{ArtifactRole, EnsembleError};
use crate::features::{FEATURE_COUNT, FeatureVector};

/// Scaled vector component inspected when the classifiers disagree.
pub const ARBITRATION_INDEX: usize = 2;

/// Locations of the three artifacts an [`Ensemble`] is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Standard scaler artifact.
    pub scaler: PathBuf,
    /// Classifier A artifact.
    pub model_a: PathBuf,
    /// Classifier B artifact.
    pub model_b: PathBuf,
}

impl ArtifactPaths {
    /// Explicit paths for each artifact.
    pub fn new(scaler: impl Into<PathBuf>, model_a: impl Into<PathBuf>, model_b: impl Into<PathBuf>) -> Self {
        Self {
            scaler: scaler.into(),
            model_a: model_a.into(),
            model_b: model_b.into(),
        }
    }

    /// `scaler.bin`, `model_a.bin` and `model_b.bin` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("scaler.bin"), dir.join("model_a.bin"), dir.join("model_b.bin"))
    }
}

/// Immutable prediction context: one scaler and two classifiers.
///
/// Classifier A is trusted on disagreement when the scaled arbitration
/// component is positive, classifier B otherwise. An `Ensemble` holds no
/// mutable state and can be shared across threads.
pub struct Ensemble {
    scaler: StandardScaler,
    model_a: Box<dyn Classifier>,
    model_b: Box<dyn Classifier>,
}

impl std::fmt::Debug for Ensemble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ensemble")
            .field("scaler", &self.scaler)
            .field("model_a", &self.model_a.kind())
            .field("model_b", &self.model_b.kind())
            .finish()
    }
}

fn check_width(role: ArtifactRole, got: usize) -> Result<(), EnsembleError> {
    if got == FEATURE_COUNT {
        Ok(())
    } else {
        Err(EnsembleError::ArtifactFeatureMismatch {
            role,
            expected: FEATURE_COUNT,
            got,
        })
    }
}

impl Ensemble {
    /// Build an ensemble from already constructed parts.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::ArtifactFeatureMismatch`] if any part does not
    /// expect exactly [`FEATURE_COUNT`] features.
    pub fn new(
        scaler: StandardScaler,
        model_a: impl Classifier + 'static,
        model_b: impl Classifier + 'static,
    ) -> Result<Self, EnsembleError> {
        check_width(ArtifactRole::Scaler, scaler.n_features())?;
        check_width(ArtifactRole::ModelA, model_a.n_features())?;
        check_width(ArtifactRole::ModelB, model_b.n_features())?;
        Ok(Self {
            scaler,
            model_a: Box::new(model_a),
            model_b: Box::new(model_b),
        })
    }

    /// Load all three artifacts from disk.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`EnsembleError::ArtifactLoad`] | an artifact is missing, corrupt or of the wrong kind |
    /// | [`EnsembleError::ArtifactFeatureMismatch`] | an artifact does not expect 7 features |
    #[instrument(skip_all, fields(scaler = %paths.scaler.display()))]
    pub fn load(paths: &ArtifactPaths) -> Result<Self, EnsembleError> {
        let load_err = |role: ArtifactRole, path: &Path| {
            let path = path.to_path_buf();
            move |source: ModelError| EnsembleError::ArtifactLoad { role, path, source }
        };

        let scaler = StandardScaler::load(&paths.scaler).map_err(load_err(ArtifactRole::Scaler, &paths.scaler))?;
        let model_a =
            FittedClassifier::load(&paths.model_a).map_err(load_err(ArtifactRole::ModelA, &paths.model_a))?;
        let model_b =
            FittedClassifier::load(&paths.model_b).map_err(load_err(ArtifactRole::ModelB, &paths.model_b))?;

        info!(
            model_a = %model_a.kind(),
            model_b = %model_b.kind(),
            "ensemble loaded"
        );
        Self::new(scaler, model_a, model_b)
    }

    fn scale(&self, features: &FeatureVector) -> Result<Vec<f64>, EnsembleError> {
        self.scaler
            .transform(features.as_slice())
            .map_err(|source| EnsembleError::Scale { source })
    }

    /// Scale the vector, ask both classifiers, and arbitrate.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::Scale`] or [`EnsembleError::Predict`] if a
    /// fitted component rejects the vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<Decision, EnsembleError> {
        let scaled = self.scale(features)?;
        let model_a = self.model_a.predict(&scaled).map_err(|source| EnsembleError::Predict {
            role: ArtifactRole::ModelA,
            source,
        })?;
        let model_b = self.model_b.predict(&scaled).map_err(|source| EnsembleError::Predict {
            role: ArtifactRole::ModelB,
            source,
        })?;

        let arbitration_value = scaled[ARBITRATION_INDEX];
        let (label, arbitration) = Arbitration::resolve(model_a, model_b, arbitration_value);
        debug!(
            %model_a,
            %model_b,
            %label,
            arbitration_value,
            branch = arbitration.as_str(),
            "ensemble decision"
        );
        Ok(Decision {
            label,
            model_a,
            model_b,
            arbitration,
            arbitration_value,
        })
    }

    /// Ask both classifiers for class probabilities.
    ///
    /// If either classifier cannot estimate probabilities the result is
    /// [`ConfidenceScores::Unavailable`] for both.
    ///
    /// # Errors
    ///
    /// Returns [`EnsembleError::Scale`] or [`EnsembleError::Predict`] for any
    /// failure other than missing probability support.
    pub fn confidence(&self, features: &FeatureVector) -> Result<ConfidenceScores, EnsembleError> {
        let scaled = self.scale(features)?;
        let estimate = |role: ArtifactRole, model: &dyn Classifier| match model.predict_proba(&scaled) {
            Ok(distribution) => Ok(Some(distribution)),
            Err(ModelError::ProbabilityUnsupported { kind }) => {
                debug!(%role, %kind, "probability estimates unsupported");
                Ok(None)
            }
            Err(source) => Err(EnsembleError::Predict { role, source }),
        };

        let model_a = estimate(ArtifactRole::ModelA, self.model_a.as_ref())?;
        let model_b = estimate(ArtifactRole::ModelB, self.model_b.as_ref())?;
        Ok(match (model_a, model_b) {
            (Some(model_a), Some(model_b)) => ConfidenceScores::Available { model_a, model_b },
            _ => ConfidenceScores::Unavailable,
        })
    }

    /// Predict every vector independently, in parallel. Results keep input order.
    pub fn predict_batch(&self, features: &[FeatureVector]) -> Vec<Result<Decision, EnsembleError>> {
        features
            .into_par_iter()
            .map(|vector| self.predict(vector))
            .collect()
    }

    /// Return the scaler.
    #[must_use]
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Return classifier A.
    #[must_use]
    pub fn model_a(&self) -> &dyn Classifier {
        self.model_a.as_ref()
    }

    /// Return classifier B.
    #[must_use]
    pub fn model_b(&self) -> &dyn Classifier {
        self.model_b.as_ref()
    }
}
