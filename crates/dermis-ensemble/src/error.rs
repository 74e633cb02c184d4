use std::fmt;
use std::path::PathBuf;

use dermis_geometry::GeometryError;
use dermis_model::ModelError;

/// Which of the three ensemble artifacts an error concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRole {
    /// The feature scaler.
    Scaler,
    /// Classifier A, specialised for irregular lesions.
    ModelA,
    /// Classifier B, specialised for regular lesions.
    ModelB,
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scaler => f.write_str("scaler"),
            Self::ModelA => f.write_str("model A"),
            Self::ModelB => f.write_str("model B"),
        }
    }
}

/// Errors from feature extraction and ensemble prediction.
#[derive(Debug, thiserror::Error)]
pub enum EnsembleError {
    /// Returned when an artifact file cannot be loaded.
    #[error("failed to load {role} from {path}")]
    ArtifactLoad {
        /// The artifact being loaded.
        role: ArtifactRole,
        /// Path of the artifact file.
        path: PathBuf,
        /// The underlying load failure.
        source: ModelError,
    },

    /// Returned when an artifact expects a feature count other than the ensemble's.
    #[error("{role} expects {got} features, the ensemble provides {expected}")]
    ArtifactFeatureMismatch {
        /// The offending artifact.
        role: ArtifactRole,
        /// The ensemble's feature count.
        expected: usize,
        /// The artifact's feature count.
        got: usize,
    },

    /// Returned when the lesion image cannot be decoded.
    #[error("failed to read lesion image")]
    Image {
        /// The underlying decode failure.
        #[from]
        source: GeometryError,
    },

    /// Returned when the scaler rejects a feature vector.
    #[error("failed to scale feature vector")]
    Scale {
        /// The underlying scaler error.
        source: ModelError,
    },

    /// Returned when a classifier fails to evaluate a scaled vector.
    #[error("{role} failed to evaluate the feature vector")]
    Predict {
        /// The classifier that failed.
        role: ArtifactRole,
        /// The underlying classifier error.
        source: ModelError,
    },
}
