use std::path::PathBuf;

use crate::classifier::ClassifierKind;
use crate::serialize::ArtifactKind;

/// Errors from constructing, loading, or evaluating fitted models.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Returned when a model is built with zero feature columns.
    #[error("model must have at least one feature")]
    ZeroFeatures,

    /// Returned when a k-NN model is built without reference samples.
    #[error("k-nearest-neighbours model has no reference samples")]
    EmptyReferenceSet,

    /// Returned when k is zero or exceeds the number of reference samples.
    #[error("k must be in [1, {n_samples}], got {k}")]
    InvalidNeighbourCount {
        /// The invalid k value provided.
        k: usize,
        /// The number of stored reference samples.
        n_samples: usize,
    },

    /// Returned when the number of labels differs from the number of samples.
    #[error("{samples} reference samples but {labels} labels")]
    LabelCountMismatch {
        /// Number of reference samples.
        samples: usize,
        /// Number of labels.
        labels: usize,
    },

    /// Returned when a stored sample or parameter vector has the wrong length.
    #[error("row {row} has {got} values, expected {expected}")]
    FeatureCountMismatch {
        /// The expected number of values.
        expected: usize,
        /// The actual number of values.
        got: usize,
        /// The zero-based index of the offending row.
        row: usize,
    },

    /// Returned when a prediction input has the wrong number of features.
    #[error("prediction input has {got} features, expected {expected}")]
    PredictionFeatureMismatch {
        /// The expected number of features.
        expected: usize,
        /// The actual number of features in the prediction input.
        got: usize,
    },

    /// Returned when a stored model parameter is NaN or infinite.
    #[error("non-finite {parameter} at index {index}")]
    NonFiniteParameter {
        /// Which parameter block contained the value.
        parameter: &'static str,
        /// The zero-based position of the value.
        index: usize,
    },

    /// Returned when a feature scale is zero.
    #[error("scale of feature {feature_index} is zero")]
    ZeroScale {
        /// The zero-based feature column with zero scale.
        feature_index: usize,
    },

    /// Returned when a scaler is fitted on zero samples.
    #[error("cannot fit a scaler on zero samples")]
    EmptyDataset,

    /// Returned when a class index does not name a diagnosis.
    #[error("class index {index} is not a valid label (expected 0 or 1)")]
    InvalidLabel {
        /// The out-of-range class index.
        index: usize,
    },

    /// Returned when a forest contains no trees.
    #[error("random forest has no trees")]
    EmptyForest,

    /// Returned when a decision tree arena is malformed.
    #[error("invalid tree node {node_index}: {reason}")]
    InvalidNode {
        /// Arena index of the offending node.
        node_index: usize,
        /// Human-readable description of the defect.
        reason: String,
    },

    /// Returned when trees in one forest disagree on their feature count.
    #[error("tree {tree_index} expects {got} features, forest expects {expected}")]
    TreeFeatureMismatch {
        /// The forest-wide feature count.
        expected: usize,
        /// The tree's feature count.
        got: usize,
        /// The zero-based index of the offending tree.
        tree_index: usize,
    },

    /// Returned when a classifier cannot estimate class probabilities.
    #[error("{kind} classifier does not support probability estimates")]
    ProbabilityUnsupported {
        /// The classifier family that was asked.
        kind: ClassifierKind,
    },

    /// Returned when artifact serialization fails.
    #[error("failed to serialize artifact")]
    SerializeArtifact {
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when artifact deserialization fails.
    #[error("failed to deserialize artifact from {path}")]
    DeserializeArtifact {
        /// Path to the artifact that could not be deserialized.
        path: PathBuf,
        /// The underlying bincode error.
        source: Box<bincode::ErrorKind>,
    },

    /// Returned when writing an artifact file fails.
    #[error("failed to write artifact to {path}")]
    WriteArtifact {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading an artifact file fails.
    #[error("failed to read artifact from {path}")]
    ReadArtifact {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a file does not start with the artifact magic bytes.
    #[error("{path} is not a model artifact")]
    NotAnArtifact {
        /// Path to the offending file.
        path: PathBuf,
    },

    /// Returned when loading an artifact with an incompatible format version.
    #[error("incompatible artifact version in {path}: expected {expected}, found {found}")]
    IncompatibleArtifactVersion {
        /// The format version this build expects.
        expected: u32,
        /// The format version found in the file.
        found: u32,
        /// Path to the artifact.
        path: PathBuf,
    },

    /// Returned when an artifact holds a different kind of object than requested.
    #[error("{path} holds a {found} artifact, expected a {expected}")]
    ArtifactKindMismatch {
        /// The kind the caller asked for.
        expected: ArtifactKind,
        /// The kind recorded in the file.
        found: ArtifactKind,
        /// Path to the artifact.
        path: PathBuf,
    },

    /// Returned when a decoded artifact fails structural validation.
    #[error("artifact {path} is malformed")]
    InvalidArtifact {
        /// Path to the artifact.
        path: PathBuf,
        /// The validation failure.
        source: Box<ModelError>,
    },
}
