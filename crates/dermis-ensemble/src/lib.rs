//! Feature assembly and the arbitrated two-classifier ensemble.
//!
//! [`extract_features_for_prediction`] turns an image plus patient metadata
//! into a [`FeatureVector`]; an [`Ensemble`] built from one scaler and two
//! classifiers turns that vector into a [`Decision`] with an auditable
//! reason, and optionally into per-model [`ConfidenceScores`].

mod decision;
mod ensemble;
mod error;
mod features;

pub use decision::{Arbitration, ConfidenceScores, Decision};
pub use ensemble::{ARBITRATION_INDEX, ArtifactPaths, Ensemble};
pub use error::{ArtifactRole, EnsembleError};
pub use features::{
    FEATURE_COUNT, FEATURE_NAMES, FeatureVector, Sex, assemble_features, extract_features_for_prediction,
};
