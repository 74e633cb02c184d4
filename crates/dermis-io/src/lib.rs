//! Case manifests in, JSON results out, for the dermis pipeline.

mod domain;
mod error;
mod manifest;
mod writer;

pub use domain::{CaseId, CaseRecord, ExperimentName, Manifest};
pub use error::IoError;
pub use manifest::ManifestReader;
pub use writer::{CaseOutcome, FeatureRecord, PredictionRecord, Probabilities, ResultWriter};
