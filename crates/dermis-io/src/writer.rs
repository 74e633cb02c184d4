//! JSON result writer for batch predictions and extracted features.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{CaseId, ExperimentName};

/// Per-model `[P(benign), P(malignant)]` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Probabilities {
    /// Classifier A's estimate.
    pub model_a: [f64; 2],
    /// Classifier B's estimate.
    pub model_b: [f64; 2],
}

/// What happened to one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// The ensemble produced a decision.
    Predicted {
        /// Final label.
        label: String,
        /// Classifier A's label.
        model_a: String,
        /// Classifier B's label.
        model_b: String,
        /// Arbitration reason.
        reason: String,
        /// Scaled component used for arbitration.
        arbitration_value: f64,
        /// Probability estimates, when both classifiers support them.
        #[serde(skip_serializing_if = "Option::is_none")]
        probabilities: Option<Probabilities>,
    },
    /// The case could not be evaluated, typically an undecodable image.
    Failed {
        /// Error message including its causes.
        error: String,
    },
}

/// A case ID together with its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    /// The case.
    pub case_id: CaseId,
    /// Its outcome.
    pub outcome: CaseOutcome,
}

/// A case ID together with its extracted feature values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    /// The case.
    pub case_id: CaseId,
    /// Feature values in the writer's `feature_names` order.
    pub values: Vec<f64>,
}

/// Writes batch results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_predict.json` and
/// `{experiment}_features.json`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Return the path of `{experiment}_{suffix}.json`.
    #[must_use]
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{suffix}.json", self.experiment.as_str()))
    }

    fn write_json<T: Serialize>(&self, path: &Path, artifact: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::SerializeJson {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, &json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write batch predictions to `{experiment}_predict.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(n_cases = records.len()))]
    pub fn write_predictions(&self, records: &[PredictionRecord]) -> Result<PathBuf, IoError> {
        let path = self.output_path("predict");

        let cases: Vec<CaseEntry<'_>> = records
            .iter()
            .map(|r| CaseEntry {
                case_id: r.case_id.as_str(),
                outcome: &r.outcome,
            })
            .collect();
        let n_failed = records
            .iter()
            .filter(|r| matches!(r.outcome, CaseOutcome::Failed { .. }))
            .count();

        let artifact = PredictArtifact {
            experiment: self.experiment.as_str(),
            n_cases: records.len(),
            n_failed,
            cases,
        };
        self.write_json(&path, &artifact)?;

        info!(path = %path.display(), n_failed, "predictions written");
        Ok(path)
    }

    /// Write extracted features to `{experiment}_features.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(n_cases = records.len()))]
    pub fn write_features(&self, feature_names: &[&str], records: &[FeatureRecord]) -> Result<PathBuf, IoError> {
        let path = self.output_path("features");

        let cases: Vec<FeatureEntry<'_>> = records
            .iter()
            .map(|r| FeatureEntry {
                case_id: r.case_id.as_str(),
                values: &r.values,
            })
            .collect();

        let artifact = FeaturesArtifact {
            experiment: self.experiment.as_str(),
            feature_names,
            cases,
        };
        self.write_json(&path, &artifact)?;

        info!(path = %path.display(), "features written");
        Ok(path)
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct PredictArtifact<'a> {
    experiment: &'a str,
    n_cases: usize,
    n_failed: usize,
    cases: Vec<CaseEntry<'a>>,
}

#[derive(Serialize)]
struct CaseEntry<'a> {
    case_id: &'a str,
    #[serde(flatten)]
    outcome: &'a CaseOutcome,
}

#[derive(Serialize)]
struct FeaturesArtifact<'a> {
    experiment: &'a str,
    feature_names: &'a [&'a str],
    cases: Vec<FeatureEntry<'a>>,
}

#[derive(Serialize)]
struct FeatureEntry<'a> {
    case_id: &'a str,
    values: &'a [f64],
}
