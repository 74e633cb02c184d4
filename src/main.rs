use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use dermis_ensemble::{
    ArtifactPaths, ConfidenceScores, Decision, Ensemble, FEATURE_NAMES, FeatureVector,
    extract_features_for_prediction,
};
use dermis_io::{
    CaseOutcome, ExperimentName, FeatureRecord, ManifestReader, PredictionRecord, Probabilities,
    ResultWriter,
};
use dermis_model::{ArtifactSummary, Label, inspect_artifact};

#[derive(Parser)]
#[command(name = "dermis")]
#[command(about = "Benign/malignant skin-lesion classification from dermoscopic images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Locations of the three fitted artifacts.
#[derive(Args, Debug, Clone)]
struct ArtifactArgs {
    /// Fitted feature scaler
    #[arg(long, default_value = "models/scaler.bin")]
    scaler: PathBuf,

    /// Classifier A, trusted on high-asymmetry lesions
    #[arg(long, default_value = "models/model_a.bin")]
    model_a: PathBuf,

    /// Classifier B, trusted on low-asymmetry lesions
    #[arg(long, default_value = "models/model_b.bin")]
    model_b: PathBuf,
}

impl ArtifactArgs {
    fn load(&self) -> Result<Ensemble> {
        let paths = ArtifactPaths::new(&self.scaler, &self.model_a, &self.model_b);
        Ensemble::load(&paths).context("failed to load model artifacts")
    }
}

/// Patient metadata and image for a single case.
#[derive(Args, Debug, Clone)]
struct CaseArgs {
    /// Path to the lesion image
    #[arg(long)]
    image: PathBuf,

    /// Patient age in years
    #[arg(long)]
    age: f64,

    /// Patient sex ("male" or anything else)
    #[arg(long)]
    sex: String,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the seven-component feature vector for one image
    Features {
        #[command(flatten)]
        case: CaseArgs,
    },

    /// Classify one lesion image
    Predict {
        #[command(flatten)]
        case: CaseArgs,

        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Also report per-model probability estimates
        #[arg(long, default_value_t = false)]
        confidence: bool,
    },

    /// Classify every case listed in a CSV manifest
    Batch {
        /// CSV manifest with columns case_id,image_path,age,sex
        #[arg(long)]
        manifest: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Also report per-model probability estimates
        #[arg(long, default_value_t = false)]
        confidence: bool,
    },

    /// Print the header of one or more artifact files
    Inspect {
        /// Artifact files to inspect
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct FeaturesOutput {
    image: String,
    features: Vec<FeatureOutput>,
}

#[derive(Serialize)]
struct FeatureOutput {
    name: &'static str,
    value: f64,
}

#[derive(Serialize)]
struct PredictOutput {
    image: String,
    label: &'static str,
    model_a: &'static str,
    model_b: &'static str,
    reason: &'static str,
    arbitration_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    probabilities: Option<Probabilities>,
}

#[derive(Serialize)]
struct BatchOutput {
    experiment: String,
    n_cases: usize,
    n_malignant: usize,
    n_benign: usize,
    n_failed: usize,
    predictions_path: String,
    features_path: String,
}

#[derive(Serialize)]
struct InspectOutput {
    path: String,
    #[serde(flatten)]
    summary: ArtifactSummary,
}

fn display_label(label: Label) -> &'static str {
    match label {
        Label::Benign => "BENIGN",
        Label::Malignant => "MALIGNANT",
    }
}

fn probabilities(scores: ConfidenceScores) -> Option<Probabilities> {
    match scores {
        ConfidenceScores::Available { model_a, model_b } => Some(Probabilities {
            model_a: model_a.as_array(),
            model_b: model_b.as_array(),
        }),
        ConfidenceScores::Unavailable => None,
    }
}

fn predicted_outcome(decision: &Decision, probabilities: Option<Probabilities>) -> CaseOutcome {
    CaseOutcome::Predicted {
        label: display_label(decision.label).to_string(),
        model_a: display_label(decision.model_a).to_string(),
        model_b: display_label(decision.model_b).to_string(),
        reason: decision.reason().to_string(),
        arbitration_value: decision.arbitration_value,
        probabilities,
    }
}

/// Probability estimates for a case whose decision is already made.
///
/// Estimation failures are logged and reported as absent; they never void
/// the decision.
fn estimate_probabilities(ensemble: &Ensemble, features: &FeatureVector) -> Option<Probabilities> {
    match ensemble.confidence(features) {
        Ok(ConfidenceScores::Unavailable) => {
            warn!("probability estimates unavailable for the loaded classifiers");
            None
        }
        Ok(scores) => probabilities(scores),
        Err(e) => {
            warn!(error = %format!("{:#}", anyhow::Error::new(e)), "probability estimation failed");
            None
        }
    }
}

/// Evaluate one case, folding any failure into the case outcome.
fn evaluate_case(
    ensemble: &Ensemble,
    features: Result<FeatureVector, dermis_ensemble::EnsembleError>,
    confidence: bool,
) -> CaseOutcome {
    let evaluated = features.and_then(|features| {
        let decision = ensemble.predict(&features)?;
        let scores = confidence
            .then(|| estimate_probabilities(ensemble, &features))
            .flatten();
        Ok((decision, scores))
    });
    match evaluated {
        Ok((decision, scores)) => predicted_outcome(&decision, scores),
        Err(e) => CaseOutcome::Failed {
            error: format!("{:#}", anyhow::Error::new(e)),
        },
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Features { case } => {
            let features = extract_features_for_prediction(&case.image, case.age, &case.sex)
                .with_context(|| format!("failed to extract features from {}", case.image.display()))?;

            let output = FeaturesOutput {
                image: case.image.display().to_string(),
                features: FEATURE_NAMES
                    .iter()
                    .zip(features.to_array())
                    .map(|(&name, value)| FeatureOutput { name, value })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Predict {
            case,
            artifacts,
            confidence,
        } => {
            let ensemble = artifacts.load()?;
            let features = extract_features_for_prediction(&case.image, case.age, &case.sex)
                .with_context(|| format!("failed to extract features from {}", case.image.display()))?;

            let decision = ensemble.predict(&features).context("prediction failed")?;
            let probabilities = confidence
                .then(|| estimate_probabilities(&ensemble, &features))
                .flatten();
            info!(
                label = display_label(decision.label),
                arbitration = decision.arbitration.as_str(),
                "case classified"
            );

            let output = PredictOutput {
                image: case.image.display().to_string(),
                label: display_label(decision.label),
                model_a: display_label(decision.model_a),
                model_b: display_label(decision.model_b),
                reason: decision.reason(),
                arbitration_value: decision.arbitration_value,
                probabilities,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Batch {
            manifest,
            experiment,
            output_dir,
            artifacts,
            confidence,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let ensemble = artifacts.load()?;

            let manifest = ManifestReader::new(&manifest)
                .read()
                .context("failed to read case manifest")?;
            info!(n_cases = manifest.len(), "manifest loaded");

            let features: Vec<_> = manifest
                .cases()
                .par_iter()
                .map(|case| extract_features_for_prediction(case.image_path(), case.age(), case.sex()))
                .collect();

            let feature_records: Vec<FeatureRecord> = manifest
                .cases()
                .iter()
                .zip(&features)
                .filter_map(|(case, features)| {
                    features.as_ref().ok().map(|features| FeatureRecord {
                        case_id: case.case_id().clone(),
                        values: features.as_slice().to_vec(),
                    })
                })
                .collect();

            let predictions: Vec<PredictionRecord> = manifest
                .cases()
                .par_iter()
                .zip(features.into_par_iter())
                .map(|(case, features)| {
                    let outcome = evaluate_case(&ensemble, features, confidence);
                    if let CaseOutcome::Failed { error } = &outcome {
                        warn!(case_id = %case.case_id(), error = %error, "case failed");
                    }
                    PredictionRecord {
                        case_id: case.case_id().clone(),
                        outcome,
                    }
                })
                .collect();

            let count_label = |label: &str| {
                predictions
                    .iter()
                    .filter(|r| matches!(&r.outcome, CaseOutcome::Predicted { label: l, .. } if l == label))
                    .count()
            };
            let n_malignant = count_label(display_label(Label::Malignant));
            let n_benign = count_label(display_label(Label::Benign));
            let n_failed = predictions.len() - n_malignant - n_benign;

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let predictions_path = writer.write_predictions(&predictions)?;
            let features_path = writer.write_features(&FEATURE_NAMES, &feature_records)?;
            info!(n_malignant, n_benign, n_failed, "batch complete");

            let output = BatchOutput {
                experiment,
                n_cases: predictions.len(),
                n_malignant,
                n_benign,
                n_failed,
                predictions_path: predictions_path.display().to_string(),
                features_path: features_path.display().to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Inspect { paths } => {
            let output = paths
                .iter()
                .map(|path| {
                    let summary = inspect_artifact(path)
                        .with_context(|| format!("failed to inspect {}", path.display()))?;
                    Ok(InspectOutput {
                        path: path.display().to_string(),
                        summary,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
