//! Fitted classifiers and feature scaling for lesion diagnosis.
//!
//! Everything here is inference-only: models are fitted elsewhere, persisted
//! as versioned bincode artifacts, and loaded read-only. Three classifier
//! families are supported (k-nearest neighbours, random forest and a linear
//! margin model), all behind the [`Classifier`] trait.

mod classifier;
mod distribution;
mod error;
mod forest;
mod knn;
mod label;
mod linear;
mod node;
mod scaler;
mod serialize;
mod tree;

pub use classifier::{Classifier, ClassifierKind, FittedClassifier};
pub use distribution::ClassDistribution;
pub use error::ModelError;
pub use forest::RandomForest;
pub use knn::{KNearestNeighbors, Weighting};
pub use label::Label;
pub use linear::{LinearMargin, PlattScaling};
pub use node::{FeatureIndex, Node, NodeIndex};
pub use scaler::StandardScaler;
pub use serialize::{ARTIFACT_MAGIC, ArtifactKind, ArtifactSummary, FORMAT_VERSION, inspect_artifact};
pub use tree::DecisionTree;
