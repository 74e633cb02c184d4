//! Versioned artifact files via bincode.
//!
//! Every artifact starts with [`ARTIFACT_MAGIC`] followed by a small header
//! (format version, artifact kind, feature count) and then the payload.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use crate::classifier::{Classifier, ClassifierKind, FittedClassifier};
use crate::error::ModelError;
use crate::scaler::StandardScaler;

/// Leading bytes of every artifact file.
pub const ARTIFACT_MAGIC: [u8; 4] = *b"DRMS";

/// Current binary format version.
pub const FORMAT_VERSION: u32 = 1;

/// What an artifact file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// A [`StandardScaler`].
    Scaler,
    /// A [`FittedClassifier`].
    Classifier,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scaler => f.write_str("scaler"),
            Self::Classifier => f.write_str("classifier"),
        }
    }
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
struct ArtifactHeader {
    magic: [u8; 4],
    format_version: u32,
    kind: ArtifactKind,
    n_features: usize,
    classifier: Option<ClassifierKind>,
}

impl ArtifactHeader {
    fn new(kind: ArtifactKind, n_features: usize, classifier: Option<ClassifierKind>) -> Self {
        Self {
            magic: ARTIFACT_MAGIC,
            format_version: FORMAT_VERSION,
            kind,
            n_features,
            classifier,
        }
    }
}

#[derive(serde::Serialize)]
struct EnvelopeRef<'a, T> {
    header: ArtifactHeader,
    payload: &'a T,
}

#[derive(serde::Deserialize)]
struct Envelope<T> {
    header: ArtifactHeader,
    payload: T,
}

/// Header information of an artifact, as reported by [`inspect_artifact`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ArtifactSummary {
    /// What the artifact holds.
    pub kind: ArtifactKind,
    /// Format version recorded in the file.
    pub format_version: u32,
    /// Number of features the stored object expects.
    pub n_features: usize,
    /// Model family, for classifier artifacts.
    pub classifier: Option<ClassifierKind>,
    /// File size in bytes.
    pub size_bytes: usize,
}

fn write_artifact<T: Serialize>(path: &Path, header: ArtifactHeader, payload: &T) -> Result<(), ModelError> {
    let bytes = bincode::serialize(&EnvelopeRef { header, payload })
        .map_err(|e| ModelError::SerializeArtifact { source: e })?;

    std::fs::write(path, &bytes).map_err(|e| ModelError::WriteArtifact {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(
        size_bytes = bytes.len(),
        kind = %header.kind,
        n_features = header.n_features,
        "artifact saved"
    );
    Ok(())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ModelError> {
    std::fs::read(path).map_err(|e| ModelError::ReadArtifact {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Decode just the header. bincode ignores the trailing payload bytes.
fn read_header(path: &Path, bytes: &[u8]) -> Result<ArtifactHeader, ModelError> {
    if !bytes.starts_with(&ARTIFACT_MAGIC) {
        return Err(ModelError::NotAnArtifact {
            path: path.to_path_buf(),
        });
    }
    bincode::deserialize(bytes).map_err(|e| ModelError::DeserializeArtifact {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_artifact<T: DeserializeOwned>(path: &Path, expected: ArtifactKind) -> Result<(ArtifactHeader, T), ModelError> {
    let bytes = read_bytes(path)?;
    let header = read_header(path, &bytes)?;

    if header.format_version != FORMAT_VERSION {
        return Err(ModelError::IncompatibleArtifactVersion {
            expected: FORMAT_VERSION,
            found: header.format_version,
            path: path.to_path_buf(),
        });
    }
    if header.kind != expected {
        return Err(ModelError::ArtifactKindMismatch {
            expected,
            found: header.kind,
            path: path.to_path_buf(),
        });
    }

    let envelope: Envelope<T> = bincode::deserialize(&bytes).map_err(|e| ModelError::DeserializeArtifact {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok((envelope.header, envelope.payload))
}

fn check_loaded(
    path: &Path,
    header: &ArtifactHeader,
    n_features: usize,
    validation: Result<(), ModelError>,
) -> Result<(), ModelError> {
    let invalid = |source: ModelError| ModelError::InvalidArtifact {
        path: path.to_path_buf(),
        source: Box::new(source),
    };
    validation.map_err(invalid)?;
    if header.n_features != n_features {
        return Err(invalid(ModelError::FeatureCountMismatch {
            expected: header.n_features,
            got: n_features,
            row: 0,
        }));
    }
    Ok(())
}

impl FittedClassifier {
    /// Save the classifier to an artifact file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ModelError::SerializeArtifact`] | bincode encoding failed |
    /// | [`ModelError::WriteArtifact`] | file write failed |
    #[instrument(skip(self), fields(path = %path.as_ref().display(), kind = %self.kind()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let header = ArtifactHeader::new(ArtifactKind::Classifier, self.n_features(), Some(self.kind()));
        write_artifact(path.as_ref(), header, self)
    }

    /// Load a classifier from an artifact file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ModelError::ReadArtifact`] | file read failed |
    /// | [`ModelError::NotAnArtifact`] | missing magic bytes |
    /// | [`ModelError::DeserializeArtifact`] | bincode decoding failed |
    /// | [`ModelError::IncompatibleArtifactVersion`] | format version mismatch |
    /// | [`ModelError::ArtifactKindMismatch`] | the file holds a scaler |
    /// | [`ModelError::InvalidArtifact`] | the decoded model is malformed |
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let (header, model): (_, FittedClassifier) = read_artifact(path, ArtifactKind::Classifier)?;
        check_loaded(path, &header, model.n_features(), model.validate())?;
        debug!(kind = %model.kind(), n_features = header.n_features, "classifier loaded");
        Ok(model)
    }
}

impl StandardScaler {
    /// Save the scaler to an artifact file.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ModelError::SerializeArtifact`] | bincode encoding failed |
    /// | [`ModelError::WriteArtifact`] | file write failed |
    #[instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let header = ArtifactHeader::new(ArtifactKind::Scaler, self.n_features(), None);
        write_artifact(path.as_ref(), header, self)
    }

    /// Load a scaler from an artifact file.
    ///
    /// # Errors
    ///
    /// Same as [`FittedClassifier::load`], with
    /// [`ModelError::ArtifactKindMismatch`] when the file holds a classifier.
    #[instrument(fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let (header, scaler): (_, StandardScaler) = read_artifact(path, ArtifactKind::Scaler)?;
        check_loaded(path, &header, scaler.n_features(), scaler.validate())?;
        debug!(n_features = header.n_features, "scaler loaded");
        Ok(scaler)
    }
}

/// Read an artifact's header without decoding or checking its payload.
///
/// # Errors
///
/// Returns [`ModelError::ReadArtifact`], [`ModelError::NotAnArtifact`] or
/// [`ModelError::DeserializeArtifact`].
#[instrument(fields(path = %path.as_ref().display()))]
pub fn inspect_artifact(path: impl AsRef<Path>) -> Result<ArtifactSummary, ModelError> {
    let path = path.as_ref();
    let bytes = read_bytes(path)?;
    let header = read_header(path, &bytes)?;
    Ok(ArtifactSummary {
        kind: header.kind,
        format_version: header.format_version,
        n_features: header.n_features,
        classifier: header.classifier,
        size_bytes: bytes.len(),
    })
}
