//! Domain types for dermis-io.

use std::path::{Path, PathBuf};

use crate::IoError;

/// A case identifier from the first manifest column. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseId(String);

impl CaseId {
    pub(crate) fn new(id: String) -> Self {
        debug_assert!(!id.is_empty(), "case ID must not be empty");
        Self(id)
    }

    /// Return the case ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prefix of the result files a batch run writes, restricted to `[a-zA-Z0-9_-]+`
/// so it cannot escape the results directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] for an empty name or one
    /// with any other character.
    pub fn new(name: String) -> Result<Self, IoError> {
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-');
        if name.is_empty() || !name.chars().all(allowed) {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of a case manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    case_id: CaseId,
    image_path: PathBuf,
    age: f64,
    sex: String,
}

impl CaseRecord {
    pub(crate) fn new(case_id: CaseId, image_path: PathBuf, age: f64, sex: String) -> Self {
        Self {
            case_id,
            image_path,
            age,
            sex,
        }
    }

    /// Return the case ID.
    #[must_use]
    pub fn case_id(&self) -> &CaseId {
        &self.case_id
    }

    /// Return the image path, already resolved against the manifest directory.
    #[must_use]
    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    /// Return the patient age as written in the manifest.
    #[must_use]
    pub fn age(&self) -> f64 {
        self.age
    }

    /// Return the raw sex label as written in the manifest.
    #[must_use]
    pub fn sex(&self) -> &str {
        &self.sex
    }
}

/// The validated cases of one manifest file, in file order.
#[derive(Debug)]
pub struct Manifest {
    cases: Vec<CaseRecord>,
}

impl Manifest {
    pub(crate) fn new(cases: Vec<CaseRecord>) -> Self {
        Self { cases }
    }

    /// Return the cases.
    #[must_use]
    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    /// Return the number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Return `true` if there are no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
