//! CSV case manifest reader with full input validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{CaseId, CaseRecord, Manifest};

const REQUIRED_COLUMNS: [&str; 4] = ["case_id", "image_path", "age", "sex"];

/// Reads a case manifest from a CSV file.
///
/// Expected CSV format:
/// - Header row naming at least `case_id`, `image_path`, `age` and `sex`
///   (any order; extra columns are ignored)
/// - One row per case
/// - Relative image paths are resolved against the manifest's directory
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingColumn`] | A required column is absent |
/// | [`IoError::EmptyManifest`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::EmptyCaseId`] | Blank `case_id` cell |
/// | [`IoError::NonFiniteAge`] | `age` is NaN, Inf, or unparseable |
/// | [`IoError::DuplicateCaseId`] | Same `case_id` appears twice |
pub struct ManifestReader {
    path: PathBuf,
}

impl ManifestReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }

    /// Read and validate the manifest.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Manifest, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so that ragged rows surface as InconsistentRowLength.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let expected_cols = header.len();
        let mut columns = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| IoError::MissingColumn {
                    path: self.path.clone(),
                    column: name,
                })?;
        }
        let [id_col, image_col, age_col, sex_col] = columns;
        debug!(expected_cols, "read manifest header");

        let base_dir = self.path.parent().unwrap_or_else(|| Path::new(""));
        let mut cases = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }
            let cell = |col: usize| record.get(col).unwrap_or("");

            let case_id = cell(id_col).to_string();
            if case_id.is_empty() {
                return Err(IoError::EmptyCaseId {
                    path: self.path.clone(),
                    row_index,
                });
            }
            if let Some(&first_row) = seen.get(&case_id) {
                return Err(IoError::DuplicateCaseId {
                    path: self.path.clone(),
                    case_id,
                    first_row,
                    second_row: row_index,
                });
            }
            seen.insert(case_id.clone(), row_index);

            let raw_age = cell(age_col);
            let age = raw_age
                .parse::<f64>()
                .ok()
                .filter(|a| a.is_finite())
                .ok_or_else(|| IoError::NonFiniteAge {
                    path: self.path.clone(),
                    row_index,
                    raw: raw_age.to_string(),
                })?;

            let image_path = base_dir.join(cell(image_col));
            cases.push(CaseRecord::new(
                CaseId::new(case_id),
                image_path,
                age,
                cell(sex_col).to_string(),
            ));
        }

        if cases.is_empty() {
            return Err(IoError::EmptyManifest {
                path: self.path.clone(),
            });
        }

        info!(n_cases = cases.len(), "manifest loaded");
        Ok(Manifest::new(cases))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_manifest(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("cases.csv");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_valid_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            "case_id,image_path,age,sex\nc1,img/a.png,45,male\nc2,/abs/b.jpg,61.5,Female\n",
        );
        let manifest = ManifestReader::new(&path).read().unwrap();
        assert_eq!(manifest.len(), 2);

        let first = &manifest.cases()[0];
        assert_eq!(first.case_id().as_str(), "c1");
        assert_eq!(first.image_path(), dir.path().join("img/a.png"));
        assert_eq!(first.age(), 45.0);
        assert_eq!(first.sex(), "male");

        let second = &manifest.cases()[1];
        assert_eq!(second.image_path(), Path::new("/abs/b.jpg"));
        assert_eq!(second.sex(), "Female");
    }

    #[test]
    fn columns_in_any_order_with_extras() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "sex,site,age,case_id,image_path\nmale,back,30,x,x.png\n");
        let manifest = ManifestReader::new(&path).read().unwrap();
        assert_eq!(manifest.cases()[0].case_id().as_str(), "x");
        assert_eq!(manifest.cases()[0].age(), 30.0);
    }

    #[test]
    fn blank_sex_is_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "case_id,image_path,age,sex\nc1,a.png,45,\n");
        let manifest = ManifestReader::new(&path).read().unwrap();
        assert_eq!(manifest.cases()[0].sex(), "");
    }

    #[test]
    fn missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ManifestReader::new(&dir.path().join("nope.csv")).read().unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "case_id,image_path,sex\nc1,a.png,male\n");
        let err = ManifestReader::new(&path).read().unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { column: "age", .. }));
    }

    #[test]
    fn empty_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "case_id,image_path,age,sex\n");
        let err = ManifestReader::new(&path).read().unwrap_err();
        assert!(matches!(err, IoError::EmptyManifest { .. }));
    }

    #[test]
    fn ragged_row() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "case_id,image_path,age,sex\nc1,a.png,45\n");
        let err = ManifestReader::new(&path).read().unwrap_err();
        assert!(matches!(
            err,
            IoError::InconsistentRowLength { row_index: 0, expected: 4, got: 3, .. }
        ));
    }

    #[test]
    fn bad_ages() {
        for raw in ["abc", "NaN", "inf", ""] {
            let dir = TempDir::new().unwrap();
            let path = write_manifest(&dir, &format!("case_id,image_path,age,sex\nc1,a.png,{raw},male\n"));
            let err = ManifestReader::new(&path).read().unwrap_err();
            assert!(matches!(err, IoError::NonFiniteAge { row_index: 0, .. }), "{raw}");
        }
    }

    #[test]
    fn empty_case_id() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "case_id,image_path,age,sex\n,a.png,45,male\n");
        let err = ManifestReader::new(&path).read().unwrap_err();
        assert!(matches!(err, IoError::EmptyCaseId { row_index: 0, .. }));
    }

    #[test]
    fn duplicate_case_id() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            "case_id,image_path,age,sex\nc1,a.png,45,male\nc2,b.png,50,male\nc1,c.png,55,female\n",
        );
        let err = ManifestReader::new(&path).read().unwrap_err();
        assert!(matches!(
            err,
            IoError::DuplicateCaseId { first_row: 0, second_row: 2, .. }
        ));
    }
}
