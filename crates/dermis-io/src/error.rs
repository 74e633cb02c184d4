//! I/O error types for dermis-io.

use std::path::PathBuf;

/// Errors from manifest parsing and result serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The manifest could not be opened.
    #[error("cannot open manifest {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A manifest record is not valid CSV.
    #[error("malformed manifest record in {path} near byte {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte position reported by the parser.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a required column is absent from the header.
    #[error("missing column \"{column}\" in {path}")]
    MissingColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// The required column name.
        column: &'static str,
    },

    /// The manifest has a header but lists no cases.
    #[error("manifest {path} lists no cases")]
    EmptyManifest {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// A case row is wider or narrower than the header.
    #[error("case row {row_index} in {path} has {got} fields, header has {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Data row index, header excluded.
        row_index: usize,
        /// Header width.
        expected: usize,
        /// Width of the offending row.
        got: usize,
    },

    /// Returned when the age cell is NaN, Inf, or not a number.
    #[error("non-finite age in {path}: row {row_index}, raw value \"{raw}\"")]
    NonFiniteAge {
        /// Path to the CSV file.
        path: PathBuf,
        /// Data row index, header excluded.
        row_index: usize,
        /// Cell contents as read.
        raw: String,
    },

    /// Returned when a row has a blank case ID.
    #[error("empty case ID in {path} at row {row_index}")]
    EmptyCaseId {
        /// Path to the CSV file.
        path: PathBuf,
        /// Data row index, header excluded.
        row_index: usize,
    },

    /// Returned when the same case ID appears more than once.
    #[error("duplicate case ID \"{case_id}\" in {path}: first at row {first_row}, again at row {second_row}")]
    DuplicateCaseId {
        /// Path to the CSV file.
        path: PathBuf,
        /// The duplicated case ID.
        case_id: String,
        /// Row where the ID was first seen.
        first_row: usize,
        /// Row where it was seen again.
        second_row: usize,
    },

    /// The experiment name is empty or not limited to `[a-zA-Z0-9_-]`.
    #[error("experiment name \"{name}\" may only use letters, digits, '_' and '-'")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// The results directory could not be created.
    #[error("failed to create results directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result cannot be encoded as JSON.
    #[error("cannot encode {path} as JSON")]
    SerializeJson {
        /// Destination path.
        path: PathBuf,
        /// Underlying serde_json error.
        source: serde_json::Error,
    },

    /// A results file could not be written.
    #[error("failed to write results to {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
