use thiserror::Error;

// ---------------------------------------------------------------------------
// Table ingestion
// ---------------------------------------------------------------------------

/// Failures while turning an uploaded file into a patient or analytics table.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    NotNumeric {
        row: usize,
        column: String,
        value: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("malformed table: {0}")]
    Malformed(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Range gate and scoring
// ---------------------------------------------------------------------------

/// Input rejected by the range validator. Nothing reaches the classifier.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GateError {
    /// Single record: labels of the fields outside their range.
    #[error("Invalid input values! Check the ranges: {}", .0.join(", "))]
    InvalidFields(Vec<&'static str>),

    /// Batch: 0-based indices of the offending rows.
    #[error("Invalid rows: {0:?}")]
    InvalidRows(Vec<usize>),
}

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("classifier returned {labels} labels and {probabilities} probability rows for {rows} records")]
    OutputShape {
        rows: usize,
        labels: usize,
        probabilities: usize,
    },
}

// ---------------------------------------------------------------------------
// Model artifact
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("reading model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing model artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model was trained on features {found:?}, expected {expected:?}")]
    FeatureOrder {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("'{name}' has {len} entries, expected {expected}")]
    Shape {
        name: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("scaler entry {0} is zero")]
    ZeroScale(usize),

    #[error("non-finite value in '{0}'")]
    NonFinite(&'static str),
}
