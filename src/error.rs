//! Error types for the coexpr library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum CoexprError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Non-numeric value '{value}' in gene column '{column}' at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Unknown sample type '{label}' at row {row}; no entry in the sample-type table")]
    UnknownSampleType { label: String, row: usize },

    #[error("Degenerate column '{column}': constant across all {n_rows} active rows, correlation is undefined")]
    DegenerateColumn { column: String, n_rows: usize },

    #[error("Zero variance in column '{column}': z-score normalization is undefined")]
    ZeroVariance { column: String },

    #[error("Target gene '{0}' not found among numeric columns")]
    TargetGeneNotFound(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, CoexprError>;
