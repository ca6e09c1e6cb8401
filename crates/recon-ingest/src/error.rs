//! Error types for CSV ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or transforming CSV data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the size limit.
    #[error("file {path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Content is not UTF-8.
    #[error("{name} is encoded as {encoding}; only UTF-8 is supported")]
    UnsupportedEncoding {
        name: String,
        encoding: &'static str,
    },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {name}: {message}")]
    CsvParse { name: String, message: String },

    /// A header cell is blank.
    #[error("CSV {name} has a blank column name")]
    EmptyColumnName { name: String },

    // === DataFrame Errors ===
    /// Column not found in DataFrame.
    #[error("column '{column}' not found in DataFrame")]
    ColumnNotFound { column: String },

    /// Datasets with different headers cannot be combined.
    #[error("headers of {name} ({found:?}) differ from {expected:?}")]
    HeaderMismatch {
        name: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A transform was configured with unusable arguments.
    #[error("invalid transform: {message}")]
    InvalidTransform { message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
