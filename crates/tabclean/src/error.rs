//! Error types for the tabclean library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tabclean operations.
#[derive(Debug, Error)]
pub enum TabcleanError {
    /// The input file does not exist or cannot be opened.
    #[error("The file '{path}' was not found: {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The designated column is absent from the loaded table.
    #[error("Column '{column}' not found (available: {})", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data row does not fit the header.
    #[error("Parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no header to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TabcleanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TabcleanError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for tabclean operations.
pub type Result<T> = std::result::Result<T, TabcleanError>;
