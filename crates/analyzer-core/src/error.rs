use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the movie analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// A data source does not exist on disk.
    #[error("File not found: {0}")]
    SourceNotFound(PathBuf),

    /// A data source has no header or no data rows.
    #[error("Empty CSV file: {0}")]
    SourceEmpty(PathBuf),

    /// A data source exists but could not be decoded.
    #[error("Error loading data from {path}: {source}")]
    SourceMalformed {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    /// The JSON snapshot could not be written.
    #[error("Error saving data to JSON at {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    /// A query needed a column the table does not have.
    #[error("Table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    /// A table operation failed while computing a statistic.
    #[error("Data processing error: {0}")]
    Polars(#[from] PolarsError),

    /// A JSON document could not be produced or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnalyzerError {
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Convenience alias used throughout the analyzer crates.
pub type Result<T> = std::result::Result<T, AnalyzerError>;
