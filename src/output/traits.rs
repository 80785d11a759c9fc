//! Result sink trait and output errors

use crate::output::SessionAggregator;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists the results of a finished session
///
/// Sinks only read the aggregator; they are called once the crawl is over.
pub trait ResultSink {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Writes the session results
    ///
    /// # Returns
    ///
    /// The paths written to
    fn export(&self, session: &SessionAggregator) -> OutputResult<Vec<PathBuf>>;
}
