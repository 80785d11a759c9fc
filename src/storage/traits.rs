//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::crawler::ScrapedItem;
use crate::output::{ErrorRecord, SessionStats};
use crate::state::CrawlState;
use crate::storage::{ItemRecord, RunRecord};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// A backend keeps the results of any number of crawl sessions, one run each.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new run in the `running` state
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Records the final state and counters of a run
    fn finish_run(
        &mut self,
        run_id: i64,
        state: CrawlState,
        stats: &SessionStats,
    ) -> StorageResult<()>;

    // ===== Results =====

    /// Stores every item and error of a session in one transaction
    fn insert_results(
        &mut self,
        run_id: i64,
        items: &[ScrapedItem],
        errors: &[ErrorRecord],
    ) -> StorageResult<()>;

    /// Gets the items of a run in insertion order
    fn get_items(&self, run_id: i64) -> StorageResult<Vec<ItemRecord>>;

    // ===== Statistics =====

    /// Counts the items of a run
    fn count_items(&self, run_id: i64) -> StorageResult<u64>;

    /// Counts the errors of a run
    fn count_errors(&self, run_id: i64) -> StorageResult<u64>;

    /// Gets error counts of a run by kind
    fn get_error_summary(&self, run_id: i64) -> StorageResult<HashMap<String, u64>>;

    /// Finds URLs of other runs whose content hash equals one in `run_id`
    fn find_unchanged_urls(&self, run_id: i64) -> StorageResult<Vec<String>>;
}
