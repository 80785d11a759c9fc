//! SQLite result sink
//!
//! This module provides a sink that records a finished session as one run in the
//! SQLite storage backend.

use crate::output::traits::{OutputResult, ResultSink};
use crate::output::SessionAggregator;
use crate::state::CrawlState;
use crate::storage::{SqliteStorage, Storage};
use std::path::PathBuf;

/// SQLite-based result sink
///
/// Every export creates a new run, so one database accumulates the history of
/// many sessions.
#[derive(Debug, Clone)]
pub struct SqliteSink {
    path: PathBuf,
    config_hash: String,
    final_state: CrawlState,
}

impl SqliteSink {
    /// Creates a new SQLite sink
    ///
    /// # Arguments
    ///
    /// * `path` - The database file, created if missing
    /// * `config_hash` - Hash of the configuration the session ran with
    pub fn new(path: impl Into<PathBuf>, config_hash: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            config_hash: config_hash.into(),
            final_state: CrawlState::Completed,
        }
    }

    /// Sets the state recorded for the run
    pub fn with_final_state(mut self, state: CrawlState) -> Self {
        self.final_state = state;
        self
    }
}

impl ResultSink for SqliteSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn export(&self, session: &SessionAggregator) -> OutputResult<Vec<PathBuf>> {
        let mut storage = SqliteStorage::new(&self.path)?;
        let run_id = storage.create_run(&self.config_hash)?;
        storage.insert_results(run_id, session.items(), session.errors())?;
        storage.finish_run(run_id, self.final_state, session.stats())?;

        tracing::info!(
            "Recorded run {} ({} items, {} errors) in {}",
            run_id,
            session.items().len(),
            session.errors().len(),
            self.path.display()
        );

        Ok(vec![self.path.clone()])
    }
}
