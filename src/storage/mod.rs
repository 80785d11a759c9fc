//! Storage module for persisting crawl results
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Run tracking (start, final state, counters)
//! - Item and error persistence

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::state::CrawlState;

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: CrawlState,
    pub pages_scraped: u64,
    pub error_count: u64,
}

/// Represents a stored item
#[derive(Debug, Clone)]
pub struct ItemRecord {
    pub id: i64,
    pub run_id: i64,
    pub url: String,
    pub depth: u32,
    pub title: String,
    pub plain_text: String,
    /// The fact bundle as JSON
    pub facts: String,
    pub fetched_at: String,
    pub content_hash: String,
}
