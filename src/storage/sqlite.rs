//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::crawler::ScrapedItem;
use crate::output::{ErrorRecord, SessionStats};
use crate::state::CrawlState;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{ItemRecord, RunRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, config_hash, status, pages_scraped, error_count";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: CrawlState::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(CrawlState::Running),
        pages_scraped: row.get::<_, i64>(5)? as u64,
        error_count: row.get::<_, i64>(6)? as u64,
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, CrawlState::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        state: CrawlState,
        stats: &SessionStats,
    ) -> StorageResult<()> {
        let started_at = stats.started_at.unwrap_or_else(Utc::now).to_rfc3339();
        let finished_at = stats.ended_at.unwrap_or_else(Utc::now).to_rfc3339();

        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, started_at = ?2, finished_at = ?3,
             pages_scraped = ?4, error_count = ?5 WHERE id = ?6",
            params![
                state.to_db_string(),
                started_at,
                finished_at,
                stats.pages_scraped as i64,
                stats.error_count as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Results =====

    fn insert_results(
        &mut self,
        run_id: i64,
        items: &[ScrapedItem],
        errors: &[ErrorRecord],
    ) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO items
                 (run_id, url, depth, title, plain_text, facts, fetched_at, content_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for item in items {
                let facts = serde_json::to_string(&item.facts)?;
                stmt.execute(params![
                    run_id,
                    item.url,
                    item.depth,
                    item.title,
                    item.plain_text,
                    facts,
                    item.fetched_at.to_rfc3339(),
                    item.content_hash
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT INTO errors (run_id, url, kind, message, occurred_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for error in errors {
                stmt.execute(params![
                    run_id,
                    error.url,
                    error.kind.as_str(),
                    error.message,
                    error.timestamp.to_rfc3339()
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!(
            "Stored {} items and {} errors for run {}",
            items.len(),
            errors.len(),
            run_id
        );
        Ok(())
    }

    fn get_items(&self, run_id: i64) -> StorageResult<Vec<ItemRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, url, depth, title, plain_text, facts, fetched_at, content_hash
             FROM items WHERE run_id = ?1 ORDER BY id",
        )?;

        let items = stmt
            .query_map(params![run_id], |row| {
                Ok(ItemRecord {
                    id: row.get(0)?,
                    run_id: row.get(1)?,
                    url: row.get(2)?,
                    depth: row.get(3)?,
                    title: row.get(4)?,
                    plain_text: row.get(5)?,
                    facts: row.get(6)?,
                    fetched_at: row.get(7)?,
                    content_hash: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    // ===== Statistics =====

    fn count_items(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM items WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_errors(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM errors WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn get_error_summary(&self, run_id: i64) -> StorageResult<HashMap<String, u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT kind, COUNT(*) FROM errors WHERE run_id = ?1 GROUP BY kind")?;

        let summary = stmt
            .query_map(params![run_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(summary)
    }

    fn find_unchanged_urls(&self, run_id: i64) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT current.url FROM items AS current
             JOIN items AS previous
               ON previous.content_hash = current.content_hash AND previous.run_id <> current.run_id
             WHERE current.run_id = ?1
             ORDER BY current.url",
        )?;

        let urls = stmt
            .query_map(params![run_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(urls)
    }
}
