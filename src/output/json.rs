//! JSON export of a session

use crate::crawler::ScrapedItem;
use crate::output::traits::{OutputResult, ResultSink};
use crate::output::{ErrorRecord, SessionAggregator, SessionStats};
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct JsonExport<'a> {
    session_stats: &'a SessionStats,
    items: &'a [ScrapedItem],
    errors: &'a [ErrorRecord],
}

/// Writes `scraped_data_<timestamp>.json` and, when the session had failures,
/// `errors_<timestamp>.json` into a directory
#[derive(Debug, Clone)]
pub struct JsonSink {
    dir: PathBuf,
}

impl JsonSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Timestamp used in export file names, taken from the session end
pub(crate) fn file_timestamp(session: &SessionAggregator) -> String {
    session
        .stats()
        .ended_at
        .unwrap_or_else(Utc::now)
        .format("%Y%m%d_%H%M%S")
        .to_string()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

impl ResultSink for JsonSink {
    fn name(&self) -> &'static str {
        "json"
    }

    fn export(&self, session: &SessionAggregator) -> OutputResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;
        let timestamp = file_timestamp(session);

        let data_path = self.dir.join(format!("scraped_data_{}.json", timestamp));
        write_json(
            &data_path,
            &JsonExport {
                session_stats: session.stats(),
                items: session.items(),
                errors: session.errors(),
            },
        )?;
        let mut written = vec![data_path];

        if !session.errors().is_empty() {
            let errors_path = self.dir.join(format!("errors_{}.json", timestamp));
            write_json(&errors_path, &session.errors())?;
            written.push(errors_path);
        }

        Ok(written)
    }
}
