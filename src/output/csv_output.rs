//! CSV export of scraped items

use crate::output::insights::truncate_chars;
use crate::output::traits::{OutputResult, ResultSink};
use crate::output::SessionAggregator;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Longest `content` cell written
const CONTENT_CHARS: usize = 500;

#[derive(Serialize)]
struct CsvRow<'a> {
    url: &'a str,
    title: &'a str,
    content: String,
    scraped_at: String,
    hash_id: &'a str,
}

/// Writes one row per item: `url,title,content,scraped_at,hash_id`
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn export(&self, session: &SessionAggregator) -> OutputResult<Vec<PathBuf>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        if session.items().is_empty() {
            writer.write_record(["url", "title", "content", "scraped_at", "hash_id"])?;
        }
        for item in session.items() {
            writer.serialize(CsvRow {
                url: &item.url,
                title: &item.title,
                content: truncate_chars(&item.plain_text, CONTENT_CHARS),
                scraped_at: item.fetched_at.to_rfc3339(),
                hash_id: &item.content_hash,
            })?;
        }
        writer.flush()?;

        Ok(vec![self.path.clone()])
    }
}
