//! Output module for session results and reports
//!
//! This module handles:
//! - Aggregating items, errors and counters of a crawl session
//! - Rendering the plain-text report and the markdown summary
//! - Exporting results through `ResultSink` implementations (JSON, CSV, SQLite)
//! - Deriving products, contacts and articles from scraped items

mod csv_output;
pub mod insights;
mod json;
mod markdown;
mod session;
mod sqlite_output;
mod traits;

pub use csv_output::CsvSink;
pub use insights::{extract_articles, extract_contacts, extract_products, Article, Contacts, Product};
pub use json::JsonSink;
pub use markdown::{format_markdown_summary, generate_markdown_summary, MarkdownSink};
pub use session::{ErrorRecord, FactTotals, SessionAggregator, SessionStats};
pub use sqlite_output::SqliteSink;
pub use traits::{OutputError, OutputResult, ResultSink};

use crate::config::OutputConfig;
use crate::state::CrawlState;
use std::path::PathBuf;

/// Builds the sinks enabled in the output configuration
///
/// # Arguments
///
/// * `config` - The output section of the configuration
/// * `config_hash` - Hash recorded with SQLite runs
/// * `final_state` - State the session ended in
pub fn configured_sinks(
    config: &OutputConfig,
    config_hash: &str,
    final_state: CrawlState,
) -> Vec<Box<dyn ResultSink>> {
    let mut sinks: Vec<Box<dyn ResultSink>> = Vec::new();

    if let Some(dir) = &config.json_dir {
        sinks.push(Box::new(JsonSink::new(dir)));
    }
    if let Some(path) = &config.csv_path {
        sinks.push(Box::new(CsvSink::new(path)));
    }
    if let Some(path) = &config.database_path {
        sinks.push(Box::new(
            SqliteSink::new(path, config_hash).with_final_state(final_state),
        ));
    }
    if let Some(path) = &config.summary_path {
        sinks.push(Box::new(MarkdownSink::new(path)));
    }

    sinks
}

/// Runs every sink, logging failures instead of stopping at the first one
///
/// # Returns
///
/// The paths written by the sinks that succeeded, and the number that failed
pub fn export_all(
    sinks: &[Box<dyn ResultSink>],
    session: &SessionAggregator,
) -> (Vec<PathBuf>, usize) {
    let mut written = Vec::new();
    let mut failures = 0;

    for sink in sinks {
        match sink.export(session) {
            Ok(paths) => {
                for path in &paths {
                    tracing::info!("{} output written to {}", sink.name(), path.display());
                }
                written.extend(paths);
            }
            Err(e) => {
                tracing::error!("{} export failed: {}", sink.name(), e);
                failures += 1;
            }
        }
    }

    (written, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_sinks_by_default() {
        let sinks = configured_sinks(&OutputConfig::default(), "hash", CrawlState::Completed);
        assert!(sinks.is_empty());
    }

    #[test]
    fn test_configured_sinks_in_order() {
        let config = OutputConfig {
            json_dir: Some("out".to_string()),
            csv_path: Some("out/items.csv".to_string()),
            database_path: Some("out/results.db".to_string()),
            summary_path: Some("out/summary.md".to_string()),
        };
        let names: Vec<&str> = configured_sinks(&config, "hash", CrawlState::Completed)
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(names, vec!["json", "csv", "sqlite", "markdown"]);
    }

    #[test]
    fn test_export_all_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "file").unwrap();

        let sinks: Vec<Box<dyn ResultSink>> = vec![
            Box::new(JsonSink::new(blocker.join("json"))),
            Box::new(CsvSink::new(dir.path().join("items.csv"))),
        ];

        let (written, failures) = export_all(&sinks, &SessionAggregator::new());
        assert_eq!(failures, 1);
        assert_eq!(written, vec![dir.path().join("items.csv")]);
    }
}
