//! Session aggregator
//!
//! Collects the items and errors of one crawl session, stamps its start and end,
//! and renders the plain-text report.

use crate::crawler::{FactPattern, ScrapedItem};
use crate::{ErrorKind, FetchError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Number of pages listed in the report
const SAMPLE_PAGES: usize = 5;

/// Width of the report banner
const BANNER_WIDTH: usize = 60;

/// A failed fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub url: String,
    pub kind: ErrorKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorRecord {
    pub fn from_fetch_error(url: &str, error: &FetchError) -> Self {
        Self {
            url: url.to_string(),
            kind: error.kind(),
            message: error.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Counters and timing of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub pages_scraped: usize,
    pub error_count: usize,
}

impl SessionStats {
    /// Elapsed seconds between start and end, 0 until both are set
    pub fn duration_seconds(&self) -> f64 {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / 1000.0,
            _ => 0.0,
        }
    }

    /// Share of attempted pages that succeeded, in `[0, 1]`
    ///
    /// A session with no attempts reports 1.0.
    pub fn success_rate(&self) -> f64 {
        let attempted = (self.pages_scraped + self.error_count).max(1);
        1.0 - self.error_count as f64 / attempted as f64
    }
}

/// Totals of the fact families over every item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FactTotals {
    pub emails: usize,
    pub phones: usize,
    pub prices: usize,
    pub dates: usize,
}

/// Items, errors and counters of one crawl session
#[derive(Debug, Clone, Default)]
pub struct SessionAggregator {
    stats: SessionStats,
    items: Vec<ScrapedItem>,
    errors: Vec<ErrorRecord>,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps the session start; later calls keep the first stamp
    pub fn start(&mut self) {
        if self.stats.started_at.is_none() {
            self.stats.started_at = Some(Utc::now());
        }
    }

    /// Stamps the session end
    pub fn finish(&mut self) {
        self.stats.ended_at = Some(Utc::now());
    }

    pub fn record_item(&mut self, item: ScrapedItem) {
        self.stats.pages_scraped += 1;
        self.items.push(item);
    }

    pub fn record_error(&mut self, record: ErrorRecord) {
        self.stats.error_count += 1;
        self.errors.push(record);
    }

    pub fn record_fetch_error(&mut self, url: &str, error: &FetchError) {
        self.record_error(ErrorRecord::from_fetch_error(url, error));
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn items(&self) -> &[ScrapedItem] {
        &self.items
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn success_rate(&self) -> f64 {
        self.stats.success_rate()
    }

    pub fn fact_totals(&self) -> FactTotals {
        let count = |pattern: FactPattern| -> usize {
            self.items.iter().map(|i| i.facts.facts(pattern).len()).sum()
        };
        FactTotals {
            emails: count(FactPattern::Email),
            phones: count(FactPattern::Phone),
            prices: count(FactPattern::Price),
            dates: count(FactPattern::Date),
        }
    }

    /// Renders the session report
    ///
    /// The fact totals and sample pages are only listed when at least one item was
    /// scraped.
    pub fn generate_report(&self) -> String {
        let banner = "=".repeat(BANNER_WIDTH);
        let mut lines = vec![
            banner.clone(),
            "WEB SCRAPING REPORT".to_string(),
            banner,
            format!("Start Time: {}", format_time(self.stats.started_at)),
            format!("End Time: {}", format_time(self.stats.ended_at)),
            format!("Duration: {:.2} seconds", self.stats.duration_seconds()),
            String::new(),
            format!("Pages Scraped: {}", self.stats.pages_scraped),
            format!("Errors: {}", self.stats.error_count),
            format!("Success Rate: {:.1}%", self.success_rate() * 100.0),
            String::new(),
            "Top Extracted Data:".to_string(),
        ];

        if !self.items.is_empty() {
            let totals = self.fact_totals();
            lines.push(format!("  Total Emails Found: {}", totals.emails));
            lines.push(format!("  Total Phone Numbers: {}", totals.phones));
            lines.push(format!("  Total Prices: {}", totals.prices));
            lines.push(String::new());
            lines.push("Sample Scraped Pages:".to_string());
            for item in self.items.iter().take(SAMPLE_PAGES) {
                lines.push(format!("  - {} ({})", item.display_title(), item.url));
            }
        }

        lines.join("\n")
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "None".to_string())
}
