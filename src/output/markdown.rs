//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a crawl session,
//! including statistics, extracted data and the error report.

use crate::output::insights::{extract_articles, extract_contacts, extract_products};
use crate::output::traits::{OutputResult, ResultSink};
use crate::output::SessionAggregator;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pages listed in the page table
const MAX_PAGE_ROWS: usize = 50;

/// Writes the markdown summary of a session
///
/// # Arguments
///
/// * `session` - The finished session
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(session: &SessionAggregator, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(session);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a session as markdown
pub fn format_markdown_summary(session: &SessionAggregator) -> String {
    let stats = session.stats();
    let mut md = String::new();

    md.push_str("# Gleaner Crawl Summary\n\n");

    md.push_str("## Session\n\n");
    if let Some(started) = stats.started_at {
        md.push_str(&format!("- **Started**: {}\n", started.to_rfc3339()));
    }
    if let Some(ended) = stats.ended_at {
        md.push_str(&format!("- **Finished**: {}\n", ended.to_rfc3339()));
    }
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n\n",
        stats.duration_seconds()
    ));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Scraped**: {}\n", stats.pages_scraped));
    md.push_str(&format!("- **Errors**: {}\n", stats.error_count));
    md.push_str(&format!(
        "- **Success Rate**: {:.1}%\n\n",
        session.success_rate() * 100.0
    ));

    let totals = session.fact_totals();
    md.push_str("## Extracted Data\n\n");
    md.push_str("| Fact | Count |\n");
    md.push_str("|------|-------|\n");
    md.push_str(&format!("| Emails | {} |\n", totals.emails));
    md.push_str(&format!("| Phone numbers | {} |\n", totals.phones));
    md.push_str(&format!("| Prices | {} |\n", totals.prices));
    md.push_str(&format!("| Dates | {} |\n\n", totals.dates));

    let products = extract_products(session.items());
    if !products.is_empty() {
        md.push_str(&format!("### Products ({})\n\n", products.len()));
        for product in &products {
            md.push_str(&format!(
                "- {}: ${} ({})\n",
                escape(&product.title),
                product.price,
                product.url
            ));
        }
        md.push('\n');
    }

    let contacts = extract_contacts(session.items());
    if !contacts.is_empty() {
        md.push_str("### Contacts\n\n");
        for email in &contacts.emails {
            md.push_str(&format!("- {}\n", email));
        }
        for phone in &contacts.phones {
            md.push_str(&format!("- {}\n", phone));
        }
        md.push('\n');
    }

    let articles = extract_articles(session.items());
    if !articles.is_empty() {
        md.push_str(&format!("### Articles ({})\n\n", articles.len()));
        for article in &articles {
            md.push_str(&format!(
                "- {} ({}, {} words)\n",
                escape(&article.title),
                article.date,
                article.word_count
            ));
        }
        md.push('\n');
    }

    if !session.items().is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| Depth | Title | URL |\n");
        md.push_str("|-------|-------|-----|\n");
        for item in session.items().iter().take(MAX_PAGE_ROWS) {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                item.depth,
                escape(item.display_title()),
                item.url
            ));
        }
        if session.items().len() > MAX_PAGE_ROWS {
            md.push_str(&format!(
                "\n... and {} more\n",
                session.items().len() - MAX_PAGE_ROWS
            ));
        }
        md.push('\n');
    }

    if !session.errors().is_empty() {
        let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
        for error in session.errors() {
            *by_kind.entry(error.kind.as_str()).or_default() += 1;
        }

        md.push_str("## Errors\n\n");
        md.push_str("| Kind | Count |\n");
        md.push_str("|------|-------|\n");
        for (kind, count) in &by_kind {
            md.push_str(&format!("| {} | {} |\n", kind, count));
        }
        md.push('\n');
        for error in session.errors() {
            md.push_str(&format!("- {}: {}\n", error.url, escape(&error.message)));
        }
        md.push('\n');
    }

    md
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Result sink writing the markdown summary
#[derive(Debug, Clone)]
pub struct MarkdownSink {
    path: PathBuf,
}

impl MarkdownSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for MarkdownSink {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn export(&self, session: &SessionAggregator) -> OutputResult<Vec<PathBuf>> {
        generate_markdown_summary(session, &self.path)?;
        Ok(vec![self.path.clone()])
    }
}
