use crate::crawler::parser::{FactBundle, ParsedPage};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// One successfully fetched and extracted page
#[derive(Debug, Clone, Serialize)]
pub struct ScrapedItem {
    pub url: String,
    pub depth: u32,
    pub title: String,
    pub plain_text: String,
    pub facts: FactBundle,
    pub fetched_at: DateTime<Utc>,
    /// Hex SHA-256 of url, title and plain text
    pub content_hash: String,
}

impl ScrapedItem {
    /// Builds an item from a parsed page, stamping the fetch time and hash
    pub fn new(url: &str, depth: u32, page: ParsedPage) -> Self {
        let title = page.facts.title.clone();
        let content_hash = compute_content_hash(url, &title, &page.plain_text);

        Self {
            url: url.to_string(),
            depth,
            title,
            plain_text: page.plain_text,
            facts: page.facts,
            fetched_at: Utc::now(),
            content_hash,
        }
    }

    /// Title, or `Untitled` when the page had none
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }
}

/// Computes the content hash of a page
///
/// # Example
///
/// ```
/// use gleaner::crawler::compute_content_hash;
///
/// let a = compute_content_hash("https://example.com", "Home", "Welcome");
/// let b = compute_content_hash("https://example.com", "Home", "Welcome");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn compute_content_hash(url: &str, title: &str, plain_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(title.as_bytes());
    hasher.update(plain_text.as_bytes());
    hex::encode(hasher.finalize())
}
