//! Derived views over scraped items: products, contacts and articles

use crate::crawler::ScrapedItem;
use serde::Serialize;
use std::collections::BTreeSet;

const PRODUCT_DESCRIPTION_CHARS: usize = 200;
const ARTICLE_MIN_TEXT_CHARS: usize = 500;
const ARTICLE_PREVIEW_CHARS: usize = 300;
const ARTICLE_PREVIEW_PARAGRAPHS: usize = 2;

/// A page offering something for a price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub url: String,
    pub title: String,
    /// First price found on the page
    pub price: String,
    pub description: String,
}

/// Every distinct email address and phone number, sorted
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contacts {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl Contacts {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

/// A dated page with substantial text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    /// First date found on the page
    pub date: String,
    pub content_preview: String,
    pub word_count: usize,
}

/// Items with at least one price
pub fn extract_products(items: &[ScrapedItem]) -> Vec<Product> {
    items
        .iter()
        .filter_map(|item| {
            let price = item.facts.prices.first()?;
            Some(Product {
                url: item.url.clone(),
                title: item.title.clone(),
                price: price.clone(),
                description: truncate_chars(&item.plain_text, PRODUCT_DESCRIPTION_CHARS),
            })
        })
        .collect()
}

/// Distinct emails and phones across all items
pub fn extract_contacts(items: &[ScrapedItem]) -> Contacts {
    let mut emails = BTreeSet::new();
    let mut phones = BTreeSet::new();

    for item in items {
        emails.extend(item.facts.emails.iter().cloned());
        phones.extend(item.facts.phones.iter().cloned());
    }

    Contacts {
        emails: emails.into_iter().collect(),
        phones: phones.into_iter().collect(),
    }
}

/// Items that look like articles: a date, paragraphs and more than 500
/// characters of text
pub fn extract_articles(items: &[ScrapedItem]) -> Vec<Article> {
    items
        .iter()
        .filter_map(|item| {
            let date = item.facts.dates.first()?;
            if item.facts.paragraphs.is_empty()
                || item.plain_text.chars().count() <= ARTICLE_MIN_TEXT_CHARS
            {
                return None;
            }

            let lead = item
                .facts
                .paragraphs
                .iter()
                .take(ARTICLE_PREVIEW_PARAGRAPHS)
                .cloned()
                .collect::<Vec<_>>()
                .join(" ");

            Some(Article {
                url: item.url.clone(),
                title: item.title.clone(),
                date: date.clone(),
                content_preview: truncate_chars(&lead, ARTICLE_PREVIEW_CHARS),
                word_count: item.plain_text.split_whitespace().count(),
            })
        })
        .collect()
}

/// Returns at most `max` characters of `text`
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
