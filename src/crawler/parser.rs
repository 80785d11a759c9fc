//! Content extractor
//!
//! This module turns raw markup into a [`FactBundle`] and plain text using the
//! pattern table in `patterns`. It works on malformed input as well: a field
//! with no match is empty, extraction itself never fails.

use crate::crawler::patterns::{
    FactPattern, ENTITY, HEADING_CLOSE, HEADING_OPEN, IMAGE, LINK, META_DESCRIPTION, PARAGRAPH,
    SCRIPT_BLOCK, STYLE_BLOCK, TAG, TITLE, WHITESPACE,
};
use crate::url::normalize_link;
use serde::Serialize;
use std::collections::HashSet;

/// Paragraphs whose cleaned text is this short or shorter are dropped
const MIN_PARAGRAPH_CHARS: usize = 20;

/// A heading and its level (1 for `<h1>` through 6 for `<h6>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

/// Structured facts extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FactBundle {
    pub title: String,
    pub meta_description: String,
    /// Headings in document order
    pub headings: Vec<Heading>,
    pub paragraphs: Vec<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub prices: Vec<String>,
    pub dates: Vec<String>,
    /// `<img src>` values, verbatim
    pub images: Vec<String>,
    /// Absolute, deduplicated link targets in first-seen order
    pub links: Vec<String>,
}

impl FactBundle {
    /// Returns the values recorded for a fact pattern family
    pub fn facts(&self, pattern: FactPattern) -> &[String] {
        match pattern {
            FactPattern::Email => &self.emails,
            FactPattern::Phone => &self.phones,
            FactPattern::Price => &self.prices,
            FactPattern::Date => &self.dates,
        }
    }
}

/// Extracted information from a page: the fact bundle plus its plain text
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub facts: FactBundle,
    pub plain_text: String,
}

/// Parses raw markup into facts and plain text
///
/// # Example
///
/// ```
/// use gleaner::crawler::parse_page;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_page(html, "https://example.com");
/// assert_eq!(parsed.facts.title, "Test");
/// assert_eq!(parsed.facts.links, vec!["https://example.com/page".to_string()]);
/// assert_eq!(parsed.plain_text, "Test Link");
/// ```
pub fn parse_page(raw: &str, base_url: &str) -> ParsedPage {
    ParsedPage {
        facts: extract(raw, base_url),
        plain_text: plain_text(raw),
    }
}

/// Extracts the fact bundle from raw markup
///
/// Fact patterns (emails, phones, prices, dates) run over the raw markup, not
/// over cleaned text, and keep duplicates.
pub fn extract(raw: &str, base_url: &str) -> FactBundle {
    FactBundle {
        title: extract_title(raw),
        meta_description: extract_meta_description(raw),
        headings: extract_headings(raw),
        paragraphs: extract_paragraphs(raw),
        emails: FactPattern::Email.find_all(raw),
        phones: FactPattern::Phone.find_all(raw),
        prices: FactPattern::Price.find_all(raw),
        dates: FactPattern::Date.find_all(raw),
        images: extract_images(raw),
        links: extract_links(raw, base_url),
    }
}

/// Extracts readable text: script and style blocks removed with their content,
/// remaining tags replaced by a space, whitespace collapsed
pub fn plain_text(raw: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(raw, "");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, "");
    let text = TAG.replace_all(&without_styles, " ");
    collapse_whitespace(&text)
}

/// Cleans a markup fragment: tags and character references become spaces,
/// whitespace is collapsed
pub fn clean_text(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, " ");
    let text = ENTITY.replace_all(&text, " ");
    collapse_whitespace(&text)
}

/// Decodes character references
///
/// Numeric references and every HTML5 named reference are decoded; unknown names
/// are left untouched.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

fn extract_title(raw: &str) -> String {
    TITLE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| collapse_whitespace(&decode_entities(m.as_str())))
        .unwrap_or_default()
}

fn extract_meta_description(raw: &str) -> String {
    META_DESCRIPTION
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Collects headings in document order
///
/// A heading runs from its opening tag to the next closing tag of the same level;
/// headings nested inside it are part of its text, not separate entries.
/// Unclosed headings are skipped.
fn extract_headings(raw: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut pos = 0;

    while let Some(caps) = HEADING_OPEN.captures_at(raw, pos) {
        let (Some(open), Some(level)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        // The pattern only admits a single digit 1-6
        let level = level.as_str().as_bytes()[0] - b'0';

        let Some(close) = HEADING_CLOSE[usize::from(level - 1)].find_at(raw, open.end()) else {
            pos = open.end();
            continue;
        };

        let text = clean_text(&raw[open.end()..close.start()]);
        if !text.is_empty() {
            headings.push(Heading { level, text });
        }
        pos = close.end();
    }

    headings
}

fn extract_paragraphs(raw: &str) -> Vec<String> {
    PARAGRAPH
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect()
}

fn extract_images(raw: &str) -> Vec<String> {
    IMAGE
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Extracts anchor targets, resolved against `base_url` and deduplicated
pub fn extract_links(raw: &str, base_url: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    LINK.captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| normalize_link(m.as_str(), base_url))
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com";

    const PRODUCT_PAGE: &str = r#"
        <html>
        <head>
            <title>Sample Product Page - Electronics Store</title>
            <meta name="description" content="High-quality electronics at great prices">
        </head>
        <body>
            <h1>Premium Wireless Headphones</h1>
            <p>Experience crystal-clear audio with our premium wireless headphones.</p>
            <p>Price: $299.99</p>
            <p>Contact: sales@electronics-store.com</p>
            <p>Phone: (555) 123-4567</p>
            <h2>Product Features</h2>
            <a href="/products/speakers">View Speakers</a>
            <a href="/products/earbuds">View Earbuds</a>
            <a href="/products/speakers">Speakers again</a>
            <img src="/images/headphones.jpg" alt="Headphones">
        </body>
        </html>
    "#;

    #[test]
    fn test_extract_product_page() {
        let facts = extract(PRODUCT_PAGE, BASE);

        assert_eq!(facts.title, "Sample Product Page - Electronics Store");
        assert_eq!(
            facts.meta_description,
            "High-quality electronics at great prices"
        );
        assert_eq!(
            facts.headings,
            vec![
                Heading {
                    level: 1,
                    text: "Premium Wireless Headphones".to_string()
                },
                Heading {
                    level: 2,
                    text: "Product Features".to_string()
                },
            ]
        );
        assert_eq!(facts.emails, vec!["sales@electronics-store.com"]);
        assert_eq!(facts.phones, vec!["(555) 123-4567"]);
        assert_eq!(facts.prices, vec!["299.99"]);
        assert_eq!(facts.images, vec!["/images/headphones.jpg"]);
        assert_eq!(
            facts.links,
            vec![
                "https://example.com/products/speakers",
                "https://example.com/products/earbuds"
            ]
        );
    }

    #[test]
    fn test_script_content_never_reaches_plain_text() {
        let html = "<script>alert(1)</script><p>Hello world this is content</p>";
        let parsed = parse_page(html, BASE);
        assert!(parsed.plain_text.contains("Hello world this is content"));
        assert!(!parsed.plain_text.contains("alert"));
    }

    #[test]
    fn test_style_removed_from_plain_text() {
        let html = "<style type=\"text/css\">body { color: red; }</style><div>Visible</div>";
        assert_eq!(plain_text(html), "Visible");
    }

    #[test]
    fn test_plain_text_collapses_whitespace() {
        let html = "<div>\n  one\n\n<span>two</span>\t three </div>";
        assert_eq!(plain_text(html), "one two three");
    }

    #[test]
    fn test_short_paragraphs_dropped() {
        let html = "<p>Too short</p><p>This paragraph is clearly long enough</p><p>exactly twenty chars</p>";
        let facts = extract(html, BASE);
        assert_eq!(facts.paragraphs, vec!["This paragraph is clearly long enough"]);
    }

    #[test]
    fn test_headings_in_document_order() {
        let html = "<h2>Second level first</h2><h1>Then the top</h1><h3>  </h3><h6>Deep</h6>";
        let facts = extract(html, BASE);
        let levels: Vec<u8> = facts.headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![2, 1, 6]);
        assert_eq!(facts.headings[0].text, "Second level first");
    }

    #[test]
    fn test_heading_entities_removed() {
        let html = "<h1>Fish &amp; Chips &#38; <em>More</em></h1>";
        let facts = extract(html, BASE);
        assert_eq!(facts.headings[0].text, "Fish Chips More");
    }

    #[test]
    fn test_title_entities_decoded() {
        let html = "<title>\n  Fish &amp; Chips &#8211; &lt;Menu&gt;  </title>";
        assert_eq!(extract(html, BASE).title, "Fish & Chips \u{2013} <Menu>");
    }

    #[test]
    fn test_title_named_entities_decoded() {
        let html = "<title>Caf&eacute; &rsquo;Menu&rsquo; &ndash; &hearts;</title>";
        assert_eq!(extract(html, BASE).title, "Caf\u{e9} \u{2019}Menu\u{2019} \u{2013} \u{2665}");
    }

    #[test]
    fn test_nested_heading_recorded_once() {
        let html = "<h1>Top <h2>Inner</h2></h1><h2>Next</h2>";
        let facts = extract(html, BASE);
        assert_eq!(
            facts.headings,
            vec![
                Heading {
                    level: 1,
                    text: "Top Inner".to_string()
                },
                Heading {
                    level: 2,
                    text: "Next".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_unclosed_heading_skipped() {
        let html = "<h1>Never closed<h2>Closed</h2>";
        let levels: Vec<u8> = extract(html, BASE).headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![2]);
    }

    #[test]
    fn test_area_links_extracted() {
        let html = r#"<map><area shape="rect" href="/region"></map><a href="/plain">x</a>"#;
        assert_eq!(
            extract(html, BASE).links,
            vec!["https://example.com/region", "https://example.com/plain"]
        );
    }

    #[test]
    fn test_meta_description_case_insensitive_and_verbatim() {
        let html = r#"<META NAME="Description" CONTENT="Tom &amp; Jerry">"#;
        assert_eq!(extract(html, BASE).meta_description, "Tom &amp; Jerry");
    }

    #[test]
    fn test_facts_read_from_raw_markup_with_duplicates() {
        let html = r#"<a href="mailto:info@shop.com">info@shop.com</a><!-- $10.00 -->"#;
        let facts = extract(html, BASE);
        assert_eq!(facts.emails, vec!["info@shop.com", "info@shop.com"]);
        assert_eq!(facts.prices, vec!["10.00"]);
        assert!(facts.links.is_empty());
    }

    #[test]
    fn test_link_normalization_rules() {
        let html = r##"
            <a href="/products">Products</a>
            <a href="//cdn.example.net/app">CDN</a>
            <a href="about">About</a>
            <a href="https://other.org/x#frag">Other</a>
            <a href="#top">Top</a>
            <a href="javascript:void(0)">JS</a>
        "##;
        let facts = extract(html, BASE);
        assert_eq!(
            facts.links,
            vec![
                "https://example.com/products",
                "https://cdn.example.net/app",
                "https://example.com/about",
                "https://other.org/x",
            ]
        );
    }

    #[test]
    fn test_malformed_markup_degrades_gracefully() {
        let html = "<html><title>Unclosed<body><h1>Broken<p>no end <a href='/x";
        let facts = extract(html, BASE);
        assert_eq!(facts.title, "");
        assert!(facts.headings.is_empty());
        assert!(facts.paragraphs.is_empty());
        assert!(facts.links.is_empty());
        assert!(!plain_text(html).is_empty());
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse_page("", BASE);
        assert_eq!(parsed.facts, FactBundle::default());
        assert_eq!(parsed.plain_text, "");
    }

    #[test]
    fn test_decode_unknown_entity_left_alone() {
        assert_eq!(decode_entities("a &bogus; b &#65;"), "a &bogus; b A");
    }

    #[test]
    fn test_facts_accessor() {
        let facts = extract(PRODUCT_PAGE, BASE);
        assert_eq!(facts.facts(FactPattern::Price), &["299.99".to_string()]);
        assert!(facts.facts(FactPattern::Date).is_empty());
    }
}
