//! Pattern table used by the content extractor
//!
//! Every pattern is compiled once on first use. Structural patterns (title, links,
//! headings, ...) are private to the extractor; the fact patterns are exposed as
//! [`FactPattern`] so callers can run a single family over arbitrary text.

use regex::Regex;
use std::sync::LazyLock;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("hardcoded regex pattern is valid")
}

pub(crate) static TITLE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)<title[^>]*>(.*?)</title\s*>"));

pub(crate) static META_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?i)<meta[^>]*name\s*=\s*["']description["'][^>]*content\s*=\s*["']([^"']*)["']"#)
});

/// `href` of `<a>` and image-map `<area>` elements
pub(crate) static LINK: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)<(?:a|area)\s[^>]*?href\s*=\s*["']([^"']*)["']"#));

pub(crate) static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)<img\s[^>]*?src\s*=\s*["']([^"']*)["']"#));

/// Opening tag of a heading of any level; the level is captured
pub(crate) static HEADING_OPEN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)<h([1-6])(?:\s[^>]*)?>"));

/// Closing tag per heading level; index 0 is `</h1>`
pub(crate) static HEADING_CLOSE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    (1..=6)
        .map(|level| compile(&format!(r"(?i)</h{}\s*>", level)))
        .collect()
});

pub(crate) static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)<p(?:\s[^>]*)?>(.*?)</p\s*>"));

pub(crate) static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)<script[^>]*>.*?</script\s*>"));

pub(crate) static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)<style[^>]*>.*?</style\s*>"));

pub(crate) static TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"<[^>]+>"));

pub(crate) static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

/// Named (`&amp;`), decimal (`&#38;`) and hex (`&#x26;`) character references
pub(crate) static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"&(?:([a-zA-Z]+)|#(\d+)|#[xX]([0-9a-fA-F]+));"));

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}"));

static PRICE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\$\s*(\d+(?:,\d{3})*(?:\.\d{2})?)"));

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)\b\d{1,2}[-/]\d{1,2}[-/]\d{2,4}\b|\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{2,4}\b",
    )
});

/// A family of facts recognised by pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactPattern {
    Email,
    Phone,
    /// Dollar-prefixed amount; the amount without the `$` is recorded
    Price,
    /// `12/31/2024`, `1-2-24` or `Jan 15, 2024`
    Date,
}

impl FactPattern {
    pub const ALL: [FactPattern; 4] = [Self::Email, Self::Phone, Self::Price, Self::Date];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Email => "emails",
            Self::Phone => "phones",
            Self::Price => "prices",
            Self::Date => "dates",
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            Self::Email => &EMAIL,
            Self::Phone => &PHONE,
            Self::Price => &PRICE,
            Self::Date => &DATE,
        }
    }

    /// Returns every match in `text`, in order, duplicates included
    ///
    /// Patterns with a capture group record the group; the others record the
    /// whole match.
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.regex()
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
