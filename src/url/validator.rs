use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Extensions of binary and media resources that are never scraped
pub const SKIPPED_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".png", ".gif", ".zip", ".exe", ".mp4", ".mp3",
];

/// Scheme, host (domain name, `localhost` or dotted IPv4), optional port, then an
/// optional path/query without whitespace.
static VALID_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^https?://(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,6}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$",
    )
    .expect("hardcoded regex pattern is valid")
});

/// Checks whether a URL is syntactically acceptable for crawling
///
/// # Examples
///
/// ```
/// use gleaner::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/page?x=1"));
/// assert!(is_valid_url("http://localhost:8080/"));
/// assert!(!is_valid_url("ftp://example.com/"));
/// assert!(!is_valid_url("not a url"));
/// ```
pub fn is_valid_url(url: &str) -> bool {
    VALID_URL.is_match(url)
}

/// Checks whether a URL passes validation and the admission policy
///
/// Compiles the blocked patterns on every call; a crawl session uses
/// [`UrlPolicy`] to compile them once.
///
/// # Arguments
///
/// * `url` - The candidate URL
/// * `allowed_domains` - If non-empty, the URL must contain one of these
/// * `blocked_patterns` - Regular expressions (or literal substrings when they do
///   not compile) that exclude the URL
///
/// # Examples
///
/// ```
/// use gleaner::url::should_scrape;
///
/// let allowed = vec!["example.com".to_string()];
/// assert!(should_scrape("https://example.com/a", &allowed, &[]));
/// assert!(!should_scrape("https://other.org/a", &allowed, &[]));
/// assert!(!should_scrape("https://example.com/a.pdf", &allowed, &[]));
/// ```
pub fn should_scrape(url: &str, allowed_domains: &[String], blocked_patterns: &[String]) -> bool {
    UrlPolicy::new(allowed_domains, blocked_patterns).should_scrape(url)
}

/// A blocked pattern, compiled once
#[derive(Debug, Clone)]
enum BlockedPattern {
    Regex(Regex),
    Literal(String),
}

impl BlockedPattern {
    fn compile(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(regex) => Self::Regex(regex),
            Err(e) => {
                tracing::debug!(
                    "Blocked pattern '{}' is not a valid regex ({}), matching as substring",
                    pattern,
                    e
                );
                Self::Literal(pattern.to_string())
            }
        }
    }

    fn matches(&self, url: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(url),
            Self::Literal(literal) => url.contains(literal.as_str()),
        }
    }
}

/// URL admission policy of a crawl session
#[derive(Debug, Clone, Default)]
pub struct UrlPolicy {
    allowed_domains: Vec<String>,
    blocked: Vec<BlockedPattern>,
}

impl UrlPolicy {
    /// Creates a policy, compiling the blocked patterns
    pub fn new(allowed_domains: &[String], blocked_patterns: &[String]) -> Self {
        Self {
            allowed_domains: allowed_domains.to_vec(),
            blocked: blocked_patterns
                .iter()
                .map(|p| BlockedPattern::compile(p))
                .collect(),
        }
    }

    /// Returns true if the URL should be fetched
    ///
    /// Requires, in order: a valid URL, a match against the allowed domains
    /// (when any are configured), no blocked pattern match, and a path that does
    /// not end in a skipped extension.
    pub fn should_scrape(&self, url: &str) -> bool {
        if !is_valid_url(url) {
            return false;
        }

        if !self.allowed_domains.is_empty()
            && !self
                .allowed_domains
                .iter()
                .any(|domain| url.contains(domain.as_str()))
        {
            return false;
        }

        if self.blocked.iter().any(|pattern| pattern.matches(url)) {
            return false;
        }

        !has_skipped_extension(url)
    }
}

/// Checks the URL path against the skipped extension list (case-insensitive)
fn has_skipped_extension(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => url.to_lowercase(),
    };

    SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
