use serde::Deserialize;

/// Main configuration structure for Gleaner
///
/// Every section has defaults, so an empty file is a valid (if seedless) config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Seed URLs, enqueued at depth 0
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// Traversal budgets
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Base URL used to absolutize relative links
    #[serde(rename = "base-url", default)]
    pub base_url: String,

    /// Maximum depth to crawl from seed URLs
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of successfully scraped pages
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum number of links enqueued from a single page
    #[serde(rename = "max-links-per-page", default = "default_max_links_per_page")]
    pub max_links_per_page: usize,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            max_links_per_page: default_max_links_per_page(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

/// Whether the request interval is tracked per host or across all hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateLimitScope {
    #[default]
    PerHost,
    Global,
}

/// Rate limiting, retry and timeout settings
#[derive(Debug, Clone, Deserialize)]
pub struct FetchSettings {
    #[serde(rename = "requests-per-second", default = "default_requests_per_second")]
    pub requests_per_second: f64,

    #[serde(rename = "rate-limit-scope", default)]
    pub rate_limit_scope: RateLimitScope,

    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(rename = "backoff-factor", default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Per-request timeout of the HTTP fetcher (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            rate_limit_scope: RateLimitScope::default(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            backoff_factor: default_backoff_factor(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Gleaner".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/gleaner".to_string(),
            contact_email: "gleaner@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// URL admission policy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// If non-empty, a URL must contain one of these strings
    #[serde(rename = "allowed-domains", default)]
    pub allowed_domains: Vec<String>,

    /// Regular expressions (or plain substrings) that exclude a URL
    #[serde(rename = "blocked-patterns", default)]
    pub blocked_patterns: Vec<String>,
}

/// Output configuration; every sink is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving timestamped JSON exports
    #[serde(rename = "json-dir")]
    pub json_dir: Option<String>,

    /// Path of the CSV export
    #[serde(rename = "csv-path")]
    pub csv_path: Option<String>,

    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: Option<String>,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

fn default_max_depth() -> u32 {
    2
}

fn default_max_pages() -> usize {
    100
}

fn default_max_links_per_page() -> usize {
    10
}

fn default_max_concurrent_fetches() -> usize {
    1
}

fn default_requests_per_second() -> f64 {
    1.0
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_backoff_factor() -> f64 {
    2.0
}

fn default_timeout_secs() -> u64 {
    30
}
