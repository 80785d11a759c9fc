//! Configuration module for Gleaner
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and turns the file layout into the immutable settings a crawl session captures.
//!
//! # Example
//!
//! ```no_run
//! use gleaner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gleaner.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

use crate::crawler::{CrawlConfig, FetchConfig};
use validation::MIN_REQUESTS_PER_SECOND;
use std::time::Duration;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FetchSettings, OutputConfig, PolicyConfig, RateLimitScope,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

impl Config {
    /// Builds the traversal settings captured by a crawl session
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            base_url: self.crawler.base_url.clone(),
            max_depth: self.crawler.max_depth,
            max_pages: self.crawler.max_pages,
            max_links_per_page: self.crawler.max_links_per_page,
            max_concurrent_fetches: self.crawler.max_concurrent_fetches,
            allowed_domains: self.policy.allowed_domains.clone(),
            blocked_patterns: self.policy.blocked_patterns.clone(),
        }
    }

    /// Builds the fetch pipeline settings
    pub fn fetch_config(&self) -> FetchConfig {
        let fetch = &self.fetch;
        FetchConfig {
            min_request_interval: Duration::from_secs_f64(
                1.0 / fetch.requests_per_second.max(MIN_REQUESTS_PER_SECOND),
            ),
            rate_limit_scope: fetch.rate_limit_scope,
            max_retries: fetch.max_retries,
            retry_delay: Duration::from_millis(fetch.retry_delay_ms),
            backoff_factor: fetch.backoff_factor,
            timeout: Duration::from_secs(fetch.timeout_secs),
        }
    }
}
