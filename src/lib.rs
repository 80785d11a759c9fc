//! Gleaner: a bounded, polite crawl engine
//!
//! This crate turns a set of seed URLs into a breadth-first, deduplicated traversal
//! of a link graph. Every page goes through a rate-limited, retrying fetch pipeline
//! and a pattern-based extractor that pulls structured facts out of raw markup.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use serde::Serialize;
use thiserror::Error;

/// Main error type for Gleaner operations
#[derive(Debug, Error)]
pub enum GleanerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Invalid crawl state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid blocked pattern: {0}")]
    InvalidPattern(String),
}

/// Failure of a single page fetch
///
/// `Network` and `RateLimited` are transient and retried by the fetch pipeline;
/// every other variant is fatal for the URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Rate limit exceeded for {url}")]
    RateLimited { url: String },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Malformed response from {url}: {message}")]
    Malformed { url: String, message: String },
}

impl FetchError {
    /// The error kind recorded in an `ErrorRecord`
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Http { .. } => ErrorKind::Http,
            Self::ContentMismatch { .. } => ErrorKind::ContentMismatch,
            Self::Malformed { .. } => ErrorKind::Malformed,
        }
    }
}

/// Flat error kind, stable enough to export and count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    RateLimited,
    Http,
    ContentMismatch,
    Malformed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::RateLimited => "rate_limited",
            Self::Http => "http",
            Self::ContentMismatch => "content_mismatch",
            Self::Malformed => "malformed",
        }
    }
}

/// Result type alias for Gleaner operations
pub type Result<T> = std::result::Result<T, GleanerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlConfig, Crawler, FetchConfig, FetchPipeline, PageFetcher, ScrapedItem};
pub use output::{ErrorRecord, SessionAggregator, SessionStats};
pub use state::CrawlState;
pub use url::{is_valid_url, should_scrape, UrlPolicy};
