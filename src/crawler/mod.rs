//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` seam, plus an offline demo fetcher
//! - Rate limiting and retry with exponential backoff
//! - Fact extraction and link discovery
//! - The breadth-first frontier and overall session coordination

mod coordinator;
mod demo;
mod fetcher;
mod item;
mod parser;
mod patterns;
mod pipeline;
mod rate_limiter;
mod retry;
mod scheduler;

pub use coordinator::{CrawlConfig, Crawler};
pub use demo::{DemoFetcher, DEMO_SEEDS};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use item::{compute_content_hash, ScrapedItem};
pub use parser::{
    clean_text, decode_entities, extract, extract_links, parse_page, plain_text, FactBundle,
    Heading, ParsedPage,
};
pub use patterns::FactPattern;
pub use pipeline::{FetchConfig, FetchPipeline};
pub use rate_limiter::RateLimiter;
pub use retry::{classify, ErrorClass, RetryPolicy};
pub use scheduler::{Frontier, FrontierEntry};
