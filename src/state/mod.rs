//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the lifecycle of a crawl session (idle, running, terminal states)
//! - `HostState`: per-host request bookkeeping used by the rate limiter

mod crawl_state;
mod host_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use host_state::HostState;
