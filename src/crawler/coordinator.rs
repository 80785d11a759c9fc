//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl session that coordinates all aspects of the
//! crawling process, including:
//! - Seeding and draining the frontier in breadth-first order
//! - Validating each URL against the session policy
//! - Fetching through the fetch pipeline, alone or in bounded batches
//! - Extracting facts and following links within the depth budget
//! - Stopping on page budget, empty frontier or cancellation

use crate::crawler::item::ScrapedItem;
use crate::crawler::parser::parse_page;
use crate::crawler::pipeline::FetchPipeline;
use crate::crawler::scheduler::{Frontier, FrontierEntry};
use crate::output::SessionAggregator;
use crate::state::CrawlState;
use crate::url::UrlPolicy;
use crate::{FetchError, GleanerError};
use futures::future::join_all;
use futures::stream::{self, Stream};
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;

/// Pages between two progress log lines
const PROGRESS_INTERVAL: usize = 10;

/// Traversal settings, immutable for the lifetime of a session
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    /// Base for resolving relative links; when empty the page's own URL is used
    pub base_url: String,
    pub max_depth: u32,
    pub max_pages: usize,
    /// New links enqueued per page at most
    pub max_links_per_page: usize,
    /// Frontier entries fetched concurrently at most
    pub max_concurrent_fetches: usize,
    pub allowed_domains: Vec<String>,
    pub blocked_patterns: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_depth: 2,
            max_pages: 100,
            max_links_per_page: 10,
            max_concurrent_fetches: 1,
            allowed_domains: Vec::new(),
            blocked_patterns: Vec::new(),
        }
    }
}

/// One crawl session
///
/// A session is driven by pulling items: each call to [`Crawler::next_item`]
/// runs the crawl loop until the next page has been scraped or the session
/// reaches a terminal state. Sessions are not resumable; crawling again needs a
/// new `Crawler`.
///
/// # Example
///
/// ```no_run
/// use gleaner::crawler::{CrawlConfig, Crawler, DemoFetcher, FetchConfig, FetchPipeline};
/// use std::sync::Arc;
///
/// # async fn example() -> gleaner::Result<()> {
/// let pipeline = FetchPipeline::new(Arc::new(DemoFetcher::new()), &FetchConfig::default());
/// let mut crawler = Crawler::new(CrawlConfig::default(), pipeline);
/// crawler.crawl(&["https://demo-store.com/electronics"])?;
///
/// while let Some(item) = crawler.next_item().await {
///     println!("{} ({})", item.display_title(), item.url);
/// }
/// println!("{}", crawler.aggregator().generate_report());
/// # Ok(())
/// # }
/// ```
pub struct Crawler {
    config: CrawlConfig,
    policy: UrlPolicy,
    pipeline: FetchPipeline,
    frontier: Frontier,
    aggregator: SessionAggregator,
    state: CrawlState,
    cancel: CancellationToken,
    /// Items scraped by the current batch and not yet handed out
    ready: VecDeque<ScrapedItem>,
}

impl Crawler {
    /// Creates an idle session
    pub fn new(config: CrawlConfig, pipeline: FetchPipeline) -> Self {
        let policy = UrlPolicy::new(&config.allowed_domains, &config.blocked_patterns);

        Self {
            config,
            policy,
            pipeline,
            frontier: Frontier::new(),
            aggregator: SessionAggregator::new(),
            state: CrawlState::Idle,
            cancel: CancellationToken::new(),
            ready: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn aggregator(&self) -> &SessionAggregator {
        &self.aggregator
    }

    pub fn into_aggregator(self) -> SessionAggregator {
        self.aggregator
    }

    /// Token that stops the session when cancelled
    ///
    /// The token is checked before every frontier pop; fetches already started
    /// finish first.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Number of URLs dequeued so far
    pub fn visited_count(&self) -> usize {
        self.frontier.visited_count()
    }

    /// Number of entries waiting in the frontier
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Submits the seeds and starts the session
    ///
    /// Seeds are enqueued at depth 0; duplicates are dropped.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of distinct seeds enqueued
    /// * `Err(GleanerError::InvalidTransition)` - The session was already started
    pub fn crawl<S: AsRef<str>>(&mut self, seeds: &[S]) -> Result<usize, GleanerError> {
        self.transition(CrawlState::Running)?;
        self.aggregator.start();

        let added = self.frontier.push_seeds(seeds);
        tracing::info!(
            "Starting crawl: {} seeds, max depth {}, max pages {}",
            added,
            self.config.max_depth,
            self.config.max_pages
        );
        Ok(added)
    }

    /// Runs the crawl until the next item is scraped
    ///
    /// # Returns
    ///
    /// * `Some(ScrapedItem)` - The next scraped page
    /// * `None` - The session is in a terminal state (or was never started)
    pub async fn next_item(&mut self) -> Option<ScrapedItem> {
        loop {
            if let Some(item) = self.ready.pop_front() {
                return Some(item);
            }

            if self.state != CrawlState::Running {
                return None;
            }

            if self.cancel.is_cancelled() {
                self.finish(CrawlState::Cancelled);
                return None;
            }

            let remaining = self
                .config
                .max_pages
                .saturating_sub(self.aggregator.stats().pages_scraped);
            if remaining == 0 {
                self.finish(CrawlState::Exhausted);
                return None;
            }

            let batch_size = self.config.max_concurrent_fetches.clamp(1, remaining);
            let batch = self.next_batch(batch_size);
            if batch.is_empty() {
                let next = if self.cancel.is_cancelled() {
                    CrawlState::Cancelled
                } else {
                    CrawlState::Completed
                };
                self.finish(next);
                return None;
            }

            self.process_batch(batch).await;
        }
    }

    /// Drains the session
    ///
    /// # Returns
    ///
    /// The terminal state the session ended in
    pub async fn run(&mut self) -> CrawlState {
        while self.next_item().await.is_some() {}
        self.state
    }

    /// Borrows the session as a stream of items
    pub fn items(&mut self) -> impl Stream<Item = ScrapedItem> + '_ {
        stream::unfold(self, |crawler| async move {
            let item = crawler.next_item().await?;
            Some((item, crawler))
        })
    }

    /// Turns the session into a stream of items
    pub fn into_stream(self) -> impl Stream<Item = ScrapedItem> {
        stream::unfold(self, |mut crawler| async move {
            let item = crawler.next_item().await?;
            Some((item, crawler))
        })
    }

    /// Pops up to `size` entries that pass the depth and policy checks
    fn next_batch(&mut self, size: usize) -> Vec<FrontierEntry> {
        let mut batch = Vec::with_capacity(size);

        while batch.len() < size {
            if self.cancel.is_cancelled() {
                break;
            }

            let Some(entry) = self.frontier.pop() else {
                break;
            };

            if entry.depth > self.config.max_depth {
                tracing::debug!("Skipping {}: depth {} exceeds limit", entry.url, entry.depth);
                continue;
            }

            if !self.policy.should_scrape(&entry.url) {
                tracing::debug!("Skipping {}: rejected by URL policy", entry.url);
                continue;
            }

            batch.push(entry);
        }

        batch
    }

    async fn process_batch(&mut self, batch: Vec<FrontierEntry>) {
        let results = if batch.len() == 1 {
            vec![self.pipeline.fetch(&batch[0].url).await]
        } else {
            let pipeline = &self.pipeline;
            join_all(
                batch
                    .iter()
                    .map(|entry| async move { pipeline.fetch(&entry.url).await }),
            )
            .await
        };

        for (entry, result) in batch.into_iter().zip(results) {
            self.handle_result(entry, result);
        }
    }

    fn handle_result(&mut self, entry: FrontierEntry, result: Result<String, FetchError>) {
        let body = match result {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to fetch {}: {}", entry.url, e);
                self.aggregator.record_fetch_error(&entry.url, &e);
                return;
            }
        };

        let base_url = if self.config.base_url.is_empty() {
            entry.url.as_str()
        } else {
            self.config.base_url.as_str()
        };
        let page = parse_page(&body, base_url);

        if entry.depth < self.config.max_depth {
            let links: Vec<String> = page
                .facts
                .links
                .iter()
                .filter(|link| self.policy.should_scrape(link))
                .cloned()
                .collect();
            let added =
                self.frontier
                    .push_links(&links, entry.depth + 1, self.config.max_links_per_page);
            tracing::debug!(
                "{}: {} links found, {} enqueued at depth {}",
                entry.url,
                page.facts.links.len(),
                added,
                entry.depth + 1
            );
        }

        let item = ScrapedItem::new(&entry.url, entry.depth, page);
        self.aggregator.record_item(item.clone());
        self.ready.push_back(item);

        let scraped = self.aggregator.stats().pages_scraped;
        if scraped % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Progress: {} pages scraped, {} errors, {} in frontier",
                scraped,
                self.aggregator.stats().error_count,
                self.frontier.len()
            );
        }
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), GleanerError> {
        if !self.state.can_transition_to(next) {
            return Err(GleanerError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    fn finish(&mut self, next: CrawlState) {
        if let Err(e) = self.transition(next) {
            tracing::warn!("{}", e);
            return;
        }

        let discarded = self.frontier.clear();
        self.aggregator.finish();

        let stats = self.aggregator.stats();
        tracing::info!(
            "Crawl {}: {} pages scraped, {} errors, {} queued URLs discarded",
            next,
            stats.pages_scraped,
            stats.error_count,
            discarded
        );
    }
}
