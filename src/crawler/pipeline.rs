//! Fetch pipeline: rate limiting and retry around a page fetcher

use crate::config::RateLimitScope;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::rate_limiter::RateLimiter;
use crate::crawler::retry::{classify, RetryPolicy};
use crate::FetchError;
use std::sync::Arc;
use std::time::Duration;

/// Fetch settings captured when the pipeline is built
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Minimum time between the starts of two attempts sharing a rate-limit key
    pub min_request_interval: Duration,
    pub rate_limit_scope: RateLimitScope,
    pub max_retries: u32,
    /// Delay before the first retry
    pub retry_delay: Duration,
    pub backoff_factor: f64,
    /// Per-request timeout, applied by the HTTP fetcher
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            min_request_interval: Duration::from_secs(1),
            rate_limit_scope: RateLimitScope::PerHost,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Rate-limited, retrying fetch of a single URL
///
/// Cheap to clone; clones share the fetcher and the rate limiter state.
#[derive(Clone)]
pub struct FetchPipeline {
    fetcher: Arc<dyn PageFetcher>,
    limiter: RateLimiter,
    retry: RetryPolicy,
}

impl std::fmt::Debug for FetchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchPipeline")
            .field("limiter", &self.limiter)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl FetchPipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &FetchConfig) -> Self {
        Self {
            fetcher,
            limiter: RateLimiter::new(config.min_request_interval, config.rate_limit_scope),
            retry: RetryPolicy::new(config.max_retries, config.retry_delay, config.backoff_factor),
        }
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetches `url`, retrying transient failures
    ///
    /// Every attempt waits for the rate limiter first. Fatal failures return at
    /// once; when the retries run out the last transient error is returned.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            self.limiter.wait(url).await;
            tracing::info!("Fetching: {} (attempt {})", url, attempt + 1);

            let error = match self.fetcher.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => e,
            };

            if matches!(error, FetchError::RateLimited { .. }) {
                self.limiter.record_throttle(url).await;
            }

            let class = classify(&error);
            if !self.retry.should_retry(class, attempt) {
                if class.is_retryable() {
                    tracing::error!(
                        "Giving up on {} after {} attempts: {}",
                        url,
                        attempt + 1,
                        error
                    );
                }
                return Err(error);
            }

            let delay = self.retry.delay_for(attempt);
            tracing::warn!(
                "Attempt {} for {} failed: {}. Retrying in {:?}",
                attempt + 1,
                url,
                error,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
