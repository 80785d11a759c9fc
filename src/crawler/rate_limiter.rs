//! Request spacing for the fetch pipeline
//!
//! The limiter enforces a minimum interval between the starts of successive fetch
//! attempts, either per host or across the whole session. Callers that arrive too
//! early sleep; requests are never dropped.

use crate::config::RateLimitScope;
use crate::state::HostState;
use crate::url::extract_host;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Key used for every URL when the scope is global, and for URLs without a host
const GLOBAL_KEY: &str = "*";

/// Shared rate limiter
///
/// Cloning is cheap and clones share state, so concurrent workers observe the same
/// request history.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    scope: RateLimitScope,
    hosts: Arc<Mutex<HashMap<String, HostState>>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration, scope: RateLimitScope) -> Self {
        Self {
            min_interval,
            scope,
            hosts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    fn key_for(&self, url: &str) -> String {
        match self.scope {
            RateLimitScope::Global => GLOBAL_KEY.to_string(),
            RateLimitScope::PerHost => extract_host(url).unwrap_or_else(|| GLOBAL_KEY.to_string()),
        }
    }

    /// Waits until a request to `url` is allowed
    ///
    /// The slot is reserved before sleeping so that concurrent callers queue up
    /// one interval apart.
    pub async fn wait(&self, url: &str) {
        let key = self.key_for(url);
        let wait = {
            let mut hosts = self.hosts.lock().await;
            hosts
                .entry(key.clone())
                .or_default()
                .reserve_slot(self.min_interval, Instant::now())
        };

        if !wait.is_zero() {
            tracing::debug!("Rate limiting {}: waiting {:?}", key, wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Records a throttling response for the host of `url`
    pub async fn record_throttle(&self, url: &str) {
        let key = self.key_for(url);
        let mut hosts = self.hosts.lock().await;
        hosts.entry(key).or_default().record_throttle();
    }

    /// Returns a snapshot of the state tracked for `url`'s key
    pub async fn host_state(&self, url: &str) -> Option<HostState> {
        let key = self.key_for(url);
        self.hosts.lock().await.get(&key).cloned()
    }
}
