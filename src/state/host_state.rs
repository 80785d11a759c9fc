use std::time::{Duration, Instant};

/// Tracks the request history of a single host (or of the whole session when
/// the rate limit is global)
#[derive(Debug, Clone, Default)]
pub struct HostState {
    /// Number of fetch attempts granted to this host
    pub request_count: u32,

    /// Start time of the most recently granted request slot
    pub last_request_time: Option<Instant>,

    /// Number of throttling signals (HTTP 429) the host sent back
    pub throttle_signals: u32,
}

impl HostState {
    /// Creates a new HostState with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now.
    pub fn time_until_next_request(&self, min_interval: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let ready_at = last + min_interval;
        if ready_at > now {
            Some(ready_at - now)
        } else {
            None
        }
    }

    /// Reserves the next request slot and returns how long the caller must wait
    ///
    /// The slot is recorded immediately, so a second caller arriving before the
    /// first one has slept is queued behind it rather than next to it.
    pub fn reserve_slot(&mut self, min_interval: Duration, now: Instant) -> Duration {
        let wait = self
            .time_until_next_request(min_interval, now)
            .unwrap_or(Duration::ZERO);
        self.record_request(now + wait);
        wait
    }

    /// Records that a request was made at `at`
    pub fn record_request(&mut self, at: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(at);
    }

    /// Records a throttling signal from the host
    pub fn record_throttle(&mut self) {
        self.throttle_signals += 1;
    }
}
