//! Retry policy and error classification for the fetch pipeline
//!
//! | Error | Class |
//! |-------|-------|
//! | Network (timeout, connection) | Transient |
//! | HTTP 429 | Transient |
//! | Other non-success status | Fatal |
//! | Non-HTML content | Skip |
//! | Malformed response | Fatal |

use crate::FetchError;
use std::time::Duration;

/// How the pipeline treats a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Worth another attempt after backing off
    Transient,
    /// Final for this URL
    Fatal,
    /// Final for this URL; the resource is not a page
    Skip,
}

impl ErrorClass {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient)
    }
}

/// Classifies a fetch failure
pub fn classify(error: &FetchError) -> ErrorClass {
    match error {
        FetchError::Network { .. } | FetchError::RateLimited { .. } => ErrorClass::Transient,
        FetchError::ContentMismatch { .. } => ErrorClass::Skip,
        FetchError::Http { .. } | FetchError::Malformed { .. } => ErrorClass::Fatal,
    }
}

/// Exponential backoff retry policy
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_retries,
            base_delay,
            backoff_factor,
        }
    }

    /// Delay before retry number `attempt` (0 for the first retry)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        self.base_delay
            .mul_f64(self.backoff_factor.powi(exponent).min(MAX_BACKOFF_MULTIPLIER))
    }

    /// Returns true if a failure of this class on retry `attempt` should be retried
    pub fn should_retry(&self, class: ErrorClass, attempt: u32) -> bool {
        class.is_retryable() && attempt < self.max_retries
    }
}

/// Keeps `Duration::mul_f64` clear of overflow for large attempt counts
const MAX_BACKOFF_MULTIPLIER: f64 = 1.0e6;
