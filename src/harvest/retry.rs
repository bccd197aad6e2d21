//! Retry policy for dataset site and identifier fetches
//!
//! Only responses whose status is listed as retryable are attempted again;
//! every other failure goes straight back to the caller. The pause between
//! attempts is drawn uniformly from the backoff range so concurrent callers
//! hitting the same origin drift apart.

use crate::config::RetryConfig;
use crate::HarvestError;
use std::future::Future;
use std::time::Duration;

/// Randomized pause between attempts, sampled from `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub min: Duration,
    pub max: Duration,
}

impl Backoff {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// No pause at all
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draws a delay; an empty range yields `min`
    pub fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if max <= min {
            return self.min;
        }
        Duration::from_millis(fastrand::u64(min..max))
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), Duration::from_millis(3000))
    }
}

/// How many times to try, which failures to retry, and how long to wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// HTTP status codes that trigger another attempt
    pub retryable_statuses: Vec<u16>,

    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retryable_statuses: vec![403],
            backoff: Backoff::default(),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            retryable_statuses: config.retryable_statuses.clone(),
            backoff: Backoff::new(
                Duration::from_millis(config.min_backoff_ms),
                Duration::from_millis(config.max_backoff_ms),
            ),
        }
    }

    /// A policy that never retries
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            retryable_statuses: Vec::new(),
            backoff: Backoff::none(),
        }
    }

    /// Whether `error` may be followed by another attempt
    pub fn is_retryable(&self, error: &HarvestError) -> bool {
        error
            .status()
            .is_some_and(|status| self.retryable_statuses.contains(&status))
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempts run out. The operation receives the 1-based attempt
    /// number. The last error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, HarvestError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, HarvestError>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_attempts && self.is_retryable(&error) => {
                    let delay = self.backoff.sample();
                    tracing::debug!(
                        "Attempt {}/{} failed ({}), retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
