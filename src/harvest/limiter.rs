//! Optional global cap on requests in flight
//!
//! Permits are held for a single HTTP request only, never across a recursive
//! resolution or a backoff sleep, so a limit of one still lets a deep catalog
//! tree finish.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Clone, Default)]
pub struct RequestLimiter {
    semaphore: Option<Arc<Semaphore>>,
}

impl RequestLimiter {
    /// Creates a limiter allowing `max_concurrent` requests; 0 means no limit
    pub fn new(max_concurrent: usize) -> Self {
        if max_concurrent == 0 {
            Self::unbounded()
        } else {
            Self {
                semaphore: Some(Arc::new(Semaphore::new(max_concurrent))),
            }
        }
    }

    pub fn unbounded() -> Self {
        Self { semaphore: None }
    }

    pub fn is_bounded(&self) -> bool {
        self.semaphore.is_some()
    }

    /// Permits currently free, or `None` when unbounded
    pub fn available_permits(&self) -> Option<usize> {
        self.semaphore.as_ref().map(|s| s.available_permits())
    }

    /// Waits for a permit. Unbounded limiters return immediately with `None`.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        match &self.semaphore {
            Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
            None => None,
        }
    }
}
