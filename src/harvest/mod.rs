//! Harvest module for catalog traversal and metadata collection
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with a status-driven retry policy
//! - Recursive catalog resolution with cycle and depth guards
//! - JSON-LD extraction from dataset sites
//! - Aggregation of metadata and failures
//! - Identifier validation

mod aggregator;
mod extractor;
mod fetcher;
mod limiter;
mod model;
mod resolver;
mod retry;
mod validator;

pub use extractor::extract;
pub use fetcher::{build_http_client, fetch_document, FetchedDocument, Payload};
pub use limiter::RequestLimiter;
pub use model::{
    block_identifier, Catalog, CatalogContents, DatasetAggregate, FetchError, ResolutionResult,
    StructuredBlock, ValidationOutcome,
};
pub use retry::{Backoff, RetryPolicy};
pub use validator::compare_identifier;

use crate::config::{Config, HarvestConfig};
use crate::HarvestError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Traversal settings shared by every task of a harvest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestSettings {
    /// Timeout for a single catalog request
    pub catalog_timeout: Duration,

    /// Deepest catalog level still fetched (root is 0)
    pub max_depth: u32,

    /// Silences per-failure warnings
    pub suppress_errors: bool,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self::from_config(&HarvestConfig::default())
    }
}

impl HarvestSettings {
    pub fn from_config(config: &HarvestConfig) -> Self {
        Self {
            catalog_timeout: Duration::from_millis(config.catalog_timeout_ms),
            max_depth: config.max_depth,
            suppress_errors: config.suppress_errors,
        }
    }
}

/// Entry point for catalog resolution, aggregation and validation
///
/// Cloning is cheap; every clone shares the HTTP connection pool, the
/// request limiter and the settings. Operations spawn tokio tasks and must
/// run inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct Harvester {
    client: Client,
    settings: Arc<HarvestSettings>,
    retry: Arc<RetryPolicy>,
    limiter: RequestLimiter,
}

impl Harvester {
    pub fn new(
        client: Client,
        settings: HarvestSettings,
        retry: RetryPolicy,
        limiter: RequestLimiter,
    ) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
            retry: Arc::new(retry),
            limiter,
        }
    }

    /// Builds a harvester from a loaded configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to use
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.user_agent)?;
        Ok(Self::new(
            client,
            HarvestSettings::from_config(&config.harvest),
            RetryPolicy::from_config(&config.retry),
            RequestLimiter::new(config.harvest.max_concurrent_requests),
        ))
    }

    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn limiter(&self) -> &RequestLimiter {
        &self.limiter
    }

    /// Fetches a URL, retrying as the retry policy allows
    ///
    /// A limiter permit is held per attempt and released before any backoff.
    pub async fn fetch_with_retry(&self, url: &str) -> Result<FetchedDocument, HarvestError> {
        self.retry
            .run(move |attempt| async move {
                tracing::debug!("Fetching {} (attempt {})", url, attempt);
                let _permit = self.limiter.acquire().await;
                fetch_document(&self.client, url, None).await
            })
            .await
    }

    /// Turns an error into its record, logging it unless suppressed
    fn report(&self, url: &str, error: &HarvestError) -> FetchError {
        if !self.settings.suppress_errors {
            tracing::warn!("Failed to fetch {}: {}", url, error);
        }
        FetchError::from_error(url, error)
    }
}
