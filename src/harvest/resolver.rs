//! Recursive catalog resolution
//!
//! A catalog collection fans out into one task per `hasPart` member. Child
//! results are awaited in declaration order, so the flattened URL list keeps
//! catalog order no matter which branch finishes first.

use crate::harvest::fetcher::fetch_document;
use crate::harvest::model::{Catalog, CatalogContents, ResolutionResult};
use crate::harvest::Harvester;
use crate::HarvestError;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type ResolveFuture = Pin<Box<dyn Future<Output = ResolutionResult> + Send + 'static>>;

impl Harvester {
    /// Resolves a catalog into the dataset site URLs it references
    ///
    /// Never fails: every catalog that cannot be fetched, parsed, or is
    /// refused by the cycle and depth guards becomes one entry in
    /// `errors` and contributes no URLs.
    ///
    /// # Arguments
    ///
    /// * `catalog_url` - A catalog or catalog collection URL
    pub async fn resolve(&self, catalog_url: &str) -> ResolutionResult {
        self.clone()
            .resolve_node(catalog_url.to_string(), Arc::new(Vec::new()), 0)
            .await
    }

    /// Resolves one node of the catalog tree
    ///
    /// `ancestors` holds the URLs from the root down to this node's parent.
    fn resolve_node(self, url: String, ancestors: Arc<Vec<String>>, depth: u32) -> ResolveFuture {
        Box::pin(async move {
            if ancestors.contains(&url) {
                let error = HarvestError::CycleDetected { url: url.clone() };
                return ResolutionResult::failed(self.report(&url, &error));
            }

            if depth > self.settings.max_depth {
                let error = HarvestError::DepthExceeded {
                    url: url.clone(),
                    max_depth: self.settings.max_depth,
                };
                return ResolutionResult::failed(self.report(&url, &error));
            }

            let catalog = match self.fetch_catalog(&url).await {
                Ok(catalog) => catalog,
                Err(error) => return ResolutionResult::failed(self.report(&url, &error)),
            };

            match catalog.into_contents() {
                CatalogContents::Parts(parts) => {
                    tracing::debug!("Catalog {} has {} parts", url, parts.len());

                    let mut lineage = ancestors.as_ref().clone();
                    lineage.push(url);
                    let lineage = Arc::new(lineage);

                    let handles: Vec<_> = parts
                        .into_iter()
                        .map(|part| {
                            let task = self.clone().resolve_node(
                                part.clone(),
                                Arc::clone(&lineage),
                                depth + 1,
                            );
                            (part, tokio::spawn(task))
                        })
                        .collect();

                    let mut result = ResolutionResult::default();
                    for (part, handle) in handles {
                        match handle.await {
                            Ok(child) => result.merge(child),
                            Err(e) => {
                                let error = HarvestError::Task {
                                    url: part.clone(),
                                    message: e.to_string(),
                                };
                                result.errors.push(self.report(&part, &error));
                            }
                        }
                    }
                    result
                }
                CatalogContents::Datasets(urls) => {
                    tracing::debug!("Catalog {} lists {} datasets", url, urls.len());
                    ResolutionResult {
                        urls,
                        errors: Vec::new(),
                    }
                }
                CatalogContents::Empty => {
                    tracing::debug!("Catalog {} has neither hasPart nor dataset", url);
                    ResolutionResult::default()
                }
            }
        })
    }

    /// Fetches and parses one catalog document, single attempt
    ///
    /// A body that is not JSON reads as an empty catalog; only the request
    /// itself can fail.
    async fn fetch_catalog(&self, url: &str) -> Result<Catalog, HarvestError> {
        let document = {
            let _permit = self.limiter.acquire().await;
            fetch_document(&self.client, url, Some(self.settings.catalog_timeout)).await?
        };

        match serde_json::from_str::<Value>(&document.body) {
            Ok(value) => Ok(Catalog::from_value(&value)),
            Err(e) => {
                tracing::debug!("Catalog {} is not a JSON document: {}", url, e);
                Ok(Catalog::default())
            }
        }
    }
}
