//! Dataset aggregation: resolve, fetch every site, extract metadata

use crate::harvest::extractor::extract;
use crate::harvest::model::{DatasetAggregate, ResolutionResult, StructuredBlock};
use crate::harvest::Harvester;
use crate::HarvestError;

impl Harvester {
    /// Harvests every dataset reachable from a catalog
    ///
    /// Resolves the catalog tree, fetches all dataset sites concurrently with
    /// the retry policy, and extracts the first JSON-LD block of each site.
    /// Sites that load but embed no metadata are skipped without an error.
    ///
    /// Never fails. `errors` lists catalog failures first, then dataset site
    /// failures in dataset order.
    ///
    /// # Arguments
    ///
    /// * `catalog_url` - A catalog or catalog collection URL
    pub async fn aggregate(&self, catalog_url: &str) -> DatasetAggregate {
        let ResolutionResult { urls, mut errors } = self.resolve(catalog_url).await;
        tracing::info!(
            "Resolved {} dataset sites from {} ({} catalog errors)",
            urls.len(),
            catalog_url,
            errors.len()
        );

        let handles: Vec<_> = urls
            .into_iter()
            .map(|url| {
                let harvester = self.clone();
                let site = url.clone();
                let handle = tokio::spawn(async move { harvester.harvest_site(&site).await });
                (url, handle)
            })
            .collect();

        let mut jsonld = Vec::new();
        for (url, handle) in handles {
            match handle.await {
                Ok(Ok(Some(block))) => jsonld.push(block),
                Ok(Ok(None)) => tracing::debug!("No structured data found at {}", url),
                Ok(Err(error)) => errors.push(self.report(&url, &error)),
                Err(e) => {
                    let error = HarvestError::Task {
                        url: url.clone(),
                        message: e.to_string(),
                    };
                    errors.push(self.report(&url, &error));
                }
            }
        }

        tracing::info!(
            "Harvested {} datasets with {} errors",
            jsonld.len(),
            errors.len()
        );

        DatasetAggregate { jsonld, errors }
    }

    /// Fetches one dataset site and extracts its metadata
    async fn harvest_site(&self, url: &str) -> Result<Option<StructuredBlock>, HarvestError> {
        let document = self.fetch_with_retry(url).await?;
        Ok(extract(&document.url, &document.body))
    }
}
