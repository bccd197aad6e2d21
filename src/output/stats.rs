//! Statistics for a finished harvest

use crate::harvest::DatasetAggregate;
use std::collections::BTreeMap;

/// Key used for failures that carry no HTTP status
pub const NO_STATUS: &str = "no status";

/// Harvest statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestStatistics {
    /// Number of JSON-LD blocks collected
    pub datasets: usize,

    /// Total number of failures
    pub errors: usize,

    /// Failures grouped by HTTP status (or [`NO_STATUS`])
    pub errors_by_status: BTreeMap<String, usize>,
}

impl HarvestStatistics {
    pub fn from_aggregate(aggregate: &DatasetAggregate) -> Self {
        let mut errors_by_status = BTreeMap::new();
        for error in &aggregate.errors {
            let key = error
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| NO_STATUS.to_string());
            *errors_by_status.entry(key).or_insert(0) += 1;
        }

        Self {
            datasets: aggregate.jsonld.len(),
            errors: aggregate.errors.len(),
            errors_by_status,
        }
    }
}

/// Logs statistics at info level
///
/// Goes through tracing rather than stdout, which carries the JSON result.
pub fn log_statistics(stats: &HarvestStatistics) {
    tracing::info!(
        "Harvest finished: {} datasets, {} errors",
        stats.datasets,
        stats.errors
    );

    // Sort by count (descending)
    let mut status_counts: Vec<_> = stats.errors_by_status.iter().collect();
    status_counts.sort_by(|a, b| b.1.cmp(a.1));

    for (status, count) in status_counts {
        tracing::info!("  {}: {}", status, count);
    }
}
