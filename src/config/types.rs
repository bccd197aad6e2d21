use serde::{Deserialize, Serialize};

/// Catalog collection harvested when no root is given
pub const DEFAULT_ROOT_CATALOG_URL: &str =
    "https://openactive.io/data-catalogs/data-catalog-collection.jsonld";

/// Main configuration structure for Dataset-Harvest
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Catalog traversal configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Catalog or catalog collection the harvest starts from
    #[serde(rename = "root-catalog-url")]
    pub root_catalog_url: String,

    /// Timeout for a single catalog request (milliseconds)
    #[serde(rename = "catalog-timeout-ms")]
    pub catalog_timeout_ms: u64,

    /// Deepest catalog nesting level that is still fetched (root is 0)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of requests in flight at once, 0 for no limit
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: usize,

    /// Silences per-failure diagnostics; failures are still collected
    #[serde(rename = "suppress-errors")]
    pub suppress_errors: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            root_catalog_url: DEFAULT_ROOT_CATALOG_URL.to_string(),
            catalog_timeout_ms: 5000,
            max_depth: 32,
            max_concurrent_requests: 0,
            suppress_errors: false,
        }
    }
}

/// Retry behaviour for dataset site and identifier fetches
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// HTTP status codes that trigger another attempt
    #[serde(rename = "retryable-statuses")]
    pub retryable_statuses: Vec<u16>,

    /// Lower bound of the randomized backoff (inclusive, milliseconds)
    #[serde(rename = "min-backoff-ms")]
    pub min_backoff_ms: u64,

    /// Upper bound of the randomized backoff (exclusive, milliseconds)
    #[serde(rename = "max-backoff-ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retryable_statuses: vec![403],
            min_backoff_ms: 1000,
            max_backoff_ms: 3000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub name: String,

    pub version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}
