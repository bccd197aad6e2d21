//! Data model shared by the resolver, aggregator and validator

use crate::HarvestError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Embedded metadata extracted from a dataset site
pub type StructuredBlock = Map<String, Value>;

/// Returns the identifier declared by a block, preferring `@id` over `id`
pub fn block_identifier(block: &StructuredBlock) -> Option<&str> {
    block
        .get("@id")
        .or_else(|| block.get("id"))
        .and_then(Value::as_str)
}

/// A remote catalog document
///
/// Catalogs are read once per traversal and dropped after their links have
/// been scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Declared identifier (`@id`, falling back to `id`)
    pub id: Option<String>,

    /// Child catalog URLs, present on catalog collections
    pub has_part: Option<Vec<String>>,

    /// Dataset site URLs, present on leaf catalogs
    pub dataset: Option<Vec<String>>,
}

/// What a catalog contributes to a traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogContents {
    /// Child catalogs to resolve
    Parts(Vec<String>),

    /// Dataset sites listed directly
    Datasets(Vec<String>),

    /// Neither field is present
    Empty,
}

impl Catalog {
    /// Reads a catalog from a parsed JSON document
    ///
    /// Anything that is not an object reads as an empty catalog. Fields that
    /// are not arrays are treated as absent and non-string members are dropped.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let id = block_identifier(object).map(str::to_string);
        let has_part = string_list(object, "hasPart", id.as_deref());
        let dataset = string_list(object, "dataset", id.as_deref());

        Self {
            id,
            has_part,
            dataset,
        }
    }

    /// Consumes the catalog, giving `hasPart` precedence over `dataset`
    pub fn into_contents(self) -> CatalogContents {
        if let Some(parts) = self.has_part {
            CatalogContents::Parts(parts)
        } else if let Some(datasets) = self.dataset {
            CatalogContents::Datasets(datasets)
        } else {
            CatalogContents::Empty
        }
    }
}

fn string_list(
    object: &Map<String, Value>,
    field: &str,
    id: Option<&str>,
) -> Option<Vec<String>> {
    let items = object.get(field)?.as_array()?;
    let urls: Vec<String> = items
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect();

    if urls.len() != items.len() {
        tracing::warn!(
            "Catalog {} lists {} non-string {} entries, skipping them",
            id.unwrap_or("<unidentified>"),
            items.len() - urls.len(),
            field
        );
    }

    Some(urls)
}

/// Structured record of a failed retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchError {
    /// The URL that could not be retrieved
    pub url: String,

    /// HTTP status code, when the server answered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Human readable description of the failure
    pub message: String,
}

impl FetchError {
    pub fn new(url: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    /// Records `error` as the failure for `url`
    pub fn from_error(url: &str, error: &HarvestError) -> Self {
        Self::new(url, error.status(), error.to_string())
    }
}

/// Dataset site URLs reachable from a catalog plus every catalog failure
/// encountered on the way
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub urls: Vec<String>,
    pub errors: Vec<FetchError>,
}

impl ResolutionResult {
    /// A result for a catalog that could not be resolved
    pub fn failed(error: FetchError) -> Self {
        Self {
            urls: Vec::new(),
            errors: vec![error],
        }
    }

    /// Appends a child result after the ones already merged
    pub fn merge(&mut self, child: ResolutionResult) {
        self.urls.extend(child.urls);
        self.errors.extend(child.errors);
    }
}

/// Public result of a harvest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetAggregate {
    pub jsonld: Vec<StructuredBlock>,
    pub errors: Vec<FetchError>,
}

/// Result of an identifier check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}
