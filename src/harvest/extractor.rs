//! JSON-LD extraction from dataset site HTML
//!
//! Dataset sites embed their metadata in `<script type="application/ld+json">`
//! elements. Only the first such element is read.

use crate::harvest::model::StructuredBlock;
use scraper::{Html, Selector};
use serde_json::Value;
use url::Url;

/// Reference fields resolved against the page URL when relative
const REFERENCE_FIELDS: [&str; 3] = ["@id", "id", "url"];

/// Extracts the first embedded JSON-LD block from a page
///
/// If the block is a JSON array, its first object is used. Relative `@id`,
/// `id` and `url` values on the returned object are resolved against
/// `source_url`.
///
/// # Arguments
///
/// * `source_url` - The URL the page was fetched from
/// * `html` - The page content
///
/// # Returns
///
/// * `Some(StructuredBlock)` - The first block
/// * `None` - No block, or the first block is not valid JSON
///
/// # Example
///
/// ```no_run
/// use dataset_harvest::harvest::extract;
///
/// let html = r#"<script type="application/ld+json">{"@type": "Dataset", "@id": "/site"}</script>"#;
/// let block = extract("https://example.com/", html).unwrap();
/// assert_eq!(block["@id"], "https://example.com/site");
/// ```
pub fn extract(source_url: &str, html: &str) -> Option<StructuredBlock> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script[type]").ok()?;

    let script = document
        .select(&selector)
        .find(|element| element.value().attr("type").is_some_and(is_json_ld_type))?;

    let raw = script.text().collect::<String>();
    let value: Value = match serde_json::from_str(strip_wrappers(&raw)) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Malformed JSON-LD at {}: {}", source_url, e);
            return None;
        }
    };

    let mut block = match value {
        Value::Object(object) => object,
        Value::Array(items) => items.into_iter().find_map(|item| match item {
            Value::Object(object) => Some(object),
            _ => None,
        })?,
        _ => return None,
    };

    if let Ok(base) = Url::parse(source_url) {
        resolve_references(&mut block, &base);
    }

    Some(block)
}

/// Matches `application/ld+json`, ignoring case and media type parameters
fn is_json_ld_type(value: &str) -> bool {
    let media_type = value.split(';').next().unwrap_or(value);
    media_type.trim().eq_ignore_ascii_case("application/ld+json")
}

/// Removes HTML comment and CDATA wrappers some generators put around scripts
fn strip_wrappers(raw: &str) -> &str {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix("<!--")
        .and_then(|r| r.strip_suffix("-->"))
        .unwrap_or(raw)
        .trim();
    raw.strip_prefix("//<![CDATA[")
        .and_then(|r| r.strip_suffix("//]]>"))
        .unwrap_or(raw)
        .trim()
}

fn resolve_references(block: &mut StructuredBlock, base: &Url) {
    for field in REFERENCE_FIELDS {
        if let Some(Value::String(reference)) = block.get_mut(field) {
            if let Some(absolute) = absolutize(reference, base) {
                *reference = absolute;
            }
        }
    }
}

/// Returns the absolute form of a relative reference, `None` otherwise
fn absolutize(reference: &str, base: &Url) -> Option<String> {
    // blank node identifiers are not URLs
    if reference.is_empty() || reference.starts_with("_:") {
        return None;
    }

    match Url::parse(reference) {
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            base.join(reference).ok().map(String::from)
        }
        _ => None,
    }
}
