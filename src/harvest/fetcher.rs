//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building HTTP clients with proper user agent strings
//! - Single GET requests with an optional per-request timeout
//! - Error classification (status, timeout, transport)
//! - Classifying response bodies as JSON documents or text

use crate::config::UserAgentConfig;
use crate::harvest::model::StructuredBlock;
use crate::HarvestError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

/// A successful (2xx) response
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// The requested URL
    pub url: String,

    /// Response body
    pub body: String,
}

/// A response body classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The body parsed as a JSON object
    Document(StructuredBlock),

    /// Anything else, typically HTML
    Text(String),
}

impl Payload {
    /// Short description used in validation messages
    pub fn describe(&self) -> &'static str {
        match self {
            Payload::Document(_) => "JSON document",
            Payload::Text(_) => "text",
        }
    }
}

impl FetchedDocument {
    /// Classifies the body
    ///
    /// Bodies that parse as a JSON object are documents regardless of the
    /// Content-Type header; servers commonly publish JSON-LD as `text/plain`.
    pub fn into_payload(self) -> Payload {
        match serde_json::from_str::<StructuredBlock>(&self.body) {
            Ok(document) => Payload::Document(document),
            Err(_) => Payload::Text(self.body),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// No overall request timeout is set on the client; catalog requests add
/// their own per-request timeout.
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a single GET request
///
/// Non-2xx responses become [`HarvestError::Status`]; transport failures are
/// classified by [`HarvestError::from_reqwest`].
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `timeout` - Optional timeout for this request only
pub async fn fetch_document(
    client: &Client,
    url: &str,
    timeout: Option<Duration>,
) -> Result<FetchedDocument, HarvestError> {
    let mut request = client.get(url);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = request
        .send()
        .await
        .map_err(|e| HarvestError::from_reqwest(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    tracing::debug!(
        "Fetched {} ({}, {})",
        url,
        status.as_u16(),
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("no content type")
    );

    let body = response
        .text()
        .await
        .map_err(|e| HarvestError::from_reqwest(url, e))?;

    Ok(FetchedDocument {
        url: url.to_string(),
        body,
    })
}
