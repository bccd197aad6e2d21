//! Identifier validation for data-quality audits

use crate::harvest::extractor::extract;
use crate::harvest::fetcher::Payload;
use crate::harvest::model::{block_identifier, StructuredBlock, ValidationOutcome};
use crate::harvest::Harvester;
use crate::HarvestError;

impl Harvester {
    /// Checks that the document at `expected_url` declares `expected_url` as
    /// its identifier
    ///
    /// With `expect_html` the response must be an HTML page whose embedded
    /// JSON-LD is inspected; without it the response must itself be a JSON
    /// document. Never fails: fetch errors and mismatches are reported in
    /// the outcome.
    pub async fn validate_identifier(
        &self,
        expected_url: &str,
        expect_html: bool,
    ) -> ValidationOutcome {
        match self.check_identifier(expected_url, expect_html).await {
            Ok(outcome) => outcome,
            Err(error) => ValidationOutcome::invalid(error.to_string()),
        }
    }

    async fn check_identifier(
        &self,
        expected_url: &str,
        expect_html: bool,
    ) -> Result<ValidationOutcome, HarvestError> {
        let payload = self.fetch_with_retry(expected_url).await?.into_payload();

        let block = match (payload, expect_html) {
            (Payload::Text(html), true) => match extract(expected_url, &html) {
                Some(block) => block,
                None => {
                    return Ok(ValidationOutcome::invalid(format!(
                        "No structured data found at {}",
                        expected_url
                    )))
                }
            },
            (Payload::Document(document), false) => document,
            (payload, _) => {
                let expected = if expect_html { "HTML" } else { "JSON document" };
                return Ok(ValidationOutcome::invalid(format!(
                    "Unexpected response type: expected {}, received {}",
                    expected,
                    payload.describe()
                )));
            }
        };

        Ok(compare_identifier(expected_url, &block))
    }
}

/// Compares a block's identifier (`@id`, then `id`) with the expected URL
pub fn compare_identifier(expected_url: &str, block: &StructuredBlock) -> ValidationOutcome {
    match block_identifier(block) {
        Some(id) if id == expected_url => ValidationOutcome::valid(),
        Some(id) => ValidationOutcome::invalid(format!(
            "Mismatched '@id': expected '{}', found '{}'",
            expected_url, id
        )),
        None => ValidationOutcome::invalid(format!(
            "Mismatched '@id': expected '{}', found none",
            expected_url
        )),
    }
}
