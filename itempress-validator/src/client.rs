//! Client for the authoritative remote schema validator.
//!
//! The remote validator only reports acceptance on write, so a compiled
//! document is checked by a three-step protocol against the document
//! store: write it under a namespaced temporary identifier, read the
//! success flag, and delete the temporary document regardless of outcome.
//! Production identifiers are never touched.

use std::time::Duration;

use itempress_qti::CompiledDocument;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Default namespace prefix for temporary identifiers.
///
/// Chosen so rewritten identifiers sort after real content and can never
/// collide with authored ids.
pub const DEFAULT_TEMP_PREFIX: &str = "zz-itempress-check-";
/// Default number of documents validated concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;
/// Default delay between consecutive batches.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(500);

/// Errors that can occur while talking to the remote validator.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The configured base URL is not a valid URL.
    #[error("invalid validator base url: {0}")]
    InvalidUrl(String),

    /// HTTP layer failed (connection, timeout, etc.).
    #[error("validator HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The validator answered with an unexpected status.
    #[error("validator returned status {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },
}

/// Configuration for the round-trip validator.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Base URL of the validator/document-store API.
    pub base_url: Url,
    /// Namespace prefix for temporary identifiers.
    pub temp_prefix: String,
    /// Documents validated concurrently per batch.
    pub batch_size: usize,
    /// Delay between consecutive batches.
    pub batch_delay: Duration,
}

impl ValidatorConfig {
    /// Build a configuration with the default knobs.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::InvalidUrl`] when `base_url` does not
    /// parse.
    pub fn new(base_url: &str) -> Result<Self, ValidatorError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ValidatorError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            base_url,
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
        })
    }

    /// Override the temporary-identifier prefix.
    #[must_use]
    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }

    /// Override the batch size. Zero is treated as one.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Override the inter-batch delay.
    #[must_use]
    pub fn with_batch_delay(mut self, batch_delay: Duration) -> Self {
        self.batch_delay = batch_delay;
        self
    }
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    schema: &'a str,
    xml: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    identifier: &'a str,
    schema: &'a str,
    xml: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidationResponse {
    success: bool,
}

/// Outcome of one document's round trip.
#[derive(Debug)]
pub struct RoundTripReport {
    /// The original (production) identifier.
    pub identifier: String,
    /// The temporary identifier used for the check.
    pub temp_identifier: String,
    /// Whether the authoritative validator accepted the document, or the
    /// error that prevented an answer.
    pub outcome: Result<bool, ValidatorError>,
}

impl RoundTripReport {
    /// Whether the document was positively accepted.
    #[must_use]
    pub fn accepted(&self) -> bool {
        matches!(self.outcome, Ok(true))
    }
}

/// Validates compiled documents against the authoritative remote schema
/// without ever touching production identifiers.
#[derive(Debug, Clone)]
pub struct RoundTripValidator {
    http: Client,
    config: ValidatorConfig,
}

impl RoundTripValidator {
    /// Build a validator over a caller-supplied HTTP client.
    ///
    /// The client's timeout is the only timeout in play; this crate adds
    /// none of its own.
    #[must_use]
    pub fn new(http: Client, config: ValidatorConfig) -> Self {
        Self { http, config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Round-trip one compiled document.
    ///
    /// Never returns an error: failures are captured in the report so a
    /// batch sibling can never be taken down by this document.
    pub async fn validate_one(&self, document: &CompiledDocument) -> RoundTripReport {
        let temp_identifier = format!("{}{}", self.config.temp_prefix, document.identifier());
        let xml = rewrite_identifier(document.xml(), document.identifier(), &temp_identifier);
        let schema = document.kind().schema_name();

        let outcome = self.upsert(&temp_identifier, schema, &xml).await;

        // Cleanup always runs; its failure is logged, never escalated.
        self.cleanup(&temp_identifier).await;

        if let Ok(accepted) = &outcome {
            debug!(
                identifier = %document.identifier(),
                accepted,
                "remote round-trip validation finished"
            );
        }
        RoundTripReport {
            identifier: document.identifier().to_string(),
            temp_identifier,
            outcome,
        }
    }

    /// Round-trip many documents in fixed-size batches.
    ///
    /// Within a batch every document validates concurrently; batches run
    /// sequentially with the configured delay in between - the pipeline's
    /// only backpressure mechanism. The report order always matches the
    /// input order, and one document's failure never aborts its siblings.
    pub async fn validate_batch(&self, documents: &[CompiledDocument]) -> Vec<RoundTripReport> {
        let mut reports = Vec::with_capacity(documents.len());
        for (index, batch) in documents.chunks(self.config.batch_size.max(1)).enumerate() {
            if index > 0 && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
            let batch_reports =
                futures::future::join_all(batch.iter().map(|document| self.validate_one(document)))
                    .await;
            reports.extend(batch_reports);
        }
        reports
    }

    /// Update the temporary document, creating it when the store reports
    /// not-found, and read the validator's verdict.
    async fn upsert(
        &self,
        temp_identifier: &str,
        schema: &str,
        xml: &str,
    ) -> Result<bool, ValidatorError> {
        let update_url = self.document_url(temp_identifier)?;
        let response = self
            .http
            .put(update_url)
            .json(&UpdateRequest { schema, xml })
            .send()
            .await?;

        let response = if response.status() == StatusCode::NOT_FOUND {
            let create_url = self.collection_url()?;
            self.http
                .post(create_url)
                .json(&CreateRequest {
                    identifier: temp_identifier,
                    schema,
                    xml,
                })
                .send()
                .await?
        } else {
            response
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ValidatorError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let verdict: ValidationResponse = response.json().await?;
        Ok(verdict.success)
    }

    /// Delete the temporary document. Best effort only.
    async fn cleanup(&self, temp_identifier: &str) {
        let url = match self.document_url(temp_identifier) {
            Ok(url) => url,
            Err(e) => {
                warn!("cannot build cleanup url for {temp_identifier}: {e}");
                return;
            }
        };
        match self.http.delete(url).send().await {
            Ok(response)
                if response.status().is_success()
                    || response.status() == StatusCode::NOT_FOUND => {}
            Ok(response) => {
                warn!(
                    "failed to delete temporary document {temp_identifier}: status {}",
                    response.status()
                );
            }
            Err(e) => {
                warn!("failed to delete temporary document {temp_identifier}: {e}");
            }
        }
    }

    fn collection_url(&self) -> Result<Url, ValidatorError> {
        self.config
            .base_url
            .join("api/documents")
            .map_err(|e| ValidatorError::InvalidUrl(e.to_string()))
    }

    fn document_url(&self, identifier: &str) -> Result<Url, ValidatorError> {
        self.config
            .base_url
            .join(&format!("api/documents/{identifier}"))
            .map_err(|e| ValidatorError::InvalidUrl(e.to_string()))
    }
}

/// Rewrite the root identifier attribute to the temporary value.
///
/// Only the first occurrence is touched: that is the root element's
/// attribute, since declarations inside the document carry response and
/// outcome identifiers, not document identifiers.
#[must_use]
pub fn rewrite_identifier(xml: &str, original: &str, temp: &str) -> String {
    xml.replacen(
        &format!("identifier=\"{original}\""),
        &format!("identifier=\"{temp}\""),
        1,
    )
}
