//! Paystack API client for transaction verification.
//!
//! Only the one call the verification proxy needs:
//! `GET /transaction/verify/{reference}` with the secret key as a bearer
//! token. The verdict is read from `data.status`; the rest of the payload
//! is ignored.

use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::Value;
use simple_cart_core::VerificationStatus;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::PaystackConfig;

/// Errors that can occur when interacting with the Paystack API.
#[derive(Debug, Error)]
pub enum PaystackError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The secret key cannot be sent as a header value.
    #[error("Invalid secret key format: {0}")]
    InvalidKey(String),

    /// Response body was not JSON.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Paystack API client.
#[derive(Clone)]
pub struct PaystackClient {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for PaystackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaystackClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PaystackClient {
    /// Create a new Paystack API client.
    ///
    /// # Errors
    ///
    /// Returns error if the key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &PaystackConfig) -> Result<Self, PaystackError> {
        let mut headers = HeaderMap::new();

        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", config.secret_key.expose_secret()))
                .map_err(|e| PaystackError::InvalidKey(e.to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        // Verification results must never come from a cache
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// URL of the verify endpoint for `reference`, percent-encoded as one path segment.
    #[must_use]
    pub fn verify_url(&self, reference: &str) -> String {
        format!(
            "{}/transaction/verify/{}",
            self.base_url,
            urlencoding::encode(reference)
        )
    }

    /// Verify a transaction by reference. Makes exactly one request.
    ///
    /// Any JSON answer is a verdict: `success` when `data.status` is
    /// `"success"`, `failed` otherwise, whatever the HTTP status.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not JSON.
    #[instrument(skip(self))]
    pub async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<VerificationStatus, PaystackError> {
        let response = self.client.get(self.verify_url(reference)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let payload: Value =
            serde_json::from_str(&body).map_err(|e| PaystackError::Parse(e.to_string()))?;
        let verdict = verdict_from_payload(&payload);

        debug!(
            upstream_status = status.as_u16(),
            verdict = ?verdict,
            "Paystack verification answered"
        );
        Ok(verdict)
    }
}

/// `success` only when `data.status == "success"`.
fn verdict_from_payload(payload: &Value) -> VerificationStatus {
    match payload.pointer("/data/status").and_then(Value::as_str) {
        Some("success") => VerificationStatus::Success,
        _ => VerificationStatus::Failed,
    }
}
