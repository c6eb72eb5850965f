//! HTTP client for the verification proxy.

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, instrument};

use super::{VerificationClient, VerificationError};
use crate::types::{PaymentReference, VerificationResponse};

/// Calls `GET <verify_url>?reference=<reference>` on the verification proxy.
#[derive(Debug, Clone)]
pub struct HttpVerificationClient {
    client: reqwest::Client,
    verify_url: Url,
}

impl HttpVerificationClient {
    /// Create a client for the proxy endpoint at `verify_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `verify_url` is not an absolute URL.
    pub fn new(verify_url: &str) -> Result<Self, VerificationError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| VerificationError::Transport(e.to_string()))?;
        Self::with_client(client, verify_url)
    }

    /// Like [`new`](Self::new), reusing an existing `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns an error if `verify_url` is not an absolute URL.
    pub fn with_client(client: reqwest::Client, verify_url: &str) -> Result<Self, VerificationError> {
        let verify_url = Url::parse(verify_url)
            .map_err(|e| VerificationError::Transport(format!("invalid verify URL: {e}")))?;
        Ok(Self { client, verify_url })
    }

    fn url_for(&self, reference: &PaymentReference) -> Url {
        let mut url = self.verify_url.clone();
        url.query_pairs_mut()
            .append_pair("reference", reference.as_str());
        url
    }
}

#[async_trait]
impl VerificationClient for HttpVerificationClient {
    /// The verdict is read from the body whatever the HTTP status, since the
    /// proxy answers errors with a JSON verdict too.
    #[instrument(skip(self), fields(reference = %reference))]
    async fn verify(
        &self,
        reference: &PaymentReference,
    ) -> Result<VerificationResponse, VerificationError> {
        let response = self
            .client
            .get(self.url_for(reference))
            .send()
            .await
            .map_err(|e| VerificationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VerificationError::Transport(e.to_string()))?;
        debug!(status = status.as_u16(), "Verification proxy answered");

        serde_json::from_str(&body).map_err(|e| VerificationError::Decode(e.to_string()))
    }
}
