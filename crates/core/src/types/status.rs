//! Verification verdicts exchanged between the checkout bridge and the proxy.

use serde::{Deserialize, Serialize};

/// Outcome reported by the verification proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// The provider confirmed the transaction.
    Success,
    /// The provider answered, but the transaction is not successful.
    Failed,
    /// The request could not be verified (bad input, provider unreachable).
    Error,
}

/// Body of `GET /verify-payment`: `{"status": "success"|"failed"|"error", "message"?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerificationResponse {
    /// A successful verdict.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            status: VerificationStatus::Success,
            message: None,
        }
    }

    /// A failed verdict.
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            status: VerificationStatus::Failed,
            message: None,
        }
    }

    /// An error verdict with a message for the caller.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: VerificationStatus::Error,
            message: Some(message.into()),
        }
    }

    /// Whether the payment was confirmed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == VerificationStatus::Success
    }
}
