//! Payment transaction references.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of references generated for checkout attempts.
pub const REFERENCE_PREFIX: &str = "ORDER-";

/// A transaction reference shared with the payment provider.
///
/// Generated references are time based (`ORDER-<unix millis>`). References
/// echoed back by the provider are kept verbatim, since they are forwarded to
/// verification exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentReference(String);

impl PaymentReference {
    /// Generate a fresh reference for the given instant.
    ///
    /// Two attempts in the same millisecond get the same reference; double
    /// submission is not guarded against.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!("{REFERENCE_PREFIX}{}", now.timestamp_millis()))
    }

    /// Wrap a reference returned by the provider.
    #[must_use]
    pub fn from_provider(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_generate_uses_unix_millis() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).single();
        let reference = now.map(PaymentReference::generate);
        assert_eq!(
            reference.as_ref().map(PaymentReference::as_str),
            Some("ORDER-1700000000123")
        );
    }

    #[test]
    fn test_provider_reference_is_verbatim() {
        let reference = PaymentReference::from_provider("T 1/2&3");
        assert_eq!(reference.to_string(), "T 1/2&3");
    }
}
