//! Checkout bridge.
//!
//! Turns the cart into a payment request, hands it to the hosted payment
//! widget and confirms the result through the verification proxy. The cart is
//! only cleared once the proxy reports success; every other outcome leaves
//! it untouched so the customer can try again.
//!
//! The widget and the proxy are reached through the [`PaymentWidget`] and
//! [`VerificationClient`] traits. With the `http-client` feature,
//! [`HttpVerificationClient`] implements the latter over HTTP.

#[cfg(feature = "http-client")]
mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cart::{CartStorage, CartStore, LineItem, StoreError};
use crate::totals::{AmountError, grand_total, to_minor_units};
use crate::types::{CurrencyCode, Email, EmailError, PaymentReference, VerificationResponse};
use crate::view::CHECKOUT_DELIVERY_FEE;

#[cfg(feature = "http-client")]
pub use http::HttpVerificationClient;

/// Errors that abort a checkout attempt.
///
/// Customer-facing outcomes (cancelled, not verified, ...) are not errors;
/// they are reported through [`CheckoutOutcome`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The total cannot be expressed as a provider amount.
    #[error("invalid checkout amount: {0}")]
    Amount(#[from] AmountError),

    /// Clearing the cart after a verified payment failed.
    #[error("failed to clear cart: {0}")]
    Store(#[from] StoreError),

    /// The payment widget itself failed.
    #[error("payment widget failed: {0}")]
    Widget(String),
}

/// Errors reaching the verification proxy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// The request never produced a response.
    #[error("verification request failed: {0}")]
    Transport(String),

    /// The response body was not a verification verdict.
    #[error("invalid verification response: {0}")]
    Decode(String),
}

/// Values typed into the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl CheckoutForm {
    /// `"first last"`, trimmed.
    #[must_use]
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Settings of the payment integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Publishable key of the payment provider.
    pub public_key: String,
    pub currency: CurrencyCode,
    pub delivery_fee: Decimal,
}

impl CheckoutConfig {
    /// Configuration with the default currency and checkout delivery fee.
    #[must_use]
    pub fn new(public_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            currency: CurrencyCode::default(),
            delivery_fee: CHECKOUT_DELIVERY_FEE,
        }
    }
}

/// Metadata attached to a payment for the merchant dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMetadata {
    pub cart: Vec<LineItem>,
    pub customer_name: String,
    pub phone: String,
}

/// What the payment widget is opened with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    pub key: String,
    pub email: Email,
    /// Grand total in minor units (kobo for NGN).
    pub amount: u64,
    pub currency: &'static str,
    #[serde(rename = "ref")]
    pub reference: PaymentReference,
    pub metadata: PaymentMetadata,
}

/// How the customer left the payment widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOutcome {
    /// The widget reported a completed payment under this reference.
    Completed { reference: PaymentReference },
    /// The customer closed the widget.
    Closed,
}

/// Hosted payment widget.
#[async_trait]
pub trait PaymentWidget: Send + Sync {
    /// Show the widget and wait until the customer completes or closes it.
    async fn open(&self, request: &PaymentRequest) -> Result<WidgetOutcome, CheckoutError>;
}

/// Client of the server-side verification proxy.
#[async_trait]
pub trait VerificationClient: Send + Sync {
    /// Ask the proxy whether `reference` was paid. Called exactly once per payment.
    async fn verify(
        &self,
        reference: &PaymentReference,
    ) -> Result<VerificationResponse, VerificationError>;
}

/// Result of one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to pay for; aborted silently.
    EmptyCart,
    MissingEmail,
    InvalidEmail,
    /// The widget was closed before paying.
    Cancelled,
    /// Payment verified and the cart cleared.
    Confirmed { reference: PaymentReference },
    /// The proxy did not confirm the payment.
    NotVerified {
        reference: PaymentReference,
        message: Option<String>,
    },
    /// The proxy could not be reached.
    NetworkError { reference: PaymentReference },
}

impl CheckoutOutcome {
    /// Blocking message to show the customer, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        match self {
            Self::EmptyCart | Self::Confirmed { .. } => None,
            Self::MissingEmail => Some("Please enter your email before continuing."),
            Self::InvalidEmail => Some("Please enter a valid email address."),
            Self::Cancelled => Some("Payment window closed."),
            Self::NotVerified { .. } => {
                Some("Payment could not be verified. Please contact support.")
            }
            Self::NetworkError { .. } => Some("Network error verifying payment."),
        }
    }

    /// Whether the adapter should move on to the confirmation view.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// Connects the cart store to a payment widget and a verification client.
#[derive(Debug)]
pub struct CheckoutBridge<W, V> {
    config: CheckoutConfig,
    widget: W,
    verifier: V,
}

impl<W: PaymentWidget, V: VerificationClient> CheckoutBridge<W, V> {
    #[must_use]
    pub const fn new(config: CheckoutConfig, widget: W, verifier: V) -> Self {
        Self {
            config,
            widget,
            verifier,
        }
    }

    /// The integration settings.
    #[must_use]
    pub const fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// Build the widget request for the current cart.
    ///
    /// Returns `Ok(Err(outcome))` when the attempt stops before the widget
    /// opens (empty cart, missing or malformed email).
    ///
    /// # Errors
    ///
    /// Returns an error if the total cannot be converted to minor units.
    pub fn prepare<S: CartStorage>(
        &self,
        store: &CartStore<S>,
        form: &CheckoutForm,
        now: DateTime<Utc>,
    ) -> Result<Result<PaymentRequest, CheckoutOutcome>, CheckoutError> {
        let cart = store.cart();
        if cart.is_empty() {
            return Ok(Err(CheckoutOutcome::EmptyCart));
        }

        let email = match Email::parse(&form.email) {
            Ok(email) => email,
            Err(EmailError::Empty) => return Ok(Err(CheckoutOutcome::MissingEmail)),
            Err(_) => return Ok(Err(CheckoutOutcome::InvalidEmail)),
        };

        let total = grand_total(cart, self.config.delivery_fee);
        let amount = to_minor_units(total, self.config.currency)?;

        Ok(Ok(PaymentRequest {
            key: self.config.public_key.clone(),
            email,
            amount,
            currency: self.config.currency.code(),
            reference: PaymentReference::generate(now),
            metadata: PaymentMetadata {
                cart: cart.items().to_vec(),
                customer_name: form.customer_name(),
                phone: form.phone.trim().to_string(),
            },
        }))
    }

    /// Run one checkout attempt: widget, then verification.
    ///
    /// The cart is cleared only when the proxy answers `success`.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is invalid, the widget fails, or the
    /// cart cannot be cleared after a verified payment.
    #[instrument(skip(self, store, form), fields(items = store.cart().len()))]
    pub async fn place_order<S: CartStorage>(
        &self,
        store: &mut CartStore<S>,
        form: &CheckoutForm,
        now: DateTime<Utc>,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let request = match self.prepare(store, form, now)? {
            Ok(request) => request,
            Err(outcome) => return Ok(outcome),
        };
        info!(
            reference = %request.reference,
            amount = request.amount,
            currency = request.currency,
            "Opening payment widget"
        );

        let reference = match self.widget.open(&request).await? {
            WidgetOutcome::Completed { reference } => reference,
            WidgetOutcome::Closed => {
                info!(reference = %request.reference, "Payment window closed");
                return Ok(CheckoutOutcome::Cancelled);
            }
        };

        match self.verifier.verify(&reference).await {
            Ok(response) if response.is_success() => {
                store.clear()?;
                info!(reference = %reference, "Payment verified");
                Ok(CheckoutOutcome::Confirmed { reference })
            }
            Ok(response) => {
                warn!(
                    reference = %reference,
                    status = ?response.status,
                    message = ?response.message,
                    "Payment not verified"
                );
                Ok(CheckoutOutcome::NotVerified {
                    reference,
                    message: response.message,
                })
            }
            Err(e) => {
                warn!(reference = %reference, error = %e, "Verification request failed");
                Ok(CheckoutOutcome::NetworkError { reference })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;

    use super::*;
    use crate::cart::{MemoryStorage, Product, STORAGE_KEY};
    use crate::types::{Price, ProductId, VerificationStatus};

    struct ScriptedWidget {
        outcome: WidgetOutcome,
        seen: Mutex<Vec<PaymentRequest>>,
    }

    impl ScriptedWidget {
        fn completing() -> Self {
            Self {
                outcome: WidgetOutcome::Completed {
                    reference: PaymentReference::from_provider("T-provider-1"),
                },
                seen: Mutex::new(Vec::new()),
            }
        }

        fn closing() -> Self {
            Self {
                outcome: WidgetOutcome::Closed,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PaymentWidget for ScriptedWidget {
        async fn open(&self, request: &PaymentRequest) -> Result<WidgetOutcome, CheckoutError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.outcome.clone())
        }
    }

    struct ScriptedVerifier {
        answer: Result<VerificationResponse, VerificationError>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedVerifier {
        fn answering(answer: Result<VerificationResponse, VerificationError>) -> Self {
            Self {
                answer,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VerificationClient for ScriptedVerifier {
        async fn verify(
            &self,
            reference: &PaymentReference,
        ) -> Result<VerificationResponse, VerificationError> {
            self.calls.lock().unwrap().push(reference.to_string());
            self.answer.clone()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap()
    }

    fn form(email: &str) -> CheckoutForm {
        CheckoutForm {
            first_name: " Ada ".to_string(),
            last_name: "Obi".to_string(),
            email: email.to_string(),
            phone: "0801 234 5678".to_string(),
        }
    }

    fn stocked_store() -> CartStore<MemoryStorage> {
        let mut store = CartStore::open(MemoryStorage::new());
        store
            .add(Product {
                id: ProductId::parse("bag").unwrap(),
                name: "Tote Bag".to_string(),
                price: Price::new(Decimal::new(2500, 0)).unwrap(),
            })
            .unwrap();
        store
    }

    fn bridge(
        widget: ScriptedWidget,
        verifier: ScriptedVerifier,
    ) -> CheckoutBridge<ScriptedWidget, ScriptedVerifier> {
        CheckoutBridge::new(CheckoutConfig::new("pk_test_configured"), widget, verifier)
    }

    #[tokio::test]
    async fn test_verified_payment_clears_cart() {
        let bridge = bridge(
            ScriptedWidget::completing(),
            ScriptedVerifier::answering(Ok(VerificationResponse::success())),
        );
        let mut store = stocked_store();

        let outcome = bridge
            .place_order(&mut store, &form("ada@example.com"), now())
            .await
            .unwrap();

        assert!(outcome.is_confirmed());
        assert!(outcome.notice().is_none());
        assert!(store.cart().is_empty());
        assert_eq!(store.storage().record(STORAGE_KEY), Some("[]"));
        assert_eq!(*bridge.verifier.calls.lock().unwrap(), vec!["T-provider-1"]);
    }

    #[tokio::test]
    async fn test_request_fields() {
        let bridge = bridge(
            ScriptedWidget::completing(),
            ScriptedVerifier::answering(Ok(VerificationResponse::success())),
        );
        let mut store = stocked_store();
        bridge
            .place_order(&mut store, &form(" ada@example.com "), now())
            .await
            .unwrap();

        let seen = bridge.widget.seen.lock().unwrap();
        let request = seen.first().unwrap();
        assert_eq!(request.key, "pk_test_configured");
        assert_eq!(request.email.as_str(), "ada@example.com");
        assert_eq!(request.amount, 300_000);
        assert_eq!(request.currency, "NGN");
        assert_eq!(request.reference.as_str(), "ORDER-1700000000000");
        assert_eq!(request.metadata.customer_name, "Ada Obi");
        assert_eq!(request.metadata.cart.len(), 1);

        let json = serde_json::to_value(request).unwrap();
        assert_eq!(json["ref"], "ORDER-1700000000000");
        assert_eq!(json["metadata"]["phone"], "0801 234 5678");
    }

    #[tokio::test]
    async fn test_closed_widget_keeps_cart() {
        let bridge = bridge(
            ScriptedWidget::closing(),
            ScriptedVerifier::answering(Ok(VerificationResponse::success())),
        );
        let mut store = stocked_store();
        let outcome = bridge
            .place_order(&mut store, &form("ada@example.com"), now())
            .await
            .unwrap();

        assert_eq!(outcome, CheckoutOutcome::Cancelled);
        assert_eq!(outcome.notice(), Some("Payment window closed."));
        assert_eq!(store.cart().len(), 1);
        assert!(bridge.verifier.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_verdict_keeps_cart() {
        let bridge = bridge(
            ScriptedWidget::completing(),
            ScriptedVerifier::answering(Ok(VerificationResponse::failed())),
        );
        let mut store = stocked_store();
        let outcome = bridge
            .place_order(&mut store, &form("ada@example.com"), now())
            .await
            .unwrap();

        assert!(matches!(outcome, CheckoutOutcome::NotVerified { .. }));
        assert_eq!(
            outcome.notice(),
            Some("Payment could not be verified. Please contact support.")
        );
        assert_eq!(store.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_error_verdict_is_not_verified() {
        let bridge = bridge(
            ScriptedWidget::completing(),
            ScriptedVerifier::answering(Ok(VerificationResponse {
                status: VerificationStatus::Error,
                message: Some("Payment provider unavailable".to_string()),
            })),
        );
        let mut store = stocked_store();
        let outcome = bridge
            .place_order(&mut store, &form("ada@example.com"), now())
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            CheckoutOutcome::NotVerified { message: Some(_), .. }
        ));
        assert_eq!(store.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_network_error_keeps_cart() {
        let bridge = bridge(
            ScriptedWidget::completing(),
            ScriptedVerifier::answering(Err(VerificationError::Transport(
                "connection refused".to_string(),
            ))),
        );
        let mut store = stocked_store();
        let outcome = bridge
            .place_order(&mut store, &form("ada@example.com"), now())
            .await
            .unwrap();

        assert!(matches!(outcome, CheckoutOutcome::NetworkError { .. }));
        assert_eq!(outcome.notice(), Some("Network error verifying payment."));
        assert_eq!(store.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_guards_run_before_widget() {
        let bridge = bridge(
            ScriptedWidget::completing(),
            ScriptedVerifier::answering(Ok(VerificationResponse::success())),
        );

        let mut empty = CartStore::open(MemoryStorage::new());
        let outcome = bridge
            .place_order(&mut empty, &form("ada@example.com"), now())
            .await
            .unwrap();
        assert_eq!(outcome, CheckoutOutcome::EmptyCart);
        assert!(outcome.notice().is_none());

        let mut store = stocked_store();
        let outcome = bridge
            .place_order(&mut store, &form("   "), now())
            .await
            .unwrap();
        assert_eq!(
            outcome.notice(),
            Some("Please enter your email before continuing.")
        );

        let outcome = bridge
            .place_order(&mut store, &form("not-an-email"), now())
            .await
            .unwrap();
        assert_eq!(outcome, CheckoutOutcome::InvalidEmail);

        assert!(bridge.widget.seen.lock().unwrap().is_empty());
        assert_eq!(store.cart().len(), 1);
    }

    #[test]
    fn test_customer_name_trims() {
        let form = CheckoutForm {
            first_name: "Ada".to_string(),
            ..CheckoutForm::default()
        };
        assert_eq!(form.customer_name(), "Ada");
    }
}
