//! Checkout bridge end to end: widget, HTTP verification through the proxy,
//! and the cart afterwards.

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use simple_cart_core::cart::{MemoryStorage, STORAGE_KEY};
use simple_cart_core::checkout::{
    CheckoutBridge, CheckoutConfig, CheckoutError, CheckoutForm, CheckoutOutcome,
    HttpVerificationClient, PaymentRequest, PaymentWidget, WidgetOutcome,
};
use simple_cart_core::{CartStore, PaymentReference, Price, Product, ProductId};
use simple_cart_integration_tests::{MockPaystack, closed_port_url, start_storefront};

/// Widget that reports a completed payment under a fixed provider reference.
struct PaidWidget(&'static str);

#[async_trait]
impl PaymentWidget for PaidWidget {
    async fn open(&self, _request: &PaymentRequest) -> Result<WidgetOutcome, CheckoutError> {
        Ok(WidgetOutcome::Completed {
            reference: PaymentReference::from_provider(self.0),
        })
    }
}

fn stocked_store() -> CartStore<MemoryStorage> {
    let mut store = CartStore::open(MemoryStorage::new());
    for (id, name, price) in [("bag", "Tote Bag", 2500), ("mug", "Mug", 1200)] {
        store
            .add(Product {
                id: ProductId::parse(id).unwrap(),
                name: name.to_string(),
                price: Price::new(Decimal::new(price, 0)).unwrap(),
            })
            .unwrap();
    }
    store
}

fn form() -> CheckoutForm {
    CheckoutForm {
        first_name: "Ada".to_string(),
        last_name: "Obi".to_string(),
        email: "ada@example.com".to_string(),
        phone: String::new(),
    }
}

async fn checkout(
    verify_endpoint: &str,
    provider_reference: &'static str,
    store: &mut CartStore<MemoryStorage>,
) -> CheckoutOutcome {
    let bridge = CheckoutBridge::new(
        CheckoutConfig::new("pk_test_integration"),
        PaidWidget(provider_reference),
        HttpVerificationClient::new(verify_endpoint).unwrap(),
    );
    let now = Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap();
    bridge.place_order(store, &form(), now).await.unwrap()
}

#[tokio::test]
async fn test_verified_payment_clears_cart() {
    let paystack = MockPaystack::start().await.unwrap();
    let storefront = start_storefront(&paystack.base_url()).await.unwrap();
    let mut store = stocked_store();

    let outcome = checkout(&format!("{storefront}/verify-payment"), "paid-T1", &mut store).await;

    assert_eq!(
        outcome,
        CheckoutOutcome::Confirmed {
            reference: PaymentReference::from_provider("paid-T1"),
        }
    );
    assert!(store.cart().is_empty());
    assert_eq!(store.storage().record(STORAGE_KEY), Some("[]"));

    // The provider's reference is the one verified, not the generated one
    let requests = paystack.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests.first().unwrap().reference, "paid-T1");
}

#[tokio::test]
async fn test_failed_payment_keeps_cart() {
    let paystack = MockPaystack::start().await.unwrap();
    let storefront = start_storefront(&paystack.base_url()).await.unwrap();
    let mut store = stocked_store();
    let before = store.cart().clone();

    let outcome = checkout(&format!("{storefront}/verify-payment"), "T2", &mut store).await;

    assert!(matches!(outcome, CheckoutOutcome::NotVerified { .. }));
    assert_eq!(
        outcome.notice(),
        Some("Payment could not be verified. Please contact support.")
    );
    assert_eq!(store.cart(), &before);
}

#[tokio::test]
async fn test_provider_outage_is_not_verified() {
    let paystack = MockPaystack::start().await.unwrap();
    let storefront = start_storefront(&paystack.base_url()).await.unwrap();
    let mut store = stocked_store();

    let outcome = checkout(&format!("{storefront}/verify-payment"), "garbled-T3", &mut store).await;

    match outcome {
        CheckoutOutcome::NotVerified { message, .. } => {
            assert_eq!(message.as_deref(), Some("Payment provider unavailable"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(store.cart().len(), 2);
}

#[tokio::test]
async fn test_unreachable_proxy_is_network_error() {
    let proxy = closed_port_url().await.unwrap();
    let mut store = stocked_store();

    let outcome = checkout(&format!("{proxy}/verify-payment"), "paid-T4", &mut store).await;

    assert_eq!(
        outcome,
        CheckoutOutcome::NetworkError {
            reference: PaymentReference::from_provider("paid-T4"),
        }
    );
    assert_eq!(outcome.notice(), Some("Network error verifying payment."));
    assert_eq!(store.cart().len(), 2);
}
