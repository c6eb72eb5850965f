//! `GET /verify-payment` against the mock Paystack API.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use simple_cart_integration_tests::{
    MockPaystack, TEST_SECRET_KEY, closed_port_url, start_storefront, verify_url,
};

async fn get_json(url: reqwest::Url) -> (StatusCode, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_successful_payment() {
    let paystack = MockPaystack::start().await.unwrap();
    let storefront = start_storefront(&paystack.base_url()).await.unwrap();

    let (status, body) = get_json(verify_url(&storefront, Some("paid-ORDER-1")).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success" }));
    assert_eq!(paystack.requests().len(), 1);
}

#[tokio::test]
async fn test_upstream_request_shape() {
    let paystack = MockPaystack::start().await.unwrap();
    let storefront = start_storefront(&paystack.base_url()).await.unwrap();

    get_json(verify_url(&storefront, Some("paid-ORDER-1")).unwrap()).await;

    let requests = paystack.requests();
    let request = requests.first().unwrap();
    assert_eq!(request.path, "/transaction/verify/paid-ORDER-1");
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {TEST_SECRET_KEY}").as_str())
    );
    assert_eq!(request.cache_control.as_deref(), Some("no-cache"));
}

#[tokio::test]
async fn test_reference_is_one_encoded_path_segment() {
    let paystack = MockPaystack::start().await.unwrap();
    let storefront = start_storefront(&paystack.base_url()).await.unwrap();

    let (status, body) = get_json(verify_url(&storefront, Some("paid/a b&c")).unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let requests = paystack.requests();
    let request = requests.first().unwrap();
    assert_eq!(request.path, "/transaction/verify/paid%2Fa%20b%26c");
    assert_eq!(request.reference, "paid/a b&c");
}

#[tokio::test]
async fn test_unsuccessful_payment_is_failed() {
    let paystack = MockPaystack::start().await.unwrap();
    let storefront = start_storefront(&paystack.base_url()).await.unwrap();

    let (status, body) = get_json(verify_url(&storefront, Some("ORDER-2")).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "failed" }));

    // A JSON error answer from Paystack is still a verdict
    let (status, body) = get_json(verify_url(&storefront, Some("unknown-3")).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "failed" }));
}

#[tokio::test]
async fn test_missing_reference_is_rejected_without_upstream_call() {
    let paystack = MockPaystack::start().await.unwrap();
    let storefront = start_storefront(&paystack.base_url()).await.unwrap();

    for url in [
        verify_url(&storefront, None).unwrap(),
        verify_url(&storefront, Some("")).unwrap(),
    ] {
        let (status, body) = get_json(url).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "status": "error", "message": "No reference supplied" })
        );
    }
    assert!(paystack.requests().is_empty());
}

#[tokio::test]
async fn test_non_json_upstream_is_bad_gateway() {
    let paystack = MockPaystack::start().await.unwrap();
    let storefront = start_storefront(&paystack.base_url()).await.unwrap();

    let (status, body) = get_json(verify_url(&storefront, Some("garbled-1")).unwrap()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body,
        json!({ "status": "error", "message": "Payment provider unavailable" })
    );
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let storefront = start_storefront(&closed_port_url().await.unwrap())
        .await
        .unwrap();

    let (status, body) = get_json(verify_url(&storefront, Some("paid-1")).unwrap()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "error");
    // The secret key never leaks into responses
    assert!(!body.to_string().contains(TEST_SECRET_KEY));
}

#[tokio::test]
async fn test_health_and_headers() {
    let paystack = MockPaystack::start().await.unwrap();
    let storefront = start_storefront(&paystack.base_url()).await.unwrap();

    let response = reqwest::get(format!("{storefront}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["cache-control"], "no-store, max-age=0");
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "ok");
    assert!(paystack.requests().is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let paystack = MockPaystack::start().await.unwrap();
    let storefront = start_storefront(&paystack.base_url()).await.unwrap();

    let response = reqwest::Client::new()
        .get(format!("{storefront}/health"))
        .header("x-request-id", "checkout-trace-7")
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "checkout-trace-7");
}
