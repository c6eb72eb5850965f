//! Integration tests for Simple Cart.
//!
//! Every test runs against real HTTP servers on ephemeral ports: a stand-in
//! for the Paystack API, and the storefront verification proxy pointed at it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p simple-cart-integration-tests
//! ```
//!
//! # Mock Paystack answers
//!
//! The stand-in answers `GET /transaction/verify/{reference}` by reference
//! prefix:
//!
//! - `paid...` - `{"status": true, "data": {"status": "success"}}`
//! - `unknown...` - `404 {"status": false, "message": "Transaction reference not found"}`
//! - `garbled...` - a non-JSON body
//! - anything else - `{"status": true, "data": {"status": "abandoned"}}`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{OriginalUri, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use secrecy::SecretString;
use serde_json::json;
use simple_cart_storefront::config::{PaystackConfig, StorefrontConfig};
use simple_cart_storefront::state::AppState;
use tokio::net::TcpListener;
use url::Url;

/// Secret key the storefront under test is configured with.
pub const TEST_SECRET_KEY: &str = "sk_test_4f9Qz7LmN2vR8tKx1bWc";

/// Boxed error for test setup.
pub type SetupError = Box<dyn std::error::Error + Send + Sync>;

/// One request received by the mock Paystack API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Raw request path, still percent-encoded
    pub path: String,
    /// Decoded `{reference}` path segment
    pub reference: String,
    pub authorization: Option<String>,
    pub cache_control: Option<String>,
}

/// Handle to a running mock Paystack API.
#[derive(Debug, Clone)]
pub struct MockPaystack {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockPaystack {
    /// Start the mock on an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> Result<Self, SetupError> {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route("/transaction/verify/{reference}", get(mock_verify))
            .with_state(Arc::clone(&requests));
        let addr = serve(router).await?;
        Ok(Self { addr, requests })
    }

    /// Base URL to configure the proxy with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

async fn mock_verify(
    State(requests): State<Arc<Mutex<Vec<RecordedRequest>>>>,
    Path(reference): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            path: uri.path().to_string(),
            reference: reference.clone(),
            authorization: header_value(header::AUTHORIZATION),
            cache_control: header_value(header::CACHE_CONTROL),
        });

    if reference.starts_with("paid") {
        Json(json!({
            "status": true,
            "message": "Verification successful",
            "data": { "status": "success", "reference": reference }
        }))
        .into_response()
    } else if reference.starts_with("unknown") {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "status": false, "message": "Transaction reference not found" })),
        )
            .into_response()
    } else if reference.starts_with("garbled") {
        (StatusCode::BAD_GATEWAY, "<html>upstream hiccup</html>").into_response()
    } else {
        Json(json!({
            "status": true,
            "message": "Verification successful",
            "data": { "status": "abandoned", "reference": reference }
        }))
        .into_response()
    }
}

/// Storefront configuration pointing at `paystack_base_url`.
///
/// # Errors
///
/// Returns an error if the base URL does not parse.
pub fn storefront_config(paystack_base_url: &str) -> Result<StorefrontConfig, SetupError> {
    Ok(StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        paystack: PaystackConfig {
            secret_key: SecretString::from(TEST_SECRET_KEY.to_string()),
            base_url: Url::parse(paystack_base_url)?,
            timeout: Duration::from_secs(5),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    })
}

/// Start the storefront proxy against `paystack_base_url` and return its base URL.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or no port can be bound.
pub async fn start_storefront(paystack_base_url: &str) -> Result<String, SetupError> {
    let state = AppState::new(storefront_config(paystack_base_url)?)?;
    let addr = serve(simple_cart_storefront::app(state)).await?;
    Ok(format!("http://{addr}"))
}

/// Base URL of a local port with nothing listening on it.
///
/// # Errors
///
/// Returns an error if no local port can be bound.
pub async fn closed_port_url() -> Result<String, SetupError> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

/// `GET /verify-payment` URL for `reference` (omitted when `None`).
///
/// # Errors
///
/// Returns an error if `base_url` does not parse.
pub fn verify_url(base_url: &str, reference: Option<&str>) -> Result<Url, SetupError> {
    let mut url = Url::parse(&format!("{base_url}/verify-payment"))?;
    if let Some(reference) = reference {
        url.query_pairs_mut().append_pair("reference", reference);
    }
    Ok(url)
}

async fn serve(router: Router) -> Result<SocketAddr, SetupError> {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(addr)
}
