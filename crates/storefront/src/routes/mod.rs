//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /verify-payment?reference=...  - Verify a Paystack transaction
//! ```

pub mod verify;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/verify-payment", get(verify::verify_payment))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not contact Paystack.
async fn health() -> &'static str {
    "ok"
}
