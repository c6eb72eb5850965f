//! Payment verification route.
//!
//! The browser never sees the Paystack secret key. After the payment widget
//! reports a completed payment, the checkout page calls this endpoint with the
//! reference, and the proxy asks Paystack whether it was really paid.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use simple_cart_core::{VerificationResponse, VerificationStatus};
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters of `GET /verify-payment`.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub reference: Option<String>,
}

/// Verify a transaction by reference.
///
/// - Missing or empty `reference` → `400 {"status":"error","message":"No reference supplied"}`
/// - Paystack says `data.status == "success"` → `200 {"status":"success"}`
/// - Any other Paystack answer → `200 {"status":"failed"}`
/// - Paystack unreachable or not JSON → `502 {"status":"error",...}`
#[instrument(skip(state, query), fields(reference))]
pub async fn verify_payment(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerificationResponse>> {
    let reference = query
        .reference
        .filter(|reference| !reference.is_empty())
        .ok_or_else(|| AppError::BadRequest("No reference supplied".to_string()))?;
    tracing::Span::current().record("reference", reference.as_str());

    let verdict = state.paystack().verify_transaction(&reference).await?;
    info!(verdict = ?verdict, "Payment verification finished");

    Ok(Json(match verdict {
        VerificationStatus::Success => VerificationResponse::success(),
        VerificationStatus::Failed | VerificationStatus::Error => VerificationResponse::failed(),
    }))
}
