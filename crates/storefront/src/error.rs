//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Errors are answered with the same JSON verdict
//! shape as successful verifications, `{"status":"error","message":...}`, so
//! the browser can always parse the body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use simple_cart_core::VerificationResponse;
use thiserror::Error;

use crate::paystack::PaystackError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Paystack could not be reached or answered with garbage.
    #[error("Paystack error: {0}")]
    Paystack(#[from] PaystackError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Paystack(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Paystack(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose upstream error details to clients
        let message = match &self {
            Self::Paystack(_) => "Payment provider unavailable".to_string(),
            Self::BadRequest(message) => message.clone(),
        };

        (status, Json(VerificationResponse::error(message))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
