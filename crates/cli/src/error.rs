//! CLI error type.

use simple_cart_core::checkout::{CheckoutError, VerificationError};
use simple_cart_core::cart::StoreError;
use simple_cart_core::view::ActionParseError;
use simple_cart_core::{PriceError, ProductIdError};
use thiserror::Error;

/// Errors that end a CLI command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Environment variable is set but unusable.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),

    #[error("Invalid product id: {0}")]
    ProductId(#[from] ProductIdError),

    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    #[error("Invalid cart action: {0}")]
    Action(#[from] ActionParseError),

    /// A row number that is not in the cart.
    #[error("No row {0} in the cart")]
    NoSuchRow(usize),

    /// Cart could not be saved; the record on disk is unchanged.
    #[error("Cart error: {0}")]
    Store(#[from] StoreError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Verification client error: {0}")]
    Verification(#[from] VerificationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
