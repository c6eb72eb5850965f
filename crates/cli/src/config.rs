//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `CART_DATA_DIR` - Directory holding the cart record (default: .simple-cart)
//! - `CART_VERIFY_URL` - Verification proxy endpoint (default: <http://127.0.0.1:3000/verify-payment>)
//! - `PAYSTACK_PUBLIC_KEY` - Paystack public key, required for `checkout`
//! - `CART_CURRENCY` - Currency code (default: NGN)
//! - `CART_DELIVERY_FEE` - Delivery fee added at checkout (default: 500)

use std::path::PathBuf;

use rust_decimal::Decimal;
use simple_cart_core::CurrencyCode;
use simple_cart_core::view::CHECKOUT_DELIVERY_FEE;

use crate::error::CliError;

const DEFAULT_DATA_DIR: &str = ".simple-cart";
const DEFAULT_VERIFY_URL: &str = "http://127.0.0.1:3000/verify-payment";

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory of the file-backed record store
    pub data_dir: PathBuf,
    /// Verification proxy endpoint
    pub verify_url: String,
    /// Paystack public key (publishable, not a secret)
    pub public_key: Option<String>,
    pub currency: CurrencyCode,
    pub delivery_fee: Decimal,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but invalid.
    pub fn from_env() -> Result<Self, CliError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let currency = match get("CART_CURRENCY") {
            Some(raw) => raw
                .parse::<CurrencyCode>()
                .map_err(|e| CliError::InvalidEnvVar("CART_CURRENCY", e.to_string()))?,
            None => CurrencyCode::default(),
        };

        let delivery_fee = match get("CART_DELIVERY_FEE") {
            Some(raw) => raw
                .trim()
                .parse::<Decimal>()
                .ok()
                .filter(|fee| !fee.is_sign_negative())
                .ok_or_else(|| {
                    CliError::InvalidEnvVar(
                        "CART_DELIVERY_FEE",
                        format!("'{raw}' is not a non-negative amount"),
                    )
                })?,
            None => CHECKOUT_DELIVERY_FEE,
        };

        Ok(Self {
            data_dir: get("CART_DATA_DIR").map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            verify_url: get("CART_VERIFY_URL").unwrap_or_else(|| DEFAULT_VERIFY_URL.to_string()),
            public_key: get("PAYSTACK_PUBLIC_KEY"),
            currency,
            delivery_fee,
        })
    }

    /// The public key, required before a payment widget can be opened.
    ///
    /// # Errors
    ///
    /// Returns an error if `PAYSTACK_PUBLIC_KEY` is not set.
    pub fn require_public_key(&self) -> Result<&str, CliError> {
        self.public_key
            .as_deref()
            .ok_or(CliError::MissingEnvVar("PAYSTACK_PUBLIC_KEY"))
    }
}
