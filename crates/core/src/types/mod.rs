//! Core types for Simple Cart.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod reference;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{ProductId, ProductIdError};
pub use price::{CurrencyCode, CurrencyCodeError, MoneyFormat, Price, PriceError, format_money};
pub use reference::PaymentReference;
pub use status::{VerificationResponse, VerificationStatus};
