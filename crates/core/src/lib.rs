//! Simple Cart Core - cart state, totals, view model and checkout.
//!
//! This crate holds everything a storefront front end needs to run a cart
//! that lives entirely on the client. It is used by:
//! - `cli` - Terminal front end (file-backed record storage)
//! - `integration-tests` - End-to-end checkout against the `storefront` proxy
//!
//! # Architecture
//!
//! The core performs no file or network I/O of its own. Persistence goes
//! through the [`cart::CartStorage`] trait, rendering produces plain view-model
//! structs, and checkout talks to the payment widget and the verification
//! proxy through traits. UI layers are thin adapters over these seams.
//!
//! # Modules
//!
//! - [`types`] - Newtypes for prices, currencies, product ids, emails and payment references
//! - [`cart`] - Line items, the cart store and its storage seam
//! - [`totals`] - Subtotal, grand total and minor-unit conversion
//! - [`view`] - Surface descriptors, rendering, synchronization and event delegation
//! - [`checkout`] - Checkout bridge between the cart, the payment widget and verification

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod totals;
pub mod types;
pub mod view;

pub use cart::{Cart, CartStore, LineItem, Product};
pub use types::*;
