//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::paystack::{PaystackClient, PaystackError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The proxy keeps no per-request
/// state; handlers only read the configuration and use the Paystack client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    paystack: PaystackClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Paystack client cannot be built from the configuration.
    pub fn new(config: StorefrontConfig) -> Result<Self, PaystackError> {
        let paystack = PaystackClient::new(&config.paystack)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, paystack }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Paystack API client.
    #[must_use]
    pub fn paystack(&self) -> &PaystackClient {
        &self.inner.paystack
    }
}
