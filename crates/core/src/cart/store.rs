//! The cart store.
//!
//! Owns the canonical [`Cart`], writes it to [`CartStorage`] on every
//! mutation and then notifies registered [`CartListener`]s. Mutations are
//! applied to a candidate copy first; memory is only updated once the write
//! succeeded, so storage and memory never disagree.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

use super::storage::{CartStorage, STORAGE_KEY, StorageError};
use super::{Cart, LineItem, Product};

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The cart could not be encoded.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The storage backend rejected the write; the cart is unchanged.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),
}

/// Receives a snapshot of the cart after every committed change.
pub trait CartListener {
    /// Called with the new cart after it has been persisted.
    fn cart_changed(&mut self, cart: &Cart);
}

/// Shared listeners, so the caller keeps a handle after subscribing.
impl<L: CartListener> CartListener for Arc<Mutex<L>> {
    fn cart_changed(&mut self, cart: &Cart) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cart_changed(cart);
    }
}

/// Owner of the cart and its persisted record.
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
    listeners: Vec<Box<dyn CartListener + Send>>,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the store, loading whatever cart `storage` holds.
    pub fn open(mut storage: S) -> Self {
        let cart = Self::load(&mut storage);
        Self {
            storage,
            cart,
            listeners: Vec::new(),
        }
    }

    /// Read the persisted cart.
    ///
    /// Never fails: a missing record is an empty cart, and an unreadable or
    /// malformed record is logged, deleted, and treated as an empty cart.
    /// Records that break the cart invariants (zero quantities, repeated ids)
    /// are normalized and written back.
    pub fn load(storage: &mut S) -> Cart {
        let raw = match storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read cart record, starting empty");
                return Cart::new();
            }
        };

        let items = match serde_json::from_str::<Option<Vec<LineItem>>>(&raw) {
            Ok(items) => items.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Invalid cart data; clearing");
                if let Err(e) = storage.remove(STORAGE_KEY) {
                    warn!(error = %e, "Failed to clear invalid cart record");
                }
                return Cart::new();
            }
        };

        let cart = Cart::from_items(items.clone());
        if cart.items() != items.as_slice() {
            debug!(
                stored_rows = items.len(),
                kept_rows = cart.len(),
                "Normalized stored cart"
            );
            if let Err(e) = persist(storage, &cart) {
                warn!(error = %e, "Failed to write normalized cart");
            }
        }
        cart
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The storage backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Register a listener and render it once with the current cart.
    pub fn subscribe(&mut self, mut listener: Box<dyn CartListener + Send>) {
        listener.cart_changed(&self.cart);
        self.listeners.push(listener);
    }

    /// Re-notify every listener without changing the cart.
    pub fn refresh(&mut self) {
        for listener in &mut self.listeners {
            listener.cart_changed(&self.cart);
        }
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted; the cart is then unchanged.
    pub fn add(&mut self, product: Product) -> Result<(), StoreError> {
        self.commit("add", |cart| {
            cart.add(product);
            true
        })
    }

    /// Set the quantity of the row holding `id` (floored, clamped at 0; 0 removes).
    ///
    /// Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted; the cart is then unchanged.
    pub fn set_quantity(&mut self, id: &str, qty: f64) -> Result<(), StoreError> {
        self.commit("set_quantity", |cart| cart.set_quantity(id, qty))
    }

    /// Remove the row at `position`; out-of-range positions are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted; the cart is then unchanged.
    pub fn remove_at(&mut self, position: usize) -> Result<(), StoreError> {
        self.commit("remove_at", |cart| cart.remove_at(position))
    }

    /// Remove several rows in one write and one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted; the cart is then unchanged.
    pub fn remove_many(&mut self, positions: &[usize]) -> Result<(), StoreError> {
        self.commit("remove_many", |cart| cart.remove_many(positions))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted; the cart is then unchanged.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.commit("clear", |cart| {
            cart.clear();
            true
        })
    }

    fn commit<F>(&mut self, operation: &'static str, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Cart) -> bool,
    {
        let mut next = self.cart.clone();
        if !mutate(&mut next) {
            debug!(operation, "Cart operation was a no-op");
            return Ok(());
        }

        persist(&mut self.storage, &next)?;
        self.cart = next;
        debug!(operation, rows = self.cart.len(), "Cart updated");

        self.refresh();
        Ok(())
    }
}

impl<S> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

fn persist<S: CartStorage>(storage: &mut S, cart: &Cart) -> Result<(), StoreError> {
    let json = serde_json::to_string(cart)?;
    storage.set(STORAGE_KEY, &json)?;
    Ok(())
}
