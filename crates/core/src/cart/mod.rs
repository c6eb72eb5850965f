//! Cart line items and the pure cart reducer.
//!
//! [`Cart`] is an ordered list of [`LineItem`]s with the four reducer
//! operations (add, set quantity, remove, clear). It knows nothing about
//! persistence or rendering; [`CartStore`] wraps it with both.

mod storage;
mod store;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

pub use storage::{CartStorage, MemoryStorage, STORAGE_KEY, StorageError};
pub use store::{CartListener, CartStore, StoreError};

/// A catalog product as announced by an "add to cart" control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
}

/// One product entry in the cart.
///
/// `qty` is never zero inside a [`Cart`]: reaching zero removes the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub qty: u32,
}

/// Ordered sequence of line items, persisted as one JSON array.
///
/// Deserializing goes through [`Cart::from_items`], so a decoded cart always
/// holds the invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from rows read from storage.
    ///
    /// Rows with a zero quantity are dropped and repeated ids are folded into
    /// their first occurrence.
    #[must_use]
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.qty == 0 {
                continue;
            }
            match cart.items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => existing.qty = existing.qty.saturating_add(item.qty),
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// The line items in display order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The row at `position`, if any.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&LineItem> {
        self.items.get(position)
    }

    /// Position of the row holding `id`.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id.as_str() == id)
    }

    /// Add one unit of `product`: increments an existing row or appends a new
    /// row with quantity 1.
    pub fn add(&mut self, product: Product) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.qty = item.qty.saturating_add(1),
            None => self.items.push(LineItem {
                id: product.id,
                name: product.name,
                price: product.price,
                qty: 1,
            }),
        }
    }

    /// Set the quantity of the row holding `id`.
    ///
    /// The quantity is floored and clamped at zero; zero removes the row.
    /// Returns `false` when no row holds `id`.
    pub fn set_quantity(&mut self, id: &str, qty: f64) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        match clamp_quantity(qty) {
            0 => {
                self.items.remove(position);
            }
            qty => {
                if let Some(item) = self.items.get_mut(position) {
                    item.qty = qty;
                }
            }
        }
        true
    }

    /// Remove the row at `position`. Returns `false` when out of bounds.
    pub fn remove_at(&mut self, position: usize) -> bool {
        if position >= self.items.len() {
            return false;
        }
        self.items.remove(position);
        true
    }

    /// Remove several rows at once.
    ///
    /// Positions are de-duplicated and removed from highest to lowest so
    /// earlier removals never shift later targets. Out-of-range positions are
    /// ignored. Returns `false` when nothing was removed.
    pub fn remove_many(&mut self, positions: &[usize]) -> bool {
        let targets: BTreeSet<usize> = positions
            .iter()
            .copied()
            .filter(|&position| position < self.items.len())
            .collect();
        for &position in targets.iter().rev() {
            self.items.remove(position);
        }
        !targets.is_empty()
    }

    /// Remove every row.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Floor a requested quantity and clamp it into `0..=u32::MAX`.
///
/// NaN and negative values clamp to 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // `as` saturates and maps NaN to 0
pub fn clamp_quantity(qty: f64) -> u32 {
    qty.floor() as u32
}
