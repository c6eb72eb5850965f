//! Event delegation.
//!
//! Row controls are not bound one by one. Each carries a `data-action` and a
//! `data-index`, and a single handler per surface container turns the
//! clicked element's dataset into a [`CartAction`], which [`dispatch`]
//! applies to the store.

use thiserror::Error;
use tracing::debug;

use crate::cart::{CartStorage, CartStore, StoreError};

/// Errors turning a dataset into an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    /// The element has no `data-action`.
    #[error("element has no action")]
    MissingAction,
    /// The `data-action` value is not a known action.
    #[error("unknown action: {0}")]
    UnknownAction(String),
    /// A row action without a `data-index`.
    #[error("action '{0}' needs a row index")]
    MissingIndex(String),
    /// The `data-index` is not a row position.
    #[error("invalid row index: {0}")]
    InvalidIndex(String),
}

/// `data-*` attributes of the element an event came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dataset<'a> {
    pub action: Option<&'a str>,
    pub index: Option<&'a str>,
    /// Current value of the element (quantity inputs).
    pub value: Option<&'a str>,
}

/// A user intent against the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Increase { index: usize },
    /// Never removes the row; stops at 1.
    Decrease { index: usize },
    /// Raw text from a quantity input.
    SetQuantity { index: usize, value: String },
    Remove { index: usize },
    RemoveSelected { positions: Vec<usize> },
    Clear,
}

impl CartAction {
    /// Parse the dataset of a delegated event.
    ///
    /// `"remove-selected"` is not accepted here; it depends on the surface's
    /// selection and is built by the synchronizer.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing or unknown action, or a missing or
    /// non-numeric index on a row action.
    pub fn from_dataset(dataset: &Dataset<'_>) -> Result<Self, ActionParseError> {
        let action = dataset.action.ok_or(ActionParseError::MissingAction)?;
        match action {
            "increase" => Ok(Self::Increase {
                index: row_index(action, dataset.index)?,
            }),
            "decrease" => Ok(Self::Decrease {
                index: row_index(action, dataset.index)?,
            }),
            "set-quantity" => Ok(Self::SetQuantity {
                index: row_index(action, dataset.index)?,
                value: dataset.value.unwrap_or_default().to_string(),
            }),
            "remove" => Ok(Self::Remove {
                index: row_index(action, dataset.index)?,
            }),
            "clear" => Ok(Self::Clear),
            other => Err(ActionParseError::UnknownAction(other.to_string())),
        }
    }
}

fn row_index(action: &str, raw: Option<&str>) -> Result<usize, ActionParseError> {
    let raw = raw.ok_or_else(|| ActionParseError::MissingIndex(action.to_string()))?;
    raw.trim()
        .parse()
        .map_err(|_| ActionParseError::InvalidIndex(raw.to_string()))
}

/// Read a quantity input. Empty input means 1; anything unparsable is `None`.
#[must_use]
pub fn parse_quantity_input(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(1.0);
    }
    raw.parse::<f64>().ok().filter(|qty| qty.is_finite())
}

/// Apply `action` to the store.
///
/// Row positions that no longer exist and unparsable quantity input are
/// ignored.
///
/// # Errors
///
/// Returns an error if the resulting cart could not be persisted.
pub fn dispatch<S: CartStorage>(
    store: &mut CartStore<S>,
    action: &CartAction,
) -> Result<(), StoreError> {
    match action {
        CartAction::Increase { index } => {
            let Some((id, qty)) = row(store, *index) else {
                return Ok(());
            };
            store.set_quantity(&id, f64::from(qty.saturating_add(1)))
        }
        CartAction::Decrease { index } => {
            let Some((id, qty)) = row(store, *index) else {
                return Ok(());
            };
            store.set_quantity(&id, f64::from(qty.saturating_sub(1).max(1)))
        }
        CartAction::SetQuantity { index, value } => {
            let Some((id, _)) = row(store, *index) else {
                return Ok(());
            };
            match parse_quantity_input(value) {
                Some(qty) => store.set_quantity(&id, qty),
                None => {
                    debug!(value = %value, "Ignoring unparsable quantity");
                    Ok(())
                }
            }
        }
        CartAction::Remove { index } => store.remove_at(*index),
        CartAction::RemoveSelected { positions } => store.remove_many(positions),
        CartAction::Clear => store.clear(),
    }
}

fn row<S: CartStorage>(store: &CartStore<S>, index: usize) -> Option<(String, u32)> {
    store
        .cart()
        .get(index)
        .map(|item| (item.id.as_str().to_string(), item.qty))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::{MemoryStorage, Product};
    use crate::types::{Price, ProductId};

    fn store_with(ids: &[&str]) -> CartStore<MemoryStorage> {
        let mut store = CartStore::open(MemoryStorage::new());
        for id in ids {
            store
                .add(Product {
                    id: ProductId::parse(id).unwrap(),
                    name: (*id).to_string(),
                    price: Price::new(Decimal::new(100, 0)).unwrap(),
                })
                .unwrap();
        }
        store
    }

    fn qty(store: &CartStore<MemoryStorage>, index: usize) -> u32 {
        store.cart().get(index).unwrap().qty
    }

    #[test]
    fn test_parse_dataset() {
        let increase = Dataset {
            action: Some("increase"),
            index: Some("2"),
            value: None,
        };
        assert_eq!(
            CartAction::from_dataset(&increase).unwrap(),
            CartAction::Increase { index: 2 }
        );

        let set = Dataset {
            action: Some("set-quantity"),
            index: Some("0"),
            value: Some("7"),
        };
        assert_eq!(
            CartAction::from_dataset(&set).unwrap(),
            CartAction::SetQuantity {
                index: 0,
                value: "7".to_string()
            }
        );

        let clear = Dataset {
            action: Some("clear"),
            ..Dataset::default()
        };
        assert_eq!(CartAction::from_dataset(&clear).unwrap(), CartAction::Clear);
    }

    #[test]
    fn test_parse_dataset_errors() {
        assert_eq!(
            CartAction::from_dataset(&Dataset::default()),
            Err(ActionParseError::MissingAction)
        );
        let unknown = Dataset {
            action: Some("explode"),
            ..Dataset::default()
        };
        assert!(matches!(
            CartAction::from_dataset(&unknown),
            Err(ActionParseError::UnknownAction(_))
        ));
        let no_index = Dataset {
            action: Some("remove"),
            ..Dataset::default()
        };
        assert!(matches!(
            CartAction::from_dataset(&no_index),
            Err(ActionParseError::MissingIndex(_))
        ));
        let bad_index = Dataset {
            action: Some("remove"),
            index: Some("first"),
            value: None,
        };
        assert!(matches!(
            CartAction::from_dataset(&bad_index),
            Err(ActionParseError::InvalidIndex(_))
        ));
    }

    #[test]
    fn test_quantity_input() {
        assert_eq!(parse_quantity_input(""), Some(1.0));
        assert_eq!(parse_quantity_input("  "), Some(1.0));
        assert_eq!(parse_quantity_input("3"), Some(3.0));
        assert_eq!(parse_quantity_input("2.7"), Some(2.7));
        assert_eq!(parse_quantity_input("abc"), None);
        assert_eq!(parse_quantity_input("NaN"), None);
        assert_eq!(parse_quantity_input("inf"), None);
    }

    #[test]
    fn test_increase_and_decrease() {
        let mut store = store_with(&["a"]);
        dispatch(&mut store, &CartAction::Increase { index: 0 }).unwrap();
        assert_eq!(qty(&store, 0), 2);
        dispatch(&mut store, &CartAction::Decrease { index: 0 }).unwrap();
        dispatch(&mut store, &CartAction::Decrease { index: 0 }).unwrap();
        dispatch(&mut store, &CartAction::Decrease { index: 0 }).unwrap();
        assert_eq!(qty(&store, 0), 1);
        assert_eq!(store.cart().len(), 1);
    }

    #[test]
    fn test_set_quantity_from_input() {
        let mut store = store_with(&["a", "b"]);
        let set = |value: &str| CartAction::SetQuantity {
            index: 1,
            value: value.to_string(),
        };
        dispatch(&mut store, &set("5.9")).unwrap();
        assert_eq!(qty(&store, 1), 5);
        dispatch(&mut store, &set("")).unwrap();
        assert_eq!(qty(&store, 1), 1);
        dispatch(&mut store, &set("lots")).unwrap();
        assert_eq!(qty(&store, 1), 1);
        dispatch(&mut store, &set("0")).unwrap();
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart().get(0).unwrap().id.as_str(), "a");
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = store_with(&["a", "b", "c"]);
        dispatch(&mut store, &CartAction::Remove { index: 1 }).unwrap();
        assert_eq!(store.cart().len(), 2);
        dispatch(&mut store, &CartAction::Remove { index: 9 }).unwrap();
        assert_eq!(store.cart().len(), 2);
        dispatch(&mut store, &CartAction::Clear).unwrap();
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_stale_index_is_ignored() {
        let mut store = store_with(&["a"]);
        dispatch(&mut store, &CartAction::Increase { index: 4 }).unwrap();
        assert_eq!(qty(&store, 0), 1);
    }
}
