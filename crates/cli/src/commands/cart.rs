//! Cart editing commands.
//!
//! Rows are addressed by their 1-based number as shown by `cart show`. Each
//! command is turned into the dataset the matching page control carries and
//! goes through the same delegation path as a click.

use simple_cart_core::view::{CartAction, Dataset, DeliveryPolicy, SurfaceKind, dispatch};
use simple_cart_core::{Price, Product, ProductId};
use tracing::{info, warn};

use super::Session;
use crate::error::CliError;

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error for an empty id, a negative or non-numeric price, or a
/// failed write.
pub fn add(session: &mut Session, id: &str, name: &str, price: &str) -> Result<(), CliError> {
    let product = Product {
        id: ProductId::parse(id)?,
        name: name.to_string(),
        price: price.parse::<Price>()?,
    };
    info!(id = %product.id, "Adding to cart");
    session.store().add(product)?;
    Ok(())
}

/// Set a row's quantity from raw input. Empty means 1; 0 removes the row;
/// anything unparsable leaves the row as it was.
///
/// # Errors
///
/// Returns an error for an unknown row or a failed write.
pub fn set_quantity(session: &mut Session, row: usize, value: &str) -> Result<(), CliError> {
    let action = row_action(session, "set-quantity", row, Some(value))?;
    apply(session, &action)
}

/// Add one to a row's quantity.
///
/// # Errors
///
/// Returns an error for an unknown row or a failed write.
pub fn increase(session: &mut Session, row: usize) -> Result<(), CliError> {
    let action = row_action(session, "increase", row, None)?;
    apply(session, &action)
}

/// Take one off a row's quantity, stopping at 1.
///
/// # Errors
///
/// Returns an error for an unknown row or a failed write.
pub fn decrease(session: &mut Session, row: usize) -> Result<(), CliError> {
    let action = row_action(session, "decrease", row, None)?;
    apply(session, &action)
}

/// Remove one or more rows in a single write.
///
/// Several rows go through the page's selection and "remove selected".
///
/// # Errors
///
/// Returns an error for an unknown row or a failed write.
pub fn remove(session: &mut Session, rows: &[usize]) -> Result<(), CliError> {
    let positions = rows
        .iter()
        .map(|&row| session.position(row))
        .collect::<Result<Vec<_>, _>>()?;

    let action = match rows {
        [] => return Ok(()),
        [row] => Some(row_action(session, "remove", *row, None)?),
        _ => session.with_view(|sync| {
            for &index in &positions {
                sync.toggle_row(SurfaceKind::Page, index, true);
            }
            sync.remove_selected_action(SurfaceKind::Page)
        }),
    };

    match action {
        Some(action) => apply(session, &action),
        None => Ok(()),
    }
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn clear(session: &mut Session) -> Result<(), CliError> {
    let action = CartAction::from_dataset(&Dataset {
        action: Some("clear"),
        ..Dataset::default()
    })?;
    apply(session, &action)
}

/// Re-render `kind` with an optional delivery fee applied.
///
/// The cart is not modified; the checkout surface always uses its fixed fee.
pub fn show_delivery(session: &Session, kind: SurfaceKind, fee: &str) {
    if kind == SurfaceKind::Checkout {
        warn!("The checkout surface always charges the configured delivery fee");
        return;
    }
    session.with_view(|sync| {
        sync.set_delivery(kind, DeliveryPolicy::optional_from_input(true, fee));
    });
}

/// The action a row control with `data-action="{action}"` on `row` carries.
fn row_action(
    session: &Session,
    action: &str,
    row: usize,
    value: Option<&str>,
) -> Result<CartAction, CliError> {
    let index = session.position(row)?.to_string();
    Ok(CartAction::from_dataset(&Dataset {
        action: Some(action),
        index: Some(&index),
        value,
    })?)
}

fn apply(session: &mut Session, action: &CartAction) -> Result<(), CliError> {
    dispatch(session.store(), action)?;
    Ok(())
}
