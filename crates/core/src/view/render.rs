//! Pure rendering from cart + surface descriptor to view model.

use rust_decimal::Decimal;

use super::{SurfaceDescriptor, SurfaceKind};
use crate::cart::Cart;
use crate::totals::{grand_total, item_count, line_total, subtotal};

/// One rendered cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Position in the cart, carried as `data-index` for event delegation.
    pub index: usize,
    pub id: String,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
    /// Checkbox state; always `false` straight after a cart change.
    pub selected: bool,
}

/// A fully rendered surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceView {
    pub kind: SurfaceKind,
    pub rows: Vec<RowView>,
    /// Set when the cart is empty.
    pub empty_message: Option<&'static str>,
    pub subtotal: String,
    /// Formatted delivery fee, when the surface's policy charges one.
    pub delivery: Option<String>,
    pub total: String,
    pub subtotal_amount: Decimal,
    pub total_amount: Decimal,
    /// Rows can be edited (quantity controls, remove, selection).
    pub editable: bool,
    /// The checkout / place-order control is usable.
    pub checkout_enabled: bool,
}

/// The cart count badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeView {
    pub count: u64,
}

/// Render `cart` for the surface described by `descriptor`.
///
/// Every call produces a complete view; nothing is reused from earlier renders.
#[must_use]
pub fn render_surface(cart: &Cart, descriptor: &SurfaceDescriptor) -> SurfaceView {
    let money = &descriptor.money;

    let rows = cart
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| RowView {
            index,
            id: item.id.to_string(),
            name: item.name.clone(),
            unit_price: money.format(item.price.amount()),
            quantity: item.qty,
            line_total: money.format(line_total(item)),
            selected: false,
        })
        .collect();

    let fee = descriptor.delivery.fee();
    let subtotal_amount = subtotal(cart);
    let total_amount = grand_total(cart, fee);

    SurfaceView {
        kind: descriptor.kind,
        rows,
        empty_message: cart.is_empty().then_some(descriptor.empty_message),
        subtotal: money.format(subtotal_amount),
        delivery: descriptor.delivery.applies().then(|| money.format(fee)),
        total: money.format(total_amount),
        subtotal_amount,
        total_amount,
        editable: descriptor.is_editable(),
        checkout_enabled: !cart.is_empty(),
    }
}

/// Render the cart count badge.
#[must_use]
pub fn render_badge(cart: &Cart) -> BadgeView {
    BadgeView {
        count: item_count(cart),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::Product;
    use crate::types::{Price, ProductId};
    use crate::view::DeliveryPolicy;

    fn two_item_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(Product {
            id: ProductId::parse("shoe").unwrap(),
            name: "Running Shoe".to_string(),
            price: Price::new(Decimal::new(12_500, 0)).unwrap(),
        });
        cart.add(Product {
            id: ProductId::parse("sock").unwrap(),
            name: "Sock".to_string(),
            price: Price::new(Decimal::new(1_250_50, 2)).unwrap(),
        });
        cart
    }

    #[test]
    fn test_checkout_total_includes_fixed_fee() {
        let view = render_surface(&two_item_cart(), &SurfaceDescriptor::checkout());
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.subtotal, "\u{20a6}13,750.50");
        assert_eq!(view.delivery.as_deref(), Some("\u{20a6}500.00"));
        assert_eq!(view.total, "\u{20a6}14,250.50");
        assert_eq!(view.total_amount, view.subtotal_amount + Decimal::new(500, 0));
        assert!(view.checkout_enabled);
        assert!(!view.editable);
    }

    #[test]
    fn test_optional_delivery_off_by_default() {
        let view = render_surface(&two_item_cart(), &SurfaceDescriptor::page());
        assert!(view.delivery.is_none());
        assert_eq!(view.total, view.subtotal);
    }

    #[test]
    fn test_optional_delivery_enabled() {
        let descriptor = SurfaceDescriptor::modal()
            .with_delivery(DeliveryPolicy::optional_from_input(true, "1000"));
        let view = render_surface(&two_item_cart(), &descriptor);
        assert_eq!(view.total, "\u{20a6}14,750.50");
    }

    #[test]
    fn test_rows_carry_index_and_line_totals() {
        let mut cart = two_item_cart();
        cart.set_quantity("shoe", 3.0);
        let view = render_surface(&cart, &SurfaceDescriptor::modal());
        let first = view.rows.first().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.unit_price, "\u{20a6}12,500.00");
        assert_eq!(first.line_total, "\u{20a6}37,500.00");
        assert!(view.rows.iter().all(|row| !row.selected));
    }

    #[test]
    fn test_empty_cart() {
        let view = render_surface(&Cart::new(), &SurfaceDescriptor::page());
        assert!(view.rows.is_empty());
        assert_eq!(view.empty_message, Some("Your cart is empty. Go back to shopping."));
        assert!(!view.checkout_enabled);
        assert_eq!(view.total, "\u{20a6}0.00");
    }

    #[test]
    fn test_badge_counts_units() {
        let mut cart = two_item_cart();
        cart.set_quantity("sock", 4.0);
        assert_eq!(render_badge(&cart).count, 5);
    }
}
