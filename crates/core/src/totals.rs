//! Cart totals.
//!
//! All sums are exact decimals; nothing is rounded until display formatting
//! or the conversion to the payment provider's minor units.
//!
//! Sums saturate at [`Decimal::MAX`] instead of panicking. Prices are bounded
//! by [`Price::MAX`](crate::types::Price::MAX), so only a user-entered delivery
//! fee can get there, and a saturated total is refused by [`to_minor_units`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::cart::{Cart, LineItem};
use crate::types::CurrencyCode;

/// Errors converting an amount to minor units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Negative totals cannot be charged.
    #[error("amount cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount does not fit the provider's integer amount.
    #[error("amount {0} is too large to charge")]
    Overflow(Decimal),
}

/// `price × qty` for one row.
#[must_use]
pub fn line_total(item: &LineItem) -> Decimal {
    item.price.amount().saturating_mul(Decimal::from(item.qty))
}

/// Sum of `price × qty` over every row.
#[must_use]
pub fn subtotal(cart: &Cart) -> Decimal {
    cart.items()
        .iter()
        .map(line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Subtotal plus the delivery fee (pass zero when no fee applies).
#[must_use]
pub fn grand_total(cart: &Cart, delivery_fee: Decimal) -> Decimal {
    subtotal(cart).saturating_add(delivery_fee)
}

/// Total number of units in the cart, shown on the cart badge.
#[must_use]
pub fn item_count(cart: &Cart) -> u64 {
    cart.items().iter().map(|item| u64::from(item.qty)).sum()
}

/// Convert an amount to the currency's smallest unit (e.g. naira to kobo).
///
/// # Errors
///
/// Returns an error if the amount is negative or too large.
pub fn to_minor_units(amount: Decimal, currency: CurrencyCode) -> Result<u64, AmountError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative(amount));
    }
    amount
        .checked_mul(Decimal::from(currency.minor_units()))
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_u64())
        .ok_or(AmountError::Overflow(amount))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::Product;
    use crate::types::{Price, ProductId};

    fn cart(rows: &[(&str, i64, u32)]) -> Cart {
        let mut cart = Cart::new();
        for &(id, price, qty) in rows {
            cart.add(Product {
                id: ProductId::parse(id).unwrap(),
                name: id.to_string(),
                price: Price::new(Decimal::new(price, 0)).unwrap(),
            });
            cart.set_quantity(id, f64::from(qty));
        }
        cart
    }

    #[test]
    fn test_subtotal() {
        let cart = cart(&[("a", 1000, 2), ("b", 500, 1)]);
        assert_eq!(subtotal(&cart), Decimal::new(2500, 0));
    }

    #[test]
    fn test_grand_total_adds_fee() {
        let cart = cart(&[("a", 1000, 2), ("b", 500, 1)]);
        let fee = Decimal::new(500, 0);
        assert_eq!(grand_total(&cart, fee), subtotal(&cart) + fee);
        assert_eq!(grand_total(&cart, Decimal::ZERO), subtotal(&cart));
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert_eq!(subtotal(&cart), Decimal::ZERO);
        assert_eq!(item_count(&cart), 0);
    }

    #[test]
    fn test_decimal_sum_is_exact() {
        let mut cart = Cart::new();
        for id in ["a", "b", "c"] {
            cart.add(Product {
                id: ProductId::parse(id).unwrap(),
                name: id.to_string(),
                price: Price::new(Decimal::new(1, 1)).unwrap(),
            });
        }
        assert_eq!(subtotal(&cart), Decimal::new(3, 1));
    }

    #[test]
    fn test_largest_cart_does_not_overflow() {
        let mut cart = Cart::new();
        for id in ["a", "b"] {
            cart.add(Product {
                id: ProductId::parse(id).unwrap(),
                name: id.to_string(),
                price: Price::new(Price::MAX).unwrap(),
            });
            cart.set_quantity(id, f64::from(u32::MAX));
        }

        let expected = Price::MAX * Decimal::from(u32::MAX) * Decimal::TWO;
        assert_eq!(subtotal(&cart), expected);
        assert_eq!(grand_total(&cart, Decimal::MAX), Decimal::MAX);
        assert!(matches!(
            to_minor_units(grand_total(&cart, Decimal::MAX), CurrencyCode::NGN),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let cart = cart(&[("a", 1, 3), ("b", 1, 4)]);
        assert_eq!(item_count(&cart), 7);
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(
            to_minor_units(Decimal::new(3000, 0), CurrencyCode::NGN).unwrap(),
            300_000
        );
        assert_eq!(
            to_minor_units(Decimal::new(10_005, 3), CurrencyCode::NGN).unwrap(),
            1001
        );
        assert!(matches!(
            to_minor_units(Decimal::new(-1, 0), CurrencyCode::NGN),
            Err(AmountError::Negative(_))
        ));
        assert!(matches!(
            to_minor_units(Decimal::MAX, CurrencyCode::NGN),
            Err(AmountError::Overflow(_))
        ));
    }
}
