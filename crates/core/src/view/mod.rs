//! Cart surfaces and their view model.
//!
//! A *surface* is one rendering of the cart: the slide-in modal, the full
//! cart page, or the checkout summary. Each is described by a
//! [`SurfaceDescriptor`] (element ids, delivery policy, empty-state text) and
//! rendered by the single [`render_surface`] function into a plain
//! [`SurfaceView`]. UI adapters draw the view; they never compute totals.
//!
//! # Modules
//!
//! - `render` - cart + descriptor → view model
//! - `sync` - re-renders every registered surface after each cart change
//! - `action` - container-level event delegation into cart operations

mod action;
mod render;
mod sync;

use rust_decimal::Decimal;

use crate::types::MoneyFormat;

pub use action::{ActionParseError, CartAction, Dataset, dispatch, parse_quantity_input};
pub use render::{BadgeView, RowView, SurfaceView, render_badge, render_surface};
pub use sync::{RenderState, Selection, SurfaceSink, ViewSynchronizer};

/// Element id of the cart count badge.
pub const BADGE_ID: &str = "cart-count";

/// Fixed delivery fee charged on the checkout surface.
pub const CHECKOUT_DELIVERY_FEE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Which surface a descriptor or view belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Modal,
    Page,
    Checkout,
}

impl SurfaceKind {
    /// Lowercase name, as used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modal => "modal",
            Self::Page => "page",
            Self::Checkout => "checkout",
        }
    }
}

/// Element ids a surface's markup exposes to the cart logic.
///
/// Controls a surface does not have are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementIds {
    pub container: &'static str,
    pub subtotal: &'static str,
    pub delivery: Option<&'static str>,
    pub total: &'static str,
    pub select_all: Option<&'static str>,
    pub remove_selected: Option<&'static str>,
    pub clear: Option<&'static str>,
    pub delivery_toggle: Option<&'static str>,
    pub delivery_fee: Option<&'static str>,
    pub checkout_button: Option<&'static str>,
}

/// How a surface charges delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// No delivery fee.
    None,
    /// Always charge this fee.
    Fixed(Decimal),
    /// User toggle plus user-editable fee.
    Optional { enabled: bool, fee: Decimal },
}

impl DeliveryPolicy {
    /// The fee that applies right now (zero when disabled).
    #[must_use]
    pub const fn fee(&self) -> Decimal {
        match *self {
            Self::None | Self::Optional { enabled: false, .. } => Decimal::ZERO,
            Self::Fixed(fee) | Self::Optional { fee, .. } => fee,
        }
    }

    /// Whether a delivery line is shown.
    #[must_use]
    pub const fn applies(&self) -> bool {
        matches!(self, Self::Fixed(_) | Self::Optional { enabled: true, .. })
    }

    /// Build an optional policy from the raw toggle and fee input.
    ///
    /// An empty, unparsable, or negative fee counts as zero.
    #[must_use]
    pub fn optional_from_input(enabled: bool, raw_fee: &str) -> Self {
        let fee = raw_fee
            .trim()
            .parse::<Decimal>()
            .ok()
            .filter(|fee| !fee.is_sign_negative())
            .unwrap_or(Decimal::ZERO);
        Self::Optional { enabled, fee }
    }
}

/// Everything needed to render one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    pub kind: SurfaceKind,
    pub ids: ElementIds,
    pub delivery: DeliveryPolicy,
    pub empty_message: &'static str,
    pub money: MoneyFormat,
}

impl SurfaceDescriptor {
    /// The slide-in cart modal; delivery is opt-in.
    #[must_use]
    pub fn modal() -> Self {
        Self {
            kind: SurfaceKind::Modal,
            ids: ElementIds {
                container: "cart-items-modal",
                subtotal: "modal-subtotal",
                delivery: None,
                total: "modal-grandtotal",
                select_all: Some("select-all"),
                remove_selected: Some("remove-selected"),
                clear: Some("clear-cart"),
                delivery_toggle: Some("apply-delivery-modal"),
                delivery_fee: Some("delivery-fee-modal"),
                checkout_button: None,
            },
            delivery: DeliveryPolicy::Optional {
                enabled: false,
                fee: Decimal::ZERO,
            },
            empty_message: "Your cart is empty.",
            money: MoneyFormat::default(),
        }
    }

    /// The full cart page; delivery is opt-in.
    #[must_use]
    pub fn page() -> Self {
        Self {
            kind: SurfaceKind::Page,
            ids: ElementIds {
                container: "cart-items-page",
                subtotal: "page-subtotal",
                delivery: None,
                total: "page-grandtotal",
                select_all: Some("select-all-page"),
                remove_selected: Some("remove-selected-page"),
                clear: Some("clear-cart-page"),
                delivery_toggle: Some("apply-delivery-page"),
                delivery_fee: Some("delivery-fee-page"),
                checkout_button: Some("checkout-btn"),
            },
            delivery: DeliveryPolicy::Optional {
                enabled: false,
                fee: Decimal::ZERO,
            },
            empty_message: "Your cart is empty. Go back to shopping.",
            money: MoneyFormat::default(),
        }
    }

    /// The read-only checkout summary with the fixed delivery fee.
    #[must_use]
    pub fn checkout() -> Self {
        Self {
            kind: SurfaceKind::Checkout,
            ids: ElementIds {
                container: "checkout-items",
                subtotal: "checkout-subtotal",
                delivery: Some("checkout-delivery"),
                total: "checkout-total",
                select_all: None,
                remove_selected: None,
                clear: None,
                delivery_toggle: None,
                delivery_fee: None,
                checkout_button: Some("place-order-btn"),
            },
            delivery: DeliveryPolicy::Fixed(CHECKOUT_DELIVERY_FEE),
            empty_message: "Your cart is empty.",
            money: MoneyFormat::default(),
        }
    }

    /// Descriptor for `kind` with its default settings.
    #[must_use]
    pub fn for_kind(kind: SurfaceKind) -> Self {
        match kind {
            SurfaceKind::Modal => Self::modal(),
            SurfaceKind::Page => Self::page(),
            SurfaceKind::Checkout => Self::checkout(),
        }
    }

    /// Replace the delivery policy.
    #[must_use]
    pub const fn with_delivery(mut self, delivery: DeliveryPolicy) -> Self {
        self.delivery = delivery;
        self
    }

    /// Replace the money format.
    #[must_use]
    pub const fn with_money(mut self, money: MoneyFormat) -> Self {
        self.money = money;
        self
    }

    /// Whether rows on this surface can be edited.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        !matches!(self.kind, SurfaceKind::Checkout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_fee_is_500() {
        assert_eq!(CHECKOUT_DELIVERY_FEE, Decimal::new(500, 0));
        assert_eq!(SurfaceDescriptor::checkout().delivery.fee(), Decimal::new(500, 0));
    }

    #[test]
    fn test_optional_policy_from_input() {
        let on = DeliveryPolicy::optional_from_input(true, "750");
        assert_eq!(on.fee(), Decimal::new(750, 0));
        assert!(on.applies());

        let off = DeliveryPolicy::optional_from_input(false, "750");
        assert_eq!(off.fee(), Decimal::ZERO);
        assert!(!off.applies());

        assert_eq!(DeliveryPolicy::optional_from_input(true, "").fee(), Decimal::ZERO);
        assert_eq!(DeliveryPolicy::optional_from_input(true, "abc").fee(), Decimal::ZERO);
        assert_eq!(DeliveryPolicy::optional_from_input(true, "-20").fee(), Decimal::ZERO);
    }

    #[test]
    fn test_surfaces_have_distinct_ids() {
        let modal = SurfaceDescriptor::modal();
        let page = SurfaceDescriptor::page();
        assert_ne!(modal.ids.container, page.ids.container);
        assert_ne!(modal.ids.total, page.ids.total);
        assert!(SurfaceDescriptor::checkout().ids.select_all.is_none());
        assert!(!SurfaceDescriptor::checkout().is_editable());
    }
}
