//! Terminal rendering of cart surfaces.

use std::fmt::Write as _;

use simple_cart_core::view::{BadgeView, SurfaceKind, SurfaceSink, SurfaceView};

/// A [`SurfaceSink`] that keeps the latest text of every surface.
///
/// Each `present` replaces the previous text of that surface, the same way
/// a browser surface replaces its container contents.
#[derive(Debug, Default)]
pub struct TerminalSink {
    surfaces: Vec<(SurfaceKind, String)>,
    badge: Option<u64>,
}

impl TerminalSink {
    /// Latest text of a surface.
    #[must_use]
    pub fn surface(&self, kind: SurfaceKind) -> Option<&str> {
        self.surfaces
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, text)| text.as_str())
    }

    /// Latest badge count.
    #[must_use]
    pub const fn badge(&self) -> Option<u64> {
        self.badge
    }

    /// Everything currently shown, surfaces in registration order.
    #[must_use]
    pub fn screen(&self) -> String {
        let mut out = String::new();
        for (_, text) in &self.surfaces {
            out.push_str(text);
        }
        if let Some(count) = self.badge {
            let _ = writeln!(out, "Items in cart: {count}");
        }
        out
    }
}

impl SurfaceSink for TerminalSink {
    fn present(&mut self, view: &SurfaceView) {
        let text = format_surface(view);
        match self.surfaces.iter_mut().find(|(kind, _)| *kind == view.kind) {
            Some(entry) => entry.1 = text,
            None => self.surfaces.push((view.kind, text)),
        }
    }

    fn present_badge(&mut self, badge: &BadgeView) {
        self.badge = Some(badge.count);
    }
}

fn title(kind: SurfaceKind) -> &'static str {
    match kind {
        SurfaceKind::Modal => "Cart",
        SurfaceKind::Page => "Your Cart",
        SurfaceKind::Checkout => "Order Summary",
    }
}

/// Render one surface as plain text. Row numbers are 1-based.
#[must_use]
pub fn format_surface(view: &SurfaceView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", title(view.kind));

    if let Some(message) = view.empty_message {
        let _ = writeln!(out, "{message}");
    } else {
        for row in &view.rows {
            let marker = match (view.editable, row.selected) {
                (false, _) => "",
                (true, true) => "[x] ",
                (true, false) => "[ ] ",
            };
            let _ = writeln!(
                out,
                "{marker}{:>3}. {:<28} {:>4} x {:>14} = {:>14}",
                row.index + 1,
                row.name,
                row.quantity,
                row.unit_price,
                row.line_total,
            );
        }
    }

    let _ = writeln!(out, "Subtotal: {}", view.subtotal);
    if let Some(delivery) = &view.delivery {
        let _ = writeln!(out, "Delivery: {delivery}");
    }
    let _ = writeln!(out, "Total:    {}", view.total);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use simple_cart_core::view::{SurfaceDescriptor, render_surface};
    use simple_cart_core::{Cart, Price, Product, ProductId};

    use super::*;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(Product {
            id: ProductId::parse("shoe").unwrap(),
            name: "Running Shoe".to_string(),
            price: Price::new(Decimal::new(12_500, 0)).unwrap(),
        });
        cart
    }

    #[test]
    fn test_page_rows_and_totals() {
        let text = format_surface(&render_surface(&cart(), &SurfaceDescriptor::page()));
        assert!(text.starts_with("== Your Cart ==\n"));
        assert!(text.contains("[ ]   1. Running Shoe"));
        assert!(text.contains("\u{20a6}12,500.00"));
        assert!(text.contains("Total:    \u{20a6}12,500.00"));
        assert!(!text.contains("Delivery:"));
    }

    #[test]
    fn test_checkout_shows_delivery_without_checkboxes() {
        let text = format_surface(&render_surface(&cart(), &SurfaceDescriptor::checkout()));
        assert!(text.contains("Delivery: \u{20a6}500.00"));
        assert!(text.contains("Total:    \u{20a6}13,000.00"));
        assert!(!text.contains("[ ]"));
    }

    #[test]
    fn test_empty_message() {
        let text = format_surface(&render_surface(&Cart::new(), &SurfaceDescriptor::modal()));
        assert!(text.contains("Your cart is empty.\n"));
    }

    #[test]
    fn test_sink_replaces_surface_text() {
        let mut sink = TerminalSink::default();
        sink.present(&render_surface(&Cart::new(), &SurfaceDescriptor::page()));
        sink.present(&render_surface(&cart(), &SurfaceDescriptor::page()));
        sink.present_badge(&BadgeView { count: 1 });

        assert_eq!(sink.screen().matches("== Your Cart ==").count(), 1);
        assert_eq!(sink.badge(), Some(1));
        let page = sink.surface(SurfaceKind::Page).unwrap();
        assert!(!page.contains("empty"));
        assert!(sink.screen().ends_with("Items in cart: 1\n"));
    }
}
