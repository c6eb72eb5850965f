//! Keeps every registered surface in step with the cart.
//!
//! The synchronizer is a [`CartListener`]: each committed cart change
//! re-renders all registered surfaces from scratch and hands them to a
//! [`SurfaceSink`]. Row selection is per surface and is dropped on every
//! cart change, since the rows it referred to were replaced.

use std::collections::BTreeSet;

use super::render::{BadgeView, SurfaceView, render_badge, render_surface};
use super::{CartAction, DeliveryPolicy, SurfaceDescriptor, SurfaceKind};
use crate::cart::{Cart, CartListener};

/// Output side of a UI adapter (DOM, terminal, test recorder).
pub trait SurfaceSink {
    /// Replace everything shown for `view.kind` with `view`.
    fn present(&mut self, view: &SurfaceView);

    /// Replace the cart count badge.
    fn present_badge(&mut self, badge: &BadgeView);
}

/// Whether a surface shows the latest cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Registered but not drawn since the last cart change.
    Stale,
    /// Drawn from the latest cart.
    Rendered,
}

/// Checked rows of one surface, by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    checked: BTreeSet<usize>,
}

impl Selection {
    /// Check or uncheck one row.
    pub fn toggle(&mut self, index: usize, checked: bool) {
        if checked {
            self.checked.insert(index);
        } else {
            self.checked.remove(&index);
        }
    }

    /// Check or uncheck every one of `row_count` rows.
    pub fn select_all(&mut self, row_count: usize, checked: bool) {
        self.checked.clear();
        if checked {
            self.checked.extend(0..row_count);
        }
    }

    /// Whether row `index` is checked.
    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.checked.contains(&index)
    }

    /// Checked positions in ascending order.
    #[must_use]
    pub fn positions(&self) -> Vec<usize> {
        self.checked.iter().copied().collect()
    }

    /// Whether nothing is checked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    /// Uncheck everything.
    pub fn clear(&mut self) {
        self.checked.clear();
    }
}

struct RegisteredSurface {
    descriptor: SurfaceDescriptor,
    selection: Selection,
    state: RenderState,
}

/// Re-renders registered surfaces on every cart change.
pub struct ViewSynchronizer<K> {
    surfaces: Vec<RegisteredSurface>,
    sink: K,
    cart: Cart,
}

impl<K: SurfaceSink> ViewSynchronizer<K> {
    /// A synchronizer drawing into `sink`, with no surfaces yet.
    pub const fn new(sink: K) -> Self {
        Self {
            surfaces: Vec::new(),
            sink,
            cart: Cart::new(),
        }
    }

    /// Register a surface. Registering a kind twice replaces the earlier descriptor.
    pub fn register(&mut self, descriptor: SurfaceDescriptor) {
        self.surfaces
            .retain(|surface| surface.descriptor.kind != descriptor.kind);
        self.surfaces.push(RegisteredSurface {
            descriptor,
            selection: Selection::default(),
            state: RenderState::Stale,
        });
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_surface(mut self, descriptor: SurfaceDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Fully re-render every surface and the badge from `cart`.
    ///
    /// Clears every surface's selection.
    pub fn render_all(&mut self, cart: &Cart) {
        self.cart = cart.clone();
        for surface in &mut self.surfaces {
            surface.selection.clear();
            surface.state = RenderState::Stale;
        }
        for position in 0..self.surfaces.len() {
            self.redraw(position);
        }
        self.sink.present_badge(&render_badge(&self.cart));
    }

    /// Change a surface's delivery policy and redraw that surface only.
    ///
    /// The cart is not touched and the selection is kept.
    pub fn set_delivery(&mut self, kind: SurfaceKind, delivery: DeliveryPolicy) {
        if let Some(position) = self.position(kind) {
            if let Some(surface) = self.surfaces.get_mut(position) {
                surface.descriptor.delivery = delivery;
            }
            self.redraw(position);
        }
    }

    /// Check or uncheck one row and redraw the surface.
    pub fn toggle_row(&mut self, kind: SurfaceKind, index: usize, checked: bool) {
        let rows = self.cart.len();
        if let Some(position) = self.position(kind) {
            if index < rows
                && let Some(surface) = self.surfaces.get_mut(position)
            {
                surface.selection.toggle(index, checked);
            }
            self.redraw(position);
        }
    }

    /// The "select all" checkbox: check or uncheck every row of a surface.
    pub fn select_all(&mut self, kind: SurfaceKind, checked: bool) {
        let rows = self.cart.len();
        if let Some(position) = self.position(kind) {
            if let Some(surface) = self.surfaces.get_mut(position) {
                surface.selection.select_all(rows, checked);
            }
            self.redraw(position);
        }
    }

    /// Selection of a surface as it stands right now.
    #[must_use]
    pub fn selection(&self, kind: SurfaceKind) -> Option<&Selection> {
        self.surface(kind).map(|surface| &surface.selection)
    }

    /// The "remove selected" button: reads the selection at call time.
    ///
    /// Returns `None` when nothing is checked.
    #[must_use]
    pub fn remove_selected_action(&self, kind: SurfaceKind) -> Option<CartAction> {
        let selection = self.selection(kind)?;
        if selection.is_empty() {
            return None;
        }
        Some(CartAction::RemoveSelected {
            positions: selection.positions(),
        })
    }

    /// Render state of a surface.
    #[must_use]
    pub fn state(&self, kind: SurfaceKind) -> Option<RenderState> {
        self.surface(kind).map(|surface| surface.state)
    }

    /// Current descriptor of a surface.
    #[must_use]
    pub fn descriptor(&self, kind: SurfaceKind) -> Option<&SurfaceDescriptor> {
        self.surface(kind).map(|surface| &surface.descriptor)
    }

    /// The output adapter.
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    fn surface(&self, kind: SurfaceKind) -> Option<&RegisteredSurface> {
        self.surfaces
            .iter()
            .find(|surface| surface.descriptor.kind == kind)
    }

    fn position(&self, kind: SurfaceKind) -> Option<usize> {
        self.surfaces
            .iter()
            .position(|surface| surface.descriptor.kind == kind)
    }

    fn redraw(&mut self, position: usize) {
        let Some(surface) = self.surfaces.get_mut(position) else {
            return;
        };
        let mut view = render_surface(&self.cart, &surface.descriptor);
        for row in &mut view.rows {
            row.selected = surface.selection.is_selected(row.index);
        }
        self.sink.present(&view);
        surface.state = RenderState::Rendered;
    }
}

impl<K: SurfaceSink> CartListener for ViewSynchronizer<K> {
    fn cart_changed(&mut self, cart: &Cart) {
        self.render_all(cart);
    }
}
