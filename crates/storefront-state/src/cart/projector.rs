//! Optimistic cart projection.
//!
//! A [`ProjectedCart`] is the last server cart with every pending action
//! replayed over it in submission order. It is rebuilt from scratch whenever
//! either input changes and never edited in place.

use crate::cart::{Cart, CartAction, CartLine, DiscountCode, PendingAction};
use crate::ids::CartId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cart as the user should currently see it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProjectedCart {
    /// Server cart the projection is anchored on. `None` until one exists.
    pub cart_id: Option<CartId>,
    /// All projected lines, including ones unfit for display.
    pub lines: Vec<CartLine>,
    /// Sum of projected line quantities.
    pub total_quantity: i64,
    pub discount_codes: Vec<DiscountCode>,
}

impl ProjectedCart {
    /// The projection shown before any server cart exists.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether a server cart anchors this projection.
    pub fn is_anchored(&self) -> bool {
        self.cart_id.is_some()
    }

    /// Lines fit to list to the user.
    ///
    /// Lines without product linkage are skipped here but still counted in
    /// [`total_quantity`](Self::total_quantity).
    pub fn renderable_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|l| l.is_renderable())
    }

    /// No lines at all (the "your cart is empty" view).
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// At least one unit in the cart (the summary view).
    pub fn has_items(&self) -> bool {
        self.total_quantity > 0
    }

    /// Any discount code the backend accepted.
    pub fn has_applicable_discount(&self) -> bool {
        self.discount_codes.iter().any(|d| d.applicable)
    }

    /// Sum of line totals.
    ///
    /// `None` for an empty cart, when any line has no known price, or when
    /// lines disagree on currency.
    pub fn subtotal(&self) -> Option<Money> {
        let totals: Vec<Money> = self
            .lines
            .iter()
            .map(CartLine::total_price)
            .collect::<Option<_>>()?;
        let currency = totals.first()?.currency;
        Money::try_sum(totals.iter(), currency)
    }

    /// Subtotal for the cart summary; "-" when it cannot be shown.
    pub fn subtotal_label(&self) -> String {
        self.subtotal()
            .map(|m| m.display())
            .unwrap_or_else(|| "-".to_string())
    }
}

impl From<Cart> for ProjectedCart {
    fn from(cart: Cart) -> Self {
        Self {
            cart_id: Some(cart.id),
            lines: cart.lines,
            total_quantity: cart.total_quantity,
            discount_codes: cart.discount_codes,
        }
    }
}

/// Project pending actions over the last known server cart.
///
/// Without a server cart the projection is empty; pending actions wait for
/// an anchor. The total quantity is always recomputed from the resulting
/// lines.
pub fn project(server_cart: Option<&Cart>, pending: &[PendingAction]) -> ProjectedCart {
    let Some(server_cart) = server_cart else {
        if !pending.is_empty() {
            debug!(pending = pending.len(), "no server cart yet, deferring pending actions");
        }
        return ProjectedCart::empty();
    };

    let mut cart = server_cart.clone();
    for pending in pending {
        apply(&mut cart, pending);
    }
    cart.recompute_total();

    ProjectedCart::from(cart)
}

fn apply(cart: &mut Cart, pending: &PendingAction) {
    match &pending.action {
        CartAction::AddLine {
            merchandise,
            quantity,
            unit_price,
        } => {
            if *quantity > 0 {
                cart.add_merchandise(pending.id, merchandise, *quantity, *unit_price);
            }
        }
        CartAction::UpdateLine { target, quantity } => {
            if !cart.set_quantity(target, *quantity) {
                debug!(action = %pending.id, ?target, "update targets no projected line");
            }
        }
        CartAction::RemoveLine { target } => {
            if !cart.remove(target) {
                debug!(action = %pending.id, ?target, "remove targets no projected line");
            }
        }
    }
}
