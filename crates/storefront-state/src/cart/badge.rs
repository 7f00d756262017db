//! Cart button badge.

use crate::cart::ProjectedCart;

/// What the cart button in the screen corner shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartBadge {
    /// Projected unit count; zero without a cart.
    pub count: i64,
}

impl CartBadge {
    pub fn new(cart: &ProjectedCart) -> Self {
        Self {
            count: cart.total_quantity.max(0),
        }
    }

    /// "Cart" when empty, "Cart (n)" otherwise.
    pub fn label(&self) -> String {
        if self.count > 0 {
            format!("Cart ({})", self.count)
        } else {
            "Cart".to_string()
        }
    }

    /// The button pulses while anything is in the cart.
    pub fn pulsating(&self) -> bool {
        self.count > 0
    }
}
