//! Cart and cart line types.

use crate::catalog::Image;
use crate::ids::{ActionId, CartId, LineId, MerchandiseId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// An authoritative cart snapshot as last reported by the commerce backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Server-assigned cart identifier.
    pub id: CartId,
    /// Lines in server order.
    pub lines: Vec<CartLine>,
    /// Sum of line quantities.
    pub total_quantity: i64,
    /// Discount codes entered against the cart.
    pub discount_codes: Vec<DiscountCode>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(id: impl Into<CartId>) -> Self {
        Self {
            id: id.into(),
            lines: Vec::new(),
            total_quantity: 0,
            discount_codes: Vec::new(),
        }
    }

    /// Create a cart from lines, deriving the total quantity.
    pub fn with_lines(id: impl Into<CartId>, lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new(id);
        cart.lines = lines;
        cart.recompute_total();
        cart
    }

    /// Recompute `total_quantity` from the lines, saturating on overflow.
    pub fn recompute_total(&mut self) {
        self.total_quantity = self
            .lines
            .iter()
            .try_fold(0i64, |total, l| total.checked_add(l.quantity))
            .unwrap_or(i64::MAX);
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a line by ID.
    pub fn get_line(&self, line_id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.id == line_id)
    }

    /// Get the line holding the given merchandise.
    pub fn get_line_by_merchandise(&self, merchandise_id: &MerchandiseId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.merchandise.id == merchandise_id)
    }

    /// Add quantity of a merchandise.
    ///
    /// Increases the existing line for the merchandise, or appends a
    /// provisional line keyed to `action` when there is none.
    pub(crate) fn add_merchandise(
        &mut self,
        action: ActionId,
        merchandise: &Merchandise,
        quantity: i64,
        unit_price: Option<Money>,
    ) {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.merchandise.id == merchandise.id)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return;
        }

        self.lines.push(CartLine {
            id: LineId::provisional(action),
            merchandise: merchandise.clone(),
            quantity,
            unit_price,
        });
    }

    /// Set the quantity of the targeted line. Zero or less removes it.
    pub(crate) fn set_quantity(&mut self, target: &LineTarget, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(target);
        }
        match self.lines.iter_mut().find(|l| target.matches(l)) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove the targeted line.
    pub(crate) fn remove(&mut self, target: &LineTarget) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| !target.matches(l));
        self.lines.len() < len_before
    }
}

/// A line in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Line identifier; provisional for lines not yet confirmed.
    pub id: LineId,
    /// What the line buys.
    pub merchandise: Merchandise,
    /// Quantity.
    pub quantity: i64,
    /// Unit price, when the backend reported a usable one.
    pub unit_price: Option<Money>,
}

impl CartLine {
    /// Whether the line has enough product data to be listed to the user.
    pub fn is_renderable(&self) -> bool {
        self.merchandise.has_product_linkage()
    }

    /// Line total (unit price * quantity), if priced and in range.
    pub fn total_price(&self) -> Option<Money> {
        self.unit_price?.try_multiply(self.quantity)
    }
}

/// Denormalized merchandise data carried on a cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Merchandise {
    /// Merchandise (variant) identifier.
    pub id: MerchandiseId,
    /// Variant title (e.g., "L").
    pub title: Option<String>,
    /// Parent product, if the backend linked one.
    pub product: Option<ProductLink>,
    /// Image to show next to the line.
    pub image: Option<Image>,
}

impl Merchandise {
    pub fn new(id: impl Into<MerchandiseId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            product: None,
            image: None,
        }
    }

    /// Attach the parent product.
    pub fn with_product(mut self, product: ProductLink) -> Self {
        self.product = Some(product);
        self
    }

    /// A line can only link to its product page when the handle is known.
    pub fn has_product_linkage(&self) -> bool {
        self.product
            .as_ref()
            .and_then(|p| p.handle.as_deref())
            .map(|h| !h.is_empty())
            .unwrap_or(false)
    }
}

/// Reference from merchandise back to its product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductLink {
    pub id: Option<ProductId>,
    pub handle: Option<String>,
    pub title: Option<String>,
}

impl ProductLink {
    pub fn new(id: impl Into<ProductId>, handle: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            handle: Some(handle.into()),
            title: None,
        }
    }
}

/// A discount code entered against the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscountCode {
    pub code: String,
    /// Whether the backend accepted the code for this cart.
    pub applicable: bool,
}

/// How a cart action identifies the line it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LineTarget {
    /// A specific line, server-assigned or provisional.
    Line(LineId),
    /// Whichever line holds this merchandise.
    Merchandise(MerchandiseId),
}

impl LineTarget {
    pub fn matches(&self, line: &CartLine) -> bool {
        match self {
            LineTarget::Line(id) => &line.id == id,
            LineTarget::Merchandise(id) => &line.merchandise.id == id,
        }
    }
}

impl From<LineId> for LineTarget {
    fn from(id: LineId) -> Self {
        LineTarget::Line(id)
    }
}

impl From<MerchandiseId> for LineTarget {
    fn from(id: MerchandiseId) -> Self {
        LineTarget::Merchandise(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn tee() -> Merchandise {
        Merchandise::new("var-tee-m").with_product(ProductLink::new("prod-tee", "signal-tee"))
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new("cart-123");
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity, 0);
    }

    #[test]
    fn test_add_merchandise_appends_provisional_line() {
        let mut cart = Cart::new("cart-123");
        cart.add_merchandise(ActionId::new(0), &tee(), 2, Some(Money::new(3500, Currency::USD)));
        cart.recompute_total();

        assert_eq!(cart.lines.len(), 1);
        assert!(cart.lines[0].id.is_provisional());
        assert_eq!(cart.total_quantity, 2);
    }

    #[test]
    fn test_add_same_merchandise_increases_quantity() {
        let mut cart = Cart::new("cart-123");
        cart.add_merchandise(ActionId::new(0), &tee(), 1, None);
        cart.add_merchandise(ActionId::new(1), &tee(), 2, None);
        cart.recompute_total();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.total_quantity, 3);
    }

    #[test]
    fn test_add_onto_full_line_still_increases() {
        let mut cart = Cart::new("cart-123");
        cart.add_merchandise(ActionId::new(0), &tee(), MAX_QUANTITY_PER_LINE, None);
        cart.add_merchandise(ActionId::new(1), &tee(), 1, None);
        assert_eq!(cart.lines[0].quantity, MAX_QUANTITY_PER_LINE + 1);

        let target = LineTarget::Merchandise(MerchandiseId::new("var-tee-m"));
        assert!(cart.set_quantity(&target, 20_000));
        assert_eq!(cart.lines[0].quantity, 20_000);
    }

    #[test]
    fn test_add_saturates_instead_of_overflowing() {
        let mut cart = Cart::new("cart-123");
        cart.add_merchandise(ActionId::new(0), &tee(), i64::MAX, None);
        cart.add_merchandise(ActionId::new(1), &tee(), 1, None);
        assert_eq!(cart.lines[0].quantity, i64::MAX);
    }

    #[test]
    fn test_recompute_total_saturates() {
        let mut cart = Cart::new("cart-123");
        cart.add_merchandise(ActionId::new(0), &tee(), i64::MAX, None);
        cart.add_merchandise(
            ActionId::new(1),
            &Merchandise::new("var-tee-l"),
            1,
            None,
        );
        cart.recompute_total();
        assert_eq!(cart.total_quantity, i64::MAX);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new("cart-123");
        cart.add_merchandise(ActionId::new(0), &tee(), 1, None);
        let target = LineTarget::Merchandise(MerchandiseId::new("var-tee-m"));

        assert!(cart.set_quantity(&target, 4));
        assert_eq!(cart.lines[0].quantity, 4);
        assert!(cart.set_quantity(&target, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_line_is_noop() {
        let mut cart = Cart::new("cart-123");
        cart.add_merchandise(ActionId::new(0), &tee(), 1, None);
        assert!(!cart.remove(&LineTarget::Line(LineId::new("nope"))));
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_product_linkage() {
        assert!(tee().has_product_linkage());
        assert!(!Merchandise::new("var-1").has_product_linkage());

        let mut blank = tee();
        blank.product.as_mut().unwrap().handle = Some(String::new());
        assert!(!blank.has_product_linkage());
    }

    #[test]
    fn test_line_total_price() {
        let line = CartLine {
            id: LineId::new("line-1"),
            merchandise: tee(),
            quantity: 3,
            unit_price: Some(Money::new(1000, Currency::USD)),
        };
        assert_eq!(line.total_price().unwrap().amount_cents, 3000);
    }
}
