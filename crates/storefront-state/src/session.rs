//! The storefront session: the shell that owns the cart, the catalog and the
//! product modal, and wires the projector, resolver, carousel and mutation
//! lifecycle together.
//!
//! The components never talk to each other; every hand-off (carousel to
//! resolver, settlement to lifecycle) happens here through explicit,
//! identity-guarded transitions.
//!
//! Network calls are split in two so the session is never borrowed across
//! an await: `submit_*` / `add_current_to_cart` enqueue a [`PendingAction`],
//! the caller drives [`dispatch`] on the [`MutationChannel`], then hands the
//! result back to [`StorefrontSession::settle`].

use crate::carousel::CarouselState;
use crate::cart::{
    project, Cart, CartAction, CartBadge, Merchandise, PendingAction, PendingQueue, ProductLink,
    ProjectedCart,
};
use crate::catalog::{display_image, display_price, Image, Product, Variant, VariantResolver};
use crate::catalog::Selection;
use crate::config::StorefrontConfig;
use crate::dto::{parse_mutation_response, MutationResponse};
use crate::error::StorefrontError;
use crate::events::CartVisibility;
use crate::ids::{ActionId, MerchandiseId, ProductId};
use crate::lifecycle::{MutationLifecycle, MutationOutcome};
use crate::money::{Currency, Money};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// The commerce backend's cart mutation endpoint.
///
/// Implementations send the action and return the raw response payload.
/// Interpreting it is the session's job, so a garbled body only fails the
/// one mutation it belongs to.
#[async_trait]
pub trait MutationChannel: Send + Sync {
    async fn submit(&self, action: &PendingAction) -> Result<serde_json::Value, StorefrontError>;
}

/// Send a pending action and interpret the response.
pub async fn dispatch<C>(channel: &C, pending: &PendingAction) -> Result<MutationResponse, StorefrontError>
where
    C: MutationChannel + ?Sized,
{
    debug!(action = %pending.id, kind = pending.action.kind(), "dispatching cart mutation");
    let payload = channel.submit(pending).await?;
    parse_mutation_response(payload)
}

/// State of the modal's add-to-cart button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddToCartButton {
    pub enabled: bool,
    pub sold_out: bool,
}

impl AddToCartButton {
    pub fn label(&self) -> &'static str {
        if self.sold_out {
            "SOLD OUT"
        } else {
            "ADD TO CART"
        }
    }
}

type CloseHandler = Box<dyn FnMut(&ProductId) + Send>;

/// One visitor's storefront state.
pub struct StorefrontSession {
    config: StorefrontConfig,
    resolver: VariantResolver,
    currency: Currency,
    server_cart: Option<Cart>,
    pending: PendingQueue,
    products: Vec<Product>,
    carousel: CarouselState,
    selection: Selection,
    lifecycle: MutationLifecycle,
    visibility: CartVisibility,
    on_close: Option<CloseHandler>,
}

impl StorefrontSession {
    pub fn new(config: StorefrontConfig) -> Result<Self, StorefrontError> {
        config.validate()?;
        Ok(Self {
            resolver: config.resolver(),
            currency: config.currency()?,
            config,
            server_cart: None,
            pending: PendingQueue::new(),
            products: Vec::new(),
            carousel: CarouselState::default(),
            selection: Selection::new(),
            lifecycle: MutationLifecycle::new(),
            visibility: CartVisibility::default(),
            on_close: None,
        })
    }

    /// Run `handler` when the modal auto-closes after a successful add.
    pub fn on_close(&mut self, handler: impl FnMut(&ProductId) + Send + 'static) {
        self.on_close = Some(Box::new(handler));
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Cart
    // ------------------------------------------------------------------

    /// Replace the authoritative cart snapshot.
    pub fn receive_cart(&mut self, cart: Option<Cart>) {
        debug!(
            cart = ?cart.as_ref().map(|c| c.id.as_str()),
            pending = self.pending.len(),
            "received server cart"
        );
        self.server_cart = cart;
    }

    pub fn server_cart(&self) -> Option<&Cart> {
        self.server_cart.as_ref()
    }

    pub fn pending(&self) -> &[PendingAction] {
        self.pending.as_slice()
    }

    /// The cart as the visitor should see it right now.
    pub fn projected_cart(&self) -> ProjectedCart {
        project(self.server_cart.as_ref(), self.pending.as_slice())
    }

    pub fn cart_badge(&self) -> CartBadge {
        CartBadge::new(&self.projected_cart())
    }

    /// Enqueue a cart page action (quantity change, removal, add).
    pub fn submit_cart_action(&mut self, action: CartAction) -> Result<PendingAction, StorefrontError> {
        if let CartAction::AddLine {
            merchandise,
            quantity,
            ..
        } = &action
        {
            self.check_line_limit(&merchandise.id, *quantity)?;
        }
        if let CartAction::UpdateLine { quantity, .. } = &action {
            if *quantity > self.config.max_line_quantity {
                return Err(StorefrontError::QuantityExceedsLimit(
                    *quantity,
                    self.config.max_line_quantity,
                ));
            }
        }
        let pending = self.pending.submit(action)?;
        info!(action = %pending.id, kind = pending.action.kind(), "cart action submitted");
        Ok(pending)
    }

    /// Record the result of a dispatched action.
    ///
    /// Removes exactly that action from the pending queue, adopts the
    /// returned cart, and advances the modal's lifecycle if the action is
    /// the one it tracks. An unusable response settles as a rejection.
    pub fn settle(
        &mut self,
        id: ActionId,
        result: Result<MutationResponse, StorefrontError>,
    ) -> MutationOutcome {
        if self.pending.settle(id).is_none() {
            warn!(action = %id, "settling an action that is not pending");
        }

        let outcome = match result {
            Ok(response) => {
                if let Some(cart) = response.cart {
                    self.server_cart = Some(cart);
                }
                MutationOutcome::from_errors(response.errors)
            }
            Err(e) => {
                warn!(action = %id, error = %e, "cart mutation failed");
                MutationOutcome::Failure(vec![e.to_string()])
            }
        };

        if let MutationOutcome::Failure(errors) = &outcome {
            warn!(action = %id, ?errors, "cart mutation rejected");
        }

        if self.lifecycle.settle(id, outcome.clone()) {
            if let Some(product_id) = self.lifecycle.product_id().cloned() {
                if let Some(handler) = self.on_close.as_mut() {
                    handler(&product_id);
                }
            }
            self.close_product();
        }
        outcome
    }

    fn check_line_limit(&self, merchandise: &MerchandiseId, adding: i64) -> Result<(), StorefrontError> {
        let projected = self.projected_cart();
        let existing = projected
            .lines
            .iter()
            .find(|l| &l.merchandise.id == merchandise)
            .map(|l| l.quantity)
            .unwrap_or(0);
        let total = existing.checked_add(adding).ok_or(StorefrontError::Overflow)?;
        if total > self.config.max_line_quantity {
            return Err(StorefrontError::QuantityExceedsLimit(
                total,
                self.config.max_line_quantity,
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Catalog and modal
    // ------------------------------------------------------------------

    /// Take the product list once the browsing grid has it.
    ///
    /// An empty load is ignored. A later non-empty load replaces the list
    /// as a new instance.
    pub fn receive_products(&mut self, products: Vec<Product>) {
        if products.is_empty() {
            debug!("ignoring empty product load");
            return;
        }
        let ids: Vec<ProductId> = products.iter().map(|p| p.id.clone()).collect();
        self.carousel = if self.carousel.is_empty() {
            CarouselState::capture(ids)
        } else {
            info!(count = ids.len(), "replacing carousel product list");
            self.carousel.replace_list(ids)
        };
        self.products = products;
        self.sync_viewed_product();
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn carousel(&self) -> &CarouselState {
        &self.carousel
    }

    /// Open the modal on a product from the grid.
    pub fn open_product(&mut self, product_id: &ProductId) {
        self.carousel = self.carousel.select_explicit(product_id);
        self.sync_viewed_product();
    }

    pub fn close_product(&mut self) {
        self.carousel = self.carousel.close();
        self.sync_viewed_product();
    }

    pub fn next_product(&mut self) {
        self.carousel = self.carousel.next();
        self.sync_viewed_product();
    }

    pub fn prev_product(&mut self) {
        self.carousel = self.carousel.prev();
        self.sync_viewed_product();
    }

    /// Product the modal shows.
    pub fn current_product(&self) -> Option<&Product> {
        let id = self.carousel.current()?;
        self.products.iter().find(|p| &p.id == id)
    }

    /// Variant the modal shows and would add.
    pub fn current_variant(&self) -> Option<&Variant> {
        let product = self.current_product()?;
        self.selection.current(&self.resolver, product)
    }

    /// Size values for the picker.
    pub fn size_values(&self) -> &[String] {
        match self.current_product() {
            Some(product) => self.resolver.size_values(product),
            None => &[],
        }
    }

    pub fn is_size_selected(&self, value: &str) -> bool {
        self.current_variant()
            .map(|v| self.resolver.is_size_selected(v, value))
            .unwrap_or(false)
    }

    /// Pick a size. An unknown size leaves the current variant alone.
    pub fn select_size(&mut self, value: &str) -> Option<&Variant> {
        let name = self.resolver.size_option_name().to_string();
        self.select_option(&name, value)
    }

    /// Pick the variant carrying `{option_name: value}`.
    pub fn select_option(&mut self, option_name: &str, value: &str) -> Option<&Variant> {
        let id = self.carousel.current()?;
        let product = self.products.iter().find(|p| &p.id == id)?;
        let chosen = self
            .selection
            .select_option(&self.resolver, product, option_name, value);
        if chosen.is_none() {
            debug!(option = option_name, value, "no variant for option value");
        }
        chosen
    }

    pub fn display_price(&self) -> Option<Money> {
        let product = self.current_product()?;
        Some(display_price(product, self.current_variant(), self.currency))
    }

    pub fn display_image(&self) -> Option<&Image> {
        let product = self.current_product()?;
        display_image(product, self.current_variant())
    }

    pub fn lifecycle(&self) -> &MutationLifecycle {
        &self.lifecycle
    }

    pub fn add_to_cart_button(&self) -> AddToCartButton {
        let variant = self.current_variant();
        let available = variant.map(|v| v.available_for_sale).unwrap_or(false);
        AddToCartButton {
            enabled: available && self.lifecycle.is_idle(),
            sold_out: !available,
        }
    }

    /// Add the modal's current variant to the cart.
    ///
    /// Returns `Ok(None)` when the button would be disabled: nothing is
    /// viewed, the variant is unavailable, or an add is already in flight.
    pub fn add_current_to_cart(&mut self) -> Result<Option<PendingAction>, StorefrontError> {
        if !self.add_to_cart_button().enabled {
            return Ok(None);
        }
        let (Some(product), Some(variant)) = (self.current_product(), self.current_variant()) else {
            return Ok(None);
        };

        let merchandise = Merchandise {
            id: MerchandiseId::from(&variant.id),
            title: Some(variant.title.clone().unwrap_or_else(|| variant.build_name())),
            image: variant.image.clone().or_else(|| product.featured_image.clone()),
            product: Some(ProductLink {
                id: Some(product.id.clone()),
                handle: product.handle.clone(),
                title: Some(product.title.clone()),
            }),
        };
        let action = CartAction::AddLine {
            merchandise,
            quantity: self.config.add_quantity,
            unit_price: variant.price,
        };

        let pending = self.submit_cart_action(action)?;
        self.lifecycle.submit(pending.id);
        Ok(Some(pending))
    }

    fn sync_viewed_product(&mut self) {
        let current = self.carousel.current().cloned();
        self.selection.track(current.as_ref());
        self.lifecycle.track(current.as_ref());
    }

    // ------------------------------------------------------------------
    // Cart view
    // ------------------------------------------------------------------

    pub fn cart_visibility(&self) -> &CartVisibility {
        &self.visibility
    }

    pub fn cart_visibility_mut(&mut self) -> &mut CartVisibility {
        &mut self.visibility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductOption;
    use crate::cart::{CartLine, ProductLink};
    use crate::ids::LineId;
    use std::sync::{Arc, Mutex};

    fn catalog() -> Vec<Product> {
        let price = Money::new(6500, Currency::USD);
        let mut hoodie = Product::new("p-hoodie", "Signal Hoodie")
            .with_option(ProductOption::new("Size", ["S", "M", "L"]))
            .with_variant(Variant::new("v-hoodie-s", price).with_option("Size", "S"))
            .with_variant(Variant::new("v-hoodie-m", price).with_option("Size", "M"))
            .with_variant(Variant::new("v-hoodie-l", price).with_option("Size", "L"));
        hoodie.handle = Some("signal-hoodie".to_string());
        let cap = Product::new("p-cap", "Noise Cap")
            .with_variant(Variant::new("v-cap", Money::new(3000, Currency::USD)).sold_out());
        let empty = Product::new("p-void", "Void");
        vec![hoodie, cap, empty]
    }

    fn session() -> StorefrontSession {
        let mut session = StorefrontSession::new(StorefrontConfig::default()).unwrap();
        session.receive_cart(Some(Cart::new("cart-1")));
        session.receive_products(catalog());
        session
    }

    fn confirmed(cart: Cart) -> Result<MutationResponse, StorefrontError> {
        Ok(MutationResponse {
            cart: Some(cart),
            errors: Vec::new(),
        })
    }

    fn server_cart(lines: &[(&str, i64)]) -> Cart {
        Cart::with_lines(
            "cart-1",
            lines
                .iter()
                .enumerate()
                .map(|(i, (merch, qty))| CartLine {
                    id: LineId::new(format!("line-{i}")),
                    merchandise: Merchandise::new(*merch)
                        .with_product(ProductLink::new("p", "handle")),
                    quantity: *qty,
                    unit_price: None,
                })
                .collect(),
        )
    }

    #[test]
    fn test_open_resolves_default_variant() {
        let mut session = session();
        session.open_product(&ProductId::new("p-hoodie"));
        assert_eq!(session.current_variant().unwrap().id.as_str(), "v-hoodie-s");
        assert_eq!(session.size_values(), ["S", "M", "L"]);
        assert!(session.is_size_selected("S"));
    }

    #[test]
    fn test_navigation_resets_selection() {
        let mut session = session();
        session.open_product(&ProductId::new("p-hoodie"));
        session.select_size("L");
        assert_eq!(session.current_variant().unwrap().id.as_str(), "v-hoodie-l");

        session.next_product();
        session.prev_product();
        assert_eq!(session.current_variant().unwrap().id.as_str(), "v-hoodie-s");
    }

    #[test]
    fn test_unknown_size_keeps_selection() {
        let mut session = session();
        session.open_product(&ProductId::new("p-hoodie"));
        session.select_size("M");
        assert!(session.select_size("XXL").is_none());
        assert_eq!(session.current_variant().unwrap().id.as_str(), "v-hoodie-m");
    }

    #[test]
    fn test_button_states() {
        let mut session = session();
        assert!(!session.add_to_cart_button().enabled);

        session.open_product(&ProductId::new("p-cap"));
        let button = session.add_to_cart_button();
        assert!(!button.enabled);
        assert_eq!(button.label(), "SOLD OUT");

        session.open_product(&ProductId::new("p-void"));
        assert!(session.current_variant().is_none());
        assert_eq!(session.add_to_cart_button().label(), "SOLD OUT");
        assert!(session.add_current_to_cart().unwrap().is_none());
    }

    #[test]
    fn test_add_shows_optimistically_and_closes_once() {
        let closed = Arc::new(Mutex::new(Vec::new()));
        let mut session = session();
        let sink = Arc::clone(&closed);
        session.on_close(move |id| sink.lock().unwrap().push(id.clone()));

        session.open_product(&ProductId::new("p-hoodie"));
        session.select_size("M");
        let pending = session.add_current_to_cart().unwrap().unwrap();

        assert_eq!(session.cart_badge().count, 1);
        assert!(!session.add_to_cart_button().enabled);
        assert!(session.add_current_to_cart().unwrap().is_none());

        let outcome = session.settle(pending.id, confirmed(server_cart(&[("v-hoodie-m", 1)])));
        assert!(outcome.is_success());
        assert!(!session.carousel().is_open());
        assert_eq!(closed.lock().unwrap().as_slice(), [ProductId::new("p-hoodie")]);
        assert_eq!(session.projected_cart().total_quantity, 1);

        // A repeated settlement of the same response does nothing.
        session.settle(pending.id, confirmed(server_cart(&[("v-hoodie-m", 1)])));
        assert_eq!(closed.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_rejection_keeps_modal_open() {
        let mut session = session();
        session.open_product(&ProductId::new("p-hoodie"));
        let pending = session.add_current_to_cart().unwrap().unwrap();

        let outcome = session.settle(
            pending.id,
            Ok(MutationResponse {
                cart: None,
                errors: vec!["Not enough stock".to_string()],
            }),
        );
        assert!(!outcome.is_success());
        assert!(session.carousel().is_open());
        assert_eq!(session.lifecycle().last_errors(), ["Not enough stock".to_string()]);
        assert_eq!(session.projected_cart().total_quantity, 0);
        assert!(session.add_to_cart_button().enabled);
    }

    #[test]
    fn test_malformed_response_settles_as_rejection() {
        let mut session = session();
        session.open_product(&ProductId::new("p-hoodie"));
        let pending = session.add_current_to_cart().unwrap().unwrap();

        let result = parse_mutation_response(serde_json::json!("bad gateway"));
        let outcome = session.settle(pending.id, result);
        assert!(matches!(outcome, MutationOutcome::Failure(_)));
        assert!(session.pending().is_empty());
        assert!(session.carousel().is_open());
    }

    #[test]
    fn test_provisional_line_carries_variant_details() {
        let mut session = session();
        session.open_product(&ProductId::new("p-hoodie"));
        session.select_size("M");
        session.add_current_to_cart().unwrap().unwrap();

        let projected = session.projected_cart();
        let line = &projected.lines[0];
        assert!(line.id.is_provisional());
        assert_eq!(line.merchandise.title.as_deref(), Some("M"));
        assert!(line.is_renderable());
        assert_eq!(projected.subtotal_label(), "$65.00");
    }

    #[test]
    fn test_impossible_quantities_settle_as_rejection() {
        let mut session = session();
        session.open_product(&ProductId::new("p-hoodie"));
        let pending = session.add_current_to_cart().unwrap().unwrap();

        let result = parse_mutation_response(serde_json::json!({
            "cart": {
                "id": "cart-1",
                "lines": { "nodes": [
                    { "id": "l-1", "quantity": i64::MAX, "merchandise": { "id": "v-hoodie-s" } },
                    { "id": "l-2", "quantity": 1, "merchandise": { "id": "v-hoodie-m" } }
                ]}
            },
            "userErrors": []
        }));
        let outcome = session.settle(pending.id, result);

        assert!(matches!(outcome, MutationOutcome::Failure(_)));
        assert!(session.pending().is_empty());
        assert!(session.carousel().is_open());
        assert_eq!(session.server_cart().unwrap().total_quantity, 0);
    }

    #[test]
    fn test_navigating_away_keeps_mutation_but_not_close() {
        let closed = Arc::new(Mutex::new(0));
        let mut session = session();
        let sink = Arc::clone(&closed);
        session.on_close(move |_| *sink.lock().unwrap() += 1);

        session.open_product(&ProductId::new("p-hoodie"));
        let pending = session.add_current_to_cart().unwrap().unwrap();
        session.next_product();

        session.settle(pending.id, confirmed(server_cart(&[("v-hoodie-s", 1)])));
        assert_eq!(*closed.lock().unwrap(), 0);
        assert_eq!(session.carousel().current().unwrap().as_str(), "p-cap");
        assert_eq!(session.server_cart().unwrap().total_quantity, 1);
    }

    #[test]
    fn test_line_limit_enforced() {
        let config = StorefrontConfig {
            max_line_quantity: 2,
            ..StorefrontConfig::default()
        };
        let mut session = StorefrontSession::new(config).unwrap();
        session.receive_cart(Some(server_cart(&[("v-hoodie-s", 2)])));
        session.receive_products(catalog());
        session.open_product(&ProductId::new("p-hoodie"));

        assert!(matches!(
            session.add_current_to_cart(),
            Err(StorefrontError::QuantityExceedsLimit(3, 2))
        ));
        assert!(session.lifecycle().is_idle());
    }

    #[test]
    fn test_empty_product_load_ignored() {
        let mut session = session();
        session.open_product(&ProductId::new("p-cap"));
        session.receive_products(Vec::new());
        assert_eq!(session.carousel().len(), 3);
        assert!(session.carousel().is_open());
    }

    #[test]
    fn test_display_price_uses_fallback_currency() {
        let config = StorefrontConfig {
            fallback_currency: "EUR".to_string(),
            ..StorefrontConfig::default()
        };
        let mut session = StorefrontSession::new(config).unwrap();
        session.receive_products(catalog());
        session.open_product(&ProductId::new("p-void"));
        assert_eq!(session.display_price().unwrap(), Money::zero(Currency::EUR));
    }
}
