//! Client-side state engine for a headless storefront.
//!
//! This crate keeps what the visitor sees consistent while the commerce
//! backend catches up:
//!
//! - **Cart**: server snapshots, pending actions, and the optimistic projection
//! - **Catalog**: products, variants, and variant resolution for the modal
//! - **Carousel**: cyclic paging through the captured product list
//! - **Lifecycle**: the add-to-cart mutation and its one-shot close
//! - **Session**: the shell composing all of the above
//!
//! # Example
//!
//! ```rust
//! use storefront_state::prelude::*;
//!
//! let mut session = StorefrontSession::new(StorefrontConfig::default()).unwrap();
//! session.receive_cart(Some(Cart::new("cart-1")));
//! session.receive_products(vec![Product::new("p-1", "Hoodie")
//!     .with_variant(Variant::new("v-1", Money::new(6500, Currency::USD)))]);
//!
//! session.open_product(&ProductId::new("p-1"));
//! let pending = session.add_current_to_cart().unwrap().unwrap();
//! assert_eq!(session.cart_badge().label(), "Cart (1)");
//!
//! session.settle(pending.id, Err(StorefrontError::Channel("offline".into())));
//! assert_eq!(session.cart_badge().label(), "Cart");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod carousel;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod dto;
pub mod events;
pub mod lifecycle;
pub mod session;

pub use error::StorefrontError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::StorefrontError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{
        project, Cart, CartAction, CartBadge, CartLine, DiscountCode, LineTarget, Merchandise,
        PendingAction, PendingQueue, ProductLink, ProjectedCart,
    };

    // Catalog
    pub use crate::catalog::{
        display_image, display_price, Image, Product, ProductOption, SelectedOption, Selection,
        Variant, VariantResolver,
    };

    // Modal and session
    pub use crate::carousel::CarouselState;
    pub use crate::config::StorefrontConfig;
    pub use crate::dto::{parse_cart, parse_mutation_response, parse_products, MutationResponse};
    pub use crate::events::{CartVisibility, CartVisibilityEvent};
    pub use crate::lifecycle::{LifecycleState, MutationLifecycle, MutationOutcome};
    pub use crate::session::{dispatch, AddToCartButton, MutationChannel, StorefrontSession};
}
