//! Cart module.
//!
//! Contains the server cart snapshot, pending actions, and the optimistic
//! projection that merges the two.

mod action;
mod badge;
mod cart;
mod projector;

pub use action::{CartAction, PendingAction, PendingQueue};
pub use badge::CartBadge;
pub use cart::{
    Cart, CartLine, DiscountCode, LineTarget, Merchandise, ProductLink, MAX_QUANTITY_PER_LINE,
};
pub use projector::{project, ProjectedCart};
