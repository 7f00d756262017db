//! Product modal carousel.
//!
//! Pages cyclically through the product list captured from the browsing
//! grid. Transitions return a new state; the list itself is shared and never
//! edited, so replacing it means building a new instance.

use crate::ids::ProductId;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// The captured product list and which entry, if any, the modal shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselState {
    products: Arc<[ProductId]>,
    /// `None` when the modal is closed; otherwise `< products.len()`.
    index: Option<usize>,
}

impl CarouselState {
    /// Capture a list, dropping repeated IDs but keeping first-seen order.
    /// Nothing is selected.
    pub fn capture<I>(products: I) -> Self
    where
        I: IntoIterator<Item = ProductId>,
    {
        let mut seen = HashSet::new();
        let products: Vec<ProductId> = products
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Self {
            products: products.into(),
            index: None,
        }
    }

    /// Swap in a freshly loaded list.
    ///
    /// The viewed product stays selected if the new list still has it;
    /// otherwise the carousel closes rather than landing on an unrelated
    /// entry.
    pub fn replace_list<I>(&self, products: I) -> Self
    where
        I: IntoIterator<Item = ProductId>,
    {
        let mut next = Self::capture(products);
        if let Some(current) = self.current() {
            next.index = next.position(current);
            if next.index.is_none() {
                debug!(product = %current, "viewed product missing from new list, closing");
            }
        }
        next
    }

    /// Advance with wraparound. No-op when empty or closed.
    pub fn next(&self) -> Self {
        self.step(|i, len| (i + 1) % len)
    }

    /// Retreat with wraparound. No-op when empty or closed.
    pub fn prev(&self) -> Self {
        self.step(|i, len| (i + len - 1) % len)
    }

    /// Open the modal at `target`.
    ///
    /// A product outside the captured list leaves the state unchanged.
    pub fn select_explicit(&self, target: &ProductId) -> Self {
        match self.position(target) {
            Some(index) => Self {
                products: Arc::clone(&self.products),
                index: Some(index),
            },
            None => {
                warn!(product = %target, "selected product is not in the carousel list");
                self.clone()
            }
        }
    }

    /// Close the modal. The list is kept for the next open.
    pub fn close(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            index: None,
        }
    }

    /// Product the modal shows.
    pub fn current(&self) -> Option<&ProductId> {
        self.index.map(|i| &self.products[i])
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_open(&self) -> bool {
        self.index.is_some()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn products(&self) -> &[ProductId] {
        &self.products
    }

    /// Whether two states share the same captured list instance.
    pub fn same_list(&self, other: &CarouselState) -> bool {
        Arc::ptr_eq(&self.products, &other.products)
    }

    fn position(&self, target: &ProductId) -> Option<usize> {
        self.products.iter().position(|id| id == target)
    }

    fn step(&self, f: impl Fn(usize, usize) -> usize) -> Self {
        let len = self.products.len();
        match self.index {
            Some(i) if len > 0 => Self {
                products: Arc::clone(&self.products),
                index: Some(f(i, len)),
            },
            _ => self.clone(),
        }
    }
}

impl Default for CarouselState {
    fn default() -> Self {
        Self::capture(Vec::new())
    }
}
