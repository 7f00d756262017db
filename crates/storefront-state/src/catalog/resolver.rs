//! Variant resolution.
//!
//! Picks the variant a product modal shows and buys, from the product's
//! variant list and whatever the user explicitly chose.

use crate::catalog::{Product, SelectedOption, Variant};
use crate::ids::{ProductId, VariantId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Option name the size picker is built from.
pub const DEFAULT_SIZE_OPTION: &str = "Size";

/// Resolves the active variant of a product.
///
/// Option names compare exactly, except the size option, which also matches
/// in any letter case. Backend data has been seen with both "Size" and
/// "size"; other options have not, so they stay strict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantResolver {
    size_option_name: String,
}

impl VariantResolver {
    pub fn new(size_option_name: impl Into<String>) -> Self {
        Self {
            size_option_name: size_option_name.into(),
        }
    }

    pub fn size_option_name(&self) -> &str {
        &self.size_option_name
    }

    /// Resolve the variant to display.
    ///
    /// An explicit choice belonging to the product wins. Otherwise the first
    /// variant in backend order. `None` means nothing is purchasable.
    pub fn resolve<'p>(&self, product: &'p Product, explicit: Option<&Variant>) -> Option<&'p Variant> {
        if let Some(variant) = explicit.and_then(|v| product.get_variant(&v.id)) {
            return Some(variant);
        }
        product.variants.first()
    }

    /// Find the variant carrying `{option_name: value}`.
    ///
    /// Values compare case-sensitively. Returns `None` when no variant
    /// matches; the caller keeps its current selection in that case.
    pub fn resolve_by_selected_option_value<'p>(
        &self,
        product: &'p Product,
        option_name: &str,
        value: &str,
    ) -> Option<&'p Variant> {
        product
            .variants
            .iter()
            .find(|v| v.selected_options.iter().any(|o| self.option_matches(o, option_name, value)))
    }

    /// Values of the product's size option, in declaration order.
    pub fn size_values<'p>(&self, product: &'p Product) -> &'p [String] {
        product
            .options
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(&self.size_option_name))
            .map(|o| o.values.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the variant's size is `value`, for highlighting the picker.
    pub fn is_size_selected(&self, variant: &Variant, value: &str) -> bool {
        variant
            .selected_options
            .iter()
            .any(|o| self.option_matches(o, &self.size_option_name, value))
    }

    fn option_matches(&self, option: &SelectedOption, name: &str, value: &str) -> bool {
        option.value == value && self.names_match(&option.name, name)
    }

    fn names_match(&self, a: &str, b: &str) -> bool {
        a == b
            || (a.eq_ignore_ascii_case(&self.size_option_name)
                && b.eq_ignore_ascii_case(&self.size_option_name))
    }
}

impl Default for VariantResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE_OPTION)
    }
}

/// The user's variant choice for the product currently on screen.
///
/// Bound to one product identity; [`track`](Self::track) clears the choice
/// whenever that identity changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    product_id: Option<ProductId>,
    explicit: Option<VariantId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the product on screen. Returns `true` if it changed, in which
    /// case any explicit choice was discarded.
    pub fn track(&mut self, product_id: Option<&ProductId>) -> bool {
        if self.product_id.as_ref() == product_id {
            return false;
        }
        debug!(
            from = ?self.product_id,
            to = ?product_id,
            "viewed product changed, clearing variant selection"
        );
        self.product_id = product_id.cloned();
        self.explicit = None;
        true
    }

    pub fn product_id(&self) -> Option<&ProductId> {
        self.product_id.as_ref()
    }

    pub fn explicit(&self) -> Option<&VariantId> {
        self.explicit.as_ref()
    }

    /// Record an explicit choice.
    pub fn choose(&mut self, variant: &Variant) {
        self.explicit = Some(variant.id.clone());
    }

    /// Variant currently shown for `product`.
    pub fn current<'p>(&self, resolver: &VariantResolver, product: &'p Product) -> Option<&'p Variant> {
        if self.product_id.as_ref() != Some(&product.id) {
            return resolver.resolve(product, None);
        }
        let explicit = self.explicit.as_ref().and_then(|id| product.get_variant(id));
        resolver.resolve(product, explicit)
    }

    /// Pick the variant with the given option value.
    ///
    /// On a failed match the previous choice stays in place and `None` is
    /// returned.
    pub fn select_option<'p>(
        &mut self,
        resolver: &VariantResolver,
        product: &'p Product,
        option_name: &str,
        value: &str,
    ) -> Option<&'p Variant> {
        self.track(Some(&product.id));
        let variant = resolver.resolve_by_selected_option_value(product, option_name, value)?;
        self.choose(variant);
        Some(variant)
    }
}
