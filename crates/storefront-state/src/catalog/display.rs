//! What the product modal shows for the resolved variant.

use crate::catalog::{Image, Product, Variant};
use crate::money::{Currency, Money};

/// Price to show: the variant's, then the product's cheapest, then zero.
pub fn display_price(product: &Product, variant: Option<&Variant>, fallback: Currency) -> Money {
    variant
        .and_then(|v| v.price)
        .or(product.min_variant_price)
        .unwrap_or_else(|| Money::zero(fallback))
}

/// Image to show: the variant's, then the product's featured image.
pub fn display_image<'p>(product: &'p Product, variant: Option<&'p Variant>) -> Option<&'p Image> {
    variant
        .and_then(|v| v.image.as_ref())
        .or(product.featured_image.as_ref())
}
