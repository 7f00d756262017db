//! Product catalog module.
//!
//! Contains product and variant types and variant resolution.

mod display;
mod product;
mod resolver;

pub use display::{display_image, display_price};
pub use product::{Image, Product, ProductOption, SelectedOption, Variant};
pub use resolver::{Selection, VariantResolver, DEFAULT_SIZE_OPTION};
