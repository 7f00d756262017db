//! Product and variant types.

use crate::ids::{ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product as listed in the browsing grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL handle.
    pub handle: Option<String>,
    /// Options in declaration order (e.g., Size).
    pub options: Vec<ProductOption>,
    /// Variants in the order the backend emitted them.
    pub variants: Vec<Variant>,
    /// Image shown when the variant has none.
    pub featured_image: Option<Image>,
    /// Cheapest variant price, used when no variant price is known.
    pub min_variant_price: Option<Money>,
}

impl Product {
    /// Create a product with no options or variants.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            handle: None,
            options: Vec::new(),
            variants: Vec::new(),
            featured_image: None,
            min_variant_price: None,
        }
    }

    /// Add an option.
    pub fn with_option(mut self, option: ProductOption) -> Self {
        self.options.push(option);
        self
    }

    /// Add a variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Get a variant by ID.
    pub fn get_variant(&self, variant_id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.id == variant_id)
    }
}

/// A product option and its permissible values (e.g., Size: S, M, L).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

impl ProductOption {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A purchasable configuration of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    /// Unique variant identifier.
    pub id: VariantId,
    /// Variant title (e.g., "L").
    pub title: Option<String>,
    /// Whether the backend will sell this variant.
    pub available_for_sale: bool,
    /// Price, when the backend reported a usable one.
    pub price: Option<Money>,
    /// One entry per product option.
    pub selected_options: Vec<SelectedOption>,
    pub image: Option<Image>,
}

impl Variant {
    /// Create an available variant with no options.
    pub fn new(id: impl Into<VariantId>, price: Money) -> Self {
        Self {
            id: id.into(),
            title: None,
            available_for_sale: true,
            price: Some(price),
            selected_options: Vec::new(),
            image: None,
        }
    }

    /// Add an option.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.selected_options.push(SelectedOption::new(name, value));
        self
    }

    /// Mark as sold out.
    pub fn sold_out(mut self) -> Self {
        self.available_for_sale = false;
        self
    }

    /// Name built from option values, used when the backend sent no title.
    pub fn build_name(&self) -> String {
        if self.selected_options.is_empty() {
            "Default".to_string()
        } else {
            self.selected_options
                .iter()
                .map(|o| o.value.as_str())
                .collect::<Vec<_>>()
                .join(" / ")
        }
    }
}

/// A variant's value for one option (e.g., Size: L).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SelectedOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Option value (e.g., "L").
    pub value: String,
}

impl SelectedOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An image reference from the backend CDN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt_text: None,
            width: None,
            height: None,
        }
    }
}
