//! Data-transfer types for commerce backend responses.
//!
//! Every field is optional: the backend's payloads are only loosely shaped
//! and the storefront must degrade rather than fail when data is missing.
//! Conversions into domain types drop what cannot be used and log it.

use crate::cart::{Cart, CartLine, DiscountCode, Merchandise, ProductLink, MAX_QUANTITY_PER_LINE};
use crate::catalog::{Image, Product, ProductOption, SelectedOption, Variant};
use crate::error::StorefrontError;
use crate::ids::{CartId, LineId, MerchandiseId, ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A GraphQL-style `{ nodes: [...] }` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Connection<T> {
    pub nodes: Option<Vec<T>>,
}

impl<T> Connection<T> {
    fn into_nodes(self) -> Vec<T> {
        self.nodes.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoneyDto {
    pub amount: Option<String>,
    pub currency_code: Option<String>,
}

impl MoneyDto {
    fn to_money(&self) -> Option<Money> {
        let amount = self.amount.as_deref()?;
        let code = self.currency_code.as_deref()?;
        match Money::parse(amount, code) {
            Ok(money) => Some(money),
            Err(e) => {
                warn!(error = %e, "ignoring unusable price");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageDto {
    pub url: Option<String>,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageDto {
    fn into_image(self) -> Option<Image> {
        Some(Image {
            url: self.url.filter(|u| !u.is_empty())?,
            alt_text: self.alt_text,
            width: self.width,
            height: self.height,
        })
    }
}

// ============================================================================
// Cart
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub id: Option<String>,
    pub lines: Option<Connection<CartLineDto>>,
    pub total_quantity: Option<i64>,
    pub discount_codes: Option<Vec<DiscountCodeDto>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDto {
    pub id: Option<String>,
    pub quantity: Option<i64>,
    pub cost: Option<CartLineCostDto>,
    pub merchandise: Option<MerchandiseDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCostDto {
    pub amount_per_quantity: Option<MoneyDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseDto {
    pub id: Option<String>,
    pub title: Option<String>,
    pub image: Option<ImageDto>,
    pub product: Option<ProductLinkDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductLinkDto {
    pub id: Option<String>,
    pub handle: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCodeDto {
    pub code: Option<String>,
    pub applicable: Option<bool>,
}

impl CartDto {
    /// Convert into a cart snapshot.
    ///
    /// A cart without an ID cannot anchor a projection and is rejected.
    /// Lines missing their own ID, merchandise ID or quantity are dropped;
    /// a quantity outside `0..=MAX_QUANTITY_PER_LINE` rejects the whole cart.
    /// The total is recomputed from the kept lines.
    pub fn into_cart(self) -> Result<Cart, StorefrontError> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| StorefrontError::MalformedResponse("cart has no id".to_string()))?;

        let lines: Vec<CartLine> = self
            .lines
            .map(Connection::into_nodes)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|line| line.into_line().transpose())
            .collect::<Result<_, _>>()?;

        let mut cart = Cart::with_lines(CartId::new(id), lines);
        if let Some(reported) = self.total_quantity {
            if reported != cart.total_quantity {
                warn!(
                    reported,
                    computed = cart.total_quantity,
                    "cart total quantity disagrees with its lines"
                );
            }
        }
        cart.discount_codes = self
            .discount_codes
            .unwrap_or_default()
            .into_iter()
            .filter_map(|d| {
                Some(DiscountCode {
                    code: d.code?,
                    applicable: d.applicable.unwrap_or(false),
                })
            })
            .collect();
        Ok(cart)
    }
}

impl CartLineDto {
    /// `Ok(None)` for an incomplete line; an error for an impossible quantity.
    fn into_line(self) -> Result<Option<CartLine>, StorefrontError> {
        let (Some(id), Some(quantity)) = (self.id, self.quantity) else {
            warn!("dropping cart line without id or quantity");
            return Ok(None);
        };
        if !(0..=MAX_QUANTITY_PER_LINE).contains(&quantity) {
            return Err(StorefrontError::MalformedResponse(format!(
                "cart line {id} has quantity {quantity}"
            )));
        }
        let Some(merchandise) = self.merchandise.and_then(MerchandiseDto::into_merchandise) else {
            warn!(line = %id, "dropping cart line without merchandise id");
            return Ok(None);
        };
        Ok(Some(CartLine {
            id: LineId::new(id),
            merchandise,
            quantity,
            unit_price: self
                .cost
                .and_then(|c| c.amount_per_quantity)
                .and_then(|m| m.to_money()),
        }))
    }
}

impl MerchandiseDto {
    fn into_merchandise(self) -> Option<Merchandise> {
        Some(Merchandise {
            id: MerchandiseId::new(self.id?),
            title: self.title,
            image: self.image.and_then(ImageDto::into_image),
            product: self.product.map(|p| ProductLink {
                id: p.id.map(ProductId::new),
                handle: p.handle,
                title: p.title,
            }),
        })
    }
}

// ============================================================================
// Products
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Option<String>,
    pub title: Option<String>,
    pub handle: Option<String>,
    pub options: Option<Vec<ProductOptionDto>>,
    pub variants: Option<Connection<VariantDto>>,
    pub featured_image: Option<ImageDto>,
    pub price_range: Option<PriceRangeDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeDto {
    pub min_variant_price: Option<MoneyDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductOptionDto {
    pub name: Option<String>,
    pub values: Option<Vec<OptionValueDto>>,
}

/// Option values arrive either as bare strings or as `{ "value": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OptionValueDto {
    Plain(String),
    Named { value: Option<String> },
}

impl OptionValueDto {
    fn into_value(self) -> Option<String> {
        match self {
            OptionValueDto::Plain(value) => Some(value),
            OptionValueDto::Named { value } => value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariantDto {
    pub id: Option<String>,
    pub title: Option<String>,
    pub available_for_sale: Option<bool>,
    pub price: Option<MoneyDto>,
    pub selected_options: Option<Vec<SelectedOptionDto>>,
    pub image: Option<ImageDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectedOptionDto {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl ProductDto {
    /// Convert into a product; `None` when the product has no ID.
    pub fn into_product(self) -> Option<Product> {
        let Some(id) = self.id.filter(|id| !id.is_empty()) else {
            warn!("dropping product without id");
            return None;
        };
        Some(Product {
            id: ProductId::new(id),
            title: self.title.unwrap_or_default(),
            handle: self.handle,
            options: self
                .options
                .unwrap_or_default()
                .into_iter()
                .filter_map(|o| {
                    Some(ProductOption {
                        name: o.name?,
                        values: o
                            .values
                            .unwrap_or_default()
                            .into_iter()
                            .filter_map(OptionValueDto::into_value)
                            .collect(),
                    })
                })
                .collect(),
            variants: self
                .variants
                .map(Connection::into_nodes)
                .unwrap_or_default()
                .into_iter()
                .filter_map(VariantDto::into_variant)
                .collect(),
            featured_image: self.featured_image.and_then(ImageDto::into_image),
            min_variant_price: self
                .price_range
                .and_then(|r| r.min_variant_price)
                .and_then(|m| m.to_money()),
        })
    }
}

impl VariantDto {
    /// Variants without an ID cannot be bought and are dropped. A missing
    /// availability flag reads as sold out.
    fn into_variant(self) -> Option<Variant> {
        Some(Variant {
            id: VariantId::new(self.id?),
            title: self.title,
            available_for_sale: self.available_for_sale.unwrap_or(false),
            price: self.price.and_then(|m| m.to_money()),
            selected_options: self
                .selected_options
                .unwrap_or_default()
                .into_iter()
                .filter_map(|o| Some(SelectedOption::new(o.name?, o.value?)))
                .collect(),
            image: self.image.and_then(ImageDto::into_image),
        })
    }
}

/// The product list query result, which has been seen both wrapped as
/// `{ products: { nodes } }` and bare as `{ nodes }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProductListDto {
    Wrapped { products: Connection<ProductDto> },
    Bare(Connection<ProductDto>),
}

/// Parse a product list payload into products, skipping unusable entries.
pub fn parse_products(payload: serde_json::Value) -> Result<Vec<Product>, StorefrontError> {
    let list: ProductListDto = serde_json::from_value(payload)?;
    let nodes = match list {
        ProductListDto::Wrapped { products } => products.into_nodes(),
        ProductListDto::Bare(connection) => connection.into_nodes(),
    };
    Ok(nodes.into_iter().filter_map(ProductDto::into_product).collect())
}

/// Parse a cart payload. `null` means the visitor has no cart yet.
pub fn parse_cart(payload: serde_json::Value) -> Result<Option<Cart>, StorefrontError> {
    let dto: Option<CartDto> = serde_json::from_value(payload)?;
    dto.map(CartDto::into_cart).transpose()
}

// ============================================================================
// Mutations
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponseDto {
    pub cart: Option<CartDto>,
    pub errors: Option<Vec<UserErrorDto>>,
    pub user_errors: Option<Vec<UserErrorDto>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserErrorDto {
    pub code: Option<String>,
    pub field: Option<Vec<String>>,
    pub message: Option<String>,
}

impl UserErrorDto {
    fn describe(self) -> String {
        self.message
            .or(self.code)
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

/// A settled cart mutation as the storefront sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResponse {
    /// Updated authoritative cart, if the backend returned one.
    pub cart: Option<Cart>,
    /// Error messages; empty means success.
    pub errors: Vec<String>,
}

/// Parse a mutation response payload.
///
/// Fails only when the payload is not shaped like a mutation response at
/// all, or carries a cart that cannot anchor a projection.
pub fn parse_mutation_response(
    payload: serde_json::Value,
) -> Result<MutationResponse, StorefrontError> {
    let dto: MutationResponseDto = serde_json::from_value(payload)?;
    let errors: Vec<String> = dto
        .errors
        .into_iter()
        .chain(dto.user_errors)
        .flatten()
        .map(UserErrorDto::describe)
        .collect();
    let cart = dto.cart.map(CartDto::into_cart).transpose()?;
    Ok(MutationResponse { cart, errors })
}
