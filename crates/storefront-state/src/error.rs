//! Storefront error types.

use thiserror::Error;

/// Errors that can occur while reconciling storefront state.
///
/// Conditions the storefront treats as ordinary state (a missing cart anchor,
/// an unresolvable variant, a rejected mutation) are not represented here;
/// they surface as values instead.
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in cart calculation")]
    Overflow,

    /// Response from the commerce backend could not be interpreted.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The mutation channel failed before producing a response.
    #[error("Mutation channel error: {0}")]
    Channel(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for StorefrontError {
    fn from(e: serde_json::Error) -> Self {
        StorefrontError::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for StorefrontError {
    fn from(e: toml::de::Error) -> Self {
        StorefrontError::ConfigError(e.to_string())
    }
}
