//! Storefront configuration.

use crate::cart::MAX_QUANTITY_PER_LINE;
use crate::catalog::{VariantResolver, DEFAULT_SIZE_OPTION};
use crate::error::StorefrontError;
use crate::money::Currency;
use serde::{Deserialize, Serialize};

/// Tunables for the storefront state engine.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Option name the size picker is built from.
    pub size_option_name: String,
    /// Units added per add-to-cart click.
    pub add_quantity: i64,
    /// Upper bound accepted for a single line.
    pub max_line_quantity: i64,
    /// Currency code for prices the backend left out.
    pub fallback_currency: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            size_option_name: DEFAULT_SIZE_OPTION.to_string(),
            add_quantity: 1,
            max_line_quantity: MAX_QUANTITY_PER_LINE,
            fallback_currency: Currency::USD.code().to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, StorefrontError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values are usable.
    pub fn validate(&self) -> Result<(), StorefrontError> {
        if self.size_option_name.trim().is_empty() {
            return Err(StorefrontError::ConfigError(
                "size_option_name must not be empty".to_string(),
            ));
        }
        if self.add_quantity <= 0 {
            return Err(StorefrontError::InvalidQuantity(self.add_quantity));
        }
        if self.max_line_quantity <= 0 || self.max_line_quantity > MAX_QUANTITY_PER_LINE {
            return Err(StorefrontError::ConfigError(format!(
                "max_line_quantity must be within 1..={}",
                MAX_QUANTITY_PER_LINE
            )));
        }
        if self.add_quantity > self.max_line_quantity {
            return Err(StorefrontError::QuantityExceedsLimit(
                self.add_quantity,
                self.max_line_quantity,
            ));
        }
        self.currency()?;
        Ok(())
    }

    /// The fallback currency as a [`Currency`].
    pub fn currency(&self) -> Result<Currency, StorefrontError> {
        Currency::from_code(&self.fallback_currency).ok_or_else(|| {
            StorefrontError::ConfigError(format!(
                "unknown fallback_currency {:?}",
                self.fallback_currency
            ))
        })
    }

    /// Resolver honouring the configured size option name.
    pub fn resolver(&self) -> VariantResolver {
        VariantResolver::new(self.size_option_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = StorefrontConfig::from_toml_str("").unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.currency().unwrap(), Currency::USD);
    }

    #[test]
    fn test_partial_document() {
        let config = StorefrontConfig::from_toml_str(
            r#"
            size_option_name = "Taille"
            fallback_currency = "EUR"
            "#,
        )
        .unwrap();
        assert_eq!(config.size_option_name, "Taille");
        assert_eq!(config.add_quantity, 1);
        assert_eq!(config.currency().unwrap(), Currency::EUR);
        assert_eq!(config.resolver().size_option_name(), "Taille");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            StorefrontConfig::from_toml_str("add_quantity = 0"),
            Err(StorefrontError::InvalidQuantity(0))
        ));
        assert!(StorefrontConfig::from_toml_str("fallback_currency = \"XYZ\"").is_err());
        assert!(StorefrontConfig::from_toml_str("max_line_quantity = 100000").is_err());
        assert!(StorefrontConfig::from_toml_str("size_option_name = \" \"").is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            StorefrontConfig::from_toml_str("add_quantity = \"lots\""),
            Err(StorefrontError::ConfigError(_))
        ));
    }
}
