//! # Pricing Module
//!
//! Maps a SKU to its unit price.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     PricingResolver Contract                            │
//! │                                                                         │
//! │  unit_price("ITEM_123") ──► Ok(Money)         deterministic per SKU    │
//! │                         └─► Err(Unpriceable)  no side effects          │
//! │                                                                         │
//! │  The store asks ONCE per basket line: the first time a SKU is added.   │
//! │  Later additions of the same SKU reuse the locked-in price.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resolver is handed to the store at construction time; there is no
//! global price table.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::money::Money;
use crate::DEFAULT_UNIT_PRICE;

// =============================================================================
// Pricing Error
// =============================================================================

/// Errors produced while pricing a SKU or loading a price table.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The resolver has no price for this SKU.
    #[error("No price available for SKU {0}")]
    Unpriceable(String),

    /// A price catalogue could not be parsed or contains invalid prices.
    #[error("Invalid price catalogue: {0}")]
    InvalidCatalog(String),
}

// =============================================================================
// Resolver Trait
// =============================================================================

/// Resolves the unit price of a SKU.
///
/// Implementations must be synchronous and side-effect free. The store calls
/// this outside of any basket lock, so a slow implementation only delays the
/// caller that triggered it.
pub trait PricingResolver: Send + Sync + fmt::Debug {
    /// Returns the unit price for `sku`, or [`PricingError::Unpriceable`].
    fn unit_price(&self, sku: &str) -> Result<Money, PricingError>;
}

// =============================================================================
// Flat Rate
// =============================================================================

/// Prices every SKU identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRatePricing {
    unit_price: Money,
}

impl FlatRatePricing {
    /// Creates a resolver that answers `unit_price` for every SKU.
    pub const fn new(unit_price: Money) -> Self {
        FlatRatePricing { unit_price }
    }
}

impl Default for FlatRatePricing {
    fn default() -> Self {
        FlatRatePricing::new(DEFAULT_UNIT_PRICE)
    }
}

impl PricingResolver for FlatRatePricing {
    fn unit_price(&self, _sku: &str) -> Result<Money, PricingError> {
        Ok(self.unit_price)
    }
}

// =============================================================================
// Catalogue
// =============================================================================

/// On-disk catalogue format.
///
/// ```toml
/// default_price = 10   # optional; used for SKUs not listed below
///
/// [prices]
/// ITEM_123 = 10
/// COFFEE-1KG = 1899
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    default_price: Option<i64>,
    #[serde(default)]
    prices: HashMap<String, i64>,
}

/// Table-driven resolver with an optional fallback price.
#[derive(Debug, Clone, Default)]
pub struct CatalogPricing {
    prices: HashMap<String, Money>,
    fallback: Option<Money>,
}

impl CatalogPricing {
    /// Creates an empty catalogue. Every lookup fails until prices are added.
    pub fn new() -> Self {
        CatalogPricing::default()
    }

    /// Adds (or replaces) the price of one SKU.
    pub fn with_price(mut self, sku: impl Into<String>, price: Money) -> Self {
        self.prices.insert(sku.into(), price);
        self
    }

    /// Sets the price used for SKUs missing from the table.
    pub fn with_fallback(mut self, price: Money) -> Self {
        self.fallback = Some(price);
        self
    }

    /// Parses a TOML catalogue.
    ///
    /// ## Errors
    /// [`PricingError::InvalidCatalog`] when the document does not parse or a
    /// price is negative.
    pub fn from_toml_str(source: &str) -> Result<Self, PricingError> {
        let file: CatalogFile =
            toml::from_str(source).map_err(|e| PricingError::InvalidCatalog(e.to_string()))?;

        let mut catalog = CatalogPricing::new();

        if let Some(cents) = file.default_price {
            catalog.fallback = Some(non_negative("default_price", cents)?);
        }

        for (sku, cents) in file.prices {
            let price = non_negative(&sku, cents)?;
            catalog.prices.insert(sku, price);
        }

        Ok(catalog)
    }

    /// Number of explicitly priced SKUs.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// True when no SKU is explicitly priced.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PricingResolver for CatalogPricing {
    fn unit_price(&self, sku: &str) -> Result<Money, PricingError> {
        self.prices
            .get(sku)
            .copied()
            .or(self.fallback)
            .ok_or_else(|| PricingError::Unpriceable(sku.to_string()))
    }
}

fn non_negative(key: &str, cents: i64) -> Result<Money, PricingError> {
    if cents < 0 {
        return Err(PricingError::InvalidCatalog(format!(
            "price for {} must not be negative (got {})",
            key, cents
        )));
    }
    Ok(Money::from_cents(cents))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_rate_prices_everything() {
        let pricing = FlatRatePricing::default();
        assert_eq!(pricing.unit_price("ITEM_123").unwrap(), DEFAULT_UNIT_PRICE);
        assert_eq!(pricing.unit_price("anything").unwrap().cents(), 10);
    }

    #[test]
    fn test_catalog_lookup_and_fallback() {
        let pricing = CatalogPricing::new()
            .with_price("COFFEE", Money::from_cents(1899))
            .with_fallback(Money::from_cents(5));

        assert_eq!(pricing.unit_price("COFFEE").unwrap().cents(), 1899);
        assert_eq!(pricing.unit_price("TEA").unwrap().cents(), 5);
    }

    #[test]
    fn test_catalog_without_fallback_is_unpriceable() {
        let pricing = CatalogPricing::new().with_price("COFFEE", Money::from_cents(1899));

        let err = pricing.unit_price("TEA").unwrap_err();
        assert!(matches!(err, PricingError::Unpriceable(ref sku) if sku == "TEA"));
    }

    #[test]
    fn test_catalog_from_toml() {
        let source = r#"
            default_price = 10

            [prices]
            ITEM_123 = 10
            "COFFEE-1KG" = 1899
        "#;

        let pricing = CatalogPricing::from_toml_str(source).unwrap();
        assert_eq!(pricing.len(), 2);
        assert_eq!(pricing.unit_price("COFFEE-1KG").unwrap().cents(), 1899);
        assert_eq!(pricing.unit_price("UNLISTED").unwrap().cents(), 10);
    }

    #[test]
    fn test_catalog_rejects_negative_and_unknown_keys() {
        let negative = "[prices]\nBAD = -1\n";
        assert!(matches!(
            CatalogPricing::from_toml_str(negative),
            Err(PricingError::InvalidCatalog(_))
        ));

        let unknown = "currency = \"USD\"\n";
        assert!(matches!(
            CatalogPricing::from_toml_str(unknown),
            Err(PricingError::InvalidCatalog(_))
        ));
    }
}
