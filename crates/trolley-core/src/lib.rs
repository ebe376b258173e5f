//! # trolley-core: Pure Basket Logic for Trolley
//!
//! This crate is the **heart** of Trolley. It defines what a basket is and how
//! it changes, as plain values with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Trolley Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                trolley-api (Axum HTTP gateway)                  │   │
//! │  │   POST /cart ─ GET /cart/{id} ─ POST/PUT/DELETE .../items       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            trolley-store (BasketStore, sliding expiry)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ trolley-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Basket   │  │   Money   │  │ Resolver  │  │  sku, qty │  │   │
//! │  │   │BasketItem │  │           │  │ Catalogue │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOCKS • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Basket, BasketItem, BasketTotals
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - PricingResolver trait and the flat/catalogue resolvers
//! - [`error`] - Domain error types
//! - [`validation`] - Quantity and SKU rules
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use trolley_core::{Basket, Money};
//!
//! let mut basket = Basket::new(Utc::now());
//! basket.add_item("ITEM_123", 2, Money::from_cents(10)).unwrap();
//!
//! assert_eq!(basket.totals().subtotal.cents(), 20);
//! assert_eq!(basket.totals().item_count, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use trolley_core::Money` instead of
// `use trolley_core::money::Money`

pub use error::{BasketError, BasketResult, ValidationError};
pub use money::Money;
pub use pricing::{CatalogPricing, FlatRatePricing, PricingError, PricingResolver};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default sliding expiry window for baskets (15 minutes).
pub const DEFAULT_EXPIRY_WINDOW: std::time::Duration = std::time::Duration::from_secs(15 * 60);

/// Unit price used by `FlatRatePricing::default()`.
pub const DEFAULT_UNIT_PRICE: Money = Money::from_cents(10);

/// Maximum quantity of a single basket line.
///
/// ## Business Reason
/// Keeps `quantity × unit_price` far away from integer overflow and catches
/// accidental over-ordering.
pub const MAX_ITEM_QUANTITY: i64 = 9_999;

/// Maximum SKU length accepted at the gateway.
pub const MAX_SKU_LENGTH: usize = 64;
