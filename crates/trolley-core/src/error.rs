//! # Error Types
//!
//! Domain-specific error types for trolley-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  trolley-core errors (this file)                                        │
//! │  ├── BasketError      - Failures of the five basket operations          │
//! │  │   └── Pricing      - wraps PricingError (pricing.rs)                 │
//! │  └── ValidationError  - Request field validation failures               │
//! │                                                                         │
//! │  trolley-api errors (app)                                               │
//! │  └── ApiError         - What HTTP clients see ({error, message})        │
//! │                                                                         │
//! │  Flow: PricingError → BasketError → ApiError → Response                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (basket ID, item ID, SKU)
//! 3. Errors are enum variants, never String
//! 4. Every failure is deterministic: nothing here is worth retrying

use thiserror::Error;

use crate::pricing::PricingError;

// =============================================================================
// Basket Error
// =============================================================================

/// Failures raised by basket operations.
///
/// The set is closed: the gateway matches on every variant to pick a status
/// code and a fixed public message.
#[derive(Debug, Error)]
pub enum BasketError {
    /// No basket with this id exists (never created, or already evicted).
    #[error("Basket {0} not found")]
    BasketNotFound(String),

    /// The basket existed but sat idle past its expiry window.
    ///
    /// ## When This Occurs
    /// ```text
    /// last access t=800ms, window 1000ms
    ///      │
    ///      ▼
    /// access at t=2800ms (idle 2000ms > 1000ms)
    ///      │
    ///      ▼
    /// basket removed from the store → BasketExpired
    ///      │
    ///      ▼
    /// next access → BasketNotFound
    /// ```
    #[error("Basket {0} is expired")]
    BasketExpired(String),

    /// Quantity rejected (non-positive on add, negative on update, or too large).
    #[error("Invalid item quantity {quantity}: {reason}")]
    InvalidItemQuantity { quantity: i64, reason: String },

    /// Item id not present within an otherwise valid basket.
    #[error("Item {item_id} does not exist in basket {basket_id}")]
    ItemNotFound { basket_id: String, item_id: String },

    /// The pricing resolver could not price a SKU.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),
}

impl BasketError {
    /// Convenience constructor for quantity failures.
    pub fn invalid_quantity(quantity: i64, reason: impl Into<String>) -> Self {
        BasketError::InvalidItemQuantity {
            quantity,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request fields don't meet requirements.
/// Used by the gateway before any store operation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., whitespace inside a SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with BasketError.
pub type BasketResult<T> = Result<T, BasketError>;

// =============================================================================
// Unit Tests
// =============================================================================
