//! # Validation Module
//!
//! Input validation utilities for basket operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP gateway (trolley-api)                                    │
//! │  ├── Type validation (strict JSON deserialization)                      │
//! │  └── validate_sku (this module)                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Basket store (trolley-store)                                  │
//! │  └── validate_add_quantity / validate_update_quantity (this module)     │
//! │      run BEFORE the basket is looked up                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Basket (types.rs)                                             │
//! │  └── merged quantity bound, overflow-checked line totals                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use trolley_core::validation::{validate_add_quantity, validate_sku};
//!
//! assert!(validate_sku("ITEM_123").is_ok());
//! assert!(validate_add_quantity(2).is_ok());
//! assert!(validate_add_quantity(0).is_err());
//! ```

use crate::error::{BasketError, BasketResult, ValidationError};
use crate::{MAX_ITEM_QUANTITY, MAX_SKU_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most `MAX_SKU_LENGTH` characters
/// - No whitespace or control characters
///
/// ## Example
/// ```rust
/// use trolley_core::validation::validate_sku;
///
/// assert!(validate_sku("COFFEE-1KG").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    if sku.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > MAX_SKU_LENGTH {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LENGTH,
        });
    }

    if sku.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must not contain whitespace or control characters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Quantity Validators
// =============================================================================

/// Validates the quantity passed to an add-item operation.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `MAX_ITEM_QUANTITY`
///
/// ## Flow
/// ```text
/// add_item(basket, sku, qty)
///      │
///      ▼
/// validate_add_quantity(qty) ← THIS FUNCTION (before basket lookup)
///      │
///      ├── qty <= 0?    → InvalidItemQuantity
///      ├── qty > max?   → InvalidItemQuantity
///      └── OK           → availability check
/// ```
pub fn validate_add_quantity(quantity: i64) -> BasketResult<()> {
    if quantity <= 0 {
        return Err(BasketError::invalid_quantity(
            quantity,
            "must be greater than zero",
        ));
    }

    check_upper_bound(quantity)
}

/// Validates the quantity passed to an update-quantity operation.
///
/// Zero is allowed and means "remove the line".
pub fn validate_update_quantity(quantity: i64) -> BasketResult<()> {
    if quantity < 0 {
        return Err(BasketError::invalid_quantity(
            quantity,
            "must not be negative",
        ));
    }

    check_upper_bound(quantity)
}

pub(crate) fn check_upper_bound(quantity: i64) -> BasketResult<()> {
    if quantity > MAX_ITEM_QUANTITY {
        return Err(BasketError::invalid_quantity(
            quantity,
            format!("must not exceed {}", MAX_ITEM_QUANTITY),
        ));
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
