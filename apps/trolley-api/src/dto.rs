//! Request and response bodies.
//!
//! Requests are strict: unknown fields fail deserialization and surface as
//! `INVALID_REQUEST`.

use serde::{Deserialize, Serialize};
use trolley_core::{Basket, BasketItem, BasketTotals, Money};

// =============================================================================
// Requests
// =============================================================================

/// `POST /cart` body. Only `{}` (or no body at all) is accepted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCartRequest {}

/// `POST /cart/{cartId}/items` body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddItemRequest {
    pub sku: String,
    pub quantity: i64,
}

/// `PUT /cart/{cartId}/items/{itemId}` body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateItemRequest {
    pub quantity: i64,
}

// =============================================================================
// Responses
// =============================================================================

/// Basket as returned by every cart route.
///
/// Timestamps stay internal; clients only see ids, lines and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketResponse {
    pub cart_id: String,
    pub items: Vec<BasketItemResponse>,
    pub totals: BasketTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketItemResponse {
    pub item_id: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
}

impl From<&BasketItem> for BasketItemResponse {
    fn from(item: &BasketItem) -> Self {
        BasketItemResponse {
            item_id: item.id().to_string(),
            sku: item.sku().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
            total_price: item.total_price(),
        }
    }
}

impl From<Basket> for BasketResponse {
    fn from(basket: Basket) -> Self {
        BasketResponse {
            cart_id: basket.id().to_string(),
            items: basket.items().iter().map(BasketItemResponse::from).collect(),
            totals: basket.totals(),
        }
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub baskets: usize,
}
