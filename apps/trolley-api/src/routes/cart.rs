//! # Cart Handlers
//!
//! Thin translation between HTTP and `BasketStore`.
//!
//! ## Route Table
//! ```text
//! ┌────────┬──────────────────────────────────┬────────────────────┬────────┐
//! │ Method │ Path                             │ Store operation    │ Status │
//! ├────────┼──────────────────────────────────┼────────────────────┼────────┤
//! │ POST   │ /cart                            │ create_basket      │ 201    │
//! │ GET    │ /cart/{cartId}                   │ get_basket         │ 200    │
//! │ POST   │ /cart/{cartId}/items             │ add_item           │ 202    │
//! │ PUT    │ /cart/{cartId}/items/{itemId}    │ update_item_qty    │ 200    │
//! │ DELETE │ /cart/{cartId}/items/{itemId}    │ remove_item        │ 200    │
//! └────────┴──────────────────────────────────┴────────────────────┴────────┘
//! ```

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, info};
use trolley_core::validation::validate_sku;

use crate::dto::{AddItemRequest, BasketResponse, CreateCartRequest, UpdateItemRequest};
use crate::error::ApiError;
use crate::state::AppState;

type CartResult = Result<(StatusCode, Json<BasketResponse>), ApiError>;

/// `POST /cart`
///
/// The body may be absent. When present it must be `{}`.
pub async fn create_cart(State(state): State<AppState>, body: Bytes) -> CartResult {
    if !body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice::<CreateCartRequest>(&body)?;
    }

    let basket = state.store.create_basket();
    info!(cart_id = %basket.id(), "Cart created");

    Ok((StatusCode::CREATED, Json(basket.into())))
}

/// `GET /cart/{cartId}`
pub async fn get_cart(State(state): State<AppState>, Path(cart_id): Path<String>) -> CartResult {
    let basket = state.store.get_basket(&cart_id)?;
    debug!(cart_id = %cart_id, items = basket.items().len(), "Cart fetched");

    Ok((StatusCode::OK, Json(basket.into())))
}

/// `POST /cart/{cartId}/items`
pub async fn add_item(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> CartResult {
    let Json(request) = payload?;
    validate_sku(&request.sku)?;

    let basket = state
        .store
        .add_item(&cart_id, &request.sku, request.quantity)?;
    info!(
        cart_id = %cart_id,
        sku = %request.sku,
        quantity = request.quantity,
        "Item added to cart"
    );

    Ok((StatusCode::ACCEPTED, Json(basket.into())))
}

/// `PUT /cart/{cartId}/items/{itemId}`
///
/// A quantity of zero removes the line.
pub async fn update_item_quantity(
    State(state): State<AppState>,
    Path((cart_id, item_id)): Path<(String, String)>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> CartResult {
    let Json(request) = payload?;

    let basket = state
        .store
        .update_item_quantity(&cart_id, &item_id, request.quantity)?;
    info!(
        cart_id = %cart_id,
        item_id = %item_id,
        quantity = request.quantity,
        "Cart item quantity updated"
    );

    Ok((StatusCode::OK, Json(basket.into())))
}

/// `DELETE /cart/{cartId}/items/{itemId}`
pub async fn remove_item(
    State(state): State<AppState>,
    Path((cart_id, item_id)): Path<(String, String)>,
) -> CartResult {
    let basket = state.store.remove_item(&cart_id, &item_id)?;
    info!(cart_id = %cart_id, item_id = %item_id, "Item removed from cart");

    Ok((StatusCode::OK, Json(basket.into())))
}
