//! # Trolley API
//!
//! HTTP gateway over the in-memory basket store.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  TraceLayer ─► CatchPanic ─► rate_limit ─► require_api_key ─► handler   │
//! │                                   │               │              │      │
//! │                                   ▼               ▼              ▼      │
//! │                                  429             401      BasketStore   │
//! │                                                                         │
//! │  /health is rate limited but needs no API key.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use std::any::Any;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Builds the full router with middleware in place.
pub fn build_router(state: AppState) -> Router {
    let cart_routes = Router::new()
        .route("/cart", post(routes::cart::create_cart))
        .route("/cart/{cart_id}", get(routes::cart::get_cart))
        .route("/cart/{cart_id}/items", post(routes::cart::add_item))
        .route(
            "/cart/{cart_id}/items/{item_id}",
            put(routes::cart::update_item_quantity).delete(routes::cart::remove_item),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_api_key,
        ));

    Router::new()
        .merge(cart_routes)
        .route("/health", get(routes::health))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");
    ApiError::internal().into_response()
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - Default: `info,trolley=debug,tower_http=info`
/// - Override with `RUST_LOG`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,trolley=debug,tower_http=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
