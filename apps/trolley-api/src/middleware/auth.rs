//! API-key authentication.
//!
//! Every cart route requires an `x-api-key` header equal to the configured
//! key. `/health` is mounted outside this layer.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware that rejects requests without the expected API key.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    let key_present = provided.is_some();
    let authorized =
        provided.is_some_and(|key| constant_time_eq(key.as_bytes(), state.api_key.as_bytes()));

    if !authorized {
        warn!(
            path = %request.uri().path(),
            key_present,
            "Rejected request with invalid API key"
        );
        return ApiError::unauthorized().into_response();
    }

    next.run(request).await
}

/// Compares two byte strings without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
