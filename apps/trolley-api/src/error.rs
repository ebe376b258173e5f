//! # API Error Type
//!
//! Unified error type for HTTP handlers and middleware.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Handler                                                                │
//! │  Result<T, ApiError>                                                    │
//! │     │                                                                   │
//! │     ├── JsonRejection      ──┐                                          │
//! │     ├── ValidationError    ──┤                                          │
//! │     ├── BasketError        ──┼──► ApiError { code, message }            │
//! │     └── middleware checks  ──┘          │                               │
//! │                                         ▼                               │
//! │                            IntoResponse: status + {error, message}      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages are fixed per code. Internal details (basket ids, parser
//! positions) go to the log, never to the client.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use trolley_core::{BasketError, ValidationError};

/// Error returned to HTTP clients.
///
/// ## Serialization
/// ```json
/// {
///   "error": "CART_NOT_FOUND",
///   "message": "Cart not found or expired"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code
    #[serde(rename = "error")]
    pub code: ErrorCode,

    /// Human-readable message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Basket absent or expired (404)
    CartNotFound,

    /// Quantity out of range (400)
    InvalidQuantity,

    /// Item id not in the basket (404)
    ItemNotFound,

    /// SKU has no price (422)
    UnpriceableSku,

    /// Malformed or schema-violating body (400)
    InvalidRequest,

    /// Missing or wrong API key (401)
    Unauthorized,

    /// Client exceeded its request budget (429)
    RateLimitExceeded,

    /// Anything unexpected (500)
    InternalServerError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::CartNotFound | ErrorCode::ItemNotFound => StatusCode::NOT_FOUND,
            ErrorCode::InvalidQuantity | ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::UnpriceableSku => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fixed client-facing message for this code.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::CartNotFound => "Cart not found or expired",
            ErrorCode::InvalidQuantity => "Invalid quantity. It must be greater than zero",
            ErrorCode::ItemNotFound => "Item does not exists in the cart",
            ErrorCode::UnpriceableSku => "Item cannot be priced",
            ErrorCode::InvalidRequest => "Invalid request payload",
            ErrorCode::Unauthorized => "Invalid API key",
            ErrorCode::RateLimitExceeded => "Too many requests",
            ErrorCode::InternalServerError => "Unexpected error",
        }
    }
}

impl ApiError {
    /// Creates an error carrying the code's fixed message.
    pub fn new(code: ErrorCode) -> Self {
        ApiError {
            code,
            message: code.message().to_string(),
        }
    }

    pub fn invalid_request() -> Self {
        ApiError::new(ErrorCode::InvalidRequest)
    }

    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized)
    }

    pub fn rate_limited() -> Self {
        ApiError::new(ErrorCode::RateLimitExceeded)
    }

    pub fn internal() -> Self {
        ApiError::new(ErrorCode::InternalServerError)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<BasketError> for ApiError {
    fn from(err: BasketError) -> Self {
        let code = match &err {
            BasketError::BasketNotFound(_) | BasketError::BasketExpired(_) => {
                ErrorCode::CartNotFound
            }
            BasketError::InvalidItemQuantity { .. } => ErrorCode::InvalidQuantity,
            BasketError::ItemNotFound { .. } => ErrorCode::ItemNotFound,
            BasketError::Pricing(_) => ErrorCode::UnpriceableSku,
        };
        tracing::warn!(error = %err, code = ?code, "Basket operation failed");
        ApiError::new(code)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        tracing::warn!(error = %err, "Request validation failed");
        ApiError::invalid_request()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "Rejected request body");
        ApiError::invalid_request()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::warn!(error = %err, "Rejected request body");
        ApiError::invalid_request()
    }
}
