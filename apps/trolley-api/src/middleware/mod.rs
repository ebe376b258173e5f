//! Request middleware, outermost first: rate limit, then API key.

pub mod auth;
pub mod rate_limit;

pub use auth::{require_api_key, API_KEY_HEADER};
pub use rate_limit::{rate_limit, RateLimitConfig, RateLimiter};
