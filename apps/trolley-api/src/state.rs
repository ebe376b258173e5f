//! Shared application state handed to every handler and middleware.

use std::sync::Arc;

use trolley_store::BasketStore;

use crate::middleware::{RateLimitConfig, RateLimiter};

/// Cheap to clone: everything lives behind `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<BasketStore>,
    pub api_key: Arc<str>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(store: Arc<BasketStore>, api_key: &str, rate_limit: RateLimitConfig) -> Self {
        AppState {
            store,
            api_key: Arc::from(api_key),
            rate_limiter: Arc::new(RateLimiter::new(rate_limit)),
        }
    }
}
