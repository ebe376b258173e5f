//! Per-client-IP rate limiting on a GCRA quota.
//!
//! ```text
//! request ─► key = peer IP (or "unknown")
//!              │
//!              ├── quota has a cell left ─► pass
//!              └── quota exhausted ───────► 429 RATE_LIMIT_EXCEEDED + Retry-After
//! ```
//!
//! A client may burst up to `limit` requests; after that one request is
//! replenished every `window / limit`, so an idle client is back at full
//! burst one `window` after its last request.

use std::fmt;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::Clock;
use governor::{DefaultKeyedRateLimiter, Quota};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Idle clients are forgotten once this many are tracked.
const RETAIN_THRESHOLD: usize = 10_000;

/// Rate limit settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub limit: u32,
    /// Window length
    pub window: Duration,
}

impl RateLimitConfig {
    /// Burst of `limit` requests, one replenished every `window / limit`.
    pub fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.limit).unwrap_or(NonZeroU32::MIN);
        let period = self.window / burst.get();

        Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst)
    }
}

/// Keyed limiter shared by every request.
pub struct RateLimiter {
    config: RateLimitConfig,
    keyed: DefaultKeyedRateLimiter<String>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        RateLimiter {
            config,
            keyed: governor::RateLimiter::keyed(config.quota()),
        }
    }

    /// Spends one cell of `client`'s quota.
    ///
    /// Returns how long the client must wait when the quota is exhausted.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        if self.keyed.len() >= RETAIN_THRESHOLD {
            self.keyed.retain_recent();
        }

        self.keyed
            .check_key(&client.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.keyed.clock().now()))
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .field("tracked_clients", &self.keyed.len())
            .finish()
    }
}

/// Middleware that refuses clients over their budget.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if let Err(wait) = state.rate_limiter.check(&client) {
        let retry_after = retry_after_secs(wait);
        warn!(client = %client, path = %request.uri().path(), retry_after, "Rate limit exceeded");

        let mut response = ApiError::rate_limited().into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        return response;
    }

    next.run(request).await
}

/// Whole seconds, rounded up so a client never retries too early.
fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}
