//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file, if present, is loaded by `main` before this runs.

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use trolley_core::{
    CatalogPricing, FlatRatePricing, Money, PricingResolver, DEFAULT_EXPIRY_WINDOW,
    DEFAULT_UNIT_PRICE,
};
use trolley_store::StoreConfig;

use crate::middleware::rate_limit::RateLimitConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_API_KEY: &str = "dev-api-key";
const DEFAULT_RATE_LIMIT: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 60_000;

/// Gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// Interface to bind
    pub bind_addr: String,

    /// Sliding expiry window for baskets
    pub expiry_window: Duration,

    /// Background sweep interval (`None` keeps lazy eviction only)
    pub sweep_interval: Option<Duration>,

    /// Expected value of the `x-api-key` header
    pub api_key: String,

    /// Requests allowed per client per window
    pub rate_limit: u32,

    /// Rate limit window length
    pub rate_limit_window: Duration,

    /// TOML price catalogue (flat pricing when unset)
    pub price_catalog_path: Option<String>,

    /// Flat unit price when no catalogue is configured
    pub default_unit_price: Money,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: DEFAULT_PORT,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            expiry_window: DEFAULT_EXPIRY_WINDOW,
            sweep_interval: None,
            api_key: DEFAULT_API_KEY.to_string(),
            rate_limit: DEFAULT_RATE_LIMIT,
            rate_limit_window: Duration::from_millis(DEFAULT_RATE_LIMIT_WINDOW_MS),
            price_catalog_path: None,
            default_unit_price: DEFAULT_UNIT_PRICE,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        ApiConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            port: match lookup("PORT") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
                None => defaults.port,
            },

            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),

            expiry_window: lookup("CART_EXPIRY_MS")
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.expiry_window),

            sweep_interval: lookup("CART_SWEEP_INTERVAL_MS")
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),

            api_key: lookup("API_KEY").unwrap_or(defaults.api_key),

            rate_limit: lookup("RATE_LIMIT_PER_MIN")
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .filter(|limit| *limit > 0)
                .map(|limit| u32::try_from(limit).unwrap_or(u32::MAX))
                .unwrap_or(defaults.rate_limit),

            rate_limit_window: lookup("RATE_LIMIT_WINDOW_MS")
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .filter(|ms| *ms > 0)
                .map(|ms| Duration::from_millis(ms.unsigned_abs()))
                .unwrap_or(defaults.rate_limit_window),

            price_catalog_path: lookup("PRICE_CATALOG_PATH").filter(|p| !p.trim().is_empty()),

            default_unit_price: match lookup("DEFAULT_UNIT_PRICE") {
                Some(raw) => raw
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|cents| *cents > 0)
                    .map(Money::from_cents)
                    .ok_or_else(|| ConfigError::InvalidValue("DEFAULT_UNIT_PRICE".to_string()))?,
                None => defaults.default_unit_price,
            },
        };

        Ok(config)
    }

    /// `BIND_ADDR:PORT` as a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BIND_ADDR".to_string()))
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::with_expiry_window(self.expiry_window)
    }

    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            limit: self.rate_limit,
            window: self.rate_limit_window,
        }
    }

    /// Builds the pricing resolver: the catalogue when a path is configured,
    /// flat pricing otherwise.
    pub fn pricing(&self) -> Result<Arc<dyn PricingResolver>, ConfigError> {
        let Some(path) = &self.price_catalog_path else {
            return Ok(Arc::new(FlatRatePricing::new(self.default_unit_price)));
        };

        let source = fs::read_to_string(path).map_err(|e| ConfigError::Catalog {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let catalog = CatalogPricing::from_toml_str(&source).map_err(|e| ConfigError::Catalog {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Arc::new(catalog))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Cannot load price catalogue {path}: {reason}")]
    Catalog { path: String, reason: String },
}
