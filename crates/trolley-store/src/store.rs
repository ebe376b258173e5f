//! # Basket Store
//!
//! The only owner of basket state.
//!
//! ## Thread Safety
//! Baskets live in a `DashMap`. Every operation on an existing basket runs
//! inside that key's entry lock:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 One critical section per operation                      │
//! │                                                                         │
//! │   now = clock.now()            (single read)                            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   map.entry(id) ──── Vacant ──────────────► BasketNotFound              │
//! │        │                                                                │
//! │     Occupied                                                            │
//! │        │                                                                │
//! │        ├── idle > window ──► entry.remove() ─► BasketExpired            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   mutate items → recompute totals → touch(now) → snapshot               │
//! │                                                                         │
//! │   Two callers on the same basket serialize on the entry lock, so a      │
//! │   basket can only be observed as expired (and evicted) once.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pricing Outside the Lock
//! `add_item` for a SKU the basket does not hold yet needs a price. The
//! resolver is called between two critical sections, never inside one:
//!
//! ```text
//! validate qty ─► [lock: check, merge if SKU present] ─► resolve price
//!                                                          │
//!              [lock: check again, merge-or-append] ◄──────┘
//! ```
//!
//! If another caller appended the same SKU in between, the second section
//! merges into that line and its already locked-in price wins.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use trolley_core::validation::{validate_add_quantity, validate_update_quantity};
use trolley_core::{
    Basket, BasketError, BasketResult, FlatRatePricing, PricingResolver, DEFAULT_EXPIRY_WINDOW,
};

use crate::clock::{Clock, SystemClock};

// =============================================================================
// Store Configuration
// =============================================================================

/// Store tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// How long a basket may sit idle before it becomes unreachable.
    pub expiry_window: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            expiry_window: DEFAULT_EXPIRY_WINDOW,
        }
    }
}

impl StoreConfig {
    /// Config with a custom expiry window.
    pub fn with_expiry_window(expiry_window: Duration) -> Self {
        StoreConfig { expiry_window }
    }
}

// =============================================================================
// Basket Store
// =============================================================================

/// In-memory basket store with sliding expiry.
///
/// All five operations return a snapshot (`Basket` clone) taken inside the
/// critical section, so callers never see a half-applied mutation.
#[derive(Debug)]
pub struct BasketStore {
    baskets: DashMap<String, Basket>,
    window: TimeDelta,
    config: StoreConfig,
    pricing: Arc<dyn PricingResolver>,
    clock: Arc<dyn Clock>,
}

impl Default for BasketStore {
    fn default() -> Self {
        BasketStore::new(StoreConfig::default(), Arc::new(FlatRatePricing::default()))
    }
}

impl BasketStore {
    /// Creates a store that reads the wall clock.
    pub fn new(config: StoreConfig, pricing: Arc<dyn PricingResolver>) -> Self {
        BasketStore::with_clock(config, pricing, Arc::new(SystemClock))
    }

    /// Creates a store with an explicit time source.
    pub fn with_clock(
        config: StoreConfig,
        pricing: Arc<dyn PricingResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        BasketStore {
            baskets: DashMap::new(),
            window: TimeDelta::from_std(config.expiry_window).unwrap_or(TimeDelta::MAX),
            config,
            pricing,
            clock,
        }
    }

    /// The configured sliding expiry window.
    pub fn expiry_window(&self) -> Duration {
        self.config.expiry_window
    }

    /// Number of baskets currently held, expired-but-unvisited ones included.
    pub fn len(&self) -> usize {
        self.baskets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baskets.is_empty()
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Creates an empty basket. Cannot fail.
    pub fn create_basket(&self) -> Basket {
        let basket = Basket::new(self.clock.now());
        self.baskets.insert(basket.id().to_string(), basket.clone());
        debug!(basket_id = %basket.id(), "Created basket");
        basket
    }

    /// Returns the current state of a basket and refreshes its expiry.
    pub fn get_basket(&self, basket_id: &str) -> BasketResult<Basket> {
        self.with_available_basket(basket_id, |basket, now| {
            basket.touch(now);
            Ok(basket.clone())
        })
    }

    /// Adds `quantity` units of `sku`.
    ///
    /// ## Order of Checks
    /// 1. Quantity (so a bad quantity on an unknown basket is still
    ///    `InvalidItemQuantity`)
    /// 2. Basket availability
    /// 3. Price, only if the SKU is new to this basket
    pub fn add_item(&self, basket_id: &str, sku: &str, quantity: i64) -> BasketResult<Basket> {
        validate_add_quantity(quantity)?;

        let merged = self.with_available_basket(basket_id, |basket, now| {
            if basket.increase_quantity(sku, quantity)? {
                basket.touch(now);
                return Ok(Some(basket.clone()));
            }
            Ok(None)
        })?;

        if let Some(basket) = merged {
            return Ok(basket);
        }

        let unit_price = self.pricing.unit_price(sku)?;

        self.with_available_basket(basket_id, |basket, now| {
            basket.add_item(sku, quantity, unit_price)?;
            basket.touch(now);
            Ok(basket.clone())
        })
    }

    /// Sets a line's quantity; zero removes the line.
    pub fn update_item_quantity(
        &self,
        basket_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> BasketResult<Basket> {
        validate_update_quantity(quantity)?;

        self.with_available_basket(basket_id, |basket, now| {
            basket.set_item_quantity(item_id, quantity)?;
            basket.touch(now);
            Ok(basket.clone())
        })
    }

    /// Removes a line from the basket.
    pub fn remove_item(&self, basket_id: &str, item_id: &str) -> BasketResult<Basket> {
        self.with_available_basket(basket_id, |basket, now| {
            basket.remove_item(item_id)?;
            basket.touch(now);
            Ok(basket.clone())
        })
    }

    /// Drops every basket that is past its window right now.
    ///
    /// Each decision is taken under the shard lock of that basket, the same
    /// lock the operations use, so a basket being touched concurrently is
    /// either refreshed first or evicted first, never both.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut purged = 0;

        self.baskets.retain(|basket_id, basket| {
            let expired = basket.is_expired(now, self.window);
            if expired {
                purged += 1;
                debug!(basket_id = %basket_id, "Purged expired basket");
            }
            !expired
        });

        purged
    }

    // -------------------------------------------------------------------------
    // Availability check
    // -------------------------------------------------------------------------

    /// Runs `f` on a live basket while holding its entry lock.
    ///
    /// `f` receives the same `now` that was used for the expiry check and is
    /// responsible for touching the basket when it succeeds.
    fn with_available_basket<F, R>(&self, basket_id: &str, f: F) -> BasketResult<R>
    where
        F: FnOnce(&mut Basket, DateTime<Utc>) -> BasketResult<R>,
    {
        let now = self.clock.now();

        match self.baskets.entry(basket_id.to_string()) {
            Entry::Vacant(_) => Err(BasketError::BasketNotFound(basket_id.to_string())),
            Entry::Occupied(mut entry) => {
                if entry.get().is_expired(now, self.window) {
                    entry.remove();
                    debug!(basket_id = %basket_id, "Deleted expired basket");
                    return Err(BasketError::BasketExpired(basket_id.to_string()));
                }
                f(entry.get_mut(), now)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
