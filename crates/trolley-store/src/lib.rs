//! # trolley-store: Volatile Basket Store
//!
//! Holds every live basket in memory and enforces the sliding expiry window.
//!
//! ## Lifecycle of a Basket
//! ```text
//!   create_basket ──► Live ──(idle > window)──► Expired
//!                      ▲ │                         │
//!                      └─┘ any successful op       │ next access or sweep
//!                          refreshes the window    ▼
//!                                                Gone (BasketNotFound)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use trolley_core::FlatRatePricing;
//! use trolley_store::{BasketStore, StoreConfig};
//!
//! let store = BasketStore::new(StoreConfig::default(), Arc::new(FlatRatePricing::default()));
//! let basket = store.create_basket();
//! let basket = store.add_item(basket.id(), "ITEM_123", 2).unwrap();
//!
//! assert_eq!(basket.totals().subtotal.cents(), 20);
//! ```

pub mod clock;
pub mod store;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{BasketStore, StoreConfig};
pub use sweeper::{BasketSweeper, SweeperHandle};
