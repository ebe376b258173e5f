//! # Domain Types
//!
//! The basket, its line items and the derived totals.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐      ┌──────────────────────┐                │
//! │  │       Basket         │ 1..n │     BasketItem       │                │
//! │  │  ──────────────────  │─────►│  ──────────────────  │                │
//! │  │  id (UUID)           │      │  id (UUID)           │                │
//! │  │  items (ordered)     │      │  sku (unique/basket) │                │
//! │  │  totals              │      │  quantity (> 0)      │                │
//! │  │  created_at          │      │  unit_price (locked) │                │
//! │  │  last_accessed_at    │      │  total_price         │                │
//! │  └──────────┬───────────┘      └──────────────────────┘                │
//! │             │                                                           │
//! │             ▼                                                           │
//! │  ┌──────────────────────┐                                              │
//! │  │    BasketTotals      │   subtotal   = Σ item.total_price            │
//! │  │  subtotal, itemCount │   item_count = Σ item.quantity               │
//! │  └──────────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutating method builds the candidate item list, folds its totals
//! with checked arithmetic and only then commits both. A change whose totals
//! would overflow fails with `InvalidItemQuantity` and leaves the basket as
//! it was.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{BasketError, BasketResult};
use crate::money::Money;
use crate::validation::{check_upper_bound, validate_add_quantity, validate_update_quantity};

// =============================================================================
// Basket Item
// =============================================================================

/// One line of a basket.
///
/// ## Price Lock-In
/// `unit_price` is captured when the line is created. Adding the same SKU
/// again only changes the quantity; the resolver is not consulted twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BasketItem {
    id: String,
    sku: String,
    quantity: i64,
    unit_price: Money,
    total_price: Money,
}

impl BasketItem {
    fn new(sku: &str, quantity: i64, unit_price: Money) -> BasketResult<Self> {
        Ok(BasketItem {
            id: Uuid::new_v4().to_string(),
            sku: sku.to_string(),
            quantity,
            unit_price,
            total_price: line_total(unit_price, quantity)?,
        })
    }

    /// Stable item id, unchanged by quantity updates.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Price per unit, fixed at first insertion.
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// `quantity × unit_price`.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    fn set_quantity(&mut self, quantity: i64) -> BasketResult<()> {
        self.total_price = line_total(self.unit_price, quantity)?;
        self.quantity = quantity;
        Ok(())
    }
}

fn line_total(unit_price: Money, quantity: i64) -> BasketResult<Money> {
    unit_price
        .checked_multiply_quantity(quantity)
        .ok_or_else(|| BasketError::invalid_quantity(quantity, "line total overflows"))
}

// =============================================================================
// Basket Totals
// =============================================================================

/// Aggregates derived from the item list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BasketTotals {
    /// Sum of all line totals.
    pub subtotal: Money,
    /// Sum of all quantities (units, not distinct lines).
    pub item_count: i64,
}

impl BasketTotals {
    /// Folds a full item list into totals. No incremental bookkeeping.
    ///
    /// Returns `None` when the subtotal or the unit count overflows.
    pub fn from_items(items: &[BasketItem]) -> Option<Self> {
        items.iter().try_fold(BasketTotals::default(), |acc, item| {
            Some(BasketTotals {
                subtotal: acc.subtotal.checked_add(item.total_price)?,
                item_count: acc.item_count.checked_add(item.quantity)?,
            })
        })
    }
}

// =============================================================================
// Basket
// =============================================================================

/// An ephemeral shopping basket.
///
/// ## Invariants
/// - At most one item per SKU (adding an existing SKU merges quantities)
/// - Item order is insertion order; removals leave no gaps
/// - `totals` always equals `BasketTotals::from_items(items)`
/// - `created_at <= last_accessed_at`, and `last_accessed_at` never decreases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Basket {
    id: String,
    items: Vec<BasketItem>,
    totals: BasketTotals,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
    #[ts(as = "String")]
    last_accessed_at: DateTime<Utc>,
}

impl Basket {
    /// Creates an empty basket with a fresh id, stamped at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Basket {
            id: Uuid::new_v4().to_string(),
            items: Vec::new(),
            totals: BasketTotals::default(),
            created_at: now,
            last_accessed_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[BasketItem] {
        &self.items
    }

    pub fn totals(&self) -> BasketTotals {
        self.totals
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_accessed_at(&self) -> DateTime<Utc> {
        self.last_accessed_at
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a line by SKU.
    pub fn item_by_sku(&self, sku: &str) -> Option<&BasketItem> {
        self.items.iter().find(|i| i.sku == sku)
    }

    /// True when the basket has been idle for longer than `window` at `now`.
    ///
    /// Idle time exactly equal to the window is still valid.
    pub fn is_expired(&self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        now.signed_duration_since(self.last_accessed_at) > window
    }

    /// Records an access, extending the sliding expiry window.
    ///
    /// A clock reading earlier than the current stamp is ignored.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_accessed_at {
            self.last_accessed_at = now;
        }
    }

    /// Adds `quantity` to the existing line for `sku`.
    ///
    /// Returns `Ok(false)` without changing anything when the SKU is not in
    /// the basket yet; the caller must then price it and call [`Basket::add_item`].
    pub fn increase_quantity(&mut self, sku: &str, quantity: i64) -> BasketResult<bool> {
        validate_add_quantity(quantity)?;

        let Some(index) = self.items.iter().position(|i| i.sku == sku) else {
            return Ok(false);
        };

        let mut items = self.items.clone();
        let item = &mut items[index];
        let merged = item
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| BasketError::invalid_quantity(quantity, "quantity overflows"))?;
        check_upper_bound(merged)?;
        item.set_quantity(merged)?;

        self.commit(items, quantity)?;
        Ok(true)
    }

    /// Adds a SKU to the basket.
    ///
    /// ## Behavior
    /// - SKU already present: quantity increases, `unit_price` is ignored
    ///   (the line keeps its locked-in price)
    /// - SKU not present: a new line is appended at the end
    pub fn add_item(&mut self, sku: &str, quantity: i64, unit_price: Money) -> BasketResult<()> {
        if self.increase_quantity(sku, quantity)? {
            return Ok(());
        }

        let mut items = self.items.clone();
        items.push(BasketItem::new(sku, quantity, unit_price)?);
        self.commit(items, quantity)
    }

    /// Sets the quantity of a line. Zero removes the line.
    pub fn set_item_quantity(&mut self, item_id: &str, quantity: i64) -> BasketResult<()> {
        validate_update_quantity(quantity)?;

        if quantity == 0 {
            return self.remove_item(item_id).map(|_| ());
        }

        let index = self.position_of(item_id)?;
        let mut items = self.items.clone();
        items[index].set_quantity(quantity)?;

        self.commit(items, quantity)
    }

    /// Removes a line, preserving the order of the remaining items.
    pub fn remove_item(&mut self, item_id: &str) -> BasketResult<BasketItem> {
        let index = self.position_of(item_id)?;
        let mut items = self.items.clone();
        let removed = items.remove(index);

        self.commit(items, removed.quantity)?;
        Ok(removed)
    }

    fn position_of(&self, item_id: &str) -> BasketResult<usize> {
        self.items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| BasketError::ItemNotFound {
                basket_id: self.id.clone(),
                item_id: item_id.to_string(),
            })
    }

    /// Replaces the item list and its totals together, or neither.
    fn commit(&mut self, items: Vec<BasketItem>, quantity: i64) -> BasketResult<()> {
        let totals = BasketTotals::from_items(&items)
            .ok_or_else(|| BasketError::invalid_quantity(quantity, "basket total overflows"))?;

        self.items = items;
        self.totals = totals;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
