//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    LineItem     │   │     Basket      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  code (key)     │◄──│  product        │◄──│  id (UUID)      │       │
//! │  │  name           │   │  quantity       │   │  items (by code)│       │
//! │  │  unit_price     │   │  total          │   │  total          │       │
//! │  └─────────────────┘   └─────────────────┘   │  status         │       │
//! │                                               └─────────────────┘       │
//! │  ┌─────────────────┐                                                    │
//! │  │  BasketStatus   │   Open ──checkout──► Closed                        │
//! │  │  Open | Closed  │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Derived Totals
//! `LineItem::total` and `Basket::total` are never edited in place. Every
//! mutation recomputes them from quantities and prices, so a basket read
//! from anywhere satisfies `total == Σ item.total`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::MAX_LINE_QUANTITY;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale. Defined by the [`Catalog`](crate::Catalog)
/// and never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Business identifier, unique within the catalog (e.g. `TSHIRT`).
    pub code: String,

    /// Display name.
    pub name: String,

    /// List price of one unit.
    pub unit_price: Money,
}

impl Product {
    pub fn new(code: impl Into<String>, name: impl Into<String>, unit_price: Money) -> Self {
        Product {
            code: code.into(),
            name: name.into(),
            unit_price,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product's accumulated quantity and price within a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Snapshot of the catalog product.
    pub product: Product,

    /// Units of the product in the basket.
    pub quantity: u32,

    /// Price of the whole line.
    ///
    /// List price while the basket is open; rule-priced after checkout.
    pub total: Money,
}

impl LineItem {
    /// Creates an empty line (quantity 0) for a product.
    pub fn new(product: Product) -> Self {
        LineItem {
            product,
            quantity: 0,
            total: Money::zero(),
        }
    }

    /// Returns the line with `quantity` units priced at list price.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self.total = self.list_total();
        self
    }

    /// Product code of this line.
    #[inline]
    pub fn code(&self) -> &str {
        &self.product.code
    }

    /// Unit price × quantity, before any promotion.
    #[inline]
    pub fn list_total(&self) -> Money {
        self.product.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Basket Status
// =============================================================================

/// Lifecycle state of a basket.
///
/// There is no transition from `Closed` back to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BasketStatus {
    /// Products can be added and removed.
    #[default]
    Open,
    /// Checked out; totals are final.
    Closed,
}

// =============================================================================
// Basket
// =============================================================================

/// A cart of line items tied to one checkout flow.
///
/// ## Invariants
/// - Items are unique by product code (adding the same product increases
///   quantity)
/// - `total` equals the sum of the item totals
/// - A closed basket rejects `add_unit` and `remove_item`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Basket {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Line items keyed by product code.
    pub items: BTreeMap<String, LineItem>,

    /// Sum of all line totals.
    pub total: Money,

    pub status: BasketStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Set once, by checkout.
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Basket {
    /// Creates a new, empty, open basket.
    pub fn new(id: impl Into<String>) -> Self {
        Basket {
            id: id.into(),
            items: BTreeMap::new(),
            total: Money::zero(),
            status: BasketStatus::Open,
            created_at: Utc::now(),
            closed_at: None,
        }
    }

    /// Returns true once the basket has been checked out.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.status == BasketStatus::Closed
    }

    /// Fails with [`CoreError::BasketClosed`] if the basket is closed.
    pub fn ensure_open(&self) -> CoreResult<()> {
        if self.is_closed() {
            return Err(CoreError::BasketClosed(self.id.clone()));
        }
        Ok(())
    }

    /// Returns the line for a product code, if present.
    pub fn item(&self, code: &str) -> Option<&LineItem> {
        self.items.get(code)
    }

    /// Adds one unit of `product` to the basket.
    ///
    /// ## Behavior
    /// - If the product is already in the basket: quantity + 1
    /// - Otherwise: a new line at quantity 1
    /// - The line is priced at list price; promotions only apply at checkout
    /// - A line never exceeds [`MAX_LINE_QUANTITY`] units
    pub fn add_unit(&mut self, product: &Product) -> CoreResult<&LineItem> {
        self.ensure_open()?;

        if self.item(&product.code).map_or(0, |item| item.quantity) >= MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityLimit {
                basket_id: self.id.clone(),
                code: product.code.clone(),
                max: MAX_LINE_QUANTITY,
            });
        }

        let item = self
            .items
            .entry(product.code.clone())
            .or_insert_with(|| LineItem::new(product.clone()));
        item.quantity += 1;
        item.total = item.list_total();

        self.recalculate_total();
        Ok(&self.items[&product.code])
    }

    /// Removes the whole line for `code`.
    ///
    /// ## Errors
    /// - [`CoreError::BasketClosed`] if the basket is closed
    /// - [`CoreError::ItemNotFound`] if the product is not in the basket
    pub fn remove_item(&mut self, code: &str) -> CoreResult<LineItem> {
        self.ensure_open()?;

        let removed = self
            .items
            .remove(code)
            .ok_or_else(|| CoreError::ItemNotFound {
                basket_id: self.id.clone(),
                code: code.to_string(),
            })?;

        self.recalculate_total();
        Ok(removed)
    }

    /// Marks the basket closed. Prices are not touched; see
    /// [`pricing::checkout`](crate::pricing::checkout).
    pub fn close_at(&mut self, at: DateTime<Utc>) {
        self.status = BasketStatus::Closed;
        self.closed_at = Some(at);
    }

    /// Recomputes `total` from the line totals.
    pub fn recalculate_total(&mut self) {
        self.total = self.items_total();
    }

    /// Sum of the current line totals.
    pub fn items_total(&self) -> Money {
        self.items.values().map(|item| item.total).sum()
    }

    /// Sum of the lines at list price.
    pub fn subtotal(&self) -> Money {
        self.items.values().map(LineItem::list_total).sum()
    }

    /// Amount saved by promotions (zero until checkout).
    pub fn discount(&self) -> Money {
        self.subtotal() - self.total
    }

    /// Number of distinct products.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.items.values().map(|item| item.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
