//! # Pricing Engine
//!
//! Applies promotion rules to line items. Everything here is a pure
//! function of its inputs: no clock, no shared state, no side effects.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price(item, rules)                                                     │
//! │                                                                         │
//! │  1. matching = rules where rule.product == item.code                   │
//! │                        and item.quantity >= rule.threshold             │
//! │                                                                         │
//! │  2. no match   → total = unit_price × quantity                         │
//! │                                                                         │
//! │  3. each match, in rule-name order (last one wins):                    │
//! │       FreeUnit               → total = unit_price × quantity           │
//! │       BulkPrice { new }      → total = new × quantity                  │
//! │                                                                         │
//! │  quantity is never changed by pricing                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Step 3 only sees more than one rule if the catalog allowed two rules for
//! one product, which [`RuleCatalog`] construction rejects.

use chrono::{DateTime, Utc};

use crate::money::Money;
use crate::rules::{RuleCatalog, RuleEffect};
use crate::types::{Basket, LineItem};

/// Prices one line item.
///
/// ## Example
/// ```rust
/// use till_core::{pricing, Catalog, LineItem, RuleCatalog};
///
/// let catalog = Catalog::standard();
/// let rules = RuleCatalog::standard(&catalog).unwrap();
/// let pants = catalog.lookup("PANTS").unwrap().clone();
///
/// // No rule for PANTS: list price
/// let priced = pricing::price(&LineItem::new(pants).with_quantity(2), &rules);
/// assert_eq!(priced.total.cents(), 1500);
/// ```
pub fn price(item: &LineItem, rules: &RuleCatalog) -> LineItem {
    let total = rules
        .matching(item)
        .fold(item.list_total(), |_, rule| apply(rule.effect, item));

    LineItem {
        product: item.product.clone(),
        quantity: item.quantity,
        total,
    }
}

fn apply(effect: RuleEffect, item: &LineItem) -> Money {
    match effect {
        RuleEffect::FreeUnit => item.list_total(),
        RuleEffect::BulkPrice { new_unit_price } => new_unit_price.multiply_quantity(item.quantity),
    }
}

/// Reprices every line of a basket and recomputes its total.
///
/// The status is left untouched; see [`checkout`].
pub fn price_basket(basket: &Basket, rules: &RuleCatalog) -> Basket {
    let mut priced = basket.clone();
    for item in priced.items.values_mut() {
        *item = price(item, rules);
    }
    priced.recalculate_total();
    priced
}

/// Finalizes a basket: reprices every line with `rules` and closes it.
///
/// A basket that is already closed is returned unchanged, so checking out
/// twice yields the same basket as checking out once.
pub fn checkout(basket: &Basket, rules: &RuleCatalog, at: DateTime<Utc>) -> Basket {
    if basket.is_closed() {
        return basket.clone();
    }

    let mut closed = price_basket(basket, rules);
    closed.close_at(at);
    closed
}
