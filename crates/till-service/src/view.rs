//! # Basket Views
//!
//! Flat, serializable shapes of a basket for adapters. Prices are carried
//! as integer cents, never as floats.
//!
//! ```json
//! {
//!   "id": "3f2a...",
//!   "status": "closed",
//!   "items": [
//!     { "code": "TSHIRT", "name": "Summer T-Shirt", "unitPriceCents": 2000,
//!       "quantity": 3, "totalCents": 5700 }
//!   ],
//!   "subtotalCents": 6000,
//!   "discountCents": 300,
//!   "totalCents": 5700,
//!   "createdAt": "2026-10-19T09:00:00Z",
//!   "closedAt": "2026-10-19T09:05:00Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use till_core::{Basket, BasketStatus, LineItem};
use ts_rs::TS;

/// One basket line as adapters see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    pub code: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
    pub total_cents: i64,
}

impl From<&LineItem> for LineItemView {
    fn from(item: &LineItem) -> Self {
        LineItemView {
            code: item.product.code.clone(),
            name: item.product.name.clone(),
            unit_price_cents: item.product.unit_price.cents(),
            quantity: item.quantity,
            total_cents: item.total.cents(),
        }
    }
}

/// A basket as adapters see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BasketView {
    pub id: String,
    pub status: BasketStatus,

    /// Lines ordered by product code.
    pub items: Vec<LineItemView>,

    /// Sum of the lines at list price.
    pub subtotal_cents: i64,

    /// Amount taken off by promotions.
    pub discount_cents: i64,

    pub total_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl From<&Basket> for BasketView {
    fn from(basket: &Basket) -> Self {
        BasketView {
            id: basket.id.clone(),
            status: basket.status,
            items: basket.items.values().map(LineItemView::from).collect(),
            subtotal_cents: basket.subtotal().cents(),
            discount_cents: basket.discount().cents(),
            total_cents: basket.total.cents(),
            created_at: basket.created_at,
            closed_at: basket.closed_at,
        }
    }
}

impl From<Basket> for BasketView {
    fn from(basket: Basket) -> Self {
        BasketView::from(&basket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use till_core::{pricing, Catalog, RuleCatalog};

    #[test]
    fn test_view_of_checked_out_basket() {
        let catalog = Catalog::standard();
        let rules = RuleCatalog::standard(&catalog).unwrap();

        let mut basket = Basket::new("b-1");
        for code in ["TSHIRT", "PANTS", "TSHIRT", "TSHIRT"] {
            basket.add_unit(catalog.lookup(code).unwrap()).unwrap();
        }
        let closed = pricing::checkout(&basket, &rules, Utc::now());
        let view = BasketView::from(&closed);

        assert_eq!(view.status, BasketStatus::Closed);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].code, "PANTS");
        assert_eq!(view.items[1].code, "TSHIRT");
        assert_eq!(view.items[1].quantity, 3);
        assert_eq!(view.items[1].total_cents, 5700);
        assert_eq!(view.subtotal_cents, 6750);
        assert_eq!(view.discount_cents, 300);
        assert_eq!(view.total_cents, 6450);
        assert!(view.closed_at.is_some());
    }

    #[test]
    fn test_view_json_shape() {
        let view = BasketView::from(Basket::new("b-1"));
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["id"], "b-1");
        assert_eq!(json["status"], "open");
        assert_eq!(json["totalCents"], 0);
        assert!(json["items"].as_array().unwrap().is_empty());
        assert!(json["closedAt"].is_null());
    }
}
