//! # Basket Service
//!
//! The basket state machine. Adapters call this and nothing below it.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Basket Lifecycle                                     │
//! │                                                                         │
//! │   create_basket()                                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌─────────┐  add_product / remove_product                             │
//! │   │  Open   │◄─────────────────────────────┐                            │
//! │   └────┬────┘──────────────────────────────┘                            │
//! │        │ checkout_basket()  (rules applied, closed_at stamped)          │
//! │        ▼                                                                │
//! │   ┌─────────┐  add_product / remove_product ──► BasketClosed            │
//! │   │ Closed  │  checkout_basket ──► unchanged basket                     │
//! │   └─────────┘                                                           │
//! │                                                                         │
//! │   remove_basket() deletes in either state                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Precedence
//! | Operation        | Checked in order                                        |
//! |------------------|---------------------------------------------------------|
//! | `add_product`    | NotFound → BasketClosed → ProductNotFound → QuantityLimit |
//! | `remove_product` | ProductNotFound → NotFound → BasketClosed → ItemNotFound |
//! | `checkout_basket`| NotFound                                                |
//!
//! Every read-then-write runs inside [`BasketStore::update`], so two
//! concurrent calls on one basket never lose each other's changes.

use std::sync::Arc;

use chrono::Utc;
use till_core::{pricing, Basket, Catalog, LineItem, RuleCatalog};
use till_store::{BasketStore, MemoryStore};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ServiceResult;

/// Basket operations over a store, a product catalog and a rule catalog.
///
/// The catalogs are immutable and shared; the service is `Send + Sync`
/// whenever the store is, and is meant to be shared behind an `Arc`.
#[derive(Debug)]
pub struct BasketService<S = MemoryStore> {
    store: S,
    catalog: Arc<Catalog>,
    rules: Arc<RuleCatalog>,
}

impl BasketService<MemoryStore> {
    /// An in-memory service with the given catalogs.
    pub fn in_memory(catalog: Arc<Catalog>, rules: Arc<RuleCatalog>) -> Self {
        Self::new(MemoryStore::new(), catalog, rules)
    }
}

impl<S: BasketStore> BasketService<S> {
    pub fn new(store: S, catalog: Arc<Catalog>, rules: Arc<RuleCatalog>) -> Self {
        BasketService {
            store,
            catalog,
            rules,
        }
    }

    /// Creates an empty open basket under a fresh UUID v4.
    pub fn create_basket(&self) -> ServiceResult<Basket> {
        let id = Uuid::new_v4().to_string();
        let basket = self.store.create(&id)?;
        info!(basket_id = %basket.id, "Basket created");
        Ok(basket)
    }

    pub fn get_basket(&self, id: &str) -> ServiceResult<Basket> {
        let basket = self.store.get(id)?;
        debug!(basket_id = %id, items = basket.item_count(), "Basket read");
        Ok(basket)
    }

    /// Deletes a basket, open or closed.
    pub fn remove_basket(&self, id: &str) -> ServiceResult<()> {
        self.store.delete(id)?;
        info!(basket_id = %id, "Basket removed");
        Ok(())
    }

    /// Adds one unit of `code` at list price.
    ///
    /// ## Errors
    /// `NotFound`, then `BasketClosed`, then `ProductNotFound`. On any
    /// error the stored basket is unchanged.
    pub fn add_product(&self, id: &str, code: &str) -> ServiceResult<Basket> {
        let catalog = &self.catalog;
        let basket = self.store.update(id, |basket| {
            basket.ensure_open()?;
            let product = catalog.lookup(code)?;
            basket.add_unit(product).map(|_| ())
        })?;

        debug!(
            basket_id = %id,
            product = %code,
            total = %basket.total,
            "Product added"
        );
        Ok(basket)
    }

    /// Removes the whole line for `code`.
    ///
    /// ## Errors
    /// `ProductNotFound` for a code outside the catalog, then `NotFound`,
    /// `BasketClosed` and `ItemNotFound`.
    pub fn remove_product(&self, id: &str, code: &str) -> ServiceResult<Basket> {
        self.catalog.lookup(code)?;
        let basket = self.store.remove_product(id, code)?;

        debug!(
            basket_id = %id,
            product = %code,
            total = %basket.total,
            "Product removed"
        );
        Ok(basket)
    }

    /// Applies the promotion rules and closes the basket.
    ///
    /// Checking out a closed basket returns it unchanged.
    pub fn checkout_basket(&self, id: &str) -> ServiceResult<Basket> {
        let rules = &self.rules;
        let mut already_closed = false;

        let basket = self.store.update(id, |basket| {
            already_closed = basket.is_closed();
            *basket = pricing::checkout(basket, rules, Utc::now());
            Ok(())
        })?;

        if already_closed {
            debug!(basket_id = %id, "Basket already checked out");
        } else {
            info!(
                basket_id = %id,
                total = %basket.total,
                discount = %basket.discount(),
                "Basket checked out"
            );
        }
        Ok(basket)
    }

    /// Returns one line of a basket.
    pub fn get_item(&self, id: &str, code: &str) -> ServiceResult<LineItem> {
        Ok(self.store.get_item(id, code)?)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleCatalog {
        &self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
