//! # Basket Repository
//!
//! The storage contract the service is written against.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BasketService                                                          │
//! │       │                                                                 │
//! │       │  store.update(id, |basket| basket.add_unit(product))            │
//! │       ▼                                                                 │
//! │  BasketStore (this trait)                                               │
//! │  ├── create / get / delete                                              │
//! │  ├── get_item                                                           │
//! │  ├── upsert_basket        wholesale replace                             │
//! │  ├── update               read → modify copy → write, one lock          │
//! │  └── remove_product       update + Basket::remove_item                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MemoryStore (Mutex<HashMap>) - or any future backend                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! Stores own their baskets. Every method hands out an owned copy, so no
//! caller can mutate stored state except through `upsert_basket`/`update`.

use till_core::{Basket, CoreError, CoreResult, LineItem};

use crate::error::{StoreError, StoreResult};

/// Keyed basket storage.
///
/// Implementations must make each method atomic with respect to every
/// other method on the same store.
pub trait BasketStore: Send + Sync {
    /// Inserts a new open basket with `id`.
    ///
    /// Fails with [`StoreError::AlreadyExists`] if the id is taken.
    fn create(&self, id: &str) -> StoreResult<Basket>;

    /// Fails with [`StoreError::NotFound`].
    fn get(&self, id: &str) -> StoreResult<Basket>;

    /// Fails with [`StoreError::NotFound`].
    fn delete(&self, id: &str) -> StoreResult<()>;

    /// Replaces a stored basket wholesale. The total is recomputed from the
    /// items before writing.
    ///
    /// Fails with [`StoreError::NotFound`] if the id is absent; upsert never
    /// creates baskets.
    ///
    /// A replace built from an earlier [`get`](Self::get) can overwrite a
    /// concurrent change, so `BasketService` never calls this; its
    /// read-modify-write goes through [`update`](Self::update). Both end in
    /// the same write.
    fn upsert_basket(&self, basket: Basket) -> StoreResult<Basket>;

    /// Runs `f` on a copy of the basket and writes the copy back, all under
    /// one acquisition of the store's lock.
    ///
    /// If `f` fails the stored basket is left untouched and the error is
    /// returned as [`StoreError::Rejected`].
    fn update<F>(&self, id: &str, f: F) -> StoreResult<Basket>
    where
        F: FnOnce(&mut Basket) -> CoreResult<()>;

    /// Returns one line of a basket.
    ///
    /// ## Errors
    /// - [`StoreError::NotFound`] for an unknown basket
    /// - [`StoreError::Rejected`] with [`CoreError::ItemNotFound`] if the
    ///   product is not in the basket
    fn get_item(&self, id: &str, code: &str) -> StoreResult<LineItem> {
        let basket = self.get(id)?;
        basket.item(code).cloned().ok_or_else(|| {
            StoreError::Rejected(CoreError::ItemNotFound {
                basket_id: basket.id.clone(),
                code: code.to_string(),
            })
        })
    }

    /// Removes a product's line and recomputes the total.
    ///
    /// ## Errors
    /// - [`StoreError::NotFound`] for an unknown basket
    /// - [`StoreError::Rejected`] with [`CoreError::BasketClosed`] or
    ///   [`CoreError::ItemNotFound`]
    fn remove_product(&self, id: &str, code: &str) -> StoreResult<Basket> {
        self.update(id, |basket| basket.remove_item(code).map(|_| ()))
    }
}
