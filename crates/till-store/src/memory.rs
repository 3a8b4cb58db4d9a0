//! # In-Memory Store
//!
//! A `Mutex<HashMap>` holding every basket of the process.
//!
//! ## Thread Safety
//! One coarse lock guards the whole map:
//! 1. Every operation is a handful of map lookups and clones
//! 2. `update` must hold the lock across read, modify and write
//! 3. There is no ordering requirement between different baskets
//!
//! ## Why Not RwLock?
//! Most operations write, and each critical section is short.
//!
//! ## Poisoning
//! Every write is a single `insert` or `remove` of a fully computed basket,
//! so a panic while the lock is held cannot leave a half-written basket
//! behind. A poisoned lock is therefore recovered rather than propagated.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use till_core::{Basket, CoreResult};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::repository::BasketStore;

/// Process-local basket storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    baskets: Mutex<HashMap<String, Basket>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored baskets.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Basket>> {
        self.baskets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The single write path of the store: the total is recomputed from the
/// lines, then the basket replaces `slot` whole.
fn write_back(slot: &mut Basket, mut basket: Basket) -> Basket {
    basket.recalculate_total();
    *slot = basket.clone();
    basket
}

impl BasketStore for MemoryStore {
    fn create(&self, id: &str) -> StoreResult<Basket> {
        let mut baskets = self.lock();
        if baskets.contains_key(id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }

        let basket = Basket::new(id);
        baskets.insert(id.to_string(), basket.clone());
        debug!(basket_id = %id, "Basket stored");
        Ok(basket)
    }

    fn get(&self, id: &str) -> StoreResult<Basket> {
        self.lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        self.lock()
            .remove(id)
            .map(|_| debug!(basket_id = %id, "Basket deleted"))
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn upsert_basket(&self, basket: Basket) -> StoreResult<Basket> {
        let mut baskets = self.lock();
        let slot = baskets
            .get_mut(&basket.id)
            .ok_or_else(|| StoreError::not_found(&basket.id))?;

        let stored = write_back(slot, basket);
        debug!(basket_id = %stored.id, total = %stored.total, "Basket replaced");
        Ok(stored)
    }

    fn update<F>(&self, id: &str, f: F) -> StoreResult<Basket>
    where
        F: FnOnce(&mut Basket) -> CoreResult<()>,
    {
        let mut baskets = self.lock();
        let slot = baskets.get_mut(id).ok_or_else(|| StoreError::not_found(id))?;

        let mut working = slot.clone();
        if let Err(err) = f(&mut working) {
            warn!(basket_id = %id, error = %err, "Basket update rejected");
            return Err(err.into());
        }

        let stored = write_back(slot, working);
        debug!(basket_id = %id, total = %stored.total, "Basket updated");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use till_core::{Catalog, CoreError, Money};

    fn catalog() -> Catalog {
        Catalog::standard()
    }

    fn store_with_basket(id: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.create(id).unwrap();
        store
    }

    fn add(store: &MemoryStore, id: &str, code: &str) -> StoreResult<Basket> {
        let catalog = catalog();
        let product = catalog.lookup(code).unwrap().clone();
        store.update(id, |basket| basket.add_unit(&product).map(|_| ()))
    }

    #[test]
    fn test_create_and_get() {
        let store = MemoryStore::new();
        let created = store.create("b-1").unwrap();
        assert_eq!(store.get("b-1").unwrap(), created);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_duplicate() {
        let store = store_with_basket("b-1");
        assert_eq!(
            store.create("b-1").unwrap_err(),
            StoreError::AlreadyExists("b-1".to_string())
        );
    }

    #[test]
    fn test_get_missing() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope").unwrap_err(), StoreError::not_found("nope"));
    }

    #[test]
    fn test_delete() {
        let store = store_with_basket("b-1");
        store.delete("b-1").unwrap();
        assert!(store.is_empty());
        assert_eq!(store.delete("b-1").unwrap_err(), StoreError::not_found("b-1"));
        assert_eq!(store.get("b-1").unwrap_err(), StoreError::not_found("b-1"));
    }

    #[test]
    fn test_get_item() {
        let store = store_with_basket("b-1");
        add(&store, "b-1", "PANTS").unwrap();

        let item = store.get_item("b-1", "PANTS").unwrap();
        assert_eq!(item.quantity, 1);

        assert_eq!(
            store.get_item("b-1", "TSHIRT").unwrap_err(),
            StoreError::Rejected(CoreError::ItemNotFound {
                basket_id: "b-1".to_string(),
                code: "TSHIRT".to_string(),
            })
        );
        assert_eq!(
            store.get_item("b-2", "PANTS").unwrap_err(),
            StoreError::not_found("b-2")
        );
    }

    #[test]
    fn test_upsert_replaces_and_recomputes_total() {
        let store = store_with_basket("b-1");
        let mut basket = add(&store, "b-1", "TSHIRT").unwrap();

        // A stale total must not survive the write.
        basket.total = Money::from_cents(1);
        let stored = store.upsert_basket(basket).unwrap();
        assert_eq!(stored.total.cents(), 2000);
        assert_eq!(store.get("b-1").unwrap().total.cents(), 2000);
    }

    #[test]
    fn test_update_recomputes_stale_total() {
        let store = store_with_basket("b-1");
        add(&store, "b-1", "PANTS").unwrap();

        let stored = store
            .update("b-1", |basket| {
                basket.total = Money::from_cents(1);
                Ok(())
            })
            .unwrap();
        assert_eq!(stored.total.cents(), 750);
        assert_eq!(store.get("b-1").unwrap(), stored);
    }

    #[test]
    fn test_update_and_upsert_store_the_same_basket() {
        let updated = store_with_basket("b-1");
        add(&updated, "b-1", "TSHIRT").unwrap();
        let via_update = add(&updated, "b-1", "PANTS").unwrap();

        let replaced = store_with_basket("b-1");
        let mut basket = Basket::new("b-1");
        for code in ["TSHIRT", "PANTS"] {
            basket.add_unit(catalog().lookup(code).unwrap()).unwrap();
        }
        let via_upsert = replaced.upsert_basket(basket).unwrap();

        assert_eq!(via_upsert.items, via_update.items);
        assert_eq!(via_upsert.total, via_update.total);
        assert_eq!(replaced.get("b-1").unwrap().total.cents(), 2750);
    }

    #[test]
    fn test_upsert_missing_basket() {
        let store = MemoryStore::new();
        assert_eq!(
            store.upsert_basket(Basket::new("ghost")).unwrap_err(),
            StoreError::not_found("ghost")
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_update_leaves_basket_unchanged() {
        let store = store_with_basket("b-1");
        add(&store, "b-1", "PANTS").unwrap();
        let before = store.get("b-1").unwrap();

        let err = store
            .update("b-1", |basket| {
                basket.items.clear();
                Err(CoreError::ProductNotFound("DRESS".to_string()))
            })
            .unwrap_err();

        assert_eq!(err, StoreError::Rejected(CoreError::ProductNotFound("DRESS".to_string())));
        assert_eq!(store.get("b-1").unwrap(), before);
    }

    #[test]
    fn test_remove_product() {
        let store = store_with_basket("b-1");
        add(&store, "b-1", "PANTS").unwrap();
        add(&store, "b-1", "TSHIRT").unwrap();

        let basket = store.remove_product("b-1", "TSHIRT").unwrap();
        assert!(basket.item("TSHIRT").is_none());
        assert_eq!(basket.total.cents(), 750);
        assert_eq!(basket.total, basket.items_total());
    }

    #[test]
    fn test_remove_product_not_in_basket() {
        let store = store_with_basket("b-1");
        add(&store, "b-1", "PANTS").unwrap();

        let err = store.remove_product("b-1", "TSHIRT").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Rejected(CoreError::ItemNotFound { .. })
        ));
        assert_eq!(store.get("b-1").unwrap().total.cents(), 750);
    }

    #[test]
    fn test_remove_product_missing_basket() {
        let store = MemoryStore::new();
        assert_eq!(
            store.remove_product("nope", "PANTS").unwrap_err(),
            StoreError::not_found("nope")
        );
    }

    #[test]
    fn test_concurrent_updates_do_not_lose_writes() {
        let store = store_with_basket("b-1");
        let product = catalog().lookup("PANTS").unwrap().clone();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        store
                            .update("b-1", |basket| basket.add_unit(&product).map(|_| ()))
                            .unwrap();
                    }
                });
            }
        });

        let basket = store.get("b-1").unwrap();
        assert_eq!(basket.item("PANTS").unwrap().quantity, 400);
        assert_eq!(basket.total.cents(), 400 * 750);
        assert_eq!(basket.total, basket.items_total());
    }
}
