use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use mart_store::ProductPersistence;
use mart_types::{Product, ProductDraft, ProductId};
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::sink::SnapshotSink;
use crate::traits::Catalog;

/// Load state of a [`ProductStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The initial load has not run yet.
    Loading,
    /// The collection reflects storage and accepts mutations.
    Ready,
}

#[derive(Debug)]
struct StoreState {
    phase: Phase,
    products: Vec<Product>,
}

/// Ordered in-memory product collection with write-through persistence.
///
/// New records go to the head of the collection; update and delete keep
/// the relative order of everything else. Ids are unique across the
/// collection at all times.
pub struct ProductStore {
    persistence: ProductPersistence,
    sink: Arc<dyn SnapshotSink>,
    state: RwLock<StoreState>,
}

impl ProductStore {
    /// A store that writes synchronously through `persistence`.
    pub fn new(persistence: ProductPersistence) -> Self {
        let sink = Arc::new(persistence.clone());
        Self::with_sink(persistence, sink)
    }

    /// A store that loads from `persistence` and hands snapshots to `sink`.
    pub fn with_sink(persistence: ProductPersistence, sink: Arc<dyn SnapshotSink>) -> Self {
        Self {
            persistence,
            sink,
            state: RwLock::new(StoreState {
                phase: Phase::Loading,
                products: Vec::new(),
            }),
        }
    }

    /// Populate the collection from storage and switch to [`Phase::Ready`].
    ///
    /// Unreadable or missing data yields an empty collection; the store is
    /// ready either way. The loaded collection is not written back.
    pub fn load(&self) -> CatalogResult<usize> {
        let mut state = self.write()?;
        if state.phase == Phase::Ready {
            return Err(CatalogError::AlreadyLoaded);
        }
        state.products = self.persistence.load();
        state.phase = Phase::Ready;
        info!(count = state.products.len(), "catalog ready");
        Ok(state.products.len())
    }

    /// Current phase. A poisoned lock reads as [`Phase::Loading`], which
    /// matches the mutations refusing to run.
    pub fn phase(&self) -> Phase {
        self.read().map(|s| s.phase).unwrap_or(Phase::Loading)
    }

    /// Number of records. A poisoned lock reads as empty, as do
    /// [`Catalog::products`] and [`Catalog::get`]; mutations report
    /// [`CatalogError::LockPoisoned`] instead.
    pub fn len(&self) -> usize {
        self.read().map(|s| s.products.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> CatalogResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|e| CatalogError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> CatalogResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|e| CatalogError::LockPoisoned(e.to_string()))
    }

    /// Lock for a mutation, refusing while the initial load is pending.
    fn write_ready(&self) -> CatalogResult<RwLockWriteGuard<'_, StoreState>> {
        let state = self.write()?;
        if state.phase == Phase::Loading {
            return Err(CatalogError::NotReady);
        }
        Ok(state)
    }

    fn publish(&self, state: &StoreState) {
        self.sink.submit(state.products.clone());
    }
}

fn fresh_id(products: &[Product]) -> ProductId {
    loop {
        let id = ProductId::generate();
        if !products.iter().any(|p| p.id == id) {
            return id;
        }
        debug!(%id, "generated id already in use; retrying");
    }
}

impl Catalog for ProductStore {
    fn products(&self) -> Vec<Product> {
        self.read().map(|s| s.products.clone()).unwrap_or_default()
    }

    fn is_loading(&self) -> bool {
        self.phase() == Phase::Loading
    }

    fn add(&self, draft: ProductDraft) -> CatalogResult<Product> {
        let mut state = self.write_ready()?;
        let product = draft.into_product(fresh_id(&state.products));
        state.products.insert(0, product.clone());
        self.publish(&state);
        info!(id = %product.id, name = %product.name, "added product");
        Ok(product)
    }

    fn update(&self, product: Product) -> CatalogResult<bool> {
        let mut state = self.write_ready()?;
        let replaced = match state.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                info!(id = %product.id, name = %product.name, "updated product");
                *slot = product;
                true
            }
            None => {
                debug!(id = %product.id, "update for unknown product ignored");
                false
            }
        };
        self.publish(&state);
        Ok(replaced)
    }

    fn delete(&self, id: &ProductId) -> CatalogResult<Option<Product>> {
        let mut state = self.write_ready()?;
        let removed = state
            .products
            .iter()
            .position(|p| &p.id == id)
            .map(|index| state.products.remove(index));
        match &removed {
            Some(product) => info!(%id, name = %product.name, "deleted product"),
            None => debug!(%id, "delete for unknown product ignored"),
        }
        self.publish(&state);
        Ok(removed)
    }

    fn get(&self, id: &ProductId) -> Option<Product> {
        self.read()
            .ok()
            .and_then(|s| s.products.iter().find(|p| &p.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::testing::RecordingSink;
    use mart_store::{InMemoryKeyValueStore, KeyValueStore, PRODUCTS_KEY};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn draft(name: &str, price: f64) -> ProductDraft {
        ProductDraft {
            name: name.into(),
            price,
            description: "d".into(),
            image: "data:image/png;base64,AAA=".into(),
        }
    }

    fn persistence() -> (Arc<InMemoryKeyValueStore>, ProductPersistence) {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        (kv.clone(), ProductPersistence::new(kv))
    }

    fn ready_store() -> ProductStore {
        let (_, p) = persistence();
        let store = ProductStore::new(p);
        store.load().unwrap();
        store
    }

    fn recording_store() -> (Arc<RecordingSink>, ProductStore) {
        let (_, p) = persistence();
        let sink = Arc::new(RecordingSink::default());
        let store = ProductStore::with_sink(p, sink.clone());
        store.load().unwrap();
        (sink, store)
    }

    // ---- Lifecycle ----

    #[test]
    fn starts_loading_and_becomes_ready_once() {
        let (_, p) = persistence();
        let store = ProductStore::new(p);
        assert_eq!(store.phase(), Phase::Loading);
        assert!(store.is_loading());

        assert_eq!(store.load().unwrap(), 0);
        assert_eq!(store.phase(), Phase::Ready);
        assert_eq!(store.load(), Err(CatalogError::AlreadyLoaded));
    }

    #[test]
    fn mutations_are_rejected_while_loading() {
        let (kv, p) = persistence();
        p.save(&[draft("Kept", 1.0).into_product(ProductId::from("keep"))]);
        let store = ProductStore::new(p);

        assert_eq!(store.add(draft("A", 1.0)), Err(CatalogError::NotReady));
        assert_eq!(
            store.update(draft("A", 1.0).into_product(ProductId::from("keep"))),
            Err(CatalogError::NotReady)
        );
        assert_eq!(store.delete(&ProductId::from("keep")), Err(CatalogError::NotReady));

        // Storage was not overwritten by the rejected mutations.
        let raw = kv.get(PRODUCTS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"keep\""));
    }

    #[test]
    fn load_restores_stored_collection_without_writing() {
        let (_, p) = persistence();
        let stored = vec![
            draft("B", 2.0).into_product(ProductId::from("b")),
            draft("A", 1.0).into_product(ProductId::from("a")),
        ];
        p.save(&stored);

        let sink = Arc::new(RecordingSink::default());
        let store = ProductStore::with_sink(p, sink.clone());
        assert_eq!(store.load().unwrap(), 2);
        assert_eq!(store.products(), stored);
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn unreadable_storage_loads_empty_and_ready() {
        let (kv, p) = persistence();
        kv.set(PRODUCTS_KEY, "[{\"id\":").unwrap();
        let store = ProductStore::new(p);
        assert_eq!(store.load().unwrap(), 0);
        assert_eq!(store.phase(), Phase::Ready);
    }

    #[test]
    fn poisoned_lock_reads_fall_back_and_mutations_fail() {
        let store = ready_store();
        store.add(draft("A", 1.0)).unwrap();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.state.write().unwrap();
            panic!("poison the catalog lock");
        }));

        assert_eq!(store.phase(), Phase::Loading);
        assert_eq!(store.len(), 0);
        assert!(store.products().is_empty());
        assert!(matches!(
            store.add(draft("B", 1.0)),
            Err(CatalogError::LockPoisoned(_))
        ));
    }

    #[test]
    fn non_finite_price_does_not_clobber_storage() {
        let (kv, p) = persistence();
        let store = ProductStore::new(p.clone());
        store.load().unwrap();
        let kept = store.add(draft("Kept", 1.0)).unwrap();
        store.add(draft("Broken", f64::NAN)).unwrap();

        let reopened = ProductStore::new(p);
        assert_eq!(reopened.load().unwrap(), 1);
        assert_eq!(reopened.products(), vec![kept]);
        assert!(!kv.get(PRODUCTS_KEY).unwrap().unwrap().contains("null"));
    }

    // ---- Add ----

    #[test]
    fn add_assigns_generated_id_and_keeps_fields() {
        let store = ready_store();
        let product = store.add(draft("Widget", 100.0)).unwrap();

        assert_eq!(store.len(), 1);
        assert!(product.id.is_generated());
        assert_eq!(product.price, 100.0);
        assert_eq!(store.products()[0], product);
    }

    #[test]
    fn newest_product_comes_first() {
        let store = ready_store();
        let a = store.add(draft("A", 1.0)).unwrap();
        let b = store.add(draft("B", 2.0)).unwrap();
        let ids: Vec<ProductId> = store.products().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    // ---- Update ----

    #[test]
    fn update_replaces_matching_record_in_place() {
        let store = ready_store();
        let a = store.add(draft("A", 1.0)).unwrap();
        let b = store.add(draft("B", 2.0)).unwrap();

        let mut changed = a.clone();
        changed.price = 200.0;
        assert!(store.update(changed.clone()).unwrap());

        let products = store.products();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0], b);
        assert_eq!(products[1], changed);
        assert_eq!(products[1].id, a.id);
    }

    #[test]
    fn update_of_unknown_id_changes_nothing() {
        let store = ready_store();
        store.add(draft("A", 1.0)).unwrap();
        let before = store.products();

        let stranger = draft("X", 9.0).into_product(ProductId::from("missing"));
        assert!(!store.update(stranger).unwrap());
        assert_eq!(store.products(), before);
    }

    // ---- Delete ----

    #[test]
    fn delete_removes_exactly_one() {
        let store = ready_store();
        let a = store.add(draft("A", 1.0)).unwrap();
        let b = store.add(draft("B", 2.0)).unwrap();
        let c = store.add(draft("C", 3.0)).unwrap();

        assert_eq!(store.delete(&b.id).unwrap(), Some(b));
        assert_eq!(store.products(), vec![c, a]);
    }

    #[test]
    fn delete_of_unknown_id_changes_nothing() {
        let store = ready_store();
        store.add(draft("A", 1.0)).unwrap();
        let before = store.products();
        assert_eq!(store.delete(&ProductId::from("missing")).unwrap(), None);
        assert_eq!(store.products(), before);
    }

    // ---- Persistence ----

    #[test]
    fn every_mutation_submits_full_collection() {
        let (sink, store) = recording_store();
        let a = store.add(draft("A", 1.0)).unwrap();
        store.add(draft("B", 2.0)).unwrap();
        store.update(a.clone()).unwrap();
        store.delete(&ProductId::from("missing")).unwrap();
        store.delete(&a.id).unwrap();

        assert_eq!(sink.count(), 5);
        assert_eq!(sink.last().unwrap(), store.products());
    }

    #[test]
    fn write_through_mirrors_storage_after_each_mutation() {
        let (_, p) = persistence();
        let store = ProductStore::new(p.clone());
        store.load().unwrap();

        let a = store.add(draft("A", 1.0)).unwrap();
        assert_eq!(p.load(), store.products());

        let mut changed = a.clone();
        changed.name = "A2".into();
        store.update(changed).unwrap();
        assert_eq!(p.load(), store.products());

        store.delete(&a.id).unwrap();
        assert!(p.load().is_empty());
    }

    #[test]
    fn failed_save_keeps_memory_authoritative() {
        let kv = Arc::new(InMemoryKeyValueStore::with_quota(32));
        let store = ProductStore::new(ProductPersistence::new(kv.clone()));
        store.load().unwrap();

        let product = store.add(draft("A rather long product name", 1.0)).unwrap();
        assert_eq!(store.products(), vec![product]);
        assert!(kv.is_empty());
    }

    #[test]
    fn get_finds_by_id() {
        let store = ready_store();
        let a = store.add(draft("A", 1.0)).unwrap();
        assert_eq!(store.get(&a.id), Some(a));
        assert_eq!(store.get(&ProductId::from("nope")), None);
    }

    proptest! {
        #[test]
        fn adds_yield_distinct_ids_newest_first(names in proptest::collection::vec("[a-z]{1,8}", 0..40)) {
            let store = ready_store();
            for name in &names {
                store.add(draft(name, 1.0)).unwrap();
            }

            let products = store.products();
            prop_assert_eq!(products.len(), names.len());

            let ids: HashSet<_> = products.iter().map(|p| p.id.clone()).collect();
            prop_assert_eq!(ids.len(), names.len());

            let stored_names: Vec<String> = products.into_iter().map(|p| p.name).collect();
            let expected: Vec<String> = names.iter().rev().cloned().collect();
            prop_assert_eq!(stored_names, expected);
        }
    }
}
