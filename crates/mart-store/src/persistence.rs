use std::sync::Arc;

use mart_types::Product;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// Storage key holding the product collection.
pub const PRODUCTS_KEY: &str = "products";

/// Mirrors the product collection into a key-value slot.
///
/// The payload is a JSON array of product objects, with no version field.
/// There are no retries and no schema migration: a payload that does not
/// decode as an array of products is treated as absent.
#[derive(Clone)]
pub struct ProductPersistence {
    store: Arc<dyn KeyValueStore>,
}

impl ProductPersistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the stored collection, or an empty one on any failure.
    pub fn load(&self) -> Vec<Product> {
        match self.try_load() {
            Ok(products) => {
                debug!(count = products.len(), "loaded products");
                products
            }
            Err(e) => {
                warn!(error = %e, "could not load products; starting empty");
                Vec::new()
            }
        }
    }

    /// Store the collection, logging and dropping any failure.
    ///
    /// Returns whether the write succeeded.
    pub fn save(&self, products: &[Product]) -> bool {
        match self.try_save(products) {
            Ok(()) => {
                debug!(count = products.len(), "saved products");
                true
            }
            Err(e) => {
                warn!(error = %e, count = products.len(), "could not save products");
                false
            }
        }
    }

    /// Load the stored collection. An absent payload is an empty collection.
    pub fn try_load(&self) -> StoreResult<Vec<Product>> {
        match self.store.get(PRODUCTS_KEY)? {
            Some(json) => decode(&json),
            None => Ok(Vec::new()),
        }
    }

    pub fn try_save(&self, products: &[Product]) -> StoreResult<()> {
        let json = encode(products)?;
        self.store.set(PRODUCTS_KEY, &json)
    }
}

/// Decode a stored payload.
pub fn decode(json: &str) -> StoreResult<Vec<Product>> {
    serde_json::from_str(json).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Encode a collection for storage.
///
/// JSON has no representation for NaN or infinity, and serde_json would
/// write them as `null`, which [`decode`] then rejects. Such a collection
/// is refused instead so the previous payload stays intact.
pub fn encode(products: &[Product]) -> StoreResult<String> {
    if let Some(product) = products.iter().find(|p| !p.price.is_finite()) {
        return Err(StoreError::Encode(format!(
            "product {} has a non-finite price ({})",
            product.id, product.price
        )));
    }
    serde_json::to_string(products).map_err(|e| StoreError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryKeyValueStore;
    use mart_types::ProductId;
    use proptest::prelude::*;

    fn product(id: &str, price: f64) -> Product {
        Product {
            id: ProductId::from(id),
            name: format!("name-{id}"),
            price,
            description: "desc".into(),
            image: "data:image/png;base64,AAA=".into(),
        }
    }

    fn adapter() -> (Arc<InMemoryKeyValueStore>, ProductPersistence) {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let persistence = ProductPersistence::new(kv.clone());
        (kv, persistence)
    }

    #[test]
    fn missing_payload_loads_empty() {
        let (_, p) = adapter();
        assert!(p.load().is_empty());
        assert!(p.try_load().unwrap().is_empty());
    }

    #[test]
    fn saved_collection_loads_back_in_order() {
        let (_, p) = adapter();
        let products = vec![product("b", 2.0), product("a", 1.0)];
        assert!(p.save(&products));
        assert_eq!(p.load(), products);
    }

    #[test]
    fn truncated_payload_loads_empty() {
        let (kv, p) = adapter();
        kv.set(PRODUCTS_KEY, r#"[{"id":"a","name":"#).unwrap();
        assert!(p.load().is_empty());
        assert!(matches!(p.try_load(), Err(StoreError::Decode(_))));
    }

    #[test]
    fn non_json_payload_loads_empty() {
        let (kv, p) = adapter();
        kv.set(PRODUCTS_KEY, "not json at all").unwrap();
        assert!(p.load().is_empty());
    }

    #[test]
    fn structurally_incompatible_payload_loads_empty() {
        let (kv, p) = adapter();
        kv.set(PRODUCTS_KEY, r#"{"id":"a"}"#).unwrap();
        assert!(p.load().is_empty());

        kv.set(PRODUCTS_KEY, r#"[{"id":"a","name":"n"}]"#).unwrap();
        assert!(p.load().is_empty());

        kv.set(PRODUCTS_KEY, "null").unwrap();
        assert!(p.load().is_empty());
    }

    #[test]
    fn quota_failure_is_swallowed() {
        let kv = Arc::new(InMemoryKeyValueStore::with_quota(16));
        let p = ProductPersistence::new(kv.clone());
        assert!(!p.save(&[product("a", 1.0)]));
        assert!(matches!(
            p.try_save(&[product("a", 1.0)]),
            Err(StoreError::QuotaExceeded { .. })
        ));
        assert!(kv.is_empty());
    }

    #[test]
    fn non_finite_price_keeps_previous_payload() {
        let (kv, p) = adapter();
        let good = vec![product("a", 1.0)];
        assert!(p.save(&good));

        let bad = vec![product("a", 1.0), product("b", f64::NAN)];
        assert!(!p.save(&bad));
        assert!(matches!(p.try_save(&bad), Err(StoreError::Encode(_))));
        assert!(matches!(
            p.try_save(&[product("c", f64::INFINITY)]),
            Err(StoreError::Encode(_))
        ));

        assert!(!kv.get(PRODUCTS_KEY).unwrap().unwrap().contains("null"));
        assert_eq!(p.load(), good);
    }

    #[test]
    fn payload_is_a_plain_json_array() {
        let (kv, p) = adapter();
        p.save(&[product("a", 1.5)]);
        let raw = kv.get(PRODUCTS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], "a");
        assert_eq!(value[0]["price"], 1.5);
    }

    fn arb_product() -> impl Strategy<Value = Product> {
        ("[a-z0-9_]{1,12}", ".{1,20}", -1_000_000i32..1_000_000, ".{1,40}", "[A-Za-z0-9+/=]{0,16}")
            .prop_map(|(id, name, price, description, payload)| Product {
                id: ProductId::from(id),
                name,
                price: f64::from(price),
                description,
                image: format!("data:image/png;base64,{payload}"),
            })
    }

    proptest! {
        #[test]
        fn save_then_load_preserves_records(products in proptest::collection::vec(arb_product(), 0..8)) {
            let (_, p) = adapter();
            p.save(&products);
            let loaded = p.load();
            prop_assert_eq!(loaded.clone(), products.clone());

            p.save(&loaded);
            prop_assert_eq!(p.load(), products);
        }
    }
}
