//! The [`Catalog`] trait: what consumers of the product store may do.

use mart_types::{Product, ProductDraft, ProductId};

use crate::error::CatalogResult;

/// Read and mutate the product collection.
///
/// Readers always get the latest in-memory snapshot without blocking on
/// persistence. Mutations fail with
/// [`CatalogError::NotReady`](crate::CatalogError::NotReady) until the
/// initial load has completed.
pub trait Catalog: Send + Sync {
    /// Current collection, most recently added first.
    fn products(&self) -> Vec<Product>;

    /// Whether the initial load is still pending.
    fn is_loading(&self) -> bool;

    /// Assign a fresh id and insert at the head of the collection.
    fn add(&self, draft: ProductDraft) -> CatalogResult<Product>;

    /// Replace the record with the same id. Returns `false` if there is none.
    fn update(&self, product: Product) -> CatalogResult<bool>;

    /// Remove the record with `id`, returning it if it existed.
    fn delete(&self, id: &ProductId) -> CatalogResult<Option<Product>>;

    /// Look up a single record.
    fn get(&self, id: &ProductId) -> Option<Product> {
        self.products().into_iter().find(|p| &p.id == id)
    }
}
