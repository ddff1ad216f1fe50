use mart_store::ProductPersistence;
use mart_types::Product;

/// Receives the full collection after every mutation.
///
/// `submit` is called while the store holds its write lock, so snapshots
/// arrive in mutation order. Implementations must not call back into the
/// store.
pub trait SnapshotSink: Send + Sync {
    fn submit(&self, products: Vec<Product>);
}

/// Synchronous write-through. Failures are logged by the adapter.
impl SnapshotSink for ProductPersistence {
    fn submit(&self, products: Vec<Product>) {
        self.save(&products);
    }
}
