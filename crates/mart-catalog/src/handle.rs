use std::ops::Deref;
use std::sync::Arc;

use mart_store::ProductPersistence;
use tracing::debug;

use crate::error::CatalogResult;
use crate::store::ProductStore;
use crate::writer::{CoalescingWriter, WriteStatus};

/// The one product store of a running process, shared by cloning.
///
/// Build it once at startup and pass it down explicitly. Every clone points
/// at the same store.
#[derive(Clone)]
pub struct CatalogHandle {
    store: Arc<ProductStore>,
    writer: Option<Arc<CoalescingWriter>>,
}

impl CatalogHandle {
    /// A catalog that writes through synchronously on every mutation.
    pub fn write_through(persistence: ProductPersistence) -> Self {
        Self {
            store: Arc::new(ProductStore::new(persistence)),
            writer: None,
        }
    }

    /// A catalog whose writes go through a [`CoalescingWriter`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn background(persistence: ProductPersistence) -> Self {
        let writer = CoalescingWriter::spawn(persistence.clone());
        Self {
            store: Arc::new(ProductStore::with_sink(persistence, writer.clone())),
            writer: Some(writer),
        }
    }

    pub fn store(&self) -> &Arc<ProductStore> {
        &self.store
    }

    /// Wait for pending background writes. A no-op for write-through.
    pub async fn flush(&self) -> CatalogResult<Option<WriteStatus>> {
        match &self.writer {
            Some(writer) => {
                let status = writer.flush().await?;
                debug!(generation = status.generation, saved = status.saved, "catalog flushed");
                Ok(Some(status))
            }
            None => Ok(None),
        }
    }
}

impl Deref for CatalogHandle {
    type Target = ProductStore;

    fn deref(&self) -> &ProductStore {
        &self.store
    }
}
