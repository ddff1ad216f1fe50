//! Background persistence with write coalescing.
//!
//! [`CoalescingWriter`] is a [`SnapshotSink`] backed by a single tokio task.
//! Submitting a snapshot never blocks on I/O: it replaces the pending
//! snapshot in a `watch` channel, so bursts of mutations collapse into one
//! write of the newest collection. Each submission bumps a generation
//! counter; the task publishes the generation it last wrote, which is what
//! [`CoalescingWriter::flush`] waits on.

use std::sync::{Arc, Mutex};

use mart_store::ProductPersistence;
use mart_types::Product;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::sink::SnapshotSink;

#[derive(Clone, Debug, Default)]
struct Snapshot {
    generation: u64,
    products: Arc<Vec<Product>>,
}

/// Outcome of the most recent background write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteStatus {
    /// Generation of the snapshot that was written.
    pub generation: u64,
    /// Whether the adapter reported success.
    pub saved: bool,
}

pub struct CoalescingWriter {
    pending: watch::Sender<Snapshot>,
    status: watch::Receiver<WriteStatus>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl CoalescingWriter {
    /// Start the writer task on the current tokio runtime.
    pub fn spawn(persistence: ProductPersistence) -> Arc<Self> {
        let (pending, pending_rx) = watch::channel(Snapshot::default());
        let (status_tx, status) = watch::channel(WriteStatus::default());
        let task = tokio::spawn(run(persistence, pending_rx, status_tx));
        Arc::new(Self {
            pending,
            status,
            task: Mutex::new(Some(task)),
        })
    }

    /// Generation of the newest submitted snapshot.
    pub fn submitted(&self) -> u64 {
        self.pending.borrow().generation
    }

    /// Outcome of the newest completed write.
    pub fn last_write(&self) -> WriteStatus {
        *self.status.borrow()
    }

    /// Wait until everything submitted so far has been written.
    pub async fn flush(&self) -> CatalogResult<WriteStatus> {
        let target = self.submitted();
        let mut status = self.status.clone();
        let reached = status
            .wait_for(|s| s.generation >= target)
            .await
            .map_err(|_| CatalogError::WriterClosed)?;
        Ok(*reached)
    }

    /// Flush, then stop the task.
    pub async fn shutdown(&self) -> CatalogResult<WriteStatus> {
        let status = self.flush().await?;
        let task = self
            .task
            .lock()
            .map_err(|e| CatalogError::LockPoisoned(e.to_string()))?
            .take();
        if let Some(task) = task {
            task.abort();
        }
        Ok(status)
    }
}

impl SnapshotSink for CoalescingWriter {
    fn submit(&self, products: Vec<Product>) {
        self.pending.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.products = Arc::new(products);
        });
    }
}

async fn run(
    persistence: ProductPersistence,
    mut pending: watch::Receiver<Snapshot>,
    status: watch::Sender<WriteStatus>,
) {
    while pending.changed().await.is_ok() {
        let snapshot = pending.borrow_and_update().clone();
        let adapter = persistence.clone();
        let products = snapshot.products.clone();
        let saved = match tokio::task::spawn_blocking(move || adapter.save(&products)).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "persistence task failed");
                false
            }
        };
        debug!(generation = snapshot.generation, saved, "background write finished");
        status.send_replace(WriteStatus {
            generation: snapshot.generation,
            saved,
        });
    }
    debug!("persistence writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ProductStore;
    use crate::traits::Catalog;
    use mart_store::{InMemoryKeyValueStore, KeyValueStore};
    use mart_types::{ProductDraft, ProductId};

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.into(),
            price: 1.0,
            description: "d".into(),
            image: "data:image/png;base64,AAA=".into(),
        }
    }

    fn product(id: &str) -> Product {
        draft(id).into_product(ProductId::from(id))
    }

    #[tokio::test]
    async fn flush_with_nothing_submitted_returns_immediately() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let writer = CoalescingWriter::spawn(ProductPersistence::new(kv.clone()));
        let status = writer.flush().await.unwrap();
        assert_eq!(status.generation, 0);
        assert!(kv.is_empty());
    }

    #[tokio::test]
    async fn flush_waits_for_latest_snapshot() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let persistence = ProductPersistence::new(kv.clone());
        let writer = CoalescingWriter::spawn(persistence.clone());

        writer.submit(vec![product("a")]);
        writer.submit(vec![product("b"), product("a")]);
        let status = writer.flush().await.unwrap();

        assert_eq!(status.generation, 2);
        assert!(status.saved);
        assert_eq!(persistence.load(), vec![product("b"), product("a")]);
    }

    #[tokio::test]
    async fn store_with_background_writer_persists_final_state() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let persistence = ProductPersistence::new(kv.clone());
        let writer = CoalescingWriter::spawn(persistence.clone());
        let store = ProductStore::with_sink(persistence.clone(), writer.clone());
        store.load().unwrap();

        for i in 0..50 {
            store.add(draft(&format!("p{i}"))).unwrap();
        }
        let first = store.products().last().cloned().unwrap();
        store.delete(&first.id).unwrap();

        let status = writer.flush().await.unwrap();
        assert_eq!(status.generation, 51);
        assert_eq!(persistence.load(), store.products());
        assert_eq!(writer.last_write(), status);
    }

    #[tokio::test]
    async fn failed_write_is_reported_not_raised() {
        let kv = Arc::new(InMemoryKeyValueStore::with_quota(8));
        let writer = CoalescingWriter::spawn(ProductPersistence::new(kv.clone()));
        writer.submit(vec![product("a")]);

        let status = writer.flush().await.unwrap();
        assert_eq!(status.generation, 1);
        assert!(!status.saved);
        assert!(!kv.contains("products").unwrap());
    }

    #[tokio::test]
    async fn shutdown_flushes_then_closes() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let persistence = ProductPersistence::new(kv.clone());
        let writer = CoalescingWriter::spawn(persistence.clone());
        writer.submit(vec![product("a")]);

        let status = writer.shutdown().await.unwrap();
        assert!(status.saved);
        assert_eq!(persistence.load(), vec![product("a")]);
    }
}
