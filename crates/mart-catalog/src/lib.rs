//! The LXP Mart product store.
//!
//! [`ProductStore`] owns the ordered product collection. It is populated
//! once from [`mart_store::ProductPersistence`] and, after every mutation,
//! hands the full collection to a [`SnapshotSink`] so the durable copy
//! tracks the in-memory one.
//!
//! # Lifecycle
//!
//! A store starts in [`Phase::Loading`] and moves to [`Phase::Ready`] the
//! first time [`ProductStore::load`] runs, whether or not anything was
//! found in storage. Mutations attempted while loading are rejected with
//! [`CatalogError::NotReady`].
//!
//! # Sharing
//!
//! There is no global instance. Build one [`CatalogHandle`] at startup and
//! pass clones of it (or `&dyn Catalog`) to whatever needs the catalog.
//!
//! # Persistence modes
//!
//! - Write-through: [`mart_store::ProductPersistence`] is itself a sink and
//!   writes synchronously inside each mutation.
//! - Background: [`CoalescingWriter`] runs a single tokio task that writes
//!   only the latest snapshot and exposes a flush signal.

pub mod error;
pub mod handle;
pub mod sink;
pub mod store;
pub mod traits;
pub mod writer;

pub use error::{CatalogError, CatalogResult};
pub use handle::CatalogHandle;
pub use sink::SnapshotSink;
pub use store::{Phase, ProductStore};
pub use traits::Catalog;
pub use writer::{CoalescingWriter, WriteStatus};
