//! Durable storage for LXP Mart.
//!
//! The product collection is mirrored into a single slot of a key-value
//! store, the way a browser app keeps its state in per-origin storage. The
//! mirror is best effort: the in-memory collection owned by the catalog is
//! always the source of truth for the running process.
//!
//! # Storage Backends
//!
//! All backends implement the [`KeyValueStore`] trait:
//!
//! - [`InMemoryKeyValueStore`] -- `HashMap`-based store with an optional byte quota
//! - [`FileKeyValueStore`] -- one JSON file per key under a data directory
//!
//! # Persistence Adapter
//!
//! [`ProductPersistence`] encodes the collection as a JSON array under the
//! fixed key [`PRODUCTS_KEY`]. Its `load`/`save` never fail: decode errors
//! yield an empty collection and write errors are logged and dropped.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod persistence;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
pub use persistence::{ProductPersistence, PRODUCTS_KEY};
pub use traits::KeyValueStore;
