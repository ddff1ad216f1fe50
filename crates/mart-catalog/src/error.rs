use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A mutation arrived before the initial load finished.
    #[error("catalog is still loading")]
    NotReady,

    /// `load` was called on a store that is already populated.
    #[error("catalog has already been loaded")]
    AlreadyLoaded,

    /// The background writer task has stopped.
    #[error("persistence writer is closed")]
    WriterClosed,

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience alias used throughout the catalog crate.
pub type CatalogResult<T> = Result<T, CatalogError>;
