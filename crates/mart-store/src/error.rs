/// Errors from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key is empty or contains characters the backend cannot store.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// Writing the value would exceed the store's size budget.
    #[error("quota exceeded: {requested} bytes requested, {quota} bytes allowed")]
    QuotaExceeded { requested: usize, quota: usize },

    /// The stored payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The value could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding backend state was poisoned.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
