use crate::error::{StoreError, StoreResult};

/// A durable string-to-string slot store.
///
/// Implementations must be thread-safe and make each `set` atomic: a reader
/// sees either the previous value or the new one, never a mix.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored there.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Returns `true` if a value was stored.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Whether a value is stored under `key`.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Keys are restricted to `[A-Za-z0-9_-]` so that every backend can use them
/// as file names.
pub(crate) fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: "key must not be empty".into(),
        });
    }
    if let Some(ch) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: format!("contains forbidden character: {ch:?}"),
        });
    }
    Ok(())
}
