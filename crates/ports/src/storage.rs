//! Key-value storage boundary contract.
//!
//! Mirrors the browser storage the web client keeps its session in: string
//! keys, string values, last write wins.

use ubs_diag_shared::{ErrorCode, ErrorEnvelope, Result};

/// Boundary contract for a string key-value store.
///
/// Implementations synchronize internally so a store can be shared behind an
/// `Arc` across threads.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Reject keys a store cannot hold.
pub fn validate_storage_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(ErrorEnvelope::expected(
            ErrorCode::new("storage", "invalid_key"),
            "storage key must not be blank",
        ));
    }
    Ok(())
}
