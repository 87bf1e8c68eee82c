//! In-memory key-value store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use ubs_diag_ports::{KeyValueStore, validate_storage_key};
use ubs_diag_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};

/// Process-local store; contents vanish when the value is dropped.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Returns true when nothing is stored.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries.lock().map_err(|_| {
            ErrorEnvelope::unexpected(
                ErrorCode::new("storage", "lock_poisoned"),
                "in-memory store lock poisoned",
                ErrorClass::NonRetriable,
            )
        })
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_storage_key(key)?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_storage_key(key)?;
        self.lock()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_storage_key(key)?;
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn set_get_remove() -> Result<()> {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("access_token")?, None);

        store.set("access_token", "abc")?;
        store.set("access_token", "def")?;
        assert_eq!(store.get("access_token")?.as_deref(), Some("def"));
        assert_eq!(store.len()?, 1);

        store.remove("access_token")?;
        store.remove("access_token")?;
        assert!(store.is_empty()?);
        Ok(())
    }

    #[test]
    fn blank_keys_are_rejected() {
        let store = InMemoryKeyValueStore::new();
        assert!(store.set("", "x").is_err());
        assert!(store.get(" ").is_err());
    }

    #[test]
    fn concurrent_writers_do_not_lose_keys() -> Result<()> {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let handles: Vec<_> = (0..8)
            .map(|index| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.set(&format!("key-{index}"), "v"))
            })
            .collect();
        for handle in handles {
            handle.join().map_err(|_| {
                ErrorEnvelope::unexpected(
                    ErrorCode::internal(),
                    "writer thread panicked",
                    ErrorClass::NonRetriable,
                )
            })??;
        }
        assert_eq!(store.len()?, 8);
        Ok(())
    }
}
