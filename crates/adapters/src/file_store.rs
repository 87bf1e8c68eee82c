//! JSON-file key-value store.
//!
//! The whole store is one JSON object (`{"key": "value", ...}`). Every write
//! rewrites the file through a sibling `.tmp` file and a rename, so readers
//! never observe a half-written store.

use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use ubs_diag_ports::{KeyValueStore, validate_storage_key};
use ubs_diag_shared::{ErrorClass, ErrorCode, ErrorEnvelope, Result};

/// Store persisted as a JSON object file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Bind a store to `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| {
            ErrorEnvelope::unexpected(
                ErrorCode::new("storage", "lock_poisoned"),
                "file store lock poisoned",
                ErrorClass::NonRetriable,
            )
        })
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(error) => return Err(io_error(&self.path, error)),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) | Err(_) => Err(ErrorEnvelope::expected(
                ErrorCode::new("storage", "corrupt_store"),
                "session store is not a JSON object",
            )
            .with_metadata("path", self.path.display().to_string())),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| io_error(parent, error))?;
        }
        let encoded = serde_json::to_vec_pretty(entries).map_err(|error| {
            ErrorEnvelope::unexpected(
                ErrorCode::internal(),
                format!("failed to encode session store: {error}"),
                ErrorClass::NonRetriable,
            )
        })?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        write_and_sync(&tmp_path, &encoded)?;
        fs::rename(&tmp_path, &self.path).map_err(|error| io_error(&self.path, error))
    }

    // Rewrites the file only when `apply` reports a change.
    fn update(&self, apply: impl FnOnce(&mut Map<String, Value>) -> bool) -> Result<()> {
        let _guard = self.lock()?;
        let mut entries = self.read_entries()?;
        if !apply(&mut entries) {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_storage_key(key)?;
        let _guard = self.lock()?;
        let entries = self.read_entries()?;
        Ok(entries.get(key).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_storage_key(key)?;
        self.update(|entries| {
            entries.insert(key.to_owned(), Value::String(value.to_owned()));
            true
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_storage_key(key)?;
        self.update(|entries| entries.remove(key).is_some())
    }
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|error| io_error(path, error))?;
    file.write_all(bytes).map_err(|error| io_error(path, error))?;
    file.sync_all().map_err(|error| io_error(path, error))
}

fn io_error(path: &Path, error: std::io::Error) -> ErrorEnvelope {
    ErrorEnvelope::from(error).with_metadata("path", path.display().to_string())
}
