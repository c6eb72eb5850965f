//! Key/value record storage behind the cart store.
//!
//! Mirrors the browser's local storage: string keys, string values, whole
//! record replaced on every write.

use std::collections::HashMap;

use thiserror::Error;

/// Key of the single record holding the serialized cart.
pub const STORAGE_KEY: &str = "simple_cart_v1";

/// Errors raised by a [`CartStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the write because it is full.
    #[error("storage quota exceeded ({needed} bytes needed, {quota} allowed)")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// A string key/value store.
///
/// Writes must replace the record atomically: after `set` returns `Ok`, a
/// `get` returns the new value; after it returns `Err`, the old value.
pub trait CartStorage {
    /// Read the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write did not happen.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the record stored under `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage, with an optional per-record size quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Empty, unbounded storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty storage that rejects records longer than `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            records: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Storage pre-seeded with one record.
    #[must_use]
    pub fn with_record(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.records.insert(key.to_string(), value.to_string());
        storage
    }

    /// Borrow a stored record without going through the trait.
    #[must_use]
    pub fn record(&self, key: &str) -> Option<&str> {
        self.records.get(key).map(String::as_str)
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota
            && value.len() > quota
        {
            return Err(StorageError::QuotaExceeded {
                needed: value.len(),
                quota,
            });
        }
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.records.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get("k").unwrap().is_none());
        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        storage.remove("k").unwrap();
        assert!(storage.record("k").is_none());
    }

    #[test]
    fn test_quota_rejects_and_keeps_old_value() {
        let mut storage = MemoryStorage::with_quota(4);
        storage.set("k", "[]").unwrap();
        let err = storage.set("k", "too long").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 4, .. }));
        assert_eq!(storage.record("k"), Some("[]"));
    }
}
