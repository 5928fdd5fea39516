//! In-memory storage for tests and embedding
//!
//! Clones share the same underlying map, so the equipment store and the
//! operation-log store can observe each other's writes the way they would
//! through a real backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::storage::{StorageBackend, StorageError};

/// Shared-map backend with an optional total-size cap
///
/// The cap models a quota-limited backend: once the sum of stored values
/// would exceed it, writes fail with [`StorageError::CapacityExceeded`]
/// while reads keep working.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Arc<Mutex<HashMap<String, String>>>,
    capacity: Option<usize>,
}

impl MemoryBackend {
    /// Create an unbounded in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that rejects writes once total stored bytes exceed `bytes`
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            capacity: Some(bytes),
        }
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.data.lock().expect("storage map poisoned").len()
    }

    /// Whether the backend holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let data = self.data.lock().expect("storage map poisoned");
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut data = self.data.lock().expect("storage map poisoned");
        if let Some(cap) = self.capacity {
            let others: usize = data
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            if others + value.len() > cap {
                return Err(StorageError::CapacityExceeded {
                    key: key.to_string(),
                });
            }
        }
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut data = self.data.lock().expect("storage map poisoned");
        data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let backend = MemoryBackend::new();
        backend.set("k", "v").unwrap();
        assert_eq!(backend.get("k").unwrap().unwrap(), "v");
        backend.remove("k").unwrap();
        assert!(backend.get("k").unwrap().is_none());
    }

    #[test]
    fn test_clones_share_data() {
        let a = MemoryBackend::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().unwrap(), "v");
    }

    #[test]
    fn test_capacity_rejects_oversized_write() {
        let backend = MemoryBackend::with_capacity(10);
        backend.set("a", "12345").unwrap();
        let err = backend.set("b", "123456789").unwrap_err();
        assert!(matches!(err, StorageError::CapacityExceeded { .. }));
        // The earlier blob is untouched
        assert_eq!(backend.get("a").unwrap().unwrap(), "12345");
    }

    #[test]
    fn test_capacity_allows_replacing_same_key() {
        let backend = MemoryBackend::with_capacity(10);
        backend.set("a", "1234567890").unwrap();
        // Replacement is measured against the new value, not old + new
        backend.set("a", "0987654321").unwrap();
    }
}
