//! Key-value blob storage behind the equipment and operation-log stores
//!
//! Both stores persist whole JSON documents under a string key. The backend
//! only moves opaque strings; serialization stays with the stores.

use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Storage keys used by the application
pub mod keys {
    /// The full category collection
    pub const CHECKLIST: &str = "checklist";

    /// The operation log, newest entry first
    pub const OPERATION_LOG: &str = "operation-log";
}

/// Durable string-blob storage scoped by key
pub trait StorageBackend {
    /// Read the blob stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous blob
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the blob stored under `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read key '{key}': {source}")]
    Read {
        key: String,
        source: std::io::Error,
    },

    #[error("failed to write key '{key}': {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },

    #[error("failed to remove key '{key}': {source}")]
    Remove {
        key: String,
        source: std::io::Error,
    },

    #[error("storage capacity exceeded while writing key '{key}'")]
    CapacityExceeded { key: String },
}
