//! Key-value store port
//!
//! Defines the durable string store the panel cache is persisted in.

use thiserror::Error;

/// Errors reported by a key-value store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded")]
    QuotaExceeded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable, process-surviving string store
///
/// Values are opaque strings; callers serialize their own data.
/// Implementations live in the infrastructure layer.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; deleting a missing key succeeds
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
