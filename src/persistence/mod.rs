//! Key-value storage for persisted scores
//!
//! Backends:
//! - `MemoryStorage`: process-local, used by tests and as a fallback
//! - `JsonFileStorage`: one JSON object on disk (native)
//! - `WebStorage`: browser LocalStorage (wasm)

use std::collections::BTreeMap;

use crate::error::StorageError;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStorage;
#[cfg(target_arch = "wasm32")]
pub use web::WebStorage;

/// Durable integer slots keyed by name
pub trait ScoreStorage: Send {
    /// Stored value, `None` when absent or unreadable
    fn load(&self, key: &str) -> Option<u64>;
    fn store(&mut self, key: &str, value: u64) -> Result<(), StorageError>;
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: BTreeMap<String, u64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn store(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
