//! Browser LocalStorage backend

use super::ScoreStorage;
use crate::error::StorageError;

/// Scores kept as decimal strings in `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct WebStorage;

impl WebStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl ScoreStorage for WebStorage {
    fn load(&self, key: &str) -> Option<u64> {
        let value = Self::storage()?.get_item(key).ok().flatten()?;
        value.trim().parse().ok()
    }

    fn store(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        let storage = Self::storage()
            .ok_or_else(|| StorageError::Unavailable("localStorage missing".to_string()))?;
        storage
            .set_item(key, &value.to_string())
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }
}
