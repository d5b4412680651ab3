//! JSON file backend

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::ScoreStorage;
use crate::error::StorageError;

/// All slots in one JSON object, rewritten whole on every store
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    values: BTreeMap<String, u64>,
}

impl JsonFileStorage {
    /// Open `path`; a missing file starts empty, a corrupt one is an error
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(json) if json.trim().is_empty() => BTreeMap::new(),
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Opened score file {} ({} entries)", path.display(), values.len());
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStorage for JsonFileStorage {
    fn load(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn store(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);
        let json = serde_json::to_string_pretty(&self.values)?;
        // Write beside the target then rename, so a crash never leaves half a file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lava_stack_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen");
        let _ = std::fs::remove_file(&path);

        let mut storage = JsonFileStorage::open(&path).unwrap();
        assert_eq!(storage.load("lavaHighScore"), None);
        storage.store("lavaHighScore", 42).unwrap();
        storage.store("tetrisHighScore", 1300).unwrap();

        let reopened = JsonFileStorage::open(&path).unwrap();
        assert_eq!(reopened.load("lavaHighScore"), Some(42));
        assert_eq!(reopened.load("tetrisHighScore"), Some(1300));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileStorage::open(&path),
            Err(StorageError::Json(_))
        ));
        let _ = std::fs::remove_file(&path);
    }
}
