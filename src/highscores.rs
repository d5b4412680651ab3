//! Per-game best score
//!
//! One integer per game, persisted through a `ScoreStorage` backend. The
//! stored value only ever grows.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::persistence::{MemoryStorage, ScoreStorage};

/// Which game a score belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameId {
    Runner,
    Stack,
}

impl GameId {
    /// Storage slot name; kept stable so existing saved scores still load
    pub fn storage_key(&self) -> &'static str {
        match self {
            GameId::Runner => "lavaHighScore",
            GameId::Stack => "tetrisHighScore",
        }
    }
}

/// Shared handle to the high score table.
///
/// Clones share the same backend, so a runner session and a stack session
/// can hold one each.
#[derive(Clone)]
pub struct HighScores {
    storage: Arc<Mutex<Box<dyn ScoreStorage>>>,
}

impl HighScores {
    pub fn new(storage: impl ScoreStorage + 'static) -> Self {
        Self {
            storage: Arc::new(Mutex::new(Box::new(storage))),
        }
    }

    /// Table that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Browser LocalStorage table
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::new(crate::persistence::WebStorage::new())
    }

    /// JSON file table; falls back to memory if the file cannot be read
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match crate::persistence::JsonFileStorage::open(path) {
            Ok(storage) => Self::new(storage),
            Err(e) => {
                log::warn!("High scores not persisted ({}): {}", path.display(), e);
                Self::in_memory()
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn ScoreStorage>> {
        // A panic mid-store leaves at worst a stale value, so keep going
        self.storage.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Best score so far, 0 if none recorded
    pub fn get(&self, game: GameId) -> u64 {
        self.lock().load(game.storage_key()).unwrap_or(0)
    }

    /// Record `score` if it beats the stored best.
    ///
    /// Returns true when the stored value changed. Backend failures are
    /// logged and reported as false; the in-game value stays authoritative.
    pub fn record(&self, game: GameId, score: u64) -> bool {
        let mut storage = self.lock();
        let key = game.storage_key();
        let best = storage.load(key).unwrap_or(0);
        if score <= best {
            return false;
        }
        match storage.store(key, score) {
            Ok(()) => {
                log::info!("New {:?} high score: {}", game, score);
                true
            }
            Err(e) => {
                log::warn!("Failed to save {:?} high score {}: {}", game, score, e);
                false
            }
        }
    }
}

impl std::fmt::Debug for HighScores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScores")
            .field("runner", &self.get(GameId::Runner))
            .field("stack", &self.get(GameId::Stack))
            .finish()
    }
}

impl Default for HighScores {
    fn default() -> Self {
        Self::in_memory()
    }
}
