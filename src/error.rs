//! Error types for the fallible edges of the crate
//!
//! The simulations themselves never fail at runtime; invalid commands are
//! ignored. Only construction-time validation and storage can error.

use thiserror::Error;

/// Invalid block stack configuration, detected once at construction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },
    #[error("piece {kind} ({piece_width}x{piece_height}) does not fit a {width}x{height} board")]
    PieceTooLarge {
        kind: &'static str,
        piece_width: usize,
        piece_height: usize,
        width: usize,
        height: usize,
    },
    #[error("speed range is inverted: initial {initial_ms}ms < minimum {min_ms}ms")]
    SpeedRange { initial_ms: u64, min_ms: u64 },
    #[error("max level must be at least 1")]
    NoLevels,
}

/// High score storage failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Settings file failure
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),
}
