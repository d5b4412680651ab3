//! Game settings
//!
//! Persisted separately from high scores: LocalStorage on the web, a JSON
//! file on native.

use serde::{Deserialize, Serialize};

use crate::consts::runner::MAX_HEARTS;
use crate::sim::stack::StackConfig;

/// Runner rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RunnerVariant {
    /// One hit ends the run; wings come from a pickup
    V1,
    /// Hearts, invincibility, boost staircases; wings granted by distance
    #[default]
    V2,
}

impl RunnerVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunnerVariant::V1 => "v1",
            RunnerVariant::V2 => "v2",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "v1" | "1" | "classic" => Some(RunnerVariant::V1),
            "v2" | "2" | "hearts" => Some(RunnerVariant::V2),
            _ => None,
        }
    }

    pub fn starting_hearts(&self) -> u8 {
        match self {
            RunnerVariant::V1 => 1,
            RunnerVariant::V2 => MAX_HEARTS,
        }
    }

    /// Spawns between speed-ups
    pub fn speed_up_every(&self) -> u32 {
        match self {
            RunnerVariant::V1 => 15,
            RunnerVariant::V2 => 10,
        }
    }

    pub fn has_platforms(&self) -> bool {
        matches!(self, RunnerVariant::V2)
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub runner_variant: RunnerVariant,
    /// Fixed RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
    pub stack: StackConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            runner_variant: RunnerVariant::V2,
            seed: None,
            stack: StackConfig::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lava_stack_settings";

    pub fn from_json(json: &str) -> Result<Self, crate::SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, crate::SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, crate::SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), crate::SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from `path`, falling back to defaults on any error
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }
}
