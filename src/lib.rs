//! Lava Stack - simulation cores for two small arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (runner physics, block stacking, effects)
//! - `session`: Sims wired to persistence and event draining
//! - `platform`: Frame pacing and browser bindings
//! - `persistence`: Key-value storage backends
//! - `highscores`: Per-game monotonic high score
//! - `settings`: Data-driven game configuration

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SettingsError, StorageError};
pub use highscores::{GameId, HighScores};
pub use session::{RunnerSession, StackSession};
pub use settings::{RunnerVariant, Settings};

/// Game configuration constants
pub mod consts {
    /// Nominal host frame rate the runner physics is tuned for
    pub const FRAME_RATE: u32 = 60;
    /// Fixed runner frame duration in seconds
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE as f32;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Runner tuning (units are pixels and frames)
    pub mod runner {
        pub const ARENA_WIDTH: f32 = 800.0;
        pub const ARENA_HEIGHT: f32 = 400.0;

        pub const PLAYER_X: f32 = 100.0;
        pub const PLAYER_SIZE: f32 = 25.0;
        /// Respawn / start height, above the floor
        pub const PLAYER_START_Y: f32 = ARENA_HEIGHT - 50.0;

        pub const GRAVITY: f32 = 0.8;
        pub const JUMP_FORCE: f32 = -15.0;
        pub const SUPER_JUMP_FORCE: f32 = -24.75;

        pub const BASE_GAME_SPEED: f32 = 5.0;
        pub const SPEED_STEP: f32 = 1.05;

        pub const MIN_GAP: f32 = 150.0;
        pub const MAX_GAP: f32 = 500.0;
        pub const OBSTACLE_WIDTH: f32 = 30.0;
        pub const OBSTACLE_MIN_HEIGHT: f32 = 15.0;
        pub const OBSTACLE_MAX_HEIGHT: f32 = 60.0;

        pub const BOOST_EVERY: u32 = 10;
        pub const BOOST_SIZE: f32 = 20.0;
        pub const BOOST_Y: f32 = ARENA_HEIGHT - 40.0;
        /// Boost offset range as a fraction of the obstacle gap
        pub const BOOST_OFFSET_MIN: f32 = 0.3;
        pub const BOOST_OFFSET_SPAN: f32 = 0.4;

        /// Block count whose spawn brings wings
        pub const WINGS_AT_BLOCK: u32 = 20;
        pub const WING_PICKUP_SIZE: f32 = 30.0;
        pub const WING_PICKUP_Y: f32 = ARENA_HEIGHT - 100.0;

        pub const WINGS_MAX_POWER: f32 = 100.0;
        pub const WINGS_DEPLETION: f32 = 0.42;
        pub const WINGS_RECHARGE: f32 = 0.2;
        /// Vertical velocity held while flying
        pub const FLIGHT_LIFT: f32 = -5.0;
        pub const WING_FLAP_SPEED: f32 = 0.15;

        pub const MAX_HEARTS: u8 = 3;
        pub const INVINCIBILITY_FRAMES: u64 = 90;

        pub const PLATFORM_STEPS: usize = 5;
        pub const PLATFORM_WIDTH: f32 = 70.0;
        pub const PLATFORM_HEIGHT: f32 = 10.0;
        pub const PLATFORM_FIRST_DX: f32 = 80.0;
        pub const PLATFORM_FIRST_RISE: f32 = 80.0;
        pub const PLATFORM_STEP_DX: f32 = 100.0;
        pub const PLATFORM_STEP_RISE: f32 = 50.0;
        /// Landing band around a platform top: [y - ABOVE, y + BELOW]
        pub const PLATFORM_SNAP_ABOVE: f32 = 5.0;
        pub const PLATFORM_SNAP_BELOW: f32 = 10.0;
    }

    /// Block stack tuning (units are cells and milliseconds)
    pub mod stack {
        pub const BOARD_WIDTH: usize = 10;
        pub const BOARD_HEIGHT: usize = 20;

        pub const INITIAL_SPEED_MS: u64 = 1000;
        pub const MIN_SPEED_MS: u64 = 100;
        pub const BASE_POINTS_FOR_LEVEL: u64 = 500;
        pub const MAX_LEVEL: u32 = 10;
        pub const MAX_COMBO_MULTIPLIER: u32 = 5;
        pub const GAME_OVER_DELAY_MS: u64 = 2000;

        /// Base points by number of lines cleared in one placement
        pub const LINE_SCORES: [u64; 5] = [0, 100, 250, 400, 550];
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Lava Stack starting...");
}
