//! Endless lava runner
//!
//! Frame-stepped: `RunnerState::advance` is one frame. Commands are
//! synchronous and silently ignored when they do not apply.

pub mod state;
pub mod tick;

pub use state::{
    Obstacle, Platform, Player, PowerBoost, RunnerEffect, RunnerEvent, RunnerPhase, RunnerState,
    WingPickup,
};
