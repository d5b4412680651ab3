//! Platform layer
//!
//! Handles host differences for:
//! - Frame pacing (fixed 60 Hz runner steps from variable host frames)
//! - Browser bindings (wasm only)

pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use time::FrameClock;
