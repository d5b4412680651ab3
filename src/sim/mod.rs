//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time advances only through explicit steps (frames or timer ticks)
//! - Stable iteration order (spawn order)
//! - No rendering, storage or platform dependencies

pub mod rect;
pub mod runner;
pub mod schedule;
pub mod stack;

pub use rect::{Bounded, Rect, scroll_and_cull};
pub use runner::{RunnerEvent, RunnerPhase, RunnerState};
pub use schedule::EffectQueue;
pub use stack::{Board, DropTimer, Piece, PieceColor, PieceKind, StackConfig, StackEvent, StackPhase, StackState};
