//! Falling-block puzzle
//!
//! Timer-stepped: a `DropTimer` calls `StackState::tick` at the current drop
//! interval. Commands move, rotate or drop the active piece and are ignored
//! while paused or outside play.

pub mod board;
pub mod piece;
pub mod state;
pub mod tick;
pub mod timer;

pub use board::{Board, Cell};
pub use piece::{Piece, PieceColor, PieceKind, Shape};
pub use state::{StackConfig, StackEffect, StackEvent, StackPhase, StackState};
pub use tick::line_clear_points;
pub use timer::DropTimer;
