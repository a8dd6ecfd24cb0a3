//! Core simulation: pure game rules, no I/O.
//!
//! Everything in here is deterministic. The same config, seed and command
//! stream always produce the same session.

pub mod bag;
pub mod board;
pub mod control;
pub mod engine;
pub mod grid;
pub mod kicks;
pub mod moving;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod timing;

// Re-export commonly used types
pub use bag::PieceBag;
pub use board::Board;
pub use control::PieceController;
pub use engine::Engine;
pub use grid::Grid;
pub use moving::MovingPiece;
pub use scoring::{GuidelineRules, ScoreRegistry, ScoreRules};
pub use snapshot::{GameSnapshot, PieceView};
pub use timing::{TimeManager, TimeMode, Timers};
