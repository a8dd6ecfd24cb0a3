//! Read-only view of one frame of the simulation, for frontends and bots.

use crate::core::grid::Grid;
use crate::types::{GamePhase, PieceKind, Rotation};

/// The active piece as it sits on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceView {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub shape: Grid<u8>,
    pub row: i32,
    pub col: i32,
}

/// Everything an observer may see of a running game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Settled cells only; the active piece is not stamped in.
    pub board: Grid<u8>,
    pub active: Option<PieceView>,
    /// Row the active piece would rest at, or None when the ghost is
    /// disabled or no piece is live.
    pub ghost_row: Option<i32>,
    pub hold: Option<PieceKind>,
    /// Upcoming pieces, nearest first.
    pub preview: Vec<PieceKind>,
    pub phase: GamePhase,
    pub level: u32,
    pub lines_cleared: u32,
}
