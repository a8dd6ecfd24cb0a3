//! The active falling piece.

use crate::core::grid::Grid;
use crate::core::pieces;
use crate::types::{PieceKind, Rotation};

/// The piece currently under player control: a kind, an anchor position
/// (top-left corner of the shape box) and a rotation state with its
/// materialized shape. The anchor row may go negative while a kick or a
/// spawn hangs above the visible board.
#[derive(Debug, Clone)]
pub struct MovingPiece {
    pub kind: PieceKind,
    pub row: i32,
    pub col: i32,
    rotation: Rotation,
    shape: Grid<u8>,
}

impl MovingPiece {
    /// A piece in spawn orientation, horizontally centered on a board of
    /// `board_cols` columns.
    pub fn spawn(kind: PieceKind, board_cols: usize) -> Self {
        let shape = pieces::shape(kind);
        let col = (board_cols / 2) as i32 - (shape.cols() / 2) as i32;
        MovingPiece {
            kind,
            row: 0,
            col,
            rotation: Rotation::North,
            shape,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn shape(&self) -> &Grid<u8> {
        &self.shape
    }

    /// Swaps in the shape variant for `rotation`. Position is untouched;
    /// the caller has already validated the kicked placement.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.shape = pieces::rotated_shape(self.kind, rotation);
    }
}
