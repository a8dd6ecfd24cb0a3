//! Piece catalog: canonical shapes, rotation variants, and spin rules.
//!
//! Each kind is data plus a kind-tagged spin classifier; rotation variants
//! are derived from the canonical shape by repeated quarter turns rather
//! than stored per state. Kick offsets live in [`crate::core::kicks`].

use crate::core::board::Board;
use crate::core::grid::Grid;
use crate::types::{PieceKind, Rotation, SpinKind};

/// Canonical spawn-state shape for `kind`. Non-empty cells carry the
/// kind's cell id so a locked piece stamps its identity into the board.
#[rustfmt::skip]
pub fn shape(kind: PieceKind) -> Grid<u8> {
    match kind {
        PieceKind::I => Grid::from_rows(4, 4, &[
            0, 0, 0, 0,
            0, 0, 0, 0,
            1, 1, 1, 1,
            0, 0, 0, 0,
        ]),
        PieceKind::O => Grid::from_rows(2, 2, &[
            2, 2,
            2, 2,
        ]),
        PieceKind::T => Grid::from_rows(3, 3, &[
            0, 3, 0,
            3, 3, 3,
            0, 0, 0,
        ]),
        PieceKind::S => Grid::from_rows(3, 3, &[
            0, 4, 4,
            4, 4, 0,
            0, 0, 0,
        ]),
        PieceKind::Z => Grid::from_rows(3, 3, &[
            5, 5, 0,
            0, 5, 5,
            0, 0, 0,
        ]),
        PieceKind::J => Grid::from_rows(3, 3, &[
            6, 0, 0,
            6, 6, 6,
            0, 0, 0,
        ]),
        PieceKind::L => Grid::from_rows(3, 3, &[
            0, 0, 7,
            7, 7, 7,
            0, 0, 0,
        ]),
    }
}

/// Shape variant for a rotation state. One quarter turn is transpose plus
/// a horizontal mirror, applied `state` times to the canonical shape.
pub fn rotated_shape(kind: PieceKind, rotation: Rotation) -> Grid<u8> {
    let mut grid = shape(kind);
    for _ in 0..rotation.index() {
        grid.transpose();
        grid.reverse_rows();
    }
    grid
}

/// Classifies the lock that just happened. Only the T piece carries a spin
/// rule; every other kind locks plain.
pub fn classify_spin(
    kind: PieceKind,
    board: &Board,
    row: i32,
    col: i32,
    rotation: Rotation,
) -> SpinKind {
    match kind {
        PieceKind::T => t_spin(board, row, col, rotation),
        _ => SpinKind::None,
    }
}

/// Corner rule for the T piece. The pivot sits at the center of the 3x3
/// shape box; its four diagonal neighbors are probed with off-board cells
/// counting as occupied. Fewer than three occupied corners is no spin;
/// both front corners (the side the tip points toward) or all four
/// occupied is a full spin; otherwise a mini.
fn t_spin(board: &Board, row: i32, col: i32, rotation: Rotation) -> SpinKind {
    let pivot_row = row + 1;
    let pivot_col = col + 1;

    // Top-left, top-right, bottom-right, bottom-left.
    let corners = [
        (pivot_row - 1, pivot_col - 1),
        (pivot_row - 1, pivot_col + 1),
        (pivot_row + 1, pivot_col + 1),
        (pivot_row + 1, pivot_col - 1),
    ];
    let occupied: Vec<bool> = corners
        .iter()
        .map(|&(r, c)| board.is_blocked_or_outside(r, c))
        .collect();
    let count = occupied.iter().filter(|&&o| o).count();

    if count < 3 {
        return SpinKind::None;
    }

    // Front corner pair per state: tip up, right, down, left.
    let front: [usize; 2] = match rotation {
        Rotation::North => [0, 1],
        Rotation::East => [1, 2],
        Rotation::South => [2, 3],
        Rotation::West => [3, 0],
    };
    let front_blocked = front.iter().all(|&i| occupied[i]);

    if count == 4 || front_blocked {
        SpinKind::Full
    } else {
        SpinKind::Mini
    }
}
