//! SRS wall-kick offset tables.
//!
//! Lists are indexed by the source rotation state and tried in order. Each
//! entry is `(dx, dy)` with `dy` pointing up: the candidate anchor is
//! `(row - dy, col + dx)`. The I piece has its own tables; every other kind
//! uses the standard set (the O piece degenerates to the leading `(0, 0)`).

use crate::types::{PieceKind, Rotation, Turn};

pub type KickList = &'static [(i32, i32)];

/// J/L/S/T/Z clockwise kicks, by source state.
const STANDARD_CW: [[(i32, i32); 5]; 4] = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // from state 0
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],     // from state 1
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // from state 2
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],  // from state 3
];

/// J/L/S/T/Z counter-clockwise kicks, by source state.
const STANDARD_CCW: [[(i32, i32); 5]; 4] = [
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],    // from state 0
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],     // from state 1
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)], // from state 2
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],  // from state 3
];

/// J/L/S/T/Z half-turn kicks, by source state.
const STANDARD_HALF: [[(i32, i32); 6]; 4] = [
    [(0, 0), (0, 1), (1, 1), (-1, 1), (-1, 0), (1, 0)],    // from state 0
    [(0, 0), (1, 0), (1, 2), (0, 2), (1, 1), (0, 1)],      // from state 1
    [(0, 0), (0, -1), (-1, -1), (1, -1), (1, 0), (-1, 0)], // from state 2
    [(0, 0), (-1, 0), (-1, 2), (0, 2), (-1, 1), (0, 1)],   // from state 3
];

/// I-piece clockwise kicks, by source state.
const I_CW: [[(i32, i32); 5]; 4] = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // from state 0
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // from state 1
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // from state 2
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // from state 3
];

/// I-piece counter-clockwise kicks, by source state.
const I_CCW: [[(i32, i32); 5]; 4] = [
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)], // from state 0
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)], // from state 1
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)], // from state 2
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)], // from state 3
];

/// I-piece half-turn kicks, by source state.
const I_HALF: [[(i32, i32); 5]; 4] = [
    [(0, 0), (0, 1), (0, 2), (0, -1), (0, -2)], // from state 0
    [(0, 0), (1, 0), (2, 0), (-1, 0), (-2, 0)], // from state 1
    [(0, 0), (0, -1), (0, -2), (0, 1), (0, 2)], // from state 2
    [(0, 0), (-1, 0), (-2, 0), (1, 0), (2, 0)], // from state 3
];

/// Ordered candidate offsets for rotating `kind` with `turn` out of `from`.
pub fn kick_list(kind: PieceKind, turn: Turn, from: Rotation) -> KickList {
    let i = from.index();
    match (kind, turn) {
        (PieceKind::I, Turn::Clockwise) => &I_CW[i],
        (PieceKind::I, Turn::CounterClockwise) => &I_CCW[i],
        (PieceKind::I, Turn::Half) => &I_HALF[i],
        (_, Turn::Clockwise) => &STANDARD_CW[i],
        (_, Turn::CounterClockwise) => &STANDARD_CCW[i],
        (_, Turn::Half) => &STANDARD_HALF[i],
    }
}
