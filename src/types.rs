//! Core types shared across the engine.

use serde::{Deserialize, Serialize};

/// Empty cell id on the board and in shape grids.
pub const EMPTY_CELL: u8 = 0;

/// Default block id for injected garbage rows.
pub const GARBAGE_CELL: u8 = 8;

/// Gravity never drops below this period, regardless of level (milliseconds).
pub const GRAVITY_FLOOR_MS: u32 = 10;

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in catalog order (one bag's worth).
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Board cell id for a locked cell of this kind (1..=7, 0 is empty).
    pub fn cell_id(self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    /// Inverse of [`cell_id`](Self::cell_id); garbage and empty map to `None`.
    pub fn from_cell_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }
}

/// Orientation of the active piece. `North` is the spawn state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Numeric state, 0..=3, used to index kick tables and shape variants.
    pub fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    pub fn from_index(i: usize) -> Self {
        match i % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// State reached by applying `turn` to this state.
    pub fn turned(self, turn: Turn) -> Self {
        Rotation::from_index(self.index() + turn.state_delta())
    }
}

/// Requested rotation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Turn {
    Clockwise,
    CounterClockwise,
    Half,
}

impl Turn {
    /// Additive rotation-state delta, mod 4.
    pub fn state_delta(self) -> usize {
        match self {
            Turn::Clockwise => 1,
            Turn::CounterClockwise => 3,
            Turn::Half => 2,
        }
    }
}

/// Spin classification of a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinKind {
    None,
    Mini,
    Full,
}

impl SpinKind {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            SpinKind::None => None,
            SpinKind::Mini => Some("mini"),
            SpinKind::Full => Some("full"),
        }
    }
}

/// Engine lifecycle phases. `GameOver` and `Victory` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    EntryDelay,
    Playing,
    GameOver,
    Victory,
}

/// Scoring label for a scored clear, carried on score-updated events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveType {
    None,
    Single,
    Double,
    Triple,
    Tetris,
    TSpinMiniSingle,
    TSpinMiniDouble,
    TSpinSingle,
    TSpinDouble,
    TSpinTriple,
}

impl MoveType {
    /// Moves worth calling out in a feed (tetrises and spins).
    pub fn is_special(self) -> bool {
        !matches!(
            self,
            MoveType::None | MoveType::Single | MoveType::Double | MoveType::Triple
        )
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MoveType::None => "",
            MoveType::Single => "Single",
            MoveType::Double => "Double",
            MoveType::Triple => "Triple",
            MoveType::Tetris => "Tetris",
            MoveType::TSpinMiniSingle => "T-Spin Mini Single",
            MoveType::TSpinMiniDouble => "T-Spin Mini Double",
            MoveType::TSpinSingle => "T-Spin Single",
            MoveType::TSpinDouble => "T-Spin Double",
            MoveType::TSpinTriple => "T-Spin Triple",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_id_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_cell_id(kind.cell_id()), Some(kind));
        }
        assert_eq!(PieceKind::from_cell_id(EMPTY_CELL), None);
        assert_eq!(PieceKind::from_cell_id(GARBAGE_CELL), None);
    }

    #[test]
    fn test_turn_state_math() {
        assert_eq!(Rotation::North.turned(Turn::Clockwise), Rotation::East);
        assert_eq!(Rotation::North.turned(Turn::CounterClockwise), Rotation::West);
        assert_eq!(Rotation::North.turned(Turn::Half), Rotation::South);
        assert_eq!(Rotation::West.turned(Turn::Clockwise), Rotation::North);
        assert_eq!(Rotation::East.turned(Turn::Half), Rotation::West);
    }

    #[test]
    fn test_move_type_labels() {
        assert!(MoveType::Tetris.is_special());
        assert!(MoveType::TSpinMiniSingle.is_special());
        assert!(!MoveType::Double.is_special());
        assert_eq!(MoveType::TSpinDouble.display_name(), "T-Spin Double");
        assert_eq!(MoveType::None.display_name(), "");
    }
}
