//! Deterministic falling-block simulation engine.
//!
//! A headless game core: feed it millisecond deltas and commands, observe
//! it through snapshots and bus events. [`Game`] is the usual entry point;
//! the layers underneath (engine, piece controller, board, scoring) stay
//! public for embedders that want finer control.
//!
//! ```
//! use tetris_engine::{Game, GameCommand, GameConfig};
//!
//! let mut game = Game::new(GameConfig::default(), 42).unwrap();
//! game.update(500); // entry delay elapses, the first piece spawns
//! game.apply(GameCommand::HardDrop);
//! assert!(game.snapshot().active.is_some());
//! ```

pub mod commands;
pub mod config;
pub mod core;
pub mod events;
pub mod game;
pub mod types;

pub use commands::{CommandRecorder, GameCommand, MoveDir, ReplayLog};
pub use config::{ConfigError, GameConfig, GameGoal};
pub use core::engine::Engine;
pub use core::snapshot::{GameSnapshot, PieceView};
pub use events::{EventBus, EventKind, GameEvent};
pub use game::Game;
pub use types::{GamePhase, MoveType, PieceKind, Rotation, SpinKind, Turn};
