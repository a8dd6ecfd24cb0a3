//! Commands fed into a running game, and the replay log that records them.
//!
//! Commands are plain serializable data so a session can be captured and
//! replayed deterministically: same config, same seed, same commands at the
//! same timestamps give the same game.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::types::Turn;

/// Horizontal shift direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDir {
    Left,
    Right,
}

impl MoveDir {
    /// Column delta for one shift step.
    pub fn step(self) -> i8 {
        match self {
            MoveDir::Left => -1,
            MoveDir::Right => 1,
        }
    }
}

/// Everything a player or an external source can ask of the simulation.
///
/// Held inputs are modeled as start/end pairs; the engine owns the repeat
/// timing in between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameCommand {
    /// A direction key went down.
    MoveStart(MoveDir),
    /// A direction key came up.
    MoveEnd(MoveDir),
    /// A rotation key went down.
    RotateStart(Turn),
    /// The rotation key came up.
    RotateRelease,
    /// The soft-drop key went down.
    SoftDropStart,
    /// The soft-drop key came up.
    SoftDropEnd,
    /// Slam the piece to its ghost position.
    HardDrop,
    /// Swap the active piece with the hold slot.
    Hold,
    /// Push garbage rows in from the bottom.
    Garbage { lines: u32, block_id: u8 },
    /// Scale time down for a while.
    SlowTime { ms: u32 },
    /// Stop time for a while.
    FreezeTime { ms: u32 },
}

/// Sink for the command stream of a session.
pub trait CommandRecorder {
    /// Called once per accepted command with the session time it arrived at.
    fn record(&mut self, timestamp_ms: u64, command: GameCommand);
}

/// In-memory command recording, replayable against a fresh game.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    entries: Vec<(u64, GameCommand)>,
}

impl ReplayLog {
    pub fn new() -> Self {
        ReplayLog::default()
    }

    pub fn entries(&self) -> &[(u64, GameCommand)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CommandRecorder for ReplayLog {
    fn record(&mut self, timestamp_ms: u64, command: GameCommand) {
        self.entries.push((timestamp_ms, command));
    }
}

/// Shared-handle recording, for callers that keep reading the log while the
/// game owns the recorder.
impl CommandRecorder for Rc<RefCell<ReplayLog>> {
    fn record(&mut self, timestamp_ms: u64, command: GameCommand) {
        self.borrow_mut().record(timestamp_ms, command);
    }
}
