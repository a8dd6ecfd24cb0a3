//! Game events and the bus that delivers them.
//!
//! Every observable change in a session is announced as a [`GameEvent`].
//! Consumers subscribe per [`EventKind`] on the [`EventBus`]; the scoring
//! registry is wired this way, and frontends or bots can listen the same way.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::config::GameGoal;
use crate::types::{MoveType, PieceKind, Rotation, SpinKind};

/// A notification posted by the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A fresh piece entered the playfield.
    NewPiece { kind: PieceKind },
    /// The active piece was stashed in the hold slot.
    PieceHeld { kind: PieceKind },
    /// The active piece rotated to a new orientation.
    PieceRotated { kind: PieceKind, rotation: Rotation },
    /// The active piece was slammed to the floor.
    HardDrop { distance: u32 },
    /// The active piece stepped down under soft drop.
    SoftDrop { distance: u32 },
    /// The active piece was stamped onto the board.
    PieceLocked { cleared: bool },
    /// Full rows were removed from the board.
    LineCleared {
        spin: SpinKind,
        lines: u32,
        perfect: bool,
    },
    /// Full rows completed while time was frozen; their removal is deferred.
    FreezeLineClear { lines: u32, spin: SpinKind },
    /// The lock classified as a spin.
    SpinDetected { spin: SpinKind },
    /// The score registry settled an award.
    ScoreUpdated {
        total_lines: u32,
        total_points: u64,
        awarded: u64,
        move_type: MoveType,
    },
    /// The session advanced a level.
    LevelUp { level: u32 },
    /// Consecutive clearing locks extended a combo.
    ComboTriggered { combo: u32 },
    /// Consecutive difficult clears extended a back-to-back chain.
    BackToBackTrigger { chain: u32 },
    /// A multi-line clear produced outgoing garbage.
    GarbageSent { lines: u32 },
    /// Garbage rows were pushed into the board.
    GarbageReceived { lines: u32 },
    /// The session ended, by top-out or by meeting the goal.
    GameOver { victory: bool, goal: GameGoal },
}

/// Discriminant used to route subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    NewPiece,
    PieceHeld,
    PieceRotated,
    HardDrop,
    SoftDrop,
    PieceLocked,
    LineCleared,
    FreezeLineClear,
    SpinDetected,
    ScoreUpdated,
    LevelUp,
    ComboTriggered,
    BackToBackTrigger,
    GarbageSent,
    GarbageReceived,
    GameOver,
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::NewPiece { .. } => EventKind::NewPiece,
            GameEvent::PieceHeld { .. } => EventKind::PieceHeld,
            GameEvent::PieceRotated { .. } => EventKind::PieceRotated,
            GameEvent::HardDrop { .. } => EventKind::HardDrop,
            GameEvent::SoftDrop { .. } => EventKind::SoftDrop,
            GameEvent::PieceLocked { .. } => EventKind::PieceLocked,
            GameEvent::LineCleared { .. } => EventKind::LineCleared,
            GameEvent::FreezeLineClear { .. } => EventKind::FreezeLineClear,
            GameEvent::SpinDetected { .. } => EventKind::SpinDetected,
            GameEvent::ScoreUpdated { .. } => EventKind::ScoreUpdated,
            GameEvent::LevelUp { .. } => EventKind::LevelUp,
            GameEvent::ComboTriggered { .. } => EventKind::ComboTriggered,
            GameEvent::BackToBackTrigger { .. } => EventKind::BackToBackTrigger,
            GameEvent::GarbageSent { .. } => EventKind::GarbageSent,
            GameEvent::GarbageReceived { .. } => EventKind::GarbageReceived,
            GameEvent::GameOver { .. } => EventKind::GameOver,
        }
    }
}

type Handler = Rc<dyn Fn(&EventBus, &GameEvent)>;

/// Synchronous publish/subscribe hub for [`GameEvent`]s.
///
/// Handlers run on the posting thread, in subscription order. The handler
/// list is snapshotted before dispatch, so a handler may post further events
/// or add subscriptions without deadlocking the bus.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<HashMap<EventKind, Vec<Handler>>>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus::default()
    }

    /// Registers a handler for one event kind.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&EventBus, &GameEvent) + 'static,
    {
        self.handlers
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Rc::new(handler));
    }

    /// Delivers an event to every handler subscribed to its kind.
    pub fn post(&self, event: GameEvent) {
        tracing::debug!(target: "events", "posting {:?}", event);
        let matching: Vec<Handler> = self
            .handlers
            .borrow()
            .get(&event.kind())
            .map(|list| list.to_vec())
            .unwrap_or_default();
        for handler in &matching {
            handler(self, &event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.borrow();
        let mut counts: Vec<(EventKind, usize)> =
            handlers.iter().map(|(k, v)| (*k, v.len())).collect();
        counts.sort_by_key(|(_, n)| std::cmp::Reverse(*n));
        f.debug_struct("EventBus").field("handlers", &counts).finish()
    }
}
