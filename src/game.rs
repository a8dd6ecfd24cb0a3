//! Session facade tying the engine to scoring, levels and recording.
//!
//! [`Game`] is the public entry point. It owns the engine, wires a score
//! registry onto the event bus, applies the level and garbage-attack
//! policies, and optionally records every command so a session can be
//! replayed bit-for-bit.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::commands::{CommandRecorder, GameCommand, ReplayLog};
use crate::config::{ConfigError, GameConfig};
use crate::core::engine::Engine;
use crate::core::scoring::{GuidelineRules, ScoreRegistry};
use crate::core::snapshot::GameSnapshot;
use crate::core::timing::TimeMode;
use crate::events::{EventBus, EventKind, GameEvent};
use crate::types::GamePhase;

/// A full game session.
pub struct Game {
    engine: Engine,
    events: Rc<EventBus>,
    score: Rc<RefCell<ScoreRegistry>>,
    recorder: Option<Box<dyn CommandRecorder>>,
    clock_ms: u64,
}

impl Game {
    /// A fresh session from a config and a bag seed.
    pub fn new(config: GameConfig, seed: u32) -> Result<Self, ConfigError> {
        let events = Rc::new(EventBus::new());
        let engine = Engine::new(config, seed, Rc::clone(&events))?;

        let score = Rc::new(RefCell::new(ScoreRegistry::new(Box::new(GuidelineRules))));
        ScoreRegistry::attach(Rc::clone(&score), &events);

        // Multi-line clears attack: one outgoing garbage row less than the
        // clear, so singles stay quiet.
        events.subscribe(EventKind::LineCleared, |bus, event| {
            if let GameEvent::LineCleared { lines, .. } = event {
                if *lines >= 2 {
                    bus.post(GameEvent::GarbageSent { lines: lines - 1 });
                }
            }
        });

        Ok(Game {
            engine,
            events,
            score,
            recorder: None,
            clock_ms: 0,
        })
    }

    /// A session that records every command it is given.
    pub fn with_recorder(
        config: GameConfig,
        seed: u32,
        recorder: Box<dyn CommandRecorder>,
    ) -> Result<Self, ConfigError> {
        let mut game = Game::new(config, seed)?;
        game.recorder = Some(recorder);
        Ok(game)
    }

    /// Re-runs a recorded session against a fresh game. The same config,
    /// seed and tick cadence as the original session give the same final
    /// state. Runs for at least `duration_ms` and until every log entry has
    /// been applied.
    pub fn replay(
        config: GameConfig,
        seed: u32,
        log: &ReplayLog,
        tick_ms: u32,
        duration_ms: u64,
    ) -> Result<Self, ConfigError> {
        let mut game = Game::new(config, seed)?;
        let tick = tick_ms.max(1);
        let mut pending = log.entries().iter();
        let mut next = pending.next();
        while next.is_some() || game.clock_ms < duration_ms {
            while let Some(&(timestamp, command)) = next {
                if timestamp > game.clock_ms {
                    break;
                }
                game.apply(command);
                next = pending.next();
            }
            game.update(tick);
        }
        Ok(game)
    }

    /// Advances the session clock and the simulation, then settles the
    /// level policy against the lines cleared so far.
    pub fn update(&mut self, delta: u32) {
        self.clock_ms += u64::from(delta);
        self.engine.update(delta);
        self.sync_level();
    }

    /// Feeds one command to the engine, recording it first.
    pub fn apply(&mut self, command: GameCommand) {
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.record(self.clock_ms, command);
        }
        self.engine.apply(command);
    }

    /// One level per ten cleared lines, up to the configured cap.
    fn sync_level(&mut self) {
        let lines = self.score.borrow().total_lines();
        let target = (lines / 10 + 1).min(self.engine.config().level_cap);
        while self.engine.level() < target {
            self.engine.level_up();
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn phase(&self) -> GamePhase {
        self.engine.phase()
    }

    pub fn is_over(&self) -> bool {
        self.engine.is_over()
    }

    pub fn level(&self) -> u32 {
        self.engine.level()
    }

    pub fn total_points(&self) -> u64 {
        self.score.borrow().total_points()
    }

    pub fn total_lines(&self) -> u32 {
        self.score.borrow().total_lines()
    }

    /// Total real time this session has been updated, in ms.
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn time_mode(&self) -> TimeMode {
        self.engine.time_mode()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.engine.snapshot()
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase())
            .field("level", &self.level())
            .field("clock_ms", &self.clock_ms)
            .field("score", &self.score)
            .finish()
    }
}
