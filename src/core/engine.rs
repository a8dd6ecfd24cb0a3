//! The engine: phase machine, tick pipeline, lock processing and the
//! command surface.
//!
//! One call to [`Engine::update`] advances the simulation by a frame delta
//! in milliseconds; [`Engine::apply`] feeds it commands in between. All
//! observable changes leave through the event bus.

use std::rc::Rc;

use arrayvec::ArrayVec;

use crate::commands::{GameCommand, MoveDir};
use crate::config::{ConfigError, GameConfig, GameGoal};
use crate::core::bag::PieceBag;
use crate::core::board::Board;
use crate::core::control::{PieceController, SimContext};
use crate::core::pieces;
use crate::core::rng::SimpleRng;
use crate::core::snapshot::{GameSnapshot, PieceView};
use crate::core::timing::{TimeManager, TimeMode, Timers};
use crate::events::{EventBus, GameEvent};
use crate::types::{GamePhase, SpinKind};

/// Garbage hole placement draws from its own stream so incoming attacks
/// never disturb the piece sequence.
const GARBAGE_STREAM_OFFSET: u32 = 7919;

/// A complete falling-block simulation.
pub struct Engine {
    config: GameConfig,
    board: Board,
    bag: PieceBag,
    control: PieceController,
    timers: Timers,
    time: TimeManager,
    events: Rc<EventBus>,
    garbage_rng: SimpleRng,
    phase: GamePhase,
    level: u32,
    /// Full rows already announced while frozen, pending the real clear.
    frozen_lines: u32,
    /// Directions currently held, most recent last.
    active_dirs: ArrayVec<MoveDir, 2>,
    rotation_held: bool,
    soft_drop_held: bool,
}

impl Engine {
    /// Builds an engine from a validated config and a bag seed.
    pub fn new(config: GameConfig, seed: u32, events: Rc<EventBus>) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.rows, config.cols);
        let bag = PieceBag::new(seed, config.bag_multiplier, config.preview_size);
        let time = TimeManager::new(config.slow_down_multiplier);
        Ok(Engine {
            board,
            bag,
            control: PieceController::new(),
            timers: Timers::default(),
            time,
            events,
            garbage_rng: SimpleRng::new(seed.wrapping_add(GARBAGE_STREAM_OFFSET)),
            phase: GamePhase::EntryDelay,
            level: 1,
            frozen_lines: 0,
            active_dirs: ArrayVec::new(),
            rotation_held: false,
            soft_drop_held: false,
            config,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver | GamePhase::Victory)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn time_mode(&self) -> TimeMode {
        self.time.mode()
    }

    /// Advances the simulation by `delta` milliseconds of real time.
    pub fn update(&mut self, delta: u32) {
        if self.is_over() {
            return;
        }

        // The time manager ticks in every phase so freeze and slow windows
        // expire even during entry delay.
        let tick = self.time.tick(delta);
        if tick.freeze_ended {
            self.flush_frozen_lines();
        }

        match self.phase {
            GamePhase::EntryDelay => {
                self.timers.entry = self.timers.entry.saturating_add(delta);
                if self.timers.entry >= self.config.entry_delay {
                    self.timers.entry = 0;
                    let kind = self.bag.next_piece();
                    let mut ctx = SimContext {
                        board: &mut self.board,
                        config: &self.config,
                        timers: &mut self.timers,
                        events: &self.events,
                    };
                    if self.control.spawn(&mut ctx, kind) {
                        self.phase = GamePhase::Playing;
                    } else {
                        self.top_out();
                    }
                }
            }
            GamePhase::Playing => {
                self.timers.session += u64::from(delta);
                self.check_win();
                if self.phase != GamePhase::Playing {
                    return;
                }

                let dir = self.active_dirs.last().map(|d| d.step());
                let locked;
                {
                    let mut ctx = SimContext {
                        board: &mut self.board,
                        config: &self.config,
                        timers: &mut self.timers,
                        events: &self.events,
                    };
                    self.control.handle_das(&mut ctx, delta, dir);
                    self.control
                        .handle_gravity(&mut ctx, self.level, tick.effective_delta);
                    if self.soft_drop_held {
                        self.control.soft_drop(&mut ctx, delta);
                    }
                    locked = self.control.handle_lock_delay(&mut ctx, delta);
                }
                if locked {
                    self.lock_piece();
                }
            }
            GamePhase::GameOver | GamePhase::Victory => {}
        }
    }

    /// Applies one command. Terminal phases reject everything; otherwise
    /// piece commands quietly no-op while no piece is live.
    pub fn apply(&mut self, command: GameCommand) {
        if self.is_over() {
            return;
        }
        tracing::debug!("command: {:?}", command);
        match command {
            GameCommand::MoveStart(dir) => {
                self.active_dirs.retain(|held| *held != dir);
                self.active_dirs.push(dir);
                let mut ctx = SimContext {
                    board: &mut self.board,
                    config: &self.config,
                    timers: &mut self.timers,
                    events: &self.events,
                };
                if self.control.shift(&mut ctx, dir.step()) {
                    self.control.reset_das(&mut ctx);
                }
            }
            GameCommand::MoveEnd(dir) => {
                self.active_dirs.retain(|held| *held != dir);
            }
            GameCommand::RotateStart(turn) => {
                if self.rotation_held {
                    return;
                }
                let mut ctx = SimContext {
                    board: &mut self.board,
                    config: &self.config,
                    timers: &mut self.timers,
                    events: &self.events,
                };
                self.rotation_held = self.control.rotate(&mut ctx, turn);
            }
            GameCommand::RotateRelease => {
                self.rotation_held = false;
            }
            GameCommand::SoftDropStart => {
                self.soft_drop_held = true;
            }
            GameCommand::SoftDropEnd => {
                self.soft_drop_held = false;
            }
            GameCommand::HardDrop => {
                let mut ctx = SimContext {
                    board: &mut self.board,
                    config: &self.config,
                    timers: &mut self.timers,
                    events: &self.events,
                };
                self.control.hard_drop(&mut ctx);
            }
            GameCommand::Hold => {
                let bag = &mut self.bag;
                let mut ctx = SimContext {
                    board: &mut self.board,
                    config: &self.config,
                    timers: &mut self.timers,
                    events: &self.events,
                };
                if !self.control.hold(&mut ctx, || bag.next_piece()) {
                    self.top_out();
                }
            }
            GameCommand::Garbage { lines, block_id } => {
                self.process_garbage(lines, block_id);
            }
            GameCommand::SlowTime { ms } => self.time.slow(ms),
            GameCommand::FreezeTime { ms } => self.time.freeze(ms),
        }
    }

    /// Raises the level by one, capped by the config. Announced only when
    /// the level actually changes.
    pub fn level_up(&mut self) -> u32 {
        let next = (self.level + 1).min(self.config.level_cap);
        if next != self.level {
            self.level = next;
            self.events.post(GameEvent::LevelUp { level: next });
        }
        self.level
    }

    /// Pushes garbage rows in from the bottom and refreshes the ghost.
    /// Attacks only land during play; anything arriving between pieces or
    /// after the session ended is dropped.
    pub fn process_garbage(&mut self, lines: u32, block_id: u8) {
        if lines == 0 || self.phase != GamePhase::Playing {
            return;
        }
        tracing::info!("receiving {} garbage lines", lines);
        self.board.add_garbage(lines, block_id, &mut self.garbage_rng);
        let ctx = SimContext {
            board: &mut self.board,
            config: &self.config,
            timers: &mut self.timers,
            events: &self.events,
        };
        self.control.update_ghost(&ctx);
        self.events.post(GameEvent::GarbageReceived { lines });
    }

    /// Captures the observable state of this frame.
    pub fn snapshot(&self) -> GameSnapshot {
        let active = self.control.current().map(|piece| PieceView {
            kind: piece.kind,
            rotation: piece.rotation(),
            shape: piece.shape().clone(),
            row: piece.row,
            col: piece.col,
        });
        let ghost_row = if self.config.ghost_enabled {
            active.as_ref().map(|_| self.control.ghost_row())
        } else {
            None
        };
        GameSnapshot {
            board: self.board.grid().clone(),
            active,
            ghost_row,
            hold: self.control.held(),
            preview: self.bag.preview(self.config.preview_size),
            phase: self.phase,
            level: self.level,
            lines_cleared: self.board.lines_cleared(),
        }
    }

    /// Stamps the active piece and settles the consequences: spin
    /// classification, clears (immediate or deferred while frozen), events
    /// and the return to entry delay.
    fn lock_piece(&mut self) {
        let Some(piece) = self.control.current() else {
            return;
        };
        let spin = if self.config.spin_enabled && self.control.was_rotated() {
            pieces::classify_spin(piece.kind, &self.board, piece.row, piece.col, piece.rotation())
        } else {
            SpinKind::None
        };
        self.board.place(piece.shape(), piece.row, piece.col);
        let full = self.board.full_lines().len() as u32;

        let frozen = self.time.mode() == TimeMode::Frozen;
        let newly = full.saturating_sub(self.frozen_lines);
        let cleared_flag = if frozen { newly > 0 } else { full > 0 };

        if spin != SpinKind::None {
            self.events.post(GameEvent::SpinDetected { spin });
        }
        self.events.post(GameEvent::PieceLocked {
            cleared: cleared_flag,
        });

        if frozen {
            if newly > 0 {
                self.events
                    .post(GameEvent::FreezeLineClear { lines: newly, spin });
            }
            self.frozen_lines = full;
        } else {
            let cleared = self.board.clear_full_lines();
            if cleared > 0 {
                let perfect = self.board.is_empty();
                self.events.post(GameEvent::LineCleared {
                    spin,
                    lines: cleared,
                    perfect,
                });
            }
            self.frozen_lines = 0;
        }

        tracing::debug!("piece locked, {} full lines, spin {:?}", full, spin);
        self.control.clear_piece();
        self.phase = GamePhase::EntryDelay;
        self.timers.entry = 0;
    }

    /// Applies the clears that were deferred while time stood still.
    fn flush_frozen_lines(&mut self) {
        self.frozen_lines = 0;
        let cleared = self.board.clear_full_lines();
        if cleared > 0 {
            let perfect = self.board.is_empty();
            self.events.post(GameEvent::LineCleared {
                spin: SpinKind::None,
                lines: cleared,
                perfect,
            });
        }
        tracing::info!("freeze ended, cleared {} deferred lines", cleared);
        let ctx = SimContext {
            board: &mut self.board,
            config: &self.config,
            timers: &mut self.timers,
            events: &self.events,
        };
        self.control.update_ghost(&ctx);
    }

    fn check_win(&mut self) {
        let met = match self.config.goal {
            GameGoal::Time(seconds) => self.timers.session >= u64::from(seconds) * 1000,
            GameGoal::Lines(lines) => self.board.lines_cleared() >= lines,
            GameGoal::None => false,
        };
        if met {
            tracing::info!("goal reached, ending session");
            self.phase = GamePhase::Victory;
            self.events.post(GameEvent::GameOver {
                victory: true,
                goal: self.config.goal,
            });
        }
    }

    fn top_out(&mut self) {
        self.phase = GamePhase::GameOver;
        self.events.post(GameEvent::GameOver {
            victory: false,
            goal: self.config.goal,
        });
    }
}
