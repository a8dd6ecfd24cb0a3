//! The piece controller: everything that happens to the active piece
//! between spawn and lock.
//!
//! The controller owns the active piece, the hold slot, the ghost
//! projection and the DAS state machine. It works against borrowed
//! simulation state so the engine stays the single owner of the board,
//! config and timers.

use crate::config::GameConfig;
use crate::core::board::Board;
use crate::core::kicks;
use crate::core::moving::MovingPiece;
use crate::core::pieces;
use crate::core::timing::Timers;
use crate::events::{EventBus, GameEvent};
use crate::types::{PieceKind, Turn};

/// Borrowed view of the simulation state a controller operation runs in.
pub struct SimContext<'a> {
    pub board: &'a mut Board,
    pub config: &'a GameConfig,
    pub timers: &'a mut Timers,
    pub events: &'a EventBus,
}

/// Delayed-auto-shift phases. Once armed, the state never returns to
/// `Idle`; a fresh key press re-arms `Delay` through [`PieceController::reset_das`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DasState {
    Idle,
    Delay,
    Repeat,
}

/// Controls the active piece and the hold slot.
#[derive(Debug)]
pub struct PieceController {
    current: Option<MovingPiece>,
    held: Option<PieceKind>,
    ghost_row: i32,
    was_rotated: bool,
    das_state: DasState,
    lock_resets: u32,
    can_hold: bool,
}

impl Default for PieceController {
    fn default() -> Self {
        PieceController {
            current: None,
            held: None,
            ghost_row: 0,
            was_rotated: false,
            das_state: DasState::Idle,
            lock_resets: 0,
            can_hold: true,
        }
    }
}

impl PieceController {
    pub fn new() -> Self {
        PieceController::default()
    }

    pub fn current(&self) -> Option<&MovingPiece> {
        self.current.as_ref()
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    /// Row the active piece would rest at if dropped straight down.
    pub fn ghost_row(&self) -> i32 {
        self.ghost_row
    }

    /// Whether the last successful action on the piece was a rotation.
    pub fn was_rotated(&self) -> bool {
        self.was_rotated
    }

    /// Puts a fresh piece at the spawn position. Returns false on a spawn
    /// collision (top-out); the caller decides what that means for the game.
    pub fn spawn(&mut self, ctx: &mut SimContext<'_>, kind: PieceKind) -> bool {
        tracing::debug!("spawning piece: {:?}", kind);
        let piece = MovingPiece::spawn(kind, ctx.board.cols());
        if ctx.board.collides(piece.shape(), piece.row, piece.col) {
            self.current = None;
            return false;
        }
        self.current = Some(piece);
        self.can_hold = true;
        self.was_rotated = false;
        self.lock_resets = 0;
        ctx.timers.lock = 0;
        self.update_ghost(ctx);
        ctx.events.post(GameEvent::NewPiece { kind });
        true
    }

    /// Drops the active piece and leaves the controller empty.
    pub fn clear_piece(&mut self) {
        self.current = None;
    }

    /// One lateral step. A successful step while resting on the stack spends
    /// a lock-delay reset if any remain.
    pub fn shift(&mut self, ctx: &mut SimContext<'_>, dir: i8) -> bool {
        if !self.shift_by(ctx, 0, i32::from(dir)) {
            return false;
        }
        if self.is_grounded(ctx) {
            self.reset_lock_timer(ctx);
        }
        self.was_rotated = false;
        self.update_ghost(ctx);
        true
    }

    /// Re-arms auto-shift after a fresh key press.
    pub fn reset_das(&mut self, ctx: &mut SimContext<'_>) {
        self.das_state = DasState::Delay;
        ctx.timers.das = 0;
    }

    /// Advances the auto-shift machine. `dir` is the direction currently
    /// held, if any; without one the machine idles and keeps its timer.
    pub fn handle_das(&mut self, ctx: &mut SimContext<'_>, delta: u32, dir: Option<i8>) {
        let Some(dir) = dir else { return };
        ctx.timers.das = ctx.timers.das.saturating_add(delta);

        match self.das_state {
            DasState::Idle => return,
            DasState::Delay => {
                if ctx.timers.das >= ctx.config.das_delay {
                    self.das_state = DasState::Repeat;
                    ctx.timers.das -= ctx.config.das_delay;
                }
            }
            DasState::Repeat => {
                while ctx.timers.das >= ctx.config.arr_delay {
                    if !self.shift(ctx, dir) {
                        ctx.timers.das = 0;
                        break;
                    }
                    ctx.timers.das -= ctx.config.arr_delay;
                }
            }
        }
        self.update_ghost(ctx);
    }

    /// Applies gravity for this tick, catching up if the frame spanned
    /// several gravity periods.
    pub fn handle_gravity(&mut self, ctx: &mut SimContext<'_>, level: u32, delta: u32) {
        let period = ctx
            .config
            .gravity_base
            .saturating_sub(level.saturating_sub(1).saturating_mul(ctx.config.gravity_increment))
            .max(crate::types::GRAVITY_FLOOR_MS);

        ctx.timers.gravity = ctx.timers.gravity.saturating_add(delta);
        while ctx.timers.gravity >= period {
            if self.shift_by(ctx, 1, 0) {
                self.was_rotated = false;
                ctx.timers.lock = 0;
                ctx.timers.gravity -= period;
            } else {
                ctx.timers.gravity = 0;
                break;
            }
        }
        self.update_ghost(ctx);
    }

    /// Runs the lock-delay clock. Returns true when the piece has sat on the
    /// stack long enough and must lock now.
    pub fn handle_lock_delay(&mut self, ctx: &mut SimContext<'_>, delta: u32) -> bool {
        if self.current.is_some() && self.is_grounded(ctx) {
            ctx.timers.lock = ctx.timers.lock.saturating_add(delta);
            ctx.timers.lock >= ctx.config.lock_delay
        } else {
            ctx.timers.lock = 0;
            false
        }
    }

    /// Slams the piece to its ghost row and forces the lock clock to expire.
    pub fn hard_drop(&mut self, ctx: &mut SimContext<'_>) {
        if let Some(piece) = self.current.as_mut() {
            let distance = (self.ghost_row - piece.row).max(0) as u32;
            piece.row = self.ghost_row;
            ctx.timers.lock = ctx.config.lock_delay;
            ctx.events.post(GameEvent::HardDrop { distance });
        }
    }

    /// Steps the piece down under soft drop. A zero interval sends it
    /// straight to the floor.
    pub fn soft_drop(&mut self, ctx: &mut SimContext<'_>, delta: u32) {
        let mut dropped = 0u32;
        if ctx.config.soft_drop_delay == 0 {
            while self.shift_by(ctx, 1, 0) {
                dropped += 1;
                ctx.timers.gravity = 0;
                self.was_rotated = false;
            }
        } else {
            ctx.timers.soft_drop = ctx.timers.soft_drop.saturating_add(delta);
            while ctx.timers.soft_drop >= ctx.config.soft_drop_delay {
                if self.shift_by(ctx, 1, 0) {
                    dropped += 1;
                    ctx.timers.gravity = 0;
                    self.was_rotated = false;
                    ctx.timers.soft_drop -= ctx.config.soft_drop_delay;
                } else {
                    ctx.timers.soft_drop = 0;
                    break;
                }
            }
        }
        if dropped > 0 {
            ctx.events.post(GameEvent::SoftDrop { distance: dropped });
        }
    }

    /// Tries a rotation, walking the kick list for the piece's source state.
    /// On failure the piece is left exactly as it was.
    pub fn rotate(&mut self, ctx: &mut SimContext<'_>, turn: Turn) -> bool {
        if turn == Turn::Half && !ctx.config.half_turn_enabled {
            return false;
        }
        let (kind, from_row, from_col, from_rotation) = match &self.current {
            Some(piece) => (piece.kind, piece.row, piece.col, piece.rotation()),
            None => return false,
        };
        let target = from_rotation.turned(turn);
        let candidate = pieces::rotated_shape(kind, target);

        // dy is upward in the kick tables, so it subtracts from the row.
        let fit = kicks::kick_list(kind, turn, from_rotation)
            .iter()
            .map(|&(dx, dy)| (from_row - dy, from_col + dx))
            .find(|&(row, col)| !ctx.board.collides(&candidate, row, col));
        let Some((row, col)) = fit else {
            return false;
        };

        tracing::debug!("rotated {:?} to {:?}", kind, target);
        if let Some(piece) = self.current.as_mut() {
            piece.row = row;
            piece.col = col;
            piece.set_rotation(target);
        }
        if self.is_grounded(ctx) {
            self.reset_lock_timer(ctx);
        }
        self.was_rotated = true;
        self.update_ghost(ctx);
        ctx.events.post(GameEvent::PieceRotated {
            kind,
            rotation: target,
        });
        true
    }

    /// Stashes the active piece, spawning either the previously held piece
    /// or the next one from `next`. Each piece may be held once.
    ///
    /// Returns false only when the swapped-in piece could not spawn; gated
    /// or repeated holds are quietly ignored.
    pub fn hold(
        &mut self,
        ctx: &mut SimContext<'_>,
        next: impl FnOnce() -> PieceKind,
    ) -> bool {
        if !ctx.config.hold_enabled || !self.can_hold {
            return true;
        }
        let to_hold = match &self.current {
            Some(piece) => piece.kind,
            None => return true,
        };
        let respawn = match self.held.take() {
            Some(stored) => stored,
            None => next(),
        };
        self.held = Some(to_hold);
        if !self.spawn(ctx, respawn) {
            self.can_hold = false;
            return false;
        }
        tracing::info!("piece held: {:?}", to_hold);
        ctx.events.post(GameEvent::PieceHeld { kind: to_hold });
        self.can_hold = false;
        true
    }

    /// Recomputes the ghost row for the current piece and column.
    pub fn update_ghost(&mut self, ctx: &SimContext<'_>) {
        if let Some(piece) = &self.current {
            let mut row = piece.row;
            while !ctx.board.collides(piece.shape(), row + 1, piece.col) {
                row += 1;
            }
            self.ghost_row = row;
        }
    }

    fn shift_by(&mut self, ctx: &SimContext<'_>, d_row: i32, d_col: i32) -> bool {
        let Some(piece) = self.current.as_mut() else {
            return false;
        };
        if ctx
            .board
            .collides(piece.shape(), piece.row + d_row, piece.col + d_col)
        {
            return false;
        }
        piece.row += d_row;
        piece.col += d_col;
        true
    }

    fn is_grounded(&self, ctx: &SimContext<'_>) -> bool {
        match &self.current {
            Some(piece) => ctx.board.collides(piece.shape(), piece.row + 1, piece.col),
            None => false,
        }
    }

    fn reset_lock_timer(&mut self, ctx: &mut SimContext<'_>) {
        if self.lock_resets < ctx.config.max_lock_resets {
            ctx.timers.lock = 0;
            self.lock_resets += 1;
        }
    }
}
