//! Scoring: the guideline rule book and the event-driven score registry.
//!
//! The rule book is a pure lookup from (action, lines) to points and move
//! names. The registry owns the running totals plus the combo and
//! back-to-back counters, and is normally driven entirely by bus events via
//! [`ScoreRegistry::attach`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::events::{EventBus, EventKind, GameEvent};
use crate::types::{MoveType, SpinKind};

/// How a locking piece is judged for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceAction {
    /// Plain lock, scored by the line-clear table.
    Regular,
    /// Full spin, scored by the spin table.
    Spin,
    /// Mini spin, named but worth no base points.
    MiniSpin,
}

impl From<SpinKind> for PieceAction {
    fn from(spin: SpinKind) -> Self {
        match spin {
            SpinKind::None => PieceAction::Regular,
            SpinKind::Mini => PieceAction::MiniSpin,
            SpinKind::Full => PieceAction::Spin,
        }
    }
}

/// Drop flavor, for drop-distance points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Soft,
    Hard,
}

/// Pluggable scoring tables.
pub trait ScoreRules {
    /// Base points before level scaling and chain bonuses.
    fn base_points(&self, action: PieceAction, lines: u32) -> u64;

    /// Display classification for the move.
    fn move_type(&self, action: PieceAction, lines: u32) -> MoveType;

    /// Whether the move sustains a back-to-back chain.
    fn is_difficult(&self, action: PieceAction, lines: u32) -> bool;

    /// Flat bonus for leaving the board empty, scaled by level.
    fn perfect_clear_bonus(&self) -> u64;

    /// Per-step combo bonus, scaled by combo count and level.
    fn combo_factor(&self) -> u64;

    /// Points per cell of drop distance.
    fn drop_multiplier(&self, kind: DropKind) -> u64;
}

const POINTS_REGULAR: [u64; 4] = [100, 300, 500, 800];
const POINTS_SPIN: [u64; 4] = [400, 800, 1200, 1600];
const PERFECT_CLEAR_BONUS: u64 = 2000;
const COMBO_FACTOR: u64 = 50;
const SOFT_DROP_MULTIPLIER: u64 = 1;
const HARD_DROP_MULTIPLIER: u64 = 2;

/// Back-to-back multiplier of 1.5, kept in integer math.
const B2B_NUMERATOR: u64 = 3;
const B2B_DENOMINATOR: u64 = 2;

/// Modern-guideline scoring tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct GuidelineRules;

impl ScoreRules for GuidelineRules {
    fn base_points(&self, action: PieceAction, lines: u32) -> u64 {
        match action {
            PieceAction::Regular => match lines {
                1..=4 => POINTS_REGULAR[(lines - 1) as usize],
                _ => 0,
            },
            // The spin table starts at zero lines: a spin that clears
            // nothing still has a listed value.
            PieceAction::Spin => match lines {
                0..=3 => POINTS_SPIN[lines as usize],
                _ => 0,
            },
            PieceAction::MiniSpin => 0,
        }
    }

    fn move_type(&self, action: PieceAction, lines: u32) -> MoveType {
        match action {
            PieceAction::Regular => match lines {
                1 => MoveType::Single,
                2 => MoveType::Double,
                3 => MoveType::Triple,
                4 => MoveType::Tetris,
                _ => MoveType::None,
            },
            PieceAction::Spin => match lines {
                1 => MoveType::TSpinSingle,
                2 => MoveType::TSpinDouble,
                3 => MoveType::TSpinTriple,
                _ => MoveType::None,
            },
            PieceAction::MiniSpin => match lines {
                1 => MoveType::TSpinMiniSingle,
                2 => MoveType::TSpinMiniDouble,
                _ => MoveType::None,
            },
        }
    }

    fn is_difficult(&self, action: PieceAction, lines: u32) -> bool {
        action != PieceAction::Regular || lines == 4
    }

    fn perfect_clear_bonus(&self) -> u64 {
        PERFECT_CLEAR_BONUS
    }

    fn combo_factor(&self) -> u64 {
        COMBO_FACTOR
    }

    fn drop_multiplier(&self, kind: DropKind) -> u64 {
        match kind {
            DropKind::Soft => SOFT_DROP_MULTIPLIER,
            DropKind::Hard => HARD_DROP_MULTIPLIER,
        }
    }
}

/// Running score state for one session.
///
/// Both chain counters start at -1 so the first qualifying move arms the
/// chain and the second one pays out.
pub struct ScoreRegistry {
    rules: Box<dyn ScoreRules>,
    level: u32,
    total_points: u64,
    total_lines: u32,
    combo: i32,
    b2b: i32,
}

impl fmt::Debug for ScoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreRegistry")
            .field("level", &self.level)
            .field("total_points", &self.total_points)
            .field("total_lines", &self.total_lines)
            .field("combo", &self.combo)
            .field("b2b", &self.b2b)
            .finish()
    }
}

impl ScoreRegistry {
    pub fn new(rules: Box<dyn ScoreRules>) -> Self {
        ScoreRegistry {
            rules,
            level: 1,
            total_points: 0,
            total_lines: 0,
            combo: -1,
            b2b: -1,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    pub fn total_lines(&self) -> u32 {
        self.total_lines
    }

    pub fn combo(&self) -> i32 {
        self.combo
    }

    pub fn b2b_chain(&self) -> i32 {
        self.b2b
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    /// Settles a clearing lock and returns the points awarded.
    ///
    /// Posts `BackToBackTrigger`, `ComboTriggered` and `ScoreUpdated` as they
    /// apply. Handlers for those events must not call back into this
    /// registry; it is mutably borrowed for the duration when driven through
    /// [`ScoreRegistry::attach`].
    pub fn record_clear(
        &mut self,
        spin: SpinKind,
        lines: u32,
        perfect: bool,
        bus: &EventBus,
    ) -> u64 {
        let action = PieceAction::from(spin);
        tracing::debug!("recording {:?} clearing {} lines", action, lines);
        let move_type = self.rules.move_type(action, lines);
        let mut base = self.rules.base_points(action, lines);

        if self.rules.is_difficult(action, lines) {
            self.b2b += 1;
            if self.b2b > 0 {
                bus.post(GameEvent::BackToBackTrigger {
                    chain: self.b2b as u32,
                });
                base = base * B2B_NUMERATOR / B2B_DENOMINATOR;
            }
        } else if lines > 0 {
            self.b2b = -1;
        }

        if lines > 0 {
            self.combo += 1;
        } else {
            self.combo = -1;
        }

        let level = u64::from(self.level);
        let combo_bonus = if self.combo > 0 {
            bus.post(GameEvent::ComboTriggered {
                combo: self.combo as u32,
            });
            self.rules.combo_factor() * self.combo as u64 * level
        } else {
            0
        };
        let perfect_bonus = if perfect {
            self.rules.perfect_clear_bonus() * level
        } else {
            0
        };

        let awarded = base * level + combo_bonus + perfect_bonus;
        self.total_points += awarded;
        self.total_lines += lines;
        if move_type.is_special() {
            tracing::info!("{} for {} points", move_type.display_name(), awarded);
        }
        bus.post(GameEvent::ScoreUpdated {
            total_lines: self.total_lines,
            total_points: self.total_points,
            awarded,
            move_type,
        });
        awarded
    }

    /// Notes a lock; a lock that cleared nothing breaks the combo.
    pub fn record_lock(&mut self, cleared: bool) {
        if !cleared {
            self.combo = -1;
        }
    }

    /// Adds drop-distance points. Not level-scaled and not announced.
    pub fn record_drop(&mut self, kind: DropKind, distance: u32) {
        self.total_points += u64::from(distance) * self.rules.drop_multiplier(kind);
    }

    /// Subscribes a shared registry to the events that drive it.
    pub fn attach(registry: Rc<RefCell<ScoreRegistry>>, bus: &EventBus) {
        let reg = Rc::clone(&registry);
        bus.subscribe(EventKind::LineCleared, move |bus, event| {
            if let GameEvent::LineCleared {
                spin,
                lines,
                perfect,
            } = event
            {
                reg.borrow_mut().record_clear(*spin, *lines, *perfect, bus);
            }
        });
        let reg = Rc::clone(&registry);
        bus.subscribe(EventKind::PieceLocked, move |_, event| {
            if let GameEvent::PieceLocked { cleared } = event {
                reg.borrow_mut().record_lock(*cleared);
            }
        });
        let reg = Rc::clone(&registry);
        bus.subscribe(EventKind::HardDrop, move |_, event| {
            if let GameEvent::HardDrop { distance } = event {
                reg.borrow_mut().record_drop(DropKind::Hard, *distance);
            }
        });
        let reg = Rc::clone(&registry);
        bus.subscribe(EventKind::SoftDrop, move |_, event| {
            if let GameEvent::SoftDrop { distance } = event {
                reg.borrow_mut().record_drop(DropKind::Soft, *distance);
            }
        });
        bus.subscribe(EventKind::LevelUp, move |_, event| {
            if let GameEvent::LevelUp { level } = event {
                registry.borrow_mut().set_level(*level);
            }
        });
    }
}
