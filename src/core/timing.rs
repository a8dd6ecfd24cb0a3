//! Tick bookkeeping: shared timer accumulators and time distortion.

/// Millisecond accumulators shared by the engine and the piece controller.
/// Each is reset by whichever state transition owns it (spawn, lock,
/// entry, DAS press), never asynchronously.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    /// Gravity accumulator.
    pub gravity: u32,
    /// Lock-delay accumulator, pinned at zero while the piece can fall.
    pub lock: u32,
    /// DAS accumulator, shared by the delay and repeat phases.
    pub das: u32,
    /// Soft-drop accumulator.
    pub soft_drop: u32,
    /// Entry-delay accumulator.
    pub entry: u32,
    /// Total time spent in the playing phase.
    pub session: u64,
}

/// Global time-distortion mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMode {
    Normal,
    Slowed,
    Frozen,
}

/// Outcome of advancing the time manager by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTick {
    /// The delta to feed gravity, after distortion.
    pub effective_delta: u32,
    /// True on the tick a freeze ran out. Deferred line clears flush now.
    pub freeze_ended: bool,
}

/// Scales or zeroes the delta seen by gravity. Slowed and frozen modes
/// carry a remaining duration and fall back to normal when it runs out;
/// only the freeze expiry is reported, since pending clears hang off it.
#[derive(Debug, Clone)]
pub struct TimeManager {
    mode: TimeMode,
    remaining: u32,
    slow_multiplier: f32,
}

impl TimeManager {
    pub fn new(slow_multiplier: f32) -> Self {
        TimeManager {
            mode: TimeMode::Normal,
            remaining: 0,
            slow_multiplier,
        }
    }

    pub fn mode(&self) -> TimeMode {
        self.mode
    }

    /// Enters frozen mode for `duration` ms, replacing any current mode.
    pub fn freeze(&mut self, duration: u32) {
        self.mode = TimeMode::Frozen;
        self.remaining = duration;
    }

    /// Enters slowed mode for `duration` ms, replacing any current mode.
    pub fn slow(&mut self, duration: u32) {
        self.mode = TimeMode::Slowed;
        self.remaining = duration;
    }

    /// Advances mode countdowns by `delta` and reports the distorted delta.
    pub fn tick(&mut self, delta: u32) -> TimeTick {
        match self.mode {
            TimeMode::Normal => TimeTick {
                effective_delta: delta,
                freeze_ended: false,
            },
            TimeMode::Slowed => {
                let scaled = (delta as f32 * self.slow_multiplier) as u32;
                self.remaining = self.remaining.saturating_sub(delta);
                if self.remaining == 0 {
                    self.mode = TimeMode::Normal;
                }
                TimeTick {
                    effective_delta: scaled,
                    freeze_ended: false,
                }
            }
            TimeMode::Frozen => {
                self.remaining = self.remaining.saturating_sub(delta);
                let expired = self.remaining == 0;
                if expired {
                    self.mode = TimeMode::Normal;
                }
                TimeTick {
                    effective_delta: 0,
                    freeze_ended: expired,
                }
            }
        }
    }
}
