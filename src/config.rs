//! Runtime configuration for a game session.
//!
//! All timing values are in milliseconds. A config is plain data: it can be
//! deserialized from JSON (missing fields fall back to defaults) and must be
//! validated before a game is built from it.

use serde::{Deserialize, Serialize};

/// Win condition for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameGoal {
    /// Endless play, only a top-out ends the game.
    None,
    /// Clear this many lines to win.
    Lines(u32),
    /// Survive this many seconds to win.
    Time(u32),
}

/// Tunable parameters for one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Visible playfield height in rows.
    pub rows: usize,
    /// Playfield width in columns.
    pub cols: usize,
    /// Delay before auto-shift kicks in while a direction is held, in ms.
    pub das_delay: u32,
    /// Interval between auto-shift repeats, in ms. Zero repeats every tick.
    pub arr_delay: u32,
    /// Pause between a piece locking and the next spawn, in ms.
    pub entry_delay: u32,
    /// Grounded time before a piece locks in place, in ms.
    pub lock_delay: u32,
    /// Interval between soft-drop steps, in ms. Zero drops straight to the floor.
    pub soft_drop_delay: u32,
    /// How many times the lock timer may be reset by moves or rotations.
    pub max_lock_resets: u32,
    /// Gravity period at level 1, in ms per row.
    pub gravity_base: u32,
    /// How much the gravity period shrinks per level, in ms.
    pub gravity_increment: u32,
    /// Highest level the session can reach.
    pub level_cap: u32,
    /// Whether the hold slot is available.
    pub hold_enabled: bool,
    /// Whether a ghost projection is maintained for the active piece.
    pub ghost_enabled: bool,
    /// Whether spin detection feeds scoring.
    pub spin_enabled: bool,
    /// Whether 180-degree rotation is accepted.
    pub half_turn_enabled: bool,
    /// How many upcoming pieces the preview exposes.
    pub preview_size: usize,
    /// How many full piece sets each bag refill shuffles together.
    pub bag_multiplier: u32,
    /// Time scale applied while slowed, in (0, 1].
    pub slow_down_multiplier: f32,
    /// Win condition for the session.
    pub goal: GameGoal,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: 20,
            cols: 10,
            das_delay: 120,
            arr_delay: 0,
            entry_delay: 500,
            lock_delay: 500,
            soft_drop_delay: 50,
            max_lock_resets: 15,
            gravity_base: 1000,
            gravity_increment: 50,
            level_cap: 99,
            hold_enabled: true,
            ghost_enabled: true,
            spin_enabled: true,
            half_turn_enabled: true,
            preview_size: 5,
            bag_multiplier: 1,
            slow_down_multiplier: 0.5,
            goal: GameGoal::None,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("board dimensions must be non-zero, got {rows}x{cols}")]
    ZeroBoardDimensions { rows: usize, cols: usize },
    #[error("bag multiplier must be at least 1")]
    ZeroBagMultiplier,
    #[error("level cap must be at least 1")]
    ZeroLevelCap,
    #[error("slow-down multiplier must be in (0, 1], got {0}")]
    InvalidSlowMultiplier(f32),
    #[error("goal value must be non-zero")]
    ZeroGoalValue,
}

impl GameConfig {
    /// Checks the config for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::ZeroBoardDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.bag_multiplier == 0 {
            return Err(ConfigError::ZeroBagMultiplier);
        }
        if self.level_cap == 0 {
            return Err(ConfigError::ZeroLevelCap);
        }
        if self.slow_down_multiplier <= 0.0 || self.slow_down_multiplier > 1.0 {
            return Err(ConfigError::InvalidSlowMultiplier(self.slow_down_multiplier));
        }
        match self.goal {
            GameGoal::Lines(0) | GameGoal::Time(0) => return Err(ConfigError::ZeroGoalValue),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"rows": 22, "das_delay": 166, "goal": {"lines": 40}}"#)
                .unwrap();
        assert_eq!(config.rows, 22);
        assert_eq!(config.das_delay, 166);
        assert_eq!(config.goal, GameGoal::Lines(40));
        assert_eq!(config.cols, 10);
        assert_eq!(config.lock_delay, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = GameConfig {
            goal: GameGoal::Time(120),
            slow_down_multiplier: 0.25,
            ..GameConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = GameConfig {
            rows: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroBoardDimensions { rows: 0, cols: 10 })
        );
    }

    #[test]
    fn test_zero_bag_multiplier_rejected() {
        let config = GameConfig {
            bag_multiplier: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroBagMultiplier));
    }

    #[test]
    fn test_slow_multiplier_bounds() {
        let mut config = GameConfig::default();
        config.slow_down_multiplier = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSlowMultiplier(0.0))
        );
        config.slow_down_multiplier = 1.0;
        assert!(config.validate().is_ok());
        config.slow_down_multiplier = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSlowMultiplier(1.5))
        );
    }

    #[test]
    fn test_zero_goal_value_rejected() {
        let config = GameConfig {
            goal: GameGoal::Lines(0),
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroGoalValue));
        let config = GameConfig {
            goal: GameGoal::Time(0),
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroGoalValue));
    }
}
