//! Session configuration

use std::time::Duration;

use chronoshift_core::level::MAX_LEVEL;
use chronoshift_physics::PhysicsConfig;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("max_level must be between 1 and {max}, got {0}", max = MAX_LEVEL)]
    MaxLevelOutOfRange(u32),

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("transition_delay_secs must not be negative, got {0}")]
    NegativeDelay(f64),
}

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for a play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub physics: PhysicsConfig,
    /// Where the player starts every level
    pub spawn_point: Vec3,
    /// Points for reaching a goal
    pub level_bonus: u64,
    /// Pause between reaching a goal and the next level loading
    pub transition_delay_secs: f64,
    /// Completing this level ends the game
    pub max_level: u32,
    /// Simulation tick length in seconds
    pub fixed_timestep: f64,
    /// Seed for level 3 heights and portal particles; random when unset
    pub level_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            spawn_point: Vec3::new(-10.0, 2.0, 0.0),
            level_bonus: 1000,
            transition_delay_secs: 2.0,
            max_level: MAX_LEVEL,
            fixed_timestep: 1.0 / 60.0,
            level_seed: None,
        }
    }
}

impl SessionConfig {
    /// Check every value the session relies on
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_level == 0 || self.max_level > MAX_LEVEL {
            return Err(ConfigError::MaxLevelOutOfRange(self.max_level));
        }
        if self.transition_delay_secs < 0.0 {
            return Err(ConfigError::NegativeDelay(self.transition_delay_secs));
        }

        let positives = [
            ("fixed_timestep", self.fixed_timestep),
            ("physics.portal_radius", f64::from(self.physics.portal_radius)),
            ("physics.goal_radius", f64::from(self.physics.goal_radius)),
            ("physics.move_speed", f64::from(self.physics.move_speed)),
        ];
        for (name, value) in positives {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        Ok(())
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_secs_f64(self.transition_delay_secs.max(0.0))
    }
}
