//! # Chronoshift Core
//!
//! World model for the Chronoshift time-shifting platformer.
//!
//! This crate provides the data the simulation and the renderer share:
//! - **Periods**: The past/present/future registry and period sets
//! - **Levels**: The level catalog and its construction specs
//! - **Entities**: Platforms, obstacles, portals and the goal as one sum type
//! - **World**: Per-session mutable state with controlled mutation entry points
//! - **Visibility**: Which entities are shown and collidable in the current period
//! - **Input**: Held-key state scoped to the world
//! - **Time**: Fixed-step frame clock and one-shot timers

pub mod math;
pub mod time;
pub mod period;
pub mod input;
pub mod entity;
pub mod level;
pub mod world;
pub mod visibility;

pub use math::Aabb;
pub use time::{DeltaTime, FixedTimeStep, FrameClock, Timer};
pub use period::{PeriodInfo, PeriodSet, TimePeriod, period_info, period_info_by_name};
pub use input::{Action, InputEvent, InputState, KeyCode};
pub use entity::{Block, Entity, EntityKind, Goal, Portal, PortalParticle};
pub use level::{BlockSpec, Level, LevelCatalog, PortalSpec, MAX_LEVEL};
pub use world::{Player, SessionFlags, WorldState};
pub use visibility::apply_visibility;

use thiserror::Error;

/// Errors raised by the world model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid time period: {0}")]
    InvalidPeriod(String),

    #[error("Unknown level: {0} (catalog holds levels 1..={max})", max = MAX_LEVEL)]
    UnknownLevel(u32),
}

/// Result type for world model operations
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidPeriod("medieval".to_string());
        assert_eq!(err.to_string(), "Invalid time period: medieval");

        let err = CoreError::UnknownLevel(7);
        assert_eq!(err.to_string(), "Unknown level: 7 (catalog holds levels 1..=3)");
    }
}
