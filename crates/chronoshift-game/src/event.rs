//! Notifications queued by the session for the HUD and renderer

use chronoshift_core::period::TimePeriod;
use serde::Serialize;

use crate::session::SessionState;

/// Something the HUD or renderer should react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    StateChanged { state: SessionState },
    ScoreChanged { score: u64 },
    LevelChanged { level: u32 },
    /// The current level was rebuilt and the player respawned
    LevelRestarted { level: u32 },
    /// The active period changed; `flash_color` is the period's ambient tint
    PeriodChanged { period: TimePeriod, flash_color: u32 },
    LevelCompleted { level: u32 },
    GameOver { final_score: u64 },
}

impl GameEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::StateChanged { .. } => "state_changed",
            Self::ScoreChanged { .. } => "score_changed",
            Self::LevelChanged { .. } => "level_changed",
            Self::LevelRestarted { .. } => "level_restarted",
            Self::PeriodChanged { .. } => "period_changed",
            Self::LevelCompleted { .. } => "level_completed",
            Self::GameOver { .. } => "game_over",
        }
    }
}
