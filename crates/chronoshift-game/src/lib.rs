//! # Chronoshift Game
//!
//! Session orchestration for the Chronoshift platformer.
//!
//! ## Features
//! - Session state machine (menu, playing, paused, level transition, game over)
//! - Fixed-step physics driven from display frames
//! - Delayed level transitions that restarts can cancel
//! - Decorative animation and a trailing camera
//! - Render and HUD snapshots plus queued notifications

pub mod animation;
pub mod config;
pub mod event;
pub mod session;
pub mod snapshot;

pub use config::{ConfigError, ConfigResult, SessionConfig};
pub use event::GameEvent;
pub use session::{Session, SessionState};
pub use snapshot::{CameraRig, FrameSnapshot, HudSnapshot};
