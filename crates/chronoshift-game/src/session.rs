//! Session/Level Controller
//!
//! Owns the world and drives it through the session state machine:
//!
//! ```text
//! Menu --start--> Playing <--pause--> Paused
//!                    |
//!                  goal
//!                    v
//!             LevelTransition --delay--> Playing (next level)
//!                    |
//!              past max level
//!                    v
//!                GameOver --exit--> Menu
//! ```
//!
//! The host calls [`Session::update`] once per display frame and forwards key
//! events; physics runs on a fixed tick inside `update`.

use chronoshift_core::input::{InputEvent, KeyCode};
use chronoshift_core::level::LevelCatalog;
use chronoshift_core::period::TimePeriod;
use chronoshift_core::time::{DeltaTime, FixedTimeStep, FrameClock, Timer};
use chronoshift_core::visibility::apply_visibility;
use chronoshift_core::world::{SessionFlags, WorldState};
use serde::Serialize;

use crate::animation;
use crate::config::{ConfigResult, SessionConfig};
use crate::event::GameEvent;
use crate::snapshot::{CameraRig, FrameSnapshot, HudSnapshot};

/// Session state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Menu,
    Playing,
    Paused,
    /// Goal reached; the next level loads after the transition delay
    LevelTransition,
    GameOver,
}

/// Next-level load scheduled on the frame clock
#[derive(Debug, Clone)]
struct PendingTransition {
    timer: Timer,
}

/// One play session
pub struct Session {
    config: SessionConfig,
    fixed_step: FixedTimeStep,
    catalog: LevelCatalog,
    world: WorldState,
    state: SessionState,
    clock: FrameClock,
    pending: Option<PendingTransition>,
    camera: CameraRig,
    events: Vec<GameEvent>,
}

impl Session {
    /// Create a session sitting in the menu with level 1 loaded behind it
    pub fn new(config: SessionConfig) -> ConfigResult<Self> {
        config.validate()?;

        let catalog = match config.level_seed {
            Some(seed) => LevelCatalog::with_seed(seed),
            None => LevelCatalog::new(),
        };

        let mut session = Self {
            fixed_step: FixedTimeStep::from_step(config.fixed_timestep),
            world: WorldState::new(config.spawn_point),
            config,
            catalog,
            state: SessionState::Menu,
            clock: FrameClock::new(),
            pending: None,
            camera: CameraRig::default(),
            events: Vec::new(),
        };
        session.load_level(1);
        Ok(session)
    }

    /// Menu -> Playing
    pub fn start_game(&mut self) -> bool {
        if self.state != SessionState::Menu {
            log::debug!("Ignoring start request in {:?}", self.state);
            return false;
        }

        log::info!("Starting game");
        self.reset_to_first_level();
        self.set_state(SessionState::Playing);
        true
    }

    /// Toggle between Playing and Paused
    pub fn pause_game(&mut self) -> bool {
        match self.state {
            SessionState::Playing => self.set_state(SessionState::Paused),
            SessionState::Paused => self.set_state(SessionState::Playing),
            other => {
                log::debug!("Ignoring pause request in {:?}", other);
                return false;
            }
        }
        true
    }

    /// Respawn the player and rebuild the current level. Score is kept.
    ///
    /// During a level transition this cancels the pending load and starts the
    /// next level immediately.
    pub fn restart_level(&mut self) -> bool {
        if !matches!(
            self.state,
            SessionState::Playing | SessionState::Paused | SessionState::LevelTransition
        ) {
            log::debug!("Ignoring restart request in {:?}", self.state);
            return false;
        }

        self.cancel_transition();
        self.world.set_flags(SessionFlags::LEVEL_COMPLETE, false);
        self.world.reset_player(self.config.spawn_point);

        let level = self.world.level();
        self.load_level(level);
        log::info!("Restarted level {}", level);
        self.events.push(GameEvent::LevelRestarted { level });

        if self.state == SessionState::LevelTransition {
            self.set_state(SessionState::Playing);
        }
        true
    }

    /// Throw away all progress and play level 1 from scratch
    pub fn restart_game(&mut self) {
        log::info!("Restarting game");
        self.reset_to_first_level();
        self.set_state(SessionState::Playing);
    }

    /// Back to the menu with a fresh level 1 loaded
    pub fn exit_game(&mut self) {
        log::info!("Exiting to menu");
        self.reset_to_first_level();
        self.set_state(SessionState::Menu);
    }

    /// Switch the active period. Only honored while playing.
    pub fn switch_time_period(&mut self, period: TimePeriod) -> bool {
        if self.state != SessionState::Playing {
            log::debug!("Ignoring switch to {} in {:?}", period, self.state);
            return false;
        }

        self.apply_period(period);
        true
    }

    /// Key-down from the host, by key identifier
    pub fn on_key_down(&mut self, key_id: &str) {
        self.handle_input(&InputEvent::KeyPressed(KeyCode::from_key_id(key_id)));
    }

    /// Key-up from the host, by key identifier
    pub fn on_key_up(&mut self, key_id: &str) {
        self.handle_input(&InputEvent::KeyReleased(KeyCode::from_key_id(key_id)));
    }

    /// Record a key event. A fresh press on the number row switches period.
    pub fn handle_input(&mut self, event: &InputEvent) {
        let newly_pressed = self.world.input_mut().handle_event(event);

        if let InputEvent::KeyPressed(key) = event {
            if let Some(period) = key.time_period().filter(|_| newly_pressed) {
                self.switch_time_period(period);
            }
        }
    }

    /// Award the level bonus and move on. Does nothing if the current level
    /// was already completed.
    pub fn complete_level(&mut self) -> bool {
        if self.state != SessionState::Playing || self.world.flags().contains(SessionFlags::LEVEL_COMPLETE) {
            return false;
        }

        let finished = self.world.level();
        self.world.set_flags(SessionFlags::LEVEL_COMPLETE, true);
        self.world.add_score(self.config.level_bonus);
        log::info!("Level {} complete, score {}", finished, self.world.score());
        self.events.push(GameEvent::LevelCompleted { level: finished });
        self.events.push(GameEvent::ScoreChanged { score: self.world.score() });

        let next = finished + 1;
        if next > self.config.max_level {
            let final_score = self.world.score();
            log::info!("Game over, final score {}", final_score);
            self.set_state(SessionState::GameOver);
            self.events.push(GameEvent::GameOver { final_score });
        } else {
            self.world.set_level(next);
            self.events.push(GameEvent::LevelChanged { level: next });
            self.pending = Some(PendingTransition {
                timer: Timer::new(self.config.transition_delay()),
            });
            self.set_state(SessionState::LevelTransition);
        }
        true
    }

    /// Advance by one display frame
    pub fn update(&mut self, delta: DeltaTime) {
        self.clock.update(delta);

        if self.state == SessionState::LevelTransition {
            let frame = self.clock.delta_time().as_duration();
            let due = self.pending.as_mut().is_some_and(|pending| pending.timer.tick(frame));
            if due {
                self.finish_transition();
            }
        }

        let step = self.fixed_step.step;
        for _ in 0..self.clock.fixed_updates_needed(&self.fixed_step) {
            self.clock.consume_fixed_update(step);
            self.tick();
        }
        self.clock.discard_backlog(step);

        if matches!(self.state, SessionState::Playing | SessionState::LevelTransition) {
            animation::animate(&mut self.world, self.clock.total_time() as f32);
        }
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.world, self.state, self.camera)
    }

    pub fn hud(&self) -> HudSnapshot {
        let remaining = self
            .pending
            .as_ref()
            .map(|pending| pending.timer.remaining().as_millis() as u64);
        HudSnapshot::capture(&self.world, self.state, remaining)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// One fixed physics tick, then the outcomes the session acts on
    fn tick(&mut self) {
        if self.state != SessionState::Playing {
            return;
        }

        let outcome = chronoshift_physics::step(&mut self.world, &self.config.physics);
        self.camera.follow(self.world.player().position);

        if let Some(period) = outcome.period_switch {
            self.switch_time_period(period);
        }
        if outcome.goal_reached {
            self.complete_level();
        }
        if outcome.fell_out && self.state == SessionState::Playing {
            log::info!("Player fell out of level {}", self.world.level());
            self.restart_level();
        }
    }

    fn finish_transition(&mut self) {
        self.pending = None;
        self.world.set_flags(SessionFlags::LEVEL_COMPLETE, false);
        self.world.reset_player(self.config.spawn_point);
        self.load_level(self.world.level());
        self.set_state(SessionState::Playing);
    }

    fn cancel_transition(&mut self) {
        if self.pending.take().is_some() {
            log::info!("Cancelled pending load of level {}", self.world.level());
        }
    }

    fn reset_to_first_level(&mut self) {
        self.cancel_transition();
        self.world.reset_progress();
        self.world.set_flags(SessionFlags::LEVEL_COMPLETE, false);
        self.world.reset_player(self.config.spawn_point);
        self.world.input_mut().clear();
        self.camera = CameraRig::default();
        self.load_level(1);
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.events.push(GameEvent::LevelChanged { level: 1 });
    }

    /// Rebuild `index` and force the present
    fn load_level(&mut self, index: u32) {
        match self.catalog.build_level(index) {
            Ok(level) => {
                let entities = level.spawn_entities(self.catalog.rng_mut());
                self.world.set_level(index);
                self.world.load_entities(entities);
                log::info!("Loaded level {}", index);
            }
            Err(err) => log::warn!("Keeping current layout: {}", err),
        }
        self.apply_period(TimePeriod::Present);
    }

    /// Set the period and refresh visibility; notifies only on change
    fn apply_period(&mut self, period: TimePeriod) {
        let previous = self.world.period();
        self.world.set_time_period(period);
        let active = apply_visibility(&mut self.world);

        if previous != period {
            log::info!("Switched to {} ({} active blocks)", period, active);
            self.events.push(GameEvent::PeriodChanged {
                period,
                flash_color: period.info().ambient_color,
            });
        }
    }

    fn set_state(&mut self, state: SessionState) {
        let (playing, paused) = match state {
            SessionState::Menu | SessionState::GameOver => (false, false),
            SessionState::Playing | SessionState::LevelTransition => (true, false),
            SessionState::Paused => (true, true),
        };
        self.world.set_flags(SessionFlags::PLAYING, playing);
        self.world.set_flags(SessionFlags::PAUSED, paused);

        if paused {
            self.clock.pause();
        } else {
            self.clock.resume();
        }

        if self.state != state {
            log::info!("Session {:?} -> {:?}", self.state, state);
            self.state = state;
            self.events.push(GameEvent::StateChanged { state });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronoshift_core::entity::Entity;
    use chronoshift_core::level::GOAL_POSITION;
    use glam::Vec3;

    const SPAWN: Vec3 = Vec3::new(-10.0, 2.0, 0.0);

    fn session() -> Session {
        let config = SessionConfig { level_seed: Some(42), ..Default::default() };
        Session::new(config).unwrap()
    }

    fn playing() -> Session {
        let mut session = session();
        assert!(session.start_game());
        session.drain_events();
        session
    }

    fn frames(session: &mut Session, count: usize) {
        for _ in 0..count {
            session.update(DeltaTime::from_secs(1.0 / 60.0));
        }
    }

    /// Eight clamped frames cover the default two second delay
    fn wait_out_transition(session: &mut Session) {
        for _ in 0..8 {
            session.update(DeltaTime::from_secs(0.25));
        }
    }

    fn touch_goal(session: &mut Session) {
        session.world.player_mut().position = GOAL_POSITION;
        session.world.player_mut().velocity = Vec3::ZERO;
        frames(session, 1);
    }

    #[test]
    fn test_new_session_waits_in_menu() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::Menu);
        assert_eq!(session.world().level(), 1);
        assert!(session.world().goal().is_some());
        assert!(!session.world().is_simulating());

        frames(&mut session, 30);
        assert_eq!(session.world().player().position, SPAWN);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SessionConfig { max_level: 0, ..Default::default() };
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn test_start_game() {
        let mut session = session();
        assert!(session.start_game());

        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.world().level(), 1);
        assert_eq!(session.world().score(), 0);
        assert_eq!(session.world().period(), TimePeriod::Present);
        assert_eq!(session.world().player().position, SPAWN);
        assert!(session.drain_events().contains(&GameEvent::StateChanged { state: SessionState::Playing }));

        assert!(!session.start_game());
    }

    #[test]
    fn test_goal_advances_to_next_level() {
        let mut session = playing();
        touch_goal(&mut session);

        assert_eq!(session.state(), SessionState::LevelTransition);
        assert_eq!(session.world().score(), 1000);
        assert!(session.hud().transition_remaining_ms.is_some());

        wait_out_transition(&mut session);

        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.world().level(), 2);
        assert_eq!(session.world().score(), 1000);
        assert_eq!(session.world().period(), TimePeriod::Present);
        assert!(!session.world().flags().contains(SessionFlags::LEVEL_COMPLETE));
        assert_eq!(session.world().platforms().count(), 4);

        // Respawned before this frame's ticks, which drop the player onto the ground
        let player = session.world().player();
        assert_eq!(player.position.x, SPAWN.x);
        assert!(player.position.y >= 1.0 && player.position.y <= SPAWN.y);
    }

    #[test]
    fn test_transition_waits_for_delay() {
        let mut session = playing();
        touch_goal(&mut session);

        for _ in 0..7 {
            session.update(DeltaTime::from_secs(0.25));
        }
        assert_eq!(session.state(), SessionState::LevelTransition);
        assert!(!session.world().is_simulating());

        session.update(DeltaTime::from_secs(0.25));
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[test]
    fn test_goal_completion_is_idempotent() {
        let mut session = playing();
        assert!(session.complete_level());
        assert!(!session.complete_level());

        assert_eq!(session.world().score(), 1000);
        assert_eq!(session.world().level(), 2);

        // Goal overlap during the transition window is not re-checked
        touch_goal(&mut session);
        assert_eq!(session.world().score(), 1000);
    }

    #[test]
    fn test_final_level_ends_game() {
        let mut session = playing();
        for _ in 0..2 {
            assert!(session.complete_level());
            wait_out_transition(&mut session);
        }
        assert_eq!(session.world().level(), 3);
        session.drain_events();

        touch_goal(&mut session);

        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.world().score(), 3000);
        assert_eq!(session.world().level(), 3);
        assert_eq!(session.hud().final_score, Some(3000));
        assert!(session.drain_events().contains(&GameEvent::GameOver { final_score: 3000 }));

        let frozen = session.world().player().position;
        frames(&mut session, 60);
        assert_eq!(session.world().player().position, frozen);
        assert_eq!(session.world().score(), 3000);
    }

    #[test]
    fn test_number_key_switches_period() {
        let mut session = playing();
        session.on_key_down("1");

        assert_eq!(session.world().period(), TimePeriod::Past);
        for entity in session.world().entities() {
            if let Some(periods) = entity.periods() {
                assert_eq!(entity.is_visible(), periods.is_active_in(TimePeriod::Past));
            }
        }
        assert!(session.drain_events().contains(&GameEvent::PeriodChanged {
            period: TimePeriod::Past,
            flash_color: 0x8B4513,
        }));

        session.on_key_up("1");
        session.on_key_down("3");
        assert_eq!(session.world().period(), TimePeriod::Future);
    }

    #[test]
    fn test_period_keys_ignored_outside_play() {
        let mut session = session();
        session.on_key_down("3");
        assert_eq!(session.world().period(), TimePeriod::Present);

        assert!(session.start_game());
        assert!(session.pause_game());
        assert!(!session.switch_time_period(TimePeriod::Future));
        assert_eq!(session.world().period(), TimePeriod::Present);
    }

    #[test]
    fn test_portal_interaction() {
        let mut session = playing();
        // Level 1 future portal
        session.world.player_mut().position = Vec3::new(5.0, 1.0, -4.0);
        session.on_key_down("e");
        frames(&mut session, 1);

        assert_eq!(session.world().period(), TimePeriod::Future);
        assert!(!session.world().input().is_key_pressed(KeyCode::E));
    }

    #[test]
    fn test_fall_out_restarts_once() {
        let mut session = playing();
        session.world.add_score(500);
        session.world.player_mut().position = Vec3::new(30.0, -4.99, 0.0);
        frames(&mut session, 60);

        let restarts = session
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, GameEvent::LevelRestarted { .. }))
            .count();
        assert_eq!(restarts, 1);
        assert_eq!(session.world().score(), 500);
        assert_eq!(session.world().level(), 1);
        assert_eq!(session.world().player().position.x, SPAWN.x);
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut session = playing();
        assert!(session.pause_game());
        assert_eq!(session.state(), SessionState::Paused);

        let time = session.clock().total_time();
        frames(&mut session, 30);
        assert_eq!(session.world().player().position, SPAWN);
        assert_eq!(session.clock().total_time(), time);

        assert!(session.pause_game());
        assert_eq!(session.state(), SessionState::Playing);
        frames(&mut session, 1);
        assert!(session.world().player().position.y < SPAWN.y);
    }

    #[test]
    fn test_pause_ignored_outside_play() {
        let mut session = session();
        assert!(!session.pause_game());
        assert_eq!(session.state(), SessionState::Menu);
    }

    #[test]
    fn test_restart_level_keeps_score() {
        let mut session = playing();
        session.on_key_down("1");
        session.world.add_score(250);
        session.world.player_mut().position = Vec3::new(3.0, 7.0, 2.0);

        assert!(session.restart_level());
        assert_eq!(session.world().score(), 250);
        assert_eq!(session.world().player().position, SPAWN);
        assert_eq!(session.world().period(), TimePeriod::Present);
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[test]
    fn test_restart_cancels_pending_transition() {
        let mut session = playing();
        assert!(session.complete_level());
        session.drain_events();

        assert!(session.restart_level());
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.world().level(), 2);
        assert!(session.hud().transition_remaining_ms.is_none());

        wait_out_transition(&mut session);
        wait_out_transition(&mut session);
        assert_eq!(session.world().level(), 2);
        assert!(!session
            .drain_events()
            .iter()
            .any(|event| matches!(event, GameEvent::LevelChanged { .. })));
    }

    fn level_changes(events: &[GameEvent]) -> Vec<u32> {
        events
            .iter()
            .filter_map(|event| match event {
                GameEvent::LevelChanged { level } => Some(*level),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_restart_game_cancels_pending_transition() {
        let mut session = playing();
        assert!(session.complete_level());
        session.drain_events();

        session.restart_game();
        wait_out_transition(&mut session);
        wait_out_transition(&mut session);

        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.world().level(), 1);
        assert_eq!(session.world().score(), 0);
        assert!(!level_changes(&session.drain_events()).contains(&2));
    }

    #[test]
    fn test_exit_cancels_pending_transition() {
        let mut session = playing();
        assert!(session.complete_level());
        session.drain_events();

        session.exit_game();
        wait_out_transition(&mut session);
        wait_out_transition(&mut session);

        assert_eq!(session.state(), SessionState::Menu);
        assert_eq!(session.world().level(), 1);
        assert!(session.hud().transition_remaining_ms.is_none());
        assert!(!level_changes(&session.drain_events()).contains(&2));
    }

    #[test]
    fn test_held_keys_do_not_survive_reset() {
        let mut session = playing();
        session.on_key_down("d");
        frames(&mut session, 5);
        assert!(session.world().player().position.x > SPAWN.x);

        session.restart_game();
        assert!(!session.world().input().is_key_pressed(KeyCode::D));
        frames(&mut session, 30);
        assert_eq!(session.world().player().position.x, SPAWN.x);

        session.on_key_down("a");
        session.exit_game();
        assert!(session.start_game());
        frames(&mut session, 30);
        assert_eq!(session.world().player().position.x, SPAWN.x);
    }

    #[test]
    fn test_animation_continues_between_levels() {
        let mut session = playing();
        assert!(session.complete_level());
        let spin_before = session.world().goal().map(|goal| goal.spin);

        frames(&mut session, 3);

        assert_eq!(session.state(), SessionState::LevelTransition);
        let goal = session.world().goal().unwrap();
        assert_ne!(Some(goal.spin), spin_before);
        assert_eq!(goal.spin, session.clock().total_time() as f32);
        assert!(session.world().portals().all(|portal| portal.spin > 0.0));
    }

    #[test]
    fn test_restart_game_resets_everything() {
        let mut session = playing();
        session.complete_level();
        wait_out_transition(&mut session);
        session.on_key_down("3");

        session.restart_game();
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.world().score(), 0);
        assert_eq!(session.world().level(), 1);
        assert_eq!(session.world().period(), TimePeriod::Present);
    }

    #[test]
    fn test_exit_from_game_over() {
        let mut session = playing();
        for _ in 0..3 {
            session.complete_level();
            wait_out_transition(&mut session);
        }
        assert_eq!(session.state(), SessionState::GameOver);

        session.exit_game();
        assert_eq!(session.state(), SessionState::Menu);
        assert_eq!(session.world().score(), 0);
        assert_eq!(session.world().level(), 1);
        assert_eq!(session.world().period(), TimePeriod::Present);
        assert!(!session.world().is_simulating());
        assert!(session.start_game());
    }

    #[test]
    fn test_snapshot_tracks_camera_and_goal() {
        let mut session = playing();
        frames(&mut session, 5);

        let snapshot = session.snapshot();
        let player = session.world().player().position;
        assert_eq!(snapshot.camera.position.x, player.x);
        assert_eq!(snapshot.camera.position.z, player.z + 15.0);
        assert_eq!(snapshot.camera.position.y, 8.0);

        let goal = session
            .world()
            .entities()
            .iter()
            .find_map(|entity| match entity {
                Entity::Goal(goal) => Some(goal.display_position()),
                _ => None,
            });
        assert_eq!(snapshot.goal.map(|g| g.position), goal);
    }
}
