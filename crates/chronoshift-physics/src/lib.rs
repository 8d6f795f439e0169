//! # Chronoshift Physics
//!
//! Per-tick player simulation for the Chronoshift platformer.
//!
//! This is an axis-aligned box heuristic, not a rigid-body solver:
//! - Constant per-tick gravity and jump impulse
//! - Standing on visible platforms by snapping onto their top face
//! - Push-back from visible obstacles
//! - Portal and goal proximity triggers
//! - Fall-out detection below the level
//!
//! [`step`] never applies period switches, level completion or restarts itself.
//! It reports them in a [`StepOutcome`] for the session to act on before the next tick.

use chronoshift_core::input::{Action, InputState};
use chronoshift_core::math::Aabb;
use chronoshift_core::period::TimePeriod;
use chronoshift_core::world::WorldState;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Physics tuning, in world units per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Horizontal distance per tick for each held direction
    pub move_speed: f32,
    /// Vertical velocity set by a jump
    pub jump_force: f32,
    /// Interact range around a portal center
    pub portal_radius: f32,
    /// Trigger range around the goal center
    pub goal_radius: f32,
    /// Height below which the player has fallen out of the level
    pub fall_limit: f32,
    /// Half extents of the player's box, glow shell included
    pub player_half_extents: Vec3,
    /// Height above a platform's top face the player's center lands at
    pub landing_offset: f32,
    /// Multiple of the tick's move vector undone on obstacle contact
    pub push_back_factor: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -0.02,
            move_speed: 0.15,
            jump_force: 0.3,
            portal_radius: 3.0,
            goal_radius: 2.0,
            fall_limit: -5.0,
            player_half_extents: Vec3::new(0.6, 1.1, 0.6),
            landing_offset: 1.0,
            push_back_factor: 2.0,
        }
    }
}

impl PhysicsConfig {
    /// The player's box at `position`
    pub fn player_bounds(&self, position: Vec3) -> Aabb {
        Aabb::from_center_half_extents(position, self.player_half_extents)
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    /// Horizontal displacement requested by held keys
    pub move_vector: Vec3,
    /// Player ended the tick standing on a platform
    pub landed: bool,
    /// A jump started this tick
    pub jumped: bool,
    /// Obstacles that pushed the player back
    pub obstacle_hits: u32,
    /// Portal interaction requested a switch to this period
    pub period_switch: Option<TimePeriod>,
    /// Player is inside the goal's trigger range
    pub goal_reached: bool,
    /// Player dropped below the fall limit
    pub fell_out: bool,
}

/// Horizontal move for the held direction keys. Each axis is independent, so
/// diagonal input moves `sqrt(2)` times faster than straight input.
pub fn move_vector(input: &InputState, speed: f32) -> Vec3 {
    let mut movement = Vec3::ZERO;
    if input.is_action_held(Action::MoveForward) {
        movement.z -= speed;
    }
    if input.is_action_held(Action::MoveBack) {
        movement.z += speed;
    }
    if input.is_action_held(Action::MoveLeft) {
        movement.x -= speed;
    }
    if input.is_action_held(Action::MoveRight) {
        movement.x += speed;
    }
    movement
}

/// Advance the player by one tick.
///
/// Does nothing unless the world is playing, unpaused and not between levels.
pub fn step(world: &mut WorldState, config: &PhysicsConfig) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    if !world.is_simulating() {
        return outcome;
    }

    let mut player = *world.player();

    player.velocity.y += config.gravity;

    let movement = move_vector(world.input(), config.move_speed);
    outcome.move_vector = movement;
    player.position += movement;
    player.position.y += player.velocity.y;

    // Ground: snapping zeroes the fall, so the first overlapping platform in
    // placement order is the one that catches the player.
    player.grounded = false;
    for platform in world.platforms().filter(|platform| platform.visible) {
        let bounds = platform.bounds();
        if player.velocity.y < 0.0 && config.player_bounds(player.position).intersects(&bounds) {
            player.position.y = bounds.top() + config.landing_offset;
            player.velocity.y = 0.0;
            player.grounded = true;
            log::trace!("Landed on platform at {:?}", platform.center);
        }
    }
    outcome.landed = player.grounded;

    if player.grounded && world.input().is_action_held(Action::Jump) {
        player.velocity.y = config.jump_force;
        world.input_mut().consume_action(Action::Jump);
        outcome.jumped = true;
    }

    for obstacle in world.obstacles().filter(|obstacle| obstacle.visible) {
        if config.player_bounds(player.position).intersects(&obstacle.bounds()) {
            player.position -= movement * config.push_back_factor;
            outcome.obstacle_hits += 1;
            log::trace!("Pushed back by obstacle at {:?}", obstacle.center);
        }
    }

    if world.input().is_action_held(Action::Interact) {
        for portal in world.portals() {
            if player.position.distance(portal.position) < config.portal_radius {
                outcome.period_switch = Some(portal.target);
            }
        }
        if outcome.period_switch.is_some() {
            world.input_mut().consume_action(Action::Interact);
        }
    }

    if let Some(goal) = world.goal() {
        outcome.goal_reached = player.position.distance(goal.position) < config.goal_radius;
    }

    outcome.fell_out = player.position.y < config.fall_limit;

    *world.player_mut() = player;
    outcome
}
