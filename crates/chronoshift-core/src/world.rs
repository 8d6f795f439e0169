//! World State
//!
//! The mutable per-session state: current level and period, live entities,
//! the player, score, session flags and held keys. Every other system reads
//! and writes through the entry points here.

use bitflags::bitflags;
use glam::Vec3;
use serde::Serialize;

use crate::entity::{Block, Entity, Goal, Portal};
use crate::input::InputState;
use crate::period::TimePeriod;

bitflags! {
    /// Session flags mirrored into the world for the physics gate
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
    pub struct SessionFlags: u8 {
        /// A playthrough is running
        const PLAYING = 0b001;
        /// Simulation frozen by the player
        const PAUSED = 0b010;
        /// Goal reached; set until the next level loads
        const LEVEL_COMPLETE = 0b100;
    }
}

/// The player's body
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Player {
    /// Center of the player's box
    pub position: Vec3,
    pub velocity: Vec3,
    /// Resting on a platform's top surface
    pub grounded: bool,
    /// Glow shell opacity, animated while playing
    pub glow_opacity: f32,
}

impl Player {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            grounded: false,
            glow_opacity: 0.3,
        }
    }
}

/// Per-session world state
#[derive(Debug, Clone)]
pub struct WorldState {
    level: u32,
    period: TimePeriod,
    entities: Vec<Entity>,
    player: Player,
    score: u64,
    flags: SessionFlags,
    input: InputState,
}

impl WorldState {
    /// Create an empty world on level 1 in the present, with the player at `spawn`
    pub fn new(spawn: Vec3) -> Self {
        Self {
            level: 1,
            period: TimePeriod::Present,
            entities: Vec::new(),
            player: Player::at(spawn),
            score: 0,
            flags: SessionFlags::empty(),
            input: InputState::new(),
        }
    }

    /// Put the player back at `spawn` at rest
    pub fn reset_player(&mut self, spawn: Vec3) {
        self.player.position = spawn;
        self.player.velocity = Vec3::ZERO;
        self.player.grounded = false;
    }

    /// Set the level counter
    pub fn set_level(&mut self, index: u32) {
        self.level = index;
    }

    /// Replace every live entity with a freshly spawned set
    pub fn load_entities(&mut self, entities: Vec<Entity>) {
        self.entities = entities;
    }

    /// Set the active period. Visibility is applied separately.
    pub fn set_time_period(&mut self, period: TimePeriod) {
        self.period = period;
    }

    /// Award points
    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Start a new playthrough: score back to zero and level 1
    pub fn reset_progress(&mut self) {
        self.score = 0;
        self.level = 1;
    }

    /// Set or clear session flags
    pub fn set_flags(&mut self, flags: SessionFlags, enabled: bool) {
        self.flags.set(flags, enabled);
    }

    /// Replace all session flags at once
    pub fn replace_flags(&mut self, flags: SessionFlags) {
        self.flags = flags;
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn period(&self) -> TimePeriod {
        self.period
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    /// Whether the physics step should run this tick
    pub fn is_simulating(&self) -> bool {
        self.flags.contains(SessionFlags::PLAYING)
            && !self.flags.intersects(SessionFlags::PAUSED | SessionFlags::LEVEL_COMPLETE)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Platforms in placement order, ground first
    pub fn platforms(&self) -> impl Iterator<Item = &Block> {
        self.entities.iter().filter_map(|entity| match entity {
            Entity::Platform(block) => Some(block),
            _ => None,
        })
    }

    /// Obstacles in placement order
    pub fn obstacles(&self) -> impl Iterator<Item = &Block> {
        self.entities.iter().filter_map(|entity| match entity {
            Entity::Obstacle(block) => Some(block),
            _ => None,
        })
    }

    pub fn portals(&self) -> impl Iterator<Item = &Portal> {
        self.entities.iter().filter_map(|entity| match entity {
            Entity::Portal(portal) => Some(portal),
            _ => None,
        })
    }

    /// The level's goal, if one is loaded
    pub fn goal(&self) -> Option<&Goal> {
        self.entities.iter().find_map(|entity| match entity {
            Entity::Goal(goal) => Some(goal),
            _ => None,
        })
    }
}
