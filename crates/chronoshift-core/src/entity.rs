//! Entities
//!
//! Everything a level places in the world, as one tagged sum type. Platforms and
//! obstacles are solid boxes tagged with the periods they exist in; portals and the
//! goal are trigger zones that never block movement.

use glam::Vec3;
use serde::Serialize;
use smallvec::SmallVec;

use crate::math::Aabb;
use crate::period::{PeriodSet, TimePeriod};

/// Number of decorative particles orbiting each portal
pub const PORTAL_PARTICLES: usize = 20;

/// Discriminant of [`Entity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Platform,
    Obstacle,
    Portal,
    Goal,
}

/// Solid box shared by platforms and obstacles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// World-space center
    pub center: Vec3,
    /// Full extents along each axis
    pub size: Vec3,
    /// Periods this block exists in (empty = always)
    pub periods: PeriodSet,
    /// Display color (0xRRGGBB)
    pub color: u32,
    /// Shown and collidable in the current period
    pub visible: bool,
}

impl Block {
    /// World-space bounding box
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.center, self.size)
    }
}

/// Decorative particle orbiting a portal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortalParticle {
    /// Orbit angle in radians
    pub angle: f32,
    /// Orbit radius
    pub radius: f32,
    /// Angle advance per frame
    pub speed: f32,
    /// Current world-space position
    pub position: Vec3,
}

/// Trigger zone that switches the active period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portal {
    pub position: Vec3,
    /// Period the portal switches to
    pub target: TimePeriod,
    /// Spin around the portal's axis, radians
    pub spin: f32,
    pub particles: SmallVec<[PortalParticle; PORTAL_PARTICLES]>,
}

/// Level exit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    /// Trigger center
    pub position: Vec3,
    /// Spin around the vertical axis, radians
    pub spin: f32,
    /// Visual vertical offset; the trigger center does not move
    pub bob: f32,
}

impl Goal {
    /// Where the renderer should draw the goal
    pub fn display_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, self.bob, 0.0)
    }
}

/// Anything placed in a level
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Platform(Block),
    Obstacle(Block),
    Portal(Portal),
    Goal(Goal),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Platform(_) => EntityKind::Platform,
            Self::Obstacle(_) => EntityKind::Obstacle,
            Self::Portal(_) => EntityKind::Portal,
            Self::Goal(_) => EntityKind::Goal,
        }
    }

    /// World-space transform origin
    pub fn position(&self) -> Vec3 {
        match self {
            Self::Platform(block) | Self::Obstacle(block) => block.center,
            Self::Portal(portal) => portal.position,
            Self::Goal(goal) => goal.position,
        }
    }

    /// Collision box for solid entities; trigger zones have none
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Self::Platform(block) | Self::Obstacle(block) => Some(block.bounds()),
            Self::Portal(_) | Self::Goal(_) => None,
        }
    }

    /// Period tags for entities whose presence depends on the period
    pub fn periods(&self) -> Option<PeriodSet> {
        match self {
            Self::Platform(block) | Self::Obstacle(block) => Some(block.periods),
            Self::Portal(_) | Self::Goal(_) => None,
        }
    }

    /// Portals and the goal are visible in every period
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Platform(block) | Self::Obstacle(block) => block.visible,
            Self::Portal(_) | Self::Goal(_) => true,
        }
    }

    /// Set visibility; ignored for trigger zones
    pub fn set_visible(&mut self, visible: bool) {
        if let Self::Platform(block) | Self::Obstacle(block) = self {
            block.visible = visible;
        }
    }

    /// Visible and solid
    pub fn is_collidable(&self) -> bool {
        self.bounds().is_some() && self.is_visible()
    }
}
