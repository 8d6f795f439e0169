//! Math utilities
//!
//! The axis-aligned box every collider in the game is built from.

pub use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box, used for the player, platforms and obstacles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Box geometry is authored as center plus full size
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        Self::from_center_half_extents(center, size * 0.5)
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Height of the top face, where the player stands
    pub fn top(&self) -> f32 {
        self.max.y
    }

    /// Overlap test; boxes sharing a face are touching and count
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}
