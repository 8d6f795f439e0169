//! Read-only views handed to the renderer and HUD once per frame

use chronoshift_core::entity::{Entity, EntityKind};
use chronoshift_core::period::TimePeriod;
use chronoshift_core::world::{Player, WorldState};
use glam::Vec3;
use serde::Serialize;

use crate::session::SessionState;

/// Goal tint
pub const GOAL_COLOR: u32 = 0xFFD700;

/// Distance the camera trails behind the player along +z
const CAMERA_TRAIL: f32 = 15.0;

/// Third-person camera that trails the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraRig {
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 8.0, 15.0),
            target: Vec3::ZERO,
        }
    }
}

impl CameraRig {
    /// Track the player horizontally, keeping the current height
    pub fn follow(&mut self, player: Vec3) {
        self.position.x = player.x;
        self.position.z = player.z + CAMERA_TRAIL;
        self.target = player;
    }
}

/// A visible platform or obstacle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockView {
    pub kind: EntityKind,
    pub center: Vec3,
    pub size: Vec3,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalView {
    pub position: Vec3,
    pub target: TimePeriod,
    /// The target period's ambient tint
    pub color: u32,
    pub spin: f32,
    pub particles: Vec<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalView {
    /// Drawn position, including the bob offset
    pub position: Vec3,
    pub spin: f32,
    pub color: u32,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub state: SessionState,
    pub level: u32,
    pub score: u64,
    pub period: TimePeriod,
    pub period_label: &'static str,
    pub ambient_color: u32,
    pub fog_color: u32,
    pub player: Player,
    pub camera: CameraRig,
    /// Hidden blocks are left out
    pub blocks: Vec<BlockView>,
    pub portals: Vec<PortalView>,
    pub goal: Option<GoalView>,
}

impl FrameSnapshot {
    pub fn capture(world: &WorldState, state: SessionState, camera: CameraRig) -> Self {
        let info = world.period().info();
        let mut blocks = Vec::new();
        let mut portals = Vec::new();
        let mut goal = None;

        for entity in world.entities() {
            match entity {
                Entity::Platform(block) | Entity::Obstacle(block) if block.visible => {
                    blocks.push(BlockView {
                        kind: entity.kind(),
                        center: block.center,
                        size: block.size,
                        color: block.color,
                    });
                }
                Entity::Platform(_) | Entity::Obstacle(_) => {}
                Entity::Portal(portal) => portals.push(PortalView {
                    position: portal.position,
                    target: portal.target,
                    color: portal.target.info().ambient_color,
                    spin: portal.spin,
                    particles: portal.particles.iter().map(|particle| particle.position).collect(),
                }),
                Entity::Goal(g) => {
                    goal = Some(GoalView {
                        position: g.display_position(),
                        spin: g.spin,
                        color: GOAL_COLOR,
                    })
                }
            }
        }

        Self {
            state,
            level: world.level(),
            score: world.score(),
            period: world.period(),
            period_label: info.label,
            ambient_color: info.ambient_color,
            fog_color: info.fog_color,
            player: *world.player(),
            camera,
            blocks,
            portals,
            goal,
        }
    }
}

/// Values the HUD overlays display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub level: u32,
    pub period_label: &'static str,
    pub state: SessionState,
    /// Set once the game is over
    pub final_score: Option<u64>,
    /// Time left before the next level loads, while between levels
    pub transition_remaining_ms: Option<u64>,
}

impl HudSnapshot {
    pub fn capture(world: &WorldState, state: SessionState, transition_remaining_ms: Option<u64>) -> Self {
        Self {
            score: world.score(),
            level: world.level(),
            period_label: world.period().info().label,
            state,
            final_score: (state == SessionState::GameOver).then_some(world.score()),
            transition_remaining_ms,
        }
    }
}
