//! Decorative animation
//!
//! Purely visual motion driven by elapsed game time: spinning portals with
//! orbiting particles, a spinning and bobbing goal, and the player's glow pulse.
//! Nothing here touches positions that physics reads.

use chronoshift_core::entity::Entity;
use chronoshift_core::world::WorldState;
use glam::Vec3;

/// Portal spin per second, radians
pub const PORTAL_SPIN_RATE: f32 = 0.5;
/// Goal bob amplitude
pub const GOAL_BOB_HEIGHT: f32 = 0.3;
/// Vertical wobble of portal particles
pub const PARTICLE_WOBBLE: f32 = 0.5;

/// Resting glow opacity and pulse amplitude
const GLOW_BASE: f32 = 0.2;
const GLOW_PULSE: f32 = 0.1;

/// Advance every decorative channel to time `t` seconds
pub fn animate(world: &mut WorldState, t: f32) {
    for entity in world.entities_mut() {
        match entity {
            Entity::Portal(portal) => {
                portal.spin = t * PORTAL_SPIN_RATE;
                let center = portal.position;
                for particle in portal.particles.iter_mut() {
                    particle.angle += particle.speed;
                    let (sin, cos) = particle.angle.sin_cos();
                    particle.position = center
                        + Vec3::new(
                            cos * particle.radius,
                            (t * 2.0 + particle.angle).sin() * PARTICLE_WOBBLE,
                            sin * particle.radius,
                        );
                }
            }
            Entity::Goal(goal) => {
                goal.spin = t;
                goal.bob = (t * 2.0).sin() * GOAL_BOB_HEIGHT;
            }
            Entity::Platform(_) | Entity::Obstacle(_) => {}
        }
    }

    world.player_mut().glow_opacity = GLOW_BASE + (t * 3.0).sin() * GLOW_PULSE;
}
