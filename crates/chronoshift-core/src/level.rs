//! Level Catalog
//!
//! Declarative layouts for every level: which platforms, obstacles and portals
//! exist and which periods each belongs to. Levels are rebuilt from the catalog
//! on every load, so a `Level` is immutable once built.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::entity::{Block, Entity, Goal, Portal, PortalParticle, PORTAL_PARTICLES};
use crate::period::{PeriodSet, TimePeriod};
use crate::{CoreError, CoreResult};

/// Highest level index the catalog can build
pub const MAX_LEVEL: u32 = 3;

/// Where every level's goal sits
pub const GOAL_POSITION: Vec3 = Vec3::new(18.0, 2.0, 0.0);

/// Inclusive lower and exclusive upper bound of level 3 platform heights
pub const LEVEL3_HEIGHT_RANGE: (f32, f32) = (2.0, 5.0);

const GROUND_COLOR: u32 = 0x1A1A2E;
const BLUE: u32 = 0x4A90E2;
const CYAN: u32 = 0x00FFFF;
const MAGENTA: u32 = 0xFF00FF;
const PURPLE: u32 = 0x9B59B6;
const RED: u32 = 0xFF6B6B;

/// Construction spec for a platform or obstacle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockSpec {
    pub center: Vec3,
    pub size: Vec3,
    pub periods: PeriodSet,
    pub color: u32,
}

impl BlockSpec {
    pub fn new(center: Vec3, size: Vec3, periods: PeriodSet, color: u32) -> Self {
        Self { center, size, periods, color }
    }

    /// The ground slab present in every level and every period
    pub fn ground() -> Self {
        Self::new(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 1.0, 20.0), PeriodSet::ALWAYS, GROUND_COLOR)
    }

    fn spawn(&self) -> Block {
        Block {
            center: self.center,
            size: self.size,
            periods: self.periods,
            color: self.color,
            visible: true,
        }
    }
}

/// Construction spec for a portal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortalSpec {
    pub position: Vec3,
    pub target: TimePeriod,
}

impl PortalSpec {
    pub fn new(position: Vec3, target: TimePeriod) -> Self {
        Self { position, target }
    }
}

/// A level layout. Platforms are ordered, with the ground first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    pub index: u32,
    pub platforms: Vec<BlockSpec>,
    pub obstacles: Vec<BlockSpec>,
    pub portals: Vec<PortalSpec>,
    pub goal: Vec3,
}

impl Level {
    /// Instantiate the layout as live entities, all visible until the
    /// visibility pass runs. Particle orbits are drawn from `rng`.
    pub fn spawn_entities<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Entity> {
        let mut entities = Vec::with_capacity(self.platforms.len() + self.obstacles.len() + self.portals.len() + 1);

        entities.extend(self.platforms.iter().map(|spec| Entity::Platform(spec.spawn())));
        entities.extend(self.obstacles.iter().map(|spec| Entity::Obstacle(spec.spawn())));

        for spec in &self.portals {
            let particles = (0..PORTAL_PARTICLES)
                .map(|_| PortalParticle {
                    angle: rng.gen_range(0.0..TAU),
                    radius: rng.gen_range(0.0..2.0),
                    speed: rng.gen_range(0.01..0.03),
                    position: spec.position,
                })
                .collect();

            entities.push(Entity::Portal(Portal {
                position: spec.position,
                target: spec.target,
                spin: 0.0,
                particles,
            }));
        }

        entities.push(Entity::Goal(Goal { position: self.goal, spin: 0.0, bob: 0.0 }));
        entities
    }
}

/// Builds levels by index
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    rng: StdRng,
}

impl LevelCatalog {
    /// Catalog seeded from OS entropy; level 3 differs per load
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Catalog with reproducible level 3 heights and particle orbits
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Whether `index` names a level in the catalog
    pub fn contains(index: u32) -> bool {
        (1..=MAX_LEVEL).contains(&index)
    }

    /// Random source shared with entity spawning
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Build the layout for `index`
    pub fn build_level(&mut self, index: u32) -> CoreResult<Level> {
        let mut level = Level {
            index,
            platforms: vec![BlockSpec::ground()],
            obstacles: Vec::new(),
            portals: Vec::new(),
            goal: GOAL_POSITION,
        };

        match index {
            1 => Self::fill_level1(&mut level),
            2 => Self::fill_level2(&mut level),
            3 => self.fill_level3(&mut level),
            _ => return Err(CoreError::UnknownLevel(index)),
        }

        log::debug!(
            "Built level {}: {} platforms, {} obstacles, {} portals",
            index,
            level.platforms.len(),
            level.obstacles.len(),
            level.portals.len()
        );
        Ok(level)
    }

    fn fill_level1(level: &mut Level) {
        let slab = Vec3::new(6.0, 0.5, 4.0);

        level.platforms.push(BlockSpec::new(Vec3::new(0.0, 3.0, 0.0), slab, PeriodSet::PAST | PeriodSet::PRESENT, BLUE));
        level.platforms.push(BlockSpec::new(Vec3::new(10.0, 5.0, 0.0), slab, PeriodSet::FUTURE, PURPLE));

        level.obstacles.push(BlockSpec::new(Vec3::new(5.0, 1.0, 0.0), Vec3::new(2.0, 4.0, 2.0), PeriodSet::PRESENT, RED));

        level.portals.extend([
            PortalSpec::new(Vec3::new(-5.0, 1.0, -5.0), TimePeriod::Past),
            PortalSpec::new(Vec3::new(0.0, 1.0, -5.0), TimePeriod::Present),
            PortalSpec::new(Vec3::new(5.0, 1.0, -5.0), TimePeriod::Future),
        ]);
    }

    fn fill_level2(level: &mut Level) {
        let slab = Vec3::new(4.0, 0.5, 4.0);

        level.platforms.push(BlockSpec::new(Vec3::new(-2.0, 2.0, 0.0), slab, PeriodSet::PAST, BLUE));
        level.platforms.push(BlockSpec::new(Vec3::new(3.0, 4.0, 0.0), slab, PeriodSet::PRESENT, CYAN));
        level.platforms.push(BlockSpec::new(Vec3::new(8.0, 6.0, 0.0), slab, PeriodSet::FUTURE, MAGENTA));

        level.obstacles.push(BlockSpec::new(Vec3::new(6.0, 1.0, 0.0), Vec3::new(2.0, 3.0, 2.0), PeriodSet::PRESENT, RED));
        level.obstacles.push(BlockSpec::new(Vec3::new(12.0, 1.0, 0.0), Vec3::new(2.0, 5.0, 2.0), PeriodSet::FUTURE, RED));

        level.portals.extend([
            PortalSpec::new(Vec3::new(-8.0, 1.0, -5.0), TimePeriod::Past),
            PortalSpec::new(Vec3::new(-3.0, 1.0, -5.0), TimePeriod::Present),
            PortalSpec::new(Vec3::new(2.0, 1.0, -5.0), TimePeriod::Future),
        ]);
    }

    fn fill_level3(&mut self, level: &mut Level) {
        let (low, high) = LEVEL3_HEIGHT_RANGE;

        // Stepping stones cycle past, present, future
        for i in 0..5u8 {
            let x = f32::from(i) * 4.0 - 8.0;
            let height = self.rng.gen_range(low..high);
            let period = TimePeriod::ALL[usize::from(i % 3)];
            level.platforms.push(BlockSpec::new(Vec3::new(x, height, 0.0), Vec3::new(3.0, 0.5, 3.0), period.into(), BLUE));
        }

        for i in 0..3u8 {
            let x = f32::from(i) * 5.0;
            level.obstacles.push(BlockSpec::new(Vec3::new(x, 1.0, 0.0), Vec3::new(2.0, 3.0, 2.0), PeriodSet::PRESENT, RED));
        }

        level.portals.extend([
            PortalSpec::new(Vec3::new(-10.0, 1.0, -6.0), TimePeriod::Past),
            PortalSpec::new(Vec3::new(-5.0, 1.0, -6.0), TimePeriod::Present),
            PortalSpec::new(Vec3::new(0.0, 1.0, -6.0), TimePeriod::Future),
        ]);
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::new()
    }
}
