//! quadsolid – axis-aligned collision groups and movement resolution.
//!
//! Solids are rectangles registered in tag-scoped quadtrees. Moves are
//! resolved against those groups at one of four precision tiers, and pusher
//! solids shove what stands in their way instead of stopping.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::Vec2;

pub use crate::collision::{
    cache::QueryCache,
    groups::CollisionGroupManager,
    quadtree::{Quadtree, QuadtreeConfig},
};
pub use crate::config::{RegionSettings, WorldSettings};
pub use crate::core::{
    bounds::{Bounded, BoundingBox, BoundsLookup, Edges},
    solid::{Solid, SolidBuilder},
    tags::{SolidTag, TagSet},
    types::{Anchor, Axis, HorizontalAnchor, Precision, VerticalAnchor},
};
pub use crate::dynamics::{
    motion::{Gravity, Motion},
    resolver::Movement,
};
pub use error::{Result, SolidError};
pub use utils::{allocator::SolidId, profiling::TickProfiler};
pub use world::{SharedSolidWorld, SolidWorld};

/// High-level convenience wrapper that owns a [`SolidWorld`].
pub struct SolidEngine {
    world: SolidWorld,
}

impl SolidEngine {
    /// Creates an engine with validated settings.
    pub fn new(settings: WorldSettings) -> Result<Self> {
        Ok(Self {
            world: SolidWorld::new(settings)?,
        })
    }

    /// Adds a solid and returns its generated [`SolidId`].
    pub fn add_solid(&mut self, solid: Solid) -> Result<SolidId> {
        self.world.add_solid(solid)
    }

    /// Advances every moving solid by the provided delta time.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        self.world.step(dt)
    }

    /// Moves a solid by `(dx, dy)`; `false` if it was stopped short.
    pub fn move_by(&mut self, id: SolidId, dx: f32, dy: f32) -> Result<bool> {
        self.world.move_by(id, dx, dy)
    }

    /// Teleports a solid, skipping collision checks.
    pub fn move_to(&mut self, id: SolidId, x: f32, y: f32) -> Result<()> {
        self.world.move_to(id, x, y)
    }

    /// Shared access to the underlying world.
    pub fn world(&self) -> &SolidWorld {
        &self.world
    }

    /// Mutable access to the underlying world.
    pub fn world_mut(&mut self) -> &mut SolidWorld {
        &mut self.world
    }

    /// Moves the world behind a lock for use from several threads.
    pub fn into_shared(self) -> SharedSolidWorld {
        SharedSolidWorld::new(self.world)
    }
}

impl Default for SolidEngine {
    fn default() -> Self {
        Self {
            world: SolidWorld::default(),
        }
    }
}
