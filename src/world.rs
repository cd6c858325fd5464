use std::time::Instant;

use crate::{
    collision::{groups::CollisionGroupManager, quadtree::QuadtreeConfig},
    config::WorldSettings,
    core::{
        bounds::BoundingBox,
        solid::Solid,
        tags::TagSet,
        types::{Axis, Precision, Vec2},
    },
    dynamics::{
        motion::Motion,
        resolver::{Movement, Resolver},
    },
    error::{ensure_finite, Result, SolidError},
    utils::{
        allocator::{Arena, SolidId},
        logging::{warn_if_frame_budget_exceeded, ScopedTimer},
        profiling::{PhaseTimer, TickProfiler},
    },
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

mod shared;

pub use shared::SharedSolidWorld;

/// Session context owning every solid and the collision groups indexing them.
pub struct SolidWorld {
    solids: Arena<Solid>,
    groups: CollisionGroupManager,
    settings: WorldSettings,
    profiler: TickProfiler,
}

impl Default for SolidWorld {
    fn default() -> Self {
        Self::with_valid_settings(WorldSettings::default())
    }
}

impl SolidWorld {
    pub fn new(settings: WorldSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::with_valid_settings(settings))
    }

    fn with_valid_settings(settings: WorldSettings) -> Self {
        let config = QuadtreeConfig {
            max_objects: settings.max_objects,
            max_depth: settings.max_depth,
        };
        Self {
            solids: Arena::new(),
            groups: CollisionGroupManager::new(
                settings.region.to_bounds(),
                config,
                settings.use_cache,
            ),
            settings,
            profiler: TickProfiler::default(),
        }
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Registers `solid` in the groups of its tags and returns its handle.
    pub fn add_solid(&mut self, solid: Solid) -> Result<SolidId> {
        let bounds = solid.bounds;
        ensure_finite("position", bounds.position.x, bounds.position.y)?;
        ensure_finite("size", bounds.width(), bounds.height())?;

        let tags = solid.tags;
        let id = self.solids.insert(solid);
        if let Some(stored) = self.solids.get_mut(id) {
            stored.id = id;
        }
        self.groups.add(id, &bounds, tags);
        Ok(id)
    }

    pub fn remove_solid(&mut self, id: SolidId) -> Result<Solid> {
        let solid = self.solids.remove(id).ok_or(SolidError::UnknownSolid(id))?;
        self.groups.remove_from_all(id);
        Ok(solid)
    }

    pub fn solid(&self, id: SolidId) -> Option<&Solid> {
        self.solids.get(id)
    }

    pub fn solids(&self) -> impl Iterator<Item = (SolidId, &Solid)> + '_ {
        self.solids.iter()
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    pub fn position(&self, id: SolidId) -> Option<Vec2> {
        self.solids.get(id).map(|solid| solid.bounds.position)
    }

    pub fn bounds(&self, id: SolidId) -> Option<BoundingBox> {
        self.solids.get(id).map(|solid| solid.bounds)
    }

    /// Joins the groups in `tags` the solid is not yet part of.
    pub fn add_tags(&mut self, id: SolidId, tags: impl Into<TagSet>) -> Result<()> {
        let solid = self.solid_mut(id)?;
        let added = tags.into().difference(solid.tags);
        solid.tags = solid.tags.union(added);
        let bounds = solid.bounds;
        if !added.is_empty() {
            self.groups.add(id, &bounds, added);
        }
        Ok(())
    }

    pub fn remove_tags(&mut self, id: SolidId, tags: impl Into<TagSet>) -> Result<()> {
        let tags = tags.into();
        let solid = self.solid_mut(id)?;
        solid.tags = solid.tags.difference(tags);
        self.groups.remove(id, tags);
        Ok(())
    }

    pub fn set_collides_with(&mut self, id: SolidId, tags: impl Into<TagSet>) -> Result<()> {
        self.solid_mut(id)?.collides_with = tags.into();
        Ok(())
    }

    pub fn set_static(&mut self, id: SolidId, is_static: bool) -> Result<()> {
        self.solid_mut(id)?.is_static = is_static;
        Ok(())
    }

    pub fn set_pusher(&mut self, id: SolidId, pusher: bool) -> Result<()> {
        self.solid_mut(id)?.pusher = pusher;
        Ok(())
    }

    pub fn set_precision(&mut self, id: SolidId, precision: Option<Precision>) -> Result<()> {
        self.solid_mut(id)?.precision = precision;
        Ok(())
    }

    /// Resizes a solid in place; the index picks the new size up at the next flush.
    pub fn set_size(&mut self, id: SolidId, width: f32, height: f32) -> Result<()> {
        ensure_finite("size", width, height)?;
        if width < 0.0 || height < 0.0 {
            return Err(SolidError::InvalidArgument(format!(
                "size must be non-negative, got ({width}, {height})"
            )));
        }
        let solid = self.solid_mut(id)?;
        solid.bounds.set_size(Vec2::new(width, height));
        let tags = solid.tags;
        self.groups.enqueue_reset(id, tags);
        Ok(())
    }

    pub fn set_motion(&mut self, id: SolidId, motion: Option<Motion>) -> Result<()> {
        self.solid_mut(id)?.motion = motion;
        Ok(())
    }

    pub fn motion_mut(&mut self, id: SolidId) -> Option<&mut Motion> {
        self.solids.get_mut(id).and_then(|solid| solid.motion.as_mut())
    }

    /// Whether `id` overlaps anything in the groups it collides with.
    pub fn collides(&mut self, id: SolidId) -> Result<bool> {
        let tags = self.solid_ref(id)?.collides_with;
        self.collides_with_tags(id, tags)
    }

    pub fn collides_with_tags(&mut self, id: SolidId, tags: impl Into<TagSet>) -> Result<bool> {
        let bounds = self.solid_ref(id)?.bounds;
        Ok(self.groups.collides(id, &bounds, tags.into(), &self.solids))
    }

    /// Solids overlapping `id` in the groups it collides with, sorted by handle.
    pub fn colliding(&mut self, id: SolidId) -> Result<Vec<SolidId>> {
        let tags = self.solid_ref(id)?.collides_with;
        self.colliding_with_tags(id, tags)
    }

    pub fn colliding_with_tags(
        &mut self,
        id: SolidId,
        tags: impl Into<TagSet>,
    ) -> Result<Vec<SolidId>> {
        let bounds = self.solid_ref(id)?.bounds;
        Ok(self
            .groups
            .query_collisions(id, &bounds, tags.into(), &self.solids))
    }

    pub fn query_region(&mut self, region: &BoundingBox, tags: impl Into<TagSet>) -> Vec<SolidId> {
        self.groups
            .query_region(region, tags.into(), None, &self.solids)
    }

    pub fn query_point(&mut self, point: Vec2, tags: impl Into<TagSet>) -> Vec<SolidId> {
        self.query_region(&BoundingBox::point(point), tags)
    }

    /// Queues `id` for re-indexing in its groups at the next flush.
    pub fn enqueue_reset(&mut self, id: SolidId) -> Result<()> {
        let tags = self.solid_ref(id)?.tags;
        self.groups.enqueue_reset(id, tags);
        Ok(())
    }

    /// Applies every queued re-index. Called once per tick by [`SolidWorld::step`].
    pub fn flush(&mut self) -> usize {
        self.groups.flush(&self.solids)
    }

    /// Moves `id` by `(dx, dy)` at its own precision.
    ///
    /// Returns `Ok(true)` only when the full displacement was applied.
    pub fn move_by(&mut self, id: SolidId, dx: f32, dy: f32) -> Result<bool> {
        Ok(self.move_by_detailed(id, Vec2::new(dx, dy), None)?.is_complete())
    }

    pub fn move_by_with_precision(
        &mut self,
        id: SolidId,
        dx: f32,
        dy: f32,
        precision: Precision,
    ) -> Result<bool> {
        Ok(self
            .move_by_detailed(id, Vec2::new(dx, dy), Some(precision))?
            .is_complete())
    }

    /// Like [`SolidWorld::move_by`], reporting per-axis outcome.
    ///
    /// Displacements longer than `max_step_displacement` are shortened first
    /// and reported as `clamped`.
    pub fn move_by_detailed(
        &mut self,
        id: SolidId,
        delta: Vec2,
        precision: Option<Precision>,
    ) -> Result<Movement> {
        ensure_finite("displacement", delta.x, delta.y)?;
        let (limited, clamped) = match self.settings.max_step_displacement {
            Some(limit) if delta.length() > limit => (delta.clamp_length_max(limit), true),
            _ => (delta, false),
        };
        if clamped {
            log::trace!("solid {id} displacement {delta:?} clamped to {limited:?}");
        }

        let mut movement = Resolver::new(
            &mut self.solids,
            &mut self.groups,
            &mut self.profiler,
            self.settings.default_precision,
        )
        .move_by(id, limited, precision)?;
        movement.requested = delta;
        movement.clamped = clamped;
        Ok(movement)
    }

    /// Teleports `id` without any collision checks.
    pub fn move_to(&mut self, id: SolidId, x: f32, y: f32) -> Result<()> {
        ensure_finite("position", x, y)?;
        let solid = self.solid_mut(id)?;
        solid.bounds.position = Vec2::new(x, y);
        let tags = solid.tags;
        self.groups.enqueue_reset(id, tags);
        Ok(())
    }

    /// Advances every solid with motion by `dt` seconds.
    ///
    /// The index is flushed exactly once, before any movement is resolved.
    /// Solids are then moved in handle order; a blocked axis loses its
    /// velocity.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SolidError::InvalidArgument(format!(
                "tick duration must be finite and non-negative, got {dt}"
            )));
        }
        let tick_start = Instant::now();
        let _timer = ScopedTimer::new("world::step");
        self.profiler.reset();
        self.profiler.solid_count = self.solids.len();

        {
            let _phase = PhaseTimer::new(&mut self.profiler.flush_time);
            self.profiler.resets_flushed = self.groups.flush(&self.solids);
        }

        let motion_start = Instant::now();
        let movers: Vec<SolidId> = self
            .solids
            .iter()
            .filter(|(_, solid)| solid.motion.is_some() && !solid.is_static)
            .map(|(id, _)| id)
            .collect();
        for id in movers {
            self.apply_gravity(id, dt);

            let displacement = self
                .solids
                .get(id)
                .and_then(|solid| solid.motion)
                .map(|motion| motion.displacement(dt))
                .unwrap_or_default();
            let movement = if displacement != Vec2::ZERO {
                Some(self.move_by_detailed(id, displacement, None)?)
            } else {
                None
            };

            if let Some(motion) = self.motion_mut(id) {
                if let Some(movement) = movement {
                    for axis in [Axis::X, Axis::Y] {
                        if movement.is_blocked(axis) {
                            motion.stop_axis(axis);
                        }
                    }
                }
                motion.apply_decay();
            }
        }
        self.profiler.motion_time += motion_start.elapsed();

        self.profiler.index_queries = self.groups.take_query_count();
        self.profiler.total_tick_time = tick_start.elapsed();
        self.profiler.report();
        warn_if_frame_budget_exceeded(self.profiler.total_tick_time, self.settings.frame_budget_ms);
        Ok(())
    }

    /// Grounded solids lose velocity into the ground; airborne ones accelerate.
    fn apply_gravity(&mut self, id: SolidId, dt: f32) {
        let Some(solid) = self.solids.get(id) else {
            return;
        };
        let Some(gravity) = solid.motion.and_then(|motion| motion.gravity) else {
            return;
        };
        let direction = gravity.direction.normalize_or_zero();
        if direction == Vec2::ZERO {
            return;
        }

        let probe = solid.bounds.translated(direction);
        let collides_with = solid.collides_with;
        let grounded = self
            .groups
            .collides(id, &probe, collides_with, &self.solids);

        let Some(motion) = self.motion_mut(id) else {
            return;
        };
        for axis in [Axis::X, Axis::Y] {
            let pull = axis.of(direction);
            if pull == 0.0 {
                continue;
            }
            if grounded {
                let velocity = axis.of(motion.velocity);
                if velocity == 0.0 || velocity.signum() == pull.signum() {
                    motion.stop_axis(axis);
                }
            } else {
                motion.accelerate_axis(axis, pull * gravity.force * dt, false);
            }
        }
    }

    /// Every overlapping pair `(a, b)` with `b` in a group `a` collides with.
    ///
    /// Reads the index as of the last flush. Pairs are normalised so that
    /// `a < b` and returned sorted.
    pub fn colliding_pairs(&self) -> Vec<(SolidId, SolidId)> {
        let _timer = ScopedTimer::new("world::colliding_pairs");
        let ids: Vec<SolidId> = self.solids.ids().collect();

        let pairs_of = |id: &SolidId| -> Vec<(SolidId, SolidId)> {
            let id = *id;
            let Some(solid) = self.solids.get(id) else {
                return Vec::new();
            };
            self.groups
                .snapshot_query(&solid.bounds, solid.collides_with, Some(id), &self.solids)
                .into_iter()
                .map(|other| if id < other { (id, other) } else { (other, id) })
                .collect()
        };

        #[cfg(feature = "parallel")]
        let mut pairs: Vec<(SolidId, SolidId)> = ids.par_iter().flat_map_iter(pairs_of).collect();
        #[cfg(not(feature = "parallel"))]
        let mut pairs: Vec<(SolidId, SolidId)> = ids.iter().flat_map(pairs_of).collect();

        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    pub fn groups(&self) -> &CollisionGroupManager {
        &self.groups
    }

    /// Counters from the last [`SolidWorld::step`], plus moves made since.
    pub fn profiler(&self) -> &TickProfiler {
        &self.profiler
    }

    /// Removes every solid and index.
    pub fn clear(&mut self) {
        self.solids = Arena::new();
        self.groups.clear();
        self.profiler.reset();
    }

    fn solid_ref(&self, id: SolidId) -> Result<&Solid> {
        self.solids.get(id).ok_or(SolidError::UnknownSolid(id))
    }

    fn solid_mut(&mut self, id: SolidId) -> Result<&mut Solid> {
        self.solids.get_mut(id).ok_or(SolidError::UnknownSolid(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handles_are_rejected() {
        let mut world = SolidWorld::default();
        let id = world.add_solid(Solid::default()).unwrap();
        world.remove_solid(id).unwrap();

        assert_eq!(world.move_by(id, 1.0, 0.0), Err(SolidError::UnknownSolid(id)));
        assert!(world.move_to(id, 0.0, 0.0).is_err());
        assert!(world.groups().tags_of(id).is_empty());
    }

    #[test]
    fn non_finite_displacement_is_an_invalid_argument() {
        let mut world = SolidWorld::default();
        let id = world.add_solid(Solid::default()).unwrap();
        assert!(matches!(
            world.move_by(id, f32::NAN, 0.0),
            Err(SolidError::InvalidArgument(_))
        ));
        assert!(world.step(-1.0).is_err());
    }

    #[test]
    fn clamped_moves_report_incomplete() {
        let settings = WorldSettings::default().with_max_step_displacement(10.0);
        let mut world = SolidWorld::new(settings).unwrap();
        let id = world.add_solid(Solid::default()).unwrap();

        let movement = world.move_by_detailed(id, Vec2::new(30.0, 0.0), None).unwrap();
        assert!(movement.clamped);
        assert!(!movement.is_complete());
        assert_eq!(movement.requested, Vec2::new(30.0, 0.0));
        assert_eq!(world.position(id), Some(Vec2::new(10.0, 0.0)));
    }
}
