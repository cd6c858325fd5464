//! Movement resolution.
//!
//! Turns a requested displacement into the displacement actually applied so
//! that a solid never ends overlapping another solid it collides with. The
//! [`Precision`] tier decides how many intermediate positions are checked:
//!
//! * `Low` checks the destination once and reverts the whole move on a hit.
//! * `Medium` checks the destination once; on a hit it walks the line in unit
//!   steps, moving both axes per step and splitting a blocked step per axis.
//! * `High` checks the swept box once; if anything lies in it, it walks the
//!   line checking each axis' unit step separately.
//! * `Highest` always performs that per-axis walk.
//!
//! Integer parts of the displacement are walked first, fractional remainders
//! are applied last. A blocked axis is frozen for the rest of the walk while
//! the other axis keeps going, which lets solids slide along walls.

use super::pusher::PushChain;
use crate::collision::groups::CollisionGroupManager;
use crate::core::{
    solid::Solid,
    types::{Axis, Precision, Vec2},
};
use crate::error::{ensure_finite, Result, SolidError};
use crate::utils::{allocator::Arena, allocator::SolidId, profiling::TickProfiler};

/// Outcome of a single `move_by`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    pub requested: Vec2,
    pub applied: Vec2,
    pub blocked_x: bool,
    pub blocked_y: bool,
    /// The request was shortened to the world's displacement limit.
    pub clamped: bool,
}

impl Movement {
    fn complete(delta: Vec2) -> Self {
        Self {
            requested: delta,
            applied: delta,
            blocked_x: false,
            blocked_y: false,
            clamped: false,
        }
    }

    fn immovable(delta: Vec2) -> Self {
        Self {
            requested: delta,
            applied: Vec2::ZERO,
            blocked_x: true,
            blocked_y: true,
            clamped: false,
        }
    }

    /// `true` when the full requested displacement was applied unobstructed.
    pub fn is_complete(&self) -> bool {
        !self.blocked_x && !self.blocked_y && !self.clamped
    }

    pub fn is_blocked(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.blocked_x,
            Axis::Y => self.blocked_y,
        }
    }
}

/// Per-axis freeze state of a walk.
#[derive(Debug, Default, Clone, Copy)]
struct Frozen {
    x: bool,
    y: bool,
}

impl Frozen {
    fn get(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    fn set(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.x = true,
            Axis::Y => self.y = true,
        }
    }
}

/// Resolves moves against the solids and groups of one world.
///
/// A resolver lives for a single top-level `move_by`; the rollback journal
/// it carries for pushes is empty again when that call returns.
pub struct Resolver<'w> {
    pub(super) solids: &'w mut Arena<Solid>,
    pub(super) groups: &'w mut CollisionGroupManager,
    pub(super) profiler: &'w mut TickProfiler,
    pub(super) journal: Vec<(SolidId, Vec2)>,
    default_precision: Precision,
}

impl<'w> Resolver<'w> {
    pub fn new(
        solids: &'w mut Arena<Solid>,
        groups: &'w mut CollisionGroupManager,
        profiler: &'w mut TickProfiler,
        default_precision: Precision,
    ) -> Self {
        Self {
            solids,
            groups,
            profiler,
            journal: Vec::new(),
            default_precision,
        }
    }

    /// Moves `id` by `delta`, returning what was actually applied.
    ///
    /// Static solids are left in place and reported as blocked on both axes.
    pub fn move_by(
        &mut self,
        id: SolidId,
        delta: Vec2,
        precision: Option<Precision>,
    ) -> Result<Movement> {
        ensure_finite("displacement", delta.x, delta.y)?;
        if !self.solids.contains(id) {
            return Err(SolidError::UnknownSolid(id));
        }

        let movement = self.resolve(id, delta, precision, None);
        self.journal.clear();
        self.groups.end_moves();
        self.profiler.moves_resolved += 1;
        if !movement.is_complete() {
            self.profiler.moves_blocked += 1;
        }
        Ok(movement)
    }

    pub(super) fn resolve(
        &mut self,
        id: SolidId,
        delta: Vec2,
        precision: Option<Precision>,
        chain: Option<&PushChain<'_>>,
    ) -> Movement {
        let Some(solid) = self.solids.get(id) else {
            return Movement::immovable(delta);
        };
        if solid.is_static {
            log::trace!("solid {id} is static; ignoring move by {delta:?}");
            return Movement::immovable(delta);
        }
        if delta == Vec2::ZERO {
            return Movement::complete(delta);
        }

        let precision = precision
            .or(solid.precision)
            .unwrap_or(self.default_precision);
        let start = solid.bounds.position;
        let tags = solid.tags;
        self.journal.push((id, start));
        self.groups.begin_move(id);

        let frozen = match precision {
            Precision::Low => {
                self.place(id, start + delta);
                if self.try_step(id, start, precision, chain) {
                    Frozen::default()
                } else {
                    Frozen {
                        x: delta.x != 0.0,
                        y: delta.y != 0.0,
                    }
                }
            }
            Precision::Medium => {
                self.place(id, start + delta);
                if self.try_step(id, start, precision, chain) {
                    Frozen::default()
                } else {
                    self.walk(id, start, delta, precision, chain)
                }
            }
            Precision::High => {
                if self.sweep_is_clear(id, delta) {
                    self.place(id, start + delta);
                    Frozen::default()
                } else {
                    self.walk(id, start, delta, precision, chain)
                }
            }
            Precision::Highest => self.walk(id, start, delta, precision, chain),
        };

        let end = self.position(id);
        if end != start {
            self.groups.enqueue_reset(id, tags);
        }
        log::trace!("solid {id} {precision:?} move {delta:?} applied {:?}", end - start);

        Movement {
            requested: delta,
            applied: end - start,
            blocked_x: frozen.x && delta.x != 0.0,
            blocked_y: frozen.y && delta.y != 0.0,
            clamped: false,
        }
    }

    /// Unit-step walk from `start` along `delta`.
    ///
    /// The dominant axis advances every step; the minor axis advances every
    /// `round(|major| / |minor|)` steps, with any units the schedule missed
    /// taken after the main walk.
    fn walk(
        &mut self,
        id: SolidId,
        start: Vec2,
        delta: Vec2,
        precision: Precision,
        chain: Option<&PushChain<'_>>,
    ) -> Frozen {
        self.place(id, start);

        let major = if delta.x.abs() >= delta.y.abs() {
            Axis::X
        } else {
            Axis::Y
        };
        let minor = major.other();
        let major_step = major.unit(major.of(delta).signum());
        let minor_step = minor.unit(minor.of(delta).signum());
        let major_units = major.of(delta).abs().trunc() as u64;
        let minor_units = minor.of(delta).abs().trunc() as u64;
        let minor_every = if minor_units > 0 {
            ((major.of(delta).abs() / minor.of(delta).abs()).round() as u64).max(1)
        } else {
            0
        };
        let split_axes = precision >= Precision::High;

        let mut offset = Vec2::ZERO;
        let mut frozen = Frozen::default();
        let mut minor_done = 0;

        for step in 0..major_units {
            let move_major = !frozen.get(major);
            let move_minor = !frozen.get(minor)
                && minor_done < minor_units
                && (step + 1) % minor_every == 0;

            if !move_major && (frozen.get(minor) || minor_done >= minor_units) {
                break;
            }

            if split_axes || !(move_major && move_minor) {
                if move_major && !self.advance(id, start, &mut offset, major_step, precision, chain) {
                    frozen.set(major);
                }
                if move_minor {
                    if self.advance(id, start, &mut offset, minor_step, precision, chain) {
                        minor_done += 1;
                    } else {
                        frozen.set(minor);
                    }
                }
                continue;
            }

            if self.advance(id, start, &mut offset, major_step + minor_step, precision, chain) {
                minor_done += 1;
                continue;
            }
            if !self.advance(id, start, &mut offset, major_step, precision, chain) {
                frozen.set(major);
            }
            if self.advance(id, start, &mut offset, minor_step, precision, chain) {
                minor_done += 1;
            } else {
                frozen.set(minor);
            }
        }

        while minor_done < minor_units && !frozen.get(minor) {
            if self.advance(id, start, &mut offset, minor_step, precision, chain) {
                minor_done += 1;
            } else {
                frozen.set(minor);
            }
        }

        for axis in [major, minor] {
            let whole = axis.of(delta).trunc();
            let fraction = axis.of(delta) - whole;
            if fraction == 0.0 || frozen.get(axis) {
                continue;
            }
            if !self.advance(id, start, &mut offset, axis.unit(fraction), precision, chain) {
                frozen.set(axis);
            }
        }

        frozen
    }

    /// Moves `id` to `start + offset + step`; keeps it there if free.
    fn advance(
        &mut self,
        id: SolidId,
        start: Vec2,
        offset: &mut Vec2,
        step: Vec2,
        precision: Precision,
        chain: Option<&PushChain<'_>>,
    ) -> bool {
        let previous = start + *offset;
        self.place(id, start + (*offset + step));
        if self.try_step(id, previous, precision, chain) {
            *offset += step;
            true
        } else {
            false
        }
    }

    /// Checks `id` at its current position, reverting to `previous` on a hit.
    ///
    /// Pushers try to shove their blockers first.
    fn try_step(
        &mut self,
        id: SolidId,
        previous: Vec2,
        precision: Precision,
        chain: Option<&PushChain<'_>>,
    ) -> bool {
        let Some(solid) = self.solids.get(id) else {
            return false;
        };
        let (bounds, collides_with, pusher) = (solid.bounds, solid.collides_with, solid.pusher);

        if pusher {
            let blockers = self
                .groups
                .query_collisions(id, &bounds, collides_with, &*self.solids);
            if blockers.is_empty() {
                return true;
            }
            return self.shove(id, previous, &blockers, precision, chain);
        }

        if self.groups.collides(id, &bounds, collides_with, &*self.solids) {
            self.place(id, previous);
            return false;
        }
        true
    }

    fn sweep_is_clear(&mut self, id: SolidId, delta: Vec2) -> bool {
        let Some(solid) = self.solids.get(id) else {
            return false;
        };
        let swept = solid.bounds.union(&solid.bounds.translated(delta));
        let collides_with = solid.collides_with;
        self.groups
            .query_region(&swept, collides_with, Some(id), &*self.solids)
            .is_empty()
    }

    pub(super) fn position(&self, id: SolidId) -> Vec2 {
        self.solids
            .get(id)
            .map(|solid| solid.bounds.position)
            .unwrap_or_default()
    }

    pub(super) fn place(&mut self, id: SolidId, position: Vec2) {
        if let Some(solid) = self.solids.get_mut(id) {
            solid.bounds.position = position;
        }
    }
}
