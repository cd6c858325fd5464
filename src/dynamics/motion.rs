//! Velocity and gravity for solids driven by the world tick.

use serde::{Deserialize, Serialize};

use crate::core::types::{Axis, Vec2};

/// Default velocity cap per axis, in units per second.
pub const DEFAULT_MAX_VELOCITY: Vec2 = Vec2::new(100.0, 100.0);

/// Default velocity lost per tick on axes that were not accelerated.
pub const DEFAULT_VELOCITY_DECAY: Vec2 = Vec2::new(10.0, 10.0);

/// Constant acceleration along `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gravity {
    pub force: f32,
    pub direction: Vec2,
}

impl Default for Gravity {
    fn default() -> Self {
        Self {
            force: 1000.0,
            direction: Vec2::Y,
        }
    }
}

/// Velocity state of a solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Motion {
    pub velocity: Vec2,
    pub max_velocity: Vec2,
    pub decay: Vec2,
    /// Speed an axis jumps to when accelerated from rest.
    pub base_velocity: Vec2,
    /// Accelerating against the current direction first stops the axis.
    pub quick_turn_around: bool,
    pub gravity: Option<Gravity>,
    #[serde(skip)]
    accelerated: [bool; 2],
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            max_velocity: DEFAULT_MAX_VELOCITY,
            decay: DEFAULT_VELOCITY_DECAY,
            base_velocity: Vec2::ZERO,
            quick_turn_around: false,
            gravity: None,
            accelerated: [false; 2],
        }
    }
}

impl Motion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds gravity; axes it acts on lose their cap and their decay.
    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        for axis in [Axis::X, Axis::Y] {
            if axis.of(gravity.direction) != 0.0 {
                set_axis(&mut self.max_velocity, axis, f32::INFINITY);
                set_axis(&mut self.decay, axis, 0.0);
            }
        }
        self.gravity = Some(gravity);
        self
    }

    pub fn with_max_velocity(mut self, max_velocity: Vec2) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    pub fn with_decay(mut self, decay: Vec2) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_quick_turn_around(mut self, enabled: bool) -> Self {
        self.quick_turn_around = enabled;
        self
    }

    /// Increases velocity by `amount`, clamped to `max_velocity`.
    pub fn accelerate(&mut self, amount: Vec2) {
        for axis in [Axis::X, Axis::Y] {
            if axis.of(amount) != 0.0 {
                self.accelerate_axis(axis, axis.of(amount), self.quick_turn_around);
            }
        }
    }

    pub(crate) fn accelerate_axis(&mut self, axis: Axis, amount: f32, quick_turn_around: bool) {
        let mut velocity = axis.of(self.velocity);
        if quick_turn_around && velocity != 0.0 && velocity.signum() != amount.signum() {
            velocity = 0.0;
        }
        if velocity == 0.0 {
            velocity = axis.of(self.base_velocity) * amount.signum();
        }
        let max = axis.of(self.max_velocity);
        velocity = (velocity + amount).clamp(-max, max);
        set_axis(&mut self.velocity, axis, velocity);
        self.accelerated[axis_index(axis)] = true;
    }

    pub fn stop_axis(&mut self, axis: Axis) {
        set_axis(&mut self.velocity, axis, 0.0);
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != Vec2::ZERO
    }

    pub fn displacement(&self, dt: f32) -> Vec2 {
        self.velocity * dt
    }

    /// Slows every axis that was not accelerated since the last call, then
    /// clears the acceleration marks.
    pub fn apply_decay(&mut self) {
        for axis in [Axis::X, Axis::Y] {
            let velocity = axis.of(self.velocity);
            if velocity == 0.0 || self.accelerated[axis_index(axis)] {
                continue;
            }
            let decay = axis.of(self.decay);
            let slowed = if velocity > 0.0 {
                (velocity - decay).max(0.0)
            } else {
                (velocity + decay).min(0.0)
            };
            set_axis(&mut self.velocity, axis, slowed);
        }
        self.accelerated = [false; 2];
    }
}

fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
    }
}

fn set_axis(v: &mut Vec2, axis: Axis, value: f32) {
    match axis {
        Axis::X => v.x = value,
        Axis::Y => v.y = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn acceleration_is_clamped() {
        let mut motion = Motion::new();
        motion.accelerate(Vec2::new(250.0, -30.0));
        assert_relative_eq!(motion.velocity.x, 100.0);
        assert_relative_eq!(motion.velocity.y, -30.0);
    }

    #[test]
    fn decay_skips_accelerated_axes_once() {
        let mut motion = Motion::new();
        motion.accelerate(Vec2::new(50.0, 0.0));
        motion.apply_decay();
        assert_relative_eq!(motion.velocity.x, 50.0);
        motion.apply_decay();
        assert_relative_eq!(motion.velocity.x, 40.0);
    }

    #[test]
    fn quick_turn_around_drops_opposing_velocity() {
        let mut motion = Motion::new().with_quick_turn_around(true);
        motion.accelerate(Vec2::new(60.0, 0.0));
        motion.accelerate(Vec2::new(-5.0, 0.0));
        assert_relative_eq!(motion.velocity.x, -5.0);
    }

    #[test]
    fn gravity_uncaps_its_axis() {
        let motion = Motion::new().with_gravity(Gravity::default());
        assert!(motion.max_velocity.y.is_infinite());
        assert_eq!(motion.decay.y, 0.0);
        assert_eq!(motion.max_velocity.x, DEFAULT_MAX_VELOCITY.x);
    }
}
