//! Point-mass integrator
//!
//! Semi-implicit Euler over one fixed tick: forces accumulate during the
//! tick, `integrate` turns them into velocity and position and clears them.
//! There is no dt here; the caller's fixed-rate loop defines the tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::GRAVITY;
use crate::{Axis, GameError};

/// A particle with position, velocity and mass but no rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMass {
    position: Vec2,
    velocity: Vec2,
    /// Reset to zero at the end of every `integrate`
    force: Vec2,
    mass: f32,
    /// Speed cap; `None` is unbounded
    max_speed: Option<f32>,
    /// Component-wise 0 (rigid) or 1 (free)
    rigid_multiplier: Vec2,
}

impl PointMass {
    /// Fails with `InvalidArgument` unless `mass` is finite and strictly positive.
    pub fn new(position: Vec2, mass: f32) -> Result<Self, GameError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(GameError::InvalidArgument {
                name: "mass",
                value: mass,
            });
        }
        Ok(Self {
            position,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            mass,
            max_speed: None,
            rigid_multiplier: Vec2::ONE,
        })
    }

    /// Cap the speed (see `integrate` for the reject-the-step policy)
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = Some(max_speed.abs());
        self
    }

    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn apply_gravity(&mut self) {
        self.add_force(GRAVITY);
    }

    /// Advance one tick.
    ///
    /// If a speed cap is set and the new velocity would exceed it, the
    /// velocity change of this tick is discarded entirely rather than
    /// rescaled, so the direction of travel never jumps at the cap.
    pub fn integrate(&mut self) {
        log::debug!("integrating force {} on mass {}", self.force, self.mass);

        let force = self.force * self.rigid_multiplier;
        let acceleration = force / self.mass;
        let prev_velocity = self.velocity;
        self.velocity += acceleration;

        if let Some(max_speed) = self.max_speed {
            if self.velocity.length() > max_speed {
                self.velocity = prev_velocity;
            }
        }

        self.position += self.velocity;
        self.force = Vec2::ZERO;
    }

    pub fn reset_velocity(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Lock or free an axis. Locking also stops motion along it immediately.
    pub fn make_rigid_on_axis(&mut self, axis: Axis, rigid: bool) {
        *axis.of_mut(&mut self.rigid_multiplier) = if rigid { 0.0 } else { 1.0 };
        if rigid {
            *axis.of_mut(&mut self.velocity) = 0.0;
        }
    }

    pub fn is_rigid_on_axis(&self, axis: Axis) -> bool {
        axis.of(self.rigid_multiplier) == 0.0
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Force accumulated so far this tick
    #[inline]
    pub fn force(&self) -> Vec2 {
        self.force
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn max_speed(&self) -> Option<f32> {
        self.max_speed
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_position_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub fn set_position_y(&mut self, y: f32) {
        self.position.y = y;
    }

    pub fn set_velocity_x(&mut self, x: f32) {
        self.velocity.x = x;
    }

    pub fn set_velocity_y(&mut self, y: f32) {
        self.velocity.y = y;
    }
}
