//! Phobos Jam - a grappling-hook platformer prototype
//!
//! Core modules:
//! - `sim`: Deterministic simulation (point mass physics, collisions, camera, player)
//! - `map`: World map import (bitmap bands → surface blocks and markers)
//! - `render`: Rendering seam, turns world state into screen-space draw calls
//! - `assets`: Sprite sheet layout
//! - `input`: Key/pointer events → per-tick input intents
//! - `ui`: Background message feed
//! - `settings`: Data-driven configuration

pub mod assets;
pub mod error;
pub mod input;
pub mod map;
pub mod render;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::GameError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Resolution the camera's pixel scale is measured against
    pub const BASE_RESOLUTION: Vec2 = Vec2::new(1280.0, 720.0);
    /// Target frames (= simulation ticks) per second
    pub const FPS: u32 = 60;

    /// Constant downward pull, world units / tick²
    pub const GRAVITY: Vec2 = Vec2::new(0.0, 10.0);

    /// Edge length of one surface block (one map pixel), world units
    pub const BLOCK_SIZE: f32 = 16.0;

    /// Player defaults - the player's box is one block
    pub const PLAYER_SIZE: Vec2 = Vec2::new(BLOCK_SIZE, BLOCK_SIZE);
    pub const PLAYER_MASS: f32 = 10.0;
    /// Walking force is only added below this horizontal speed
    pub const PLAYER_MAX_SPEED: f32 = 20.0;
    pub const WALKING_FORCE_MULTIPLIER: f32 = 20.0;
    /// Upward impulse injected on a grounded jump
    pub const JUMP_FORCE: Vec2 = Vec2::new(0.0, -400.0);
    pub const FRICTION_MULTIPLIER: f32 = 0.25;
    pub const AIR_RESIST_MULTIPLIER: f32 = 0.75;
    /// Grapple spring stiffness (Hooke's law)
    pub const SPRING_CONSTANT: f32 = 0.1;

    /// Telegraph pole defaults
    pub const TELEGRAPH_SIZE: Vec2 = Vec2::new(10.0, 300.0);
    pub const TELEGRAPH_CAPACITY: usize = 100;
}

/// Which axis of a 2D vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component of `v` along this axis
    #[inline]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// Mutable component of `v` along this axis
    #[inline]
    pub fn of_mut(self, v: &mut Vec2) -> &mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
        }
    }
}
