//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per frame, no dt
//! - Stable iteration order (sorted world index, pole slots by number)
//! - No rendering or platform dependencies

pub mod body;
pub mod camera;
pub mod collision;
pub mod player;
pub mod point_mass;
pub mod rect;
pub mod state;
pub mod telegraph;
pub mod tick;
pub mod world_index;

pub use body::{CollisionResponder, EntityId, HasWorldRect, Integrable, WorldRectSource};
pub use camera::{Camera, DEFAULT_Z_INDEX, ParallaxTable};
pub use collision::{ContactSides, resolve};
pub use player::{Facing, Player, PlayerControls, PlayerPose};
pub use point_mass::PointMass;
pub use rect::Rect;
pub use state::{Entities, GameState};
pub use telegraph::{PolePool, PoleSlot, TelegraphPole};
pub use tick::{Action, TickInput, tick};
pub use world_index::{Collidable, CollisionRegistry, SurfaceBlock, SurfaceKind, WorldIndex};
