//! Narrow capability traits for game entities
//!
//! Each entity implements only what the core consumes from it: anything
//! drawable or trackable has a world rectangle, dynamic bodies expose their
//! point mass, and bodies that react to terrain respond to surface contacts.

use serde::{Deserialize, Serialize};

use super::collision::ContactSides;
use super::point_mass::PointMass;
use super::rect::Rect;
use super::world_index::SurfaceBlock;

/// Non-owning handle to an entity in the game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Player,
    /// Telegraph pole arena slot
    Pole(usize),
}

/// Something with a world-space bounding box
pub trait HasWorldRect {
    fn world_rect(&self) -> Rect;
}

/// A body advanced by the point-mass integrator
pub trait Integrable {
    fn point_mass(&self) -> &PointMass;
    fn point_mass_mut(&mut self) -> &mut PointMass;

    /// Advance one tick
    fn integrate(&mut self) {
        self.point_mass_mut().integrate();
    }
}

/// A body that reacts to overlapping static surfaces
pub trait CollisionResponder: HasWorldRect + Integrable {
    /// Called once per overlapping block with the sides the block touches
    fn on_surface_contact(&mut self, block: &SurfaceBlock, sides: ContactSides);

    /// Called once per tick after every block was handled, with the union of sides
    fn on_contacts_resolved(&mut self, _sides: ContactSides) {}
}

/// Resolves entity handles to world rectangles; the camera follows through this
pub trait WorldRectSource {
    /// `None` when the handle no longer refers to a live entity
    fn world_rect_of(&self, id: EntityId) -> Option<Rect>;
}
