//! Collision detection and response against static surfaces
//!
//! Broad phase: the world index narrows the blocks to those touching the
//! actor's box. Narrow phase: a probe segment runs from the actor's center to
//! each edge midpoint; a block clipping the probe is on that side. Several
//! sides can match in one tick (corners, deep penetration) and each one is
//! handled.

use glam::Vec2;

use super::body::CollisionResponder;
use super::point_mass::PointMass;
use super::rect::Rect;
use super::world_index::WorldIndex;

/// Which sides of an actor a block touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactSides {
    /// Block above (ceiling)
    pub top: bool,
    /// Block below (ground)
    pub bottom: bool,
    /// Block to the left
    pub left: bool,
    /// Block to the right
    pub right: bool,
}

impl ContactSides {
    pub const NONE: ContactSides = ContactSides {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };

    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }

    /// Union of two side sets
    pub fn merge(self, other: ContactSides) -> ContactSides {
        ContactSides {
            top: self.top || other.top,
            bottom: self.bottom || other.bottom,
            left: self.left || other.left,
            right: self.right || other.right,
        }
    }
}

/// Classify where `block` sits relative to `actor` (tested top, bottom, left, right)
pub fn classify(actor: &Rect, block: &Rect) -> ContactSides {
    let center = actor.center();
    let [top, bottom, left, right] = actor.edge_midpoints();
    ContactSides {
        top: block.clips_segment(center, top),
        bottom: block.clips_segment(center, bottom),
        left: block.clips_segment(left, center),
        right: block.clips_segment(right, center),
    }
}

/// Ceiling: stop rising, sit just below the block, drop any upward force
pub fn respond_top(pm: &mut PointMass, block: &Rect, half_height: f32) {
    pm.set_velocity_y(0.0);
    pm.set_position_y(block.bottom() + half_height);
    let fy = pm.force().y;
    if fy < 0.0 {
        pm.add_force(Vec2::new(0.0, -fy));
    }
}

/// Ground: stop falling, stand on the block, drop any downward force
pub fn respond_bottom(pm: &mut PointMass, block: &Rect, half_height: f32) {
    pm.set_velocity_y(0.0);
    pm.set_position_y(block.top() - half_height);
    let fy = pm.force().y;
    if fy > 0.0 {
        pm.add_force(Vec2::new(0.0, -fy));
    }
}

/// Wall on the left: stop moving left, only cancel force pushing further left
pub fn respond_left(pm: &mut PointMass) {
    if pm.velocity().x < 0.0 {
        pm.set_velocity_x(0.0);
    }
    let fx = pm.force().x;
    if fx < 0.0 {
        pm.add_force(Vec2::new(-fx, 0.0));
    }
}

/// Wall on the right: mirror of `respond_left`
pub fn respond_right(pm: &mut PointMass) {
    if pm.velocity().x > 0.0 {
        pm.set_velocity_x(0.0);
    }
    let fx = pm.force().x;
    if fx > 0.0 {
        pm.add_force(Vec2::new(-fx, 0.0));
    }
}

/// Horizontal ground friction opposing the current motion
pub fn ground_friction(pm: &PointMass, multiplier: f32) -> Vec2 {
    Vec2::new(-pm.velocity().x * multiplier, 0.0)
}

/// Run broad and narrow phase for one actor and let it respond.
///
/// Returns the union of contact sides for this tick.
pub fn resolve<R: CollisionResponder>(actor: &mut R, surfaces: &WorldIndex) -> ContactSides {
    let actor_rect = actor.world_rect();
    let mut all = ContactSides::NONE;

    for block in surfaces.query_collisions(&actor_rect) {
        // Classify against the box at the start of resolution so earlier snaps
        // this tick don't change which side later blocks are on.
        let sides = classify(&actor_rect, block.rect());
        if !sides.any() {
            continue;
        }
        log::debug!("contact {:?} with block at {}", sides, block.rect().pos);
        actor.on_surface_contact(block, sides);
        all = all.merge(sides);
    }

    actor.on_contacts_resolved(all);
    all
}
