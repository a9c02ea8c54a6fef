//! Player controller
//!
//! Each tick the controller turns input intents into forces on the player's
//! point mass, then the collision resolver calls back into the player to
//! respond to surface contacts. Grounded/airborne, grappling and facing are
//! recomputed every tick from input and contacts rather than kept as state.
//! The only carried-over collision fact is last tick's contact sides, which
//! block the walking force toward a wall.

use glam::Vec2;

use super::body::{CollisionResponder, HasWorldRect, Integrable};
use super::collision::{
    ContactSides, ground_friction, respond_bottom, respond_left, respond_right, respond_top,
};
use super::point_mass::PointMass;
use super::rect::Rect;
use super::world_index::SurfaceBlock;
use crate::GameError;
use crate::consts::*;

/// Horizontal speed above which the player counts as walking (animation)
pub const WALKING_ANIMATION_X_SPEED: f32 = 1.5;

/// What the player wants to do this tick, in world space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerControls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// World-space grapple anchor while grapple is held with a pointer
    pub grapple_target: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Per-tick derived view of the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    pub grounded: bool,
    pub grappling: bool,
    pub walking: bool,
    pub facing: Facing,
}

/// The player entity
#[derive(Debug, Clone)]
pub struct Player {
    point_mass: PointMass,
    size: Vec2,
    /// Controls applied this tick
    controls: PlayerControls,
    /// Union of contact sides from the previous resolution
    last_contacts: ContactSides,
}

impl Player {
    pub fn new(start: Vec2) -> Result<Self, GameError> {
        Ok(Self {
            point_mass: PointMass::new(start, PLAYER_MASS)?,
            size: PLAYER_SIZE,
            controls: PlayerControls::default(),
            last_contacts: ContactSides::NONE,
        })
    }

    /// Add this tick's controller forces: air resistance, walking, grapple
    /// spring, gravity (in that order).
    pub fn apply_controls(&mut self, controls: &PlayerControls) {
        self.controls = *controls;
        let pm = &mut self.point_mass;
        let v = pm.velocity();

        let mut walking = Vec2::ZERO;
        if controls.left
            && !self.last_contacts.left
            && (v.x >= 0.0 || v.x.abs() < PLAYER_MAX_SPEED)
        {
            walking.x -= 1.0;
        }
        if controls.right
            && !self.last_contacts.right
            && (v.x <= 0.0 || v.x.abs() < PLAYER_MAX_SPEED)
        {
            walking.x += 1.0;
        }

        pm.add_force(-v * AIR_RESIST_MULTIPLIER);
        pm.add_force(walking * WALKING_FORCE_MULTIPLIER);

        if let Some(target) = controls.grapple_target {
            let distance = target - pm.position();
            let spring = distance * SPRING_CONSTANT;
            log::debug!("grapple spring {} over distance {}", spring, distance);
            pm.add_force(spring);
        }

        pm.apply_gravity();
    }

    pub fn pose(&self) -> PlayerPose {
        let vx = self.point_mass.velocity().x;
        let facing = match (self.controls.left, self.controls.right) {
            (true, false) => Facing::Left,
            (false, true) => Facing::Right,
            _ if vx < 0.0 => Facing::Left,
            _ => Facing::Right,
        };
        PlayerPose {
            grounded: self.last_contacts.bottom,
            grappling: self.controls.grapple_target.is_some(),
            walking: vx.abs() > WALKING_ANIMATION_X_SPEED,
            facing,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn last_contacts(&self) -> ContactSides {
        self.last_contacts
    }

    pub fn position(&self) -> Vec2 {
        self.point_mass.position()
    }
}

impl HasWorldRect for Player {
    fn world_rect(&self) -> Rect {
        Rect::from_center(self.point_mass.position(), self.size)
    }
}

impl Integrable for Player {
    fn point_mass(&self) -> &PointMass {
        &self.point_mass
    }

    fn point_mass_mut(&mut self) -> &mut PointMass {
        &mut self.point_mass
    }
}

impl CollisionResponder for Player {
    fn on_surface_contact(&mut self, block: &SurfaceBlock, sides: ContactSides) {
        let half_height = self.size.y / 2.0;
        let pm = &mut self.point_mass;
        if sides.top {
            respond_top(pm, block.rect(), half_height);
        }
        if sides.bottom {
            respond_bottom(pm, block.rect(), half_height);
        }
        if sides.left {
            respond_left(pm);
        }
        if sides.right {
            respond_right(pm);
        }
    }

    fn on_contacts_resolved(&mut self, sides: ContactSides) {
        // Once per tick however many ground blocks we straddle
        if sides.bottom {
            // No room to jump with a ceiling on our head
            if self.controls.jump && !sides.top {
                self.point_mass.add_force(JUMP_FORCE);
            }
            let friction = ground_friction(&self.point_mass, FRICTION_MULTIPLIER);
            self.point_mass.add_force(friction);
            log::debug!("grounded, force now {}", self.point_mass.force());
        }
        self.last_contacts = sides;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::resolve;
    use crate::sim::world_index::{SurfaceKind, WorldIndex};

    fn ground_row(y: f32) -> WorldIndex {
        let blocks = (0..8)
            .map(|i| {
                SurfaceBlock::new(
                    Rect::new(i as f32 * BLOCK_SIZE, y, BLOCK_SIZE, BLOCK_SIZE),
                    SurfaceKind::Rock,
                )
            })
            .collect();
        WorldIndex::new(blocks).unwrap()
    }

    /// One controller + resolution step, stopping before integration
    fn step(player: &mut Player, index: &WorldIndex, controls: PlayerControls) -> ContactSides {
        player.apply_controls(&controls);
        resolve(player, index)
    }

    #[test]
    fn test_ground_contact_snaps_to_surface() {
        let index = ground_row(100.0);
        // Fell 5 units into the ground last tick: bottom edge at 103
        let mut player = Player::new(Vec2::new(40.0, 95.0)).unwrap();
        player.point_mass_mut().set_velocity_y(5.0);

        let contacts = step(&mut player, &index, PlayerControls::default());
        player.integrate();

        assert!(contacts.bottom);
        assert_eq!(player.point_mass().velocity().y, 0.0);
        assert_eq!(player.world_rect().bottom(), 100.0);
        assert!(player.pose().grounded);
    }

    #[test]
    fn test_resting_player_stays_grounded() {
        let index = ground_row(100.0);
        let mut player = Player::new(Vec2::new(40.0, 92.0)).unwrap();
        for _ in 0..30 {
            let contacts = step(&mut player, &index, PlayerControls::default());
            player.integrate();
            assert!(contacts.bottom);
        }
        assert_eq!(player.world_rect().bottom(), 100.0);
    }

    #[test]
    fn test_jump_from_ground() {
        let index = ground_row(100.0);
        let mut player = Player::new(Vec2::new(40.0, 92.0)).unwrap();
        let controls = PlayerControls {
            jump: true,
            ..Default::default()
        };

        let contacts = step(&mut player, &index, controls);
        assert!(contacts.bottom);
        // Gravity was cancelled by the ground, leaving exactly the jump impulse
        assert_eq!(player.point_mass().force(), JUMP_FORCE);

        player.integrate();
        assert!(player.point_mass().velocity().y < 0.0);
        assert!(player.world_rect().bottom() < 100.0);
    }

    #[test]
    fn test_jump_straddling_two_blocks_is_single_impulse() {
        let index = ground_row(100.0);
        // Center on the seam between blocks 1 and 2
        let mut player = Player::new(Vec2::new(32.0, 92.0)).unwrap();
        let controls = PlayerControls {
            jump: true,
            ..Default::default()
        };
        step(&mut player, &index, controls);
        assert_eq!(player.point_mass().force(), JUMP_FORCE);
    }

    #[test]
    fn test_no_jump_in_air() {
        let index = ground_row(100.0);
        let mut player = Player::new(Vec2::new(40.0, 20.0)).unwrap();
        let controls = PlayerControls {
            jump: true,
            ..Default::default()
        };
        let contacts = step(&mut player, &index, controls);
        assert!(!contacts.any());
        assert_eq!(player.point_mass().force(), GRAVITY);
    }

    #[test]
    fn test_wall_blocks_then_allows_backing_away() {
        // Wall block to the right, player overlapping it by 2 units
        let wall = SurfaceBlock::new(Rect::new(32.0, 80.0, 16.0, 16.0), SurfaceKind::Rock);
        let index = WorldIndex::new(vec![wall]).unwrap();
        let mut player = Player::new(Vec2::new(26.0, 88.0)).unwrap();
        player.point_mass_mut().set_velocity_x(3.0);

        let push_right = PlayerControls {
            right: true,
            ..Default::default()
        };
        let contacts = step(&mut player, &index, push_right);
        assert!(contacts.right);
        assert_eq!(player.point_mass().velocity().x, 0.0);
        assert_eq!(player.point_mass().force().x, 0.0);
        player.integrate();
        assert_eq!(player.point_mass().velocity().x, 0.0);

        // Still pressing right: no walking force at all while blocked
        player.apply_controls(&push_right);
        assert_eq!(player.point_mass().force().x, 0.0);
        resolve(&mut player, &index);
        player.integrate();

        // Reverse: leftward force survives the right-wall contact
        let back_off = PlayerControls {
            left: true,
            ..Default::default()
        };
        let contacts = step(&mut player, &index, back_off);
        assert!(contacts.right);
        assert_eq!(player.point_mass().force().x, -WALKING_FORCE_MULTIPLIER);
        player.integrate();
        assert!(player.point_mass().velocity().x < 0.0);
        assert_eq!(player.pose().facing, Facing::Left);
    }

    #[test]
    fn test_ground_friction_slows_sliding() {
        let index = ground_row(100.0);
        let mut player = Player::new(Vec2::new(40.0, 92.0)).unwrap();
        player.point_mass_mut().set_velocity_x(8.0);
        step(&mut player, &index, PlayerControls::default());
        // Air resistance and friction both oppose the motion
        let expected = -8.0 * AIR_RESIST_MULTIPLIER - 8.0 * FRICTION_MULTIPLIER;
        assert!((player.point_mass().force().x - expected).abs() < 1e-5);
    }

    #[test]
    fn test_grapple_spring_pulls_toward_target() {
        let mut player = Player::new(Vec2::new(0.0, 0.0)).unwrap();
        let controls = PlayerControls {
            grapple_target: Some(Vec2::new(100.0, -50.0)),
            ..Default::default()
        };
        player.apply_controls(&controls);
        let expected = Vec2::new(100.0, -50.0) * SPRING_CONSTANT + GRAVITY;
        assert!((player.point_mass().force() - expected).length() < 1e-5);
        assert!(player.pose().grappling);
    }

    #[test]
    fn test_walking_respects_max_speed() {
        let mut player = Player::new(Vec2::ZERO).unwrap();
        player.point_mass_mut().set_velocity_x(PLAYER_MAX_SPEED + 1.0);
        let controls = PlayerControls {
            right: true,
            ..Default::default()
        };
        player.apply_controls(&controls);
        // Only air resistance remains on x
        let expected = -(PLAYER_MAX_SPEED + 1.0) * AIR_RESIST_MULTIPLIER;
        assert!((player.point_mass().force().x - expected).abs() < 1e-5);
    }

    #[test]
    fn test_ceiling_cancels_jump() {
        // Ceiling block directly above, overlapping the player's head
        let ceiling = SurfaceBlock::new(Rect::new(32.0, 0.0, 16.0, 16.0), SurfaceKind::Rock);
        let index = WorldIndex::new(vec![ceiling]).unwrap();
        let mut player = Player::new(Vec2::new(40.0, 22.0)).unwrap();
        player.point_mass_mut().set_velocity_y(-30.0);

        let contacts = step(&mut player, &index, PlayerControls::default());
        assert!(contacts.top);
        assert_eq!(player.point_mass().velocity().y, 0.0);
        assert_eq!(player.position().y, 24.0);
        // Air resistance was pushing down (+22.5) plus gravity: kept
        assert!(player.point_mass().force().y > 0.0);
    }

    #[test]
    fn test_jump_blocked_by_touching_ceiling() {
        // One-block crawlspace: ceiling 68..84, floor 100..116
        let blocks = vec![
            SurfaceBlock::new(Rect::new(32.0, 68.0, 16.0, 16.0), SurfaceKind::Rock),
            SurfaceBlock::new(Rect::new(32.0, 100.0, 16.0, 16.0), SurfaceKind::Rock),
        ];
        let index = WorldIndex::new(blocks).unwrap();
        let mut player = Player::new(Vec2::new(40.0, 92.0)).unwrap();
        let controls = PlayerControls {
            jump: true,
            ..Default::default()
        };

        for _ in 0..3 {
            let contacts = step(&mut player, &index, controls);
            assert!(contacts.top && contacts.bottom);
            assert_eq!(player.point_mass().force().y, 0.0);
            player.integrate();
            assert_eq!(player.world_rect().top(), 84.0);
            assert_eq!(player.world_rect().bottom(), 100.0);
        }
    }

    #[test]
    fn test_walls_on_both_sides() {
        // Shaft exactly one block wide: walls at x 16..32 and 48..64
        let blocks = vec![
            SurfaceBlock::new(Rect::new(16.0, 84.0, 16.0, 16.0), SurfaceKind::Rock),
            SurfaceBlock::new(Rect::new(48.0, 84.0, 16.0, 16.0), SurfaceKind::Rock),
        ];
        let index = WorldIndex::new(blocks).unwrap();
        let mut player = Player::new(Vec2::new(40.0, 92.0)).unwrap();
        player.point_mass_mut().set_velocity_x(5.0);
        let right = PlayerControls {
            right: true,
            ..Default::default()
        };

        let contacts = step(&mut player, &index, right);
        assert!(contacts.left && contacts.right);
        assert!(!contacts.top && !contacts.bottom);
        assert_eq!(player.point_mass().velocity().x, 0.0);
        assert_eq!(player.point_mass().force().x, 0.0);
        player.integrate();
        assert_eq!(player.position().x, 40.0);

        // Both sides were blocked last tick: no walking force either way
        let left = PlayerControls {
            left: true,
            ..Default::default()
        };
        player.apply_controls(&left);
        assert_eq!(player.point_mass().force().x, 0.0);
    }
}
