//! Deadzone camera with per-layer parallax
//!
//! The camera keeps a world-space "player box" around the followed entity.
//! The entity may move freely inside it; once its center leaves the box the
//! box edges slide just far enough to contain it again. Screen coordinates
//! are the box center at the middle of the window, with each z-index layer
//! scaled by its parallax factor.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{EntityId, WorldRectSource};
use super::rect::Rect;
use crate::GameError;
use crate::consts::BASE_RESOLUTION;

/// The 1:1, no-parallax layer
pub const DEFAULT_Z_INDEX: i32 = 1;

/// z-index → 2D parallax scale. Lower z is closer and moves faster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxTable {
    layers: BTreeMap<i32, Vec2>,
}

impl Default for ParallaxTable {
    fn default() -> Self {
        let layers = [
            (-1, 2.0),
            (0, 1.5),
            (DEFAULT_Z_INDEX, 1.0),
            (2, 0.75),
            (3, 0.5),
            (4, 0.2),
        ]
        .into_iter()
        .map(|(z, s)| (z, Vec2::splat(s)))
        .collect();
        Self { layers }
    }
}

impl ParallaxTable {
    pub fn new(layers: impl IntoIterator<Item = (i32, Vec2)>) -> Self {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    /// Scale for `z_index`; an unknown layer is a configuration error
    pub fn scale(&self, z_index: i32) -> Result<Vec2, GameError> {
        self.layers.get(&z_index).copied().ok_or_else(|| {
            GameError::configuration(format!("no parallax layer for z-index {z_index}"))
        })
    }

    pub fn contains(&self, z_index: i32) -> bool {
        self.layers.contains_key(&z_index)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// 2D deadzone camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// World-space box the followed center must stay inside
    player_box: Rect,
    /// Non-owning: the entity may disappear without the camera knowing
    following: Option<EntityId>,
    parallax: ParallaxTable,
    /// Window size in pixels
    screen_size: Vec2,
}

impl Camera {
    pub fn new(screen_size: Vec2, player_box_size: Vec2, parallax: ParallaxTable) -> Self {
        Self {
            player_box: Rect::from_center(Vec2::ZERO, player_box_size),
            following: None,
            parallax,
            screen_size,
        }
    }

    /// Start following `id` and center the box on it right away
    pub fn follow(&mut self, id: EntityId, source: &impl WorldRectSource) {
        self.following = Some(id);
        match source.world_rect_of(id) {
            Some(rect) => self.center_on(rect.center()),
            None => log::warn!("camera told to follow {:?}, which does not exist", id),
        }
    }

    pub fn unfollow(&mut self) {
        self.following = None;
    }

    pub fn following(&self) -> Option<EntityId> {
        self.following
    }

    pub fn center_on(&mut self, point: Vec2) {
        self.player_box = Rect::from_center(point, self.player_box.size);
    }

    /// Slide the box so the followed center is inside it.
    ///
    /// Each edge moves independently and only as far as needed, so the point
    /// ends up on the boundary rather than in the middle.
    pub fn update(&mut self, source: &impl WorldRectSource) {
        let Some(id) = self.following else {
            return;
        };
        let Some(rect) = source.world_rect_of(id) else {
            log::debug!("followed entity {:?} is gone, camera holds still", id);
            return;
        };
        let c = rect.center();
        let b = &mut self.player_box;

        if c.x < b.left() {
            b.pos.x = c.x;
        } else if c.x > b.right() {
            b.pos.x = c.x - b.size.x;
        }

        if c.y < b.top() {
            b.pos.y = c.y;
        } else if c.y > b.bottom() {
            b.pos.y = c.y - b.size.y;
        }
    }

    pub fn resize(&mut self, screen_size: Vec2) {
        log::info!("camera resized to {}x{}", screen_size.x, screen_size.y);
        self.screen_size = screen_size;
    }

    pub fn player_box(&self) -> &Rect {
        &self.player_box
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    pub fn parallax(&self) -> &ParallaxTable {
        &self.parallax
    }

    /// Window pixels per world unit at the default layer
    #[inline]
    pub fn pixel_scale(&self) -> Vec2 {
        self.screen_size / BASE_RESOLUTION
    }

    /// Project a world point on layer `z_index` to screen space (unrounded)
    pub fn world_to_screen_point(&self, point: Vec2, z_index: i32) -> Result<Vec2, GameError> {
        let scale = self.parallax.scale(z_index)?;
        let offset = (point - self.player_box.center()) * scale * self.pixel_scale();
        Ok(offset + self.screen_size * 0.5)
    }

    /// Project a world rectangle on layer `z_index` to a screen rectangle.
    ///
    /// Parallax moves the rectangle, it does not resize it. The center is
    /// rounded so sprites land on whole pixels.
    pub fn world_to_screen(&self, rect: &Rect, z_index: i32) -> Result<Rect, GameError> {
        let center = self
            .world_to_screen_point(rect.center(), z_index)?
            .round();
        Ok(Rect::from_center(center, rect.size * self.pixel_scale()))
    }

    /// Inverse of `world_to_screen_point` on the default layer
    pub fn screen_to_world(&self, point: Vec2) -> Vec2 {
        (point - self.screen_size * 0.5) / self.pixel_scale() + self.player_box.center()
    }

    /// World rectangle visible on the default layer
    pub fn view_port(&self) -> Rect {
        Rect::from_center(
            self.player_box.center(),
            self.screen_size / self.pixel_scale(),
        )
    }
}
