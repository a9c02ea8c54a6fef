//! Game state and core simulation types
//!
//! Everything the tick mutates lives here and is passed around explicitly.

use std::collections::BTreeMap;

use glam::Vec2;

use super::body::{EntityId, HasWorldRect, WorldRectSource};
use super::camera::Camera;
use super::player::Player;
use super::rect::Rect;
use super::telegraph::PolePool;
use super::world_index::{CollisionRegistry, WorldIndex};
use crate::map::{SPAWN_MARKER, WorldMap};
use crate::{GameError, Settings};

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub player: Player,
    pub registry: CollisionRegistry,
    pub poles: PolePool,
    pub camera: Camera,
    /// Location markers from the map, by marker id
    pub markers: BTreeMap<u8, Vec<Vec2>>,
    /// Ticks since start
    pub time_ticks: u64,
}

impl GameState {
    /// Build a fresh game on `map` with the camera following the player
    pub fn new(map: &WorldMap, settings: &Settings) -> Result<Self, GameError> {
        let surfaces = WorldIndex::new(map.surface_blocks())?;
        let mut markers = map.markers();

        let spawn = match markers.get(&SPAWN_MARKER).and_then(|m| m.first()) {
            Some(&spawn) => spawn,
            None => {
                // Top-left corner of the map, one cell in
                let fallback = WorldMap::cell_rect(1, 1).center();
                log::warn!("map has no spawn marker, spawning at {}", fallback);
                markers.entry(SPAWN_MARKER).or_default().push(fallback);
                fallback
            }
        };

        log::info!(
            "new game: {} surface blocks, spawn at {}",
            surfaces.len(),
            spawn
        );

        let mut state = Self {
            player: Player::new(spawn)?,
            registry: CollisionRegistry::new(surfaces),
            poles: PolePool::default(),
            camera: Camera::new(
                settings.window_size(),
                settings.camera.player_box,
                settings.camera.parallax.clone(),
            ),
            markers,
            time_ticks: 0,
        };

        let (camera, entities) = state.split();
        camera.follow(EntityId::Player, &entities);
        Ok(state)
    }

    /// Borrow the camera mutably alongside a read-only view of the entities
    pub fn split(&mut self) -> (&mut Camera, Entities<'_>) {
        (
            &mut self.camera,
            Entities {
                player: &self.player,
                poles: &self.poles,
            },
        )
    }

    pub fn entities(&self) -> Entities<'_> {
        Entities {
            player: &self.player,
            poles: &self.poles,
        }
    }
}

/// Read-only view resolving entity handles to world rectangles
#[derive(Debug, Clone, Copy)]
pub struct Entities<'a> {
    pub player: &'a Player,
    pub poles: &'a PolePool,
}

impl WorldRectSource for Entities<'_> {
    fn world_rect_of(&self, id: EntityId) -> Option<Rect> {
        match id {
            EntityId::Player => Some(self.player.world_rect()),
            EntityId::Pole(slot) => self.poles.get(slot).map(|p| p.world_rect()),
        }
    }
}
