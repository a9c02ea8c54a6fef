//! Telegraph poles
//!
//! Poles are placed with the secondary action and stand on the nearest
//! surface below the chosen point. They live in a fixed arena of slots that
//! are either unused or placed.

use glam::Vec2;

use super::body::HasWorldRect;
use super::rect::Rect;
use super::world_index::{SurfaceBlock, WorldIndex};
use crate::GameError;
use crate::consts::{TELEGRAPH_CAPACITY, TELEGRAPH_SIZE};

/// How far below the chosen point a supporting surface is searched for
pub const POLE_REACH: f32 = TELEGRAPH_SIZE.y;

/// A placed pole, positioned by its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelegraphPole {
    center: Vec2,
}

impl TelegraphPole {
    /// A pole standing on top of `block`, centered on it
    fn standing_on(block: &SurfaceBlock) -> Self {
        let rect = block.world_rect();
        Self {
            center: Vec2::new(rect.center().x, rect.top() - TELEGRAPH_SIZE.y / 2.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }
}

impl HasWorldRect for TelegraphPole {
    fn world_rect(&self) -> Rect {
        Rect::from_center(self.center, TELEGRAPH_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PoleSlot {
    #[default]
    Unused,
    Placed(TelegraphPole),
}

/// Fixed-capacity pole arena
#[derive(Debug, Clone)]
pub struct PolePool {
    slots: Vec<PoleSlot>,
}

impl Default for PolePool {
    fn default() -> Self {
        Self::with_capacity(TELEGRAPH_CAPACITY)
    }
}

impl PolePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![PoleSlot::Unused; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Place a pole on the surface below `point`.
    ///
    /// `Ok(None)` when there is no surface within reach; `CapacityExceeded`
    /// when every slot is taken.
    pub fn place(
        &mut self,
        point: Vec2,
        surfaces: &WorldIndex,
    ) -> Result<Option<usize>, GameError> {
        let Some(block) = surface_beneath(point, surfaces) else {
            log::debug!("no surface beneath {}, pole not placed", point);
            return Ok(None);
        };

        let slot = self
            .slots
            .iter()
            .position(|s| matches!(s, PoleSlot::Unused))
            .ok_or(GameError::CapacityExceeded {
                resource: "telegraph poles",
                limit: self.slots.len(),
            })?;

        let pole = TelegraphPole::standing_on(block);
        log::info!("telegraph pole {} placed at {}", slot, pole.center);
        self.slots[slot] = PoleSlot::Placed(pole);
        Ok(Some(slot))
    }

    pub fn get(&self, slot: usize) -> Option<&TelegraphPole> {
        match self.slots.get(slot) {
            Some(PoleSlot::Placed(pole)) => Some(pole),
            _ => None,
        }
    }

    /// Free a slot; returns the pole that was there
    pub fn remove(&mut self, slot: usize) -> Option<TelegraphPole> {
        let slot = self.slots.get_mut(slot)?;
        match std::mem::take(slot) {
            PoleSlot::Placed(pole) => Some(pole),
            PoleSlot::Unused => None,
        }
    }

    pub fn clear(&mut self) {
        self.slots.fill(PoleSlot::Unused);
    }

    /// Placed poles with their slot numbers
    pub fn placed(&self) -> impl Iterator<Item = (usize, &TelegraphPole)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| match s {
            PoleSlot::Placed(pole) => Some((i, pole)),
            PoleSlot::Unused => None,
        })
    }
}

/// The block with the highest top edge under `point`, within `POLE_REACH`.
/// A block containing the point counts.
fn surface_beneath(point: Vec2, surfaces: &WorldIndex) -> Option<&SurfaceBlock> {
    let column = Rect {
        pos: point,
        size: Vec2::new(0.0, POLE_REACH),
    };
    surfaces
        .query_range(&column)
        .into_iter()
        .filter(|b| b.world_rect().bottom() > point.y)
        .min_by(|a, b| a.world_rect().top().total_cmp(&b.world_rect().top()))
}
