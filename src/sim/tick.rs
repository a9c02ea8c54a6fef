//! Fixed timestep simulation tick
//!
//! One call advances the game by one frame. Same state plus same input
//! always produces the same next state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Integrable;
use super::collision::{self, ContactSides};
use super::player::PlayerControls;
use super::state::GameState;
use super::world_index::Collidable;

/// Held actions a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Jump,
    Grapple,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub jump: bool,
    pub grapple: bool,
    /// Pointer position in screen pixels
    pub pointer: Option<Vec2>,
    /// Screen position of this tick's secondary click (pole placement)
    pub secondary_action: Option<Vec2>,
}

impl TickInput {
    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left,
            Action::MoveRight => self.move_right,
            Action::MoveUp => self.move_up,
            Action::MoveDown => self.move_down,
            Action::Jump => self.jump,
            Action::Grapple => self.grapple,
        }
    }
}

/// Advance the game state by one tick.
///
/// Returns the player's contact sides for this tick.
pub fn tick(state: &mut GameState, input: &TickInput) -> ContactSides {
    state.time_ticks += 1;

    let grapple_target = if input.grapple {
        input.pointer.map(|p| state.camera.screen_to_world(p))
    } else {
        None
    };
    let controls = PlayerControls {
        left: input.move_left,
        right: input.move_right,
        jump: input.jump,
        grapple_target,
    };

    state.player.apply_controls(&controls);
    let contacts = collision::resolve(
        &mut state.player,
        state.registry.index(Collidable::Surface),
    );
    state.player.integrate();

    if let Some(screen) = input.secondary_action {
        let point = state.camera.screen_to_world(screen);
        match state
            .poles
            .place(point, state.registry.index(Collidable::Surface))
        {
            Ok(Some(_)) => {}
            Ok(None) => log::info!("no surface to plant a pole below {}", point),
            Err(e) => log::warn!("pole not placed: {}", e),
        }
    }

    let (camera, entities) = state.split();
    camera.update(&entities);

    contacts
}
