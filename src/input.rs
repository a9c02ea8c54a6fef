//! Input handling
//!
//! Platform events (key codes, pointer) come in between frames; once per
//! frame `InputState::snapshot` hands the simulation a `TickInput` and
//! clears the one-shot events.

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::tick::{Action, TickInput};

/// Raw platform event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(u32),
    KeyUp(u32),
    PointerMoved(Vec2),
    /// Primary button pressed at a screen position (grapple)
    PointerDown(Vec2),
    PointerUp,
    /// Secondary button released at a screen position (place a pole)
    SecondaryClick(Vec2),
    Quit,
}

/// Key code → action bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMap {
    bindings: BTreeMap<u32, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let bindings = [
            ('a', Action::MoveLeft),
            ('d', Action::MoveRight),
            ('w', Action::MoveUp),
            ('s', Action::MoveDown),
            (' ', Action::Jump),
            ('e', Action::Grapple),
        ]
        .into_iter()
        .map(|(key, action)| (key as u32, action))
        .collect();
        Self { bindings }
    }
}

impl KeyMap {
    pub fn action(&self, key: u32) -> Option<Action> {
        self.bindings.get(&key).copied()
    }

    pub fn bind(&mut self, key: u32, action: Action) {
        self.bindings.insert(key, action);
    }
}

/// Accumulated input between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: KeyMap,
    held: HashSet<Action>,
    pointer: Option<Vec2>,
    pointer_down: bool,
    secondary: Option<Vec2>,
    quit: bool,
}

impl InputState {
    pub fn new(keys: KeyMap) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                if let Some(action) = self.keys.action(key) {
                    log::debug!("{:?} held", action);
                    self.held.insert(action);
                }
            }
            InputEvent::KeyUp(key) => {
                if let Some(action) = self.keys.action(key) {
                    log::debug!("{:?} released", action);
                    self.held.remove(&action);
                }
            }
            InputEvent::PointerMoved(pos) => self.pointer = Some(pos),
            InputEvent::PointerDown(pos) => {
                self.pointer = Some(pos);
                self.pointer_down = true;
            }
            InputEvent::PointerUp => self.pointer_down = false,
            InputEvent::SecondaryClick(pos) => self.secondary = Some(pos),
            InputEvent::Quit => self.quit = true,
        }
    }

    pub fn is_quit(&self) -> bool {
        self.quit
    }

    /// This frame's intents; the secondary click is consumed
    pub fn snapshot(&mut self) -> TickInput {
        let held = |a: Action| self.held.contains(&a);
        let input = TickInput {
            move_left: held(Action::MoveLeft),
            move_right: held(Action::MoveRight),
            move_up: held(Action::MoveUp),
            move_down: held(Action::MoveDown),
            jump: held(Action::Jump),
            grapple: held(Action::Grapple) || self.pointer_down,
            pointer: self.pointer,
            secondary_action: self.secondary,
        };
        self.secondary = None;
        input
    }
}
