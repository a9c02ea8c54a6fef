//! Game settings
//!
//! Fixed defaults, optionally overridden by a JSON file. Missing fields keep
//! their defaults so a settings file only needs the values it changes.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::GameError;
use crate::consts::{BASE_RESOLUTION, FPS};
use crate::input::KeyMap;
use crate::sim::camera::{DEFAULT_Z_INDEX, ParallaxTable};

/// Camera tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// World-space deadzone the player can move in before the camera follows
    pub player_box: Vec2,
    pub parallax: ParallaxTable,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            player_box: Vec2::new(320.0, 160.0),
            parallax: ParallaxTable::default(),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window size in pixels
    pub window_width: u32,
    pub window_height: u32,
    /// Target frame rate; one simulation tick per frame
    pub fps: u32,
    pub camera: CameraSettings,
    pub keys: KeyMap,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: BASE_RESOLUTION.x as u32,
            window_height: BASE_RESOLUTION.y as u32,
            fps: FPS,
            camera: CameraSettings::default(),
            keys: KeyMap::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json)
            .map_err(|e| GameError::configuration(format!("invalid settings: {e}")))
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GameError::configuration(format!("cannot serialize settings: {e}")))
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), GameError> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .map_err(|e| GameError::configuration(format!("cannot write {}: {e}", path.display())))?;
        log::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("{} ignored: {}", path.display(), e),
            },
            Err(e) => log::warn!("cannot read {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.window_width as f32, self.window_height as f32)
    }

    /// Reject settings the core cannot run with
    pub fn validate(&self) -> Result<(), GameError> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(GameError::configuration(format!(
                "window size {}x{} must be non-zero",
                self.window_width, self.window_height
            )));
        }
        if self.fps == 0 {
            return Err(GameError::configuration("fps must be non-zero"));
        }
        if !self.camera.parallax.contains(DEFAULT_Z_INDEX) {
            return Err(GameError::configuration(format!(
                "parallax table needs the 1:1 layer z-index {DEFAULT_Z_INDEX}"
            )));
        }
        if self.camera.parallax.scale(DEFAULT_Z_INDEX)? != Vec2::ONE {
            return Err(GameError::configuration(format!(
                "parallax z-index {DEFAULT_Z_INDEX} must scale by 1.0"
            )));
        }
        if self.camera.player_box.cmple(Vec2::ZERO).any() {
            return Err(GameError::configuration(format!(
                "camera player box {} must be positive",
                self.camera.player_box
            )));
        }
        Ok(())
    }
}
