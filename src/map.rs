//! World map import
//!
//! A world map is a bitmap whose red channel encodes one cell per pixel:
//! - `0x00..=0x0F`: rock surface block
//! - `0xF0`: mock (test) surface block
//! - `0xA0..=0xA4`: location markers 0-4, marker 0 being the player spawn
//! - anything else: empty
//!
//! Cell (col, row) covers world rectangle `(col, row) * BLOCK_SIZE` with
//! size `BLOCK_SIZE`.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::GameError;
use crate::consts::BLOCK_SIZE;
use crate::sim::rect::Rect;
use crate::sim::world_index::{SurfaceBlock, SurfaceKind};

pub const ROCK_BAND: RangeInclusive<u8> = 0x00..=0x0F;
pub const MOCK_VALUE: u8 = 0xF0;
pub const MARKER_BAND: RangeInclusive<u8> = 0xA0..=0xA4;
/// Red value written for empty cells by the generator
pub const EMPTY_VALUE: u8 = 0xFF;

/// Marker id of the player spawn point
pub const SPAWN_MARKER: u8 = 0;

/// Decoded meaning of one map pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Surface(SurfaceKind),
    Marker(u8),
}

impl Cell {
    pub fn from_red(value: u8) -> Self {
        if ROCK_BAND.contains(&value) {
            Cell::Surface(SurfaceKind::Rock)
        } else if value == MOCK_VALUE {
            Cell::Surface(SurfaceKind::Mock)
        } else if MARKER_BAND.contains(&value) {
            Cell::Marker(value - MARKER_BAND.start())
        } else {
            Cell::Empty
        }
    }
}

/// A decoded world map
#[derive(Debug, Clone)]
pub struct WorldMap {
    width: u32,
    height: u32,
    /// Row-major
    cells: Vec<Cell>,
}

impl WorldMap {
    /// Decode a row-major red channel
    pub fn from_red_channel(width: u32, height: u32, red: &[u8]) -> Result<Self, GameError> {
        let expected = width as usize * height as usize;
        if red.len() != expected {
            return Err(GameError::asset(
                "world map",
                format!(
                    "{}x{} map needs {} pixels, got {}",
                    width,
                    height,
                    expected,
                    red.len()
                ),
            ));
        }
        let cells = red.iter().map(|&v| Cell::from_red(v)).collect();
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Load an RGB PNG. Other pixel formats break the asset contract.
    pub fn load_png(path: &Path) -> Result<Self, GameError> {
        let name = path.display().to_string();
        let image = image::open(path).map_err(|e| GameError::asset(&name, e.to_string()))?;
        let rgb = image.as_rgb8().ok_or_else(|| {
            GameError::asset(&name, format!("expected RGB pixels, got {:?}", image.color()))
        })?;
        log::info!("loaded world map {} ({}x{})", name, rgb.width(), rgb.height());

        let red: Vec<u8> = rgb.pixels().map(|p| p.0[0]).collect();
        Self::from_red_channel(rgb.width(), rgb.height(), &red)
    }

    /// Procedural terrain for running without a map asset.
    ///
    /// Rolling ground from a seeded random walk, a few floating ledges, and
    /// a spawn marker above the ground near the left edge.
    pub fn generate(seed: u64, width: u32, height: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let (w, h) = (width as usize, height as usize);
        let mut red = vec![EMPTY_VALUE; w * h];

        let min_ground = h / 2;
        let max_ground = h.saturating_sub(2).max(min_ground);
        let mut ground = (min_ground + max_ground) / 2;

        for col in 0..w {
            if col > 0 && rng.random_bool(0.4) {
                let step: i32 = rng.random_range(-1..=1);
                ground = (ground as i32 + step).clamp(min_ground as i32, max_ground as i32) as usize;
            }
            for row in ground..h {
                red[row * w + col] = 0x00;
            }

            // Ledges a few cells above the ground
            if col > 4 && rng.random_bool(0.08) && ground > 6 {
                let row = ground - rng.random_range(4..=6);
                let len = rng.random_range(2..=5).min(w - col);
                for c in col..col + len {
                    red[row * w + c] = 0x00;
                }
            }
        }

        if w > 2 && h > 0 {
            let spawn_col = 2;
            let spawn_row = (0..h)
                .find(|&row| red[row * w + spawn_col] != EMPTY_VALUE)
                .unwrap_or(h)
                .saturating_sub(2);
            red[spawn_row * w + spawn_col] = MARKER_BAND.start() + SPAWN_MARKER;
        }

        log::info!("generated {}x{} terrain from seed {}", width, height, seed);
        // Dimensions match by construction
        Self {
            width,
            height,
            cells: red.into_iter().map(Cell::from_red).collect(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell(&self, col: u32, row: u32) -> Option<Cell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells
            .get(row as usize * self.width as usize + col as usize)
            .copied()
    }

    /// World rectangle of a cell
    pub fn cell_rect(col: u32, row: u32) -> Rect {
        Rect::new(
            col as f32 * BLOCK_SIZE,
            row as f32 * BLOCK_SIZE,
            BLOCK_SIZE,
            BLOCK_SIZE,
        )
    }

    /// Surface blocks sorted by `(x, y)`, ready for the world index
    pub fn surface_blocks(&self) -> Vec<SurfaceBlock> {
        // Column-major walk yields (x, y) order directly
        let mut blocks = Vec::new();
        for col in 0..self.width {
            for row in 0..self.height {
                if let Some(Cell::Surface(kind)) = self.cell(col, row) {
                    blocks.push(SurfaceBlock::new(Self::cell_rect(col, row), kind));
                }
            }
        }
        blocks
    }

    /// World-space centers of every marker, by marker id
    pub fn markers(&self) -> BTreeMap<u8, Vec<Vec2>> {
        let mut markers: BTreeMap<u8, Vec<Vec2>> = BTreeMap::new();
        for row in 0..self.height {
            for col in 0..self.width {
                if let Some(Cell::Marker(id)) = self.cell(col, row) {
                    markers
                        .entry(id)
                        .or_default()
                        .push(Self::cell_rect(col, row).center());
                }
            }
        }
        markers
    }

    /// First spawn marker in row-major order
    pub fn spawn_point(&self) -> Option<Vec2> {
        self.markers()
            .remove(&SPAWN_MARKER)
            .and_then(|points| points.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world_index::WorldIndex;

    #[test]
    fn test_cell_bands() {
        assert_eq!(Cell::from_red(0x00), Cell::Surface(SurfaceKind::Rock));
        assert_eq!(Cell::from_red(0x0F), Cell::Surface(SurfaceKind::Rock));
        assert_eq!(Cell::from_red(0x10), Cell::Empty);
        assert_eq!(Cell::from_red(0xF0), Cell::Surface(SurfaceKind::Mock));
        assert_eq!(Cell::from_red(0xA0), Cell::Marker(0));
        assert_eq!(Cell::from_red(0xA4), Cell::Marker(4));
        assert_eq!(Cell::from_red(0xA5), Cell::Empty);
        assert_eq!(Cell::from_red(0xFF), Cell::Empty);
    }

    #[test]
    fn test_from_red_channel() {
        #[rustfmt::skip]
        let red = [
            0xFF, 0xA0, 0xFF,
            0xFF, 0xFF, 0xA2,
            0x00, 0xF0, 0x03,
        ];
        let map = WorldMap::from_red_channel(3, 3, &red).unwrap();

        let blocks = map.surface_blocks();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].kind, SurfaceKind::Mock);
        assert_eq!(*blocks[2].rect(), Rect::new(32.0, 32.0, 16.0, 16.0));
        // Sorted for the index
        assert!(WorldIndex::new(blocks).is_ok());

        assert_eq!(map.spawn_point(), Some(Vec2::new(24.0, 8.0)));
        assert_eq!(map.markers()[&2], vec![Vec2::new(40.0, 24.0)]);
    }

    #[test]
    fn test_from_red_channel_wrong_length() {
        let err = WorldMap::from_red_channel(4, 4, &[0; 15]).unwrap_err();
        assert!(matches!(err, GameError::Asset { .. }));
    }

    #[test]
    fn test_missing_png_is_asset_error() {
        let err = WorldMap::load_png(Path::new("does/not/exist.png")).unwrap_err();
        assert!(matches!(err, GameError::Asset { .. }));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = WorldMap::generate(7, 64, 32);
        let b = WorldMap::generate(7, 64, 32);
        assert_eq!(a.surface_blocks(), b.surface_blocks());
        assert!(!a.surface_blocks().is_empty());
    }

    #[test]
    fn test_generate_spawn_above_ground() {
        let map = WorldMap::generate(42, 64, 32);
        let spawn = map.spawn_point().unwrap();
        let index = WorldIndex::new(map.surface_blocks()).unwrap();
        assert!(index.block_at(spawn).is_none());
        // Ground somewhere below the spawn column
        let column = Rect::new(spawn.x, spawn.y, 0.0, 32.0 * BLOCK_SIZE);
        assert!(!index.query_range(&column).is_empty());
    }
}
