//! Rendering seam
//!
//! The core never touches a graphics API. `draw_frame` walks the game state,
//! projects everything through the camera and hands screen-space rectangles
//! and lines to a `RenderSink`. A platform backend implements the sink;
//! `DrawList` just records the calls.

use glam::Vec2;

use crate::GameError;
use crate::consts::FPS;
use crate::sim::{
    Collidable, DEFAULT_Z_INDEX, Facing, GameState, HasWorldRect, Rect, SurfaceKind, TickInput,
};

/// Parallax layer of the star background
pub const STAR_Z_INDEX: i32 = 3;
/// Star tiles drawn on each side of the player, per axis
const STAR_TILE_SPAN: i32 = 3;

/// Walking frames per second
const WALKING_FRAME_RATE: u32 = 7;
const WALKING_FRAME_COUNT: u64 = 2;
const GRAPPLE_FRAME: usize = 2;

pub const ROCK_COLOR: [u8; 3] = [255, 125, 0];
pub const MOCK_COLOR: [u8; 3] = [255, 0, 255];
pub const POLE_COLOR: [u8; 3] = [211, 211, 211];
pub const GRAPPLE_COLOR: [u8; 3] = [255, 0, 0];
/// Player stand-in when the sprite sheet has no frames
pub const PLAYER_COLOR: [u8; 3] = [255, 255, 255];

/// What to put in a screen rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visual {
    Color([u8; 3]),
    /// A frame of the player sprite sheet
    Sprite { source: Rect, flip_x: bool },
    StarTile,
}

/// Backend drawing surface
pub trait RenderSink {
    fn fill(&mut self, screen: Rect, visual: Visual);
    fn line(&mut self, from: Vec2, to: Vec2, color: [u8; 3]);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Fill { screen: Rect, visual: Visual },
    Line { from: Vec2, to: Vec2, color: [u8; 3] },
}

/// Sink that records draw calls in order
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderSink for DrawList {
    fn fill(&mut self, screen: Rect, visual: Visual) {
        self.commands.push(DrawCommand::Fill { screen, visual });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: [u8; 3]) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }
}

/// Layout of the loaded art
#[derive(Debug, Clone)]
pub struct FrameAssets {
    /// Player sheet frames: walking 0 and 1, grappling 2
    pub player_frames: Vec<Rect>,
    /// Star tile size in pixels
    pub star_tile: Vec2,
}

/// Draw one frame back to front: stars, surfaces, poles, player, grapple line.
pub fn draw_frame(
    state: &GameState,
    input: &TickInput,
    assets: &FrameAssets,
    sink: &mut impl RenderSink,
) -> Result<(), GameError> {
    draw_stars(state, assets.star_tile, sink)?;

    let camera = &state.camera;
    let visible = state
        .registry
        .index(Collidable::Surface)
        .query_range(&camera.view_port());
    for block in visible {
        let color = match block.kind {
            SurfaceKind::Rock => ROCK_COLOR,
            SurfaceKind::Mock => MOCK_COLOR,
        };
        sink.fill(
            camera.world_to_screen(&block.world_rect(), DEFAULT_Z_INDEX)?,
            Visual::Color(color),
        );
    }

    for (_, pole) in state.poles.placed() {
        sink.fill(
            camera.world_to_screen(&pole.world_rect(), DEFAULT_Z_INDEX)?,
            Visual::Color(POLE_COLOR),
        );
    }

    let player_rect = state.player.world_rect();
    let pose = state.player.pose();
    let visual = match player_frame(state.time_ticks, pose.walking, pose.grappling, assets) {
        Some(source) => Visual::Sprite {
            source,
            flip_x: pose.facing == Facing::Left,
        },
        None => Visual::Color(PLAYER_COLOR),
    };
    sink.fill(camera.world_to_screen(&player_rect, DEFAULT_Z_INDEX)?, visual);

    if let (true, Some(pointer)) = (input.grapple, input.pointer) {
        let from = camera.world_to_screen_point(player_rect.center(), DEFAULT_Z_INDEX)?;
        sink.line(from, pointer, GRAPPLE_COLOR);
    }

    Ok(())
}

/// Tile the star background around the player on the star layer.
///
/// The layer moves at half speed, so tiles sit two tile widths apart in world
/// space to meet edge to edge on screen.
fn draw_stars(
    state: &GameState,
    tile: Vec2,
    sink: &mut impl RenderSink,
) -> Result<(), GameError> {
    if tile.cmple(Vec2::ZERO).any() {
        return Ok(());
    }
    let scale = state.camera.parallax().scale(STAR_Z_INDEX)?;
    let spacing = tile / scale;
    let first_x = (state.player.position().x * scale.x / tile.x).floor() as i32;

    for x in -STAR_TILE_SPAN..STAR_TILE_SPAN {
        for y in -STAR_TILE_SPAN..STAR_TILE_SPAN {
            let pos = Vec2::new((first_x + x) as f32, y as f32) * spacing;
            let world = Rect { pos, size: tile };
            sink.fill(
                state.camera.world_to_screen(&world, STAR_Z_INDEX)?,
                Visual::StarTile,
            );
        }
    }
    Ok(())
}

fn player_frame(ticks: u64, walking: bool, grappling: bool, assets: &FrameAssets) -> Option<Rect> {
    let index = if walking {
        let ticks_per_frame = u64::from((FPS / WALKING_FRAME_RATE).max(1));
        ((ticks / ticks_per_frame) % WALKING_FRAME_COUNT) as usize
    } else if grappling {
        GRAPPLE_FRAME
    } else {
        0
    };
    assets
        .player_frames
        .get(index)
        .or(assets.player_frames.first())
        .copied()
}
