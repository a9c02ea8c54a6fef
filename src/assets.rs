//! Sprite sheet layout
//!
//! Animation sheets are a single row of equally sized frames.

use glam::Vec2;

use crate::GameError;
use crate::sim::Rect;

/// Source rectangles of each frame in a one-row sprite sheet, left to right.
///
/// The sheet must be exactly one frame tall and a whole number of frames wide.
pub fn sprite_frames(sheet_size: (u32, u32), frame_size: (u32, u32)) -> Result<Vec<Rect>, GameError> {
    let (sheet_w, sheet_h) = sheet_size;
    let (frame_w, frame_h) = frame_size;

    if frame_w == 0 || frame_h == 0 {
        return Err(GameError::configuration(format!(
            "sprite frame size {frame_w}x{frame_h} must be non-zero"
        )));
    }
    if sheet_h != frame_h {
        return Err(GameError::configuration(format!(
            "sprite sheet height {sheet_h} differs from frame height {frame_h}"
        )));
    }
    if sheet_w == 0 || sheet_w % frame_w != 0 {
        return Err(GameError::configuration(format!(
            "sprite sheet width {sheet_w} is not a multiple of frame width {frame_w}"
        )));
    }

    let size = Vec2::new(frame_w as f32, frame_h as f32);
    let frames = (0..sheet_w / frame_w)
        .map(|i| Rect {
            pos: Vec2::new((i * frame_w) as f32, 0.0),
            size,
        })
        .collect();
    Ok(frames)
}
