//! What the game asks of a frame backend.
//!
//! *The simulation never touches a pixel buffer directly.*
//! Each frame it describes what is visible as a [`Scene`] and hands it to a
//! type that implements [`Renderer`]. Anything the simulation needs back
//! from the picture (the enemy under the crosshair) comes out as a
//! [`FrameReport`] instead of being applied during the draw.

use crate::{
    sim::{SpriteId, SpriteIndex},
    world::{Camera, TileMap, WorldTextures},
};

/// Pixel format of the software frame-buffer (0xAARRGGBB, alpha ignored).
pub type Rgba = u32;

/// Background left where nothing is drawn (40,40,40).
pub const CLEAR_COLOR: Rgba = 0xFF_28_28_28;
/// Floor fill used when no floor texture is loaded (100,100,100).
pub const FLAT_FLOOR: Rgba = 0xFF_64_64_64;

#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Everything one 3-D frame is made of.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub camera: Camera,
    pub map: &'a TileMap,
    pub textures: &'a WorldTextures,
    pub sprites: &'a SpriteIndex,
    /// Eye height above the floor in wall units.
    pub player_height: f32,
    /// Distance at which walls reach minimum brightness.
    pub max_light_dist: f32,
    /// Weapon range of a shot waiting for a target; `None` when not firing.
    pub aim_range: Option<f32>,
}

/// What the renderer learned while drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Nearest shootable sprite covering the centre column in range.
    pub aim_target: Option<SpriteId>,
}

/// Frame backend. Draws into its own buffer and lends it out in `end_frame`.
pub trait Renderer {
    /// Size the buffer to `width × height` and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Floor, ceiling, walls, then sprites back to front.
    fn draw_scene(&mut self, scene: &Scene<'_>) -> FrameReport;

    /// Solid rectangle, clipped to the frame.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba);

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba);

    /// Lend the finished buffer to `submit` once, e.g.
    /// `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

pub mod software;
