//! Floor and ceiling, one screen column at a time.

use glam::Vec2;

use crate::{
    renderer::{FLAT_FLOOR, Scene, software::Software},
    world::{Texture, TileMap},
};

/// What the wall pass leaves for the plane pass in one column.
#[derive(Clone, Copy, Debug)]
pub struct PlaneColumn {
    pub col: usize,
    /// Unit ray direction of this column.
    pub dir: Vec2,
    /// First wall row (exclusive end of the ceiling).
    pub draw_start: usize,
    /// One past the last wall row (start of the floor).
    pub draw_end: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Plane {
    Floor,
    Ceiling,
}

pub fn draw_plane_column(sw: &mut Software, scene: &Scene<'_>, pc: PlaneColumn) {
    let h = sw.height as f32;

    if scene.textures.has_floor() {
        for y in pc.draw_end..sw.height {
            let denom = y as f32 / h - 0.5;
            if denom <= 0.0 {
                continue;
            }
            if let Some(px) = sample(scene, &pc, scene.player_height / denom, Plane::Floor) {
                sw.scratch[y * sw.width + pc.col] = px;
            }
        }
    } else {
        for y in pc.draw_end.max(sw.height / 2)..sw.height {
            sw.scratch[y * sw.width + pc.col] = FLAT_FLOOR;
        }
    }

    if scene.textures.has_ceiling() {
        for y in 0..pc.draw_start.min(sw.height) {
            let denom = 0.5 - y as f32 / h;
            if denom <= 0.0 {
                continue;
            }
            if let Some(px) = sample(scene, &pc, scene.player_height / denom, Plane::Ceiling) {
                sw.scratch[y * sw.width + pc.col] = px;
            }
        }
    }
}

/// Texel `row_dist` along this column's ray.
fn sample(scene: &Scene<'_>, pc: &PlaneColumn, row_dist: f32, plane: Plane) -> Option<u32> {
    let world = scene.camera.pos() + pc.dir * row_dist;
    let (row, col) = TileMap::cell_of(world);
    let tex = match plane {
        Plane::Floor => scene.textures.floor(scene.map.floor_texture(row, col)),
        Plane::Ceiling => scene.textures.ceiling(scene.map.ceiling_texture(row, col)),
    }?;
    Some(texel_at(tex, world))
}

#[inline]
fn texel_at(tex: &Texture, world: Vec2) -> u32 {
    let u = (world.x * tex.w as f32).floor() as i32;
    let v = (world.y * tex.h as f32).floor() as i32;
    tex.texel(u, v)
}
