//! Wall column pass: grid DDA per screen column.

use glam::Vec2;

use crate::{
    renderer::Rgba,
    world::{Door, TileMap, TileValue, is_door},
};

/// Where a column's ray stopped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub row: i32,
    pub col: i32,
    pub tile: TileValue,
    /// 0 = crossed a vertical grid line (x step), 1 = horizontal (y step).
    pub side: u8,
    /// Distance along the ray.
    pub dist: f32,
    /// Fractional position along the face, door slide already removed.
    pub wall_x: f32,
    pub is_door: bool,
}

/// `|1/d|`, or a huge number for an axis the ray never crosses.
#[inline]
fn delta_dist(d: f32) -> f32 {
    if d == 0.0 { 1e30 } else { (1.0 / d).abs() }
}

/// March a unit-direction ray from `origin` until it hits a wall or a
/// closed part of a door. `None` when it leaves the map first.
pub fn cast_ray(map: &TileMap, origin: Vec2, dir: Vec2) -> Option<RayHit> {
    let (mut row, mut col) = TileMap::cell_of(origin);

    let delta_x = delta_dist(dir.x);
    let delta_y = delta_dist(dir.y);
    let (step_x, mut side_x) = if dir.x < 0.0 {
        (-1, (origin.x - col as f32) * delta_x)
    } else {
        (1, (col as f32 + 1.0 - origin.x) * delta_x)
    };
    let (step_y, mut side_y) = if dir.y < 0.0 {
        (-1, (origin.y - row as f32) * delta_y)
    } else {
        (1, (row as f32 + 1.0 - origin.y) * delta_y)
    };

    let max_steps = 2 * (map.width() + map.height()) + 4;
    for _ in 0..max_steps {
        let side = if side_x < side_y {
            side_x += delta_x;
            col += step_x;
            0
        } else {
            side_y += delta_y;
            row += step_y;
            1
        };

        let tile = map.tile(row, col)?;
        if tile == 0 {
            continue;
        }

        let dist = if side == 0 {
            side_x - delta_x
        } else {
            side_y - delta_y
        };
        let hit = origin + dir * dist;
        let local = if side == 0 { hit.y.fract_gl() } else { hit.x.fract_gl() };

        if is_door(tile) {
            let Some(door) = map.door_at(row, col) else {
                log::warn!("door tile ({row},{col}) has no door record");
                return None;
            };
            if !door.blocks_ray(local) {
                continue;
            }
            return Some(RayHit {
                row,
                col,
                tile,
                side,
                dist,
                wall_x: door_slide(local, door),
                is_door: true,
            });
        }

        return Some(RayHit {
            row,
            col,
            tile,
            side,
            dist,
            wall_x: local,
            is_door: false,
        });
    }
    None
}

#[inline]
fn door_slide(local: f32, door: &Door) -> f32 {
    (local - door.open_amount).max(0.0)
}

/// Helper on `f32` matching GLSL `fract` (always in `[0, 1)`).
trait FractGl {
    fn fract_gl(self) -> f32;
}

impl FractGl for f32 {
    #[inline]
    fn fract_gl(self) -> f32 {
        self - self.floor()
    }
}

/// Texture column for `hit`, mirrored so opposite faces read the same way.
pub fn texture_column(hit: &RayHit, dir: Vec2, tex_w: usize) -> usize {
    let mut x = ((hit.wall_x * tex_w as f32) as usize).min(tex_w.saturating_sub(1));
    if (hit.side == 0 && dir.x > 0.0) || (hit.side == 1 && dir.y < 0.0) {
        x = tex_w - x - 1;
    }
    x
}

/// `40 + shade × 215`, dimmed to 70 % on horizontal faces.
pub fn brightness(dist: f32, max_light_dist: f32, side: u8) -> f32 {
    let shade = 1.0 - (dist / max_light_dist.max(f32::EPSILON)).min(1.0);
    let b = 40.0 + shade * 215.0;
    if side == 1 { b * 0.7 } else { b }
}

/// Scale the RGB channels of `argb` by `brightness / 255`.
#[inline]
pub fn modulate(argb: Rgba, brightness: f32) -> Rgba {
    let k = (brightness / 255.0).clamp(0.0, 1.0);
    let ch = |shift: u32| (((argb >> shift) & 0xFF) as f32 * k) as u32;
    0xFF00_0000 | ch(16) << 16 | ch(8) << 8 | ch(0)
}
