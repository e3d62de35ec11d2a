//! Billboard pass: painter's order plus the per-column wall z-test.

use crate::{
    renderer::{Scene, software::Software},
    sim::{Sprite, SpriteId},
    world::{Camera, Texture},
};

/// Screen footprint of one billboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedSprite {
    /// Euclidean distance from the camera.
    pub dist: f32,
    /// Horizontal centre on screen.
    pub screen_x: f32,
    pub width: f32,
    pub height: f32,
}

impl ProjectedSprite {
    #[inline]
    pub fn left(&self) -> f32 {
        self.screen_x - self.width * 0.5
    }

    #[inline]
    pub fn top(&self, screen_h: usize) -> f32 {
        (screen_h as f32 - self.height) * 0.5
    }

    /// Screen columns the quad covers, clipped to `[0, w)`.
    pub fn columns(&self, w: usize) -> std::ops::Range<usize> {
        let x0 = self.left().max(0.0) as usize;
        let x1 = (self.left() + self.width).clamp(0.0, w as f32) as usize;
        x0.min(x1)..x1
    }
}

/// One sprite column that survived the depth test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteColumn {
    pub id: SpriteId,
    pub col: usize,
    pub dist: f32,
}

/// Project a sprite centred at `pos` for a `w × h` screen. `None` when it is
/// outside the field of view or on top of the camera.
pub fn project(cam: Camera, sprite: &Sprite, tex: &Texture, w: usize, h: usize) -> Option<ProjectedSprite> {
    let dist = sprite.pos.distance(cam.pos());
    if dist < 1e-3 {
        return None;
    }
    let alpha = cam.relative_angle(sprite.pos);
    if alpha.abs() > cam.half_fov() {
        return None;
    }
    let height = h as f32 / dist;
    Some(ProjectedSprite {
        dist,
        screen_x: (alpha + cam.half_fov()) / cam.fov() * w as f32,
        width: height * tex.w as f32 / tex.h as f32,
        height,
    })
}

impl Software {
    /// Draw every active sprite far to near. Returns the nearest shootable
    /// sprite drawn over the centre column when `scene.aim_range` is set.
    pub(super) fn draw_sprites(&mut self, scene: &Scene<'_>) -> Option<SpriteId> {
        let cam = scene.camera;
        let aim_col = self.width / 2;
        let mut aim = None;

        for id in scene.sprites.render_order(cam.pos()) {
            let Some(sprite) = scene.sprites.get(id) else {
                continue;
            };
            let Some(tex) = sprite
                .texture
                .and_then(|t| scene.textures.bank.texture(t).ok())
            else {
                continue;
            };
            let Some(proj) = project(cam, sprite, tex, self.width, self.height) else {
                continue;
            };

            let cols = proj.columns(self.width);
            let in_sights = sprite.shootable
                && scene.aim_range.is_some_and(|range| proj.dist <= range)
                && cols.contains(&aim_col)
                && proj.dist < self.zbuffer[aim_col];
            if in_sights {
                // later sprites are nearer
                aim = Some(id);
            }

            self.rasterize(id, &proj, tex, cols);
        }
        aim
    }

    fn rasterize(&mut self, id: SpriteId, proj: &ProjectedSprite, tex: &Texture, cols: std::ops::Range<usize>) {
        let top = proj.top(self.height);
        let y0 = top.max(0.0) as usize;
        let y1 = (top + proj.height).clamp(0.0, self.height as f32) as usize;
        let v_step = tex.h as f32 / proj.height;

        for col in cols {
            if proj.dist >= self.zbuffer[col] {
                continue;
            }
            let u = ((col as f32 - proj.left()) / proj.width * tex.w as f32) as i32;
            let mut v = (y0 as f32 - top) * v_step;
            for y in y0..y1 {
                let texel = tex.texel(u, v as i32);
                v += v_step;
                if !Texture::is_transparent(texel) {
                    self.scratch[y * self.width + col] = texel;
                }
            }
            self.sprite_columns.push(SpriteColumn {
                id,
                col,
                dist: proj.dist,
            });
        }
    }

    /// Columns drawn by the last sprite pass.
    pub fn last_sprite_columns(&self) -> &[SpriteColumn] {
        &self.sprite_columns
    }
}
