use crate::{
    renderer::{
        CLEAR_COLOR, FrameReport, Renderer, Rgba, Scene,
        software::{
            planes::{PlaneColumn, draw_plane_column},
            sprites::SpriteColumn,
            walls::{brightness, cast_ray, modulate, texture_column},
        },
    },
    world::normalize_angle,
};

/// Column raycaster writing into an owned ARGB buffer.
#[derive(Default)]
pub struct Software {
    pub scratch: Vec<Rgba>,
    /// Fish-eye corrected wall distance per column; `f32::MAX` where the ray escaped.
    pub zbuffer: Vec<f32>,
    pub(super) sprite_columns: Vec<SpriteColumn>,

    pub width: usize,
    pub height: usize,
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
            self.zbuffer.resize(w, f32::MAX);
        }
        self.scratch.fill(CLEAR_COLOR);
        self.zbuffer.fill(f32::MAX);
        self.sprite_columns.clear();
    }

    fn draw_scene(&mut self, scene: &Scene<'_>) -> FrameReport {
        if self.width == 0 || self.height == 0 {
            return FrameReport::default();
        }
        for col in 0..self.width {
            self.draw_column(scene, col);
        }
        let aim_target = self.draw_sprites(scene);
        log::trace!("frame drawn, aim {aim_target:?}");
        FrameReport { aim_target }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        let x0 = x.clamp(0, self.width as i32) as usize;
        let x1 = (x + w).clamp(0, self.width as i32) as usize;
        let y0 = y.clamp(0, self.height as i32) as usize;
        let y1 = (y + h).clamp(0, self.height as i32) as usize;
        for row in y0..y1 {
            self.scratch[row * self.width + x0..row * self.width + x1].fill(color);
        }
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, col: u32) {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x, y, col);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

impl Software {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(super) fn put(&mut self, x: i32, y: i32, col: Rgba) {
        if (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y) {
            self.scratch[y as usize * self.width + x as usize] = col;
        }
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.scratch[y * self.width + x]
    }

    /// Ray, wall slice, then the floor below and ceiling above it.
    fn draw_column(&mut self, scene: &Scene<'_>, col: usize) {
        let cam = scene.camera;
        let angle = cam.ray_angle(col, self.width);
        let (s, c) = angle.sin_cos();
        let dir = glam::Vec2::new(c, s);
        let cos_off = normalize_angle(angle - cam.yaw()).cos();

        let h = self.height as f32;
        let (draw_start, draw_end) = match cast_ray(scene.map, cam.pos(), dir) {
            Some(hit) => {
                let corrected = (hit.dist * cos_off).max(1e-3);
                self.zbuffer[col] = corrected;

                let line_h = h / corrected;
                let top = (h - line_h) * 0.5;
                let start = top.max(0.0) as usize;
                let end = ((top + line_h).min(h) as usize).max(start);

                if let Some(tex) = scene.textures.wall(hit.tile) {
                    let tex_x = texture_column(&hit, dir, tex.w) as i32;
                    let light = brightness(corrected, scene.max_light_dist, hit.side);
                    let step = tex.h as f32 / line_h;
                    let mut tex_pos = (start as f32 - top) * step;
                    for y in start..end {
                        let texel = tex.texel(tex_x, tex_pos as i32);
                        tex_pos += step;
                        self.scratch[y * self.width + col] = modulate(texel, light);
                    }
                }
                (start, end)
            }
            None => {
                self.zbuffer[col] = f32::MAX;
                let mid = self.height / 2;
                (mid, mid)
            }
        };

        draw_plane_column(
            self,
            scene,
            PlaneColumn {
                col,
                dir,
                draw_start,
                draw_end,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::{
        renderer::FLAT_FLOOR,
        sim::SpriteIndex,
        world::{Camera, TileMap, WorldTextures},
    };

    fn room() -> TileMap {
        let mut rows = vec![vec![1u8; 9]];
        for _ in 0..7 {
            let mut r = vec![0u8; 9];
            r[0] = 1;
            r[8] = 1;
            rows.push(r);
        }
        rows.push(vec![1u8; 9]);
        TileMap::new(rows)
    }

    fn render(map: &TileMap, cam: Camera, w: usize, h: usize) -> Software {
        render_with(map, cam, w, h, &WorldTextures::default())
    }

    fn render_with(map: &TileMap, cam: Camera, w: usize, h: usize, textures: &WorldTextures) -> Software {
        let sprites = SpriteIndex::new();
        let scene = Scene {
            camera: cam,
            map,
            textures,
            sprites: &sprites,
            player_height: 0.5,
            max_light_dist: 8.0,
            aim_range: None,
        };
        let mut sw = Software::new();
        sw.begin_frame(w, h);
        sw.draw_scene(&scene);
        sw
    }

    #[test]
    fn enclosed_room_fills_zbuffer() {
        let map = room();
        let sw = render(&map, Camera::new(Vec2::new(4.5, 4.5), 0.7, 60f32.to_radians()), 64, 48);
        assert!(sw.zbuffer.iter().all(|&z| z > 0.0 && z < 10.0));
    }

    #[test]
    fn facing_a_flat_wall_has_no_fisheye() {
        let map = room();
        // facing east, the wall at x = 8 is 3.5 away everywhere on screen
        let sw = render(&map, Camera::new(Vec2::new(4.5, 4.5), 0.0, 60f32.to_radians()), 80, 60);
        for &z in &sw.zbuffer {
            assert!((z - 3.5).abs() < 1e-3, "z = {z}");
        }
    }

    #[test]
    fn flat_wall_is_lit_evenly() {
        let mut textures = WorldTextures::default();
        let white = crate::world::Texture {
            name: "white".into(),
            w: 4,
            h: 4,
            pixels: vec![0xFFFF_FFFF; 16],
        };
        let id = textures.bank.insert("white", white).unwrap();
        textures.walls = vec![Some(id)];

        let map = room();
        let (w, h) = (80, 60);
        let sw = render_with(&map, Camera::new(Vec2::new(4.5, 4.5), 0.0, 60f32.to_radians()), w, h, &textures);
        let centre = sw.pixel(w / 2, h / 2);
        for col in 0..w {
            assert_eq!(sw.pixel(col, h / 2), centre, "column {col}");
        }
    }

    #[test]
    fn centred_view_is_symmetric() {
        let map = room();
        let w = 81;
        let sw = render(&map, Camera::new(Vec2::new(4.5, 4.5), 0.0, 60f32.to_radians()), w, 40);
        for c in 1..w / 2 {
            let l = sw.zbuffer[c];
            let r = sw.zbuffer[w - c];
            assert!((l - r).abs() < 1e-2, "column {c}: {l} vs {r}");
        }
    }

    #[test]
    fn escaped_rays_leave_max_depth_and_grey_floor() {
        let map = TileMap::new(vec![vec![0, 0, 0], vec![0, 0, 0]]);
        let sw = render(&map, Camera::new(Vec2::new(1.5, 1.0), 0.0, 60f32.to_radians()), 16, 12);
        assert!(sw.zbuffer.iter().all(|&z| z == f32::MAX));
        assert_eq!(sw.pixel(3, 11), FLAT_FLOOR);
        assert_eq!(sw.pixel(3, 0), CLEAR_COLOR);
    }

    #[test]
    fn fill_rect_and_line_clip() {
        let mut sw = Software::new();
        sw.begin_frame(10, 10);
        sw.fill_rect(-5, 8, 100, 100, 0xFF00_00FF);
        assert_eq!(sw.pixel(0, 9), 0xFF00_00FF);
        assert_eq!(sw.pixel(9, 8), 0xFF00_00FF);
        assert_eq!(sw.pixel(0, 7), CLEAR_COLOR);
        sw.draw_line(-3, -3, 20, 20, 0xFFFF_0000);
        assert_eq!(sw.pixel(5, 5), 0xFFFF_0000);
    }
}
