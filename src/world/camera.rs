use glam::Vec2;

/// Eye of the player: tile-space position, yaw and horizontal FOV.
///
/// * Only **yaw** (heading) is simulated – there is no vertical look.
/// * The map's y axis grows south, so a growing yaw turns clockwise on screen.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: Vec2, // x,y in tile units
    yaw: f32,  // radians (0 = east, +π/2 = south)
    fov: f32,  // horizontal FoV (radians)
}

impl Camera {
    /// Camera at `pos` looking along `yaw` (radians, +y is south).
    pub fn new(pos: Vec2, yaw: f32, fov: f32) -> Self {
        Self { pos, yaw, fov }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    #[inline]
    pub fn half_fov(&self) -> f32 {
        self.fov * 0.5
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit view direction.
    #[inline(always)]
    pub fn forward(self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        Vec2::new(c, s)
    }

    /// Unit vector pointing to the camera's right (`yaw + π/2`).
    #[inline(always)]
    pub fn right(self) -> Vec2 {
        self.forward().perp()
    }

    /*──────────────────────────── per-column rays ──────────────────────────*/

    /// Angle of the ray cast through screen column `col` of a `w`-wide screen.
    ///
    /// ```text
    /// θ_r = yaw − fov/2 + col · fov / w
    /// ```
    #[inline]
    pub fn ray_angle(self, col: usize, w: usize) -> f32 {
        self.yaw - self.half_fov() + col as f32 * (self.fov / w as f32)
    }

    /// Angle of `p` relative to the view direction, in `(−π, π]`.
    #[inline]
    pub fn relative_angle(self, p: Vec2) -> f32 {
        let d = p - self.pos;
        normalize_angle(d.y.atan2(d.x) - self.yaw)
    }
}

/// Wrap an angle into `(−π, π]`.
pub fn normalize_angle(mut a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !a.is_finite() {
        return 0.0;
    }
    a = a.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
