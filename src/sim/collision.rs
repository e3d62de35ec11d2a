//! Axis-separated box movement against the tile grid and other bodies.
//!
//! Each axis is tried on its own: X first with the old Y, then Y with the
//! committed X. An axis commits when the tile under the leading edge can be
//! entered and the moved box overlaps none of the `blockers`. Sliding along
//! a wall falls out of this for free.

use glam::Vec2;

use crate::world::{Aabb, TileMap};

/// What the caller gets back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub pos: Vec2,
    pub blocked_x: bool,
    pub blocked_y: bool,
}

/// Move a box of half-extent `half` from `pos` by `delta`.
pub fn slide_move(map: &TileMap, pos: Vec2, delta: Vec2, half: f32, blockers: &[Aabb]) -> MoveResult {
    let mut out = MoveResult {
        pos,
        blocked_x: false,
        blocked_y: false,
    };

    /* ---------- X ------------------------------------------------------ */
    if delta.x != 0.0 {
        let new_x = out.pos.x + delta.x;
        let probe = Vec2::new(new_x + half.copysign(delta.x), out.pos.y);
        let cand = Vec2::new(new_x, out.pos.y);
        if can_enter(map, probe) && !touches(cand, half, blockers) {
            out.pos.x = new_x;
        } else {
            out.blocked_x = true;
        }
    }

    /* ---------- Y ------------------------------------------------------ */
    if delta.y != 0.0 {
        let new_y = out.pos.y + delta.y;
        let probe = Vec2::new(out.pos.x, new_y + half.copysign(delta.y));
        let cand = Vec2::new(out.pos.x, new_y);
        if can_enter(map, probe) && !touches(cand, half, blockers) {
            out.pos.y = new_y;
        } else {
            out.blocked_y = true;
        }
    }

    out
}

#[inline]
fn can_enter(map: &TileMap, p: Vec2) -> bool {
    let (r, c) = TileMap::cell_of(p);
    map.is_passable(r, c)
}

#[inline]
fn touches(center: Vec2, half: f32, blockers: &[Aabb]) -> bool {
    let me = Aabb::around(center, half);
    blockers.iter().any(|b| me.overlaps(b))
}
