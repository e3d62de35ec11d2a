use glam::Vec2;

use crate::{defs::Buttons, world::Aabb};

/// World-space position, one unit per tile edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Square collision footprint centred on [`Position`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Edge length in tiles.
    pub size: f32,
}

impl Body {
    #[inline]
    pub fn aabb(&self, at: Vec2) -> Aabb {
        Aabb::around(at, self.size * 0.5)
    }
}

/// Index of the entity's entry in the sprite index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(pub usize);

/// One frame of player input, already decoupled from the window backend.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    /// Keys currently down.
    pub held: Buttons,
    /// Keys that went down since the previous frame.
    pub pressed: Buttons,
    /// Horizontal mouse travel in pixels since the previous frame.
    pub mouse_dx: f32,
    /// Left button went down this frame.
    pub fire: bool,
}

impl InputFrame {
    #[inline]
    pub fn held(&self, b: Buttons) -> bool {
        self.held.contains(b)
    }

    #[inline]
    pub fn pressed(&self, b: Buttons) -> bool {
        self.pressed.contains(b)
    }
}
