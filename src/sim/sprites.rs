//! Billboards the compositor draws: enemies and pickups.
//!
//! The index is built once per level. Enemies come first, pickups after,
//! and an entry's [`SpriteId`] is its position in the list for the life of
//! the level. Acquired pickups are deactivated rather than removed.

use glam::Vec2;
use hecs::Entity;

use super::components::SpriteId;
use crate::{
    defs::{KeyKind, PickupKind, WeaponId},
    world::{PickupSpawn, SpriteSkins, TextureId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Enemy(Entity),
    Pickup(PickupKind),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub id: SpriteId,
    pub pos: Vec2,
    /// `None` when the image failed to load; such sprites are skipped.
    pub texture: Option<TextureId>,
    pub active: bool,
    /// Living enemies only; pickups and corpses cannot be aimed at.
    pub shootable: bool,
    pub kind: SpriteKind,
}

impl Sprite {
    #[inline]
    pub fn enemy(&self) -> Option<Entity> {
        match self.kind {
            SpriteKind::Enemy(e) => Some(e),
            SpriteKind::Pickup(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpriteIndex {
    sprites: Vec<Sprite>,
}

impl SpriteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pos: Vec2, texture: Option<TextureId>, kind: SpriteKind) -> SpriteId {
        let id = SpriteId(self.sprites.len());
        self.sprites.push(Sprite {
            id,
            pos,
            texture,
            active: true,
            shootable: matches!(kind, SpriteKind::Enemy(_)),
            kind,
        });
        id
    }

    /// Append one sprite per pickup spawn, textured from `skins`.
    pub fn push_pickups(&mut self, spawns: &[PickupSpawn], skins: &SpriteSkins) {
        for spawn in spawns {
            let tex = pickup_texture(spawn.kind, skins);
            self.push(spawn.center(), tex, SpriteKind::Pickup(spawn.kind));
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    #[inline]
    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id.0)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.sprites.iter_mut()
    }

    /// Entity behind an enemy sprite.
    #[inline]
    pub fn enemy_entity(&self, id: SpriteId) -> Option<Entity> {
        self.get(id).and_then(Sprite::enemy)
    }

    /// Active sprites sorted far to near from `viewer`.
    pub fn render_order(&self, viewer: Vec2) -> Vec<SpriteId> {
        let mut order: Vec<(f32, SpriteId)> = self
            .sprites
            .iter()
            .filter(|s| s.active)
            .map(|s| (s.pos.distance_squared(viewer), s.id))
            .collect();
        order.sort_by(|a, b| b.0.total_cmp(&a.0));
        order.into_iter().map(|(_, id)| id).collect()
    }
}

pub fn pickup_texture(kind: PickupKind, skins: &SpriteSkins) -> Option<TextureId> {
    match kind {
        PickupKind::Key(k) => skins.keys[key_slot(k)],
        PickupKind::Weapon(w) => skins.weapons[weapon_slot(w)],
    }
}

#[inline]
fn key_slot(k: KeyKind) -> usize {
    k.key_type() as usize - 1
}

#[inline]
fn weapon_slot(w: WeaponId) -> usize {
    w.slot() as usize - 1
}
