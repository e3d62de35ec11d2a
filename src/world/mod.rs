mod camera;
pub mod geometry;
pub mod texture;

pub use geometry::{
    Aabb, Door, EMPTY, Level, PickupSpawn, TileCoord, TileMap, TileValue, is_door,
};

pub use camera::{Camera, normalize_angle};

pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};

use std::collections::HashMap;

/// Textures a sprite can wear, resolved once at load time.
#[derive(Clone, Debug, Default)]
pub struct SpriteSkins {
    /// Indexed by `key_type − 1`.
    pub keys: [Option<TextureId>; 3],
    /// Indexed by `weapon slot − 1`.
    pub weapons: [Option<TextureId>; 3],
    /// `(animation frame, direction index)` → texture.
    pub enemy_frames: HashMap<(u32, u8), TextureId>,
}

/// Every texture the renderer samples, plus the slot tables that map
/// tile values and pickups onto bank ids.
///
/// A `None` slot means the file failed to load; draws using it are skipped.
#[derive(Debug, Default)]
pub struct WorldTextures {
    pub bank: TextureBank,
    pub walls: Vec<Option<TextureId>>,
    pub floors: Vec<Option<TextureId>>,
    pub ceilings: Vec<Option<TextureId>>,
    pub skins: SpriteSkins,
}

impl WorldTextures {
    /// Texture for a wall or door tile value.
    pub fn wall(&self, tile: TileValue) -> Option<&Texture> {
        let slot = (tile as usize).checked_sub(1)?;
        let id = (*self.walls.get(slot)?)?;
        self.bank.texture(id).ok()
    }

    /// Floor texture for a slot, falling back to slot 0.
    pub fn floor(&self, slot: usize) -> Option<&Texture> {
        Self::slot_or_first(&self.floors, slot).and_then(|id| self.bank.texture(id).ok())
    }

    /// Ceiling texture for a slot, falling back to slot 0.
    pub fn ceiling(&self, slot: usize) -> Option<&Texture> {
        Self::slot_or_first(&self.ceilings, slot).and_then(|id| self.bank.texture(id).ok())
    }

    pub fn has_floor(&self) -> bool {
        self.floors.iter().any(Option::is_some)
    }

    pub fn has_ceiling(&self) -> bool {
        self.ceilings.iter().any(Option::is_some)
    }

    fn slot_or_first(slots: &[Option<TextureId>], slot: usize) -> Option<TextureId> {
        slots
            .get(slot)
            .copied()
            .flatten()
            .or_else(|| slots.first().copied().flatten())
    }
}
