//! Per-player weapon state and the hitscan dice.

use rand::Rng;

use crate::{
    config::EngineConfig,
    defs::{WeaponDef, WeaponId, weapon_def},
};

/// Closest distance used by the accuracy falloff.
pub const MIN_FALLOFF_DIST: f32 = 1.0;
/// Past this distance every shot passes the accuracy roll.
pub const MAX_FALLOFF_DIST: f32 = 64.0;

/// A weapon the player owns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponRecord {
    pub def: &'static WeaponDef,
    /// Rounds left; `None` is a melee weapon that never runs dry.
    pub ammo: Option<u32>,
    pub range: f32,
}

impl WeaponRecord {
    pub fn new(id: WeaponId, cfg: &EngineConfig) -> Self {
        let def = weapon_def(id);
        Self {
            def,
            ammo: def.ammo,
            range: cfg.weapon_range(id),
        }
    }

    #[inline]
    pub fn id(&self) -> WeaponId {
        self.def.id
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo.is_none_or(|n| n > 0)
    }

    /// Take one round. Returns `false` (and changes nothing) when empty.
    pub fn consume(&mut self) -> bool {
        match &mut self.ammo {
            None => true,
            Some(0) => false,
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }

}

/// Divisor of the miss roll at `dist`: `accuracy` at point blank, `1` at
/// [`MAX_FALLOFF_DIST`] and beyond.
pub fn error_divisor(accuracy: f32, dist: f32) -> u32 {
    let d = dist.clamp(MIN_FALLOFF_DIST, MAX_FALLOFF_DIST);
    let t = (d - MIN_FALLOFF_DIST) / (MAX_FALLOFF_DIST - MIN_FALLOFF_DIST);
    let scaled = ((accuracy - 1.0) * (1.0 - t * t)).max(0.0) as u32;
    scaled + 1
}

/// The shot connects unless the roll lands on a multiple of the divisor.
/// A divisor of 1 always connects and draws nothing from `rng`.
pub fn hit_roll<R: Rng + ?Sized>(rng: &mut R, accuracy: f32, dist: f32) -> bool {
    match error_divisor(accuracy, dist) {
        1 => true,
        d => rng.next_u32() % d != 0,
    }
}

/// `(rand & 31) × multiplier`.
pub fn damage_roll<R: Rng + ?Sized>(rng: &mut R, multiplier: u32) -> i32 {
    ((rng.next_u32() & 31) * multiplier) as i32
}
