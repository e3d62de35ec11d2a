//! Built-in weapon table.
//!
//! Ranges are not part of the table: they live in
//! [`EngineConfig`](crate::config::EngineConfig) so levels can tune them.

use super::WeaponId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponDef {
    pub id: WeaponId,
    /// Starting ammunition; `None` never runs out.
    pub ammo: Option<u32>,
    /// Miss chance at point blank is `1 / accuracy`.
    pub accuracy: f32,
    pub multiplier: u32,
    /// Seconds between two shots.
    pub cool_down: f32,
    pub alert_radius: f32,
    pub sound: &'static str,
}

impl WeaponDef {
    /// Ammo-consuming weapons alert nearby enemies when fired.
    #[inline]
    pub fn is_ranged(&self) -> bool {
        self.ammo.is_some()
    }
}

pub static WEAPONS: [WeaponDef; 3] = [
    WeaponDef {
        id: WeaponId::Knife,
        ammo: None,
        accuracy: 2.0,
        multiplier: 100,
        cool_down: 0.0,
        alert_radius: 8.0,
        sound: "knife",
    },
    WeaponDef {
        id: WeaponId::Pistol,
        ammo: Some(4),
        accuracy: 70.0,
        multiplier: 4,
        cool_down: 0.2,
        alert_radius: 16.0,
        sound: "pistol",
    },
    WeaponDef {
        id: WeaponId::Rifle,
        ammo: Some(6),
        accuracy: 90.0,
        multiplier: 6,
        cool_down: 0.5,
        alert_radius: 24.0,
        sound: "rifle",
    },
];

pub fn weapon_def(id: WeaponId) -> &'static WeaponDef {
    &WEAPONS[id.slot() as usize - 1]
}
