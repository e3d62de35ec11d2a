pub mod flags;
pub mod weapons;

pub use self::{
    flags::{Buttons, KeySet},
    weapons::{WEAPONS, WeaponDef, weapon_def},
};

/// Coloured key; also the lock kind of doors `7..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyKind {
    Blue = 1,
    Red = 2,
    Green = 3,
}

impl KeyKind {
    pub fn from_type(key_type: u8) -> Option<KeyKind> {
        match key_type {
            1 => Some(KeyKind::Blue),
            2 => Some(KeyKind::Red),
            3 => Some(KeyKind::Green),
            _ => None,
        }
    }

    #[inline]
    pub fn key_type(self) -> u8 {
        self as u8
    }
}

/// Weapon slot, selected with the number keys `1..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeaponId {
    Knife = 1,
    Pistol = 2,
    Rifle = 3,
}

impl WeaponId {
    pub fn from_slot(slot: u8) -> Option<WeaponId> {
        match slot {
            1 => Some(WeaponId::Knife),
            2 => Some(WeaponId::Pistol),
            3 => Some(WeaponId::Rifle),
            _ => None,
        }
    }

    #[inline]
    pub fn slot(self) -> u8 {
        self as u8
    }
}

/// What a map marker letter spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupKind {
    Key(KeyKind),
    Weapon(WeaponId),
}

impl PickupKind {
    /// `B R G` are keys, `K P S` are knife / pistol / rifle.
    pub fn from_marker(token: &str) -> Option<PickupKind> {
        Some(match token {
            "B" => PickupKind::Key(KeyKind::Blue),
            "R" => PickupKind::Key(KeyKind::Red),
            "G" => PickupKind::Key(KeyKind::Green),
            "K" => PickupKind::Weapon(WeaponId::Knife),
            "P" => PickupKind::Weapon(WeaponId::Pistol),
            "S" => PickupKind::Weapon(WeaponId::Rifle),
            _ => return None,
        })
    }
}
