use bitflags::bitflags;

use super::KeyKind;

bitflags! {
    /// Keys the player carries. One bit per [`KeyKind`].
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct KeySet: u8 {
        const BLUE  = 0b001;
        const RED   = 0b010;
        const GREEN = 0b100;
    }
}

impl KeySet {
    #[inline]
    pub fn bit(kind: KeyKind) -> KeySet {
        match kind {
            KeyKind::Blue => KeySet::BLUE,
            KeyKind::Red => KeySet::RED,
            KeyKind::Green => KeySet::GREEN,
        }
    }

    #[inline]
    pub fn holds(self, kind: KeyKind) -> bool {
        self.contains(Self::bit(kind))
    }
}

bitflags! {
    /// Logical buttons, already decoupled from the window backend.
    ///
    /// Movement keys are read as *held*; menu navigation, use and weapon
    /// selection also come through as edge-triggered *pressed* sets.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Buttons: u32 {
        const FORWARD      = 1 << 0;  // W / Up
        const BACKWARD     = 1 << 1;  // S / Down
        const STRAFE_LEFT  = 1 << 2;  // A
        const STRAFE_RIGHT = 1 << 3;  // D
        const TURN_LEFT    = 1 << 4;  // Left
        const TURN_RIGHT   = 1 << 5;  // Right
        const USE          = 1 << 6;  // Space
        const WEAPON_1     = 1 << 7;
        const WEAPON_2     = 1 << 8;
        const WEAPON_3     = 1 << 9;
        const MENU         = 1 << 10; // Escape
        const CONFIRM      = 1 << 11; // Enter
        const MENU_UP      = 1 << 12;
        const MENU_DOWN    = 1 << 13;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_bits_are_distinct() {
        let mut held = KeySet::empty();
        held |= KeySet::bit(KeyKind::Red);
        assert!(held.holds(KeyKind::Red));
        assert!(!held.holds(KeyKind::Blue));
        assert!(!held.holds(KeyKind::Green));
    }
}
