//! Player controller: look, move intent, doors, weapons.

use std::f32::consts::TAU;

use glam::Vec2;

use super::{components::InputFrame, weapon::WeaponRecord};
use crate::{
    config::EngineConfig,
    defs::{Buttons, KeyKind, KeySet, WeaponDef, WeaponId},
    world::{Aabb, Camera, TileCoord, TileMap},
};

/// Reach of the use key, in multiples of `player_square_size`.
pub const REACH_FACTOR: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorOutcome {
    Opened,
    Locked(KeyKind),
    /// Already sliding or open.
    Busy,
    NoDoor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireOutcome {
    Fired(&'static WeaponDef),
    OutOfAmmo(WeaponId),
    CoolingDown,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Radians in `[0, 2π)`; 0 looks along +x, growing turns clockwise.
    pub angle: f32,
    /// Unit (or zero) walking direction from the last input pass.
    pub intent: Vec2,
    pub health: i32,
    pub keys: KeySet,
    weapons: [Option<WeaponRecord>; 3],
    pub current: WeaponId,
    /// Trigger latch, cleared by the cooldown.
    pub has_shot: bool,
    /// A shot waiting to be resolved against the aim target.
    pub shot_this_frame: bool,
    pub fire_cooldown: f32,
    half: f32,
}

impl Player {
    pub fn new(cfg: &EngineConfig) -> Self {
        let mut weapons = [None; 3];
        for id in cfg.starting_weapons.iter().filter_map(|&s| WeaponId::from_slot(s)) {
            weapons[id.slot() as usize - 1] = Some(WeaponRecord::new(id, cfg));
        }
        if weapons.iter().all(Option::is_none) {
            log::warn!("no valid starting weapon configured, giving a knife");
            weapons[0] = Some(WeaponRecord::new(WeaponId::Knife, cfg));
        }
        let current = weapons
            .iter()
            .flatten()
            .map(WeaponRecord::id)
            .next()
            .unwrap_or(WeaponId::Knife);

        Self {
            pos: Vec2::new(cfg.spawn_x, cfg.spawn_y),
            angle: cfg.spawn_angle.rem_euclid(TAU),
            intent: Vec2::ZERO,
            health: cfg.player_health,
            keys: KeySet::empty(),
            weapons,
            current,
            has_shot: false,
            shot_this_frame: false,
            fire_cooldown: 0.0,
            half: cfg.player_square_size,
        }
    }

    #[inline]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.angle.sin_cos();
        Vec2::new(c, s)
    }

    #[inline]
    pub fn half_size(&self) -> f32 {
        self.half
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::around(self.pos, self.half)
    }

    pub fn camera(&self, fov: f32) -> Camera {
        Camera::new(self.pos, self.angle, fov)
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /*──────────────────────────── look & move ─────────────────────────*/

    /// Mouse and turn keys.
    pub fn turn(&mut self, input: &InputFrame, cfg: &EngineConfig) {
        let mut a = self.angle + input.mouse_dx * cfg.mouse_sensitivity;
        if input.held(Buttons::TURN_LEFT) {
            a -= cfg.rotation_sensitivity;
        }
        if input.held(Buttons::TURN_RIGHT) {
            a += cfg.rotation_sensitivity;
        }
        self.angle = a.rem_euclid(TAU);
    }

    /// Recompute `intent` from the movement keys.
    pub fn update_intent(&mut self, held: Buttons) {
        let fwd = self.forward();
        let right = fwd.perp();
        let mut v = Vec2::ZERO;
        if held.contains(Buttons::FORWARD) {
            v += fwd;
        }
        if held.contains(Buttons::BACKWARD) {
            v -= fwd;
        }
        if held.contains(Buttons::STRAFE_LEFT) {
            v -= right;
        }
        if held.contains(Buttons::STRAFE_RIGHT) {
            v += right;
        }
        self.intent = v.normalize_or_zero();
    }

    /*──────────────────────────────── doors ───────────────────────────*/

    /// Tile one reach step ahead of the player.
    pub fn reach_tile(&self) -> TileCoord {
        TileMap::cell_of(self.pos + self.forward() * (REACH_FACTOR * self.half))
    }

    pub fn try_open_door(&self, map: &mut TileMap) -> DoorOutcome {
        let (r, c) = self.reach_tile();
        let keys = self.keys;
        let Some(door) = map.door_at_mut(r, c) else {
            return DoorOutcome::NoDoor;
        };
        if let Some(kind) = door.lock {
            if !keys.holds(kind) {
                return DoorOutcome::Locked(kind);
            }
        }
        if door.start_opening() {
            DoorOutcome::Opened
        } else {
            DoorOutcome::Busy
        }
    }

    /*────────────────────────────── weapons ───────────────────────────*/

    pub fn weapon(&self, id: WeaponId) -> Option<&WeaponRecord> {
        self.weapons[id.slot() as usize - 1].as_ref()
    }

    pub fn owns(&self, id: WeaponId) -> bool {
        self.weapon(id).is_some()
    }

    pub fn current_weapon(&self) -> Option<&WeaponRecord> {
        self.weapon(self.current)
    }

    /// Switch to `id` if owned.
    pub fn select_weapon(&mut self, id: WeaponId) -> bool {
        if self.owns(id) && self.current != id {
            self.current = id;
            return true;
        }
        false
    }

    /// Add a weapon not yet owned. Returns false if it already was.
    pub fn give_weapon(&mut self, id: WeaponId, cfg: &EngineConfig) -> bool {
        let slot = &mut self.weapons[id.slot() as usize - 1];
        if slot.is_some() {
            return false;
        }
        *slot = Some(WeaponRecord::new(id, cfg));
        true
    }

    pub fn give_key(&mut self, kind: KeyKind) {
        self.keys |= KeySet::bit(kind);
    }

    /// Left click. Latches a shot unless cooling down or empty.
    pub fn pull_trigger(&mut self) -> FireOutcome {
        if self.has_shot {
            return FireOutcome::CoolingDown;
        }
        let id = self.current;
        let Some(rec) = self.weapons[id.slot() as usize - 1].as_mut() else {
            return FireOutcome::CoolingDown;
        };
        if !rec.consume() {
            return FireOutcome::OutOfAmmo(id);
        }
        self.has_shot = true;
        self.shot_this_frame = true;
        self.fire_cooldown = 0.0;
        FireOutcome::Fired(rec.def)
    }

    /// Release the trigger latch after the current weapon's cool-down.
    ///
    /// A pending shot is left alone; it is cleared when resolved.
    pub fn cool_down(&mut self, dt: f32) {
        if !self.has_shot {
            return;
        }
        self.fire_cooldown += dt;
        let limit = self.current_weapon().map_or(0.0, |w| w.def.cool_down);
        if self.fire_cooldown >= limit {
            self.has_shot = false;
        }
    }

    /// Take the pending shot, if any.
    pub fn take_shot(&mut self) -> bool {
        std::mem::take(&mut self.shot_this_frame)
    }

    pub fn hurt(&mut self, amount: i32) {
        self.health = (self.health - amount.max(0)).max(0);
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;

    fn cfg() -> EngineConfig {
        EngineConfig {
            starting_weapons: vec![1, 2],
            ..EngineConfig::default()
        }
    }

    fn held(b: Buttons) -> InputFrame {
        InputFrame {
            held: b,
            ..InputFrame::default()
        }
    }

    #[test]
    fn intent_is_normalised() {
        let mut p = Player::new(&cfg());
        p.update_intent(Buttons::FORWARD | Buttons::STRAFE_RIGHT);
        assert!((p.intent.length() - 1.0).abs() < 1e-5);
        p.update_intent(Buttons::FORWARD | Buttons::BACKWARD);
        assert_eq!(p.intent, Vec2::ZERO);
    }

    #[test]
    fn strafe_right_is_a_quarter_turn_clockwise() {
        let mut p = Player::new(&cfg());
        p.angle = 0.0;
        p.update_intent(Buttons::STRAFE_RIGHT);
        assert!((p.intent - Vec2::new(0.0, 1.0)).length() < 1e-5);
        p.update_intent(Buttons::STRAFE_LEFT);
        assert!((p.intent - Vec2::new(0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn turning_wraps_into_range() {
        let c = cfg();
        let mut p = Player::new(&c);
        p.angle = 0.01;
        p.turn(&held(Buttons::TURN_LEFT), &c);
        assert!(p.angle > PI && p.angle < TAU);
        let mouse = InputFrame {
            mouse_dx: 1000.0,
            ..InputFrame::default()
        };
        p.turn(&mouse, &c);
        assert!((0.0..TAU).contains(&p.angle));
    }

    #[test]
    fn weapon_selection_needs_ownership() {
        let mut p = Player::new(&cfg());
        assert_eq!(p.current, WeaponId::Knife);
        assert!(p.select_weapon(WeaponId::Pistol));
        assert!(!p.select_weapon(WeaponId::Rifle));
        assert_eq!(p.current, WeaponId::Pistol);
    }

    #[test]
    fn pistol_latch_and_cooldown() {
        let mut p = Player::new(&cfg());
        p.select_weapon(WeaponId::Pistol);
        assert!(matches!(p.pull_trigger(), FireOutcome::Fired(_)));
        assert_eq!(p.current_weapon().unwrap().ammo, Some(3));
        assert_eq!(p.pull_trigger(), FireOutcome::CoolingDown);
        p.cool_down(0.1);
        assert_eq!(p.pull_trigger(), FireOutcome::CoolingDown);
        p.cool_down(0.11);
        assert!(matches!(p.pull_trigger(), FireOutcome::Fired(_)));
        assert_eq!(p.current_weapon().unwrap().ammo, Some(2));
    }

    #[test]
    fn empty_gun_does_not_latch() {
        let mut p = Player::new(&cfg());
        p.select_weapon(WeaponId::Pistol);
        for _ in 0..4 {
            p.pull_trigger();
            p.cool_down(1.0);
        }
        assert_eq!(p.pull_trigger(), FireOutcome::OutOfAmmo(WeaponId::Pistol));
        assert!(!p.has_shot);
    }

    #[test]
    fn knife_shot_survives_its_zero_cooldown() {
        let mut p = Player::new(&cfg());
        assert!(matches!(p.pull_trigger(), FireOutcome::Fired(_)));
        p.cool_down(0.016);
        assert!(!p.has_shot);
        assert!(p.take_shot());
        assert!(!p.take_shot());
    }

    #[test]
    fn doors_respect_keys() {
        let mut map = TileMap::new(vec![
            vec![3, 3, 3],
            vec![3, 0, 3],
            vec![3, 7, 3],
            vec![3, 3, 3],
        ]);
        let mut p = Player::new(&cfg());
        p.pos = Vec2::new(1.5, 1.5);
        p.angle = FRAC_PI_2;
        // reach is 1.1 × 0.25 from the centre: still in our own tile
        assert_eq!(p.reach_tile(), (1, 1));
        p.pos.y = 1.8;
        assert_eq!(p.reach_tile(), (2, 1));

        assert_eq!(p.try_open_door(&mut map), DoorOutcome::Locked(KeyKind::Blue));
        p.give_key(KeyKind::Blue);
        assert_eq!(p.try_open_door(&mut map), DoorOutcome::Opened);
        assert_eq!(p.try_open_door(&mut map), DoorOutcome::Busy);
    }

    #[test]
    fn health_clamps_at_zero() {
        let mut p = Player::new(&cfg());
        p.hurt(250);
        assert_eq!(p.health, 0);
        assert!(!p.is_alive());
    }
}
