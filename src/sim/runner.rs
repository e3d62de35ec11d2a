use glam::Vec2;
use hecs::{Entity, World};
use rand::{SeedableRng, rngs::StdRng};

use super::{
    collision::slide_move,
    components::{Body, InputFrame, Position, SpriteId},
    enemy::{Enemy, Wound},
    los::line_of_sight,
    player::{DoorOutcome, FireOutcome, Player},
    sprites::{SpriteIndex, SpriteKind},
    systems,
    weapon::{damage_roll, hit_roll},
};
use crate::{
    config::EngineConfig,
    defs::{Buttons, PickupKind, WeaponId},
    world::{Aabb, Camera, Level, SpriteSkins, TileMap},
};

/// Things the outer layers (audio, menus, logs) react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    Fired { weapon: WeaponId, sound: &'static str },
    OutOfAmmo(WeaponId),
    DoorOpened { row: i32, col: i32 },
    DoorLocked { row: i32, col: i32 },
    PickedUp(PickupKind),
    EnemyHit { sprite: SpriteId, damage: i32 },
    EnemyKilled { sprite: SpriteId },
    Missed,
    PlayerHurt { damage: i32, health: i32 },
}

/// Owns the mutable half of a level: map copy, enemies, player, sprites.
pub struct SimRunner {
    world: World,
    map: TileMap,
    player: Player,
    sprites: SpriteIndex,
    skins: SpriteSkins,
    cfg: EngineConfig,
    rng: StdRng,
    had_enemies: bool,
    events: Vec<SimEvent>,
}

impl SimRunner {
    /// Fresh simulation from the immutable `level` template.
    pub fn new(level: &Level, skins: SpriteSkins, cfg: &EngineConfig, rng: StdRng) -> Self {
        let mut sim = Self {
            world: World::new(),
            map: level.map.clone(),
            player: Player::new(cfg),
            sprites: SpriteIndex::new(),
            skins,
            cfg: cfg.clone(),
            rng,
            had_enemies: !level.enemy_spawns.is_empty(),
            events: Vec::new(),
        };
        for &at in &level.enemy_spawns {
            sim.spawn_enemy(at, 0.0);
        }
        sim.sprites.push_pickups(&level.pickups, &sim.skins);
        systems::enemy_sprite_system(&sim.world, &mut sim.sprites, &sim.skins);
        sim
    }

    /// Seed from the config, or from entropy when none is set.
    pub fn rng_for(cfg: &EngineConfig) -> StdRng {
        match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Add an enemy. Must run before pickups are indexed so enemy sprite ids
    /// stay in front.
    pub fn spawn_enemy(&mut self, at: Vec2, angle: f32) -> Entity {
        let id = SpriteId(self.sprites.len());
        let e = self.world.spawn((
            Position(at),
            Body {
                size: self.cfg.enemy.size,
            },
            Enemy::new(&self.cfg.enemy, angle),
            id,
        ));
        let pushed = self.sprites.push(at, None, SpriteKind::Enemy(e));
        debug_assert_eq!(pushed, id);
        self.had_enemies = true;
        e
    }

    /*───────────────────────────── accessors ────────────────────────────*/

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    #[inline]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    #[inline]
    pub fn map_mut(&mut self) -> &mut TileMap {
        &mut self.map
    }

    #[inline]
    pub fn sprites(&self) -> &SpriteIndex {
        &self.sprites
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn camera(&self) -> Camera {
        self.player.camera(self.cfg.fov())
    }

    /// Range the renderer should look for an aim target in, if a shot is
    /// waiting to be resolved.
    pub fn pending_shot_range(&self) -> Option<f32> {
        if !self.player.shot_this_frame {
            return None;
        }
        self.player.current_weapon().map(|w| w.range)
    }

    pub fn enemy(&self, sprite: SpriteId) -> Option<hecs::Ref<'_, Enemy>> {
        let e = self.sprites.enemy_entity(sprite)?;
        self.world.get::<&Enemy>(e).ok()
    }

    /// `true` once every enemy of a level that had some is dead.
    pub fn all_enemies_dead(&self) -> bool {
        self.had_enemies
            && self
                .world
                .query::<&Enemy>()
                .iter()
                .all(|(_, e)| e.is_dead())
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SimEvent> {
        self.events.drain(..)
    }

    /*─────────────────────────────── input ──────────────────────────────*/

    /// Look, move intent, weapon keys, use key, trigger.
    pub fn handle_input(&mut self, input: &InputFrame) {
        self.player.turn(input, &self.cfg);
        self.player.update_intent(input.held);

        for (button, id) in [
            (Buttons::WEAPON_1, WeaponId::Knife),
            (Buttons::WEAPON_2, WeaponId::Pistol),
            (Buttons::WEAPON_3, WeaponId::Rifle),
        ] {
            if input.pressed(button) && self.player.select_weapon(id) {
                log::debug!("weapon -> {id:?}");
            }
        }

        if input.pressed(Buttons::USE) {
            let (row, col) = self.player.reach_tile();
            match self.player.try_open_door(&mut self.map) {
                DoorOutcome::Opened => self.events.push(SimEvent::DoorOpened { row, col }),
                DoorOutcome::Locked(kind) => {
                    log::debug!("door ({row},{col}) needs the {kind:?} key");
                    self.events.push(SimEvent::DoorLocked { row, col });
                }
                DoorOutcome::Busy | DoorOutcome::NoDoor => {}
            }
        }

        if input.fire {
            self.fire();
        }
    }

    fn fire(&mut self) {
        match self.player.pull_trigger() {
            FireOutcome::Fired(def) => {
                log::debug!("fired {:?}", def.id);
                self.events.push(SimEvent::Fired {
                    weapon: def.id,
                    sound: def.sound,
                });
                if def.is_ranged() {
                    let n = systems::alert_system(&mut self.world, self.player.pos, def.alert_radius);
                    if n > 0 {
                        log::debug!("{n} enemies alerted");
                    }
                }
            }
            FireOutcome::OutOfAmmo(id) => {
                log::info!("out of ammo for {id:?}");
                self.events.push(SimEvent::OutOfAmmo(id));
            }
            FireOutcome::CoolingDown => {}
        }
    }

    /*────────────────────────────── update ──────────────────────────────*/

    /// Advance the world by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);

        self.move_player(dt);
        self.map.advance_doors(dt, self.cfg.door_open_speed);
        self.player.cool_down(dt);

        systems::enemy_system(
            &mut self.world,
            &self.map,
            &self.player,
            &self.cfg.enemy,
            dt,
            &mut self.rng,
        );

        let damage = systems::damage_system(&mut self.world);
        if damage > 0 {
            self.player.hurt(damage);
            log::debug!("player hit for {damage}, health {}", self.player.health);
            self.events.push(SimEvent::PlayerHurt {
                damage,
                health: self.player.health,
            });
        }

        for kind in systems::pickup_system(&mut self.sprites, &mut self.player, &self.cfg) {
            self.events.push(SimEvent::PickedUp(kind));
        }

        systems::enemy_sprite_system(&self.world, &mut self.sprites, &self.skins);
    }

    fn move_player(&mut self, dt: f32) {
        let delta = self.player.intent * self.cfg.player_speed * dt;
        if delta == Vec2::ZERO {
            return;
        }
        let half = self.player.half_size();
        let blockers: Vec<Aabb> = self
            .world
            .query::<(&Position, &Body, &Enemy)>()
            .iter()
            .filter(|(_, (_, _, e))| !e.is_dead())
            .map(|(_, (p, b, _))| b.aabb(p.0))
            .collect();

        // sub-step so one long frame cannot skip a tile
        let steps = (delta.length() / half).ceil().max(1.0) as u32;
        let part = delta / steps as f32;
        for _ in 0..steps {
            let moved = slide_move(&self.map, self.player.pos, part, half, &blockers);
            self.player.pos = moved.pos;
        }
    }

    /*────────────────────────────── hitscan ─────────────────────────────*/

    /// Resolve the pending shot against the aim target the renderer found.
    ///
    /// Returns the damage dealt. Without a pending shot this does nothing.
    pub fn resolve_shot(&mut self, target: Option<SpriteId>) -> i32 {
        if !self.player.take_shot() {
            return 0;
        }
        let Some(sprite) = target else {
            self.events.push(SimEvent::Missed);
            return 0;
        };
        let Some(entity) = self.sprites.enemy_entity(sprite) else {
            return 0;
        };
        let Some(weapon) = self.player.current_weapon().copied() else {
            return 0;
        };
        let Ok(pos) = self.world.get::<&Position>(entity).map(|p| p.0) else {
            return 0;
        };

        let dist = pos.distance(self.player.pos);
        if dist > weapon.range || !line_of_sight(&self.map, pos, self.player.pos) {
            self.events.push(SimEvent::Missed);
            return 0;
        }
        if !hit_roll(&mut self.rng, weapon.def.accuracy, dist) {
            log::debug!("shot missed at {dist:.2}");
            self.events.push(SimEvent::Missed);
            return 0;
        }
        let damage = damage_roll(&mut self.rng, weapon.def.multiplier);

        let Ok(mut enemy) = self.world.get::<&mut Enemy>(entity) else {
            return 0;
        };
        match enemy.take_damage(damage, &self.cfg.enemy, &mut self.rng) {
            Wound::Ignored => 0,
            Wound::Killed => {
                log::info!("enemy {} killed", sprite.0);
                self.events.push(SimEvent::EnemyKilled { sprite });
                damage
            }
            Wound::Hurt | Wound::Flinched => {
                log::debug!("enemy {} hit for {damage}, {} left", sprite.0, enemy.health);
                self.events.push(SimEvent::EnemyHit { sprite, damage });
                damage
            }
        }
    }
}
