use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;
use smallvec::SmallVec;

use super::{
    collision::slide_move,
    components::{Body, Position, SpriteId},
    enemy::{Enemy, EnemyState, direction_index},
    los::line_of_sight,
    player::Player,
    sprites::{SpriteIndex, SpriteKind},
};
use crate::{
    config::{EngineConfig, EnemyConfig},
    defs::PickupKind,
    world::{Aabb, SpriteSkins, TileMap},
};

/// Close enough to a walk destination to call it reached.
const ARRIVE_EPS: f32 = 0.05;

/* ----------------------------------------------------------------- */
/*  Action queue – avoids mutable-borrow conflicts                    */
/* ----------------------------------------------------------------- */
enum Action {
    /// Walk `entity` by `delta`; needs every other body, so runs after the query.
    Step { entity: Entity, delta: Vec2 },
}
type Actions = SmallVec<[Action; 4]>;

/* ── Enemy AI ─────────────────────────────────────────────────────── */

/// Vision, timers, decisions, walking and animation for every enemy.
pub fn enemy_system<R: Rng + ?Sized>(
    world: &mut World,
    map: &TileMap,
    player: &Player,
    cfg: &EnemyConfig,
    dt: f32,
    rng: &mut R,
) {
    let mut queue = Actions::new();

    for (e, (pos, enemy)) in world.query_mut::<(&Position, &mut Enemy)>() {
        if enemy.is_dead() {
            enemy.can_see_player = false;
            enemy.animate(dt, cfg.duration_per_sprite);
            enemy.direction = direction_index(pos.0, enemy.angle, player.pos);
            continue;
        }

        enemy.can_see_player = line_of_sight(map, pos.0, player.pos);

        if enemy.tick_timers(dt) && enemy.can_see_player {
            enemy.damage_this_frame += cfg.base_damage;
        }

        enemy.think_timer += dt;
        if enemy.think_timer >= cfg.think_interval && !enemy.state.is_locked() {
            enemy.think_timer = 0.0;
            enemy.think(pos.0, player.pos, cfg, rng);
        }

        if let EnemyState::Walk { dest } = enemy.state {
            let to = dest - pos.0;
            let dist = to.length();
            if dist <= ARRIVE_EPS {
                enemy.enter(EnemyState::Idle);
            } else {
                let step = (cfg.speed * dt).min(dist);
                enemy.face(to);
                queue.push(Action::Step {
                    entity: e,
                    delta: to / dist * step,
                });
            }
        }

        enemy.animate(dt, cfg.duration_per_sprite);
        enemy.direction = direction_index(pos.0, enemy.angle, player.pos);
    }

    // side-effect phase
    for act in queue {
        match act {
            Action::Step { entity, delta } => step_enemy(world, map, player.aabb(), entity, delta),
        }
    }
}

fn step_enemy(world: &mut World, map: &TileMap, player_box: Aabb, entity: Entity, delta: Vec2) {
    let mut blockers: SmallVec<[Aabb; 8]> = SmallVec::new();
    blockers.push(player_box);
    blockers.extend(
        world
            .query::<(&Position, &Body, &Enemy)>()
            .iter()
            .filter(|(other, (_, _, en))| *other != entity && !en.is_dead())
            .map(|(_, (p, b, _))| b.aabb(p.0)),
    );

    let Ok(mut q) = world.query_one::<(&mut Position, &Body, &mut Enemy)>(entity) else {
        return;
    };
    let Some((pos, body, enemy)) = q.get() else {
        return;
    };
    let moved = slide_move(map, pos.0, delta, body.size * 0.5, &blockers);
    pos.0 = moved.pos;
    if moved.blocked_x && moved.blocked_y {
        // wedged: give up and re-think next interval
        enemy.enter(EnemyState::Idle);
    }
}

/* ── Player damage ────────────────────────────────────────────────── */

/// Drain every enemy's pending damage. Only enemies that can still see the
/// player count.
pub fn damage_system(world: &mut World) -> i32 {
    let mut total = 0;
    for (_, enemy) in world.query_mut::<&mut Enemy>() {
        let dmg = std::mem::take(&mut enemy.damage_this_frame);
        if enemy.can_see_player && dmg > 0 {
            total += dmg;
        }
    }
    total
}

/// Alert every living enemy within `radius` of `center`.
pub fn alert_system(world: &mut World, center: Vec2, radius: f32) -> usize {
    let r2 = radius * radius;
    let mut n = 0;
    for (_, (pos, enemy)) in world.query_mut::<(&Position, &mut Enemy)>() {
        if !enemy.is_dead() && !enemy.alerted && pos.0.distance_squared(center) <= r2 {
            enemy.alert();
            n += 1;
        }
    }
    n
}

/* ── Pickups ──────────────────────────────────────────────────────── */

/// Collect every active pickup within its radius of the player.
pub fn pickup_system(
    sprites: &mut SpriteIndex,
    player: &mut Player,
    cfg: &EngineConfig,
) -> SmallVec<[PickupKind; 2]> {
    let mut got = SmallVec::new();
    for sprite in sprites.iter_mut().filter(|s| s.active) {
        let SpriteKind::Pickup(kind) = sprite.kind else {
            continue;
        };
        let radius = match kind {
            PickupKind::Key(_) => cfg.key_radius,
            PickupKind::Weapon(_) => cfg.weapon_radius,
        };
        if sprite.pos.distance_squared(player.pos) > radius * radius {
            continue;
        }
        match kind {
            PickupKind::Key(k) => player.give_key(k),
            // owned weapons stay on the floor
            PickupKind::Weapon(w) => {
                if !player.give_weapon(w, cfg) {
                    continue;
                }
            }
        }
        sprite.active = false;
        log::info!("picked up {kind:?}");
        got.push(kind);
    }
    got
}

/* ── Sprite sync ──────────────────────────────────────────────────── */

/// Copy enemy position and the `(frame, direction)` texture into the index.
pub fn enemy_sprite_system(world: &World, sprites: &mut SpriteIndex, skins: &SpriteSkins) {
    for (_, (pos, enemy, slot)) in world.query::<(&Position, &Enemy, &SpriteId)>().iter() {
        if let Some(sprite) = sprites.get_mut(*slot) {
            sprite.pos = pos.0;
            sprite.shootable = !enemy.is_dead();
            sprite.texture = skins
                .enemy_frames
                .get(&(enemy.current_frame(), enemy.direction))
                .copied();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{KeyKind, WeaponId};
    use crate::world::PickupSpawn;
    use rand::{SeedableRng, rngs::StdRng};

    fn hall() -> TileMap {
        TileMap::new(vec![
            vec![1, 1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1, 1],
        ])
    }

    fn spawn(world: &mut World, sprites: &mut SpriteIndex, at: Vec2, cfg: &EnemyConfig) -> Entity {
        let e = world.spawn((Position(at), Body { size: cfg.size }, Enemy::new(cfg, 0.0)));
        let id = sprites.push(at, None, SpriteKind::Enemy(e));
        world.insert_one(e, id).unwrap();
        e
    }

    fn player_at(p: Vec2) -> Player {
        let mut pl = Player::new(&EngineConfig::default());
        pl.pos = p;
        pl
    }

    #[test]
    fn shooting_enemy_hurts_only_with_sight() {
        let map = hall();
        let mut cfg = EnemyConfig::default();
        cfg.attack_chance_divisor = 1;
        cfg.think_interval = 0.0;
        let mut world = World::new();
        let mut sprites = SpriteIndex::new();
        let e = spawn(&mut world, &mut sprites, Vec2::new(5.5, 1.5), &cfg);
        let player = player_at(Vec2::new(1.5, 1.5));
        let mut rng = StdRng::seed_from_u64(9);

        enemy_system(&mut world, &map, &player, &cfg, 0.1, &mut rng);
        assert!(matches!(
            world.get::<&Enemy>(e).unwrap().state,
            EnemyState::Shoot { .. }
        ));
        for _ in 0..20 {
            enemy_system(&mut world, &map, &player, &cfg, 0.1, &mut rng);
            if world.get::<&Enemy>(e).unwrap().damage_this_frame > 0 {
                break;
            }
        }
        assert_eq!(damage_system(&mut world), cfg.base_damage);
        assert_eq!(damage_system(&mut world), 0);
    }

    #[test]
    fn alerted_enemy_walks_toward_player_and_stops_at_body() {
        let map = hall();
        let mut cfg = EnemyConfig::default();
        cfg.attack_chance_divisor = 1_000_000;
        cfg.think_interval = 0.0;
        let mut world = World::new();
        let mut sprites = SpriteIndex::new();
        let e = spawn(&mut world, &mut sprites, Vec2::new(5.5, 1.5), &cfg);
        world.get::<&mut Enemy>(e).unwrap().alert();
        let player = player_at(Vec2::new(1.5, 1.5));
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..200 {
            enemy_system(&mut world, &map, &player, &cfg, 0.05, &mut rng);
            let pos = world.get::<&Position>(e).unwrap().0;
            let body = Body { size: cfg.size };
            assert!(!body.aabb(pos).overlaps(&player.aabb()));
        }
        let pos = world.get::<&Position>(e).unwrap().0;
        assert!(pos.x < 3.0, "enemy should have closed in, at {pos}");
    }

    #[test]
    fn alert_respects_radius() {
        let cfg = EnemyConfig::default();
        let mut world = World::new();
        let mut sprites = SpriteIndex::new();
        let near = spawn(&mut world, &mut sprites, Vec2::new(10.0, 0.0), &cfg);
        let far = spawn(&mut world, &mut sprites, Vec2::new(30.0, 0.0), &cfg);
        assert_eq!(alert_system(&mut world, Vec2::ZERO, 24.0), 1);
        assert!(world.get::<&Enemy>(near).unwrap().alerted);
        assert!(!world.get::<&Enemy>(far).unwrap().alerted);
    }

    #[test]
    fn key_pickup_deactivates_sprite() {
        let cfg = EngineConfig::default();
        let mut sprites = SpriteIndex::new();
        sprites.push_pickups(
            &[
                PickupSpawn {
                    kind: PickupKind::Key(KeyKind::Blue),
                    row: 2,
                    col: 2,
                },
                PickupSpawn {
                    kind: PickupKind::Weapon(WeaponId::Rifle),
                    row: 5,
                    col: 5,
                },
            ],
            &SpriteSkins::default(),
        );
        let mut player = player_at(Vec2::new(2.2, 2.4));
        let got = pickup_system(&mut sprites, &mut player, &cfg);
        assert_eq!(got.as_slice(), &[PickupKind::Key(KeyKind::Blue)]);
        assert!(player.keys.holds(KeyKind::Blue));
        assert!(!sprites.get(SpriteId(0)).unwrap().active);
        assert!(sprites.get(SpriteId(1)).unwrap().active);
        assert!(!player.owns(WeaponId::Rifle));
    }

    #[test]
    fn owned_weapon_is_left_on_the_floor() {
        let cfg = EngineConfig::default();
        let mut sprites = SpriteIndex::new();
        let at = |col| PickupSpawn {
            kind: PickupKind::Weapon(WeaponId::Pistol),
            row: 1,
            col,
        };
        sprites.push_pickups(&[at(1), at(3)], &SpriteSkins::default());
        let mut player = player_at(Vec2::new(1.5, 1.5));
        assert!(!player.owns(WeaponId::Pistol));

        let got = pickup_system(&mut sprites, &mut player, &cfg);
        assert_eq!(got.as_slice(), &[PickupKind::Weapon(WeaponId::Pistol)]);
        assert!(!sprites.get(SpriteId(0)).unwrap().active);

        player.pos = Vec2::new(3.5, 1.5);
        assert!(pickup_system(&mut sprites, &mut player, &cfg).is_empty());
        assert!(sprites.get(SpriteId(1)).unwrap().active);
    }

    #[test]
    fn enemy_sprite_tracks_frame_and_direction() {
        let cfg = EnemyConfig::default();
        let mut world = World::new();
        let mut sprites = SpriteIndex::new();
        let mut skins = SpriteSkins::default();
        skins.enemy_frames.insert((0, 4), 42);
        let e = spawn(&mut world, &mut sprites, Vec2::new(5.5, 1.5), &cfg);
        // facing +x, player to the west: bucket 4
        world.get::<&mut Enemy>(e).unwrap().direction = direction_index(
            Vec2::new(5.5, 1.5),
            0.0,
            Vec2::new(1.5, 1.5),
        );
        enemy_sprite_system(&world, &mut sprites, &skins);
        assert_eq!(sprites.get(SpriteId(0)).unwrap().texture, Some(42));
    }
}
