//! End-to-end checks through the public API: doors, collision, pickups,
//! hitscan and alerting.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};

use wolfcast::{
    assets::parse_map,
    config::EngineConfig,
    defs::{Buttons, KeyKind, WeaponId},
    renderer::{FrameReport, Renderer, Scene, software::Software},
    sim::{
        InputFrame, SimRunner, SpriteId,
        weapon::{damage_roll, hit_roll},
    },
    world::{Level, SpriteSkins, Texture, TileMap, WorldTextures},
};

fn level(text: &str) -> Level {
    let data = parse_map(text);
    Level {
        name: "scenario".into(),
        map: TileMap::new(data.rows),
        pickups: data.pickups,
        enemy_spawns: Vec::new(),
    }
}

fn config(x: f32, y: f32, angle: f32) -> EngineConfig {
    EngineConfig {
        spawn_x: x,
        spawn_y: y,
        spawn_angle: angle,
        seed: Some(7),
        ..EngineConfig::default()
    }
}

fn runner(level: &Level, skins: SpriteSkins, cfg: &EngineConfig) -> SimRunner {
    SimRunner::new(level, skins, cfg, SimRunner::rng_for(cfg))
}

fn press(b: Buttons) -> InputFrame {
    InputFrame {
        pressed: b,
        ..InputFrame::default()
    }
}

fn click() -> InputFrame {
    InputFrame {
        fire: true,
        ..InputFrame::default()
    }
}

/// Every enemy frame in every direction wears the same opaque texture.
fn enemy_textures() -> WorldTextures {
    let mut tex = WorldTextures::default();
    let id = tex
        .bank
        .insert(
            "guard",
            Texture {
                name: "guard".into(),
                w: 4,
                h: 4,
                pixels: vec![0xFF80_4020; 16],
            },
        )
        .unwrap();
    for frame in 0..=10 {
        for dir in 0..8 {
            tex.skins.enemy_frames.insert((frame, dir), id);
        }
    }
    tex
}

/// Input, update, draw, resolve: the order a gameplay frame runs in.
fn step(sim: &mut SimRunner, sw: &mut Software, tex: &WorldTextures, input: &InputFrame, dt: f32) -> i32 {
    sim.handle_input(input);
    sim.update(dt);
    let report: FrameReport = {
        let scene = Scene {
            camera: sim.camera(),
            map: sim.map(),
            textures: tex,
            sprites: sim.sprites(),
            player_height: sim.config().player_height,
            max_light_dist: sim.config().max_light_dist,
            aim_range: sim.pending_shot_range(),
        };
        sw.begin_frame(64, 48);
        sw.draw_scene(&scene)
    };
    sim.resolve_shot(report.aim_target)
}

const DOOR_MAP: &str = "3 3\n3 6 3\n3 0 3\n3 3 3";

#[test]
fn s1_unlocked_door_opens_fully() {
    let lvl = level(DOOR_MAP);
    let cfg = config(1.5, 1.5, FRAC_PI_2);
    let mut sim = runner(&lvl, SpriteSkins::default(), &cfg);

    sim.handle_input(&press(Buttons::USE));
    assert!(sim.map().door_at(1, 1).unwrap().opening);

    for _ in 0..7 {
        sim.update(0.1);
    }
    let door = sim.map().door_at(1, 1).unwrap();
    assert!((door.open_amount - 1.0).abs() < 1e-4);
    assert!(!door.opening);
}

#[test]
fn s2_locked_door_stays_shut_without_key() {
    let lvl = level(&DOOR_MAP.replace('6', "7"));
    let cfg = config(1.5, 1.5, FRAC_PI_2);
    let mut sim = runner(&lvl, SpriteSkins::default(), &cfg);
    assert_eq!(sim.map().door_at(1, 1).unwrap().lock, Some(KeyKind::Blue));

    sim.handle_input(&press(Buttons::USE));
    for _ in 0..7 {
        sim.update(0.1);
    }
    let door = sim.map().door_at(1, 1).unwrap();
    assert_eq!(door.open_amount, 0.0);
    assert!(!door.opening);
}

#[test]
fn s3_wall_stops_the_player() {
    let lvl = level("3 3 3 3\n3 0 0 3\n3 3 3 3");
    let cfg = config(1.5, 1.5, PI);
    let mut sim = runner(&lvl, SpriteSkins::default(), &cfg);

    sim.handle_input(&InputFrame {
        held: Buttons::FORWARD,
        ..InputFrame::default()
    });
    sim.update(0.5);

    let x = sim.player().pos.x;
    assert!(x > 1.0, "walked into the wall: x = {x}");
    assert!(x < 1.5);
    assert!((sim.player().pos.y - 1.5).abs() < 1e-5);
}

#[test]
fn s4_walking_onto_a_key_collects_it() {
    let lvl = level("3 3 3 3\n3 0 0 3\n3 0 B 3\n3 3 3 3");
    let cfg = config(1.5, 2.5, 0.0);
    let mut sim = runner(&lvl, SpriteSkins::default(), &cfg);
    let key = SpriteId(0);
    let key_pos = sim.sprites().get(key).unwrap().pos;
    assert_eq!(key_pos, Vec2::new(2.5, 2.5));

    let walk = InputFrame {
        held: Buttons::FORWARD,
        ..InputFrame::default()
    };
    let mut collected = false;
    for _ in 0..40 {
        sim.handle_input(&walk);
        sim.update(0.05);
        if sim.player().pos.distance(key_pos) <= cfg.key_radius {
            assert!(sim.player().keys.holds(KeyKind::Blue));
            assert!(!sim.sprites().get(key).unwrap().active);
            collected = true;
            break;
        }
        assert!(sim.sprites().get(key).unwrap().active);
    }
    assert!(collected);
}

#[test]
fn s5_pistol_shot_spends_ammo_and_rolls_damage() {
    let mut lvl = level("1 1 1 1 1 1 1\n1 0 0 0 0 0 1\n1 1 1 1 1 1 1");
    lvl.enemy_spawns.push(Vec2::new(4.5, 1.5));
    let mut cfg = config(1.5, 1.5, 0.0);
    cfg.starting_weapons = vec![2];
    let tex = enemy_textures();
    let mut sim = runner(&lvl, tex.skins.clone(), &cfg);
    let mut sw = Software::new();
    let enemy = SpriteId(0);

    assert_eq!(sim.player().current, WeaponId::Pistol);
    let before = sim.enemy(enemy).unwrap().health;

    // nothing else draws from the rng before the shot resolves
    let mut twin = StdRng::seed_from_u64(7);
    let expected = if hit_roll(&mut twin, 70.0, 3.0) {
        damage_roll(&mut twin, 4)
    } else {
        0
    };

    let dealt = step(&mut sim, &mut sw, &tex, &click(), 0.016);
    assert_eq!(sim.player().current_weapon().unwrap().ammo, Some(3));
    assert_eq!(dealt, expected);
    assert_eq!(dealt % 4, 0);
    assert_eq!(sim.enemy(enemy).unwrap().health, (before - dealt).max(0));

    // still cooling down
    step(&mut sim, &mut sw, &tex, &click(), 0.1);
    assert_eq!(sim.player().current_weapon().unwrap().ammo, Some(3));

    step(&mut sim, &mut sw, &tex, &InputFrame::default(), 0.2);
    step(&mut sim, &mut sw, &tex, &click(), 0.016);
    assert_eq!(sim.player().current_weapon().unwrap().ammo, Some(2));
}

#[test]
fn s6_rifle_alerts_within_radius() {
    let mut lvl = level("0 0\n0 0");
    // 10, 20, exactly 24, and about 28.3 tiles away
    lvl.enemy_spawns = vec![
        Vec2::new(11.5, 1.5),
        Vec2::new(1.5, 21.5),
        Vec2::new(25.5, 1.5),
        Vec2::new(21.5, 21.5),
    ];
    let mut cfg = config(1.5, 1.5, 0.0);
    cfg.starting_weapons = vec![3];
    let mut sim = runner(&lvl, SpriteSkins::default(), &cfg);

    sim.handle_input(&click());

    let alerted: Vec<bool> = (0..4)
        .map(|i| sim.enemy(SpriteId(i)).unwrap().alerted)
        .collect();
    assert_eq!(alerted, vec![true, true, true, false]);
}
