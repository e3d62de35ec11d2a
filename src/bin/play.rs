use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use wolfcast::{
    assets::load_level_assets,
    config::EngineConfig,
    defs::Buttons,
    game::{Game, LogAudio},
    renderer::software::Software,
    sim::InputFrame,
};

#[derive(Parser, Debug)]
#[command(about = "Play a wolfcast level")]
struct Args {
    /// Asset directory holding `config/` and the images it lists.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Engine config (TOML). Defaults are used when the file is missing.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixed RNG seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
}

/// Held keys → logical buttons.
const HELD: [(Key, Buttons); 8] = [
    (Key::W, Buttons::FORWARD),
    (Key::Up, Buttons::FORWARD),
    (Key::S, Buttons::BACKWARD),
    (Key::Down, Buttons::BACKWARD),
    (Key::A, Buttons::STRAFE_LEFT),
    (Key::D, Buttons::STRAFE_RIGHT),
    (Key::Left, Buttons::TURN_LEFT),
    (Key::Right, Buttons::TURN_RIGHT),
];

/// Edge-triggered keys → logical buttons.
const PRESSED: [(Key, Buttons); 11] = [
    (Key::Space, Buttons::USE),
    (Key::Key1, Buttons::WEAPON_1),
    (Key::Key2, Buttons::WEAPON_2),
    (Key::Key3, Buttons::WEAPON_3),
    (Key::Escape, Buttons::MENU),
    (Key::Enter, Buttons::CONFIRM),
    (Key::NumPadEnter, Buttons::CONFIRM),
    (Key::Up, Buttons::MENU_UP),
    (Key::W, Buttons::MENU_UP),
    (Key::Down, Buttons::MENU_DOWN),
    (Key::S, Buttons::MENU_DOWN),
];

/// Window state between frames, for edges and deltas.
#[derive(Default)]
struct InputState {
    last_mouse_x: Option<f32>,
    mouse_was_down: bool,
}

impl InputState {
    fn poll(&mut self, win: &Window) -> InputFrame {
        let mut frame = InputFrame::default();
        for (key, button) in HELD {
            if win.is_key_down(key) {
                frame.held |= button;
            }
        }
        for (key, button) in PRESSED {
            if win.is_key_pressed(key, KeyRepeat::No) {
                frame.pressed |= button;
            }
        }

        let mouse_x = win.get_mouse_pos(MouseMode::Pass).map(|(x, _)| x);
        if let (Some(now), Some(before)) = (mouse_x, self.last_mouse_x) {
            frame.mouse_dx = now - before;
        }
        self.last_mouse_x = mouse_x;

        let down = win.get_mouse_down(MouseButton::Left);
        frame.fire = (down && !self.mouse_was_down)
            || win.is_key_pressed(Key::LeftCtrl, KeyRepeat::No)
            || win.is_key_pressed(Key::RightCtrl, KeyRepeat::No);
        self.mouse_was_down = down;
        frame
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => EngineConfig::load_or_default(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    let w = args.width.unwrap_or(cfg.screen_width);
    let h = args.height.unwrap_or(cfg.screen_height);

    let (level, textures) = load_level_assets(&args.assets)
        .with_context(|| format!("loading level from {}", args.assets.display()))?;
    log::info!(
        "{}: {}x{} tiles, {} doors, {} pickups, {} enemies",
        level.name,
        level.map.width(),
        level.map.height(),
        level.map.doors().count(),
        level.pickups.len(),
        level.enemy_spawns.len()
    );

    let max_dt = cfg.max_frame_dt;
    let target_fps = cfg.target_fps;
    let mut game = Game::new(Software::new(), LogAudio, level, textures, cfg);

    let mut win = Window::new("wolfcast", w, h, WindowOptions::default())?;
    win.set_target_fps(target_fps);

    let mut input = InputState::default();
    let mut last = Instant::now();

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && game.is_running() {
        let now = Instant::now();
        let dt = (now - last).as_secs_f32().min(max_dt);
        last = now;

        let frame = input.poll(&win);
        game.frame(&frame, dt, w, h);
        win.set_cursor_visibility(!game.wants_mouse());

        let mut shown = Ok(());
        game.present(|fb, fw, fh| shown = win.update_with_buffer(fb, fw, fh));
        shown?;

        acc_time += now.elapsed();
        acc_frames += 1;
        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            log::debug!("avg frame: {:.2} ms ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
