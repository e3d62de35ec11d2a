//! Top-down level viewer.
//!
//! ```bash
//! cargo run --release --bin map_view -- --assets <dir>
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use minifb::{Key, Window, WindowOptions};

use wolfcast::{
    assets::load_level_assets,
    config::EngineConfig,
    defs::{KeyKind, PickupKind},
    renderer::{Renderer, Rgba, rgb, software::Software},
    world::{Door, Level, TileValue, is_door},
};

const WIDTH: usize = 1024;
const HEIGHT: usize = 768;

#[derive(Parser, Debug)]
#[command(about = "Draw a wolfcast level from above")]
struct Args {
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Engine config, for the spawn pose.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn wall_color(tile: TileValue) -> Rgba {
    match tile {
        1 => rgb(150, 150, 150),
        2 => rgb(120, 90, 60),
        3 => rgb(90, 120, 150),
        4 => rgb(110, 140, 90),
        _ => rgb(170, 170, 120),
    }
}

fn key_color(kind: KeyKind) -> Rgba {
    match kind {
        KeyKind::Blue => rgb(60, 90, 230),
        KeyKind::Red => rgb(230, 50, 50),
        KeyKind::Green => rgb(50, 200, 70),
    }
}

fn door_color(door: Option<&Door>) -> Rgba {
    match door.and_then(|d| d.lock) {
        Some(kind) => key_color(kind),
        None => rgb(200, 140, 40),
    }
}

/// Screen placement of the grid.
struct View {
    cell: i32,
    x0: i32,
    y0: i32,
}

impl View {
    fn fit(level: &Level) -> View {
        let cols = level.map.width().max(1) as i32;
        let rows = level.map.height().max(1) as i32;
        let cell = (WIDTH as i32 / cols).min(HEIGHT as i32 / rows).max(2);
        View {
            cell,
            x0: (WIDTH as i32 - cell * cols) / 2,
            y0: (HEIGHT as i32 - cell * rows) / 2,
        }
    }

    fn to_screen(&self, x: f32, y: f32) -> (i32, i32) {
        (
            self.x0 + (x * self.cell as f32) as i32,
            self.y0 + (y * self.cell as f32) as i32,
        )
    }
}

fn draw_level<R: Renderer>(r: &mut R, level: &Level, cfg: &EngineConfig) {
    let view = View::fit(level);
    let cell = view.cell;

    for row in 0..level.map.height() as i32 {
        for col in 0..level.map.row_len(row) as i32 {
            let Some(tile) = level.map.tile(row, col) else {
                continue;
            };
            let (x, y) = (view.x0 + col * cell, view.y0 + row * cell);
            let color = match tile {
                0 => rgb(20, 20, 20),
                t if is_door(t) => door_color(level.map.door_at(row, col)),
                t => wall_color(t),
            };
            r.fill_rect(x, y, cell - 1, cell - 1, color);
        }
    }

    let mark = (cell / 3).max(2);
    for p in &level.pickups {
        let c = p.center();
        let (x, y) = view.to_screen(c.x, c.y);
        let color = match p.kind {
            PickupKind::Key(k) => key_color(k),
            PickupKind::Weapon(_) => rgb(240, 240, 240),
        };
        r.fill_rect(x - mark / 2, y - mark / 2, mark, mark, color);
    }

    for e in &level.enemy_spawns {
        let (x, y) = view.to_screen(e.x, e.y);
        r.draw_line(x - mark, y - mark, x + mark, y + mark, rgb(255, 40, 40));
        r.draw_line(x - mark, y + mark, x + mark, y - mark, rgb(255, 40, 40));
    }

    // spawn point and facing
    let (sx, sy) = view.to_screen(cfg.spawn_x, cfg.spawn_y);
    let (s, c) = cfg.spawn_angle.sin_cos();
    let tip = view.to_screen(cfg.spawn_x + c, cfg.spawn_y + s);
    r.fill_rect(sx - mark / 2, sy - mark / 2, mark, mark, rgb(250, 230, 60));
    r.draw_line(sx, sy, tip.0, tip.1, rgb(250, 230, 60));
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (level, _) = load_level_assets(&args.assets)
        .with_context(|| format!("loading level from {}", args.assets.display()))?;
    log::info!("{}", level.name);
    let cfg = match &args.config {
        Some(path) => EngineConfig::load_or_default(path)?,
        None => EngineConfig::default(),
    };

    let mut sw = Software::new();
    let mut window = Window::new("wolfcast map", WIDTH, HEIGHT, WindowOptions::default())?;
    window.set_target_fps(30);
    while window.is_open() && !window.is_key_down(Key::Escape) {
        sw.begin_frame(WIDTH, HEIGHT);
        draw_level(&mut sw, &level, &cfg);
        let mut shown = Ok(());
        sw.end_frame(|fb, w, h| shown = window.update_with_buffer(fb, w, h));
        shown?;
    }
    Ok(())
}
