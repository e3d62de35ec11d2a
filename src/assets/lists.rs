//! Line-oriented lists: enemy animation frames and enemy spawn points.

use std::path::PathBuf;

use glam::Vec2;

/// One `<frame> <direction> <path>` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameEntry {
    pub frame: u32,
    pub direction: u8,
    pub path: PathBuf,
}

/// Strip a BOM and a trailing `#` comment.
fn content(line: &str) -> &str {
    let line = line.trim_start_matches('\u{feff}');
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

pub fn parse_enemy_frames(text: &str) -> Vec<FrameEntry> {
    let mut out = Vec::new();
    for (n, raw) in text.lines().enumerate() {
        let line = content(raw);
        let mut it = line.split_whitespace();
        let (Some(f), Some(d), Some(p)) = (it.next(), it.next(), it.next()) else {
            if !line.trim().is_empty() {
                log::warn!("enemy frames line {}: expected `<frame> <dir> <path>`", n + 1);
            }
            continue;
        };
        match (f.parse::<u32>(), d.parse::<u8>()) {
            (Ok(frame), Ok(direction)) if direction < 8 => out.push(FrameEntry {
                frame,
                direction,
                path: PathBuf::from(p),
            }),
            _ => log::warn!("enemy frames line {}: bad frame/direction `{f} {d}`", n + 1),
        }
    }
    out
}

pub fn parse_enemy_spawns(text: &str) -> Vec<Vec2> {
    let mut out = Vec::new();
    for (n, raw) in text.lines().enumerate() {
        let line = content(raw).trim();
        if line.is_empty() {
            continue;
        }
        let mut it = line.split_whitespace().map(str::parse::<f32>);
        match (it.next(), it.next()) {
            (Some(Ok(x)), Some(Ok(y))) if x.is_finite() && y.is_finite() => {
                out.push(Vec2::new(x, y))
            }
            _ => log::warn!("enemy spawn line {}: invalid entry `{line}`", n + 1),
        }
    }
    out
}
