// ──────────────────────────────────────────────────────────────────────────
// assets/loader.rs
//
//  *   config/map.txt  (+ floor.txt, ceil.txt)  ──╮
//  *   config/textureMapping.txt                  │   --->  world::Level
//  *   config/enemyFrames.txt                     │          + WorldTextures
//  *   config/enemies.txt                       ──╯
//
//  Image paths in the manifest and frame list are relative to the asset root.
// ──────────────────────────────────────────────────────────────────────────

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    assets::{
        lists::{parse_enemy_frames, parse_enemy_spawns},
        manifest::{ManifestError, load_manifest},
        map::{MapError, load_layer, load_map},
    },
    world::{Level, SpriteSkins, Texture, TextureBank, TextureError, TextureId, TileMap, WorldTextures},
};

pub const MAP_FILE: &str = "config/map.txt";
pub const FLOOR_FILE: &str = "config/floor.txt";
pub const CEIL_FILE: &str = "config/ceil.txt";
pub const MANIFEST_FILE: &str = "config/textureMapping.txt";
pub const ENEMY_FRAMES_FILE: &str = "config/enemyFrames.txt";
pub const ENEMY_SPAWNS_FILE: &str = "config/enemies.txt";

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum AssetError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("cannot read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Load everything a level needs from the asset directory `root`.
///
/// Only an unreadable map is fatal. A missing manifest, frame list or spawn
/// list just means "none"; an image that fails to decode leaves its slot
/// empty and the draws that would use it are skipped.
pub fn load_level_assets<P: AsRef<Path>>(root: P) -> Result<(Level, WorldTextures), AssetError> {
    let root = root.as_ref();

    /*----- 1. Grid, layers, pickups -------------------------------------*/
    let data = load_map(root.join(MAP_FILE))?;
    let floor = load_layer(root.join(FLOOR_FILE))?;
    let ceil = load_layer(root.join(CEIL_FILE))?;
    let map = TileMap::new(data.rows).with_layers(floor, ceil);

    /*----- 2. Enemies ---------------------------------------------------*/
    let enemy_spawns = match read_optional(&root.join(ENEMY_SPAWNS_FILE))? {
        Some(text) => parse_enemy_spawns(&text),
        None => Vec::new(),
    };

    let level = Level {
        name: root.display().to_string(),
        map,
        pickups: data.pickups,
        enemy_spawns,
    };

    /*----- 3. Textures --------------------------------------------------*/
    let mut tex = WorldTextures::default();
    let manifest_path = root.join(MANIFEST_FILE);
    if manifest_path.exists() {
        let manifest = load_manifest(&manifest_path)?;
        tex.walls = load_slots(&mut tex.bank, root, &manifest.walls);
        tex.floors = load_slots(&mut tex.bank, root, &manifest.floors);
        tex.ceilings = load_slots(&mut tex.bank, root, &manifest.ceilings);
        tex.skins.keys = first_three(load_slots(&mut tex.bank, root, &manifest.keys));
        tex.skins.weapons = first_three(load_slots(&mut tex.bank, root, &manifest.weapons));
    } else {
        log::warn!("no texture manifest at {}", manifest_path.display());
    }

    if let Some(text) = read_optional(&root.join(ENEMY_FRAMES_FILE))? {
        load_enemy_frames(&mut tex.bank, root, &text, &mut tex.skins);
    }

    log::info!(
        "loaded level {} ({}x{}, {} pickups, {} enemies, {} textures)",
        level.name,
        level.map.width(),
        level.map.height(),
        level.pickups.len(),
        level.enemy_spawns.len(),
        tex.bank.len()
    );
    Ok((level, tex))
}

/// Decode an image file into an ARGB texture named after `name`.
pub fn decode_texture(path: &Path, name: &str) -> Result<Texture, TextureError> {
    let img = image::open(path)
        .map_err(|source| TextureError::Decode {
            path: path.display().to_string(),
            source,
        })?
        .to_rgba8();

    let (w, h) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            u32::from(a) << 24 | u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b)
        })
        .collect();

    Ok(Texture {
        name: name.to_string(),
        w: w as usize,
        h: h as usize,
        pixels,
    })
}

/*====================================================================*/
/*                       Internal helpers                             */
/*====================================================================*/

fn read_optional(path: &Path) -> Result<Option<String>, AssetError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(AssetError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Load one bank entry per path, keeping list positions stable.
fn load_slots(bank: &mut TextureBank, root: &Path, paths: &[PathBuf]) -> Vec<Option<TextureId>> {
    paths.iter().map(|rel| load_one(bank, root, rel)).collect()
}

fn load_one(bank: &mut TextureBank, root: &Path, rel: &Path) -> Option<TextureId> {
    let name = rel.to_string_lossy().into_owned();
    let full = root.join(rel);
    match bank.insert_or_get(name.as_str(), || decode_texture(&full, &name)) {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("skipping texture: {e}");
            None
        }
    }
}

fn first_three(slots: Vec<Option<TextureId>>) -> [Option<TextureId>; 3] {
    let mut out = [None; 3];
    for (dst, src) in out.iter_mut().zip(slots) {
        *dst = src;
    }
    out
}

fn load_enemy_frames(bank: &mut TextureBank, root: &Path, text: &str, skins: &mut SpriteSkins) {
    for entry in parse_enemy_frames(text) {
        if let Some(id) = load_one(bank, root, &entry.path) {
            skins.enemy_frames.insert((entry.frame, entry.direction), id);
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::NO_TEXTURE;

    fn write(root: &Path, rel: &str, text: &str) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, text).unwrap();
    }

    fn write_png(root: &Path, rel: &str, rgba: [u8; 4]) {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        image::RgbaImage::from_pixel(4, 2, image::Rgba(rgba))
            .save(p)
            .unwrap();
    }

    #[test]
    fn png_decodes_to_argb() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "t.png", [0x11, 0x22, 0x33, 0xFF]);
        let tex = decode_texture(&dir.path().join("t.png"), "t").unwrap();
        assert_eq!((tex.w, tex.h), (4, 2));
        assert_eq!(tex.pixels[0], 0xFF11_2233);
    }

    #[test]
    fn full_level_with_one_broken_texture() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, MAP_FILE, "1 1 1\n1 B 1\n1 1 1\n");
        write(root, FLOOR_FILE, "0 0 0\n0 2 0\n0 0 0\n");
        write(
            root,
            MANIFEST_FILE,
            "[walls]\ntex/wall.png\ntex/missing.png\n[floors]\ntex/wall.png\n[keys]\ntex/key.png\n",
        );
        write(root, ENEMY_FRAMES_FILE, "0 0 tex/guard.png\n0 9 tex/guard.png\n");
        write(root, ENEMY_SPAWNS_FILE, "1.5 1.5\n");
        write_png(root, "tex/wall.png", [200, 0, 0, 255]);
        write_png(root, "tex/key.png", [0, 0, 200, 255]);
        write_png(root, "tex/guard.png", [0, 200, 0, 0]);

        let (level, tex) = load_level_assets(root).unwrap();

        assert_eq!(level.map.tile(1, 1), Some(0));
        assert_eq!(level.map.floor_texture(1, 1), 1);
        assert_eq!(level.pickups.len(), 1);
        assert_eq!(level.enemy_spawns.len(), 1);

        // the broken file keeps its slot
        assert_eq!(tex.walls.len(), 2);
        assert!(tex.walls[0].is_some());
        assert!(tex.walls[1].is_none());
        // the same file listed twice is decoded once
        assert_eq!(tex.floors[0], tex.walls[0]);
        assert!(tex.skins.keys[0].is_some());
        assert!(tex.skins.keys[1].is_none());
        assert_eq!(tex.skins.enemy_frames.len(), 1);
        assert_ne!(tex.skins.enemy_frames[&(0, 0)], NO_TEXTURE);
        assert!(tex.wall(1).is_some());
        assert!(tex.wall(2).is_none());
    }

    #[test]
    fn map_alone_is_enough() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), MAP_FILE, "1 1\n1 0\n");
        let (level, tex) = load_level_assets(dir.path()).unwrap();
        assert_eq!(level.map.height(), 2);
        assert!(level.enemy_spawns.is_empty());
        assert!(tex.walls.is_empty());
        assert!(!tex.has_floor());
    }

    #[test]
    fn missing_map_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_level_assets(dir.path()),
            Err(AssetError::Map(MapError::Io { .. }))
        ));
    }
}
