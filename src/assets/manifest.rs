//! Texture manifest: INI-like sections listing image paths in load order.
//!
//! ```text
//! [walls]
//! textures/brick.png
//! # comment
//! [ceilings]
//! textures/ceil.png
//! ```

use std::{fs, io, path::Path, path::PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("cannot read texture manifest `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Walls,
    Floors,
    Ceilings,
    Keys,
    Weapons,
}

impl Section {
    /// Case-insensitive header name without brackets.
    fn from_header(name: &str) -> Option<Section> {
        Some(match name.to_ascii_lowercase().as_str() {
            "walls" => Section::Walls,
            "floors" => Section::Floors,
            "ceils" | "ceil" | "ceilings" => Section::Ceilings,
            "keys" => Section::Keys,
            "weapons" => Section::Weapons,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextureManifest {
    pub walls: Vec<PathBuf>,
    pub floors: Vec<PathBuf>,
    pub ceilings: Vec<PathBuf>,
    pub keys: Vec<PathBuf>,
    pub weapons: Vec<PathBuf>,
}

impl TextureManifest {
    fn section_mut(&mut self, s: Section) -> &mut Vec<PathBuf> {
        match s {
            Section::Walls => &mut self.walls,
            Section::Floors => &mut self.floors,
            Section::Ceilings => &mut self.ceilings,
            Section::Keys => &mut self.keys,
            Section::Weapons => &mut self.weapons,
        }
    }
}

pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<TextureManifest, ManifestError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_manifest(&text))
}

pub fn parse_manifest(text: &str) -> TextureManifest {
    static HEADER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\[\s*([A-Za-z]+)\s*\]$").expect("static header regex"));

    let mut out = TextureManifest::default();
    let mut current: Option<Section> = None;

    for (n, raw) in text.lines().enumerate() {
        let line = raw.trim_start_matches('\u{feff}').trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(caps) = HEADER.captures(line) {
            current = Section::from_header(&caps[1]);
            if current.is_none() {
                log::warn!("manifest line {}: unknown section {line}", n + 1);
            }
            continue;
        }

        match current {
            Some(section) => out.section_mut(section).push(PathBuf::from(line)),
            None => log::warn!("manifest line {}: path outside any section: {line}", n + 1),
        }
    }
    out
}
