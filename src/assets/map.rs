//! Text tile maps.
//!
//! One grid row per line, whitespace-separated tokens. Integers are tile
//! values; the letters `B R G K P S` drop a pickup and leave the tile empty.
//!
//! ```text
//! 3 3 3 3
//! 3 0 B 3
//! 3 7 3 3
//! ```

use std::{fs, io, path::Path};

use thiserror::Error;

use crate::{
    defs::PickupKind,
    world::{EMPTY, PickupSpawn, TileValue},
};

#[derive(Error, Debug)]
pub enum MapError {
    #[error("cannot read map `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("map `{0}` has no rows")]
    Empty(String),
}

/// Parsed map file before door records are built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapData {
    pub rows: Vec<Vec<TileValue>>,
    pub pickups: Vec<PickupSpawn>,
}

/// Parse a map. Unreadable tokens are logged and become empty tiles so
/// the remaining columns keep their position.
pub fn parse_map(text: &str) -> MapData {
    let mut out = MapData::default();

    for (row_idx, line) in text.lines().enumerate() {
        let mut row = Vec::new();
        for token in line.split_whitespace() {
            let col_idx = row.len() as i32;
            if let Some(kind) = PickupKind::from_marker(token) {
                out.pickups.push(PickupSpawn {
                    kind,
                    row: row_idx as i32,
                    col: col_idx,
                });
                row.push(EMPTY);
                continue;
            }
            match token.parse::<TileValue>() {
                Ok(value) => row.push(value),
                Err(_) => {
                    log::warn!(
                        "map line {}: bad token `{token}` at column {col_idx}, using empty tile",
                        row_idx + 1
                    );
                    row.push(EMPTY);
                }
            }
        }
        out.rows.push(row);
    }

    // trailing blank lines only add empty rows at the bottom
    while out.rows.last().is_some_and(Vec::is_empty) {
        out.rows.pop();
    }
    out
}

/// Read and parse a map file. Only I/O and an empty grid are errors.
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<MapData, MapError> {
    let path = path.as_ref();
    let text = read(path)?;
    let data = parse_map(&text);
    if data.rows.is_empty() {
        return Err(MapError::Empty(path.display().to_string()));
    }
    Ok(data)
}

/// Optional layer file; absent means "every tile uses slot 0".
pub fn load_layer<P: AsRef<Path>>(path: P) -> Result<Option<Vec<Vec<TileValue>>>, MapError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(parse_layer(&read(path)?)))
}

fn read(path: &Path) -> Result<String, MapError> {
    fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Parse a floor or ceiling layer: same grid layout, integers only.
pub fn parse_layer(text: &str) -> Vec<Vec<TileValue>> {
    text.lines()
        .enumerate()
        .map(|(row_idx, line)| {
            line.split_whitespace()
                .map(|tok| {
                    tok.parse::<TileValue>().unwrap_or_else(|_| {
                        log::warn!("layer line {}: bad token `{tok}`", row_idx + 1);
                        0
                    })
                })
                .collect()
        })
        .collect()
}
