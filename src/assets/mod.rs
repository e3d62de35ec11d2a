//! Level files on disk: tile maps, texture manifest, enemy lists, images.
//!
//! Parsers are line tolerant. A bad line is logged and skipped; only I/O
//! failure on a required file surfaces as an error.

pub mod lists;
pub mod loader;
pub mod manifest;
pub mod map;

pub use lists::{FrameEntry, parse_enemy_frames, parse_enemy_spawns};
pub use loader::{AssetError, decode_texture, load_level_assets};
pub use manifest::{ManifestError, TextureManifest, load_manifest, parse_manifest};
pub use map::{MapData, MapError, load_layer, load_map, parse_layer, parse_map};
