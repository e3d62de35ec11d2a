//! Engine tunables.
//!
//! Everything has a default, so an empty (or missing) TOML file yields a
//! playable setup. Unknown keys are ignored.
//!
//! ```toml
//! screen_width = 1024
//! fov_deg = 66.0
//! seed = 7
//!
//! [enemy]
//! attack_chance_divisor = 3
//! ```

use std::{fs, io, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::defs::WeaponId;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /* screen */
    pub screen_width: usize,
    pub screen_height: usize,
    pub fov_deg: f32,
    pub max_light_dist: f32,
    /// Eye height used by the floor/ceiling projection (0.5 = mid wall).
    pub player_height: f32,

    /* player */
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub spawn_angle: f32,
    pub player_health: i32,
    pub player_speed: f32,
    /// Half edge of the player's collision square.
    pub player_square_size: f32,
    pub mouse_sensitivity: f32,
    /// Radians per frame while a turn key is held.
    pub rotation_sensitivity: f32,
    pub starting_weapons: Vec<u8>,
    pub key_radius: f32,
    pub weapon_radius: f32,

    /* world */
    pub door_open_speed: f32,
    pub knife_range: f32,
    pub pistol_range: f32,
    pub rifle_range: f32,

    /* loop */
    pub target_fps: usize,
    /// Upper bound on one integration step, in seconds.
    pub max_frame_dt: f32,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,

    pub enemy: EnemyConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Edge of the enemy's collision square.
    pub size: f32,
    pub speed: f32,
    pub health: i32,
    /// Seconds each animation frame stays on screen.
    pub duration_per_sprite: f32,
    /// Seconds between two decisions.
    pub think_interval: f32,
    pub attack_chance_divisor: u32,
    pub pain_chance_divisor: u32,
    pub shoot_duration: f32,
    pub pain_duration: f32,
    pub base_damage: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            fov_deg: 60.0,
            max_light_dist: 8.0,
            player_height: 0.5,

            spawn_x: 1.5,
            spawn_y: 1.5,
            spawn_angle: 0.0,
            player_health: 100,
            player_speed: 2.5,
            player_square_size: 0.25,
            mouse_sensitivity: 0.003,
            rotation_sensitivity: 0.04,
            starting_weapons: vec![1],
            key_radius: 0.5,
            weapon_radius: 0.5,

            door_open_speed: 1.5,
            knife_range: 0.5,
            pistol_range: 16.0,
            rifle_range: 32.0,

            target_fps: 60,
            max_frame_dt: 0.1,
            seed: None,

            enemy: EnemyConfig::default(),
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: 0.5,
            speed: 1.2,
            health: 100,
            duration_per_sprite: 0.25,
            think_interval: 0.5,
            attack_chance_divisor: 4,
            pain_chance_divisor: 2,
            shoot_duration: 0.5,
            pain_duration: 0.3,
            base_damage: 8,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Like [`from_file`](Self::from_file) but a missing file means defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_deg.to_radians()
    }

    pub fn weapon_range(&self, id: WeaponId) -> f32 {
        match id {
            WeaponId::Knife => self.knife_range,
            WeaponId::Pistol => self.pistol_range,
            WeaponId::Rifle => self.rifle_range,
        }
    }
}
