//! Mutable game state and the per-frame systems that advance it.

mod collision;
mod components;
pub mod enemy;
mod los;
pub mod player;
mod runner;
pub mod sprites;
mod systems;
pub mod weapon;

pub use collision::{MoveResult, slide_move};
pub use components::{Body, InputFrame, Position, SpriteId};
pub use enemy::{Enemy, EnemyState, StateKind, direction_index};
pub use los::line_of_sight;
pub use player::{DoorOutcome, FireOutcome, Player};
pub use runner::{SimEvent, SimRunner};
pub use sprites::{Sprite, SpriteIndex, SpriteKind};
pub use weapon::WeaponRecord;
