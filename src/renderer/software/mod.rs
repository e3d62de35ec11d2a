mod planes;
mod renderer;
mod sprites;
mod walls;

pub use planes::PlaneColumn;
pub use renderer::Software;
pub use sprites::{ProjectedSprite, SpriteColumn, project};
pub use walls::{RayHit, brightness, cast_ray, modulate, texture_column};
