//! Grid raycasting engine: tile maps with sliding doors, a column
//! software renderer, billboard sprites, hitscan weapons and simple
//! enemy agents.

pub mod assets;
pub mod config;
pub mod defs;
pub mod game;
pub mod renderer;
pub mod sim;
pub mod world;
