use std::collections::HashMap;

use glam::Vec2;

use crate::defs::{KeyKind, PickupKind};

/// `(row, col)`; row grows south, col grows east.
pub type TileCoord = (i32, i32);

/// Raw cell value of the tile grid.
///
/// * `0` empty
/// * `1..=5` solid wall, texture `value − 1`
/// * `6..=9` door: unlocked, blue, red, green lock
pub type TileValue = u8;

pub const EMPTY: TileValue = 0;
pub const FIRST_DOOR: TileValue = 6;
pub const LAST_DOOR: TileValue = 9;

#[inline]
pub fn is_door(tile: TileValue) -> bool {
    (FIRST_DOOR..=LAST_DOOR).contains(&tile)
}

/*----------------------------- doors --------------------------------*/

/// Sliding door living in one tile.
///
/// `open_amount` only ever grows; doors never close again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Door {
    /// Fraction slid into the pocket, `0.0 ..= 1.0`.
    pub open_amount: f32,
    /// Currently animating towards fully open.
    pub opening: bool,
    /// Key needed to start it; `None` opens for everyone.
    pub lock: Option<KeyKind>,
}

impl Door {
    /// Door record for a door tile value, `None` for anything else.
    pub fn for_tile(tile: TileValue) -> Option<Door> {
        if !is_door(tile) {
            return None;
        }
        Some(Door {
            open_amount: 0.0,
            opening: false,
            lock: KeyKind::from_type(tile - FIRST_DOOR),
        })
    }

    /// `0` for unlocked doors, `1..=3` for the key kind otherwise.
    #[inline]
    pub fn key_type(&self) -> u8 {
        self.lock.map_or(0, KeyKind::key_type)
    }

    /// Walkers may enter once the door is more than half open.
    #[inline]
    pub fn is_passable(&self) -> bool {
        self.open_amount > 0.5
    }

    /// A ray hitting the slab at `local` (0..1 along the face) is stopped.
    #[inline]
    pub fn blocks_ray(&self, local: f32) -> bool {
        local >= self.open_amount
    }

    /// Begin the slide if the door has never moved. Returns whether it started.
    pub fn start_opening(&mut self) -> bool {
        if self.open_amount == 0.0 && !self.opening {
            self.opening = true;
            return true;
        }
        false
    }

    /// Integrate the slide by `dt` seconds at `speed` (fraction per second).
    pub fn advance(&mut self, dt: f32, speed: f32) {
        if !self.opening {
            return;
        }
        self.open_amount += speed * dt.max(0.0);
        if self.open_amount >= 1.0 {
            self.open_amount = 1.0;
            self.opening = false;
        }
    }
}

/*---------------------------- tile map ------------------------------*/

/// Tile grid plus the door records keyed by their tile.
///
/// Rows may differ in length; every access is bounds-checked and an
/// out-of-range cell reads as `None`.
#[derive(Clone, Debug, Default)]
pub struct TileMap {
    rows: Vec<Vec<TileValue>>,
    floor: Option<Vec<Vec<TileValue>>>,
    ceil: Option<Vec<Vec<TileValue>>>,
    doors: HashMap<TileCoord, Door>,
}

impl TileMap {
    /// Build the grid and one closed [`Door`] per door tile.
    pub fn new(rows: Vec<Vec<TileValue>>) -> Self {
        let mut doors = HashMap::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, &tile) in row.iter().enumerate() {
                if let Some(door) = Door::for_tile(tile) {
                    doors.insert((r as i32, c as i32), door);
                }
            }
        }
        Self {
            rows,
            floor: None,
            ceil: None,
            doors,
        }
    }

    /// Attach optional per-tile floor / ceiling texture layers.
    pub fn with_layers(
        mut self,
        floor: Option<Vec<Vec<TileValue>>>,
        ceil: Option<Vec<Vec<TileValue>>>,
    ) -> Self {
        self.floor = floor;
        self.ceil = ceil;
        self
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[inline]
    pub fn row_len(&self, row: i32) -> usize {
        usize::try_from(row)
            .ok()
            .and_then(|r| self.rows.get(r))
            .map_or(0, Vec::len)
    }

    #[inline]
    pub fn tile(&self, row: i32, col: i32) -> Option<TileValue> {
        layer_get(&self.rows, row, col)
    }

    /// Tile coordinate containing world point `p`.
    #[inline]
    pub fn cell_of(p: Vec2) -> TileCoord {
        (p.y.floor() as i32, p.x.floor() as i32)
    }

    pub fn door_at(&self, row: i32, col: i32) -> Option<&Door> {
        self.doors.get(&(row, col))
    }

    pub fn door_at_mut(&mut self, row: i32, col: i32) -> Option<&mut Door> {
        self.doors.get_mut(&(row, col))
    }

    pub fn doors(&self) -> impl Iterator<Item = (&TileCoord, &Door)> {
        self.doors.iter()
    }

    /// Empty tiles and doors more than half open can be entered.
    /// The rule is the same for the player and for enemies.
    pub fn is_passable(&self, row: i32, col: i32) -> bool {
        match self.tile(row, col) {
            Some(EMPTY) => true,
            Some(t) if is_door(t) => self.door_at(row, col).is_some_and(Door::is_passable),
            _ => false,
        }
    }

    /// Advance every opening door.
    pub fn advance_doors(&mut self, dt: f32, speed: f32) {
        for door in self.doors.values_mut() {
            door.advance(dt, speed);
        }
    }

    /// Index into the floor texture list for this tile (0 without a layer).
    pub fn floor_texture(&self, row: i32, col: i32) -> usize {
        texture_slot(self.floor.as_deref(), row, col)
    }

    /// Index into the ceiling texture list for this tile (0 without a layer).
    pub fn ceiling_texture(&self, row: i32, col: i32) -> usize {
        texture_slot(self.ceil.as_deref(), row, col)
    }
}

#[inline]
fn layer_get(layer: &[Vec<TileValue>], row: i32, col: i32) -> Option<TileValue> {
    let r = usize::try_from(row).ok()?;
    let c = usize::try_from(col).ok()?;
    layer.get(r)?.get(c).copied()
}

fn texture_slot(layer: Option<&[Vec<TileValue>]>, row: i32, col: i32) -> usize {
    match layer.and_then(|l| layer_get(l, row, col)) {
        Some(v) if v > 0 => v as usize - 1,
        _ => 0,
    }
}

/*------------------------- boxes & templates ------------------------*/

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Square of edge `2 * half` centred on `center`.
    #[inline]
    pub fn around(center: Vec2, half: f32) -> Aabb {
        Aabb {
            min: center - Vec2::splat(half),
            max: center + Vec2::splat(half),
        }
    }

    /// Strict overlap; touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Pickup marker found in the map file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSpawn {
    pub kind: PickupKind,
    pub row: i32,
    pub col: i32,
}

impl PickupSpawn {
    /// Centre of the tile the marker sat on.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.col as f32 + 0.5, self.row as f32 + 0.5)
    }
}

/// Immutable snapshot of one level as loaded from disk.
///
/// The simulation clones the map out of it on every (re)start, so doors
/// always begin closed and pickups always begin present.
#[derive(Clone, Debug, Default)]
pub struct Level {
    pub name: String,
    pub map: TileMap,
    pub pickups: Vec<PickupSpawn>,
    pub enemy_spawns: Vec<Vec2>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> TileMap {
        TileMap::new(vec![
            vec![3, 3],
            vec![3, 6, 3],
            vec![3, 0, 3],
            vec![3, 3, 3],
        ])
    }

    #[test]
    fn doors_are_created_for_door_tiles_only() {
        let map = corridor();
        assert_eq!(map.doors().count(), 1);
        let door = map.door_at(1, 1).unwrap();
        assert_eq!(door.lock, None);
        assert_eq!(door.open_amount, 0.0);
    }

    #[test]
    fn lock_kind_follows_tile_value() {
        assert_eq!(Door::for_tile(6).unwrap().key_type(), 0);
        assert_eq!(Door::for_tile(7).unwrap().lock, Some(KeyKind::Blue));
        assert_eq!(Door::for_tile(8).unwrap().lock, Some(KeyKind::Red));
        assert_eq!(Door::for_tile(9).unwrap().lock, Some(KeyKind::Green));
        assert!(Door::for_tile(5).is_none());
    }

    #[test]
    fn ragged_rows_and_negative_indices_are_out_of_bounds() {
        let map = corridor();
        assert_eq!(map.tile(0, 2), None);
        assert_eq!(map.tile(1, 2), Some(3));
        assert_eq!(map.tile(-1, 0), None);
        assert_eq!(map.tile(0, -1), None);
        assert_eq!(map.tile(4, 0), None);
        assert!(!map.is_passable(-1, -1));
        assert_eq!(map.width(), 3);
    }

    #[test]
    fn door_becomes_passable_past_half_open() {
        let mut map = corridor();
        assert!(!map.is_passable(1, 1));
        assert!(map.door_at_mut(1, 1).unwrap().start_opening());
        map.advance_doors(0.3, 1.5);
        assert!(!map.is_passable(1, 1));
        map.advance_doors(0.1, 1.5);
        assert!(map.is_passable(1, 1));
    }

    #[test]
    fn door_open_amount_is_monotonic_and_clamped() {
        let mut door = Door::for_tile(6).unwrap();
        door.start_opening();
        let mut last = door.open_amount;
        for _ in 0..100 {
            door.advance(0.05, 1.5);
            assert!(door.open_amount >= last);
            assert!((0.0..=1.0).contains(&door.open_amount));
            last = door.open_amount;
        }
        assert_eq!(door.open_amount, 1.0);
        assert!(!door.opening);
        // a fully open door never restarts
        assert!(!door.start_opening());
    }

    #[test]
    fn layers_select_texture_slots() {
        let map = TileMap::new(vec![vec![0, 0]]).with_layers(Some(vec![vec![0, 3]]), None);
        assert_eq!(map.floor_texture(0, 0), 0);
        assert_eq!(map.floor_texture(0, 1), 2);
        assert_eq!(map.ceiling_texture(0, 1), 0);
    }

    #[test]
    fn aabb_overlap_is_strict() {
        let a = Aabb::around(Vec2::new(1.0, 1.0), 0.5);
        let b = Aabb::around(Vec2::new(2.0, 1.0), 0.5);
        let c = Aabb::around(Vec2::new(1.8, 1.2), 0.5);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }
}
