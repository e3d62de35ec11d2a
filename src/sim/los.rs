//! Grid line of sight.

use glam::Vec2;

use crate::world::{EMPTY, TileMap};

/// Walk the grid from `from` to `to` with the same DDA the wall caster uses.
///
/// Any non-empty cell on the way (walls and doors alike) blocks; leaving
/// the map blocks. Reaching the cell that contains `to` is a clear line.
pub fn line_of_sight(map: &TileMap, from: Vec2, to: Vec2) -> bool {
    let delta = to - from;
    let len = delta.length();
    if len < 1e-4 {
        return true;
    }
    let dir = delta / len;

    let (mut row, mut col) = TileMap::cell_of(from);
    let target = TileMap::cell_of(to);
    if (row, col) == target {
        return true;
    }

    let step_x = if dir.x < 0.0 { -1 } else { 1 };
    let step_y = if dir.y < 0.0 { -1 } else { 1 };
    let delta_x = if dir.x == 0.0 { 1e30 } else { (1.0 / dir.x).abs() };
    let delta_y = if dir.y == 0.0 { 1e30 } else { (1.0 / dir.y).abs() };

    let mut side_x = if dir.x < 0.0 {
        (from.x - col as f32) * delta_x
    } else {
        (col as f32 + 1.0 - from.x) * delta_x
    };
    let mut side_y = if dir.y < 0.0 {
        (from.y - row as f32) * delta_y
    } else {
        (row as f32 + 1.0 - from.y) * delta_y
    };

    // a ray can never need more steps than the grid has cells across
    let max_steps = map.width() + map.height() + 2;
    for _ in 0..max_steps {
        if side_x < side_y {
            side_x += delta_x;
            col += step_x;
        } else {
            side_y += delta_y;
            row += step_y;
        }

        match map.tile(row, col) {
            None => return false,
            Some(EMPTY) => {}
            Some(_) => return false,
        }
        if (row, col) == target {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> TileMap {
        TileMap::new(vec![
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 2, 0, 1],
            vec![1, 0, 0, 0, 0, 1],
            vec![1, 6, 1, 1, 1, 1],
            vec![1, 0, 1],
            vec![1, 1, 1],
        ])
    }

    #[test]
    fn clear_corridor() {
        let map = room();
        assert!(line_of_sight(&map, Vec2::new(1.5, 1.5), Vec2::new(4.5, 1.5)));
        assert!(line_of_sight(&map, Vec2::new(4.5, 1.5), Vec2::new(1.5, 1.5)));
    }

    #[test]
    fn pillar_blocks() {
        let map = room();
        assert!(!line_of_sight(&map, Vec2::new(2.5, 2.5), Vec2::new(4.5, 2.5)));
    }

    #[test]
    fn doors_block_sight() {
        let map = room();
        assert!(!line_of_sight(&map, Vec2::new(1.5, 3.5), Vec2::new(1.5, 5.5)));
    }

    #[test]
    fn same_cell_sees() {
        let map = room();
        assert!(line_of_sight(&map, Vec2::new(1.2, 1.2), Vec2::new(1.8, 1.7)));
    }

    #[test]
    fn outside_the_map_is_blind() {
        let map = room();
        assert!(!line_of_sight(&map, Vec2::new(1.5, 1.5), Vec2::new(-3.0, 1.5)));
    }
}
