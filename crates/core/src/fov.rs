//! Field-of-view computation over a dungeon floor.

use crate::map::GameMap;

/// Sight radius used for the player, in cells.
pub const DEFAULT_RADIUS: i32 = 8;

/// Recompute visibility around `origin`.
///
/// Clears the previous frame's visibility layer, then marks every cell
/// within `radius` that has an unobstructed Bresenham line from the origin.
/// The first opaque cell along a line is itself revealed (walls are seen),
/// but nothing behind it. Explored state accumulates across calls.
pub fn compute(map: &mut GameMap, origin: (i32, i32), radius: i32) {
    map.clear_visible();
    let (ox, oy) = origin;
    map.reveal(ox, oy);

    for y in (oy - radius)..=(oy + radius) {
        for x in (ox - radius)..=(ox + radius) {
            if !map.in_bounds(x, y) {
                continue;
            }
            let (dx, dy) = (x - ox, y - oy);
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            cast_line(map, (ox, oy), (x, y));
        }
    }
}

fn cast_line(map: &mut GameMap, from: (i32, i32), to: (i32, i32)) {
    for (x, y) in bresenham(from, to) {
        map.reveal(x, y);
        if !map.is_transparent(x, y) {
            break;
        }
    }
}

/// Cells along the line from `from` to `to`, excluding the start cell.
fn bresenham(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = from;
    let (x1, y1) = to;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut cells = Vec::new();
    while (x, y) != (x1, y1) {
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        cells.push((x, y));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{RectRoom, Tile};

    fn open_map(size: i32) -> GameMap {
        let mut map = GameMap::new(size, size);
        RectRoom::new(0, 0, size - 1, size - 1).carve(&mut map);
        map
    }

    #[test]
    fn origin_is_always_visible() {
        let mut map = GameMap::new(5, 5);
        compute(&mut map, (2, 2), 3);
        assert!(map.is_visible(2, 2));
    }

    #[test]
    fn open_cells_within_radius_are_visible() {
        let mut map = open_map(20);
        compute(&mut map, (10, 10), 4);
        assert!(map.is_visible(13, 10));
        assert!(map.is_visible(10, 7));
        assert!(!map.is_visible(10, 2));
    }

    #[test]
    fn walls_block_sight_but_are_seen_themselves() {
        let mut map = open_map(20);
        for y in 1..19 {
            map.set_tile(12, y, Tile::wall());
        }
        compute(&mut map, (10, 10), 6);
        assert!(map.is_visible(12, 10));
        assert!(!map.is_visible(14, 10));
    }

    #[test]
    fn exploration_persists_across_recomputes() {
        let mut map = open_map(20);
        compute(&mut map, (5, 5), 4);
        assert!(map.is_visible(7, 5));
        compute(&mut map, (15, 15), 4);
        assert!(!map.is_visible(7, 5));
        assert!(map.is_explored(7, 5));
    }
}
