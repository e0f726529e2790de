//! Dungeon floor grid and the room primitive used while carving it.

use serde::{Deserialize, Serialize};

/// What a map cell has been carved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Solid rock; blocks movement and sight.
    Wall,
    /// Open dungeon floor.
    Floor,
    /// Staircase leading to the next floor down.
    DownStairs,
}

/// A single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Carved kind of this cell.
    pub kind: TileKind,
}

impl Tile {
    /// A solid wall tile.
    pub fn wall() -> Self {
        Self {
            kind: TileKind::Wall,
        }
    }

    /// An open floor tile.
    pub fn floor() -> Self {
        Self {
            kind: TileKind::Floor,
        }
    }

    /// The downward staircase tile.
    pub fn down_stairs() -> Self {
        Self {
            kind: TileKind::DownStairs,
        }
    }

    /// Whether an actor can stand on this tile.
    pub fn walkable(&self) -> bool {
        !matches!(self.kind, TileKind::Wall)
    }

    /// Whether sight passes through this tile.
    pub fn transparent(&self) -> bool {
        !matches!(self.kind, TileKind::Wall)
    }
}

/// One procedurally generated dungeon floor.
///
/// Tracks, per cell, the carved tile plus the two visibility layers the
/// renderer needs: what the player currently sees and what they have ever
/// seen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    /// Width of the grid in cells.
    pub width: i32,
    /// Height of the grid in cells.
    pub height: i32,
    tiles: Vec<Tile>,
    visible: Vec<bool>,
    explored: Vec<bool>,
    /// Location of the downward staircase.
    pub downstairs: (i32, i32),
}

impl GameMap {
    /// Create a map of the given size filled with solid wall.
    pub fn new(width: i32, height: i32) -> Self {
        let cells = (width * height).max(0) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::wall(); cells],
            visible: vec![false; cells],
            explored: vec![false; cells],
            downstairs: (0, 0),
        }
    }

    fn idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Whether the coordinate lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Tile at the coordinate; out-of-bounds reads as wall.
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        if self.in_bounds(x, y) {
            self.tiles[self.idx(x, y)]
        } else {
            Tile::wall()
        }
    }

    /// Overwrite the tile at the coordinate. Out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            let idx = self.idx(x, y);
            self.tiles[idx] = tile;
        }
    }

    /// Whether an actor can stand at the coordinate.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.tile(x, y).walkable()
    }

    /// Whether sight passes through the coordinate.
    pub fn is_transparent(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.tile(x, y).transparent()
    }

    /// Whether the cell is currently in the player's field of view.
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.visible[self.idx(x, y)]
    }

    /// Whether the cell has ever been seen.
    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.explored[self.idx(x, y)]
    }

    /// Mark a cell visible for the current frame and remember it as explored.
    pub fn reveal(&mut self, x: i32, y: i32) {
        if self.in_bounds(x, y) {
            let idx = self.idx(x, y);
            self.visible[idx] = true;
            self.explored[idx] = true;
        }
    }

    /// Reset the current-frame visibility layer.
    pub fn clear_visible(&mut self) {
        self.visible.fill(false);
    }

    /// Raw tile storage, row-major. Exposed for layout comparisons.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

/// Axis-aligned rectangular room used during carving.
///
/// Coordinates follow the convention that `x1/y1` and `x2/y2` are the outer
/// wall corners; `carve` digs the interior only, so adjacent rooms keep a
/// one-cell wall between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectRoom {
    /// Left wall column.
    pub x1: i32,
    /// Top wall row.
    pub y1: i32,
    /// Right wall column.
    pub x2: i32,
    /// Bottom wall row.
    pub y2: i32,
}

impl RectRoom {
    /// Build a room from its top-left corner and outer dimensions.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    /// Center cell of the room.
    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Whether this room overlaps another, walls included.
    pub fn intersects(&self, other: &RectRoom) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    /// Carve the interior of the room into the map.
    pub fn carve(&self, map: &mut GameMap) {
        for y in (self.y1 + 1)..self.y2 {
            for x in (self.x1 + 1)..self.x2 {
                map.set_tile(x, y, Tile::floor());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_map_is_solid_wall() {
        let map = GameMap::new(10, 10);
        assert!(!map.is_walkable(5, 5));
        assert!(!map.is_transparent(5, 5));
        assert!(!map.is_visible(5, 5));
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let map = GameMap::new(4, 4);
        assert_eq!(map.tile(-1, 0).kind, TileKind::Wall);
        assert_eq!(map.tile(0, 99).kind, TileKind::Wall);
        assert!(!map.is_walkable(99, 99));
    }

    #[test]
    fn reveal_marks_visible_and_explored() {
        let mut map = GameMap::new(4, 4);
        map.reveal(1, 2);
        assert!(map.is_visible(1, 2));
        assert!(map.is_explored(1, 2));
        map.clear_visible();
        assert!(!map.is_visible(1, 2));
        assert!(map.is_explored(1, 2));
    }

    #[test]
    fn room_carving_keeps_outer_walls() {
        let mut map = GameMap::new(12, 12);
        let room = RectRoom::new(2, 2, 6, 6);
        room.carve(&mut map);
        assert!(map.is_walkable(3, 3));
        assert!(map.is_walkable(7, 7));
        assert!(!map.is_walkable(2, 2));
        assert!(!map.is_walkable(8, 8));
    }

    #[test]
    fn room_intersection_detects_overlap_and_touch() {
        let a = RectRoom::new(0, 0, 5, 5);
        let b = RectRoom::new(4, 4, 5, 5);
        let c = RectRoom::new(6, 6, 3, 3);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }
}
