//! Procedural floor generation: rooms-and-corridors carving plus spawns.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{templates, Actor, Item};
use crate::map::{GameMap, RectRoom, Tile};

/// Fixed generation parameters for one world.
///
/// `Default` carries the canonical values; the record is not exposed to any
/// user-facing configuration surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Map width in cells.
    pub map_width: i32,
    /// Map height in cells.
    pub map_height: i32,
    /// Smallest room edge, walls included.
    pub room_min_size: i32,
    /// Largest room edge, walls included.
    pub room_max_size: i32,
    /// Placement attempts per floor; overlapping attempts are discarded.
    pub max_rooms: i32,
    /// Upper bound on monsters spawned per room.
    pub max_monsters_per_room: i32,
    /// Upper bound on items spawned per room.
    pub max_items_per_room: i32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            map_width: 80,
            map_height: 43,
            room_min_size: 6,
            room_max_size: 10,
            max_rooms: 30,
            max_monsters_per_room: 2,
            max_items_per_room: 2,
        }
    }
}

/// Everything one `generate_floor` call produces.
#[derive(Debug, Clone)]
pub struct FloorBuild {
    /// The carved floor.
    pub map: GameMap,
    /// Where the player enters the floor.
    pub player_spawn: (i32, i32),
    /// Monsters placed on the floor.
    pub monsters: Vec<Actor>,
    /// Items placed on the floor.
    pub items: Vec<Item>,
}

/// The world generator: owns the fixed parameters and the floor counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameWorld {
    /// Generation parameters, fixed for the lifetime of the world.
    pub config: GenerationConfig,
    /// Number of floors generated so far.
    pub current_floor: u32,
}

impl GameWorld {
    /// Build a generator that has produced no floors yet.
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            current_floor: 0,
        }
    }

    /// Carve the next floor and populate it.
    ///
    /// The player enters at the center of the first room; the downward
    /// staircase sits at the center of the last. Rooms never overlap, and
    /// consecutive room centers are joined by L-shaped tunnels.
    pub fn generate_floor(&mut self, rng: &mut impl Rng) -> FloorBuild {
        self.current_floor += 1;
        let cfg = self.config;
        let mut map = GameMap::new(cfg.map_width, cfg.map_height);
        let mut rooms: Vec<RectRoom> = Vec::new();

        for _ in 0..cfg.max_rooms {
            let room_width = rng.gen_range(cfg.room_min_size..=cfg.room_max_size);
            let room_height = rng.gen_range(cfg.room_min_size..=cfg.room_max_size);
            let x = rng.gen_range(0..cfg.map_width - room_width - 1);
            let y = rng.gen_range(0..cfg.map_height - room_height - 1);
            let room = RectRoom::new(x, y, room_width, room_height);

            if rooms.iter().any(|other| room.intersects(other)) {
                continue;
            }
            room.carve(&mut map);
            if let Some(previous) = rooms.last() {
                tunnel_between(&mut map, rng, previous.center(), room.center());
            }
            rooms.push(room);
        }

        // Degenerate RNG streaks could reject every attempt; the floor must
        // still have somewhere for the player to stand.
        if rooms.is_empty() {
            let fallback = RectRoom::new(
                cfg.map_width / 2 - cfg.room_min_size / 2,
                cfg.map_height / 2 - cfg.room_min_size / 2,
                cfg.room_min_size,
                cfg.room_min_size,
            );
            fallback.carve(&mut map);
            rooms.push(fallback);
        }

        let player_spawn = rooms[0].center();
        let stairs = rooms[rooms.len() - 1].center();
        map.set_tile(stairs.0, stairs.1, Tile::down_stairs());
        map.downstairs = stairs;

        let mut monsters = Vec::new();
        let mut items = Vec::new();
        for room in rooms.iter().skip(1) {
            self.populate_room(rng, room, player_spawn, &mut monsters, &mut items);
        }

        debug!(
            floor = self.current_floor,
            rooms = rooms.len(),
            monsters = monsters.len(),
            items = items.len(),
            "floor generated"
        );

        FloorBuild {
            map,
            player_spawn,
            monsters,
            items,
        }
    }

    fn populate_room(
        &self,
        rng: &mut impl Rng,
        room: &RectRoom,
        player_spawn: (i32, i32),
        monsters: &mut Vec<Actor>,
        items: &mut Vec<Item>,
    ) {
        let monster_count = rng.gen_range(0..=self.config.max_monsters_per_room);
        for _ in 0..monster_count {
            let (x, y) = random_interior_cell(rng, room);
            if (x, y) == player_spawn || monsters.iter().any(|m| m.pos() == (x, y)) {
                continue;
            }
            let mut monster = if rng.gen_bool(0.8) {
                templates::ORC.clone()
            } else {
                templates::TROLL.clone()
            };
            monster.place(x, y);
            monsters.push(monster);
        }

        let item_count = rng.gen_range(0..=self.config.max_items_per_room);
        for _ in 0..item_count {
            let (x, y) = random_interior_cell(rng, room);
            if (x, y) == player_spawn || items.iter().any(|i| (i.x, i.y) == (x, y)) {
                continue;
            }
            let mut item = templates::HEALING_DRAUGHT.clone();
            item.x = x;
            item.y = y;
            items.push(item);
        }
    }
}

fn random_interior_cell(rng: &mut impl Rng, room: &RectRoom) -> (i32, i32) {
    (
        rng.gen_range(room.x1 + 1..room.x2),
        rng.gen_range(room.y1 + 1..room.y2),
    )
}

fn tunnel_between(map: &mut GameMap, rng: &mut impl Rng, from: (i32, i32), to: (i32, i32)) {
    let (x1, y1) = from;
    let (x2, y2) = to;
    // Randomly pick which leg of the L runs first.
    let corner = if rng.gen_bool(0.5) {
        (x2, y1)
    } else {
        (x1, y2)
    };

    carve_segment(map, from, corner);
    carve_segment(map, corner, to);
}

/// Carve a straight horizontal or vertical run of floor, endpoints included.
fn carve_segment(map: &mut GameMap, a: (i32, i32), b: (i32, i32)) {
    if a.1 == b.1 {
        for x in a.0.min(b.0)..=a.0.max(b.0) {
            map.set_tile(x, a.1, Tile::floor());
        }
    } else {
        for y in a.1.min(b.1)..=a.1.max(b.1) {
            map.set_tile(a.0, y, Tile::floor());
        }
    }
}
