//! The running game session: player, current floor, and the message log.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::{Actor, Item};
use crate::fov;
use crate::map::GameMap;
use crate::messages::{MessageLog, Tone};
use crate::worldgen::{FloorBuild, GameWorld};

/// Everything that makes up one playable session.
///
/// An `Engine` is created by the session factory for a new game or
/// reconstructed whole from a save file; either way it is immediately
/// playable once [`Engine::update_fov`] has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    /// The player character.
    pub player: Actor,
    /// Floor generator and floor counter.
    pub world: GameWorld,
    /// The current floor.
    pub map: GameMap,
    /// Monsters on the current floor.
    pub monsters: Vec<Actor>,
    /// Items on the current floor.
    pub items: Vec<Item>,
    /// Message log, carried across floors.
    pub log: MessageLog,
    /// Player turns taken this session.
    pub turn: u64,
}

impl Engine {
    /// Assemble a session from a freshly generated floor.
    pub fn from_build(mut player: Actor, world: GameWorld, build: FloorBuild) -> Self {
        player.place(build.player_spawn.0, build.player_spawn.1);
        Self {
            player,
            world,
            map: build.map,
            monsters: build.monsters,
            items: build.items,
            log: MessageLog::new(),
            turn: 0,
        }
    }

    /// Recompute the visibility layer around the player.
    pub fn update_fov(&mut self) {
        fov::compute(&mut self.map, self.player.pos(), fov::DEFAULT_RADIUS);
    }

    /// The living monster at a cell, if any.
    pub fn monster_at(&self, x: i32, y: i32) -> Option<&Actor> {
        self.monsters.iter().find(|m| m.pos() == (x, y))
    }

    /// Move the player one step, attacking instead when a monster occupies
    /// the destination. Walls absorb the input without spending a turn.
    pub fn move_player(&mut self, dx: i32, dy: i32) {
        let (nx, ny) = (self.player.x + dx, self.player.y + dy);
        if let Some(idx) = self.monsters.iter().position(|m| m.pos() == (nx, ny)) {
            self.attack(idx);
        } else if self.map.is_walkable(nx, ny) {
            self.player.place(nx, ny);
        } else {
            return;
        }
        self.turn += 1;
        self.update_fov();
    }

    fn attack(&mut self, idx: usize) {
        let target = &mut self.monsters[idx];
        let damage = (self.player.fighter.power - target.fighter.defense).max(0);
        if damage > 0 {
            target.fighter.hp -= damage;
            self.log.add(
                format!("You hit the {} for {damage} damage.", target.name),
                Tone::Combat,
            );
        } else {
            self.log.add(
                format!("You hit the {} but do no damage.", target.name),
                Tone::Combat,
            );
        }
        if !target.fighter.is_alive() {
            let name = target.name.clone();
            self.monsters.remove(idx);
            self.log.add(format!("The {name} dies!"), Tone::Combat);
        }
    }

    /// Whether the player is standing on the downward staircase.
    pub fn on_downstairs(&self) -> bool {
        self.player.pos() == self.map.downstairs
    }

    /// Generate the next floor and move the player onto it.
    ///
    /// Has no effect unless the player stands on the staircase.
    pub fn descend(&mut self, rng: &mut impl Rng) {
        if !self.on_downstairs() {
            self.log.add("There is no way down from here.", Tone::Warning);
            return;
        }
        let build = self.world.generate_floor(rng);
        self.player.place(build.player_spawn.0, build.player_spawn.1);
        self.map = build.map;
        self.monsters = build.monsters;
        self.items = build.items;
        self.log.add(
            format!("You descend to floor {}.", self.world.current_floor),
            Tone::Info,
        );
        info!(floor = self.world.current_floor, "player descended");
        self.update_fov();
    }
}
