//! Actors, items, and the prototype entities floor generation clones from.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Palette slot for an entity glyph; the UI maps these to concrete colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hue {
    /// The player character.
    Player,
    /// Hostile creatures.
    Monster,
    /// Pickupable items.
    Item,
}

/// Combat-relevant attributes of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    /// Current hit points.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Attack strength.
    pub power: i32,
    /// Incoming-damage reduction.
    pub defense: i32,
}

impl Fighter {
    /// Build a fighter at full health.
    pub fn new(max_hp: i32, power: i32, defense: i32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            power,
            defense,
        }
    }

    /// Whether the actor is still standing.
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// A creature on the map: the player or a monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Display name.
    pub name: String,
    /// Map glyph.
    pub glyph: char,
    /// Palette slot.
    pub hue: Hue,
    /// Column on the map.
    pub x: i32,
    /// Row on the map.
    pub y: i32,
    /// Combat attributes.
    pub fighter: Fighter,
}

impl Actor {
    /// Move the actor to an absolute position.
    pub fn place(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Current position.
    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// A pickupable object lying on the floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Display name.
    pub name: String,
    /// Map glyph.
    pub glyph: char,
    /// Palette slot.
    pub hue: Hue,
    /// Column on the map.
    pub x: i32,
    /// Row on the map.
    pub y: i32,
}

/// Prototype entities cloned into each generated floor.
///
/// The statics themselves are never handed out mutably; callers `clone()`
/// them, so a session mutating its player can never bleed back into the
/// template.
pub mod templates {
    use super::*;

    /// The player template every new session starts from.
    pub static PLAYER: Lazy<Actor> = Lazy::new(|| Actor {
        name: "Hero".to_string(),
        glyph: '@',
        hue: Hue::Player,
        x: 0,
        y: 0,
        fighter: Fighter::new(30, 5, 2),
    });

    /// Common dungeon dweller.
    pub static ORC: Lazy<Actor> = Lazy::new(|| Actor {
        name: "Orc".to_string(),
        glyph: 'o',
        hue: Hue::Monster,
        x: 0,
        y: 0,
        fighter: Fighter::new(10, 3, 0),
    });

    /// Rarer, tougher dungeon dweller.
    pub static TROLL: Lazy<Actor> = Lazy::new(|| Actor {
        name: "Troll".to_string(),
        glyph: 'T',
        hue: Hue::Monster,
        x: 0,
        y: 0,
        fighter: Fighter::new(16, 4, 1),
    });

    /// Restorative item scattered through the dungeon.
    pub static HEALING_DRAUGHT: Lazy<Item> = Lazy::new(|| Item {
        name: "Healing Draught".to_string(),
        glyph: '!',
        hue: Hue::Item,
        x: 0,
        y: 0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloned_template_is_independent() {
        let mut clone = templates::PLAYER.clone();
        clone.fighter.hp = 1;
        clone.place(40, 20);
        assert_eq!(templates::PLAYER.fighter.hp, templates::PLAYER.fighter.max_hp);
        assert_eq!(templates::PLAYER.pos(), (0, 0));
    }

    #[test]
    fn fresh_fighter_is_alive_at_full_health() {
        let fighter = Fighter::new(12, 3, 1);
        assert!(fighter.is_alive());
        assert_eq!(fighter.hp, 12);
    }
}
