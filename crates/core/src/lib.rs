#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Lesny Dungeon terminal roguelike.
//!
//! This crate hosts the session aggregate, dungeon floor generation,
//! field-of-view computation, the hero name generator, and save-file
//! persistence used by the terminal UI and any future frontends.

pub mod engine;
pub mod entity;
pub mod fov;
pub mod map;
pub mod messages;
pub mod namegen;
pub mod save;
pub mod session;
pub mod worldgen;

pub use engine::Engine;
pub use entity::{Actor, Hue, Item};
pub use map::{GameMap, Tile, TileKind};
pub use messages::{Message, MessageLog, Tone};
pub use namegen::NamePool;
pub use save::{SaveError, SaveFile};
pub use worldgen::{GameWorld, GenerationConfig};
