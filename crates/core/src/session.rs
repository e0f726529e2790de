//! Session factory: assembles a fresh, playable game.

use std::path::Path;

use anyhow::Result;
use rand::Rng;
use tracing::info;

use crate::engine::Engine;
use crate::entity::templates;
use crate::messages::Tone;
use crate::namegen::{self, DEFAULT_POOL_PATH};
use crate::worldgen::{GameWorld, GenerationConfig};

/// Start a new game with the default name pool and thread-local RNG.
pub fn new_session() -> Result<Engine> {
    new_session_with(DEFAULT_POOL_PATH, &mut rand::thread_rng())
}

/// Start a new game, drawing the hero's name from the pool at `pool_path`.
///
/// Clones the player template, generates the first floor, computes the
/// initial field of view, and seeds the log with the welcome message. The
/// returned engine is playable as-is.
pub fn new_session_with(pool_path: impl AsRef<Path>, rng: &mut impl Rng) -> Result<Engine> {
    let mut player = templates::PLAYER.clone();
    player.name = namegen::random_full_name(pool_path, rng)?;

    let mut world = GameWorld::new(GenerationConfig::default());
    let build = world.generate_floor(rng);
    let mut engine = Engine::from_build(player, world, build);
    engine.update_fov();
    engine.log.add(
        format!(
            "Hello and welcome, {}, to yet another dungeon!",
            engine.player.name
        ),
        Tone::Welcome,
    );

    info!(player = %engine.player.name, "new session started");
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use tempfile::tempdir;

    fn ada_pool() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("names.json");
        fs::write(&path, r#"{"names":["Ada"],"surnames":["Lovelace"]}"#).expect("write pool");
        (dir, path)
    }

    #[test]
    fn new_session_is_immediately_playable() {
        let (_dir, pool) = ada_pool();
        let mut rng = StdRng::seed_from_u64(5);
        let engine = new_session_with(&pool, &mut rng).expect("session");

        assert_eq!(engine.player.name, "Ada Lovelace");
        assert_eq!(engine.world.current_floor, 1);
        assert_eq!(engine.turn, 0);
        let (x, y) = engine.player.pos();
        assert!(engine.map.is_walkable(x, y));
        assert!(engine.map.is_visible(x, y));
    }

    #[test]
    fn welcome_message_names_the_hero() {
        let (_dir, pool) = ada_pool();
        let mut rng = StdRng::seed_from_u64(5);
        let engine = new_session_with(&pool, &mut rng).expect("session");

        let first = &engine.log.messages()[0];
        assert_eq!(
            first.text,
            "Hello and welcome, Ada Lovelace, to yet another dungeon!"
        );
        assert_eq!(first.tone, Tone::Welcome);
    }

    #[test]
    fn sessions_do_not_mutate_the_player_template() {
        let (_dir, pool) = ada_pool();
        let mut rng = StdRng::seed_from_u64(5);
        let engine = new_session_with(&pool, &mut rng).expect("session");

        assert_ne!(engine.player.name, templates::PLAYER.name);
        assert_eq!(templates::PLAYER.name, "Hero");
        assert_eq!(templates::PLAYER.pos(), (0, 0));
    }

    #[test]
    fn missing_pool_aborts_the_session() {
        let dir = tempdir().expect("tempdir");
        let mut rng = StdRng::seed_from_u64(5);
        let result = new_session_with(dir.path().join("absent.json"), &mut rng);
        assert!(result.is_err());
    }
}
