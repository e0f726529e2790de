//! Random hero name generation from a JSON name pool.
//!
//! The pool file is re-read and re-parsed on every call so it can be edited
//! between games without restarting.

use std::{fs, path::Path};

use anyhow::{anyhow, ensure, Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

/// Name pool location, relative to the working directory.
pub const DEFAULT_POOL_PATH: &str = "data/names.json";

/// Two-part name pool loaded from a JSON resource.
#[derive(Debug, Clone, Deserialize)]
pub struct NamePool {
    /// First names.
    pub names: Vec<String>,
    /// Surnames.
    pub surnames: Vec<String>,
}

impl NamePool {
    /// Load and validate a pool from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read name pool {}", path.display()))?;
        let pool: NamePool = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse name pool {}", path.display()))?;
        ensure!(
            !pool.names.is_empty(),
            "name pool {} has no first names",
            path.display()
        );
        ensure!(
            !pool.surnames.is_empty(),
            "name pool {} has no surnames",
            path.display()
        );
        Ok(pool)
    }

    /// One uniformly random `"<name> <surname>"` combination.
    pub fn pick(&self, rng: &mut impl Rng) -> Result<String> {
        let name = self
            .names
            .choose(rng)
            .ok_or_else(|| anyhow!("name pool has no first names"))?;
        let surname = self
            .surnames
            .choose(rng)
            .ok_or_else(|| anyhow!("name pool has no surnames"))?;
        Ok(format!("{name} {surname}"))
    }
}

/// Load the pool at `path` and draw one random full name from it.
pub fn random_full_name(path: impl AsRef<Path>, rng: &mut impl Rng) -> Result<String> {
    NamePool::load(path)?.pick(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use tempfile::tempdir;

    fn write_pool(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("names.json");
        fs::write(&path, contents).expect("write pool");
        (dir, path)
    }

    #[test]
    fn single_entry_pool_is_deterministic() {
        let (_dir, path) = write_pool(r#"{"names":["Ada"],"surnames":["Lovelace"]}"#);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let name = random_full_name(&path, &mut rng).expect("name");
            assert_eq!(name, "Ada Lovelace");
        }
    }

    #[test]
    fn parts_come_from_their_respective_pools() {
        let (_dir, path) = write_pool(
            r#"{"names":["Igor","Zofia","Kazik"],"surnames":["Piorun","Sokol"]}"#,
        );
        let pool = NamePool::load(&path).expect("pool");
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let full = pool.pick(&mut rng).expect("pick");
            let mut parts = full.splitn(2, ' ');
            let first = parts.next().expect("first part");
            let last = parts.next().expect("second part");
            assert!(pool.names.iter().any(|n| n == first));
            assert!(pool.surnames.iter().any(|s| s == last));
            assert!(!last.contains(' '));
        }
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempdir().expect("tempdir");
        let err = random_full_name(dir.path().join("absent.json"), &mut rand::thread_rng());
        assert!(err.is_err());
    }

    #[test]
    fn malformed_json_fails() {
        let (_dir, path) = write_pool("{not json");
        assert!(NamePool::load(&path).is_err());
    }

    #[test]
    fn missing_array_fails() {
        let (_dir, path) = write_pool(r#"{"names":["Ada"]}"#);
        assert!(NamePool::load(&path).is_err());
    }

    #[test]
    fn empty_array_fails() {
        let (_dir, path) = write_pool(r#"{"names":[],"surnames":["Lovelace"]}"#);
        assert!(NamePool::load(&path).is_err());
    }
}
