//! Versioned save-file format for game sessions.
//!
//! Layout on disk: a 4-byte magic `LDSV`, one format version byte, then a
//! gzip stream wrapping the bincode-encoded payload. The header is checked
//! before any decoding happens, so a foreign or truncated file fails with a
//! precise error instead of a deserializer panic deep in the payload.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::engine::Engine;

/// File magic at offset 0.
pub const MAGIC: &[u8; 4] = b"LDSV";
/// Current format version, written after the magic.
pub const FORMAT_VERSION: u8 = 1;
/// Default save slot, relative to the working directory.
pub const DEFAULT_SLOT: &str = "savegame.sav";

/// Everything that can go wrong reading or writing a save file.
#[derive(Debug, Error)]
pub enum SaveError {
    /// No save file exists at the given path.
    #[error("no save file at {0}")]
    NotFound(PathBuf),
    /// The file could not be read or written.
    #[error("save file I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The file does not start with the save magic.
    #[error("not a save file (bad header)")]
    BadHeader,
    /// The file was written by an unknown format version.
    #[error("unsupported save format version {found}")]
    UnsupportedVersion {
        /// Version byte found in the file.
        found: u8,
    },
    /// The compressed payload is corrupt.
    #[error("save payload is corrupt: {0}")]
    Decompress(#[source] io::Error),
    /// The session could not be encoded.
    #[error("failed to encode session: {0}")]
    Encode(#[source] bincode::Error),
    /// The decompressed payload is not a valid session.
    #[error("failed to decode session: {0}")]
    Decode(#[source] bincode::Error),
}

#[derive(Serialize)]
struct SavePayloadRef<'a> {
    saved_at: DateTime<Utc>,
    engine: &'a Engine,
}

/// Decoded contents of a save file.
#[derive(Debug, Deserialize)]
pub struct SavePayload {
    /// When the session was written.
    pub saved_at: DateTime<Utc>,
    /// The saved session.
    pub engine: Engine,
}

/// Handle on one save slot.
#[derive(Debug, Clone)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    /// A save file at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The single default slot next to the executable.
    pub fn default_slot() -> Self {
        Self::new(DEFAULT_SLOT)
    }

    /// Path of this slot.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the slot currently holds a save.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write `engine` to the slot, replacing any previous save.
    pub fn write(&self, engine: &Engine) -> Result<(), SaveError> {
        let payload = SavePayloadRef {
            saved_at: Utc::now(),
            engine,
        };
        let mut file = File::create(&self.path)?;
        file.write_all(MAGIC)?;
        file.write_all(&[FORMAT_VERSION])?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        bincode::serialize_into(&mut encoder, &payload).map_err(SaveError::Encode)?;
        encoder.finish()?;
        info!(path = %self.path.display(), turn = engine.turn, "session saved");
        Ok(())
    }

    /// Read the slot back into a session.
    pub fn read(&self) -> Result<SavePayload, SaveError> {
        let mut file = File::open(&self.path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                SaveError::NotFound(self.path.clone())
            } else {
                SaveError::Io(err)
            }
        })?;

        let mut header = [0u8; 5];
        file.read_exact(&mut header).map_err(|err| {
            if err.kind() == io::ErrorKind::UnexpectedEof {
                SaveError::BadHeader
            } else {
                SaveError::Io(err)
            }
        })?;
        if &header[..4] != MAGIC {
            return Err(SaveError::BadHeader);
        }
        let version = header[4];
        if version != FORMAT_VERSION {
            return Err(SaveError::UnsupportedVersion { found: version });
        }

        let mut raw = Vec::new();
        GzDecoder::new(file)
            .read_to_end(&mut raw)
            .map_err(SaveError::Decompress)?;
        let payload: SavePayload =
            bincode::deserialize(&raw).map_err(SaveError::Decode)?;
        info!(path = %self.path.display(), "session loaded");
        Ok(payload)
    }

    /// Remove the save from disk. Missing files are not an error.
    pub fn delete(&self) -> Result<(), SaveError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SaveError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::templates;
    use crate::messages::Tone;
    use crate::worldgen::{GameWorld, GenerationConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn sample_engine() -> Engine {
        let mut world = GameWorld::new(GenerationConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        let build = world.generate_floor(&mut rng);
        let mut engine = Engine::from_build(templates::PLAYER.clone(), world, build);
        engine.log.add("test line", Tone::Info);
        engine.turn = 17;
        engine.update_fov();
        engine
    }

    #[test]
    fn round_trip_restores_the_session() {
        let dir = tempdir().expect("tempdir");
        let slot = SaveFile::new(dir.path().join("slot.sav"));
        let engine = sample_engine();

        slot.write(&engine).expect("write");
        assert!(slot.exists());
        let payload = slot.read().expect("read");

        assert_eq!(payload.engine.turn, engine.turn);
        assert_eq!(payload.engine.player, engine.player);
        assert_eq!(payload.engine.log, engine.log);
        assert_eq!(payload.engine.monsters, engine.monsters);
        assert_eq!(payload.engine.map.downstairs, engine.map.downstairs);
        assert_eq!(payload.engine.map.tiles(), engine.map.tiles());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().expect("tempdir");
        let slot = SaveFile::new(dir.path().join("absent.sav"));
        match slot.read() {
            Err(SaveError::NotFound(path)) => assert_eq!(path, slot.path()),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn foreign_file_is_a_bad_header() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("foreign.sav");
        std::fs::write(&path, b"definitely not a save").expect("write");
        match SaveFile::new(&path).read() {
            Err(SaveError::BadHeader) => {}
            other => panic!("expected BadHeader, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_slot_is_an_io_error_not_a_bad_header() {
        let dir = tempdir().expect("tempdir");
        // The slot path is a directory, so the read itself fails.
        match SaveFile::new(dir.path()).read() {
            Err(SaveError::Io(_)) => {}
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn truncated_header_is_a_bad_header() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("short.sav");
        std::fs::write(&path, b"LD").expect("write");
        match SaveFile::new(&path).read() {
            Err(SaveError::BadHeader) => {}
            other => panic!("expected BadHeader, got {other:?}"),
        }
    }

    #[test]
    fn future_version_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("future.sav");
        let mut bytes = MAGIC.to_vec();
        bytes.push(FORMAT_VERSION + 1);
        std::fs::write(&path, bytes).expect("write");
        match SaveFile::new(&path).read() {
            Err(SaveError::UnsupportedVersion { found }) => {
                assert_eq!(found, FORMAT_VERSION + 1);
            }
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn compressed_garbage_fails_to_decode() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("garbage.sav");
        let mut bytes = MAGIC.to_vec();
        bytes.push(FORMAT_VERSION);
        let mut encoder = GzEncoder::new(&mut bytes, Compression::default());
        encoder.write_all(b"not a session").expect("compress");
        encoder.finish().expect("finish");
        std::fs::write(&path, bytes).expect("write");
        match SaveFile::new(&path).read() {
            Err(err @ SaveError::Decode(_)) => assert!(!err.to_string().is_empty()),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn truncated_gzip_stream_fails_to_decompress() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("truncated.sav");
        let mut bytes = MAGIC.to_vec();
        bytes.push(FORMAT_VERSION);
        bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        std::fs::write(&path, bytes).expect("write");
        match SaveFile::new(&path).read() {
            Err(SaveError::Decompress(_)) => {}
            other => panic!("expected Decompress, got {other:?}"),
        }
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempdir().expect("tempdir");
        let slot = SaveFile::new(dir.path().join("slot.sav"));
        slot.write(&sample_engine()).expect("write");
        slot.delete().expect("first delete");
        assert!(!slot.exists());
        slot.delete().expect("second delete");
    }
}
