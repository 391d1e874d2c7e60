//! Byte-level artifact storage.
//!
//! Purpose
//! -------
//! Persist named blobs (fitted models, prediction CSVs) so forecasts survive
//! process restarts and can be served without refitting.
//!
//! Key behaviors
//! -------------
//! - [`FsArtifactStore`] keeps one file per key under a single directory.
//!   Writes go to a hidden temporary file that is renamed into place, so a
//!   reader never observes a half-written artifact.
//! - [`MemoryArtifactStore`] is the in-process equivalent used by tests and
//!   short-lived tools.
//!
//! Invariants & assumptions
//! ------------------------
//! - Keys are plain file names (no separators); [`super::keys::ArtifactKey`]
//!   enforces this before a key reaches a store.
//! - Names starting with `.` are never listed.
//! - A missing directory lists as empty and is created on first save.
use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::forecast::errors::{ForecastError, ForecastResult};

/// Named blob storage.
pub trait ArtifactStore {
    /// Store `bytes` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, bytes: &[u8]) -> ForecastResult<()>;

    /// Read the bytes stored under `key`.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::ArtifactNotFound`] if nothing is stored there.
    /// - [`ForecastError::ArtifactIo`] for any other read failure.
    fn load(&self, key: &str) -> ForecastResult<Vec<u8>>;

    /// Keys starting with `prefix`, sorted.
    fn list_keys(&self, prefix: &str) -> ForecastResult<Vec<String>>;
}

/// Directory-backed store.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn save(&mut self, key: &str, bytes: &[u8]) -> ForecastResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| ForecastError::from(e).with_key(key))?;
        let tmp = self.root.join(format!(".{key}.tmp"));
        fs::write(&tmp, bytes).map_err(|e| ForecastError::from(e).with_key(key))?;
        fs::rename(&tmp, self.path_of(key)).map_err(|e| ForecastError::from(e).with_key(key))
    }

    fn load(&self, key: &str) -> ForecastResult<Vec<u8>> {
        fs::read(self.path_of(key)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ForecastError::ArtifactNotFound { key: key.to_string() },
            _ => ForecastError::from(e).with_key(key),
        })
    }

    fn list_keys(&self, prefix: &str) -> ForecastResult<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !name.starts_with('.') && name.starts_with(prefix) {
                keys.push(name);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    blobs: BTreeMap<String, Vec<u8>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn save(&mut self, key: &str, bytes: &[u8]) -> ForecastResult<()> {
        self.blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> ForecastResult<Vec<u8>> {
        self.blobs
            .get(key)
            .cloned()
            .ok_or_else(|| ForecastError::ArtifactNotFound { key: key.to_string() })
    }

    fn list_keys(&self, prefix: &str) -> ForecastResult<Vec<String>> {
        Ok(self
            .blobs
            .keys()
            .filter(|k| !k.starts_with('.') && k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Save/load/list on the filesystem store, including a missing root.
    // - Not-found mapping on both stores.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The filesystem store creates its directory, overwrites in place, and
    // hides temporary files.
    //
    // Given
    // -----
    // - A root that does not exist yet and a stray `.x.tmp` file.
    //
    // Expect
    // ------
    // - Listing before the first save is empty; after two saves of the same
    //   key the last bytes win; the dotfile is not listed.
    fn filesystem_store_round_trips() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let mut store = FsArtifactStore::new(dir.path().join("artifacts"));

        // Act
        let before = store.list_keys("").expect("store should list");
        store.save("predictions_A_t_1.csv", b"first").expect("artifact should be saved");
        store.save("predictions_A_t_1.csv", b"second").expect("artifact should be saved");
        store.save("model_log_A_t_1.json", b"{}").expect("artifact should be saved");
        fs::write(store.root().join(".stray.tmp"), b"junk").expect("file should be written");

        // Assert
        assert!(before.is_empty());
        assert_eq!(store.load("predictions_A_t_1.csv").expect("artifact should load"), b"second");
        assert_eq!(
            store.list_keys("predictions_").expect("store should list"),
            vec!["predictions_A_t_1.csv"]
        );
        assert_eq!(store.list_keys("").expect("store should list").len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Missing keys map to `ArtifactNotFound` on both stores.
    //
    // Given
    // -----
    // - Empty stores.
    //
    // Expect
    // ------
    // - `ArtifactNotFound { key: "nope" }`.
    fn missing_keys_are_not_found() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let fs_store = FsArtifactStore::new(dir.path());
        let mem_store = MemoryArtifactStore::new();
        let expected = ForecastError::ArtifactNotFound { key: "nope".to_string() };

        // Act / Assert
        assert_eq!(fs_store.load("nope"), Err(expected.clone()));
        assert_eq!(mem_store.load("nope"), Err(expected));
    }
}
