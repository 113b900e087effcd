//! String-keyed storage backends
//!
//! The generator only ever sees the [`KvStore`] trait - the same opaque
//! get/set/remove surface a browser's LocalStorage offers. [`FileKvStore`]
//! backs it with a single JSON file on disk; [`MemoryKvStore`] exists for
//! tests and can simulate restrictive storage that rejects writes.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Storage write failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejects writes (restrictive/private mode)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Opaque string-keyed persistence capability.
///
/// Reads are infallible by design: an unreadable key and an absent key are
/// indistinguishable to callers, which fall back to defaults either way.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// File-backed store: one JSON object per store file, rewritten on every
/// mutation via tmp-file-then-rename so a crash never leaves a torn file.
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileKvStore {
    /// Open a store at `path`, loading existing entries.
    ///
    /// A missing file is a fresh store. An unreadable or malformed file is
    /// logged and treated as fresh - the caller cannot do better, and the
    /// startup capability probe will surface truly broken storage.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(map) => map,
                Err(err) => {
                    log::warn!("store file {} is malformed, starting fresh: {err}", path.display());
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                log::warn!("cannot read store file {}: {err}", path.display());
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    fn flush(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// In-memory store for tests. Flip `available` off to make every write fail
/// the way restrictive storage does.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: BTreeMap<String, String>,
    unavailable: bool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate storage that rejects all writes.
    pub fn set_available(&mut self, available: bool) {
        self.unavailable = !available;
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.unavailable {
            Err(StoreError::Unavailable("writes disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryKvStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_memory_store_unavailable_rejects_writes() {
        let mut store = MemoryKvStore::new();
        store.set_available(false);
        assert!(matches!(store.set("k", "v"), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.remove("k"), Err(StoreError::Unavailable(_))));
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileKvStore::open(&path);
        store.set("uniqueSeed", "42").unwrap();
        store.set("generationCount", "3").unwrap();
        drop(store);

        let store = FileKvStore::open(&path);
        assert_eq!(store.get("uniqueSeed").as_deref(), Some("42"));
        assert_eq!(store.get("generationCount").as_deref(), Some("3"));
    }

    #[test]
    fn test_file_store_malformed_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileKvStore::open(&path);
        assert_eq!(store.get("uniqueSeed"), None);
    }

    #[test]
    fn test_file_store_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileKvStore::open(dir.path().join("store.json"));
        store.remove("absent").unwrap();
    }
}
