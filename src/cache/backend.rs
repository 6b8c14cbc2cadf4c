//! Persistence backends for the response cache
//!
//! A backend only moves opaque serialized entries around; freshness and
//! decoding are the store's business. `FileBackend` survives process
//! restarts, `MemoryBackend` lives as long as the process.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Storage capability behind a [`CacheStore`](super::CacheStore)
///
/// Reads never fail: a missing or unreadable slot is `None`. Writes report
/// I/O problems so the caller can decide whether they matter.
pub trait CacheBackend: Send + Sync + Debug {
    /// Returns the raw serialized entry stored under `key`, if any
    fn load(&self, key: &str) -> Option<String>;

    /// Stores `raw` under `key`, replacing any previous entry
    fn store(&self, key: &str, raw: &str) -> io::Result<()>;

    /// Removes the entry for `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> io::Result<()>;

    /// Removes every entry owned by this backend
    fn remove_all(&self) -> io::Result<()>;
}

/// Durable backend writing one JSON file per key
///
/// Keys are full request URLs, so file names are the SHA-256 hex digest of
/// the key rather than the key itself.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Hex-encoded SHA-256 digest of a cache key
fn file_stem(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

impl CacheBackend for FileBackend {
    fn load(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.entry_path(key)).ok()
    }

    fn store(&self, key: &str, raw: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Each write fills its own temp file, then renames it into place
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(raw.as_bytes())?;
        tmp.persist(self.entry_path(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    fn remove_all(&self) -> io::Result<()> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };

        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

/// Volatile backend kept in a process-local map
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including ones the store would treat as expired
    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> io::Error {
    io::Error::other("cache lock poisoned")
}

impl CacheBackend for MemoryBackend {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn store(&self, key: &str, raw: &str) -> io::Result<()> {
        self.entries
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries.lock().map_err(poisoned)?.remove(key);
        Ok(())
    }

    fn remove_all(&self) -> io::Result<()> {
        self.entries.lock().map_err(poisoned)?.clear();
        Ok(())
    }
}
