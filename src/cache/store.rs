//! TTL-governed response store
//!
//! Provides `CacheStore`, which wraps a [`CacheBackend`] with timestamped
//! entries and a mutable time-to-live. Expired or unreadable entries read as
//! absent and are evicted on the way out.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, warn};

use super::backend::{CacheBackend, FileBackend, MemoryBackend};

/// Default time-to-live for cached responses, in minutes
pub const DEFAULT_TTL_MINUTES: u32 = 60;

/// A stored response and the moment it was written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Key the entry was stored under
    pub key: String,
    /// The cached JSON document
    pub value: Value,
    /// When the entry was written
    pub stored_at: DateTime<Utc>,
}

/// Key-value cache with time-based expiry over a pluggable backend
///
/// Shared between clients behind an `Arc`. Concurrent writers to the same
/// key race; whichever write lands last wins.
#[derive(Debug)]
pub struct CacheStore {
    backend: Box<dyn CacheBackend>,
    ttl_minutes: AtomicU32,
}

impl CacheStore {
    /// Creates a store over `backend` with the given TTL
    pub fn new(backend: impl CacheBackend + 'static, ttl_minutes: u32) -> Self {
        Self {
            backend: Box::new(backend),
            ttl_minutes: AtomicU32::new(ttl_minutes),
        }
    }

    /// Creates a durable store writing JSON files under `dir`
    pub fn on_disk(dir: impl Into<PathBuf>, ttl_minutes: u32) -> Self {
        Self::new(FileBackend::new(dir), ttl_minutes)
    }

    /// Creates a store that forgets everything when the process exits
    pub fn in_memory(ttl_minutes: u32) -> Self {
        Self::new(MemoryBackend::new(), ttl_minutes)
    }

    /// XDG-compliant cache directory (`~/.cache/roihr/` on Linux)
    ///
    /// Returns `None` when no home directory can be determined.
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "roihr").map(|dirs| dirs.cache_dir().to_path_buf())
    }

    /// Current time-to-live in minutes
    pub fn ttl_minutes(&self) -> u32 {
        self.ttl_minutes.load(Ordering::Relaxed)
    }

    /// Changes the time-to-live. Existing entries keep their timestamps; only
    /// later expiry checks see the new value.
    pub fn set_ttl_minutes(&self, ttl_minutes: u32) {
        self.ttl_minutes.store(ttl_minutes, Ordering::Relaxed);
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now - entry.stored_at <= Duration::minutes(i64::from(self.ttl_minutes()))
    }

    /// Returns the cached value for `key` if present and fresh
    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Utc::now())
    }

    /// Like [`get`](Self::get), judging freshness against `now`
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Value> {
        self.get_entry_at(key, now).map(|entry| entry.value)
    }

    /// Returns the full entry, including its timestamp, if present and fresh
    pub fn get_entry(&self, key: &str) -> Option<CacheEntry> {
        self.get_entry_at(key, Utc::now())
    }

    pub fn get_entry_at(&self, key: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        let raw = self.backend.load(key)?;

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "Discarding unreadable cache entry");
                self.evict(key);
                return None;
            }
        };

        // Digest collision or a file copied in by hand
        if entry.key != key {
            return None;
        }

        if !self.is_fresh(&entry, now) {
            debug!(key, stored_at = %entry.stored_at, "Cache entry expired");
            self.evict(key);
            return None;
        }

        Some(entry)
    }

    /// Stores `value` under `key` with the current time
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> io::Result<()> {
        self.set_at(key, value, Utc::now())
    }

    /// Stores `value` under `key` stamped with `now`, replacing any prior entry
    pub fn set_at<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        now: DateTime<Utc>,
    ) -> io::Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let entry = CacheEntry {
            key: key.to_string(),
            value,
            stored_at: now,
        };

        let raw = serde_json::to_string(&entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.backend.store(key, &raw)
    }

    /// Removes the entry for `key`
    pub fn clear(&self, key: &str) -> io::Result<()> {
        self.backend.remove(key)
    }

    /// Removes every entry
    pub fn clear_all(&self) -> io::Result<()> {
        self.backend.remove_all()
    }

    fn evict(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            debug!(key, error = %e, "Failed to evict cache entry");
        }
    }
}

/// Opens the durable store at `dir`, or at the default location when `dir`
/// is `None`. Falls back to memory when no cache directory can be found.
pub fn open_store(dir: Option<&Path>, ttl_minutes: u32) -> CacheStore {
    match dir.map(Path::to_path_buf).or_else(CacheStore::default_dir) {
        Some(dir) => CacheStore::on_disk(dir, ttl_minutes),
        None => {
            warn!("No cache directory available, cached responses will not persist");
            CacheStore::in_memory(ttl_minutes)
        }
    }
}
