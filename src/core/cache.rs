use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/*-------------------------------------------------------------------------------------------------
  Cache Entry
-------------------------------------------------------------------------------------------------*/

/// A cached payload and the time it was fetched from upstream.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CacheEntry {
    pub fetched_at: DateTime<Utc>,
    pub payload: String,
}

impl CacheEntry {
    /// Stamp a freshly fetched payload with the current time.
    pub fn new(payload: impl Into<String>) -> Self {
        Self::with_timestamp(payload, Utc::now())
    }

    pub fn with_timestamp(payload: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at,
            payload: payload.into(),
        }
    }

    /// Time elapsed since the payload was fetched, computed at call time.
    pub fn age(&self) -> TimeDelta {
        Utc::now() - self.fetched_at
    }

    /// True when the entry is younger than `window`. Entries stamped in the future are never
    /// fresh.
    pub fn is_fresh(&self, window: Duration) -> bool {
        matches!(self.age().to_std(), Ok(age) if age < window)
    }
}

/*-------------------------------------------------------------------------------------------------
  Cache Store
-------------------------------------------------------------------------------------------------*/

/// Key-value store holding timestamped payloads.
///
/// A read returns `None` on a miss; an absent entry and an unreadable entry are both misses.
/// There is no eviction and no locking: the last writer wins.
pub trait CacheStore {
    fn read(&self, key: &str) -> Option<CacheEntry>;

    fn write_entry(&self, key: &str, entry: &CacheEntry) -> io::Result<()>;

    /// Store `payload` under `key`, stamped with the current time.
    fn write(&self, key: &str, payload: &str) -> io::Result<()> {
        self.write_entry(key, &CacheEntry::new(payload))
    }
}

/*--------------------------------------------------------------------------------------
  File Cache Store
--------------------------------------------------------------------------------------*/

/// Stores each key as a JSON envelope in `{cache_dir}/{key}.cache`.
#[derive(Clone, Debug)]
pub struct FileCacheStore {
    cache_dir: PathBuf,
}

impl FileCacheStore {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Self {
        Self {
            cache_dir: cache_dir.as_ref().to_path_buf(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the file backing `key`. Characters outside `[A-Za-z0-9._-]` are replaced so a
    /// key can never escape the cache directory.
    pub fn path(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.cache_dir.join(format!("{file_stem}.cache"))
    }
}

impl CacheStore for FileCacheStore {
    fn read(&self, key: &str) -> Option<CacheEntry> {
        let path = self.path(key);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) => {
                debug!("Cache miss for `{key}` ({path:?}): {error}");
                return None;
            }
        };

        serde_json::from_str(&contents)
            .inspect_err(|error| warn!("Cache file {path:?} is corrupted: {error}"))
            .ok()
    }

    fn write_entry(&self, key: &str, entry: &CacheEntry) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        let contents = serde_json::to_string(entry)?;
        fs::write(self.path(key), contents)
    }
}

/*--------------------------------------------------------------------------------------
  Memory Cache Store
--------------------------------------------------------------------------------------*/

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RefCell<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry with an explicit timestamp.
    pub fn insert(&self, key: &str, entry: CacheEntry) {
        self.entries.borrow_mut().insert(key.to_string(), entry);
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl CacheStore for MemoryCacheStore {
    fn read(&self, key: &str) -> Option<CacheEntry> {
        self.get(key)
    }

    fn write_entry(&self, key: &str, entry: &CacheEntry) -> io::Result<()> {
        self.insert(key, entry.clone());
        Ok(())
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
