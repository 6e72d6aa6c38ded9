//! Cache storage backends.
//!
//! ```text
//! MemoryStore   DashMap, process lifetime (tests, embedding hosts)
//! FileStore     <dir>/<partition>/<key>.json + <dir>/state.json
//! ```
//!
//! Each write is a single upsert; concurrent writers to one slot are
//! last-write-wins.

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use super::entry::CacheEntry;
use super::manager::Partition;

/// Global state file name
const STATE_FILE: &str = "state.json";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error at {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("malformed cache file {0}: {1}")]
    Json(PathBuf, #[source] serde_json::Error),
}

pub trait CacheStore: Send + Sync {
    fn get(&self, partition: &Partition, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    fn put(&self, partition: &Partition, key: &str, entry: &CacheEntry) -> Result<(), CacheError>;

    /// Last time tracked content changed (Unix seconds, 0 if never).
    fn time_modified(&self) -> Result<u64, CacheError>;

    fn set_time_modified(&self, time: u64) -> Result<(), CacheError>;

    /// Remove every entry. Returns the number removed.
    fn clear(&self) -> Result<usize, CacheError>;
}

// ============================================================================
// MemoryStore
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<(Partition, String), CacheEntry>,
    time_modified: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, partition: &Partition, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self
            .entries
            .get(&(*partition, key.to_string()))
            .map(|entry| entry.value().clone()))
    }

    fn put(&self, partition: &Partition, key: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        self.entries
            .insert((*partition, key.to_string()), entry.clone());
        Ok(())
    }

    fn time_modified(&self) -> Result<u64, CacheError> {
        Ok(self.time_modified.load(Ordering::Acquire))
    }

    fn set_time_modified(&self, time: u64) -> Result<(), CacheError> {
        self.time_modified.store(time, Ordering::Release);
        Ok(())
    }

    fn clear(&self) -> Result<usize, CacheError> {
        let count = self.entries.len();
        self.entries.clear();
        Ok(count)
    }
}

// ============================================================================
// FileStore
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheState {
    #[serde(default)]
    time_modified: u64,
}

/// JSON files under a cache directory.
///
/// Files are written to a temporary sibling and renamed into place so a
/// reader never sees a partial entry.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, partition: &Partition, key: &str) -> PathBuf {
        self.dir.join(partition.slug()).join(format!("{key}.json"))
    }

    fn state_path(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, CacheError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Io(path.to_path_buf(), e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CacheError::Json(path.to_path_buf(), e))
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), CacheError> {
        let json =
            serde_json::to_string_pretty(value).map_err(|e| CacheError::Json(path.to_path_buf(), e))?;
        let io_err = |e| CacheError::Io(path.to_path_buf(), e);

        let _guard = self.write_lock.lock();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)
    }
}

impl CacheStore for FileStore {
    fn get(&self, partition: &Partition, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Self::read_json(&self.entry_path(partition, key))
    }

    fn put(&self, partition: &Partition, key: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        self.write_json(&self.entry_path(partition, key), entry)
    }

    fn time_modified(&self) -> Result<u64, CacheError> {
        Ok(Self::read_json::<CacheState>(&self.state_path())?
            .unwrap_or_default()
            .time_modified)
    }

    fn set_time_modified(&self, time: u64) -> Result<(), CacheError> {
        self.write_json(&self.state_path(), &CacheState { time_modified: time })
    }

    /// Removes entry files; the modification state is kept.
    fn clear(&self) -> Result<usize, CacheError> {
        let _guard = self.write_lock.lock();
        let partitions = match fs::read_dir(&self.dir) {
            Ok(partitions) => partitions,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(CacheError::Io(self.dir.clone(), e)),
        };

        let mut removed = 0;
        for partition in partitions.flatten() {
            let path = partition.path();
            if !path.is_dir() {
                continue;
            }
            removed += fs::read_dir(&path)
                .map_err(|e| CacheError::Io(path.clone(), e))?
                .flatten()
                .filter(|file| file.path().extension().is_some_and(|ext| ext == "json"))
                .count();
            fs::remove_dir_all(&path).map_err(|e| CacheError::Io(path.clone(), e))?;
        }
        Ok(removed)
    }
}
