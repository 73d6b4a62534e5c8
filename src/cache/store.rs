//! JSON-file backed resolution cache.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

use super::entry::CacheEntry;
use super::{CacheError, CacheResult};

/// Summary counts over the cache contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Total number of entries
    pub entries: usize,
    /// Entries with an external id
    pub positive: usize,
    /// Entries recording a failed search
    pub negative: usize,
    /// Positive entries that belong to a collection
    pub with_collection: usize,
}

/// Flat key → [`CacheEntry`] mapping persisted as pretty-printed JSON.
///
/// Keys are kept sorted so the file diffs cleanly between runs.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
    dirty: bool,
}

impl CacheStore {
    /// An empty cache that will be saved to `path`.
    #[must_use]
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            entries: BTreeMap::new(),
            dirty: false,
        }
    }

    /// Load the cache from `path`.
    ///
    /// A missing file is a cold start. A file that is not a UTF-8 JSON object
    /// is logged and also treated as a cold start. Records that fail validation
    /// are dropped individually.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Read`] only when the file exists but cannot be
    /// read.
    pub fn load(path: &Path) -> CacheResult<Self> {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No cache at {}, starting cold", path.display());
                return Ok(Self::empty(path));
            }
            Err(source) => {
                return Err(CacheError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let raw: BTreeMap<String, Value> = match serde_json::from_slice(&content) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!(
                    "Cache file {} is malformed ({}); starting with an empty cache",
                    path.display(),
                    e
                );
                return Ok(Self::empty(path));
            }
        };

        let mut entries = BTreeMap::new();
        let mut dropped = 0usize;
        for (key, value) in raw {
            match CacheEntry::from_value(value) {
                Some(entry) => {
                    entries.insert(key, entry);
                }
                None => {
                    log::warn!("Ignoring invalid cache record for '{}'", key);
                    dropped += 1;
                }
            }
        }

        log::debug!(
            "Loaded {} cache entries from {} ({} invalid)",
            entries.len(),
            path.display(),
            dropped
        );

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            dirty: dropped > 0,
        })
    }

    /// Path the cache is saved to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up an entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: String, entry: CacheEntry) {
        self.entries.insert(key, entry);
        self.dirty = true;
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether there are changes not yet saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CacheEntry)> {
        self.entries.iter()
    }

    /// Remove every negative entry, returning how many were removed.
    pub fn prune_negative(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_negative());
        let removed = before - self.entries.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Count positive, negative, and collection-bearing entries.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats {
            entries: self.entries.len(),
            ..CacheStats::default()
        };
        for entry in self.entries.values() {
            if entry.is_negative() {
                stats.negative += 1;
            } else {
                stats.positive += 1;
                if entry.collection.is_some() {
                    stats.with_collection += 1;
                }
            }
        }
        stats
    }

    /// Serialize the cache as pretty-printed JSON with sorted keys.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> CacheResult<String> {
        serde_json::to_string_pretty(&self.entries).map_err(CacheError::Serialize)
    }

    /// Write the cache to its path.
    ///
    /// Parent directories are created. The content goes to a temporary file
    /// in the same directory which is then renamed over the target, so a
    /// crash never leaves a half-written cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Write`] if the destination is not writable.
    pub fn save(&mut self) -> CacheResult<()> {
        let json = self.to_json()?;
        let write_err = |source: std::io::Error| CacheError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(&parent).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        self.dirty = false;
        log::debug!(
            "Saved {} cache entries to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}
