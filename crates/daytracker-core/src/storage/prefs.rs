//! Flat string-key/string-value store persisted as a single JSON object file.
//!
//! Values are themselves JSON-shaped text produced by [`super::codec`]; the
//! store does not interpret them. Mutations serialize the whole map and write
//! the file before the in-memory cache is advanced, so a failed write leaves
//! the cache at its pre-operation value.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::StorageError;

/// On-disk preference store. Not internally synchronized; the repository
/// serializes access to it.
#[derive(Debug)]
pub struct PrefStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl PrefStore {
    /// Opens the store at `path`, loading existing entries.
    ///
    /// A missing file yields an empty store. An unreadable *map* (the outer
    /// JSON object, not an individual value) is treated as corruption: the
    /// store starts empty and the file is replaced on the next write.
    ///
    /// # Errors
    /// Returns an error only for real I/O failures other than "not found".
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(map) => map,
                Err(err) => {
                    warn!("preference store at {} is corrupt, starting empty: {err}", path.display());
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StorageError::ReadFailed {
                    path: path.clone(),
                    source,
                })
            }
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a copy of the value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts or replaces a single entry and persists.
    pub fn put(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.put_many(vec![(key.to_string(), value)])
    }

    /// Inserts or replaces several entries in one file write, so a multi-key
    /// update is applied all-or-nothing at the file level.
    pub fn put_many(&mut self, updates: Vec<(String, String)>) -> Result<(), StorageError> {
        let mut next = self.entries.clone();
        next.extend(updates);
        self.write(&next)?;
        self.entries = next;
        Ok(())
    }

    /// Removes an entry and persists. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.contains(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.write(&next)?;
        self.entries = next;
        Ok(())
    }

    /// Removes every entry and persists.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let next = BTreeMap::new();
        self.write(&next)?;
        self.entries = next;
        Ok(())
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content).map_err(|source| StorageError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }
}
