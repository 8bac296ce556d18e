// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Persistent key-value string store backed by a JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Cached works listing.
pub const KEY_WORKS: &str = "works";
/// Cached server categories; "Tous" is added back when the catalog loads.
pub const KEY_CATEGORIES: &str = "categories";
/// Last category picked in the public gallery filter.
pub const KEY_SELECTED_CATEGORY: &str = "selectedCategoryId";
/// Bearer token of the logged-in user.
pub const KEY_TOKEN: &str = "token";

/// String map persisted after every write. `path == None` keeps it in memory.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl KeyValueStore {
    /// Open (or start) the store at `path`. A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> Result<Self> {
        let entries = match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Store file is not valid JSON: {:?}", path))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read store file: {:?}", path));
            }
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            entries,
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store a value and flush to disk.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.entries.insert(key.to_string(), value.into());
        self.flush()
    }

    /// Remove a value and flush to disk.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    /// Decode a JSON value stored under `key`; corrupt entries read as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("Ignoring unreadable cache entry '{key}': {err}");
                None
            }
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to encode cache entry '{key}'"))?;
        self.set(key, raw)
    }

    /// Write through a temporary file so a crash never leaves half a store behind.
    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory: {:?}", parent))?;
        }
        let raw = serde_json::to_string_pretty(&self.entries).context("Failed to encode store")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw).with_context(|| format!("Failed to write store file: {:?}", tmp))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to replace store file: {:?}", path))?;
        Ok(())
    }
}
