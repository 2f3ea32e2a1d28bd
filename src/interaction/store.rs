use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// String key/value storage with local-storage semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> AppResult<()>;
    fn remove(&mut self, key: &str) -> AppResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> AppResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON object on disk holding every key, rewritten on each `set`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> AppResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to read store: {}", self.path.display()),
            )
        })?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|source| AppError::store(self.path.display().to_string(), source))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| {
                AppError::io_with_context(
                    source,
                    format!("failed to create store dir: {}", parent.display()),
                )
            })?;
        }
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|source| AppError::serialize(self.path.display().to_string(), source))?;
        fs::write(&self.path, raw).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to write store: {}", self.path.display()),
            )
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> AppResult<()> {
        // Only an unparsable file is replaced; read errors leave it untouched.
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(err @ AppError::Store { .. }) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "replacing corrupt store file"
                );
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> AppResult<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
