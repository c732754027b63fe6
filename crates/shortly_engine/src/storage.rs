use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Durable string key-value store, one value per key.
pub trait KeyValueStorage: Send + Sync {
    /// `Ok(None)` when the key has never been written.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replaces the stored value. Once this returns `Ok`, `read` sees the new value.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as `{dir}/{key}.json`, replaced atomically on write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let target = self.path_for(key)?;
        ensure_data_dir(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }
}

/// Create the data directory if missing and reject paths that are not directories.
pub(crate) fn ensure_data_dir(dir: &Path) -> Result<(), StorageError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StorageError::DataDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    }
    Ok(())
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing any serialization.
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
