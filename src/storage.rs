//! Storage sinks the save manager writes through.
//!
//! The desktop build persists to files next to the profile directory; the
//! wasm build falls back to localStorage. Both sit behind the same
//! `StorageSink` trait so the save manager and its tests stay agnostic.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The backing store cannot be reached at all (e.g. localStorage
    /// disabled by the browser).
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("stored data is not valid utf-8")]
    Encoding,
}

/// A keyed byte store. `read` reports absence as `Ok(None)`, never an error.
pub trait StorageSink {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
}

/// File-per-key storage rooted at a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageSink for FileStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.key_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        // Write-then-rename so a crash mid-write never truncates the
        // previous save.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, self.key_path(key))?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for tests and headless embedding.
#[derive(Default)]
pub struct MemoryStorage {
    entries: HashMap<String, Vec<u8>>,
    /// When set, every write/delete fails. Lets tests exercise the failure
    /// reporting paths.
    pub fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageSink for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable);
        }
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable);
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser localStorage sink. Only reachable in wasm builds.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageSink for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let storage = Self::storage()?;
        match storage.get_item(key) {
            Ok(Some(text)) => Ok(Some(text.into_bytes())),
            Ok(None) => Ok(None),
            Err(_) => Err(StorageError::Unavailable),
        }
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let text = std::str::from_utf8(bytes).map_err(|_| StorageError::Encoding)?;
        let storage = Self::storage()?;
        storage
            .set_item(key, text)
            .map_err(|_| StorageError::Unavailable)
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        let storage = Self::storage()?;
        storage
            .remove_item(key)
            .map_err(|_| StorageError::Unavailable)
    }
}
