//! Atomic TOML file handle used for small state files (settings, config,
//! the key-value store).

use recall_core::error::RecallError;
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during atomic TOML operations.
#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<AtomicTomlError> for RecallError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::Io(e) => e.into(),
            AtomicTomlError::Parse(e) => e.into(),
            AtomicTomlError::Serialize(e) => e.into(),
            AtomicTomlError::Lock(message) => RecallError::io(message),
        }
    }
}

/// A TOML file that is replaced atomically on every save.
///
/// Writes go to a uniquely named temporary sibling, are fsynced, then
/// renamed over the target. Every write holds an exclusive lock file, so two
/// processes (main window and overlay) never interleave read-modify-write.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Loads the file, writing `default_value` first if it is missing.
    pub fn load_or_init(&self, default_value: T) -> Result<T, AtomicTomlError> {
        match self.load()? {
            Some(data) => Ok(data),
            None => {
                self.save(&default_value)?;
                Ok(default_value)
            }
        }
    }

    /// Serializes `data` and atomically replaces the file with it.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write(data)
    }

    /// Locked read-modify-write. `f` edits the current value (or
    /// `default_value` when the file is missing) and the result is saved.
    pub fn update<F, R>(&self, default_value: T, f: F) -> Result<R, AtomicTomlError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        let result = f(&mut data);
        self.write(&data)?;

        Ok(result)
    }

    /// Writes through a uniquely named temp file. Callers hold the lock.
    fn write(&self, data: &T) -> Result<(), AtomicTomlError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let result = (|| {
            let mut tmp_file = File::create(&tmp_path)?;
            tmp_file.write_all(toml_string.as_bytes())?;
            tmp_file.sync_all()?;
            drop(tmp_file);
            fs::rename(&tmp_path, &self.path)
        })();
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        Ok(result?)
    }

    fn temp_path(&self) -> Result<PathBuf, AtomicTomlError> {
        let invalid = |what: &str| {
            AtomicTomlError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Path has no {}", what),
            ))
        };
        let parent = self.path.parent().ok_or_else(|| invalid("parent directory"))?;
        let file_name = self.path.file_name().ok_or_else(|| invalid("file name"))?;

        Ok(parent.join(format!(
            ".{}.{}.tmp",
            file_name.to_string_lossy(),
            uuid::Uuid::new_v4()
        )))
    }
}

/// Exclusive lock on `<file>.lock`, released when the handle is dropped.
///
/// The lock file itself is left in place: unlinking it would let a new
/// writer lock a fresh inode while another still waits on the old one.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        use fs2::FileExt;

        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()
            .map_err(|e| AtomicTomlError::Lock(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { _file: file })
    }
}
