//! Atomic store file operations.
//!
//! One configuration store per TOML file: sections become tables, keys become
//! string values.

use emuconf_core::{EmuconfError, IniStore};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Errors that can occur during store file operations.
#[derive(Debug)]
pub enum StoreFileError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parse error.
    TomlError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
    /// Write lock could not be taken.
    LockError(String),
}

impl std::fmt::Display for StoreFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreFileError::IoError(e) => write!(f, "I/O error: {}", e),
            StoreFileError::TomlError(e) => write!(f, "TOML parse error: {}", e),
            StoreFileError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
            StoreFileError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for StoreFileError {}

impl From<std::io::Error> for StoreFileError {
    fn from(e: std::io::Error) -> Self {
        StoreFileError::IoError(e)
    }
}

impl From<toml::de::Error> for StoreFileError {
    fn from(e: toml::de::Error) -> Self {
        StoreFileError::TomlError(e)
    }
}

impl From<toml::ser::Error> for StoreFileError {
    fn from(e: toml::ser::Error) -> Self {
        StoreFileError::TomlSerError(e)
    }
}

impl From<StoreFileError> for EmuconfError {
    fn from(e: StoreFileError) -> Self {
        match e {
            StoreFileError::IoError(e) => e.into(),
            StoreFileError::TomlError(e) => e.into(),
            StoreFileError::TomlSerError(e) => e.into(),
            StoreFileError::LockError(message) => EmuconfError::io(message),
        }
    }
}

/// A handle to one store file.
///
/// Saves write a sibling tmp file, fsync it and rename it over the target,
/// so readers see either the old or the new store. Writers to the same file
/// are serialized through an exclusive lock on a sibling lock file, which
/// also keeps two processes from sharing the tmp file.
#[derive(Debug, Clone)]
pub struct StoreFile {
    path: PathBuf,
}

impl StoreFile {
    /// Creates a new store file handle.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the TOML file
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the store.
    ///
    /// A missing or blank file is an empty store.
    ///
    /// # Returns
    ///
    /// - `Ok(IniStore)`: Successfully loaded (possibly empty)
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<IniStore, StoreFileError> {
        if !self.path.exists() {
            return Ok(IniStore::new());
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(IniStore::new());
        }

        Ok(toml::from_str(&content)?)
    }

    /// Saves the store atomically while holding the write lock.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully saved
    /// - `Err`: Failed to lock, serialize or write the file
    pub fn save(&self, store: &IniStore) -> Result<(), StoreFileError> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(store)?;

        let _lock = WriteLock::acquire(&self.sibling("lock")?)?;

        let tmp_path = self.sibling("tmp")?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// `.<file name>.<suffix>` next to the store file.
    fn sibling(&self, suffix: &str) -> Result<PathBuf, StoreFileError> {
        match (self.path.parent(), self.path.file_name()) {
            (Some(parent), Some(file_name)) => Ok(parent.join(format!(
                ".{}.{suffix}",
                file_name.to_string_lossy()
            ))),
            _ => Err(StoreFileError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} does not name a file", self.path.display()),
            ))),
        }
    }
}

/// Exclusive `fs2` lock on a store's lock file, released on drop.
///
/// The lock file stays on disk: deleting it would let a waiting writer lock
/// an unlinked file while a third one locks a fresh one.
struct WriteLock {
    file: File,
}

impl WriteLock {
    fn acquire(lock_path: &Path) -> Result<Self, StoreFileError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)?;

        file.lock_exclusive().map_err(|e| {
            StoreFileError::LockError(format!("{}: {}", lock_path.display(), e))
        })?;

        Ok(Self { file })
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            // Closing the handle below releases it anyway.
            debug!("Explicit unlock failed: {}", e);
        }
    }
}
