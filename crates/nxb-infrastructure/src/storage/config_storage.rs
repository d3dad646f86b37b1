//! TOML file storage with atomic writes.
//!
//! Writes go to a sibling temp file that is fsynced and renamed over the
//! target. Read-modify-write cycles hold an exclusive lock on a sibling
//! `.lock` file.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use nxb_core::BrowserError;
use thiserror::Error;

/// Failures of [`ConfigStorage`].
#[derive(Debug, Error)]
pub enum ConfigStorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<ConfigStorageError> for BrowserError {
    fn from(e: ConfigStorageError) -> Self {
        match e {
            ConfigStorageError::Io(io) => io.into(),
            ConfigStorageError::Parse(de) => de.into(),
            ConfigStorageError::Serialize(ser) => ser.into(),
            ConfigStorageError::Lock(message) => BrowserError::config(message),
        }
    }
}

/// A TOML file holding one serde document.
pub struct ConfigStorage {
    path: PathBuf,
    /// Unix mode applied to the file after every write.
    mode: Option<u32>,
}

impl ConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path, mode: None }
    }

    /// Restricts file permissions after each write (Unix only).
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file; `None` when it is missing or blank.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, ConfigStorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(toml::from_str(&content)?))
    }

    /// Serializes and writes the file atomically.
    pub fn save<T: Serialize>(&self, data: &T) -> Result<(), ConfigStorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(data)?;
        let temp_path = self.temp_path()?;
        {
            let mut temp_file = File::create(&temp_path)?;
            temp_file.write_all(contents.as_bytes())?;
            temp_file.sync_all()?;
        }

        self.apply_mode(&temp_path)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    /// Read-modify-write under an exclusive lock.
    ///
    /// `f` receives the stored value or `default_value` when the file does
    /// not exist yet; the result is written back atomically.
    pub fn update<T, F>(&self, default_value: T, f: F) -> Result<(), ConfigStorageError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data);
        self.save(&data)?;

        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf, ConfigStorageError> {
        match (self.path.parent(), self.path.file_name()) {
            (Some(parent), Some(file_name)) => {
                Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
            }
            _ => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file path", self.path.display()),
            )
            .into()),
        }
    }

    #[cfg(unix)]
    fn apply_mode(&self, path: &Path) -> Result<(), ConfigStorageError> {
        if let Some(mode) = self.mode {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn apply_mode(&self, _path: &Path) -> Result<(), ConfigStorageError> {
        Ok(())
    }
}

/// Exclusive lock on `<file>.lock`, released and removed on drop.
struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, ConfigStorageError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        fs2::FileExt::lock_exclusive(&file)
            .map_err(|e| ConfigStorageError::Lock(format!("{}: {e}", lock_path.display())))?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: i64,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("test.toml"));

        let data = Sample {
            name: "test".into(),
            count: 42,
        };
        storage.save(&data).unwrap();

        let loaded: Sample = storage.load().unwrap().unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_load_nonexistent_or_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.toml");
        let storage = ConfigStorage::new(path.clone());
        assert!(storage.load::<Sample>().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(storage.load::<Sample>().unwrap().is_none());
    }

    #[test]
    fn test_update_starts_from_default() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("test.toml"));
        let default_data = Sample {
            name: "default".into(),
            count: 0,
        };

        storage
            .update(default_data.clone(), |data| data.count = 10)
            .unwrap();
        storage.update(default_data, |data| data.count += 5).unwrap();

        let loaded: Sample = storage.load().unwrap().unwrap();
        assert_eq!(loaded.count, 15);
        assert_eq!(loaded.name, "default");
        // lock file is cleaned up
        assert!(!temp_dir.path().join("test.lock").exists());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.toml");
        let storage = ConfigStorage::new(file_path.clone());

        storage
            .save(&Sample {
                name: "test".into(),
                count: 1,
            })
            .unwrap();

        assert!(!temp_dir.path().join(".test.toml.tmp").exists());
        assert!(file_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_mode_is_applied() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.toml");
        let storage = ConfigStorage::new(file_path.clone()).with_mode(0o600);

        storage
            .save(&Sample {
                name: "s".into(),
                count: 0,
            })
            .unwrap();

        let mode = fs::metadata(&file_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_parse_error_maps_to_serialization() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("broken.toml");
        fs::write(&file_path, "name = ").unwrap();
        let storage = ConfigStorage::new(file_path);

        let err: BrowserError = storage.load::<Sample>().unwrap_err().into();
        assert!(matches!(err, BrowserError::Serialization { .. }));
    }
}
