//! Unified path management for nxb files.
//!
//! ```text
//! ~/.config/nxb/               # Config directory
//! ├── settings.toml            # Server URL and credentials
//! └── logs/                    # Application logs
//!     └── nxb.log.YYYY-MM-DD
//!
//! $TMPDIR/nxb/                 # Thumbnail cache, shared across runs
//! └── <document name>.jpg
//! ```

use std::path::PathBuf;

use nxb_core::BrowserError;
use thiserror::Error;

const APP_DIR: &str = "nxb";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Neither a config directory nor a home directory could be determined.
    #[error("Cannot find configuration directory")]
    ConfigDirNotFound,
}

impl From<PathError> for BrowserError {
    fn from(err: PathError) -> Self {
        BrowserError::config(err.to_string())
    }
}

/// Platform paths of the browser.
pub struct NxbPaths;

impl NxbPaths {
    /// Returns the configuration directory (e.g. `~/.config/nxb/`).
    ///
    /// Falls back to `~/.nxb` when the platform has no config dir.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .or_else(|| dirs::home_dir().map(|home| home.join(format!(".{APP_DIR}"))))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the settings file.
    pub fn settings_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("settings.toml"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Per-application temp directory holding downloaded thumbnails.
    pub fn thumbnail_dir() -> PathBuf {
        std::env::temp_dir().join(APP_DIR)
    }
}
