//! TOML-backed connection settings.

use std::path::PathBuf;

use nxb_core::Result;
use nxb_core::settings::{ConnectionSettings, SettingsRepository};
use serde::{Deserialize, Serialize};

use crate::paths::NxbPaths;
use crate::storage::ConfigStorage;

/// On-disk layout of `settings.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    connection: Option<ConnectionSettings>,
}

/// Stores settings in `settings.toml`, readable by the owner only.
pub struct TomlSettingsRepository {
    storage: ConfigStorage,
}

impl TomlSettingsRepository {
    /// Repository at the default location (`~/.config/nxb/settings.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(NxbPaths::settings_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            storage: ConfigStorage::new(path).with_mode(0o600),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.storage.path()
    }
}

impl SettingsRepository for TomlSettingsRepository {
    fn load(&self) -> Result<ConnectionSettings> {
        let file: Option<SettingsFile> = self.storage.load()?;
        Ok(file
            .and_then(|file| file.connection)
            .unwrap_or_default())
    }

    fn save(&self, settings: &ConnectionSettings) -> Result<()> {
        self.storage
            .update(SettingsFile::default(), |file| {
                file.connection = Some(settings.clone());
            })?;
        tracing::debug!(path = %self.storage.path().display(), "saved connection settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TomlSettingsRepository::with_path(temp_dir.path().join("settings.toml"));

        assert_eq!(repo.load().unwrap(), ConnectionSettings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("settings.toml");
        let repo = TomlSettingsRepository::with_path(path.clone());
        let settings = ConnectionSettings::new("https://demo.nuxeo.com/nuxeo", "jdoe", "s3cret");

        repo.save(&settings).unwrap();

        let reopened = TomlSettingsRepository::with_path(path.clone());
        assert_eq!(reopened.load().unwrap(), settings);

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("[connection]"));
        assert!(content.contains("server_url = \"https://demo.nuxeo.com/nuxeo\""));
    }

    #[test]
    fn test_file_without_connection_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "# nothing yet\n").unwrap();
        let repo = TomlSettingsRepository::with_path(path);

        assert_eq!(repo.load().unwrap(), ConnectionSettings::default());
    }
}
