//! Connection settings.

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/nuxeo";
pub const DEFAULT_USERNAME: &str = "Administrator";
pub const DEFAULT_PASSWORD: &str = "Administrator";

/// Where the repository lives and who we are on it.
///
/// Replaced as a whole when the user edits the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub server_url: String,
    pub username: String,
    pub password: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl ConnectionSettings {
    pub fn new(
        server_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Copy with another server URL.
    pub fn with_server_url(&self, server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..self.clone()
        }
    }

    /// Copy with other credentials.
    pub fn with_credentials(&self, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..self.clone()
        }
    }
}

/// Persistent store for [`ConnectionSettings`].
pub trait SettingsRepository: Send + Sync {
    /// Loads the settings, falling back to defaults when nothing is stored.
    fn load(&self) -> Result<ConnectionSettings>;

    fn save(&self, settings: &ConnectionSettings) -> Result<()>;
}
