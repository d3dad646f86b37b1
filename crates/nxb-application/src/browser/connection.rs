//! Session lifecycle: connecting, listing reviewers, reconfiguring.

use nxb_core::Result;
use nxb_core::settings::ConnectionSettings;
use nxb_core::user::UserRow;

use super::BrowserController;

impl BrowserController {
    /// Switches to another server. Blank or unchanged URLs are ignored.
    ///
    /// Returns whether a reconnection happened.
    pub async fn update_server_url(&mut self, server_url: &str) -> bool {
        let server_url = server_url.trim();
        if server_url.is_empty() || server_url == self.settings.server_url {
            return false;
        }
        let settings = self.settings.with_server_url(server_url);
        self.reconnect(settings).await
    }

    /// Logs in as another user. Ignored when neither value changed.
    pub async fn update_credentials(&mut self, username: &str, password: &str) -> bool {
        if username == self.settings.username && password == self.settings.password {
            return false;
        }
        let settings = self.settings.with_credentials(username, password);
        self.reconnect(settings).await
    }

    /// Persists `settings`, replaces the session and reloads everything.
    ///
    /// Equal settings are a no-op. A failed save is reported; the new
    /// settings are used for this run anyway.
    pub async fn reconnect(&mut self, settings: ConnectionSettings) -> bool {
        if settings == self.settings {
            tracing::debug!("connection settings unchanged");
            return false;
        }

        let _busy = self.busy.enter();
        tracing::info!(server = %settings.server_url, user = %settings.username, "reconnecting");
        if let Err(err) = self.settings_repository.save(&settings) {
            self.report("Could not save connection settings", &err).await;
        }
        self.settings = settings;
        self.load_server_info().await;
        self.load_current_directory().await;
        true
    }

    /// Opens a new session and rebuilds the reviewer list without the
    /// connected user.
    pub(super) async fn load_server_info(&mut self) {
        self.title = self.settings.server_url.clone();

        match self.connector.connect(&self.settings) {
            Ok(session) => self.session = Some(session),
            Err(err) => {
                self.session = None;
                self.report("Could not get user list", &err).await;
                return;
            }
        }

        match self.fetch_usernames().await {
            Ok(usernames) => {
                let me = self.settings.username.clone();
                self.users = usernames
                    .into_iter()
                    .filter(|username| *username != me)
                    .map(UserRow::new)
                    .collect();
                tracing::info!(users = self.users.len(), "reviewer list loaded");
            }
            Err(err) => self.report("Could not get user list", &err).await,
        }
    }

    async fn fetch_usernames(&self) -> Result<Vec<String>> {
        self.session()?.suggest_users().await
    }
}
