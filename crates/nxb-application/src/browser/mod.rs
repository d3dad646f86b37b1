//! Browser controller.
//!
//! Holds the browsing state (session, current directory, children, rows) and
//! runs the navigation pipeline:
//!
//! ```text
//! path input -> current directory -> children -> thumbnails -> rows
//! ```
//!
//! Every public action marks the controller busy for its duration and
//! reports its own failures through the [`Presenter`]; none of them return
//! errors.

mod actions;
mod connection;

use std::sync::Arc;

use nxb_core::document::{Document, DocumentRow, PlaceholderIcon, Thumbnail};
use nxb_core::observable::BusyState;
use nxb_core::presenter::Presenter;
use nxb_core::repository::{RemoteRepository, RepositoryConnector};
use nxb_core::settings::{ConnectionSettings, SettingsRepository};
use nxb_core::user::{UserQuery, UserRow, filter_users};
use nxb_core::{BrowserError, ErrorReport, Result};
use nxb_infrastructure::ThumbnailCache;

/// Path shown before the user navigates anywhere.
pub const DEFAULT_PATH: &str = "/";

pub struct BrowserController {
    settings: ConnectionSettings,
    settings_repository: Arc<dyn SettingsRepository>,
    connector: Arc<dyn RepositoryConnector>,
    /// `None` until the first connection attempt, and after a failed one.
    session: Option<Arc<dyn RemoteRepository>>,
    thumbnails: ThumbnailCache,
    presenter: Arc<dyn Presenter>,
    current_directory: Option<Document>,
    children: Option<Vec<Document>>,
    documents: Vec<DocumentRow>,
    users: Vec<UserRow>,
    user_query: Option<UserQuery>,
    path_input: String,
    title: String,
    busy: BusyState,
}

impl BrowserController {
    pub fn new(
        settings: ConnectionSettings,
        settings_repository: Arc<dyn SettingsRepository>,
        connector: Arc<dyn RepositoryConnector>,
        thumbnails: ThumbnailCache,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            title: settings.server_url.clone(),
            settings,
            settings_repository,
            connector,
            session: None,
            thumbnails,
            presenter,
            current_directory: None,
            children: None,
            documents: Vec::new(),
            users: Vec::new(),
            user_query: None,
            path_input: DEFAULT_PATH.to_string(),
            busy: BusyState::new(),
        }
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn current_directory(&self) -> Option<&Document> {
        self.current_directory.as_ref()
    }

    pub fn children(&self) -> Option<&[Document]> {
        self.children.as_deref()
    }

    pub fn documents(&self) -> &[DocumentRow] {
        &self.documents
    }

    pub fn users(&self) -> &[UserRow] {
        &self.users
    }

    pub fn path_input(&self) -> &str {
        &self.path_input
    }

    /// Edits the path box without navigating.
    pub fn set_path_input(&mut self, path: impl Into<String>) {
        self.path_input = path.into();
    }

    /// Window title; the server URL of the current session.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn busy(&self) -> &BusyState {
        &self.busy
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// First load: connect, list users, then show the path input.
    pub async fn start(&mut self) {
        let _busy = self.busy.enter();
        tracing::info!(server = %self.settings.server_url, "starting browser");
        self.load_server_info().await;
        self.load_current_directory().await;
    }

    /// Reopens the session from the current settings and reloads the users.
    pub async fn update_server_info(&mut self) {
        let _busy = self.busy.enter();
        self.load_server_info().await;
    }

    /// Sets the path input and loads it.
    pub async fn navigate(&mut self, path: impl Into<String>) {
        let _busy = self.busy.enter();
        self.path_input = path.into();
        tracing::info!(path = %self.path_input, "navigating");
        self.load_current_directory().await;
    }

    /// Reloads the directory at the path input, then its listing.
    pub async fn refresh(&mut self) {
        let _busy = self.busy.enter();
        self.load_current_directory().await;
    }

    /// Reloads the listing of the current directory.
    pub async fn update_view(&mut self) {
        let _busy = self.busy.enter();
        self.load_view().await;
    }

    /// Opens the row at `index`: folderish documents become the path input,
    /// then the directory at the path input is reloaded. No-op without a row.
    pub async fn open(&mut self, index: usize) {
        let Some(document) = self.documents.get(index).map(DocumentRow::document) else {
            return;
        };
        if document.is_folderish() {
            self.path_input = document.path.clone();
        }

        let _busy = self.busy.enter();
        self.load_current_directory().await;
    }

    /// Moves to the parent of the current directory. No-op at the root.
    pub async fn back(&mut self) {
        let Some(parent_ref) = self
            .current_directory
            .as_ref()
            .filter(|directory| !directory.is_root())
            .map(|directory| directory.parent_ref.clone())
        else {
            return;
        };

        let _busy = self.busy.enter();
        match self.fetch_by_id(&parent_ref).await {
            Ok(parent) => {
                tracing::info!(path = %parent.path, "moved to parent");
                self.path_input = parent.path.clone();
                self.current_directory = Some(parent);
            }
            Err(err) => {
                self.report("Could not get parent of current directory.", &err)
                    .await
            }
        }
        self.load_view().await;
    }

    /// Sets the reviewer filter; blank text clears it.
    pub fn filter_users(&mut self, text: &str) {
        self.user_query = UserQuery::parse(text);
    }

    pub fn user_query(&self) -> Option<&UserQuery> {
        self.user_query.as_ref()
    }

    /// Users matching the active filter, in list order.
    pub fn visible_users(&self) -> Vec<&UserRow> {
        filter_users(&self.users, self.user_query.as_ref())
    }

    /// Ticks or unticks a reviewer. Returns `false` for an unknown username.
    pub fn set_user_checked(&mut self, username: &str, checked: bool) -> bool {
        match self.users.iter_mut().find(|row| row.username() == username) {
            Some(row) => {
                row.set_is_checked(checked);
                true
            }
            None => false,
        }
    }

    async fn load_current_directory(&mut self) {
        match self.fetch_by_path(&self.path_input).await {
            Ok(directory) => {
                tracing::debug!(path = %directory.path, uid = %directory.uid, "current directory");
                self.current_directory = Some(directory);
            }
            Err(err) => {
                self.report("Could not get current directory", &err).await;
                return;
            }
        }
        self.load_view().await;
    }

    async fn load_view(&mut self) {
        if let Some(directory) = self.current_directory.clone() {
            match self.fetch_children(&directory).await {
                Ok(children) => self.children = Some(children),
                Err(err) => {
                    self.children = None;
                    self.report("Could not get current directory's children", &err)
                        .await;
                }
            }
        }
        self.resolve_thumbnails().await;
    }

    /// Rebuilds the document rows from the children, one child at a time.
    ///
    /// A child whose thumbnail cannot be resolved is reported and left out.
    async fn resolve_thumbnails(&mut self) {
        let Some(children) = self.children.clone() else {
            return;
        };

        self.documents.clear();
        for child in children {
            let enriched = match self.fetch_with_thumbnail(&child).await {
                Ok(enriched) => enriched,
                Err(err) => {
                    let context = format!(
                        "Could not get the tumbnail url of document \"{}\"",
                        child.path
                    );
                    self.report(&context, &err).await;
                    continue;
                }
            };

            let thumbnail = match enriched.thumbnail_url() {
                Some(url) => match self.cache_thumbnail(&child.path, url).await {
                    Ok(file) => Thumbnail::Cached(file),
                    Err(err) => {
                        let context = format!(
                            "Could not download thumbnal of document \"{}\"",
                            child.path
                        );
                        self.report(&context, &err).await;
                        continue;
                    }
                },
                None => Thumbnail::Placeholder(PlaceholderIcon::for_type(&child.doc_type)),
            };

            self.documents.push(DocumentRow::new(child, thumbnail));
        }
        tracing::debug!(rows = self.documents.len(), "listing rebuilt");
    }

    fn session(&self) -> Result<&dyn RemoteRepository> {
        self.session
            .as_deref()
            .ok_or_else(|| BrowserError::internal("Not connected to a Nuxeo server"))
    }

    fn current_directory_or_err(&self) -> Result<&Document> {
        self.current_directory
            .as_ref()
            .ok_or_else(|| BrowserError::internal("No current directory"))
    }

    async fn fetch_by_path(&self, path: &str) -> Result<Document> {
        self.session()?.fetch_by_path(path).await
    }

    async fn fetch_by_id(&self, uid: &str) -> Result<Document> {
        self.session()?.fetch_by_id(uid).await
    }

    async fn fetch_children(&self, directory: &Document) -> Result<Vec<Document>> {
        self.session()?.children(directory).await
    }

    async fn fetch_with_thumbnail(&self, document: &Document) -> Result<Document> {
        self.session()?.with_thumbnail(document).await
    }

    async fn cache_thumbnail(&self, document_path: &str, url: &str) -> Result<std::path::PathBuf> {
        self.thumbnails
            .ensure(document_path, url, self.session()?)
            .await
    }

    async fn report(&self, context: &str, error: &BrowserError) {
        tracing::warn!(error = %error, "{context}");
        self.presenter.report(ErrorReport::new(context, error)).await;
    }
}
