//! Remote repository contract.
//!
//! One method per call the browser makes. The infrastructure crate provides
//! the REST implementation; tests use in-memory ones.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::document::{Document, NewDocument};
use crate::error::Result;
use crate::settings::ConnectionSettings;
use crate::workflow::{Task, TaskCompletion, Workflow};

/// An authenticated session against a content repository.
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Fetches a document by its absolute path.
    async fn fetch_by_path(&self, path: &str) -> Result<Document>;

    /// Fetches a document by uid.
    async fn fetch_by_id(&self, uid: &str) -> Result<Document>;

    /// Lists the direct children of a folderish document, in repository order.
    async fn children(&self, parent: &Document) -> Result<Vec<Document>>;

    /// Re-fetches a document with the `thumbnail` enricher applied.
    async fn with_thumbnail(&self, document: &Document) -> Result<Document>;

    async fn create_child(&self, parent: &Document, child: NewDocument) -> Result<Document>;

    async fn delete(&self, document: &Document) -> Result<()>;

    /// Uploads local files as one batch and imports them into the document
    /// at `current_document_path`.
    async fn upload_and_import(&self, files: &[PathBuf], current_document_path: &str)
    -> Result<()>;

    /// Usernames known to the user directory.
    async fn suggest_users(&self) -> Result<Vec<String>>;

    /// Starts a workflow of the given model on a document.
    async fn start_workflow(&self, document: &Document, model_name: &str) -> Result<Workflow>;

    /// Open tasks of a workflow running on a document.
    async fn workflow_tasks(&self, document: &Document, workflow: &Workflow) -> Result<Vec<Task>>;

    /// Completes a task with the completion's action and variables.
    async fn complete_task(
        &self,
        document: &Document,
        task: &Task,
        completion: TaskCompletion,
    ) -> Result<()>;

    /// Downloads an authenticated URL into a local file.
    async fn download(&self, url: &str, destination: &Path) -> Result<()>;
}

/// Opens sessions. Reconnecting means asking for a new one.
pub trait RepositoryConnector: Send + Sync {
    fn connect(&self, settings: &ConnectionSettings) -> Result<Arc<dyn RemoteRepository>>;
}

impl<F> RepositoryConnector for F
where
    F: Fn(&ConnectionSettings) -> Result<Arc<dyn RemoteRepository>> + Send + Sync,
{
    fn connect(&self, settings: &ConnectionSettings) -> Result<Arc<dyn RemoteRepository>> {
        self(settings)
    }
}
