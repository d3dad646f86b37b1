//! Mutations of the current directory and the review workflow.
//!
//! Each action reloads the listing afterwards, whether it succeeded or not.

use std::path::PathBuf;

use chrono::Local;
use nxb_core::document::{Document, NewDocument};
use nxb_core::naming::sanitize_name;
use nxb_core::workflow::{PARALLEL_REVIEW_MODEL, ReviewRequest};
use nxb_core::{BrowserError, Result};

use super::BrowserController;

impl BrowserController {
    /// Creates a `Folder` child named after the sanitised title.
    pub async fn create_folder(&mut self, title: &str) {
        if title.is_empty() {
            return;
        }

        let _busy = self.busy.enter();
        let folder = NewDocument::folder(sanitize_name(title), title);
        match self.create_child(folder).await {
            Ok(created) => tracing::info!(path = %created.path, "folder created"),
            Err(err) => {
                let context = format!("Could not create directory \"{title}\"");
                self.report(&context, &err).await;
            }
        }
        self.load_view().await;
    }

    /// Deletes the rows at `indices` after confirmation.
    ///
    /// Every document is attempted; failures are reported one by one and the
    /// listing is reloaded once at the end. Returns how many were deleted.
    pub async fn delete_documents(&mut self, indices: &[usize]) -> usize {
        let documents: Vec<Document> = indices
            .iter()
            .filter_map(|index| self.documents.get(*index))
            .map(|row| row.document().clone())
            .collect();
        if documents.is_empty() {
            return 0;
        }

        let titles: Vec<String> = documents
            .iter()
            .map(|document| format!("\"{}\"", document.title))
            .collect();
        let message = format!("Do you really want to delete {}?", titles.join(","));
        if !self.presenter.confirm("Delete Confirmation", &message).await {
            return 0;
        }

        let _busy = self.busy.enter();
        let mut deleted = 0;
        for document in &documents {
            match self.delete_document(document).await {
                Ok(()) => {
                    tracing::info!(path = %document.path, "document deleted");
                    deleted += 1;
                }
                Err(err) => {
                    let context = format!("Could not delete document \"{}\"", document.path);
                    self.report(&context, &err).await;
                }
            }
        }
        self.load_view().await;
        deleted
    }

    /// Uploads local files into the current directory.
    pub async fn upload_files(&mut self, files: &[PathBuf]) {
        let _busy = self.busy.enter();
        match self.import_files(files).await {
            Ok(()) => tracing::info!(files = files.len(), "files imported"),
            Err(err) => self.report("Could not upload files.", &err).await,
        }
        self.load_view().await;
    }

    /// Starts a parallel review of the row at `index` with the ticked users.
    ///
    /// The ticks are cleared before the request is sent.
    pub async fn start_review(&mut self, index: usize) {
        let Some(document) = self
            .documents
            .get(index)
            .map(|row| row.document().clone())
        else {
            return;
        };

        let _busy = self.busy.enter();
        let reviewers: Vec<String> = self
            .users
            .iter()
            .filter(|row| row.is_checked())
            .map(|row| row.username().to_string())
            .collect();
        for row in &mut self.users {
            row.set_is_checked(false);
        }

        let review = ReviewRequest {
            initiator: self.settings.username.clone(),
            reviewers,
            end_date: Local::now().date_naive(),
        };

        match self.run_review(&document, &review).await {
            Ok(()) => tracing::info!(
                path = %document.path,
                reviewers = review.reviewers.len(),
                "review started"
            ),
            Err(err) => {
                self.report("Could not start parallel review task.", &err)
                    .await
            }
        }
        self.load_view().await;
    }

    async fn create_child(&self, child: NewDocument) -> Result<Document> {
        let parent = self.current_directory_or_err()?;
        self.session()?.create_child(parent, child).await
    }

    async fn delete_document(&self, document: &Document) -> Result<()> {
        self.session()?.delete(document).await
    }

    async fn import_files(&self, files: &[PathBuf]) -> Result<()> {
        let directory = self.current_directory_or_err()?;
        self.session()?
            .upload_and_import(files, &directory.path)
            .await
    }

    async fn run_review(&self, document: &Document, review: &ReviewRequest) -> Result<()> {
        let session = self.session()?;
        let workflow = session
            .start_workflow(document, PARALLEL_REVIEW_MODEL)
            .await?;
        let tasks = session.workflow_tasks(document, &workflow).await?;
        let task = tasks
            .first()
            .ok_or_else(|| BrowserError::not_found("Task", workflow.id.clone()))?;
        session
            .complete_task(document, task, review.to_completion())
            .await
    }
}
