//! NuxeoClient - REST implementation of [`RemoteRepository`].
//!
//! Talks to the REST API v1 under `<server_url>/api/v1` with HTTP basic
//! authentication. Documents are always fetched with the `dublincore`
//! schema so that `dc:title` is available.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use nxb_core::document::{Document, NewDocument};
use nxb_core::repository::RemoteRepository;
use nxb_core::settings::ConnectionSettings;
use nxb_core::workflow::{Task, TaskCompletion, Workflow};
use nxb_core::{BrowserError, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use super::dto::{
    BatchResponse, CompleteTaskRequest, CreateDocumentRequest, DocumentsEntity, OperationRequest,
    StartWorkflowRequest, TasksEntity, error_message, usernames_from_suggestion,
};

const DEFAULT_SCHEMA: &str = "dublincore";
const IMPORT_OPERATION: &str = "FileManager.Import";
const USER_SUGGESTION_OPERATION: &str = "UserGroup.Suggestion";

/// Builds API URLs below a server base URL.
#[derive(Debug, Clone)]
pub struct ApiUrls {
    base: Url,
}

impl ApiUrls {
    pub fn new(server_url: &str) -> Result<Self> {
        let trimmed = server_url.trim().trim_end_matches('/');
        let base = Url::parse(trimmed)
            .map_err(|e| BrowserError::config(format!("Invalid server URL '{server_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(BrowserError::config(format!(
                "Server URL '{server_url}' cannot hold API paths"
            )));
        }
        Ok(Self { base })
    }

    /// `<base>/api/v1/<segments...>`, each segment percent-encoded.
    fn api<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "v1"]).extend(segments);
        }
        url
    }

    /// The root document lives at `path/` with a trailing slash.
    pub fn by_path(&self, document_path: &str) -> Url {
        let mut segments: Vec<&str> = document_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() {
            segments.push("");
        }
        self.api(std::iter::once("path").chain(segments))
    }

    pub fn by_id(&self, uid: &str) -> Url {
        self.api(["id", uid])
    }

    pub fn children(&self, uid: &str) -> Url {
        self.api(["id", uid, "@children"])
    }

    pub fn workflow(&self, uid: &str) -> Url {
        self.api(["id", uid, "@workflow"])
    }

    pub fn workflow_tasks(&self, uid: &str, workflow_id: &str) -> Url {
        self.api(["id", uid, "@workflow", workflow_id, "task"])
    }

    pub fn task_action(&self, uid: &str, task_id: &str, action: &str) -> Url {
        self.api(["id", uid, "@task", task_id, action])
    }

    pub fn new_batch(&self) -> Url {
        self.api(["upload"])
    }

    pub fn batch_file(&self, batch_id: &str, index: usize) -> Url {
        let index = index.to_string();
        self.api(["upload", batch_id, index.as_str()])
    }

    pub fn batch_execute(&self, batch_id: &str, operation: &str) -> Url {
        self.api(["upload", batch_id, "execute", operation])
    }

    pub fn operation(&self, operation: &str) -> Url {
        self.api(["automation", operation])
    }
}

/// `Basic base64(username:password)`.
pub fn basic_authorization(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        BASE64_STANDARD.encode(format!("{username}:{password}"))
    )
}

/// Authenticated session against one Nuxeo server.
#[derive(Clone)]
pub struct NuxeoClient {
    client: Client,
    urls: ApiUrls,
    authorization: HeaderValue,
}

impl NuxeoClient {
    pub fn new(settings: &ConnectionSettings) -> Result<Self> {
        let urls = ApiUrls::new(&settings.server_url)?;
        let mut authorization =
            HeaderValue::from_str(&basic_authorization(&settings.username, &settings.password))
                .map_err(|e| BrowserError::config(format!("Invalid credentials: {e}")))?;
        authorization.set_sensitive(true);

        Ok(Self {
            client: Client::new(),
            urls,
            authorization,
        })
    }

    pub fn urls(&self) -> &ApiUrls {
        &self.urls
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(
            "x-nxdocumentproperties",
            HeaderValue::from_static(DEFAULT_SCHEMA),
        );
        self.client.request(method, url).headers(headers)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|err| BrowserError::from_source_chain("Nuxeo request failed", &err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Nuxeo error body".to_string());
            return Err(BrowserError::server(status.as_u16(), error_message(&body)));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send(builder).await?;
        let body = response
            .bytes()
            .await
            .map_err(|err| BrowserError::from_source_chain("Failed to read Nuxeo response", &err))?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_document(&self, url: Url, enricher: Option<&'static str>) -> Result<Document> {
        let mut builder = self.request(Method::GET, url);
        if let Some(enricher) = enricher {
            // Older servers only read the X-NX form of the header.
            builder = builder
                .header("enrichers-document", enricher)
                .header("X-NXenrichers.document", enricher);
        }
        self.send_json(builder).await
    }

    async fn upload_file(&self, batch_id: &str, index: usize, file: &Path) -> Result<()> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| BrowserError::io(format!("Cannot read {}: {e}", file.display())))?;
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| BrowserError::io(format!("{} is not a file", file.display())))?;
        let mime = mime_guess::from_path(file).first_or_octet_stream();

        tracing::debug!(batch = batch_id, index, file = %file.display(), "uploading file");
        let builder = self
            .request(Method::POST, self.urls.batch_file(batch_id, index))
            .header(CONTENT_TYPE, "application/octet-stream")
            .header("X-File-Name", file_name)
            .header("X-File-Size", bytes.len().to_string())
            .header("X-File-Type", mime.essence_str())
            .body(bytes);
        self.send(builder).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteRepository for NuxeoClient {
    async fn fetch_by_path(&self, path: &str) -> Result<Document> {
        tracing::debug!(path, "fetching document by path");
        self.get_document(self.urls.by_path(path), None).await
    }

    async fn fetch_by_id(&self, uid: &str) -> Result<Document> {
        tracing::debug!(uid, "fetching document by id");
        self.get_document(self.urls.by_id(uid), None).await
    }

    async fn children(&self, parent: &Document) -> Result<Vec<Document>> {
        let entity: DocumentsEntity = self
            .send_json(self.request(Method::GET, self.urls.children(&parent.uid)))
            .await?;
        Ok(entity.entries)
    }

    async fn with_thumbnail(&self, document: &Document) -> Result<Document> {
        self.get_document(self.urls.by_id(&document.uid), Some("thumbnail"))
            .await
    }

    async fn create_child(&self, parent: &Document, child: NewDocument) -> Result<Document> {
        let builder = self
            .request(Method::POST, self.urls.by_id(&parent.uid))
            .json(&CreateDocumentRequest::new(&child));
        self.send_json(builder).await
    }

    async fn delete(&self, document: &Document) -> Result<()> {
        self.send(self.request(Method::DELETE, self.urls.by_id(&document.uid)))
            .await?;
        Ok(())
    }

    async fn upload_and_import(
        &self,
        files: &[PathBuf],
        current_document_path: &str,
    ) -> Result<()> {
        let batch: BatchResponse = self
            .send_json(self.request(Method::POST, self.urls.new_batch()))
            .await?;

        for (index, file) in files.iter().enumerate() {
            self.upload_file(&batch.batch_id, index, file).await?;
        }

        let operation = OperationRequest::default().context("currentDocument", current_document_path);
        let builder = self
            .request(
                Method::POST,
                self.urls.batch_execute(&batch.batch_id, IMPORT_OPERATION),
            )
            .json(&operation);
        self.send(builder).await?;
        Ok(())
    }

    async fn suggest_users(&self) -> Result<Vec<String>> {
        let operation = OperationRequest::default().param("searchType", "USER_TYPE");
        let builder = self
            .request(Method::POST, self.urls.operation(USER_SUGGESTION_OPERATION))
            .json(&operation);
        let body: serde_json::Value = self.send_json(builder).await?;
        Ok(usernames_from_suggestion(&body))
    }

    async fn start_workflow(&self, document: &Document, model_name: &str) -> Result<Workflow> {
        let builder = self
            .request(Method::POST, self.urls.workflow(&document.uid))
            .json(&StartWorkflowRequest::new(model_name, &document.uid));
        self.send_json(builder).await
    }

    async fn workflow_tasks(&self, document: &Document, workflow: &Workflow) -> Result<Vec<Task>> {
        let url = self.urls.workflow_tasks(&document.uid, &workflow.id);
        let entity: TasksEntity = self.send_json(self.request(Method::GET, url)).await?;
        Ok(entity.entries)
    }

    async fn complete_task(
        &self,
        document: &Document,
        task: &Task,
        completion: TaskCompletion,
    ) -> Result<()> {
        let url = self
            .urls
            .task_action(&document.uid, &task.id, &completion.action);
        let builder = self
            .request(Method::PUT, url)
            .json(&CompleteTaskRequest::new(task, &completion));
        self.send(builder).await?;
        Ok(())
    }

    async fn download(&self, url: &str, destination: &Path) -> Result<()> {
        let url = Url::parse(url)
            .map_err(|e| BrowserError::internal(format!("Invalid download URL '{url}': {e}")))?;
        let response = self.send(self.request(Method::GET, url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| BrowserError::from_source_chain("Download interrupted", &err))?;

        // Rename into place so an interrupted write never looks cached.
        let partial = destination.with_extension("part");
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, destination).await?;
        Ok(())
    }
}
