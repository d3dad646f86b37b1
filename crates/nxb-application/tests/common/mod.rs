//! In-memory doubles for controller tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nxb_application::BrowserController;
use nxb_core::document::{Document, FOLDERISH_FACET, NewDocument};
use nxb_core::presenter::Presenter;
use nxb_core::repository::{RemoteRepository, RepositoryConnector};
use nxb_core::settings::{ConnectionSettings, SettingsRepository};
use nxb_core::workflow::{Task, TaskCompletion, Workflow};
use nxb_core::{BrowserError, ErrorReport, Result};
use nxb_infrastructure::ThumbnailCache;
use serde_json::json;
use tempfile::TempDir;

pub fn folder(uid: &str, path: &str, parent_ref: &str) -> Document {
    Document {
        uid: uid.to_string(),
        path: path.to_string(),
        doc_type: "Folder".to_string(),
        title: path.rsplit('/').next().unwrap_or_default().to_string(),
        parent_ref: parent_ref.to_string(),
        facets: vec![FOLDERISH_FACET.to_string()],
        ..Default::default()
    }
}

pub fn file(uid: &str, path: &str, parent_ref: &str) -> Document {
    Document {
        uid: uid.to_string(),
        path: path.to_string(),
        doc_type: "File".to_string(),
        title: path.rsplit('/').next().unwrap_or_default().to_string(),
        parent_ref: parent_ref.to_string(),
        ..Default::default()
    }
}

/// Recorded mutation, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create { parent: String, child: NewDocument },
    Delete(String),
    Upload { files: Vec<PathBuf>, destination: String },
    StartWorkflow { uid: String, model: String },
    CompleteTask { task: String, completion: TaskCompletion },
}

#[derive(Default)]
struct Tree {
    documents: HashMap<String, Document>,
    children: HashMap<String, Vec<String>>,
}

/// A repository held in memory.
///
/// Documents are stored by uid; `children` lists uids in insertion order.
#[derive(Default)]
pub struct InMemoryRepository {
    tree: Mutex<Tree>,
    thumbnail_urls: Mutex<HashMap<String, String>>,
    users: Mutex<Vec<String>>,
    tasks: Mutex<Vec<Task>>,
    calls: Mutex<Vec<Call>>,
    failing_paths: Mutex<HashSet<String>>,
    failing_enrich: Mutex<HashSet<String>>,
    failing_downloads: Mutex<HashSet<String>>,
    failing_deletes: Mutex<HashSet<String>>,
    fail_children: Mutex<bool>,
    fail_users: Mutex<bool>,
    fail_create: Mutex<bool>,
    pub children_fetches: AtomicUsize,
    pub path_fetches: AtomicUsize,
    pub downloads: AtomicUsize,
    pub user_fetches: AtomicUsize,
}

impl InMemoryRepository {
    /// `/` holding `/ws`, which holds `a.pdf`, `Sub` and `b.txt`.
    pub fn sample() -> Arc<Self> {
        let repository = Self::default();
        repository.insert(Document {
            uid: "root".to_string(),
            path: "/".to_string(),
            doc_type: "Root".to_string(),
            facets: vec![FOLDERISH_FACET.to_string()],
            ..Default::default()
        });
        repository.insert(folder("ws", "/ws", "root"));
        repository.insert(file("a", "/ws/a.pdf", "ws"));
        repository.insert(folder("sub", "/ws/Sub", "ws"));
        repository.insert(file("b", "/ws/b.txt", "ws"));
        repository.set_users(&["Administrator", "anna", "bob", "Anne"]);
        repository.set_tasks(&["task-1", "task-2"]);
        Arc::new(repository)
    }

    pub fn insert(&self, document: Document) {
        let mut tree = self.tree.lock().unwrap();
        if !document.parent_ref.is_empty() {
            tree.children
                .entry(document.parent_ref.clone())
                .or_default()
                .push(document.uid.clone());
        }
        tree.documents.insert(document.uid.clone(), document);
    }

    pub fn set_users(&self, users: &[&str]) {
        *self.users.lock().unwrap() = users.iter().map(|user| user.to_string()).collect();
    }

    pub fn set_tasks(&self, ids: &[&str]) {
        *self.tasks.lock().unwrap() = ids
            .iter()
            .map(|id| Task {
                id: id.to_string(),
                ..Default::default()
            })
            .collect();
    }

    pub fn set_thumbnail_url(&self, path: &str, url: &str) {
        self.thumbnail_urls
            .lock()
            .unwrap()
            .insert(path.to_string(), url.to_string());
    }

    pub fn fail_path(&self, path: &str) {
        self.failing_paths.lock().unwrap().insert(path.to_string());
    }

    pub fn fail_enrich(&self, path: &str) {
        self.failing_enrich.lock().unwrap().insert(path.to_string());
    }

    pub fn fail_download(&self, url: &str) {
        self.failing_downloads.lock().unwrap().insert(url.to_string());
    }

    pub fn fail_delete(&self, uid: &str) {
        self.failing_deletes.lock().unwrap().insert(uid.to_string());
    }

    pub fn fail_children(&self, fail: bool) {
        *self.fail_children.lock().unwrap() = fail;
    }

    pub fn fail_users(&self, fail: bool) {
        *self.fail_users.lock().unwrap() = fail;
    }

    pub fn fail_create(&self, fail: bool) {
        *self.fail_create.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.tree.lock().unwrap().documents.contains_key(uid)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn not_found(path: &str) -> BrowserError {
        BrowserError::server(404, format!("Failed to get document {path}"))
    }
}

#[async_trait]
impl RemoteRepository for InMemoryRepository {
    async fn fetch_by_path(&self, path: &str) -> Result<Document> {
        self.path_fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing_paths.lock().unwrap().contains(path) {
            return Err(BrowserError::transport("connection refused"));
        }
        let tree = self.tree.lock().unwrap();
        tree.documents
            .values()
            .find(|document| document.path == path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    async fn fetch_by_id(&self, uid: &str) -> Result<Document> {
        let tree = self.tree.lock().unwrap();
        tree.documents
            .get(uid)
            .cloned()
            .ok_or_else(|| Self::not_found(uid))
    }

    async fn children(&self, parent: &Document) -> Result<Vec<Document>> {
        self.children_fetches.fetch_add(1, Ordering::SeqCst);
        if *self.fail_children.lock().unwrap() {
            return Err(BrowserError::server(500, "children unavailable"));
        }
        let tree = self.tree.lock().unwrap();
        Ok(tree
            .children
            .get(&parent.uid)
            .map(|uids| {
                uids.iter()
                    .filter_map(|uid| tree.documents.get(uid).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn with_thumbnail(&self, document: &Document) -> Result<Document> {
        if self.failing_enrich.lock().unwrap().contains(&document.path) {
            return Err(BrowserError::server(500, "enricher failed"));
        }
        let mut enriched = document.clone();
        let url = self
            .thumbnail_urls
            .lock()
            .unwrap()
            .get(&document.path)
            .cloned()
            .unwrap_or_default();
        enriched
            .context_parameters
            .insert("thumbnail".to_string(), json!({ "url": url }));
        Ok(enriched)
    }

    async fn create_child(&self, parent: &Document, child: NewDocument) -> Result<Document> {
        self.record(Call::Create {
            parent: parent.uid.clone(),
            child: child.clone(),
        });
        if *self.fail_create.lock().unwrap() {
            return Err(BrowserError::server(403, "Privilege 'AddChildren' is not granted"));
        }
        let path = format!("{}/{}", parent.path.trim_end_matches('/'), child.name);
        let mut created = folder(&format!("new-{}", child.name), &path, &parent.uid);
        created.properties = child.properties;
        self.insert(created.clone());
        Ok(created)
    }

    async fn delete(&self, document: &Document) -> Result<()> {
        self.record(Call::Delete(document.uid.clone()));
        if self.failing_deletes.lock().unwrap().contains(&document.uid) {
            return Err(BrowserError::server(403, "Permission denied"));
        }
        let mut tree = self.tree.lock().unwrap();
        tree.documents.remove(&document.uid);
        for uids in tree.children.values_mut() {
            uids.retain(|uid| *uid != document.uid);
        }
        Ok(())
    }

    async fn upload_and_import(
        &self,
        files: &[PathBuf],
        current_document_path: &str,
    ) -> Result<()> {
        self.record(Call::Upload {
            files: files.to_vec(),
            destination: current_document_path.to_string(),
        });
        Ok(())
    }

    async fn suggest_users(&self) -> Result<Vec<String>> {
        self.user_fetches.fetch_add(1, Ordering::SeqCst);
        if *self.fail_users.lock().unwrap() {
            return Err(BrowserError::transport("directory unreachable"));
        }
        Ok(self.users.lock().unwrap().clone())
    }

    async fn start_workflow(&self, document: &Document, model_name: &str) -> Result<Workflow> {
        self.record(Call::StartWorkflow {
            uid: document.uid.clone(),
            model: model_name.to_string(),
        });
        Ok(Workflow {
            id: "wf-1".to_string(),
            workflow_model_name: model_name.to_string(),
            ..Default::default()
        })
    }

    async fn workflow_tasks(&self, _document: &Document, _workflow: &Workflow) -> Result<Vec<Task>> {
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn complete_task(
        &self,
        _document: &Document,
        task: &Task,
        completion: TaskCompletion,
    ) -> Result<()> {
        self.record(Call::CompleteTask {
            task: task.id.clone(),
            completion,
        });
        Ok(())
    }

    async fn download(&self, url: &str, destination: &Path) -> Result<()> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.failing_downloads.lock().unwrap().contains(url) {
            return Err(BrowserError::transport("download interrupted"));
        }
        std::fs::write(destination, url.as_bytes())?;
        Ok(())
    }
}

/// Records every dialog and answers confirmations with a fixed choice.
pub struct RecordingPresenter {
    pub reports: Mutex<Vec<ErrorReport>>,
    pub confirmations: Mutex<Vec<(String, String)>>,
    answer: bool,
}

impl RecordingPresenter {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            reports: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
            answer,
        })
    }

    pub fn report_titles(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .map(|report| report.title.clone())
            .collect()
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    async fn report(&self, report: ErrorReport) {
        self.reports.lock().unwrap().push(report);
    }

    async fn confirm(&self, title: &str, message: &str) -> bool {
        self.confirmations
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        self.answer
    }
}

/// Settings kept in memory; optionally refuses to save.
#[derive(Default)]
pub struct MemorySettings {
    pub saved: Mutex<Vec<ConnectionSettings>>,
    pub fail_save: bool,
}

impl SettingsRepository for MemorySettings {
    fn load(&self) -> Result<ConnectionSettings> {
        Ok(self.saved.lock().unwrap().last().cloned().unwrap_or_default())
    }

    fn save(&self, settings: &ConnectionSettings) -> Result<()> {
        if self.fail_save {
            return Err(BrowserError::io("read-only settings file"));
        }
        self.saved.lock().unwrap().push(settings.clone());
        Ok(())
    }
}

/// Everything a controller test needs, wired together.
pub struct Fixture {
    pub controller: BrowserController,
    pub repository: Arc<InMemoryRepository>,
    pub presenter: Arc<RecordingPresenter>,
    pub settings: Arc<MemorySettings>,
    pub connects: Arc<AtomicUsize>,
    pub cache_dir: TempDir,
}

impl Fixture {
    pub fn new(repository: Arc<InMemoryRepository>, presenter: Arc<RecordingPresenter>) -> Self {
        Self::with_settings(repository, presenter, MemorySettings::default())
    }

    pub fn with_settings(
        repository: Arc<InMemoryRepository>,
        presenter: Arc<RecordingPresenter>,
        settings: MemorySettings,
    ) -> Self {
        let cache_dir = TempDir::new().unwrap();
        let settings = Arc::new(settings);
        let connects = Arc::new(AtomicUsize::new(0));

        let session = repository.clone();
        let counter = connects.clone();
        let connector: Arc<dyn RepositoryConnector> = Arc::new(
            move |_settings: &ConnectionSettings| -> Result<Arc<dyn RemoteRepository>> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(session.clone())
            },
        );

        let controller = BrowserController::new(
            ConnectionSettings::default(),
            settings.clone(),
            connector,
            ThumbnailCache::with_dir(cache_dir.path()).unwrap(),
            presenter.clone(),
        );

        Self {
            controller,
            repository,
            presenter,
            settings,
            connects,
            cache_dir,
        }
    }

    /// Fixture already showing `/ws`.
    pub async fn at_workspace() -> Self {
        let mut fixture = Self::new(InMemoryRepository::sample(), RecordingPresenter::answering(true));
        fixture.controller.set_path_input("/ws");
        fixture.controller.start().await;
        fixture
    }

    pub fn row_titles(&self) -> Vec<String> {
        self.controller
            .documents()
            .iter()
            .map(|row| row.title().to_string())
            .collect()
    }

    pub fn children_fetches(&self) -> usize {
        self.repository.children_fetches.load(Ordering::SeqCst)
    }
}
