//! On-disk thumbnail cache.
//!
//! Thumbnails are keyed by the file stem of the document path. Once a file
//! exists for a key it is served as is; nothing is ever refreshed or evicted.

use std::path::{Path, PathBuf};

use nxb_core::Result;
use nxb_core::repository::RemoteRepository;

use crate::paths::NxbPaths;

const THUMBNAIL_EXTENSION: &str = "jpg";

/// Directory of downloaded thumbnail renditions.
#[derive(Debug, Clone)]
pub struct ThumbnailCache {
    dir: PathBuf,
}

impl ThumbnailCache {
    /// Cache in the per-application temp directory.
    pub fn new() -> Result<Self> {
        Self::with_dir(NxbPaths::thumbnail_dir())
    }

    /// Cache in `dir`, created if missing.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a document path: `<stem of last segment>.jpg`.
    pub fn key_for(document_path: &str) -> String {
        let stem = Path::new(document_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "root".to_string());
        format!("{stem}.{THUMBNAIL_EXTENSION}")
    }

    pub fn path_for(&self, document_path: &str) -> PathBuf {
        self.dir.join(Self::key_for(document_path))
    }

    pub async fn contains(&self, document_path: &str) -> bool {
        tokio::fs::try_exists(self.path_for(document_path))
            .await
            .unwrap_or(false)
    }

    /// Returns the cached file for `document_path`, downloading `url` first
    /// when nothing is cached yet.
    pub async fn ensure(
        &self,
        document_path: &str,
        url: &str,
        repository: &dyn RemoteRepository,
    ) -> Result<PathBuf> {
        let path = self.path_for(document_path);
        if self.contains(document_path).await {
            tracing::debug!(document = document_path, "thumbnail cache hit");
            return Ok(path);
        }

        tracing::debug!(document = document_path, url, "downloading thumbnail");
        repository.download(url, &path).await?;
        Ok(path)
    }
}
