//! Presentation row for a document in the listing.

use std::fmt;
use std::path::PathBuf;

use super::model::{DOMAIN_TYPE, Document, FOLDER_TYPE};
use crate::observable::Notifier;

/// Built-in icon used when a document has no thumbnail rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderIcon {
    Folder,
    File,
}

impl PlaceholderIcon {
    /// Folder icon for `Folder` documents, file icon for everything else.
    pub fn for_type(doc_type: &str) -> Self {
        if doc_type == FOLDER_TYPE {
            Self::Folder
        } else {
            Self::File
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Folder => "folder.png",
            Self::File => "file.png",
        }
    }
}

/// Image shown next to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Thumbnail {
    /// A rendition downloaded into the local thumbnail cache.
    Cached(PathBuf),
    Placeholder(PlaceholderIcon),
}

impl fmt::Display for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thumbnail::Cached(path) => write!(f, "{}", path.display()),
            Thumbnail::Placeholder(icon) => write!(f, "icons/{}", icon.file_name()),
        }
    }
}

/// Observable projection of a [`Document`].
///
/// `is_folder`, `is_file` and `title` are computed once at construction.
#[derive(Debug, Clone)]
pub struct DocumentRow {
    document: Document,
    thumbnail: Thumbnail,
    is_folder: bool,
    is_file: bool,
    title: String,
    notifier: Notifier,
}

impl DocumentRow {
    pub fn new(document: Document, thumbnail: Thumbnail) -> Self {
        let is_folder = document.doc_type == FOLDER_TYPE;
        let is_file = document.doc_type != FOLDER_TYPE && document.doc_type != DOMAIN_TYPE;
        let title = document.display_title().to_string();
        Self {
            document,
            thumbnail,
            is_folder,
            is_file,
            title,
            notifier: Notifier::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn thumbnail(&self) -> &Thumbnail {
        &self.thumbnail
    }

    pub fn is_folder(&self) -> bool {
        self.is_folder
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn set_document(&mut self, document: Document) {
        self.document = document;
        self.notifier.notify("Document");
    }

    pub fn set_thumbnail(&mut self, thumbnail: Thumbnail) {
        self.thumbnail = thumbnail;
        self.notifier.notify("Thumbnail");
    }

    pub fn set_is_folder(&mut self, is_folder: bool) {
        self.is_folder = is_folder;
        self.notifier.notify("IsFolder");
    }

    pub fn set_is_file(&mut self, is_file: bool) {
        self.is_file = is_file;
        self.notifier.notify("IsFile");
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.notifier.notify("Title");
    }
}
