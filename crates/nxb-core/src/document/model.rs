//! Document domain model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Document type of plain folders.
pub const FOLDER_TYPE: &str = "Folder";
/// Document type of repository roots; neither a folder nor a file row.
pub const DOMAIN_TYPE: &str = "Domain";
/// Facet carried by every document that can hold children.
pub const FOLDERISH_FACET: &str = "Folderish";

/// A document as returned by the repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub uid: String,
    pub path: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub parent_ref: String,
    /// Lifecycle state, e.g. `project` or `approved`.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub facets: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub context_parameters: Map<String, Value>,
}

impl Document {
    /// True when the document can hold children.
    pub fn is_folderish(&self) -> bool {
        self.facets.iter().any(|facet| facet == FOLDERISH_FACET)
    }

    /// The `dc:title` property when the dublincore schema was fetched.
    pub fn dc_title(&self) -> Option<&str> {
        self.properties.get("dc:title").and_then(Value::as_str)
    }

    /// Title to display: `dc:title`, falling back to the document title.
    pub fn display_title(&self) -> &str {
        self.dc_title().unwrap_or(&self.title)
    }

    /// URL of the rendition produced by the `thumbnail` enricher.
    ///
    /// `None` when the enricher did not run or produced an empty URL.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.context_parameters
            .get("thumbnail")
            .and_then(|thumbnail| thumbnail.get("url"))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }

    /// True for the root of the repository, whose parent reference is itself.
    pub fn is_root(&self) -> bool {
        self.parent_ref.is_empty() || self.parent_ref == self.path
    }
}

/// A document to be created under a parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub properties: Map<String, Value>,
}

impl NewDocument {
    /// A folder whose `dc:title` keeps the title exactly as entered.
    pub fn folder(name: impl Into<String>, title: impl Into<String>) -> Self {
        let mut properties = Map::new();
        properties.insert("dc:title".to_string(), Value::String(title.into()));
        Self {
            name: name.into(),
            doc_type: FOLDER_TYPE.to_string(),
            properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        serde_json::from_value(json!({
            "entity-type": "document",
            "uid": "a1",
            "path": "/default-domain/workspaces/report.pdf",
            "type": "File",
            "title": "report.pdf",
            "parentRef": "p1",
            "state": "project",
            "facets": ["Downloadable", "Versionable"],
            "properties": { "dc:title": "Quarterly report" },
            "contextParameters": { "thumbnail": { "url": "http://host/thumb" } }
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_rest_entity() {
        let document = sample();
        assert_eq!(document.uid, "a1");
        assert_eq!(document.doc_type, "File");
        assert_eq!(document.parent_ref, "p1");
        assert_eq!(document.state, "project");
        assert!(!document.is_folderish());
    }

    #[test]
    fn test_display_title_prefers_dublincore() {
        let mut document = sample();
        assert_eq!(document.display_title(), "Quarterly report");

        document.properties.clear();
        assert_eq!(document.display_title(), "report.pdf");
    }

    #[test]
    fn test_thumbnail_url() {
        let mut document = sample();
        assert_eq!(document.thumbnail_url(), Some("http://host/thumb"));

        document
            .context_parameters
            .insert("thumbnail".into(), json!({ "url": "" }));
        assert_eq!(document.thumbnail_url(), None);

        document.context_parameters.clear();
        assert_eq!(document.thumbnail_url(), None);
    }

    #[test]
    fn test_new_folder_keeps_title() {
        let folder = NewDocument::folder("MyFolder", "My Folder!");
        assert_eq!(folder.doc_type, "Folder");
        assert_eq!(folder.properties["dc:title"], "My Folder!");
    }
}
