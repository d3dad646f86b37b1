//! Wire entities of the Nuxeo REST API.

use nxb_core::document::{Document, NewDocument};
use nxb_core::workflow::{Task, TaskCompletion};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `documents` entity returned by `@children`.
#[derive(Debug, Deserialize)]
pub(crate) struct DocumentsEntity {
    #[serde(default)]
    pub entries: Vec<Document>,
}

/// `tasks` entity returned by `@workflow/<id>/task`.
#[derive(Debug, Deserialize)]
pub(crate) struct TasksEntity {
    #[serde(default)]
    pub entries: Vec<Task>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BatchResponse {
    pub batch_id: String,
}

/// Error body sent with non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateDocumentRequest<'a> {
    #[serde(rename = "entity-type")]
    pub entity_type: &'static str,
    #[serde(flatten)]
    pub document: &'a NewDocument,
}

impl<'a> CreateDocumentRequest<'a> {
    pub fn new(document: &'a NewDocument) -> Self {
        Self {
            entity_type: "document",
            document,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartWorkflowRequest<'a> {
    #[serde(rename = "entity-type")]
    pub entity_type: &'static str,
    pub workflow_model_name: &'a str,
    pub attached_document_ids: Vec<&'a str>,
}

impl<'a> StartWorkflowRequest<'a> {
    pub fn new(model_name: &'a str, document_uid: &'a str) -> Self {
        Self {
            entity_type: "workflow",
            workflow_model_name: model_name,
            attached_document_ids: vec![document_uid],
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CompleteTaskRequest<'a> {
    #[serde(rename = "entity-type")]
    pub entity_type: &'static str,
    pub id: &'a str,
    pub comment: &'a str,
    pub variables: &'a Map<String, Value>,
}

impl<'a> CompleteTaskRequest<'a> {
    pub fn new(task: &'a Task, completion: &'a TaskCompletion) -> Self {
        Self {
            entity_type: "task",
            id: &task.id,
            comment: &completion.comment,
            variables: &completion.variables,
        }
    }
}

/// Body of an automation call.
#[derive(Debug, Default, Serialize)]
pub(crate) struct OperationRequest {
    pub params: Map<String, Value>,
    pub context: Map<String, Value>,
}

impl OperationRequest {
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }
}

/// Usernames in a `UserGroup.Suggestion` result.
///
/// The operation answers either a bare JSON array or an entity list with
/// `entries`; entries without a `username` (groups) are skipped.
pub(crate) fn usernames_from_suggestion(body: &Value) -> Vec<String> {
    let entries = match body {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(object) => object
            .get("entries")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    };

    entries
        .iter()
        .filter_map(|entry| entry.get("username").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// Prefers the `message` of a JSON error body, else the raw body.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.message)
        .unwrap_or_else(|| body.to_string())
}
