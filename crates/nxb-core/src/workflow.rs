//! Review workflow models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Workflow model started by the "start review" action.
pub const PARALLEL_REVIEW_MODEL: &str = "ParallelDocumentReview";
/// Action that completes the first task of [`PARALLEL_REVIEW_MODEL`].
pub const START_REVIEW_ACTION: &str = "start_review";
/// Comment sent along with the start-review action.
pub const START_REVIEW_COMMENT: &str = "a comment";

/// A running workflow instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    #[serde(default)]
    pub workflow_model_name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub attached_document_ids: Vec<Value>,
}

/// A workflow task waiting for an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub workflow_instance_id: String,
    #[serde(default)]
    pub state: String,
}

/// Payload completing a task with a named action.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCompletion {
    pub action: String,
    pub comment: String,
    pub variables: Map<String, Value>,
}

/// Who reviews a document, and until when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    /// The user starting the review; always the first participant.
    pub initiator: String,
    pub reviewers: Vec<String>,
    pub end_date: NaiveDate,
}

impl ReviewRequest {
    /// Principals in `user:<name>` form, initiator first.
    pub fn principals(&self) -> Vec<String> {
        std::iter::once(&self.initiator)
            .chain(self.reviewers.iter())
            .map(|user| format!("user:{user}"))
            .collect()
    }

    /// The start-review completion: `end_date`, `participants`, `assignees`.
    pub fn to_completion(&self) -> TaskCompletion {
        let principals: Vec<Value> = self.principals().into_iter().map(Value::String).collect();

        let mut variables = Map::new();
        variables.insert(
            "end_date".to_string(),
            Value::String(self.end_date.format("%Y-%m-%d").to_string()),
        );
        variables.insert("participants".to_string(), Value::Array(principals.clone()));
        variables.insert("assignees".to_string(), Value::Array(principals));

        TaskCompletion {
            action: START_REVIEW_ACTION.to_string(),
            comment: START_REVIEW_COMMENT.to_string(),
            variables,
        }
    }
}
