//! What the controller needs from the user-facing surface.

use async_trait::async_trait;

use crate::error::ErrorReport;

/// Modal dialogs shown by the front-end.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Shows an error and returns once it has been acknowledged.
    async fn report(&self, report: ErrorReport);

    /// Asks a yes/no question.
    async fn confirm(&self, title: &str, message: &str) -> bool;
}
