//! Domain layer of the Nuxeo browser.
//!
//! Models, row projections and the traits the application layer drives:
//! [`repository::RemoteRepository`] for the server,
//! [`settings::SettingsRepository`] for persisted connection details and
//! [`presenter::Presenter`] for dialogs.

pub mod color;
pub mod document;
pub mod error;
pub mod naming;
pub mod observable;
pub mod presenter;
pub mod repository;
pub mod settings;
pub mod user;
pub mod workflow;

// Re-export common error type
pub use error::{BrowserError, ErrorReport, Result};
