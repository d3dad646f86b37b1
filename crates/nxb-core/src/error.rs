//! Error types for the Nuxeo browser.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire browser.
///
/// Remote failures keep their HTTP status so that presenters can show it.
/// Transport failures keep their whole cause chain as nested
/// [`BrowserError::Context`] layers around the root cause.
#[derive(Error, Debug, Clone)]
pub enum BrowserError {
    /// The request never got an answer (DNS, refused connection, TLS, ...)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The repository answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),

    /// A failure annotated with the step that produced it
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<BrowserError>,
    },
}

impl BrowserError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a Server error
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Wraps this error with the step it happened in.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Mirrors `err` and its `source()` chain as context layers around a
    /// transport error holding the last cause, all below `context`.
    pub fn from_source_chain(
        context: impl Into<String>,
        err: &(dyn std::error::Error + 'static),
    ) -> Self {
        let mut layers = vec![err.to_string()];
        let mut source = err.source();
        while let Some(cause) = source {
            layers.push(cause.to_string());
            source = cause.source();
        }
        let root = layers.pop().unwrap_or_default();
        layers
            .into_iter()
            .rev()
            .fold(Self::transport(root), |inner, layer| inner.context(layer))
            .context(context)
    }

    // ============================================================================
    // Inspection
    // ============================================================================

    /// Unwraps every [`BrowserError::Context`] layer down to the root cause.
    pub fn innermost(&self) -> &BrowserError {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Returns the HTTP status of the root cause, if it came from the server.
    pub fn status_code(&self) -> Option<u16> {
        match self.innermost() {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message of this error without its variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Transport { message } | Self::Io { message } => message.clone(),
            Self::Server { message, .. } => message.clone(),
            Self::Serialization { format, message } => format!("{format}: {message}"),
            Self::NotFound { entity_type, id } => format!("{entity_type} '{id}' not found"),
            Self::Config(message) | Self::Internal(message) => message.clone(),
            Self::Context { source, .. } => source.message(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for BrowserError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for BrowserError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BrowserError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for BrowserError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, BrowserError>`.
pub type Result<T> = std::result::Result<T, BrowserError>;

/// What a presenter shows when an action fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub title: String,
    pub message: String,
    pub status_code: Option<u16>,
}

impl ErrorReport {
    /// Builds the dialog content for a failed action.
    ///
    /// Server failures get a fixed title and carry their status code inside
    /// the message; everything else uses the action description as title and
    /// the root cause as message.
    pub fn new(context: &str, error: &BrowserError) -> Self {
        let root = error.innermost();
        match error.status_code() {
            Some(status) => Self {
                title: "NuxeoClient error".to_string(),
                message: format!("{context}\nStatus code:{status}\n{}", root.message()),
                status_code: Some(status),
            },
            None => Self {
                title: context.to_string(),
                message: root.message(),
                status_code: None,
            },
        }
    }
}
