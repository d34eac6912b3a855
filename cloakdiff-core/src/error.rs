//! Structured error types for cloakdiff-core.
//!
//! Only failures that block a whole comparison live here. Problems a single
//! pane can recover from (malformed JSON, clipboard denial, odd markup) are
//! modeled as ordinary values in the renderers and the clipboard controller.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cloakdiff-core operations
#[derive(Error, Debug)]
pub enum ViewerError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Artifact retrieval rejected; fatal to the current render cycle
    #[error("Failed to load {id} artifact from {location}: {reason}")]
    Load {
        id: String,
        location: String,
        reason: String,
    },

    /// HTTP retrieval failed before a body was available
    #[error("HTTP request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    /// Sample scenario not present in the catalog
    #[error("Unknown sample scenario '{name}' (available: {available})")]
    UnknownScenario { name: String, available: String },

    /// Layout persistence store could not be read or written
    #[error("Layout store {path:?}: {reason}")]
    Persist { path: PathBuf, reason: String },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for cloakdiff-core operations
pub type Result<T> = std::result::Result<T, ViewerError>;

impl ViewerError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a load failure for one side of a comparison
    pub fn load(
        id: impl Into<String>,
        location: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Load {
            id: id.into(),
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown scenario error
    pub fn unknown_scenario(name: impl Into<String>, available: &[&str]) -> Self {
        Self::UnknownScenario {
            name: name.into(),
            available: available.join(", "),
        }
    }

    /// Create a persistence error
    pub fn persist(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Persist {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Whether this error blocks rendering of the whole session
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load { .. } | Self::Http { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ViewerError::load("left", "/tmp/a.json", "file not found");
        assert_eq!(
            err.to_string(),
            "Failed to load left artifact from /tmp/a.json: file not found"
        );
        assert!(err.is_load_failure());

        let err = ViewerError::unknown_scenario("yaml", &["markdown", "json"]);
        assert!(err.to_string().contains("'yaml'"));
        assert!(err.to_string().contains("markdown, json"));
        assert!(!err.is_load_failure());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let viewer_err: ViewerError = io_err.into();

        assert!(matches!(viewer_err, ViewerError::Io { .. }));
    }
}
