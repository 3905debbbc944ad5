//! Error types for credential loading and secret retrieval.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading credentials or fetching a secret.
#[derive(Error, Debug)]
pub enum StacheError {
    /// Credentials file is missing or unreadable
    #[error("Failed to read credentials file {path:?}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Credentials file, response body or embedded secret is not valid JSON
    #[error("Failed to parse {context} as JSON: {source}")]
    Parse {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A required field is absent
    #[error("Missing required field '{0}'")]
    MissingField(String),

    /// A required field is present but has the wrong JSON type
    #[error("Field '{field}' must be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    /// Stache answered with a non-success status
    #[error("Stache returned HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// Path traversal tried to look up a key in something that is not an object
    #[error("Cannot look up '{segment}' in a {found} value")]
    TypeMismatch {
        segment: String,
        found: &'static str,
    },

    /// The request never produced a response (DNS, connect, timeout, bad header)
    #[error("Request to stache failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The blocking helper could not start its runtime
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The blocking helper was called from inside an async runtime
    #[error("Blocking fetch called from within an async runtime; use SecretFetcher::auth instead")]
    InsideRuntime,
}

impl StacheError {
    /// HTTP status carried by this error, if it came from a stache response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            StacheError::Http { status, .. } => Some(*status),
            StacheError::Request(e) => e.status(),
            _ => None,
        }
    }
}
