//! Secret retrieval from stache.
//!
//! # Flow
//!
//! 1. `GET <url>` with the entry's read-key header
//! 2. Any non-success status is returned as [`StacheError::Http`]
//! 3. The body is decoded as JSON and its `secret` field, itself a JSON
//!    document stored as a string, is decoded again
//! 4. An optional `a/b/c` path selects a nested value (see [`crate::path`])
//!
//! # Security
//!
//! - Header values and secret contents are never logged
//! - Nothing is cached between calls; every call is one request

use crate::credentials::StacheEntry;
use crate::error::StacheError;
use crate::path;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Field of the stache response holding the JSON-encoded secret.
pub const SECRET_FIELD: &str = "secret";

/// HTTP client for reading stache entries.
#[derive(Debug, Clone)]
pub struct SecretFetcher {
    http_client: Client,
}

impl SecretFetcher {
    /// Create a fetcher with no request timeout.
    pub fn new() -> Result<Self, StacheError> {
        Self::with_timeout(None)
    }

    /// Create a fetcher, optionally bounding each request by `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, StacheError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
        })
    }

    /// Fetch the secret at `url` and optionally select a nested value.
    ///
    /// # Arguments
    ///
    /// * `header` - Request headers, normally `{"X-STACHE-READ-KEY": <key>}`
    /// * `url` - Full stache URL of the entry
    /// * `cred_path` - Slash-separated keys into the decoded secret
    ///
    /// # Returns
    ///
    /// - `Some(value)` - the whole secret, or the value found at `cred_path`
    /// - `None` - a segment of `cred_path` was not found
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request cannot be sent ([`StacheError::Request`])
    /// - Stache answers with a 4xx/5xx status ([`StacheError::Http`])
    /// - The body or the embedded secret is not JSON ([`StacheError::Parse`])
    /// - The body has no `secret` field ([`StacheError::MissingField`])
    /// - `cred_path` descends into a non-object ([`StacheError::TypeMismatch`])
    #[instrument(skip(self, header))]
    pub async fn auth(
        &self,
        header: &HashMap<String, String>,
        url: &str,
        cred_path: Option<&str>,
    ) -> Result<Option<Value>, StacheError> {
        let mut request = self.http_client.get(url);
        for (name, value) in header {
            request = request.header(name.as_str(), value.as_str());
        }

        debug!("Requesting stache entry");
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            warn!(%status, "Stache returned an error status");
            return Err(StacheError::Http { status, body });
        }

        let body = response.text().await?;
        let secret = decode_secret(&body)?;

        match cred_path {
            Some(cred_path) if !cred_path.is_empty() => {
                let found = path::resolve(secret, cred_path)?;
                if found.is_none() {
                    debug!("No value at credential path");
                }
                Ok(found)
            }
            _ => Ok(Some(secret)),
        }
    }

    /// Fetch the secret for a loaded credentials entry.
    pub async fn fetch_entry(
        &self,
        entry: &StacheEntry,
        cred_path: Option<&str>,
    ) -> Result<Option<Value>, StacheError> {
        self.auth(&entry.header(), &entry.url(), cred_path).await
    }
}

/// Fetch a secret with a default (no timeout) client.
///
/// # Example
///
/// ```no_run
/// use ua_stache::{credentials, fetcher};
///
/// # async fn run() -> Result<(), ua_stache::StacheError> {
/// let (header, url) = credentials::load("stache.json")?;
/// let password = fetcher::auth(&header, &url, Some("db/password")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn auth(
    header: &HashMap<String, String>,
    url: &str,
    cred_path: Option<&str>,
) -> Result<Option<Value>, StacheError> {
    SecretFetcher::new()?.auth(header, url, cred_path).await
}

/// Blocking variant of [`auth`] for callers without a tokio runtime.
///
/// # Errors
///
/// Returns [`StacheError::InsideRuntime`] when called from inside a tokio
/// runtime, plus every error [`SecretFetcher::auth`] can return.
pub fn auth_blocking(
    header: &HashMap<String, String>,
    url: &str,
    cred_path: Option<&str>,
    timeout: Option<Duration>,
) -> Result<Option<Value>, StacheError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(StacheError::InsideRuntime);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(StacheError::Runtime)?;

    let fetcher = SecretFetcher::with_timeout(timeout)?;
    runtime.block_on(fetcher.auth(header, url, cred_path))
}

/// Decode a stache response body into the secret it carries.
pub fn decode_secret(body: &str) -> Result<Value, StacheError> {
    let response: Value = serde_json::from_str(body).map_err(|source| StacheError::Parse {
        context: "stache response",
        source,
    })?;

    let encoded = match response.get(SECRET_FIELD) {
        None => return Err(StacheError::MissingField(SECRET_FIELD.to_string())),
        Some(Value::String(encoded)) => encoded,
        Some(_) => {
            return Err(StacheError::InvalidField {
                field: SECRET_FIELD.to_string(),
                expected: "a JSON-encoded string",
            })
        }
    };

    serde_json::from_str(encoded).map_err(|source| StacheError::Parse {
        context: "stache secret",
        source,
    })
}
