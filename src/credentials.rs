//! Credential loading for stache entries.
//!
//! A credentials file is a small JSON document holding the entry's read key
//! and its endpoint path:
//!
//! ```json
//! {
//!     "X-STACHE-READ-KEY": "stache_read_key",
//!     "endpoint": "/api/v1/secret/read/my-secret"
//! }
//! ```
//!
//! # Security
//!
//! - The read key is never logged and is redacted from `Debug` output
//! - The file is read once and not cached

use crate::error::StacheError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Stache host every endpoint path is appended to.
pub const STACHE_HOST: &str = "https://stache.arizona.edu";

/// Header (and credentials file field) carrying the read key.
pub const READ_KEY_HEADER: &str = "X-STACHE-READ-KEY";

/// Credentials file field carrying the endpoint path.
pub const ENDPOINT_FIELD: &str = "endpoint";

/// A stache entry's read key and endpoint, as stored in a credentials file.
#[derive(Clone, PartialEq, Eq)]
pub struct StacheEntry {
    read_key: String,
    endpoint: String,
}

impl StacheEntry {
    /// Create an entry from a read key and an endpoint path.
    pub fn new(read_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            read_key: read_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Load an entry from a JSON credentials file.
    ///
    /// # Errors
    ///
    /// - [`StacheError::FileAccess`] if the file cannot be read
    /// - [`StacheError::Parse`] if the content is not valid JSON
    /// - [`StacheError::MissingField`] if a required field is absent
    /// - [`StacheError::InvalidField`] if a required field is not a string
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StacheError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| StacheError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        let entry = Self::from_json(&content)?;
        debug!(path = %path.display(), endpoint = %entry.endpoint, "Loaded stache credentials");
        Ok(entry)
    }

    /// Parse an entry from the text of a credentials file.
    pub fn from_json(content: &str) -> Result<Self, StacheError> {
        let creds: Value = serde_json::from_str(content).map_err(|source| StacheError::Parse {
            context: "credentials file",
            source,
        })?;

        Ok(Self {
            read_key: string_field(&creds, READ_KEY_HEADER)?,
            endpoint: string_field(&creds, ENDPOINT_FIELD)?,
        })
    }

    pub fn read_key(&self) -> &str {
        &self.read_key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request headers for this entry: `{"X-STACHE-READ-KEY": <read key>}`.
    pub fn header(&self) -> HashMap<String, String> {
        HashMap::from([(READ_KEY_HEADER.to_string(), self.read_key.clone())])
    }

    /// Full URL of this entry.
    ///
    /// The endpoint is appended verbatim, so it must start with `/`.
    pub fn url(&self) -> String {
        format!("{}{}", STACHE_HOST, self.endpoint)
    }
}

impl fmt::Debug for StacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StacheEntry")
            .field("read_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Load a credentials file and return the `(header, url)` pair used by
/// [`crate::fetcher::auth`].
///
/// # Example
///
/// ```no_run
/// use ua_stache::credentials::load;
///
/// # fn main() -> Result<(), ua_stache::StacheError> {
/// let (header, url) = load("stache.json")?;
/// assert!(url.starts_with("https://stache.arizona.edu"));
/// assert!(header.contains_key("X-STACHE-READ-KEY"));
/// # Ok(())
/// # }
/// ```
pub fn load<P: AsRef<Path>>(
    filename: P,
) -> Result<(HashMap<String, String>, String), StacheError> {
    let entry = StacheEntry::from_file(filename)?;
    Ok((entry.header(), entry.url()))
}

fn string_field(creds: &Value, field: &str) -> Result<String, StacheError> {
    match creds.get(field) {
        None => Err(StacheError::MissingField(field.to_string())),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(StacheError::InvalidField {
            field: field.to_string(),
            expected: "a string",
        }),
    }
}
