//! Common testing utilities for UA Stache integration tests.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Read key used by every mock stache entry.
#[allow(dead_code)]
pub const TEST_READ_KEY: &str = "test-read-key";

/// Test context that manages temporary files and directories.
pub struct TestContext {
    /// Path to temporary directory
    pub temp_path: PathBuf,
    /// The temporary directory (kept to prevent early deletion)
    _temp_dir: TempDir,
}

impl TestContext {
    /// Create a new test context with a temporary directory.
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let temp_path = temp_dir.path().to_path_buf();

        Ok(Self {
            temp_path,
            _temp_dir: temp_dir,
        })
    }

    /// Create a test file with content.
    pub fn create_file(&self, name: &str, content: &str) -> anyhow::Result<PathBuf> {
        let file_path = self.temp_path.join(name);
        let mut file = fs::File::create(&file_path)?;
        file.write_all(content.as_bytes())?;
        Ok(file_path)
    }

    /// Create a credentials file with the given read key and endpoint.
    #[allow(dead_code)]
    pub fn create_credentials(
        &self,
        name: &str,
        read_key: &str,
        endpoint: &str,
    ) -> anyhow::Result<PathBuf> {
        let content = serde_json::to_string_pretty(&serde_json::json!({
            "X-STACHE-READ-KEY": read_key,
            "endpoint": endpoint,
        }))?;
        self.create_file(name, &content)
    }
}

/// Builders for mock stache responses.
#[allow(dead_code)]
pub struct MockStache;

#[allow(dead_code)]
impl MockStache {
    /// Response body carrying `secret` JSON-encoded in its `secret` field.
    pub fn body(secret: &serde_json::Value) -> String {
        serde_json::json!({
            "secret": secret.to_string(),
            "nickname": "test-entry",
            "purpose": "integration tests",
        })
        .to_string()
    }

    /// Response body whose `secret` field is the given raw text.
    pub fn raw_body(secret_text: &str) -> String {
        serde_json::json!({ "secret": secret_text }).to_string()
    }

    /// Header mapping for [`TEST_READ_KEY`].
    pub fn header() -> HashMap<String, String> {
        HashMap::from([("X-STACHE-READ-KEY".to_string(), TEST_READ_KEY.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_stache_body_double_encodes() {
        let body = MockStache::body(&serde_json::json!({"a": 1}));
        let outer: serde_json::Value = serde_json::from_str(&body).unwrap();
        let inner: serde_json::Value =
            serde_json::from_str(outer["secret"].as_str().unwrap()).unwrap();

        assert_eq!(inner, serde_json::json!({"a": 1}));
    }

    #[test]
    fn test_test_context_create_file() {
        let ctx = TestContext::new().unwrap();
        let file_path = ctx.create_file("test.txt", "Hello, World!").unwrap();

        assert!(file_path.exists());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "Hello, World!");
    }
}
