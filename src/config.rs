// UA Stache Configuration Module
//
// This module handles loading the optional ua-stache.yaml configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the project-local configuration file
pub const CONFIG_FILE: &str = "ua-stache.yaml";

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Credentials file used when none is given on the command line
    #[serde(default = "default_credentials")]
    pub credentials: String,

    /// Request timeout in seconds (no timeout when absent)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_credentials() -> String {
    "stache.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: default_credentials(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        Ok(config)
    }

    /// Resolve the configuration to use.
    ///
    /// # Resolution Order
    ///
    /// 1. `explicit` path, if given (must exist)
    /// 2. `ua-stache.yaml` in the current directory
    /// 3. `~/.config/ua-stache/config.yaml`
    /// 4. Built-in defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for candidate in Self::candidate_paths() {
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "Using config file");
                return Self::from_file(&candidate);
            }
        }

        Ok(Self::default())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("ua-stache").join("config.yaml"));
        }
        paths
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.credentials.is_empty() {
            anyhow::bail!("Credentials file cannot be empty");
        }

        if self.timeout_secs == Some(0) {
            anyhow::bail!("timeout_secs must be greater than zero");
        }

        Ok(())
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
