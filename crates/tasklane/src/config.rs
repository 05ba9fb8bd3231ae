//! Configuration management for tasklane.
//!
//! A tasklane repository is a directory containing `.tasklane/config.yaml`
//! and, for the JSONL backend, a data file (by default
//! `.tasklane/tasks.jsonl`). Every field of the YAML file is optional.

use crate::error::{ConfigError, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the tasklane directory
pub const TASKLANE_DIR_NAME: &str = ".tasklane";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the tasks data file
pub const TASKS_FILE_NAME: &str = "tasks.jsonl";

/// Default HTTP bind address for the server
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// Environment variable overriding the server bind address
pub const BIND_ENV_VAR: &str = "TASKLANE_BIND";

/// Maximum directory depth to traverse when searching for the tasklane root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure for tasklane
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TasklaneConfig {
    /// Storage configuration
    pub storage: StorageConfig,

    /// HTTP server configuration
    pub server: ServerConfig,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend type: "jsonl" or "memory"
    pub backend: String,

    /// Path to the data file, relative to the repository root
    pub data_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "jsonl".to_string(),
            data_file: format!("{TASKLANE_DIR_NAME}/{TASKS_FILE_NAME}"),
        }
    }
}

impl StorageConfig {
    /// Resolve the configured backend against the repository root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownBackend` for an unrecognized backend name.
    pub fn to_backend(&self, root_dir: &Path) -> Result<StorageBackend> {
        match self.backend.trim().to_ascii_lowercase().as_str() {
            "jsonl" => Ok(StorageBackend::Jsonl(root_dir.join(&self.data_file))),
            "memory" => Ok(StorageBackend::InMemory),
            other => Err(ConfigError::UnknownBackend(other.to_string()).into()),
        }
    }
}

/// Server configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl ServerConfig {
    /// The bind address, with `TASKLANE_BIND` taking precedence.
    pub fn bind_address(&self) -> String {
        std::env::var(BIND_ENV_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.bind.clone())
    }
}

impl TasklaneConfig {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read, or
    /// `ConfigError::Invalid` if it is not valid YAML for this schema.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()).into())
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if serialization fails, or `Error::Io`
    /// if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::Invalid(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

/// Find the tasklane root directory by searching up the directory tree.
///
/// Returns the directory containing `.tasklane/`, or `None` if none is found
/// before the filesystem root or the depth limit.
pub fn find_tasklane_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(TASKLANE_DIR_NAME).is_dir() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
