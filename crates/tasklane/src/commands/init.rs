//! Implementation of the `init` command.
//!
//! This module handles initialization of a new tasklane repository, creating
//! the `.tasklane/` directory with a configuration file and an empty data file.

use crate::config::{CONFIG_FILE_NAME, TASKLANE_DIR_NAME, TASKS_FILE_NAME, TasklaneConfig};
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created tasklane directory
    pub tasklane_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created tasks file
    pub tasks_file: PathBuf,
}

/// Initialize a new tasklane repository in the given directory.
///
/// # Errors
///
/// Returns an error if:
/// - The `.tasklane/` directory already exists
/// - File system operations fail
pub async fn init(base_dir: &Path) -> Result<InitResult> {
    let tasklane_dir = base_dir.join(TASKLANE_DIR_NAME);

    if fs::try_exists(&tasklane_dir).await? {
        return Err(ConfigError::AlreadyInitialized(TASKLANE_DIR_NAME.to_string()).into());
    }

    fs::create_dir_all(&tasklane_dir).await?;

    let config_file = tasklane_dir.join(CONFIG_FILE_NAME);
    TasklaneConfig::default().save(&config_file).await?;

    let tasks_file = tasklane_dir.join(TASKS_FILE_NAME);
    fs::write(&tasks_file, "").await?;

    tracing::info!(path = %tasklane_dir.display(), "Initialized tasklane repository");

    Ok(InitResult {
        tasklane_dir,
        config_file,
        tasks_file,
    })
}
