//! Application context shared by the CLI and the HTTP server.
//!
//! `App` locates the tasklane repository, loads its configuration and owns
//! the store created from it.
//!
//! # Example
//!
//! ```no_run
//! use tasklane::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     let board = app.store().board().await?;
//!     println!("{} tasks", board.tasks.len());
//!     Ok(())
//! }
//! ```

use crate::config::{CONFIG_FILE_NAME, TASKLANE_DIR_NAME, TasklaneConfig, find_tasklane_root};
use crate::error::{ConfigError, Result};
use crate::storage::{TaskStore, create_storage};
use std::path::{Path, PathBuf};

/// Application context for CLI and server operations.
pub struct App {
    /// The storage backend
    store: Box<dyn TaskStore>,

    /// Path to the tasklane directory (.tasklane)
    tasklane_dir: PathBuf,

    /// Loaded configuration
    config: TasklaneConfig,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("tasklane_dir", &self.tasklane_dir)
            .field("config", &self.config)
            .field("store", &"<dyn TaskStore>")
            .finish()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Searches up the directory tree for a `.tasklane/` directory, loads
    /// its configuration, and opens the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No tasklane repository is found in the directory tree
    /// - Configuration cannot be loaded
    /// - Storage initialization fails
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_tasklane_root(working_dir).ok_or(ConfigError::NotInitialized)?;

        let tasklane_dir = root_dir.join(TASKLANE_DIR_NAME);
        let config = TasklaneConfig::load(&tasklane_dir.join(CONFIG_FILE_NAME)).await?;

        let backend = config.storage.to_backend(&root_dir)?;
        tracing::debug!(backend = ?backend, "Opening store");
        let store = create_storage(backend).await?;

        Ok(Self {
            store,
            tasklane_dir,
            config,
        })
    }

    /// Get a mutable reference to the store.
    pub fn store_mut(&mut self) -> &mut dyn TaskStore {
        self.store.as_mut()
    }

    /// Get an immutable reference to the store.
    pub fn store(&self) -> &dyn TaskStore {
        self.store.as_ref()
    }

    /// Get the path to the tasklane directory.
    pub fn tasklane_dir(&self) -> &Path {
        &self.tasklane_dir
    }

    /// Save store state to persistent storage.
    ///
    /// This should be called after any mutating operation.
    pub async fn save(&self) -> Result<()> {
        self.store.save().await
    }

    /// Split into the store and configuration, for callers that share the
    /// store between tasks.
    pub fn into_parts(self) -> (Box<dyn TaskStore>, TasklaneConfig) {
        (self.store, self.config)
    }
}
