//! Task Store abstraction for tasklane.
//!
//! This module provides the storage trait and a factory for creating
//! storage backends:
//!
//! - **In-memory**: ephemeral storage backed by a `BTreeMap` and a petgraph
//!   dependency index
//! - **JSONL**: the in-memory store with its contents persisted as JSON Lines
//!
//! # Architecture
//!
//! The trait is async and object-safe so callers hold a
//! `Box<dyn TaskStore>` regardless of backend. Every mutation validates
//! completely before changing anything, which makes a rejected request free
//! of side effects. Validation and the write it gates happen under a single
//! lock, so a cycle check can never race a concurrent edit of the same
//! dependency set.
//!
//! # Example
//!
//! ```no_run
//! use tasklane::domain::NewTask;
//! use tasklane::storage::{StorageBackend, create_storage};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut store = create_storage(StorageBackend::InMemory).await?;
//!
//!     let design = store.create(NewTask::new("Write design doc")).await?;
//!     let build = store
//!         .create(NewTask::new("Build it").depends_on([design.id]))
//!         .await?;
//!
//!     let board = store.board().await?;
//!     println!("task {} depends on task {}", build.id, design.id);
//!     println!("critical path: {:?}", board.analysis.critical_path);
//!     Ok(())
//! }
//! ```

use crate::domain::{NewTask, Task, TaskId, TaskWithDependencies};
use crate::error::{Error, Result};
use crate::graph::{Board, TaskDetails};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod in_memory;

/// Durable storage of tasks and their dependency edges.
///
/// # Error Handling
///
/// - `Error::Validation`: the request was rejected (empty title, cycle,
///   due-date conflict); nothing was changed
/// - `Error::TaskNotFound`: the task, or one of the requested dependencies,
///   does not exist
/// - anything else: an internal storage failure
#[async_trait]
pub trait TaskStore: Send + Sync {
    // ========== CRUD Operations ==========

    /// Create a new task.
    ///
    /// Assigns the next free id and the creation timestamp. The request is
    /// rejected as a whole if the title is invalid, a dependency does not
    /// exist, the dependencies would close a cycle, or a dependency is due
    /// after the new task.
    async fn create(&mut self, task: NewTask) -> Result<Task>;

    /// Get a task by ID.
    ///
    /// Returns `None` if the task doesn't exist.
    async fn get(&self, id: TaskId) -> Result<Option<Task>>;

    /// Get a task together with its resolved dependency tasks.
    async fn get_with_dependencies(&self, id: TaskId) -> Result<Option<TaskWithDependencies>>;

    /// List all tasks in ascending id order.
    async fn list(&self) -> Result<Vec<Task>>;

    /// List all tasks with resolved dependencies, in ascending id order.
    async fn list_with_dependencies(&self) -> Result<Vec<TaskWithDependencies>>;

    /// Delete a task.
    ///
    /// Tasks that depended on it simply lose that dependency edge.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if the task doesn't exist.
    async fn delete(&mut self, id: TaskId) -> Result<()>;

    // ========== Dependency Management ==========

    /// Replace a task's dependency set.
    ///
    /// The new set is validated like a creation request against the task's
    /// own due date and applied all-or-nothing. An empty set clears every
    /// dependency.
    async fn set_dependencies(&mut self, id: TaskId, dependencies: Vec<TaskId>) -> Result<Task>;

    /// Check whether giving `id` the `proposed` dependencies would create a cycle.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if `id` doesn't exist.
    async fn would_create_cycle(&self, id: TaskId, proposed: &[TaskId]) -> Result<bool>;

    /// Ids of the tasks that directly depend on `id`, ascending.
    async fn dependents(&self, id: TaskId) -> Result<Vec<TaskId>>;

    // ========== Batch Operations ==========

    /// Import existing task records, preserving their ids.
    ///
    /// Dependencies on ids that are not present after the import are dropped.
    async fn import_tasks(&mut self, tasks: Vec<Task>) -> Result<()>;

    /// Export all tasks in ascending id order.
    async fn export_all(&self) -> Result<Vec<Task>>;

    // ========== Persistence ==========

    /// Save changes to persistent storage.
    ///
    /// A no-op for the in-memory backend.
    async fn save(&self) -> Result<()>;

    /// Discard in-memory changes and reload from persistent storage.
    ///
    /// Used after a failed `save()` so that memory matches disk again.
    async fn reload(&mut self) -> Result<()>;

    // ========== Derived View ==========

    /// Recompute the board (levels, critical path, earliest starts) from the
    /// current snapshot.
    async fn board(&self) -> Result<Board> {
        Ok(Board::build(self.list().await?))
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// JSONL file storage (persistent)
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// Returns the data file path for file-based backends.
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// Wrapper that adds JSONL file persistence to the in-memory store.
struct JsonlBackedStore {
    inner: Box<dyn TaskStore>,
    path: PathBuf,
}

#[async_trait]
impl TaskStore for JsonlBackedStore {
    async fn create(&mut self, task: NewTask) -> Result<Task> {
        self.inner.create(task).await
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>> {
        self.inner.get(id).await
    }

    async fn get_with_dependencies(&self, id: TaskId) -> Result<Option<TaskWithDependencies>> {
        self.inner.get_with_dependencies(id).await
    }

    async fn list(&self) -> Result<Vec<Task>> {
        self.inner.list().await
    }

    async fn list_with_dependencies(&self) -> Result<Vec<TaskWithDependencies>> {
        self.inner.list_with_dependencies().await
    }

    async fn delete(&mut self, id: TaskId) -> Result<()> {
        self.inner.delete(id).await
    }

    async fn set_dependencies(&mut self, id: TaskId, dependencies: Vec<TaskId>) -> Result<Task> {
        self.inner.set_dependencies(id, dependencies).await
    }

    async fn would_create_cycle(&self, id: TaskId, proposed: &[TaskId]) -> Result<bool> {
        self.inner.would_create_cycle(id, proposed).await
    }

    async fn dependents(&self, id: TaskId) -> Result<Vec<TaskId>> {
        self.inner.dependents(id).await
    }

    async fn import_tasks(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.inner.import_tasks(tasks).await
    }

    async fn export_all(&self) -> Result<Vec<Task>> {
        self.inner.export_all().await
    }

    async fn save(&self) -> Result<()> {
        in_memory::save_to_jsonl(self.inner.as_ref(), &self.path).await
    }

    async fn reload(&mut self) -> Result<()> {
        self.inner = load_or_empty(&self.path).await?;
        Ok(())
    }
}

/// Load the store from `path`, or start empty if the file doesn't exist yet.
async fn load_or_empty(path: &Path) -> Result<Box<dyn TaskStore>> {
    if !tokio::fs::try_exists(path).await? {
        tracing::debug!(path = %path.display(), "Data file missing, starting empty");
        return Ok(in_memory::new_in_memory_storage());
    }

    let (store, warnings) = in_memory::load_from_jsonl(path).await?;
    for warning in &warnings {
        tracing::warn!(%warning, path = %path.display(), "JSONL load warning");
    }
    Ok(store)
}

/// Create a storage instance for the given backend.
///
/// # Errors
///
/// - `Error::Io` if the data file cannot be read (JSONL backend)
/// - `Error::Storage` if the data file is unusable
pub async fn create_storage(backend: StorageBackend) -> Result<Box<dyn TaskStore>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_storage()),
        StorageBackend::Jsonl(path) => {
            let inner = load_or_empty(&path).await?;
            Ok(Box::new(JsonlBackedStore { inner, path }))
        }
    }
}

/// Fetch a task or fail with `Error::TaskNotFound`.
///
/// # Errors
///
/// Returns `Error::TaskNotFound` if the task doesn't exist.
pub async fn require_task(store: &dyn TaskStore, id: TaskId) -> Result<TaskWithDependencies> {
    store
        .get_with_dependencies(id)
        .await?
        .ok_or(Error::TaskNotFound(id))
}

/// Fetch a task with its dependencies, dependents and board data.
///
/// # Errors
///
/// Returns `Error::TaskNotFound` if the task doesn't exist.
pub async fn task_details(store: &dyn TaskStore, id: TaskId) -> Result<TaskDetails> {
    let resolved = require_task(store, id).await?;
    let dependents = store.dependents(id).await?;
    let board = store.board().await?;
    Ok(board.details(resolved, dependents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_trait_object_usage() {
        let mut store: Box<dyn TaskStore> = create_storage(StorageBackend::InMemory).await.unwrap();
        let task = store.create(NewTask::new("Test")).await.unwrap();
        assert_eq!(task.id, TaskId::new(1));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_require_task() {
        let mut store = create_storage(StorageBackend::InMemory).await.unwrap();
        let task = store.create(NewTask::new("Present")).await.unwrap();

        assert_eq!(require_task(store.as_ref(), task.id).await.unwrap().task, task);
        let err = require_task(store.as_ref(), TaskId::new(99)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_task_details() {
        let mut store = create_storage(StorageBackend::InMemory).await.unwrap();
        let a = store.create(NewTask::new("A")).await.unwrap();
        let b = store.create(NewTask::new("B").depends_on([a.id])).await.unwrap();

        let details = task_details(store.as_ref(), a.id).await.unwrap();

        assert_eq!(details.dependents, vec![b.id]);
        assert_eq!(details.level, Some(0));
        assert!(details.critical);
        assert!(task_details(store.as_ref(), TaskId::new(7)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_jsonl_reload_restores_disk_state() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.jsonl");

        let mut store = create_storage(StorageBackend::Jsonl(path.clone())).await.unwrap();
        let first = store.create(NewTask::new("Saved")).await.unwrap();
        store.save().await.unwrap();

        // Modify in memory without saving
        store.create(NewTask::new("Unsaved")).await.unwrap();
        store.delete(first.id).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);

        store.reload().await.unwrap();

        let tasks = store.list().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Saved");
    }

    #[tokio::test]
    async fn test_jsonl_reload_missing_file_resets() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.jsonl");

        let mut store = create_storage(StorageBackend::Jsonl(path.clone())).await.unwrap();
        let task = store.create(NewTask::new("Gone")).await.unwrap();
        store.save().await.unwrap();

        std::fs::remove_file(&path).unwrap();
        store.reload().await.unwrap();

        assert!(store.get(task.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_reload_is_noop() {
        let mut store = create_storage(StorageBackend::InMemory).await.unwrap();
        let task = store.create(NewTask::new("Kept")).await.unwrap();

        store.reload().await.unwrap();

        assert!(store.get(task.id).await.unwrap().is_some());
    }

    #[test]
    fn test_backend_data_path() {
        assert_eq!(StorageBackend::InMemory.data_path(), None);
        let backend = StorageBackend::Jsonl(PathBuf::from("tasks.jsonl"));
        assert_eq!(backend.data_path(), Some(Path::new("tasks.jsonl")));
    }
}
