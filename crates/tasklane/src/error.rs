//! Error types for tasklane operations.

use crate::domain::TaskId;
use chrono::NaiveDate;
use std::io;
use thiserror::Error;

/// The error type for tasklane operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The operation was rejected by validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),
}

impl Error {
    /// Returns true if this error is a rejected input rather than a failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this error refers to a task that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TaskNotFound(_))
    }
}

/// Reasons a create or edit is rejected.
///
/// Every variant carries a human-readable message suitable for showing to the
/// person who submitted the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title is empty after trimming.
    #[error("Title cannot be empty")]
    EmptyTitle,

    /// Title exceeds the maximum length.
    #[error("Title cannot exceed {max} characters, got {actual} characters")]
    TitleTooLong {
        /// Maximum allowed length
        max: usize,
        /// Actual length of the rejected title
        actual: usize,
    },

    /// Depending on `dependency` would make `task` transitively depend on itself.
    #[error("Circular dependency: task {task} cannot depend on task {dependency}")]
    CircularDependency {
        /// Task being created or edited
        task: TaskId,
        /// Proposed dependency that closes the cycle
        dependency: TaskId,
    },

    /// A dependency is due after the task that depends on it.
    #[error(
        "Dependency {dependency} is due {dependency_due}, after this task's due date {task_due}"
    )]
    DueDateConflict {
        /// The offending dependency
        dependency: TaskId,
        /// Due date of the dependency
        dependency_due: NaiveDate,
        /// Due date of the dependent task
        task_due: NaiveDate,
    },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `.tasklane/` directory found in the directory tree.
    #[error("Not a tasklane repository (or any parent directory). Run 'tasklane init' first.")]
    NotInitialized,

    /// The repository has already been initialized.
    #[error("Tasklane is already initialized in this directory. Found existing '{0}'")]
    AlreadyInitialized(String),

    /// The configuration file could not be parsed or written.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Unknown storage backend name in the configuration file.
    #[error("Unknown storage backend '{0}'. Valid backends: jsonl, memory")]
    UnknownBackend(String),
}

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The data file could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A task id is already in use.
    #[error("Duplicate task id: {0}")]
    DuplicateId(TaskId),

    /// No more task ids are available.
    #[error("Task id space exhausted")]
    IdExhausted,
}

/// A specialized Result type for tasklane operations.
pub type Result<T> = std::result::Result<T, Error>;
