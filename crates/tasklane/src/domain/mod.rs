//! Domain types for the task list.
//!
//! This module contains the core domain types for tasklane: tasks, their
//! identifiers, and the input shapes used to create and edit them.

use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length for task titles
pub const MAX_TITLE_LENGTH: usize = 200;

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    /// Create a new task ID
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw integer value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A unit of work in the task list.
///
/// Dependencies are directed edges `task -> prerequisite`: every id in
/// `dependencies` must conceptually finish before this task. Dependents are
/// never stored; they are discovered by scanning or through the derived
/// graph index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task
    pub id: TaskId,

    /// Task title (non-empty)
    pub title: String,

    /// Due date, a calendar day with no time component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Creation timestamp, used for default list ordering only
    pub created_at: DateTime<Utc>,

    /// Prerequisite task ids, sorted and de-duplicated
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

impl Task {
    /// Validate the task's stored fields.
    ///
    /// Used when loading records from disk, where nothing else has checked them.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title is empty or too long, or if
    /// the task lists itself as a dependency.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        if self.dependencies.contains(&self.id) {
            return Err(ValidationError::CircularDependency {
                task: self.id,
                dependency: self.id,
            });
        }
        Ok(())
    }
}

/// A task together with its direct prerequisite tasks.
///
/// This is the "resolved" shape the store hands to the analysis core and to
/// presentation: each dependency is a full task, not just an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithDependencies {
    /// The task itself
    #[serde(flatten)]
    pub task: Task,

    /// The task's direct dependencies, in ascending id order
    #[serde(rename = "resolved_dependencies")]
    pub dependencies: Vec<Task>,
}

/// Data for creating a new task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title
    pub title: String,

    /// Optional due date
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Initial dependency ids
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

impl NewTask {
    /// Create a new task description with just a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the due date
    #[must_use]
    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the initial dependencies
    #[must_use]
    pub fn depends_on(mut self, dependencies: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }

    /// Validate the input.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title is blank or exceeds
    /// [`MAX_TITLE_LENGTH`] characters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

/// Validate a task title.
///
/// The title is checked after trimming surrounding whitespace.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyTitle`] or [`ValidationError::TitleTooLong`].
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong {
            max: MAX_TITLE_LENGTH,
            actual: len,
        });
    }
    Ok(())
}

/// Sort and de-duplicate a dependency list in place.
pub fn normalize_dependencies(dependencies: &mut Vec<TaskId>) {
    dependencies.sort_unstable();
    dependencies.dedup();
}
