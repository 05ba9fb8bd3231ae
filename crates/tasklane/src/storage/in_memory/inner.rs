//! Core in-memory storage data structures.

use crate::domain::{Task, TaskId, TaskWithDependencies, normalize_dependencies};
use crate::error::{Error, Result, StorageError, ValidationError};
use crate::graph::{TaskGraph, check_due_dates};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Inner storage structure (not thread-safe).
///
/// Wrapped in `Arc<Mutex<>>` by [`super::InMemoryStore`].
#[derive(Debug, Clone, Default)]
pub(crate) struct InMemoryStoreInner {
    /// Tasks indexed by ID
    pub(super) tasks: BTreeMap<TaskId, Task>,

    /// Dependency index; every task in `tasks` has a node here.
    pub(super) graph: TaskGraph,

    /// Highest id ever handed out or imported
    last_id: u64,
}

impl InMemoryStoreInner {
    /// Create a new empty storage instance
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reserve the next task id.
    pub(super) fn next_id(&self) -> Result<TaskId> {
        self.last_id
            .checked_add(1)
            .map(TaskId::new)
            .ok_or_else(|| StorageError::IdExhausted.into())
    }

    /// Insert a task that has already passed validation.
    ///
    /// Dependency edges to tasks that are not indexed yet are skipped; call
    /// [`Self::rebuild_index`] after inserting a batch in arbitrary order.
    pub(super) fn insert(&mut self, task: Task) {
        self.last_id = self.last_id.max(task.id.get());
        self.graph.add_task(task.id);
        for &dependency in &task.dependencies {
            self.graph.add_edge(task.id, dependency);
        }
        self.tasks.insert(task.id, task);
    }

    /// Rebuild the dependency index from the task records.
    pub(super) fn rebuild_index(&mut self) {
        self.graph = TaskGraph::from_tasks(self.tasks.values());
    }

    /// Validate a proposed dependency set for `task`.
    ///
    /// Checks run in order: every dependency exists, the set does not close
    /// a cycle, and no dependency is due after `task_due`. Nothing is mutated.
    pub(super) fn validate_dependencies(
        &self,
        task: TaskId,
        task_due: Option<NaiveDate>,
        dependencies: &[TaskId],
    ) -> Result<()> {
        let mut resolved = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            let found = self
                .tasks
                .get(dependency)
                .ok_or(Error::TaskNotFound(*dependency))?;
            resolved.push(found);
        }

        if let Some(dependency) = self.graph.first_cyclic_dependency(task, dependencies) {
            return Err(ValidationError::CircularDependency { task, dependency }.into());
        }

        check_due_dates(task_due, resolved)?;
        Ok(())
    }

    /// Pair a task with its dependency tasks.
    pub(super) fn resolve(&self, task: &Task) -> TaskWithDependencies {
        TaskWithDependencies {
            task: task.clone(),
            dependencies: task
                .dependencies
                .iter()
                .filter_map(|dependency| self.tasks.get(dependency).cloned())
                .collect(),
        }
    }

    /// Remove a task and strip it from every dependent's dependency list.
    pub(super) fn remove(&mut self, id: TaskId) -> Option<Task> {
        let removed = self.tasks.remove(&id)?;
        for dependent in self.graph.dependents(id) {
            if let Some(task) = self.tasks.get_mut(&dependent) {
                task.dependencies.retain(|&dependency| dependency != id);
            }
        }
        self.graph.remove_task(id);
        Some(removed)
    }

    /// Replace the dependency list of an existing task.
    pub(super) fn replace_dependencies(&mut self, id: TaskId, mut dependencies: Vec<TaskId>) -> Option<&Task> {
        normalize_dependencies(&mut dependencies);
        self.graph.set_dependencies(id, &dependencies);
        let task = self.tasks.get_mut(&id)?;
        task.dependencies = dependencies;
        Some(task)
    }
}
