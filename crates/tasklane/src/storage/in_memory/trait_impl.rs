//! TaskStore trait implementation for in-memory storage.

use super::InMemoryStore;
use crate::domain::{NewTask, Task, TaskId, TaskWithDependencies, normalize_dependencies};
use crate::error::{Error, Result, StorageError, ValidationError};
use crate::graph::analyze;
use crate::storage::TaskStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeSet;

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn create(&mut self, new_task: NewTask) -> Result<Task> {
        let mut inner = self.lock().await;

        // === Phase 1: All validations (no mutations) ===
        new_task.validate()?;
        let mut dependencies = new_task.dependencies;
        normalize_dependencies(&mut dependencies);

        let id = inner.next_id()?;
        inner.validate_dependencies(id, new_task.due_date, &dependencies)?;

        // === Phase 2: Create task (all validations passed) ===
        let task = Task {
            id,
            title: new_task.title.trim().to_string(),
            due_date: new_task.due_date,
            created_at: Utc::now(),
            dependencies,
        };
        inner.insert(task.clone());

        tracing::debug!(task_id = %id, dependencies = task.dependencies.len(), "Created task");
        Ok(task)
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>> {
        let inner = self.lock().await;
        Ok(inner.tasks.get(&id).cloned())
    }

    async fn get_with_dependencies(&self, id: TaskId) -> Result<Option<TaskWithDependencies>> {
        let inner = self.lock().await;
        Ok(inner.tasks.get(&id).map(|task| inner.resolve(task)))
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let inner = self.lock().await;
        Ok(inner.tasks.values().cloned().collect())
    }

    async fn list_with_dependencies(&self) -> Result<Vec<TaskWithDependencies>> {
        let inner = self.lock().await;
        Ok(inner.tasks.values().map(|task| inner.resolve(task)).collect())
    }

    async fn delete(&mut self, id: TaskId) -> Result<()> {
        let mut inner = self.lock().await;

        inner.remove(id).ok_or(Error::TaskNotFound(id))?;

        tracing::debug!(task_id = %id, "Deleted task");
        Ok(())
    }

    async fn set_dependencies(&mut self, id: TaskId, mut dependencies: Vec<TaskId>) -> Result<Task> {
        let mut inner = self.lock().await;

        let task_due = inner
            .tasks
            .get(&id)
            .ok_or(Error::TaskNotFound(id))?
            .due_date;

        normalize_dependencies(&mut dependencies);
        inner.validate_dependencies(id, task_due, &dependencies)?;

        let count = dependencies.len();
        let task = inner
            .replace_dependencies(id, dependencies)
            .cloned()
            .ok_or(Error::TaskNotFound(id))?;

        tracing::debug!(task_id = %id, dependencies = count, "Replaced dependency set");
        Ok(task)
    }

    async fn would_create_cycle(&self, id: TaskId, proposed: &[TaskId]) -> Result<bool> {
        let inner = self.lock().await;

        if !inner.tasks.contains_key(&id) {
            return Err(Error::TaskNotFound(id));
        }

        Ok(inner.graph.would_create_cycle(id, proposed))
    }

    async fn dependents(&self, id: TaskId) -> Result<Vec<TaskId>> {
        let inner = self.lock().await;

        if !inner.tasks.contains_key(&id) {
            return Err(Error::TaskNotFound(id));
        }

        Ok(inner.graph.dependents(id))
    }

    async fn import_tasks(&mut self, tasks: Vec<Task>) -> Result<()> {
        let mut inner = self.lock().await;

        // === Phase 1: record-level checks ===
        let mut known: BTreeSet<TaskId> = inner.tasks.keys().copied().collect();
        for task in &tasks {
            task.validate()?;
            if !known.insert(task.id) {
                return Err(StorageError::DuplicateId(task.id).into());
            }
        }

        // === Phase 2: stage the import and check the combined graph ===
        let mut staged = inner.clone();
        let count = tasks.len();
        for mut task in tasks {
            normalize_dependencies(&mut task.dependencies);
            task.dependencies.retain(|dependency| known.contains(dependency));
            staged.insert(task);
        }
        // A batch may list a dependent before its prerequisite.
        staged.rebuild_index();

        let analysis = analyze(staged.tasks.values());
        if analysis.level_of.len() != staged.tasks.len() {
            // Tasks missing from the analysis are on, or downstream of, a cycle.
            let stuck = |id: &TaskId| !analysis.level_of.contains_key(id);
            if let Some(task) = staged.tasks.values().find(|task| stuck(&task.id)) {
                let dependency = task
                    .dependencies
                    .iter()
                    .copied()
                    .find(|dependency| stuck(dependency))
                    .unwrap_or(task.id);
                return Err(ValidationError::CircularDependency {
                    task: task.id,
                    dependency,
                }
                .into());
            }
        }

        // === Phase 3: commit ===
        *inner = staged;

        tracing::debug!(count, "Imported tasks");
        Ok(())
    }

    async fn export_all(&self) -> Result<Vec<Task>> {
        let inner = self.lock().await;
        Ok(inner.tasks.values().cloned().collect())
    }

    async fn save(&self) -> Result<()> {
        // No-op for in-memory storage
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        // Nothing to reload from
        Ok(())
    }
}
