//! JSONL persistence for in-memory storage.
//!
//! Each task is stored as one JSON object per line. Loading is resilient:
//! bad lines and bad edges are skipped and reported rather than failing the
//! whole load, so a hand-edited file never locks the user out of their list.

use super::inner::InMemoryStoreInner;
use crate::domain::{Task, TaskId, normalize_dependencies, validate_title};
use crate::error::{Error, Result, StorageError};
use crate::storage::TaskStore;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;

/// Non-fatal problems found while loading a JSONL file.
///
/// When one of these occurs the offending line or edge is skipped and the
/// rest of the file still loads.
///
/// ```no_run
/// # use tasklane::storage::in_memory::{LoadWarning, load_from_jsonl};
/// # use std::path::Path;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> anyhow::Result<()> {
/// let (store, warnings) = load_from_jsonl(Path::new(".tasklane/tasks.jsonl")).await?;
///
/// for warning in warnings {
///     if let LoadWarning::CircularDependency { from, to } = warning {
///         eprintln!("Broke circular dependency: {from} -> {to}");
///     }
/// }
/// # drop(store);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// Line could not be parsed as a task; the line is skipped.
    MalformedJson { line_number: usize, error: String },

    /// Task parsed but failed validation; the task is skipped.
    InvalidTaskData {
        task_id: TaskId,
        line_number: usize,
        error: String,
    },

    /// A second record with an id already seen; the later record is skipped.
    DuplicateTask { task_id: TaskId, line_number: usize },

    /// Dependency on a task that is not in the file; the edge is dropped.
    OrphanedDependency { from: TaskId, to: TaskId },

    /// Edge that would close a cycle; the edge is dropped.
    CircularDependency { from: TaskId, to: TaskId },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "line {line_number}: malformed JSON: {error}")
            }
            Self::InvalidTaskData {
                task_id,
                line_number,
                error,
            } => write!(f, "line {line_number}: invalid task {task_id}: {error}"),
            Self::DuplicateTask {
                task_id,
                line_number,
            } => write!(f, "line {line_number}: duplicate task {task_id}"),
            Self::OrphanedDependency { from, to } => {
                write!(f, "task {from} depends on missing task {to}")
            }
            Self::CircularDependency { from, to } => {
                write!(f, "dependency {from} -> {to} would close a cycle")
            }
        }
    }
}

/// Load a store from a JSONL file.
///
/// Three passes: parse and validate records, register every task, then
/// rebuild dependency edges in ascending id order, dropping any edge whose
/// target is missing or that would close a cycle. Blank lines are ignored.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be opened or read.
pub async fn load_from_jsonl(path: &Path) -> Result<(Box<dyn TaskStore>, Vec<LoadWarning>)> {
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();
    let mut warnings = Vec::new();

    // First pass: parse and validate
    let mut records: BTreeMap<TaskId, Task> = BTreeMap::new();
    let mut line_number = 0;
    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let task: Task = match serde_json::from_str(&line) {
            Ok(task) => task,
            Err(e) => {
                warnings.push(LoadWarning::MalformedJson {
                    line_number,
                    error: e.to_string(),
                });
                continue;
            }
        };

        if let Err(e) = validate_title(&task.title) {
            warnings.push(LoadWarning::InvalidTaskData {
                task_id: task.id,
                line_number,
                error: e.to_string(),
            });
            continue;
        }

        if records.contains_key(&task.id) {
            warnings.push(LoadWarning::DuplicateTask {
                task_id: task.id,
                line_number,
            });
            continue;
        }

        records.insert(task.id, task);
    }

    // Second pass: register tasks without edges
    let mut inner = InMemoryStoreInner::new();
    let mut wanted = Vec::with_capacity(records.len());
    for (id, mut task) in records {
        let mut dependencies = std::mem::take(&mut task.dependencies);
        normalize_dependencies(&mut dependencies);
        wanted.push((id, dependencies));
        inner.insert(task);
    }

    // Third pass: rebuild edges with orphan and cycle checks
    for (id, dependencies) in wanted {
        let mut kept = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            if !inner.tasks.contains_key(&dependency) {
                warnings.push(LoadWarning::OrphanedDependency {
                    from: id,
                    to: dependency,
                });
                continue;
            }

            if inner.graph.would_create_cycle(id, &[dependency]) {
                warnings.push(LoadWarning::CircularDependency {
                    from: id,
                    to: dependency,
                });
                continue;
            }

            inner.graph.add_edge(id, dependency);
            kept.push(dependency);
        }

        if let Some(task) = inner.tasks.get_mut(&id) {
            task.dependencies = kept;
        }
    }

    tracing::debug!(
        path = %path.display(),
        tasks = inner.tasks.len(),
        warnings = warnings.len(),
        "Loaded JSONL file"
    );

    Ok((Box::new(Arc::new(Mutex::new(inner))), warnings))
}

/// Save a store to a JSONL file.
///
/// Tasks are written in ascending id order to a sibling `.tmp` file which is
/// then renamed over `path`, so a crash mid-write leaves the previous file
/// intact.
///
/// # Errors
///
/// Returns `Error::Io` on any filesystem failure, or
/// `Error::Storage(StorageError::Serialization)` if a task fails to serialize.
pub async fn save_to_jsonl(store: &dyn TaskStore, path: &Path) -> Result<()> {
    let temp_path = path.with_extension("jsonl.tmp");

    let file = File::create(&temp_path).await?;
    let mut writer = BufWriter::new(file);

    let tasks = store.export_all().await?;
    for task in &tasks {
        let json = serde_json::to_string(task).map_err(StorageError::Serialization)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await?;
    writer.into_inner().sync_all().await?;

    tokio::fs::rename(&temp_path, path).await.map_err(Error::Io)?;

    tracing::debug!(path = %path.display(), tasks = tasks.len(), "Saved JSONL file");
    Ok(())
}
