//! The derived view of a task list.
//!
//! A [`Board`] is rebuilt from scratch from a store snapshot on every read.
//! At the scale of a personal task list full recomputation is cheap, so no
//! incremental state is kept between mutations.

use super::critical_path::{CriticalPathAnalysis, analyze};
use super::schedule::{earliest_starts, sort_for_display};
use crate::domain::{Task, TaskId, TaskWithDependencies};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A task annotated with its derived graph data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardEntry {
    /// The task itself
    #[serde(flatten)]
    pub task: Task,

    /// Level of the task; `None` if it could not be analyzed
    pub level: Option<usize>,

    /// Whether the task is on the critical path
    pub critical: bool,

    /// Earliest permissible start date, if any dependency has a due date
    pub earliest_start: Option<NaiveDate>,
}

/// All tasks in display order, plus the critical path analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Tasks in default display order
    pub tasks: Vec<BoardEntry>,

    /// Critical path analysis of the snapshot
    pub analysis: CriticalPathAnalysis,
}

impl Board {
    /// Build the derived view from a snapshot of tasks.
    pub fn build(mut tasks: Vec<Task>) -> Self {
        let analysis = analyze(&tasks);
        let starts = earliest_starts(&tasks);
        sort_for_display(&mut tasks, &starts);

        let tasks = tasks
            .into_iter()
            .map(|task| BoardEntry {
                level: analysis.level(task.id),
                critical: analysis.is_critical(task.id),
                earliest_start: starts.get(&task.id).copied(),
                task,
            })
            .collect();

        Self { tasks, analysis }
    }

    /// Look up an entry by task id
    pub fn entry(&self, id: TaskId) -> Option<&BoardEntry> {
        self.tasks.iter().find(|entry| entry.task.id == id)
    }

    /// Combine a resolved task and its dependents with the board's derived
    /// data for that task.
    pub fn details(&self, resolved: TaskWithDependencies, dependents: Vec<TaskId>) -> TaskDetails {
        let id = resolved.task.id;
        let entry = self.entry(id);
        TaskDetails {
            level: entry.and_then(|entry| entry.level),
            critical: entry.is_some_and(|entry| entry.critical),
            earliest_start: entry.and_then(|entry| entry.earliest_start),
            task: resolved.task,
            dependencies: resolved.dependencies,
            dependents,
        }
    }

    /// Node/edge view for graph rendering.
    ///
    /// Nodes are in ascending id order. Edges point from dependent to
    /// prerequisite; edges to ids that are not on the board are dropped.
    pub fn graph_view(&self) -> GraphView {
        let mut nodes: Vec<GraphNode> = self
            .tasks
            .iter()
            .map(|entry| GraphNode {
                id: entry.task.id,
                title: entry.task.title.clone(),
                level: entry.level,
                critical: entry.critical,
            })
            .collect();
        nodes.sort_by_key(|node| node.id);

        let mut edges: Vec<GraphEdge> = self
            .tasks
            .iter()
            .flat_map(|entry| {
                entry
                    .task
                    .dependencies
                    .iter()
                    .filter(move |dependency| self.entry(**dependency).is_some())
                    .map(move |&dependency| GraphEdge {
                        from: entry.task.id,
                        to: dependency,
                        critical: self.analysis.is_critical_edge(entry.task.id, dependency),
                    })
            })
            .collect();
        edges.sort_by_key(|edge| (edge.from, edge.to));

        GraphView { nodes, edges }
    }
}

/// Everything known about a single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    /// The task itself
    #[serde(flatten)]
    pub task: Task,

    /// Direct prerequisite tasks, ascending id
    #[serde(rename = "resolved_dependencies")]
    pub dependencies: Vec<Task>,

    /// Ids of tasks that directly depend on this one, ascending
    pub dependents: Vec<TaskId>,

    /// Level of the task; `None` if it could not be analyzed
    pub level: Option<usize>,

    /// Whether the task is on the critical path
    pub critical: bool,

    /// Earliest permissible start date
    pub earliest_start: Option<NaiveDate>,
}

/// Graph rendering payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphView {
    /// One node per task
    pub nodes: Vec<GraphNode>,
    /// One edge per dependency
    pub edges: Vec<GraphEdge>,
}

/// A task node in the graph view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Task id
    pub id: TaskId,
    /// Task title
    pub title: String,
    /// Level badge
    pub level: Option<usize>,
    /// Critical path membership
    pub critical: bool,
}

/// A dependency edge in the graph view, dependent -> prerequisite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Dependent task
    pub from: TaskId,
    /// Prerequisite task
    pub to: TaskId,
    /// Whether the edge lies on the critical path
    pub critical: bool,
}
