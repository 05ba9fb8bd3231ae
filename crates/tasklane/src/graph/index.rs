//! Adjacency index over the task list using petgraph.

use crate::domain::{Task, TaskId};
use petgraph::Direction;
use petgraph::algo;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Derived dependency index.
///
/// Nodes hold [`TaskId`] values. Edge direction is source (dependent) ->
/// target (prerequisite). A stable graph is used so that removing a task
/// never renumbers the remaining nodes in `node_map`.
#[derive(Debug, Clone, Default)]
pub struct TaskGraph {
    graph: StableDiGraph<TaskId, ()>,
    node_map: HashMap<TaskId, NodeIndex>,
}

impl TaskGraph {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a snapshot.
    ///
    /// Every task gets a node before any edge is added, so the order of the
    /// snapshot does not matter. Dependencies on ids that are not part of
    /// the snapshot are skipped.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let tasks: Vec<&Task> = tasks.into_iter().collect();
        let mut index = Self::new();
        for task in &tasks {
            index.add_task(task.id);
        }
        for task in &tasks {
            for &dependency in &task.dependencies {
                index.add_edge(task.id, dependency);
            }
        }
        index
    }

    /// Add a task with no edges. Adding an existing task is a no-op.
    pub fn add_task(&mut self, task: TaskId) {
        if !self.node_map.contains_key(&task) {
            let node = self.graph.add_node(task);
            self.node_map.insert(task, node);
        }
    }

    /// Add the edge `from -> to`.
    ///
    /// Returns false, leaving the index unchanged, if either endpoint is
    /// unknown or the edge already exists.
    pub fn add_edge(&mut self, from: TaskId, to: TaskId) -> bool {
        let (Some(&from_node), Some(&to_node)) = (self.node_map.get(&from), self.node_map.get(&to))
        else {
            return false;
        };
        if self.graph.find_edge(from_node, to_node).is_some() {
            return false;
        }
        self.graph.add_edge(from_node, to_node, ());
        true
    }

    /// Replace every outgoing edge of `task` with edges to `dependencies`.
    pub fn set_dependencies(&mut self, task: TaskId, dependencies: &[TaskId]) {
        let Some(&node) = self.node_map.get(&task) else {
            return;
        };
        let outgoing: Vec<_> = self.graph.edges(node).map(|edge| edge.id()).collect();
        for edge in outgoing {
            self.graph.remove_edge(edge);
        }
        for &dependency in dependencies {
            self.add_edge(task, dependency);
        }
    }

    /// Remove a task and every edge touching it.
    pub fn remove_task(&mut self, task: TaskId) {
        if let Some(node) = self.node_map.remove(&task) {
            self.graph.remove_node(node);
        }
    }

    /// Tasks that directly depend on `task`, in ascending id order.
    pub fn dependents(&self, task: TaskId) -> Vec<TaskId> {
        let Some(&node) = self.node_map.get(&task) else {
            return Vec::new();
        };
        let mut dependents: Vec<TaskId> = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| self.graph[edge.source()])
            .collect();
        dependents.sort_unstable();
        dependents
    }

    /// Returns true if `to` can be reached from `from` along dependency edges.
    ///
    /// A task always reaches itself. Unknown tasks reach nothing.
    pub fn reaches(&self, from: TaskId, to: TaskId) -> bool {
        if from == to {
            return true;
        }
        let (Some(&from_node), Some(&to_node)) = (self.node_map.get(&from), self.node_map.get(&to))
        else {
            return false;
        };
        algo::has_path_connecting(&self.graph, from_node, to_node, None)
    }

    /// Find the first proposed dependency that would close a cycle.
    ///
    /// Adding `task -> d` closes a cycle exactly when `d` already reaches
    /// `task`. Proposed ids are examined in the order given; `task` does not
    /// need to be indexed yet.
    pub fn first_cyclic_dependency(&self, task: TaskId, proposed: &[TaskId]) -> Option<TaskId> {
        proposed
            .iter()
            .copied()
            .find(|&dependency| self.reaches(dependency, task))
    }

    /// Check whether depending on `proposed` would make `task` depend on itself.
    ///
    /// A `true` result rejects the whole set.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use tasklane::domain::{Task, TaskId};
    /// use tasklane::graph::TaskGraph;
    ///
    /// let task = |id: u64, deps: &[u64]| Task {
    ///     id: TaskId::new(id),
    ///     title: format!("task {id}"),
    ///     due_date: None,
    ///     created_at: Utc::now(),
    ///     dependencies: deps.iter().copied().map(TaskId::new).collect(),
    /// };
    ///
    /// // Task 1 depends on task 2.
    /// let index = TaskGraph::from_tasks(&[task(1, &[2]), task(2, &[])]);
    ///
    /// assert!(index.would_create_cycle(TaskId::new(2), &[TaskId::new(1)]));
    /// assert!(!index.would_create_cycle(TaskId::new(1), &[TaskId::new(2)]));
    /// ```
    pub fn would_create_cycle(&self, task: TaskId, proposed: &[TaskId]) -> bool {
        self.first_cyclic_dependency(task, proposed).is_some()
    }
}
