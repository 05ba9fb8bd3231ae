//! Longest-path leveling and critical path extraction.
//!
//! The level of a task is the number of edges on the longest dependency
//! chain leading into it. Levels are computed with a Kahn-style traversal:
//! roots start at level 0, and every time a prerequisite is dequeued its
//! dependents are relaxed to `level + 1` if that is strictly larger than what
//! they already have. The prerequisite that produced a dependent's final
//! level is kept as its predecessor, and the critical path is rebuilt by
//! walking predecessors back from the deepest task.
//!
//! # Determinism
//!
//! - Tasks are seeded and visited in ascending id order and the work queue
//!   is FIFO.
//! - A predecessor is only replaced by a strictly longer chain, so the first
//!   prerequisite to reach the maximum keeps the slot.
//! - When several tasks share the maximum level, the lowest id ends the path.
//!
//! # Malformed input
//!
//! Tasks on a cycle never reach in-degree zero. They are never dequeued and
//! are left out of the result instead of causing an error. Dependencies on
//! ids that are not in the input are ignored.

use crate::domain::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// Result of a critical path analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalPathAnalysis {
    /// Task ids from a root to the deepest task, in dependency order
    pub critical_path: Vec<TaskId>,

    /// Number of tasks on the critical path (`max level + 1`, or 0 when empty)
    pub path_length: usize,

    /// Level of every analyzed task
    pub level_of: BTreeMap<TaskId, usize>,
}

impl CriticalPathAnalysis {
    /// Level of a task, or `None` if it was not analyzed
    pub fn level(&self, task: TaskId) -> Option<usize> {
        self.level_of.get(&task).copied()
    }

    /// Returns true if the task lies on the critical path
    pub fn is_critical(&self, task: TaskId) -> bool {
        self.critical_path.contains(&task)
    }

    /// Returns true if `dependent -> prerequisite` is an edge of the critical path
    pub fn is_critical_edge(&self, dependent: TaskId, prerequisite: TaskId) -> bool {
        self.critical_path
            .windows(2)
            .any(|pair| pair[0] == prerequisite && pair[1] == dependent)
    }

    /// Highest level in the analysis
    pub fn max_level(&self) -> Option<usize> {
        self.level_of.values().copied().max()
    }
}

/// Compute levels and the critical path for a task snapshot.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use tasklane::domain::{Task, TaskId};
/// use tasklane::graph::analyze;
///
/// let task = |id: u64, deps: &[u64]| Task {
///     id: TaskId::new(id),
///     title: format!("task {id}"),
///     due_date: None,
///     created_at: Utc::now(),
///     dependencies: deps.iter().copied().map(TaskId::new).collect(),
/// };
///
/// let analysis = analyze(&[task(1, &[]), task(2, &[1])]);
/// assert_eq!(analysis.critical_path, vec![TaskId::new(1), TaskId::new(2)]);
/// assert_eq!(analysis.path_length, 2);
/// ```
pub fn analyze<'a, I>(tasks: I) -> CriticalPathAnalysis
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut known: BTreeMap<TaskId, &Task> = BTreeMap::new();
    for task in tasks {
        known.entry(task.id).or_insert(task);
    }

    if known.is_empty() {
        return CriticalPathAnalysis::default();
    }

    // Invert the stored edges: prerequisite -> dependents.
    let mut dependents: BTreeMap<TaskId, BTreeSet<TaskId>> = BTreeMap::new();
    let mut in_degree: BTreeMap<TaskId, usize> = BTreeMap::new();
    for (&id, task) in &known {
        let dependencies: BTreeSet<TaskId> = task
            .dependencies
            .iter()
            .copied()
            .filter(|dependency| known.contains_key(dependency))
            .collect();
        in_degree.insert(id, dependencies.len());
        for dependency in dependencies {
            dependents.entry(dependency).or_default().insert(id);
        }
    }

    let mut level: HashMap<TaskId, usize> = HashMap::with_capacity(known.len());
    let mut predecessor: HashMap<TaskId, TaskId> = HashMap::new();
    let mut queue: VecDeque<TaskId> = VecDeque::new();

    for (&id, &degree) in &in_degree {
        if degree == 0 {
            level.insert(id, 0);
            queue.push_back(id);
        }
    }

    let mut level_of = BTreeMap::new();
    while let Some(current) = queue.pop_front() {
        let current_level = level.get(&current).copied().unwrap_or(0);
        level_of.insert(current, current_level);

        let Some(next) = dependents.get(&current) else {
            continue;
        };
        for &dependent in next {
            let proposed = current_level + 1;
            if level.get(&dependent).is_none_or(|&existing| proposed > existing) {
                level.insert(dependent, proposed);
                predecessor.insert(dependent, current);
            }

            if let Some(remaining) = in_degree.get_mut(&dependent) {
                *remaining -= 1;
                if *remaining == 0 {
                    queue.push_back(dependent);
                }
            }
        }
    }

    let mut deepest: Option<(TaskId, usize)> = None;
    for (&id, &task_level) in &level_of {
        if deepest.is_none_or(|(_, best)| task_level > best) {
            deepest = Some((id, task_level));
        }
    }
    let Some((end, max_level)) = deepest else {
        // Every task sits on a cycle.
        return CriticalPathAnalysis::default();
    };

    let mut critical_path = vec![end];
    let mut cursor = end;
    while let Some(&previous) = predecessor.get(&cursor) {
        critical_path.push(previous);
        cursor = previous;
    }
    critical_path.reverse();

    CriticalPathAnalysis {
        critical_path,
        path_length: max_level + 1,
        level_of,
    }
}
