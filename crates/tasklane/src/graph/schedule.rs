//! Date rules: earliest start, due-date ordering and display order.
//!
//! Earliest start looks exactly one hop deep. A task may start the day after
//! the latest due date among its direct dependencies; the dependencies' own
//! computed start dates are not taken into account.

use crate::domain::{Task, TaskId};
use crate::error::ValidationError;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Earliest permissible start for a task, given its direct dependencies.
///
/// Returns the day after the latest dependency due date, or `None` if no
/// dependency carries a due date.
pub fn earliest_start<'a, I>(dependencies: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = &'a Task>,
{
    dependencies
        .into_iter()
        .filter_map(|dependency| dependency.due_date)
        .max()
        .and_then(|latest| latest.succ_opt())
}

/// Earliest start for every task in a snapshot that has one.
///
/// Dependencies missing from the snapshot are ignored.
pub fn earliest_starts(tasks: &[Task]) -> BTreeMap<TaskId, NaiveDate> {
    let by_id: HashMap<TaskId, &Task> = tasks.iter().map(|task| (task.id, task)).collect();

    tasks
        .iter()
        .filter_map(|task| {
            let dependencies = task
                .dependencies
                .iter()
                .filter_map(|dependency| by_id.get(dependency).copied());
            earliest_start(dependencies).map(|start| (task.id, start))
        })
        .collect()
}

/// Enforce that no dependency is due after its dependent.
///
/// A task without a due date, or a dependency without one, imposes no
/// constraint. The first violating dependency in iteration order is reported.
///
/// # Errors
///
/// Returns [`ValidationError::DueDateConflict`] on the first violation.
pub fn check_due_dates<'a, I>(task_due: Option<NaiveDate>, dependencies: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a Task>,
{
    let Some(task_due) = task_due else {
        return Ok(());
    };

    for dependency in dependencies {
        if let Some(dependency_due) = dependency.due_date.filter(|&due| due > task_due) {
            return Err(ValidationError::DueDateConflict {
                dependency: dependency.id,
                dependency_due,
                task_due,
            });
        }
    }

    Ok(())
}

/// Sort tasks into default display order.
///
/// Tasks are ordered by earliest start ascending. A task with no earliest
/// start is placed by its own due date instead, and tasks with neither come
/// last. Remaining ties fall back to creation time, then id.
pub fn sort_for_display(tasks: &mut [Task], starts: &BTreeMap<TaskId, NaiveDate>) {
    let key = |task: &Task| starts.get(&task.id).copied().or(task.due_date);

    tasks.sort_by(|a, b| {
        compare_dates(key(a), key(b))
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
}

/// Ascending order with absent dates last.
fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
