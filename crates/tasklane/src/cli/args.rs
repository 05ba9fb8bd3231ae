//! CLI argument structs for all commands.

use chrono::NaiveDate;
use clap::Parser;

use super::validators::{parse_due_date, parse_task_id, validate_title};
use crate::domain::TaskId;

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `add` command
#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    /// Task title (maximum 200 characters)
    #[arg(value_parser = validate_title)]
    pub title: String,

    /// Due date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_due_date)]
    pub due: Option<NaiveDate>,

    /// Tasks that must finish first (comma-separated IDs)
    #[arg(long, value_delimiter = ',', value_parser = parse_task_id)]
    pub deps: Vec<TaskId>,
}

/// Arguments for the `list` command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Only show tasks on the critical path
    #[arg(short, long)]
    pub critical: bool,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Task ID to display
    #[arg(value_parser = parse_task_id)]
    pub task_id: TaskId,
}

/// Arguments for the `deps` command
#[derive(Parser, Debug, Clone)]
pub struct DepsArgs {
    /// Task whose dependency set is replaced
    #[arg(value_parser = parse_task_id)]
    pub task_id: TaskId,

    /// New dependency IDs; none clears every dependency
    #[arg(value_parser = parse_task_id)]
    pub dependencies: Vec<TaskId>,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug, Clone)]
pub struct RmArgs {
    /// Task ID to delete
    #[arg(value_parser = parse_task_id)]
    pub task_id: TaskId,
}

/// Arguments for the `path` command
#[derive(Parser, Debug, Clone)]
pub struct PathArgs {}

/// Arguments for the `check` command
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Task that would receive the dependencies
    #[arg(value_parser = parse_task_id)]
    pub task_id: TaskId,

    /// Proposed dependency IDs
    #[arg(value_parser = parse_task_id, required = true)]
    pub dependencies: Vec<TaskId>,
}
