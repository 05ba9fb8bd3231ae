//! Output formatting for CLI commands.
//!
//! This module formats command output either as human-readable text or as
//! JSON for programmatic use. Text writers are generic over [`Write`] so they
//! can be tested against a buffer.

pub mod color;

use crate::domain::{Task, TaskId};
use crate::graph::{Board, BoardEntry, TaskDetails};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, success, warning};

use color::{bold, colorize_id, colorize_title, critical_marker, dimmed, level_badge};

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new OutputConfig with explicit values.
    pub fn new(use_ascii: bool, use_colors: bool) -> Self {
        Self {
            use_ascii,
            use_colors,
        }
    }

    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `TASKLANE_ASCII`: "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: standard variable, any value disables colors
    pub fn from_env() -> Self {
        let use_ascii = match env::var("TASKLANE_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "TASKLANE_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // https://no-color.org/
        let use_colors = env::var_os("NO_COLOR").is_none();

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(false, true)
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print the board (all tasks in display order)
pub fn print_board(board: &Board, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            write_board(&mut stdout.lock(), board, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(board),
    }
}

/// Print a single task with its relations
pub fn print_task_details(details: &TaskDetails, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            write_task_details(&mut stdout.lock(), details, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(details),
    }
}

/// Print the critical path summary
pub fn print_critical_path(board: &Board, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Text => {
            let stdout = io::stdout();
            write_critical_path(&mut stdout.lock(), board, &OutputConfig::from_env())
        }
        OutputMode::Json => print_json(&board.analysis),
    }
}

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{msg}")
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

/// Write the board as one line per task.
pub fn write_board<W: Write>(w: &mut W, board: &Board, config: &OutputConfig) -> io::Result<()> {
    if board.tasks.is_empty() {
        writeln!(w, "No tasks yet.")?;
        return Ok(());
    }

    writeln!(
        w,
        "{} task(s), critical path length {}",
        board.tasks.len(),
        board.analysis.path_length
    )?;
    writeln!(w)?;

    for entry in &board.tasks {
        write_board_entry(w, entry, config)?;
    }

    Ok(())
}

fn write_board_entry<W: Write>(w: &mut W, entry: &BoardEntry, config: &OutputConfig) -> io::Result<()> {
    let task = &entry.task;
    write!(
        w,
        "{} {} {} {}",
        critical_marker(entry.critical, config),
        colorize_id(task.id, config),
        level_badge(entry.level, config),
        colorize_title(&task.title, entry.critical, config),
    )?;

    if let Some(due) = task.due_date {
        write!(w, "  {} {}", dimmed("due", config), warning(&due.to_string(), config))?;
    }
    if let Some(start) = entry.earliest_start {
        write!(w, "  {} {start}", dimmed("start", config))?;
    }
    if !task.dependencies.is_empty() {
        write!(w, "  {} {}", dimmed("after", config), id_list(&task.dependencies, config))?;
    }

    writeln!(w)
}

/// Write full details of a single task.
pub fn write_task_details<W: Write>(
    w: &mut W,
    details: &TaskDetails,
    config: &OutputConfig,
) -> io::Result<()> {
    let task = &details.task;
    writeln!(
        w,
        "{} {} {}",
        critical_marker(details.critical, config),
        colorize_id(task.id, config),
        bold(&task.title, config)
    )?;
    writeln!(w)?;

    let due = task
        .due_date
        .map_or_else(|| "-".to_string(), |due| due.to_string());
    let start = details
        .earliest_start
        .map_or_else(|| "-".to_string(), |start| start.to_string());

    writeln!(w, "  {} {}", dimmed("Level:         ", config), level_badge(details.level, config))?;
    writeln!(w, "  {} {}", dimmed("Critical:      ", config), if details.critical { "yes" } else { "no" })?;
    writeln!(w, "  {} {due}", dimmed("Due:           ", config))?;
    writeln!(w, "  {} {start}", dimmed("Earliest start:", config))?;
    writeln!(
        w,
        "  {} {}",
        dimmed("Created:       ", config),
        task.created_at.format("%Y-%m-%d %H:%M")
    )?;

    write_task_list(w, "Depends on", &details.dependencies, config)?;

    if !details.dependents.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Required by", config))?;
        writeln!(w, "  {}", id_list(&details.dependents, config))?;
    }

    Ok(())
}

fn write_task_list<W: Write>(w: &mut W, title: &str, tasks: &[Task], config: &OutputConfig) -> io::Result<()> {
    if tasks.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}:", bold(title, config))?;
    for task in tasks {
        let due = task
            .due_date
            .map(|due| format!("  {} {due}", dimmed("due", config)))
            .unwrap_or_default();
        writeln!(w, "  {} {}{due}", colorize_id(task.id, config), task.title)?;
    }
    Ok(())
}

/// Write the critical path as a chain from its start to its end.
pub fn write_critical_path<W: Write>(w: &mut W, board: &Board, config: &OutputConfig) -> io::Result<()> {
    let path = &board.analysis.critical_path;
    if path.is_empty() {
        writeln!(w, "No critical path: there are no analyzable tasks.")?;
        return Ok(());
    }

    writeln!(
        w,
        "{} ({} task(s)):",
        bold("Critical path", config),
        board.analysis.path_length
    )?;

    let arrow = if config.use_ascii { "->" } else { "→" };
    for (position, id) in path.iter().enumerate() {
        let title = board
            .entry(*id)
            .map(|entry| entry.task.title.as_str())
            .unwrap_or_default();
        let lead = if position == 0 { "  " } else { arrow };
        writeln!(w, "{lead} {} {title}", colorize_id(id, config))?;
    }

    Ok(())
}

fn id_list(ids: &[TaskId], config: &OutputConfig) -> String {
    ids.iter()
        .map(|id| colorize_id(id, config))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn plain() -> OutputConfig {
        OutputConfig::new(true, false)
    }

    fn task(n: u64, due: Option<NaiveDate>, deps: &[u64]) -> Task {
        Task {
            id: TaskId::new(n),
            title: format!("task {n}"),
            due_date: due,
            created_at: Utc::now(),
            dependencies: deps.iter().copied().map(TaskId::new).collect(),
        }
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_empty_board() {
        let out = render(|w| write_board(w, &Board::default(), &plain()));
        assert_eq!(out, "No tasks yet.\n");
    }

    #[test]
    fn test_write_board_marks_critical_tasks() {
        let due = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let board = Board::build(vec![
            task(1, Some(due), &[]),
            task(2, None, &[1]),
            task(3, None, &[]),
        ]);

        let out = render(|w| write_board(w, &board, &plain()));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "3 task(s), critical path length 2");
        assert_eq!(lines[2], "* #1 L0 task 1  due 2024-01-10");
        assert_eq!(lines[3], "* #2 L1 task 2  start 2024-01-11  after #1");
        assert_eq!(lines[4], "  #3 L0 task 3");
    }

    #[test]
    fn test_write_critical_path() {
        let board = Board::build(vec![task(1, None, &[]), task(2, None, &[1])]);

        let out = render(|w| write_critical_path(w, &board, &plain()));

        assert_eq!(out, "Critical path (2 task(s)):\n   #1 task 1\n-> #2 task 2\n");
    }

    #[test]
    fn test_write_critical_path_empty() {
        let out = render(|w| write_critical_path(w, &Board::default(), &plain()));
        assert!(out.starts_with("No critical path"));
    }

    #[test]
    fn test_write_task_details_lists_relations() {
        let prerequisite = task(1, None, &[]);
        let board = Board::build(vec![prerequisite.clone(), task(2, None, &[1]), task(3, None, &[2])]);
        let details = TaskDetails {
            task: task(2, None, &[1]),
            dependencies: vec![prerequisite],
            dependents: vec![TaskId::new(3)],
            level: board.entry(TaskId::new(2)).and_then(|e| e.level),
            critical: true,
            earliest_start: None,
        };

        let out = render(|w| write_task_details(w, &details, &plain()));

        assert!(out.starts_with("* #2 task 2\n"));
        assert!(out.contains("Level:          L1"));
        assert!(out.contains("Depends on:\n  #1 task 1\n"));
        assert!(out.contains("Required by:\n  #3\n"));
    }
}
