//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `init`: Initialize a new tasklane repository
//! - `add`: Create a task, optionally with a due date and dependencies
//! - `list`: Show every task in display order with levels and the critical path
//! - `show`: Show one task with its dependencies and dependents
//! - `deps`: Replace a task's dependency set
//! - `rm`: Delete a task
//! - `path`: Show the critical path
//! - `check`: Ask whether a dependency set would create a cycle
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//!
//! # Example
//!
//! ```bash
//! tasklane add "Write design doc" --due 2024-01-10
//! tasklane add "Build it" --due 2024-01-20 --deps 1
//! tasklane deps 2 1 3
//! tasklane path
//! ```

mod args;
mod execute;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{AddArgs, CheckArgs, DepsArgs, InitArgs, ListArgs, PathArgs, RmArgs, ShowArgs};
pub use validators::{parse_due_date, parse_task_id, validate_title};

/// Tasklane - a todo list that knows what to do first
///
/// Tasks can depend on other tasks and carry due dates. Tasklane rejects
/// circular dependencies and computes the critical path.
#[derive(Parser, Debug)]
#[command(name = "tasklane")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new tasklane repository
    ///
    /// Creates the `.tasklane/` directory with configuration and an empty
    /// task file. Run this once in your project root.
    Init(InitArgs),

    /// Add a new task
    ///
    /// The task is rejected if a dependency does not exist, would create a
    /// cycle, or is due after the new task.
    Add(AddArgs),

    /// List tasks
    ///
    /// Tasks are ordered by earliest start date. Critical path members are
    /// marked and every task shows its level.
    List(ListArgs),

    /// Show detailed information about a task
    Show(ShowArgs),

    /// Replace a task's dependencies
    ///
    /// The new set is validated as a whole; on rejection nothing changes.
    /// Pass no IDs to clear all dependencies.
    Deps(DepsArgs),

    /// Delete a task
    ///
    /// Tasks that depended on it lose that dependency.
    Rm(RmArgs),

    /// Show the critical path
    Path(PathArgs),

    /// Check whether dependencies would create a cycle, without changing anything
    Check(CheckArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("Tasklane task list");
            println!("Use --help for more information");
            return Ok(());
        };

        match command {
            Commands::Init(args) => execute::execute_init(args, output_mode).await,
            Commands::Add(args) => execute::execute_add(&mut open_app().await?, args, output_mode).await,
            Commands::List(args) => execute::execute_list(&open_app().await?, args, output_mode).await,
            Commands::Show(args) => execute::execute_show(&open_app().await?, args, output_mode).await,
            Commands::Deps(args) => execute::execute_deps(&mut open_app().await?, args, output_mode).await,
            Commands::Rm(args) => execute::execute_rm(&mut open_app().await?, args, output_mode).await,
            Commands::Path(args) => execute::execute_path(&open_app().await?, args, output_mode).await,
            Commands::Check(args) => execute::execute_check(&open_app().await?, args, output_mode).await,
        }
    }
}

/// Open the repository containing the current directory.
async fn open_app() -> Result<crate::app::App> {
    let app = crate::app::App::from_directory(&std::env::current_dir()?).await?;
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["tasklane"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_add_with_due_and_deps() {
        let cli = Cli::try_parse_from([
            "tasklane", "add", "Ship it", "--due", "2024-03-01", "--deps", "1,2",
        ])
        .unwrap();

        let Some(Commands::Add(args)) = cli.command else {
            panic!("expected add command");
        };
        assert_eq!(args.title, "Ship it");
        assert_eq!(args.due, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(args.deps, vec![TaskId::new(1), TaskId::new(2)]);
    }

    #[test]
    fn test_parse_add_rejects_bad_input() {
        assert!(Cli::try_parse_from(["tasklane", "add", "   "]).is_err());
        assert!(Cli::try_parse_from(["tasklane", "add", "x", "--due", "tomorrow"]).is_err());
        assert!(Cli::try_parse_from(["tasklane", "add", "x", "--deps", "a"]).is_err());
    }

    #[test]
    fn test_parse_deps_allows_empty_set() {
        let cli = Cli::try_parse_from(["tasklane", "deps", "4"]).unwrap();
        let Some(Commands::Deps(args)) = cli.command else {
            panic!("expected deps command");
        };
        assert_eq!(args.task_id, TaskId::new(4));
        assert!(args.dependencies.is_empty());
    }

    #[test]
    fn test_parse_check_requires_dependencies() {
        assert!(Cli::try_parse_from(["tasklane", "check", "1"]).is_err());
        assert!(Cli::try_parse_from(["tasklane", "check", "1", "2"]).is_ok());
    }

    #[test]
    fn test_global_json_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["tasklane", "list", "--json"]).unwrap();
        assert!(cli.json);
    }
}
