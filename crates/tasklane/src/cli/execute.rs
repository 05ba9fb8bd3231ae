//! Command execution logic.
//!
//! Every mutating command saves the store before returning. A failed
//! validation returns before anything is saved, so the data file is never
//! touched by a rejected request.

use anyhow::Result;

use super::args::{AddArgs, CheckArgs, DepsArgs, InitArgs, ListArgs, PathArgs, RmArgs, ShowArgs};
use crate::app::App;
use crate::domain::NewTask;
use crate::output::{self, OutputConfig, OutputMode};
use crate::storage::task_details;

/// Execute the init command
pub async fn execute_init(args: &InitArgs, output_mode: OutputMode) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;
    let result = init::init(&current_dir).await?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "tasklane_dir": result.tasklane_dir.display().to_string(),
            "config_file": result.config_file.display().to_string(),
            "tasks_file": result.tasks_file.display().to_string(),
        }))?,
        OutputMode::Text if !args.quiet => {
            println!("Initialized tasklane in {}", result.tasklane_dir.display());
            println!("  Config: {}", result.config_file.display());
            println!("  Tasks:  {}", result.tasks_file.display());
        }
        OutputMode::Text => {}
    }

    Ok(())
}

/// Execute the add command
pub async fn execute_add(app: &mut App, args: &AddArgs, output_mode: OutputMode) -> Result<()> {
    let mut new_task = NewTask::new(args.title.clone()).depends_on(args.deps.iter().copied());
    new_task.due_date = args.due;

    let task = app.store_mut().create(new_task).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&task)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            output::print_message(&format!(
                "{} task #{}: {}",
                output::success("Created", &config),
                task.id,
                task.title
            ))?;
        }
    }

    Ok(())
}

/// Execute the list command
pub async fn execute_list(app: &App, args: &ListArgs, output_mode: OutputMode) -> Result<()> {
    let mut board = app.store().board().await?;
    if args.critical {
        board.tasks.retain(|entry| entry.critical);
    }

    output::print_board(&board, output_mode)?;
    Ok(())
}

/// Execute the show command
pub async fn execute_show(app: &App, args: &ShowArgs, output_mode: OutputMode) -> Result<()> {
    let details = task_details(app.store(), args.task_id).await?;
    output::print_task_details(&details, output_mode)?;
    Ok(())
}

/// Execute the deps command
pub async fn execute_deps(app: &mut App, args: &DepsArgs, output_mode: OutputMode) -> Result<()> {
    let task = app
        .store_mut()
        .set_dependencies(args.task_id, args.dependencies.clone())
        .await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&task)?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let message = if task.dependencies.is_empty() {
                format!("Cleared dependencies of task #{}", task.id)
            } else {
                let ids: Vec<String> = task.dependencies.iter().map(|id| format!("#{id}")).collect();
                format!("Task #{} now depends on {}", task.id, ids.join(", "))
            };
            output::print_message(&output::success(&message, &config))?;
        }
    }

    Ok(())
}

/// Execute the rm command
pub async fn execute_rm(app: &mut App, args: &RmArgs, output_mode: OutputMode) -> Result<()> {
    app.store_mut().delete(args.task_id).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "deleted": args.task_id,
        }))?,
        OutputMode::Text => {
            output::print_message(&format!("Deleted task #{}", args.task_id))?;
        }
    }

    Ok(())
}

/// Execute the path command
pub async fn execute_path(app: &App, _args: &PathArgs, output_mode: OutputMode) -> Result<()> {
    let board = app.store().board().await?;
    output::print_critical_path(&board, output_mode)?;
    Ok(())
}

/// Execute the check command
pub async fn execute_check(app: &App, args: &CheckArgs, output_mode: OutputMode) -> Result<()> {
    let cyclic = app
        .store()
        .would_create_cycle(args.task_id, &args.dependencies)
        .await?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "task_id": args.task_id,
            "dependencies": args.dependencies,
            "would_create_cycle": cyclic,
        }))?,
        OutputMode::Text => {
            let config = OutputConfig::from_env();
            let message = if cyclic {
                output::error("These dependencies would create a cycle", &config)
            } else {
                output::success("No cycle", &config)
            };
            output::print_message(&message)?;
        }
    }

    Ok(())
}
