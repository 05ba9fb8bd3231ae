//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use crate::domain::{TaskId, validate_title as validate_domain_title};
use chrono::NaiveDate;

/// Validate a task title.
///
/// Delegates to the domain validator so the CLI and the store agree.
pub fn validate_title(s: &str) -> Result<String, String> {
    validate_domain_title(s).map_err(|e| e.to_string())?;
    Ok(s.trim().to_string())
}

/// Parse a due date in `YYYY-MM-DD` form.
pub fn parse_due_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Expected format: YYYY-MM-DD", s.trim()))
}

/// Parse a positive task id.
pub fn parse_task_id(s: &str) -> Result<TaskId, String> {
    match s.parse::<TaskId>() {
        Ok(id) if id.get() > 0 => Ok(id),
        Ok(_) => Err("Task ID must be positive".to_string()),
        Err(_) => Err(format!("Invalid task ID '{}'. Expected a number", s.trim())),
    }
}
