//! Request and response bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tasklane::domain::{NewTask, TaskId};

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title
    pub title: String,

    /// Optional due date (`YYYY-MM-DD`)
    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Tasks that must finish first
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        Self {
            title: req.title,
            due_date: req.due_date,
            dependencies: req.dependencies,
        }
    }
}

/// Body of `PUT /api/tasks/:id/dependencies`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetDependenciesRequest {
    /// The full replacement dependency list
    pub dependencies: Vec<TaskId>,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// Always `"ok"` when the server answers
    pub status: String,
    /// Server version
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_optional_fields() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"title":"Write docs"}"#).unwrap();
        assert_eq!(req.title, "Write docs");
        assert!(req.due_date.is_none());
        assert!(req.dependencies.is_empty());

        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"title":"Ship","due_date":"2024-03-01","dependencies":[1,2]}"#,
        )
        .unwrap();
        let new_task = NewTask::from(req);
        assert_eq!(new_task.due_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(new_task.dependencies, vec![TaskId::new(1), TaskId::new(2)]);
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let result = serde_json::from_str::<CreateTaskRequest>(r#"{"title":"x","due_date":"soon"}"#);
        assert!(result.is_err());
    }
}
