//! Route handlers.
//!
//! Reads take the store's read lock; mutations take the write lock for the
//! whole validate, apply and save sequence so concurrent requests cannot
//! interleave between the check and the write.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tasklane::domain::{NewTask, Task, TaskId};
use tasklane::graph::{Board, CriticalPathAnalysis, GraphView, TaskDetails};
use tasklane::storage::{TaskStore, task_details};

use crate::error::ApiError;
use crate::models::{CreateTaskRequest, HealthResponse, SetDependenciesRequest};
use crate::routes::AppState;

type ApiResult<T> = Result<T, ApiError>;

fn task_id(path: Result<Path<u64>, PathRejection>) -> ApiResult<TaskId> {
    match path {
        Ok(Path(0)) => Err(ApiError::BadRequest("Task id must be positive".to_string())),
        Ok(Path(id)) => Ok(TaskId::new(id)),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Save after a successful mutation.
///
/// On failure the store is reloaded so memory matches what is on disk again.
async fn persist(store: &mut dyn TaskStore) -> ApiResult<()> {
    if let Err(err) = store.save().await {
        tracing::error!(error = %err, "Failed to save tasks, reloading from disk");
        if let Err(reload_err) = store.reload().await {
            tracing::error!(error = %reload_err, "Failed to reload tasks");
        }
        return Err(ApiError::Internal);
    }
    Ok(())
}

/// `GET /api/tasks`
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> ApiResult<Json<Board>> {
    let store = state.store.read().await;
    Ok(Json(store.board().await?))
}

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let request = body(payload)?;
    let mut store = state.store.write().await;

    let task = store.create(NewTask::from(request)).await?;
    persist(&mut **store).await?;

    tracing::info!(id = %task.id, "Created task");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /api/tasks/:id`
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<TaskDetails>> {
    let id = task_id(path)?;
    let store = state.store.read().await;
    Ok(Json(task_details(&**store, id).await?))
}

/// `PUT /api/tasks/:id/dependencies`
pub async fn set_dependencies(
    State(state): State<Arc<AppState>>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<SetDependenciesRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let id = task_id(path)?;
    let request = body(payload)?;
    let mut store = state.store.write().await;

    let task = store.set_dependencies(id, request.dependencies).await?;
    persist(&mut **store).await?;

    tracing::info!(id = %task.id, dependencies = ?task.dependencies, "Replaced dependencies");
    Ok(Json(task))
}

/// `DELETE /api/tasks/:id`
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = task_id(path)?;
    let mut store = state.store.write().await;

    store.delete(id).await?;
    persist(&mut **store).await?;

    tracing::info!(%id, "Deleted task");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/analysis`
pub async fn analysis(State(state): State<Arc<AppState>>) -> ApiResult<Json<CriticalPathAnalysis>> {
    let store = state.store.read().await;
    Ok(Json(store.board().await?.analysis))
}

/// `GET /api/graph`
pub async fn graph(State(state): State<Arc<AppState>>) -> ApiResult<Json<GraphView>> {
    let store = state.store.read().await;
    Ok(Json(store.board().await?.graph_view()))
}

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tasklane::storage::in_memory::new_in_memory_storage;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(new_in_memory_storage()))
    }

    fn create(title: &str, due: Option<NaiveDate>, deps: &[u64]) -> Result<Json<CreateTaskRequest>, JsonRejection> {
        Ok(Json(CreateTaskRequest {
            title: title.to_string(),
            due_date: due,
            dependencies: deps.iter().copied().map(TaskId::new).collect(),
        }))
    }

    fn id(n: u64) -> Result<Path<u64>, PathRejection> {
        Ok(Path(n))
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let state = state();

        let (status, Json(first)) = create_task(State(state.clone()), create("First", None, &[]))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        create_task(State(state.clone()), create("Second", None, &[first.id.get()]))
            .await
            .unwrap();

        let Json(board) = list_tasks(State(state)).await.unwrap();
        assert_eq!(board.tasks.len(), 2);
        assert_eq!(board.analysis.path_length, 2);
    }

    #[tokio::test]
    async fn test_create_with_late_dependency_is_422() {
        let state = state();
        let late = NaiveDate::from_ymd_opt(2024, 3, 1);
        let early = NaiveDate::from_ymd_opt(2024, 2, 1);
        create_task(State(state.clone()), create("Late", late, &[])).await.unwrap();

        let err = create_task(State(state.clone()), create("Early", early, &[1]))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(state.store.read().await.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cycle_via_put_is_422() {
        let state = state();
        create_task(State(state.clone()), create("A", None, &[])).await.unwrap();
        create_task(State(state.clone()), create("B", None, &[1])).await.unwrap();

        let request = SetDependenciesRequest {
            dependencies: vec![TaskId::new(2)],
        };
        let err = set_dependencies(State(state), id(1), Ok(Json(request)))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("Circular dependency"));
    }

    #[tokio::test]
    async fn test_get_task_details_and_missing() {
        let state = state();
        create_task(State(state.clone()), create("A", None, &[])).await.unwrap();
        create_task(State(state.clone()), create("B", None, &[1])).await.unwrap();

        let Json(details) = get_task(State(state.clone()), id(1)).await.unwrap();
        assert_eq!(details.dependents, vec![TaskId::new(2)]);
        assert!(details.critical);

        let err = get_task(State(state), id(9)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_zero_id_is_bad_request() {
        let err = get_task(State(state()), id(0)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_returns_no_content() {
        let state = state();
        create_task(State(state.clone()), create("A", None, &[])).await.unwrap();

        let status = delete_task(State(state.clone()), id(1)).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = delete_task(State(state), id(1)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analysis_and_graph() {
        let state = state();
        create_task(State(state.clone()), create("A", None, &[])).await.unwrap();
        create_task(State(state.clone()), create("B", None, &[1])).await.unwrap();
        create_task(State(state.clone()), create("C", None, &[])).await.unwrap();

        let Json(analysis) = analysis(State(state.clone())).await.unwrap();
        assert_eq!(analysis.critical_path, vec![TaskId::new(1), TaskId::new(2)]);

        let Json(view) = graph(State(state)).await.unwrap();
        assert_eq!(view.nodes.len(), 3);
        assert_eq!(view.edges.len(), 1);
        assert!(view.edges[0].critical);
    }

    #[tokio::test]
    async fn test_health() {
        let Json(health) = health().await;
        assert_eq!(health.status, "ok");
    }
}
