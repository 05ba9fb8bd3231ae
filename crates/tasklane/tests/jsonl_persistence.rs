//! Integration tests for the JSONL storage backend.
//!
//! These tests exercise the persistence round trip through
//! `create_storage`, plus the resilient loader on hand-edited files.

use chrono::NaiveDate;
use tasklane::domain::{NewTask, TaskId};
use tasklane::storage::in_memory::{LoadWarning, load_from_jsonl};
use tasklane::storage::{StorageBackend, create_storage};
use tempfile::TempDir;

#[tokio::test]
async fn test_saved_graph_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.jsonl");
    let due = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

    {
        let mut store = create_storage(StorageBackend::Jsonl(path.clone())).await.unwrap();
        let a = store.create(NewTask::new("A").due(due)).await.unwrap();
        store.create(NewTask::new("B").depends_on([a.id])).await.unwrap();
        store.save().await.unwrap();
    }

    let store = create_storage(StorageBackend::Jsonl(path)).await.unwrap();
    let board = store.board().await.unwrap();

    assert_eq!(board.tasks.len(), 2);
    assert_eq!(board.analysis.critical_path, vec![TaskId::new(1), TaskId::new(2)]);
    assert_eq!(board.entry(TaskId::new(1)).unwrap().task.due_date, Some(due));
    assert_eq!(
        board.entry(TaskId::new(2)).unwrap().earliest_start,
        NaiveDate::from_ymd_opt(2024, 1, 11)
    );
}

#[tokio::test]
async fn test_unsaved_changes_are_not_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.jsonl");

    let mut store = create_storage(StorageBackend::Jsonl(path.clone())).await.unwrap();
    store.create(NewTask::new("Never saved")).await.unwrap();
    drop(store);

    let reopened = create_storage(StorageBackend::Jsonl(path)).await.unwrap();
    assert!(reopened.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ids_continue_after_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.jsonl");

    let mut store = create_storage(StorageBackend::Jsonl(path.clone())).await.unwrap();
    store.create(NewTask::new("One")).await.unwrap();
    store.create(NewTask::new("Two")).await.unwrap();
    store.save().await.unwrap();

    let mut reopened = create_storage(StorageBackend::Jsonl(path)).await.unwrap();
    let three = reopened.create(NewTask::new("Three")).await.unwrap();
    assert_eq!(three.id, TaskId::new(3));
}

#[tokio::test]
async fn test_file_format_is_one_task_per_line() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.jsonl");

    let mut store = create_storage(StorageBackend::Jsonl(path.clone())).await.unwrap();
    store.create(NewTask::new("One")).await.unwrap();
    store
        .create(NewTask::new("Two").depends_on([TaskId::new(1)]))
        .await
        .unwrap();
    store.save().await.unwrap();

    let content = tokio::fs::read_to_string(&path).await.unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[1]["dependencies"], serde_json::json!([1]));
    assert!(lines[0].get("due_date").is_none());
}

#[tokio::test]
async fn test_hand_edited_cycle_is_broken_on_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tasks.jsonl");
    tokio::fs::write(
        &path,
        concat!(
            r#"{"id":1,"title":"A","created_at":"2024-01-01T00:00:00Z","dependencies":[3]}"#,
            "\n",
            r#"{"id":2,"title":"B","created_at":"2024-01-01T00:00:00Z","dependencies":[1]}"#,
            "\n",
            r#"{"id":3,"title":"C","created_at":"2024-01-01T00:00:00Z","dependencies":[2]}"#,
            "\n",
        ),
    )
    .await
    .unwrap();

    let (store, warnings) = load_from_jsonl(&path).await.unwrap();

    assert_eq!(
        warnings,
        vec![LoadWarning::CircularDependency {
            from: TaskId::new(3),
            to: TaskId::new(2)
        }]
    );
    let board = store.board().await.unwrap();
    assert_eq!(board.analysis.level_of.len(), 3, "every task is analyzable again");
    assert_eq!(
        board.analysis.critical_path,
        vec![TaskId::new(2), TaskId::new(1), TaskId::new(3)]
    );
}
