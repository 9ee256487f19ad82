//! SQLite task storage implementation
//!
//! Each operation is a single statement against the `tasks` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, error};

use super::model::{NewTask, Task, TaskId, TaskStatus};
use super::repository::{SortOrder, TaskRepository};
use crate::{Error, Result};

const SELECT_COLUMNS: &str = "id, title, status, priority, completed_at, created_at, updated_at";

/// Database row for Task
#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    status: String,
    priority: String,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = Error;

    fn try_from(row: TaskRow) -> Result<Self> {
        Ok(Task {
            id: row.id,
            title: row.title,
            status: row.status.parse().map_err(Error::Storage)?,
            priority: row.priority.parse().map_err(Error::Storage)?,
            completed_at: row.completed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Relational task store backed by a SQLite pool
#[derive(Clone)]
pub struct SqlTaskStore {
    pool: SqlitePool,
}

impl SqlTaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_all(&self, order: SortOrder) -> Result<Vec<Task>> {
        let order_clause = match order {
            SortOrder::Creation => "ORDER BY id",
            SortOrder::CreatedDesc => "ORDER BY created_at DESC, id DESC",
        };
        let sql = format!("SELECT {SELECT_COLUMNS} FROM tasks {order_clause}");

        let rows: Vec<TaskRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Task::try_from).collect()
    }
}

#[async_trait]
impl TaskRepository for SqlTaskStore {
    async fn list(&self, order: SortOrder) -> Vec<Task> {
        match self.fetch_all(order).await {
            Ok(tasks) => tasks,
            Err(e) => {
                error!(error = %e, "Failed to list tasks");
                Vec::new()
            }
        }
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        let result: std::result::Result<i64, sqlx::Error> = sqlx::query_scalar(
            "INSERT INTO tasks (title, status, priority, completed_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&task.title)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.completed_at)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => {
                debug!(task_id = id, "Created task");
                Ok(task.with_id(id))
            }
            Err(e) => {
                error!(error = %e, "Failed to insert task");
                Err(e.into())
            }
        }
    }

    async fn delete(&self, id: TaskId) -> bool {
        match sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
        {
            Ok(result) => result.rows_affected() == 1,
            Err(e) => {
                error!(task_id = id, error = %e, "Failed to delete task");
                false
            }
        }
    }

    async fn update_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let sql = format!(
            "UPDATE tasks SET status = ?, completed_at = ?, updated_at = ?
             WHERE id = ?
             RETURNING {SELECT_COLUMNS}"
        );

        let row: Option<TaskRow> = sqlx::query_as(&sql)
            .bind(status.as_str())
            .bind(completed_at)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(task_id = id, error = %e, "Failed to update task status");
                Error::from(e)
            })?;

        row.ok_or(Error::TaskNotFound(id))?.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;
    use crate::task::TaskPriority;
    use chrono::Duration;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_store() -> SqlTaskStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        database::migrate(&pool).await.unwrap();
        SqlTaskStore::new(pool)
    }

    #[tokio::test]
    async fn test_create_returns_assigned_id() {
        let store = create_test_store().await;

        let first = store
            .create(NewTask::new("Buy milk", TaskPriority::Medium))
            .await
            .unwrap();
        let second = store
            .create(NewTask::new("Walk dog", TaskPriority::High))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.title, "Buy milk");
        assert!(first.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_list_round_trips_fields() {
        let store = create_test_store().await;
        let created = store
            .create(NewTask::new("Buy milk", TaskPriority::Low))
            .await
            .unwrap();

        let tasks = store.list(SortOrder::Creation).await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, created.id);
        assert_eq!(tasks[0].status, TaskStatus::Active);
        assert_eq!(tasks[0].priority, TaskPriority::Low);
        assert_eq!(tasks[0].created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_list_orders() {
        let store = create_test_store().await;
        let base = Utc::now();

        for (title, offset) in [("old", 0), ("newest", 20), ("middle", 10)] {
            let mut task = NewTask::new(title, TaskPriority::Medium);
            task.created_at = base + Duration::seconds(offset);
            store.create(task).await.unwrap();
        }

        let by_id: Vec<String> = store
            .list(SortOrder::Creation)
            .await
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(by_id, vec!["old", "newest", "middle"]);

        let newest_first: Vec<String> = store
            .list(SortOrder::CreatedDesc)
            .await
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(newest_first, vec!["newest", "middle", "old"]);
    }

    #[tokio::test]
    async fn test_list_degrades_to_empty_on_failure() {
        let store = create_test_store().await;
        store
            .create(NewTask::new("Buy milk", TaskPriority::Medium))
            .await
            .unwrap();

        sqlx::query("DROP TABLE tasks")
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(store.list(SortOrder::Creation).await.is_empty());
        assert!(!store.delete(1).await);
    }

    #[tokio::test]
    async fn test_create_failure_is_propagated() {
        let store = create_test_store().await;
        sqlx::query("DROP TABLE tasks")
            .execute(&store.pool)
            .await
            .unwrap();

        let result = store
            .create(NewTask::new("Buy milk", TaskPriority::Medium))
            .await;
        assert!(matches!(result, Err(Error::Query(_))));
    }

    #[tokio::test]
    async fn test_update_status() {
        let store = create_test_store().await;
        let task = store
            .create(NewTask::new("Buy milk", TaskPriority::Medium))
            .await
            .unwrap();

        let done = store
            .update_status(task.id, TaskStatus::Done, Some(Utc::now()))
            .await
            .unwrap();
        assert_eq!(done.status, TaskStatus::Done);
        assert!(done.completed_at.is_some());
        assert!(done.updated_at >= task.updated_at);

        let active = store
            .update_status(task.id, TaskStatus::Active, None)
            .await
            .unwrap();
        assert_eq!(active.status, TaskStatus::Active);
        assert!(active.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_update_nonexistent_task() {
        let store = create_test_store().await;

        let result = store.update_status(7, TaskStatus::Done, Some(Utc::now())).await;
        match result.unwrap_err() {
            Error::TaskNotFound(id) => assert_eq!(id, 7),
            e => panic!("Expected TaskNotFound error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_delete_task() {
        let store = create_test_store().await;
        let task = store
            .create(NewTask::new("Task to delete", TaskPriority::Low))
            .await
            .unwrap();

        assert!(store.delete(task.id).await);
        assert!(!store.delete(task.id).await);
        assert!(store.list(SortOrder::Creation).await.is_empty());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = create_test_store().await;
        store
            .create(NewTask::new("One", TaskPriority::Medium))
            .await
            .unwrap();
        let two = store
            .create(NewTask::new("Two", TaskPriority::Medium))
            .await
            .unwrap();
        assert!(store.delete(two.id).await);

        let three = store
            .create(NewTask::new("Three", TaskPriority::Medium))
            .await
            .unwrap();
        assert_eq!(three.id, 3);
    }

    #[tokio::test]
    async fn test_created_desc_ties_newest_id_first() {
        let store = create_test_store().await;
        let stamp = Utc::now();

        for title in ["a", "b", "c"] {
            let mut task = NewTask::new(title, TaskPriority::Medium);
            task.created_at = stamp;
            store.create(task).await.unwrap();
        }

        let ids: Vec<TaskId> = store
            .list(SortOrder::CreatedDesc)
            .await
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
