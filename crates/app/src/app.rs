//! Application facade
//!
//! The single entry point the UI shell calls into.

use std::sync::Arc;

use todo_core::database;
use todo_core::task::{
    FileTaskStore, SqlTaskStore, Task, TaskId, TaskPriority, TaskRepository, TaskService,
    TaskStatus,
};
use todo_core::{Backend, Config};
use tracing::info;

use crate::error::AppError;

#[derive(Clone)]
pub struct App {
    service: TaskService,
}

impl App {
    pub fn new(service: TaskService) -> Self {
        Self { service }
    }

    /// Open the configured backend and build the application
    ///
    /// Connection and migration failures are returned as-is; the caller is
    /// expected to abort rather than run without storage.
    pub async fn from_config(config: &Config) -> todo_core::Result<Self> {
        let repo: Arc<dyn TaskRepository> = match config.backend {
            Backend::Sqlite => {
                let pool = database::connect(&config.database_path).await?;
                if config.migrate {
                    database::migrate(&pool).await?;
                } else {
                    info!("Skipping database migrations");
                }
                Arc::new(SqlTaskStore::new(pool))
            }
            Backend::File => Arc::new(FileTaskStore::open(&config.tasks_file).await?),
        };

        info!(backend = ?config.backend, "Application ready");
        Ok(Self::new(TaskService::new(repo)))
    }

    pub async fn get_tasks(&self, sort_by_created_desc: bool) -> Vec<Task> {
        self.service.get_tasks(sort_by_created_desc).await
    }

    pub async fn add_task(&self, title: &str, priority: TaskPriority) -> Result<Task, AppError> {
        Ok(self.service.add_task(title, priority).await?)
    }

    pub async fn delete_task(&self, id: TaskId) -> bool {
        self.service.delete_task(id).await
    }

    pub async fn toggle_status(
        &self,
        id: TaskId,
        current_status: TaskStatus,
    ) -> Result<Task, AppError> {
        Ok(self.service.toggle_status(id, current_status).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(backend: Backend, temp: &TempDir) -> Config {
        Config {
            backend,
            data_dir: temp.path().to_path_buf(),
            database_path: temp.path().join("todo.db"),
            tasks_file: temp.path().join("tasks.jsonl"),
            migrate: true,
        }
    }

    #[tokio::test]
    async fn test_operations_on_both_backends() {
        for backend in [Backend::Sqlite, Backend::File] {
            let temp = TempDir::new().unwrap();
            let app = App::from_config(&config_for(backend, &temp)).await.unwrap();

            let task = app.add_task("Buy milk", TaskPriority::Medium).await.unwrap();
            assert_eq!(task.id, 1);

            let done = app.toggle_status(task.id, task.status).await.unwrap();
            assert_eq!(done.status, TaskStatus::Done);
            assert!(done.completed_at.is_some());

            assert!(app.delete_task(task.id).await);
            assert!(app.get_tasks(false).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_errors_at_the_boundary() {
        let temp = TempDir::new().unwrap();
        let app = App::from_config(&config_for(Backend::File, &temp))
            .await
            .unwrap();

        assert_eq!(
            app.add_task("  ", TaskPriority::Low).await.unwrap_err(),
            AppError::InvalidTitle
        );
        assert_eq!(
            app.toggle_status(5, TaskStatus::Done).await.unwrap_err(),
            AppError::NotFound(5)
        );
        assert!(!app.delete_task(5).await);
    }

    #[tokio::test]
    async fn test_unmigrated_database_hides_store_errors() {
        let temp = TempDir::new().unwrap();
        let mut config = config_for(Backend::Sqlite, &temp);
        config.migrate = false;
        let app = App::from_config(&config).await.unwrap();

        assert!(app.get_tasks(true).await.is_empty());
        assert_eq!(
            app.add_task("Buy milk", TaskPriority::High)
                .await
                .unwrap_err(),
            AppError::Storage
        );
    }

    #[tokio::test]
    async fn test_file_backend_survives_restart() {
        let temp = TempDir::new().unwrap();
        let config = config_for(Backend::File, &temp);

        {
            let app = App::from_config(&config).await.unwrap();
            for title in ["one", "two", "three"] {
                app.add_task(title, TaskPriority::Medium).await.unwrap();
            }
        }

        let app = App::from_config(&config).await.unwrap();
        let tasks = app.get_tasks(false).await;
        assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let next = app.add_task("four", TaskPriority::Low).await.unwrap();
        assert_eq!(next.id, 4);
    }

    #[tokio::test]
    async fn test_bootstrap_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let mut config = config_for(Backend::Sqlite, &temp);
        config.database_path = temp.path().to_path_buf();

        let result = App::from_config(&config).await;
        assert!(matches!(result, Err(todo_core::Error::Connection(_))));
    }
}
