//! Task service
//!
//! Business rules on top of a [`TaskRepository`]: title validation, defaults
//! for new tasks and the status toggle transition.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use super::model::{NewTask, Task, TaskId, TaskPriority, TaskStatus};
use super::repository::{SortOrder, TaskRepository};
use crate::{Error, Result};

/// Task operations exposed to the application layer
///
/// Holds no task state of its own; every call goes to the repository.
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    /// List tasks, newest first when `sort_by_created_desc` is set
    pub async fn get_tasks(&self, sort_by_created_desc: bool) -> Vec<Task> {
        self.repo
            .list(SortOrder::from_created_desc(sort_by_created_desc))
            .await
    }

    /// Validate and store a new active task
    pub async fn add_task(&self, title: &str, priority: TaskPriority) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            warn!("Rejected task with blank title");
            return Err(Error::InvalidTitle);
        }

        self.repo
            .create(NewTask::new(title, priority))
            .await
            .inspect_err(|e| error!(error = %e, "Failed to add task"))
    }

    /// Delete a task; `false` means there was nothing to delete
    pub async fn delete_task(&self, id: TaskId) -> bool {
        let deleted = self.repo.delete(id).await;
        debug!(task_id = id, deleted, "Delete requested");
        deleted
    }

    /// Flip a task between active and done
    ///
    /// `current_status` is the status the caller last saw. Moving to done
    /// stamps the completion time; moving back to active clears it.
    pub async fn toggle_status(&self, id: TaskId, current_status: TaskStatus) -> Result<Task> {
        let status = current_status.toggled();
        let completed_at = match status {
            TaskStatus::Done => Some(Utc::now()),
            TaskStatus::Active => None,
        };

        self.repo
            .update_status(id, status, completed_at)
            .await
            .inspect_err(|e| error!(task_id = id, error = %e, "Failed to toggle task status"))
    }
}
