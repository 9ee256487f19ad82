//! Task repository trait
//!
//! Defines the interface every task storage backend implements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewTask, Task, TaskId, TaskStatus};
use crate::Result;

/// Ordering applied when listing tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Creation order (identity ascending)
    #[default]
    Creation,
    /// Newest first by creation timestamp
    CreatedDesc,
}

impl SortOrder {
    pub fn from_created_desc(sort_by_created_desc: bool) -> Self {
        if sort_by_created_desc {
            Self::CreatedDesc
        } else {
            Self::Creation
        }
    }
}

/// Repository interface for task storage
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Get all tasks
    ///
    /// Read failures are logged by the backend and yield an empty list.
    async fn list(&self, order: SortOrder) -> Vec<Task>;

    /// Insert a task, returning it with its assigned identity
    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Delete a task by ID, returning whether a task was removed
    async fn delete(&self, id: TaskId) -> bool;

    /// Set the status and completion time of a task
    async fn update_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Task>;
}
