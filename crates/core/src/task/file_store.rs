//! File-based task storage implementation
//!
//! Keeps the task list in memory and rewrites a newline-delimited JSON file
//! (one task per line) after every mutation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use super::model::{NewTask, Task, TaskId, TaskStatus};
use super::repository::{SortOrder, TaskRepository};
use crate::{Error, Result};

struct StoreState {
    /// Tasks in creation order
    tasks: Vec<Task>,
    next_id: TaskId,
}

/// File-backed in-memory task store
pub struct FileTaskStore {
    /// Path to the JSONL file
    path: PathBuf,
    /// Sidecar holding the last identity handed out
    seq_path: PathBuf,
    state: RwLock<StoreState>,
}

impl FileTaskStore {
    /// Open a FileTaskStore, loading any tasks already on disk
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tasks = load_tasks(&path).await?;
        let seq_path = sidecar_path(&path, "seq");
        let max_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let last_issued = read_last_issued(&seq_path).await?;
        let next_id = max_id.max(last_issued) + 1;

        info!(
            path = %path.display(),
            tasks = tasks.len(),
            next_id,
            "Opened file task store"
        );

        Ok(Self {
            path,
            seq_path,
            state: RwLock::new(StoreState { tasks, next_id }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(Vec::new());
    }

    let content = tokio::fs::read_to_string(path).await?;
    let mut tasks = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let task: Task = serde_json::from_str(line).map_err(|e| {
            Error::Storage(format!(
                "Failed to parse {} line {}: {}",
                path.display(),
                index + 1,
                e
            ))
        })?;
        tasks.push(task);
    }
    Ok(tasks)
}

async fn read_last_issued(seq_path: &Path) -> Result<TaskId> {
    if !tokio::fs::try_exists(seq_path).await? {
        return Ok(0);
    }
    let raw = tokio::fs::read_to_string(seq_path).await?;
    raw.trim().parse::<TaskId>().map_err(|e| {
        Error::Storage(format!(
            "Invalid sequence file {}: {}",
            seq_path.display(),
            e
        ))
    })
}

fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Replace `path` with `content`, going through a temporary file
async fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let tmp = sidecar_path(path, "tmp");
    tokio::fs::write(&tmp, content).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

async fn persist(path: &Path, tasks: &[Task]) -> Result<()> {
    let mut content = String::new();
    for task in tasks {
        content.push_str(&serde_json::to_string(task)?);
        content.push('\n');
    }
    write_atomically(path, &content).await
}

#[async_trait]
impl TaskRepository for FileTaskStore {
    async fn list(&self, order: SortOrder) -> Vec<Task> {
        let mut tasks = {
            let state = self.state.read().await;
            state.tasks.clone()
        };
        if order == SortOrder::CreatedDesc {
            tasks.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
        }
        tasks
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        let mut state = self.state.write().await;
        let id = state.next_id;

        if let Err(e) = write_atomically(&self.seq_path, &id.to_string()).await {
            error!(task_id = id, error = %e, "Failed to record task sequence");
            return Err(e);
        }
        state.next_id += 1;

        let task = task.with_id(id);
        state.tasks.push(task.clone());
        if let Err(e) = persist(&self.path, &state.tasks).await {
            state.tasks.pop();
            error!(task_id = id, error = %e, "Failed to persist new task");
            return Err(e);
        }

        debug!(task_id = id, "Created task");
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> bool {
        let mut state = self.state.write().await;
        let Some(index) = state.tasks.iter().position(|t| t.id == id) else {
            return false;
        };

        let removed = state.tasks.remove(index);
        if let Err(e) = persist(&self.path, &state.tasks).await {
            state.tasks.insert(index, removed);
            error!(task_id = id, error = %e, "Failed to persist task deletion");
            return false;
        }

        debug!(task_id = id, "Deleted task");
        true
    }

    async fn update_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Task> {
        let mut state = self.state.write().await;
        let index = state
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TaskNotFound(id))?;

        let previous = state.tasks[index].clone();
        let task = &mut state.tasks[index];
        task.status = status;
        task.completed_at = completed_at;
        task.updated_at = Utc::now();

        if let Err(e) = persist(&self.path, &state.tasks).await {
            state.tasks[index] = previous;
            error!(task_id = id, error = %e, "Failed to persist status change");
            return Err(e);
        }

        Ok(state.tasks[index].clone())
    }
}
