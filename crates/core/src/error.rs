//! Error types for the core library

use thiserror::Error;

use crate::task::TaskId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("title cannot be blank")]
    InvalidTitle,

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Database migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
