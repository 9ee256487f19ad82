//! Errors surfaced to the shell
//!
//! Store internals are logged by the service and never reach the user;
//! only the outcome category does.

use thiserror::Error;
use todo_core::task::TaskId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AppError {
    #[error("title cannot be blank")]
    InvalidTitle,

    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("the task could not be saved")]
    Storage,
}

impl From<todo_core::Error> for AppError {
    fn from(err: todo_core::Error) -> Self {
        match err {
            todo_core::Error::InvalidTitle => Self::InvalidTitle,
            todo_core::Error::TaskNotFound(id) => Self::NotFound(id),
            _ => Self::Storage,
        }
    }
}
