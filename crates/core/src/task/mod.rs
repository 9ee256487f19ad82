//! Task module
//!
//! This module contains task-related types, storage backends and the
//! service that applies business rules on top of them.

mod file_store;
mod model;
mod repository;
mod service;
mod sql_store;

pub use file_store::FileTaskStore;
pub use model::*;
pub use repository::{SortOrder, TaskRepository};
pub use service::TaskService;
pub use sql_store::SqlTaskStore;
