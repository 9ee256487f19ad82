//! Core library for the Todo Desk application
//!
//! This crate contains the core business logic, including:
//! - Task model and validation rules
//! - Swappable task storage (SQLite or newline-delimited JSON file)
//! - Configuration and database bootstrap

pub mod config;
pub mod database;
pub mod error;
pub mod task;

pub use config::{Backend, Config};
pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
