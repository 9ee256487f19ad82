//! Application configuration
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file in the working directory.

use std::path::PathBuf;
use std::str::FromStr;

use crate::{Error, Result};

const DEFAULT_DATA_DIR: &str = ".todo-data";

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Relational store (SQLite)
    Sqlite,
    /// In-memory list persisted to a JSONL file
    File,
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sql" | "db" => Ok(Self::Sqlite),
            "file" | "jsonl" | "memory" => Ok(Self::File),
            other => Err(Error::Config(format!("unknown backend: {other}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub tasks_file: PathBuf,
    /// Run schema migrations when the database is opened
    pub migrate: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            backend: Backend::Sqlite,
            database_path: data_dir.join("todo.db"),
            tasks_file: data_dir.join("tasks.jsonl"),
            data_dir,
            migrate: true,
        }
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let backend = match lookup("TODO_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.backend,
        };

        let data_dir = lookup("TODO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let database_path = lookup("TODO_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("todo.db"));

        let tasks_file = lookup("TODO_TASKS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("tasks.jsonl"));

        let migrate = flag(lookup("TODO_DB_MIGRATE"), defaults.migrate);

        Ok(Self {
            backend,
            data_dir,
            database_path,
            tasks_file,
            migrate,
        })
    }
}

fn flag(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}
