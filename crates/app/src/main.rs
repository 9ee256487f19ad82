//! Todo Desk
//!
//! Entry point: loads configuration, opens the task store and hands control
//! to the command shell on stdin/stdout. Logs go to stderr.

mod app;
mod error;
mod shell;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use todo_core::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_app=info,todo_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        backend = ?config.backend,
        data_dir = %config.data_dir.display(),
        "Starting Todo Desk"
    );

    let app = App::from_config(&config)
        .await
        .context("Failed to initialize task storage")?;

    let lines = shell::spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = shell::run(&app, lines, stdout) => result.context("Shell I/O failed")?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted, shutting down"),
    }

    Ok(())
}
