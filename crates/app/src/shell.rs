//! Line-oriented command shell
//!
//! Reads one command per line and writes human-readable results.

use std::io::BufRead;
use std::str::FromStr;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use todo_core::task::{Task, TaskId, TaskPriority};

use crate::app::App;
use crate::error::AppError;

const HELP: &str = "\
commands:
  list [newest]                    show tasks (creation order, or newest first)
  add [low|medium|high] <title>    add a task (priority defaults to medium)
  toggle <id> | done <id>          flip a task between active and done
  delete <id>                      delete a task
  help                             show this message
  quit                             exit
";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    List { newest_first: bool },
    Add { priority: TaskPriority, title: String },
    Toggle(TaskId),
    Delete(TaskId),
    Help,
    Quit,
}

fn parse_id(raw: Option<&str>) -> Result<TaskId, String> {
    let raw = raw.ok_or_else(|| "missing task id".to_string())?;
    raw.parse::<TaskId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| format!("invalid task id: {raw}"))
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => match rest {
                "" => Ok(Self::List {
                    newest_first: false,
                }),
                "newest" => Ok(Self::List { newest_first: true }),
                other => Err(format!("unknown list option: {other}")),
            },
            "add" => {
                let (first, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                match first.parse::<TaskPriority>() {
                    Ok(priority) if !tail.trim().is_empty() => Ok(Self::Add {
                        priority,
                        title: tail.trim().to_string(),
                    }),
                    _ => Ok(Self::Add {
                        priority: TaskPriority::default(),
                        title: rest.to_string(),
                    }),
                }
            }
            "toggle" | "done" => parse_id(rest.split_whitespace().next()).map(Self::Toggle),
            "delete" | "rm" => parse_id(rest.split_whitespace().next()).map(Self::Delete),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command: {other} (try `help`)")),
        }
    }
}

fn format_task(task: &Task) -> String {
    let mark = if task.is_done() { 'x' } else { ' ' };
    format!("{:>4} [{}] {} ({})", task.id, mark, task.title, task.priority)
}

async fn execute(app: &App, command: Command) -> String {
    match command {
        Command::List { newest_first } => {
            let tasks = app.get_tasks(newest_first).await;
            if tasks.is_empty() {
                return "no tasks\n".to_string();
            }
            tasks
                .iter()
                .map(|task| format_task(task) + "\n")
                .collect()
        }
        Command::Add { priority, title } => match app.add_task(&title, priority).await {
            Ok(task) => format!("added {}\n", format_task(&task)),
            Err(e) => format!("error: {e}\n"),
        },
        Command::Toggle(id) => {
            // The shell has no view state, so the current status is read back first
            let current = app
                .get_tasks(false)
                .await
                .into_iter()
                .find(|task| task.id == id);
            let result = match current {
                Some(task) => app.toggle_status(id, task.status).await,
                None => Err(AppError::NotFound(id)),
            };
            match result {
                Ok(task) => format!("{}\n", format_task(&task)),
                Err(e) => format!("error: {e}\n"),
            }
        }
        Command::Delete(id) => {
            if app.delete_task(id).await {
                format!("deleted {id}\n")
            } else {
                format!("error: {}\n", AppError::NotFound(id))
            }
        }
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    }
}

/// Read lines on a dedicated OS thread and forward them over a channel
///
/// A blocked read never ties up the runtime, so dropping the runtime (for
/// example after Ctrl-C) does not wait for the next line of input.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<std::io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in reader.lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

/// Run commands from `lines` until end of input or `quit`
pub async fn run<W>(
    app: &App,
    mut lines: mpsc::Receiver<std::io::Result<String>>,
    mut writer: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = lines.recv().await {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let output = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => execute(app, command).await,
            Err(msg) => format!("error: {msg}\n"),
        };
        writer.write_all(output.as_bytes()).await?;
        writer.flush().await?;
    }
    writer.flush().await
}
