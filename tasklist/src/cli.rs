//! Line-oriented terminal front end for the to-do screen.
//!
//! Each input line becomes one or more gestures sent to the [`ScreenStore`].
//! While an alert is showing the next line answers it, and while a row is
//! editing the next line is its draft.

use crate::input::InputAction;
use crate::list::{Alert, AlertAnswer, TaskListAction};
use crate::row::{RowAction, RowMode};
use crate::screen::{ScreenAction, ScreenState, ScreenStore};
use crate::task::TaskId;
use std::fmt::Write as _;
use tasklist_runtime::StoreError;
use thiserror::Error;

/// Usage text printed by `help`
pub const USAGE: &str = "\
Commands:
  add <title>   add a task
  toggle <n>    mark task n done / not done
  edit <n>      edit the title of task n (next line is the new title, empty line cancels,
                so an empty title cannot be set from here)
  rm <n>        remove task n (asks for confirmation)
  list          show the tasks
  help          show this help
  quit          exit";

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a task with this title
    Add(String),
    /// Toggle the task at this 1-based row
    Toggle(usize),
    /// Start editing the task at this 1-based row
    Edit(usize),
    /// Ask to remove the task at this 1-based row
    Remove(usize),
    /// Render the screen
    List,
    /// Print usage
    Help,
    /// Exit
    Quit,
}

/// Reasons a command line could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Nothing was typed
    #[error("Type a command, or `help` for the list of commands")]
    Empty,

    /// The first word is not a command
    #[error("Unknown command `{0}`, type `help` for the list of commands")]
    Unknown(String),

    /// The command needs an argument
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// Command that was typed
        command: &'static str,
        /// What was expected
        argument: &'static str,
    },

    /// A row number was not a positive integer
    #[error("`{0}` is not a row number")]
    InvalidRow(String),
}

/// Parses one command line
///
/// The title of `add` is everything after the first space, kept as typed.
///
/// # Errors
///
/// Returns a [`CommandError`] describing why the line is not a command.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = line
        .trim_start()
        .split_once(' ')
        .unwrap_or((line.trim_start(), ""));

    match word {
        "" => Err(CommandError::Empty),
        "add" => {
            if rest.trim().is_empty() {
                Err(CommandError::MissingArgument {
                    command: "add",
                    argument: "a title",
                })
            } else {
                Ok(Command::Add(rest.to_string()))
            }
        },
        "toggle" => parse_row("toggle", rest).map(Command::Toggle),
        "edit" => parse_row("edit", rest).map(Command::Edit),
        "rm" => parse_row("rm", rest).map(Command::Remove),
        "list" | "ls" => Ok(Command::List),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_row(command: &'static str, rest: &str) -> Result<usize, CommandError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "a row number",
        });
    }
    match rest.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(CommandError::InvalidRow(rest.to_string())),
    }
}

/// What the caller should do after a line was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print the screen
    Render,
    /// Print this message
    Message(String),
    /// Exit the loop
    Quit,
}

/// One interactive session over a screen store
#[derive(Clone)]
pub struct Session {
    store: ScreenStore,
    header_title: String,
    editing: Option<TaskId>,
}

impl Session {
    /// Creates a session rendering `header_title` above the list
    #[must_use]
    pub fn new(store: ScreenStore, header_title: impl Into<String>) -> Self {
        Self {
            store,
            header_title: header_title.into(),
            editing: None,
        }
    }

    /// The store this session drives
    #[must_use]
    pub const fn store(&self) -> &ScreenStore {
        &self.store
    }

    /// Handles one input line
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if a gesture could not be applied.
    pub async fn handle_line(&mut self, line: &str) -> Result<Reply, StoreError> {
        let line = line.trim_end_matches(['\r', '\n']);

        if self.store.state(|s| s.alert().is_some()).await {
            let answer = match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => AlertAnswer::Confirm,
                _ => AlertAnswer::Cancel,
            };
            self.send(ScreenAction::List(TaskListAction::AlertAnswered(answer)))
                .await?;
            return Ok(Reply::Render);
        }

        if let Some(id) = self.editing.take() {
            if line.is_empty() {
                self.send(ScreenAction::Row(RowAction::CancelEditing { id }))
                    .await?;
            } else {
                self.send(ScreenAction::Row(RowAction::DraftChanged {
                    id,
                    text: line.to_string(),
                }))
                .await?;
                self.send(ScreenAction::Row(RowAction::SubmitEditing { id }))
                    .await?;
            }
            return Ok(Reply::Render);
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(error) => return Ok(Reply::Message(error.to_string())),
        };
        tracing::debug!(?command, "Handling command");

        match command {
            Command::Add(title) => {
                self.send(ScreenAction::Input(InputAction::DraftChanged(title)))
                    .await?;
                self.send(ScreenAction::Input(InputAction::Submitted)).await?;
                Ok(Reply::Render)
            },
            Command::Toggle(row) => {
                let Some((id, _)) = self.row(row).await else {
                    return Ok(no_such_row(row));
                };
                self.send(ScreenAction::Row(RowAction::Tapped { id })).await?;
                Ok(Reply::Render)
            },
            Command::Edit(row) => {
                let Some((id, title)) = self.row(row).await else {
                    return Ok(no_such_row(row));
                };
                self.send(ScreenAction::Row(RowAction::StartEditing {
                    id,
                    title: title.clone(),
                }))
                .await?;
                self.editing = Some(id);
                Ok(Reply::Message(format!(
                    "Editing {title:?}. Type the new title, or an empty line to cancel."
                )))
            },
            Command::Remove(row) => {
                let Some((id, _)) = self.row(row).await else {
                    return Ok(no_such_row(row));
                };
                self.send(ScreenAction::Row(RowAction::DeleteTapped { id }))
                    .await?;
                Ok(Reply::Render)
            },
            Command::List => Ok(Reply::Render),
            Command::Help => Ok(Reply::Message(USAGE.to_string())),
            Command::Quit => Ok(Reply::Quit),
        }
    }

    /// Current screen as text
    pub async fn render(&self) -> String {
        self.store.state(|s| render(&self.header_title, s)).await
    }

    /// Prompt for the next line
    pub async fn prompt(&self) -> &'static str {
        if self.editing.is_some() {
            return "new title> ";
        }
        match self.store.state(|s| s.alert().cloned()).await {
            Some(Alert::ConfirmRemoval { .. }) => "[y/N]> ",
            Some(Alert::DuplicateTitle { .. }) => "[enter]> ",
            None => "> ",
        }
    }

    async fn send(&self, action: ScreenAction) -> Result<usize, StoreError> {
        self.store.send(action).await
    }

    async fn row(&self, row: usize) -> Option<(TaskId, String)> {
        self.store
            .state(|s| s.task_at_row(row).map(|t| (t.id, t.title.clone())))
            .await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("header_title", &self.header_title)
            .field("editing", &self.editing)
            .finish_non_exhaustive()
    }
}

fn no_such_row(row: usize) -> Reply {
    Reply::Message(format!("There is no task at row {row}"))
}

/// Renders the screen: header, counter, rows and any alert
#[must_use]
pub fn render(header_title: &str, state: &ScreenState) -> String {
    let mut out = String::new();
    let count = state.task_count();
    let noun = if count == 1 { "task" } else { "tasks" };

    let _ = writeln!(out, "{header_title}");
    let _ = writeln!(out, "You have {count} {noun}");

    for (index, task) in state.tasks().iter().enumerate() {
        let marker = if task.done { 'x' } else { ' ' };
        let _ = write!(out, "  {}. [{marker}] {}", index + 1, task.title);
        if let RowMode::Editing { draft } = state.rows.mode(task.id) {
            let _ = write!(out, " (editing: {draft:?})");
        }
        out.push('\n');
    }

    match state.alert() {
        Some(Alert::DuplicateTitle { .. }) => {
            out.push_str("\nTask already registered\n");
            out.push_str("You cannot register a task with the same name\n");
        },
        Some(Alert::ConfirmRemoval { .. }) => {
            out.push_str("\nRemove item\n");
            match state.list.pending_removal() {
                Some(task) => {
                    let _ = writeln!(out, "Are you sure you want to remove {:?}?", task.title);
                },
                None => out.push_str("Are you sure you want to remove this item?\n"),
            }
        },
        None => {},
    }

    out
}
