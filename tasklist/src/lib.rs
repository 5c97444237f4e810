//! A to-do list screen built on the tasklist reducer architecture.
//!
//! The screen is made of three features, each with its own reducer:
//!
//! - **List** ([`TaskListReducer`]): the authoritative [`TaskCollection`]
//!   plus the modal [`Alert`] guarding duplicate adds and removals
//! - **Rows** ([`RowsReducer`]): per-row view/edit mode and edit drafts
//! - **Input** ([`InputReducer`]): the new-task text box
//!
//! [`ScreenReducer`] scopes and combines them. Gestures on rows and the
//! input box reach the list as feedback actions, so every gesture is applied
//! atomically by a single `Store::send`.
//!
//! # Quick Start
//!
//! ```no_run
//! use tasklist::{InputAction, ScreenAction, TaskEnvironment, screen_store};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = screen_store(TaskEnvironment::live());
//!
//! store
//!     .send(ScreenAction::Input(InputAction::DraftChanged("Buy milk".into())))
//!     .await?;
//! store.send(ScreenAction::Input(InputAction::Submitted)).await?;
//!
//! let count = store.state(|s| s.task_count()).await;
//! println!("You have {count} task(s)");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod input;
pub mod list;
pub mod row;
pub mod screen;
pub mod task;

pub use config::Config;
pub use environment::TaskEnvironment;
pub use error::TaskError;
pub use input::{InputAction, InputReducer, InputState};
pub use list::{Alert, AlertAnswer, TaskListAction, TaskListReducer, TaskListState};
pub use row::{RowAction, RowDelegate, RowMode, RowsReducer, RowsState};
pub use screen::{ScreenAction, ScreenReducer, ScreenState, ScreenStore, screen_store};
pub use task::{Task, TaskCollection, TaskId};
