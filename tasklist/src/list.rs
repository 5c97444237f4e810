//! The task list: authoritative collection plus the modal alert guarding it.
//!
//! Every mutation replaces `TaskListState::tasks` with a fresh collection.
//! While an alert is showing the list is frozen: only an answer to the alert
//! is processed.

use crate::environment::TaskEnvironment;
use crate::error::TaskError;
use crate::task::{Task, TaskCollection, TaskId};
use serde::{Deserialize, Serialize};
use tasklist_core::{Effect, Reducer, SmallVec};

/// A modal dialog raised by the list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alert {
    /// Informational: an add was rejected because the title is taken
    DuplicateTitle {
        /// The rejected title
        title: String,
    },
    /// Yes/no: the user asked to delete a task
    ConfirmRemoval {
        /// Task that will be removed on confirmation
        id: TaskId,
    },
}

/// The user's answer to an [`Alert`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertAnswer {
    /// Dismiss without acting
    #[default]
    Cancel,
    /// Go ahead
    Confirm,
}

/// State of the task list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListState {
    /// All tasks in insertion order
    pub tasks: TaskCollection,
    /// Alert currently blocking the list, if any
    pub alert: Option<Alert>,
}

impl TaskListState {
    /// Creates an empty list
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tasks: TaskCollection::new(),
            alert: None,
        }
    }

    /// Starts from an existing collection
    #[must_use]
    pub const fn with_tasks(tasks: TaskCollection) -> Self {
        Self { tasks, alert: None }
    }

    /// Task the pending removal alert refers to
    #[must_use]
    pub fn pending_removal(&self) -> Option<&Task> {
        match &self.alert {
            Some(Alert::ConfirmRemoval { id }) => self.tasks.get(*id),
            _ => None,
        }
    }
}

/// Actions accepted by the task list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskListAction {
    /// Append a task with this title
    AddTask {
        /// Title as typed
        title: String,
    },
    /// Flip a task's done flag
    ToggleDone {
        /// Target task
        id: TaskId,
    },
    /// Replace a task's title
    EditTitle {
        /// Target task
        id: TaskId,
        /// New title, not validated
        title: String,
    },
    /// Ask for confirmation before removing a task
    RemoveRequested {
        /// Target task
        id: TaskId,
    },
    /// The user answered the current alert
    AlertAnswered(AlertAnswer),
}

/// Reducer for the task list
#[derive(Clone, Debug, Default)]
pub struct TaskListReducer;

impl TaskListReducer {
    /// Creates a new `TaskListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn answer(state: &mut TaskListState, answer: AlertAnswer) {
        let Some(alert) = state.alert.take() else {
            tracing::debug!(?answer, "Ignoring answer, no alert is showing");
            return;
        };

        match (alert, answer) {
            (Alert::ConfirmRemoval { id }, AlertAnswer::Confirm) => {
                state.tasks = state.tasks.remove(id);
                tracing::info!(%id, "Task removed");
            },
            (Alert::ConfirmRemoval { id }, AlertAnswer::Cancel) => {
                tracing::debug!(%id, "Removal cancelled");
            },
            (Alert::DuplicateTitle { .. }, _) => {},
        }
    }
}

impl Reducer for TaskListReducer {
    type State = TaskListState;
    type Action = TaskListAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if let TaskListAction::AlertAnswered(answer) = action {
            Self::answer(state, answer);
            return SmallVec::new();
        }

        if let Some(alert) = &state.alert {
            tracing::debug!(?alert, ?action, "Ignoring action while an alert is showing");
            return SmallVec::new();
        }

        match action {
            TaskListAction::AddTask { title } => {
                match state.tasks.add(title, || env.next_task_id()) {
                    Ok(tasks) => {
                        state.tasks = tasks;
                        tracing::info!(count = state.tasks.len(), "Task added");
                    },
                    Err(TaskError::DuplicateTitle { title }) => {
                        tracing::info!(%title, "Rejected duplicate title");
                        state.alert = Some(Alert::DuplicateTitle { title });
                    },
                }
            },
            TaskListAction::ToggleDone { id } => {
                if !state.tasks.contains(id) {
                    tracing::debug!(%id, "Toggle for unknown task");
                }
                state.tasks = state.tasks.toggle_done(id);
            },
            TaskListAction::EditTitle { id, title } => {
                if !state.tasks.contains(id) {
                    tracing::debug!(%id, "Edit for unknown task");
                }
                state.tasks = state.tasks.edit_title(id, title);
            },
            TaskListAction::RemoveRequested { id } => {
                if state.tasks.contains(id) {
                    state.alert = Some(Alert::ConfirmRemoval { id });
                } else {
                    tracing::debug!(%id, "Removal requested for unknown task");
                }
            },
            TaskListAction::AlertAnswered(_) => {},
        }

        SmallVec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test fixtures are known-good
mod tests {
    use super::*;
    use std::sync::Arc;
    use tasklist_testing::{ReducerTest, SequentialIds, assertions};

    fn create_test_env() -> TaskEnvironment {
        TaskEnvironment::new(Arc::new(SequentialIds::new()))
    }

    fn one_task(done: bool) -> TaskListState {
        let tasks = TaskCollection::new()
            .add("Buy milk", || TaskId::new(1))
            .unwrap();
        let tasks = if done { tasks.toggle_done(TaskId::new(1)) } else { tasks };
        TaskListState::with_tasks(tasks)
    }

    #[test]
    fn test_add_task_success() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(create_test_env())
            .given_state(TaskListState::new())
            .when_action(TaskListAction::AddTask {
                title: "Buy milk".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.tasks.as_slice(), [Task::new(TaskId::new(1), "Buy milk")]);
                assert_eq!(state.alert, None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_add_duplicate_raises_alert() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(create_test_env())
            .given_state(one_task(false))
            .when_action(TaskListAction::AddTask {
                title: "Buy milk".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.tasks, one_task(false).tasks);
                assert_eq!(
                    state.alert,
                    Some(Alert::DuplicateTitle {
                        title: "Buy milk".into()
                    })
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_duplicate_alert_is_dismissed_by_any_answer() {
        for answer in [AlertAnswer::Cancel, AlertAnswer::Confirm] {
            ReducerTest::new(TaskListReducer::new())
                .with_env(create_test_env())
                .given_state(one_task(false))
                .when_action(TaskListAction::AddTask {
                    title: "Buy milk".to_string(),
                })
                .when_action(TaskListAction::AlertAnswered(answer))
                .then_state(|state| {
                    assert_eq!(state.alert, None);
                    assert_eq!(state.tasks.len(), 1);
                })
                .run();
        }
    }

    #[test]
    fn test_toggle_done() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(create_test_env())
            .given_state(one_task(false))
            .when_action(TaskListAction::ToggleDone { id: TaskId::new(1) })
            .then_state(|state| {
                assert_eq!(state, &one_task(true));
            })
            .run();
    }

    #[test]
    fn test_edit_title() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(create_test_env())
            .given_state(one_task(false))
            .when_action(TaskListAction::EditTitle {
                id: TaskId::new(1),
                title: "Buy bread".into(),
            })
            .then_state(|state| {
                let task = state.tasks.get(TaskId::new(1)).unwrap();
                assert_eq!(task.title, "Buy bread");
                assert!(!task.done);
            })
            .run();
    }

    #[test]
    fn test_remove_requires_confirmation() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(create_test_env())
            .given_state(one_task(false))
            .when_action(TaskListAction::RemoveRequested { id: TaskId::new(1) })
            .then_state(|state| {
                assert_eq!(state.tasks.len(), 1);
                assert_eq!(state.alert, Some(Alert::ConfirmRemoval { id: TaskId::new(1) }));
                assert_eq!(state.pending_removal().map(|t| t.title.as_str()), Some("Buy milk"));
            })
            .run();
    }

    #[test]
    fn test_remove_confirmed() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(create_test_env())
            .given_state(one_task(false))
            .when_action(TaskListAction::RemoveRequested { id: TaskId::new(1) })
            .when_action(TaskListAction::AlertAnswered(AlertAnswer::Confirm))
            .then_state(|state| {
                assert!(state.tasks.is_empty());
                assert_eq!(state.alert, None);
            })
            .run();
    }

    #[test]
    fn test_remove_cancelled_by_default_answer() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(create_test_env())
            .given_state(one_task(false))
            .when_action(TaskListAction::RemoveRequested { id: TaskId::new(1) })
            .when_action(TaskListAction::AlertAnswered(AlertAnswer::default()))
            .then_state(|state| {
                assert_eq!(state, &one_task(false));
            })
            .run();
    }

    #[test]
    fn test_remove_unknown_id_raises_nothing() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(create_test_env())
            .given_state(one_task(false))
            .when_action(TaskListAction::RemoveRequested { id: TaskId::new(42) })
            .then_state(|state| {
                assert_eq!(state, &one_task(false));
            })
            .run();
    }

    #[test]
    fn test_list_is_frozen_while_alert_is_showing() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(create_test_env())
            .given_state(one_task(false))
            .when_action(TaskListAction::RemoveRequested { id: TaskId::new(1) })
            .when_action(TaskListAction::ToggleDone { id: TaskId::new(1) })
            .when_action(TaskListAction::AddTask {
                title: "Buy bread".into(),
            })
            .when_action(TaskListAction::EditTitle {
                id: TaskId::new(1),
                title: "Changed".into(),
            })
            .then_state(|state| {
                assert_eq!(state.tasks, one_task(false).tasks);
                assert_eq!(state.alert, Some(Alert::ConfirmRemoval { id: TaskId::new(1) }));
            })
            .run();
    }

    #[test]
    fn test_answer_without_alert_is_ignored() {
        ReducerTest::new(TaskListReducer::new())
            .with_env(create_test_env())
            .given_state(one_task(false))
            .when_action(TaskListAction::AlertAnswered(AlertAnswer::Confirm))
            .then_state(|state| {
                assert_eq!(state, &one_task(false));
            })
            .run();
    }

    #[test]
    fn test_rejected_add_consumes_no_id() {
        let ids = Arc::new(SequentialIds::new());
        let env = TaskEnvironment::new(ids.clone());

        ReducerTest::new(TaskListReducer::new())
            .with_env(env)
            .given_state(one_task(false))
            .when_action(TaskListAction::AddTask {
                title: "Buy milk".into(),
            })
            .run();

        assert_eq!(ids.peek(), 1);
    }
}
