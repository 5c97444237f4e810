//! Per-row presentation state.
//!
//! A row is either showing its task or editing a draft title. The draft
//! lives here, never in the task collection: cancelling simply forgets it.
//! Gestures that change the list leave the row as [`RowAction::Delegate`]
//! actions for the screen to route.

use crate::environment::TaskEnvironment;
use crate::task::TaskId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tasklist_core::{Effect, Reducer, SmallVec, smallvec};

/// Edit mode of one row
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowMode {
    /// Showing the task's title
    #[default]
    Viewing,
    /// Showing an editable draft
    Editing {
        /// Text typed so far
        draft: String,
    },
}

/// Edit modes of all rows; rows not present are [`RowMode::Viewing`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowsState {
    modes: HashMap<TaskId, RowMode>,
}

impl RowsState {
    /// Mode of the row for `id`
    #[must_use]
    pub fn mode(&self, id: TaskId) -> &RowMode {
        static VIEWING: RowMode = RowMode::Viewing;
        self.modes.get(&id).unwrap_or(&VIEWING)
    }

    /// Draft of the row for `id`, if it is editing
    #[must_use]
    pub fn draft(&self, id: TaskId) -> Option<&str> {
        match self.mode(id) {
            RowMode::Editing { draft } => Some(draft.as_str()),
            RowMode::Viewing => None,
        }
    }

    /// Returns true if the row for `id` is editing
    #[must_use]
    pub fn is_editing(&self, id: TaskId) -> bool {
        self.draft(id).is_some()
    }

    /// Number of rows currently editing
    #[must_use]
    pub fn editing_count(&self) -> usize {
        self.modes.len()
    }

    /// Forget rows whose task no longer exists
    pub fn retain(&mut self, mut keep: impl FnMut(TaskId) -> bool) {
        self.modes.retain(|id, _| keep(*id));
    }
}

/// List changes a row asks for
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowDelegate {
    /// Row was tapped
    ToggleDone {
        /// Row's task
        id: TaskId,
    },
    /// Edit was submitted
    EditTitle {
        /// Row's task
        id: TaskId,
        /// Submitted draft
        title: String,
    },
    /// Trash button was tapped
    RemoveRequested {
        /// Row's task
        id: TaskId,
    },
}

/// Gestures on a row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowAction {
    /// Row body tapped (toggles done, in either mode)
    Tapped {
        /// Row's task
        id: TaskId,
    },
    /// Pen button tapped
    StartEditing {
        /// Row's task
        id: TaskId,
        /// Title the draft starts from
        title: String,
    },
    /// Text typed into the editing row
    DraftChanged {
        /// Row's task
        id: TaskId,
        /// Full draft text
        text: String,
    },
    /// Cancel button tapped
    CancelEditing {
        /// Row's task
        id: TaskId,
    },
    /// Return pressed in the editing row
    SubmitEditing {
        /// Row's task
        id: TaskId,
    },
    /// Trash button tapped (disabled while editing)
    DeleteTapped {
        /// Row's task
        id: TaskId,
    },
    /// Outgoing request for the list, not handled by the row itself
    Delegate(RowDelegate),
}

/// Reducer for row edit modes
#[derive(Clone, Debug, Default)]
pub struct RowsReducer;

impl RowsReducer {
    /// Creates a new `RowsReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn delegate(delegate: RowDelegate) -> SmallVec<[Effect<RowAction>; 4]> {
        smallvec![Effect::Send(RowAction::Delegate(delegate))]
    }
}

impl Reducer for RowsReducer {
    type State = RowsState;
    type Action = RowAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            RowAction::Tapped { id } => Self::delegate(RowDelegate::ToggleDone { id }),
            RowAction::StartEditing { id, title } => {
                if state.is_editing(id) {
                    tracing::debug!(%id, "Row is already editing");
                } else {
                    state.modes.insert(id, RowMode::Editing { draft: title });
                }
                SmallVec::new()
            },
            RowAction::DraftChanged { id, text } => {
                match state.modes.get_mut(&id) {
                    Some(RowMode::Editing { draft }) => *draft = text,
                    _ => tracing::debug!(%id, "Draft change on a row that is not editing"),
                }
                SmallVec::new()
            },
            RowAction::CancelEditing { id } => {
                state.modes.remove(&id);
                SmallVec::new()
            },
            RowAction::SubmitEditing { id } => match state.modes.remove(&id) {
                Some(RowMode::Editing { draft }) => {
                    Self::delegate(RowDelegate::EditTitle { id, title: draft })
                },
                _ => {
                    tracing::debug!(%id, "Submit on a row that is not editing");
                    SmallVec::new()
                },
            },
            RowAction::DeleteTapped { id } => {
                if state.is_editing(id) {
                    tracing::debug!(%id, "Delete ignored while editing");
                    SmallVec::new()
                } else {
                    Self::delegate(RowDelegate::RemoveRequested { id })
                }
            },
            RowAction::Delegate(_) => SmallVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tasklist_testing::{ReducerTest, SequentialIds, assertions};

    const ID: TaskId = TaskId::new(1);

    fn create_test_env() -> TaskEnvironment {
        TaskEnvironment::new(Arc::new(SequentialIds::new()))
    }

    fn start_editing() -> RowAction {
        RowAction::StartEditing {
            id: ID,
            title: "Buy milk".into(),
        }
    }

    #[test]
    fn test_start_editing_seeds_draft_with_title() {
        ReducerTest::new(RowsReducer::new())
            .with_env(create_test_env())
            .given_state(RowsState::default())
            .when_action(start_editing())
            .then_state(|state| {
                assert_eq!(state.draft(ID), Some("Buy milk"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_submit_emits_edit_with_draft() {
        ReducerTest::new(RowsReducer::new())
            .with_env(create_test_env())
            .given_state(RowsState::default())
            .when_action(start_editing())
            .when_action(RowAction::DraftChanged {
                id: ID,
                text: "Buy bread".into(),
            })
            .when_action(RowAction::SubmitEditing { id: ID })
            .then_state(|state| {
                assert_eq!(state.mode(ID), &RowMode::Viewing);
            })
            .then_sent(|sent| {
                assert_eq!(
                    sent,
                    [RowAction::Delegate(RowDelegate::EditTitle {
                        id: ID,
                        title: "Buy bread".into(),
                    })]
                );
            })
            .run();
    }

    #[test]
    fn test_cancel_discards_draft() {
        ReducerTest::new(RowsReducer::new())
            .with_env(create_test_env())
            .given_state(RowsState::default())
            .when_action(start_editing())
            .when_action(RowAction::DraftChanged {
                id: ID,
                text: "Something else".into(),
            })
            .when_action(RowAction::CancelEditing { id: ID })
            .then_state(|state| {
                assert!(!state.is_editing(ID));
                assert_eq!(state.editing_count(), 0);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_editing_again_after_cancel_starts_from_title() {
        ReducerTest::new(RowsReducer::new())
            .with_env(create_test_env())
            .given_state(RowsState::default())
            .when_action(start_editing())
            .when_action(RowAction::DraftChanged {
                id: ID,
                text: "Draft".into(),
            })
            .when_action(RowAction::CancelEditing { id: ID })
            .when_action(start_editing())
            .then_state(|state| {
                assert_eq!(state.draft(ID), Some("Buy milk"));
            })
            .run();
    }

    #[test]
    fn test_delete_ignored_while_editing() {
        ReducerTest::new(RowsReducer::new())
            .with_env(create_test_env())
            .given_state(RowsState::default())
            .when_action(start_editing())
            .when_action(RowAction::DeleteTapped { id: ID })
            .then_state(|state| assert!(state.is_editing(ID)))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_delete_while_viewing_requests_removal() {
        ReducerTest::new(RowsReducer::new())
            .with_env(create_test_env())
            .given_state(RowsState::default())
            .when_action(RowAction::DeleteTapped { id: ID })
            .then_sent(|sent| {
                assert_eq!(sent, [RowAction::Delegate(RowDelegate::RemoveRequested { id: ID })]);
            })
            .run();
    }

    #[test]
    fn test_tap_toggles_even_while_editing() {
        ReducerTest::new(RowsReducer::new())
            .with_env(create_test_env())
            .given_state(RowsState::default())
            .when_action(start_editing())
            .when_action(RowAction::Tapped { id: ID })
            .then_state(|state| assert!(state.is_editing(ID)))
            .then_sent(|sent| {
                assert_eq!(sent, [RowAction::Delegate(RowDelegate::ToggleDone { id: ID })]);
            })
            .run();
    }

    #[test]
    fn test_draft_and_submit_ignored_while_viewing() {
        ReducerTest::new(RowsReducer::new())
            .with_env(create_test_env())
            .given_state(RowsState::default())
            .when_action(RowAction::DraftChanged {
                id: ID,
                text: "Stray".into(),
            })
            .when_action(RowAction::SubmitEditing { id: ID })
            .then_state(|state| assert_eq!(state, &RowsState::default()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_retain_drops_rows() {
        let mut state = RowsState::default();
        let _ = RowsReducer::new().reduce(&mut state, start_editing(), &create_test_env());

        state.retain(|id| id != ID);

        assert!(!state.is_editing(ID));
    }
}
