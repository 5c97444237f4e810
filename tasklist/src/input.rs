//! The new-task text box.

use crate::environment::TaskEnvironment;
use serde::{Deserialize, Serialize};
use tasklist_core::{Effect, Reducer, SmallVec, smallvec};

/// Text typed into the new-task box
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    /// Current text
    pub draft: String,
}

/// Gestures on the new-task box
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputAction {
    /// Text changed
    DraftChanged(String),
    /// Return pressed
    Submitted,
    /// Outgoing request to add a task, not handled by the input itself
    AddTask {
        /// Title exactly as typed
        title: String,
    },
}

/// Reducer for the new-task box
#[derive(Clone, Debug, Default)]
pub struct InputReducer;

impl InputReducer {
    /// Creates a new `InputReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for InputReducer {
    type State = InputState;
    type Action = InputAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            InputAction::DraftChanged(text) => {
                state.draft = text;
                SmallVec::new()
            },
            InputAction::Submitted => {
                if state.draft.trim().is_empty() {
                    tracing::debug!("Ignoring blank submission");
                    return SmallVec::new();
                }
                let title = std::mem::take(&mut state.draft);
                smallvec![Effect::Send(InputAction::AddTask { title })]
            },
            InputAction::AddTask { .. } => SmallVec::new(),
        }
    }
}
