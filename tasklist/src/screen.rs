//! The to-do screen: header, input box, list and rows wired together.
//!
//! The screen reducer is the combination of the list, rows and input
//! reducers, each scoped to its own slice of [`ScreenState`]. Outgoing
//! requests from rows and the input box are routed to the list as feedback
//! actions, so the Store applies them within the same `send`.

use crate::environment::TaskEnvironment;
use crate::input::{InputAction, InputReducer, InputState};
use crate::list::{Alert, TaskListAction, TaskListReducer, TaskListState};
use crate::row::{RowAction, RowDelegate, RowsReducer, RowsState};
use crate::task::{Task, TaskCollection};
use serde::{Deserialize, Serialize};
use tasklist_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use tasklist_core::{Effect, Reducer, SmallVec};
use tasklist_runtime::Store;

/// Store running the to-do screen
pub type ScreenStore = Store<ScreenState, ScreenAction, TaskEnvironment, ScreenReducer>;

/// Everything the screen renders
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenState {
    /// Authoritative task list and its alert
    pub list: TaskListState,
    /// Per-row edit modes
    pub rows: RowsState,
    /// New-task text box
    pub input: InputState,
}

impl ScreenState {
    /// Creates an empty screen
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current task snapshot, in insertion order
    #[must_use]
    pub fn tasks(&self) -> &TaskCollection {
        &self.list.tasks
    }

    /// Number of tasks, shown in the header
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.list.tasks.len()
    }

    /// Number of tasks marked done
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.list.tasks.done_count()
    }

    /// Alert currently blocking the screen
    #[must_use]
    pub const fn alert(&self) -> Option<&Alert> {
        self.list.alert.as_ref()
    }

    /// Task shown at 1-based row `position`
    #[must_use]
    pub fn task_at_row(&self, position: usize) -> Option<&Task> {
        position.checked_sub(1).and_then(|index| self.list.tasks.at(index))
    }
}

/// Actions accepted by the screen
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenAction {
    /// Task list action
    List(TaskListAction),
    /// Row gesture
    Row(RowAction),
    /// Input box gesture
    Input(InputAction),
}

/// Reducer for the whole screen
pub struct ScreenReducer {
    children: CombinedReducer<ScreenState, ScreenAction, TaskEnvironment>,
}

impl ScreenReducer {
    /// Creates the screen reducer from its child reducers
    #[must_use]
    pub fn new() -> Self {
        let list = scope_reducer(
            TaskListReducer::new(),
            |s: &mut ScreenState| &mut s.list,
            |a: ScreenAction| match a {
                ScreenAction::List(action) => Some(action),
                _ => None,
            },
            ScreenAction::List,
        );
        let rows = scope_reducer(
            RowsReducer::new(),
            |s: &mut ScreenState| &mut s.rows,
            |a: ScreenAction| match a {
                ScreenAction::Row(action) => Some(action),
                _ => None,
            },
            ScreenAction::Row,
        );
        let input = scope_reducer(
            InputReducer::new(),
            |s: &mut ScreenState| &mut s.input,
            |a: ScreenAction| match a {
                ScreenAction::Input(action) => Some(action),
                _ => None,
            },
            ScreenAction::Input,
        );

        Self {
            children: combine_reducers(vec![Box::new(list), Box::new(rows), Box::new(input)]),
        }
    }

    /// List action an outgoing child request turns into
    fn route(action: &ScreenAction) -> Option<TaskListAction> {
        match action {
            ScreenAction::Row(RowAction::Delegate(delegate)) => Some(match delegate {
                RowDelegate::ToggleDone { id } => TaskListAction::ToggleDone { id: *id },
                RowDelegate::EditTitle { id, title } => TaskListAction::EditTitle {
                    id: *id,
                    title: title.clone(),
                },
                RowDelegate::RemoveRequested { id } => TaskListAction::RemoveRequested { id: *id },
            }),
            ScreenAction::Input(InputAction::AddTask { title }) => Some(TaskListAction::AddTask {
                title: title.clone(),
            }),
            _ => None,
        }
    }
}

impl Default for ScreenReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for ScreenReducer {
    type State = ScreenState;
    type Action = ScreenAction;
    type Environment = TaskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        // Alerts are modal for the whole screen; the list decides what an
        // answer does.
        if state.list.alert.is_some() && !matches!(action, ScreenAction::List(_)) {
            tracing::debug!(?action, "Ignoring gesture while an alert is showing");
            return SmallVec::new();
        }

        let routed = Self::route(&action);
        let mut effects = self.children.reduce(state, action, env);
        if let Some(list_action) = routed {
            effects.push(Effect::Send(ScreenAction::List(list_action)));
        }

        let tasks = &state.list.tasks;
        state.rows.retain(|id| tasks.contains(id));

        effects
    }
}

/// Creates a store for an empty screen
#[must_use]
pub fn screen_store(environment: TaskEnvironment) -> ScreenStore {
    Store::new(ScreenState::new(), ScreenReducer::new(), environment)
}
