//! Reducer composition utilities
//!
//! Features are built from smaller reducers:
//! - **`combine_reducers`**: run several reducers on the same state/action
//! - **`scope_reducer`**: embed a child reducer that owns a slice of the
//!   parent's state and a subset of the parent's actions
//!
//! # Example
//!
//! ```
//! use tasklist_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
//! use tasklist_core::{Effect, Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct Parent {
//!     clicks: u32,
//!     label: String,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum ParentAction {
//!     Clicks(u32),
//!     Label(String),
//! }
//!
//! struct AddClicks;
//!
//! impl Reducer for AddClicks {
//!     type State = u32;
//!     type Action = u32;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut u32, action: u32, _env: &()) -> SmallVec<[Effect<u32>; 4]> {
//!         *state += action;
//!         SmallVec::new()
//!     }
//! }
//!
//! let clicks = scope_reducer(
//!     AddClicks,
//!     |p: &mut Parent| &mut p.clicks,
//!     |a: ParentAction| match a {
//!         ParentAction::Clicks(n) => Some(n),
//!         ParentAction::Label(_) => None,
//!     },
//!     ParentAction::Clicks,
//! );
//! let parent: CombinedReducer<Parent, ParentAction, ()> = combine_reducers(vec![Box::new(clicks)]);
//!
//! let mut state = Parent::default();
//! let _ = parent.reduce(&mut state, ParentAction::Clicks(2), &());
//! let _ = parent.reduce(&mut state, ParentAction::Label("x".into()), &());
//! assert_eq!(state.clicks, 2);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::marker::PhantomData;

/// Boxed reducer over a fixed state/action/environment triple
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer runs in registration order on a clone of the action, and
/// all effects are concatenated in that order.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A reducer that runs multiple reducers in sequence
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// Number of reducers in the combination
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Returns true if no reducers are combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Embeds a child reducer into a parent feature.
///
/// - `state` borrows the child's slice of the parent state
/// - `extract` picks out actions meant for the child (others are skipped)
/// - `embed` wraps the child's feedback actions back into the parent type
///
/// The child never sees parent state or actions it does not own.
#[must_use]
pub fn scope_reducer<S, SubS, A, SubA, E, R>(
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
) -> ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        _phantom: PhantomData,
    }
}

/// A child reducer lifted into a parent's state and action types
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    reducer: R,
    state: fn(&mut S) -> &mut SubS,
    extract: fn(A) -> Option<SubA>,
    embed: fn(SubA) -> A,
    _phantom: PhantomData<fn() -> E>,
}

impl<S, SubS, A, SubA, E, R> Reducer for ScopedReducer<S, SubS, A, SubA, E, R>
where
    R: Reducer<State = SubS, Action = SubA, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(sub_action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        let effects = self.reducer.reduce((self.state)(state), sub_action, env);

        effects.into_iter().map(|e| e.map(&self.embed)).collect()
    }
}
