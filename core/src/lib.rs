//! # Tasklist Core
//!
//! Core traits and types for the tasklist reducer architecture.
//!
//! Every feature in the workspace is written as a pure state machine:
//!
//! - **State**: owned, `Clone`-able data for one feature
//! - **Action**: every input a feature reacts to (user gestures, feedback)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of follow-up work, never the work itself
//! - **Environment**: injected dependencies (clock, id generation)
//!
//! The runtime crate owns state behind a `Store` and feeds the actions
//! described by effects back into the reducer.
//!
//! ## Example
//!
//! ```
//! use tasklist_core::{Effect, Reducer, SmallVec, smallvec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum CounterAction {
//!     Increment,
//!     IncrementTwice,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => {
//!                 state.count += 1;
//!                 SmallVec::new()
//!             }
//!             CounterAction::IncrementTwice => smallvec![Effect::chain(vec![
//!                 Effect::Send(CounterAction::Increment),
//!                 Effect::Send(CounterAction::Increment),
//!             ])],
//!         }
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::IncrementTwice, &());
//! assert_eq!(state.count, 0);
//! assert_eq!(effects.len(), 1);
//! ```

pub use smallvec::{SmallVec, smallvec};

pub use effect::Effect;
pub use reducer::Reducer;

/// Reducer composition (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Reducer module - the core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They hold all business rules and are deterministic given the environment.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Implementations:
        /// 1. Decide whether the action applies to the current state
        /// 2. Update state in place
        /// 3. Return descriptions of follow-up work
        ///
        /// Most reducers return no effects, so the common case stays on the
        /// stack.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values returned from reducers and interpreted by the Store.
/// The only side effect this workspace needs is feeding another action back
/// into the reducer, so the vocabulary is small.
pub mod effect {
    /// Effect type - describes follow-up work for the runtime
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Dispatch an action back into the same store
        ///
        /// The Store processes it before `send` returns, under the same
        /// state lock as the action that produced it.
        Send(Action),

        /// Run effects in order
        Sequential(Vec<Effect<Action>>),
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Returns true if this effect does nothing when executed
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Send(_) => false,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
            }
        }

        /// Lift the effect into a parent action type
        ///
        /// Used when a child reducer is scoped into a parent feature: the
        /// child's feedback actions are wrapped into the parent's enum.
        #[must_use]
        pub fn map<B, F>(self, f: &F) -> Effect<B>
        where
            F: Fn(Action) -> B,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Send(action) => Effect::Send(f(action)),
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map(f)).collect())
                },
            }
        }

        /// Flatten into the actions this effect dispatches, in order
        #[must_use]
        pub fn into_actions(self) -> Vec<Action> {
            match self {
                Effect::None => Vec::new(),
                Effect::Send(action) => vec![action],
                Effect::Sequential(effects) => {
                    effects.into_iter().flat_map(Effect::into_actions).collect()
                },
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// Anything non-deterministic a reducer needs (time, fresh identifiers) is
/// abstracted behind a trait and injected through the Environment, so tests
/// can substitute fixed implementations.
pub mod environment {
    use chrono::{DateTime, Utc};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock backed by [`Utc::now`]
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of fresh numeric identifiers
    ///
    /// Implementations must never hand out the same value twice.
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier
        fn next_id(&self) -> u64;
    }

    /// Time-seeded, strictly increasing identifier generator
    ///
    /// Ids track the clock in milliseconds, so they read like creation
    /// timestamps, but two calls within the same millisecond (or a clock
    /// that moves backwards) still yield distinct, increasing values.
    pub struct MonotonicIdGenerator {
        clock: Arc<dyn Clock>,
        last: AtomicU64,
    }

    impl MonotonicIdGenerator {
        /// Creates a generator reading time from `clock`
        #[must_use]
        pub fn new(clock: Arc<dyn Clock>) -> Self {
            Self {
                clock,
                last: AtomicU64::new(0),
            }
        }
    }

    impl std::fmt::Debug for MonotonicIdGenerator {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MonotonicIdGenerator")
                .field("last", &self.last.load(Ordering::Relaxed))
                .finish_non_exhaustive()
        }
    }

    impl IdGenerator for MonotonicIdGenerator {
        fn next_id(&self) -> u64 {
            // Pre-epoch clocks collapse to 0 and fall back to the counter.
            let now = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
            let mut last = self.last.load(Ordering::Acquire);
            loop {
                let candidate = now.max(last.saturating_add(1));
                match self.last.compare_exchange_weak(
                    last,
                    candidate,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                ) {
                    Ok(_) => return candidate,
                    Err(actual) => last = actual,
                }
            }
        }
    }
}
