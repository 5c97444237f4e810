//! # Tasklist Runtime
//!
//! Runtime implementation for the tasklist reducer architecture.
//!
//! This crate provides the Store that owns feature state, runs the reducer
//! for every action, and interprets the effects it returns.
//!
//! ## Core Components
//!
//! - **Store**: Owns state and serializes actions through the reducer
//! - **Feedback loop**: `Effect::Send` actions are reduced before `send` returns
//! - **Action broadcast**: Observers see every feedback action
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use tasklist_core::{Effect, Reducer};
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept producing feedback actions past the configured limit
        ///
        /// The state is rolled back to what it was before the originating
        /// `send`, so a runaway cascade never leaves a half-applied gesture.
        #[error("Effect feedback exceeded {limit} actions")]
        FeedbackLimitExceeded {
            /// Configured maximum number of feedback actions per `send`
            limit: usize,
        },
    }
}

pub use error::StoreError;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use tasklist_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_max_feedback_actions(16)
///     .with_broadcast_capacity(64);
/// assert_eq!(config.max_feedback_actions, 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Upper bound on actions produced by effects during a single `send`
    pub max_feedback_actions: usize,
    /// Action broadcast channel capacity (number of actions buffered per observer)
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_feedback_actions: usize, broadcast_capacity: usize) -> Self {
        Self {
            max_feedback_actions,
            broadcast_capacity,
        }
    }

    /// Set the feedback action limit
    #[must_use]
    pub const fn with_max_feedback_actions(mut self, limit: usize) -> Self {
        self.max_feedback_actions = limit;
        self
    }

    /// Set the action broadcast capacity
    ///
    /// Values below 1 are raised to 1 when the Store is built.
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_feedback_actions: 64,
            broadcast_capacity: 16,
        }
    }
}

/// The Store and its action pipeline
pub mod store {
    use super::{Arc, Effect, Reducer, RwLock, StoreConfig, StoreError, VecDeque};
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, replaced only by the reducer)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (feedback loop)
    ///
    /// Cloning a Store yields another handle to the same state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        config: StoreConfig,
        /// Every action produced by effects is broadcast to observers.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + std::fmt::Debug + 'static,
        S: Send + Sync + Clone + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                config,
                action_broadcast,
            }
        }

        /// The configuration this store was built with
        #[must_use]
        pub const fn config(&self) -> StoreConfig {
            self.config
        }

        /// Send an action to the store
        ///
        /// 1. Acquires the write lock on state
        /// 2. Calls the reducer with (state, action, environment)
        /// 3. Reduces every action described by the returned effects, in
        ///    order, until the cascade settles
        /// 4. Releases the lock
        ///
        /// Returns the number of feedback actions that were reduced.
        ///
        /// Concurrent `send` calls serialize on the lock, so readers only
        /// ever observe the state between two complete cascades.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackLimitExceeded`] if the cascade
        /// produces more than [`StoreConfig::max_feedback_actions`] actions.
        /// State is restored to its value before this call and nothing is
        /// broadcast.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<usize, StoreError> {
            tracing::debug!(?action, "Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let snapshot = (*state).clone();
            let mut queue = VecDeque::from([action]);
            let mut feedback = 0usize;
            let mut observed = Vec::new();

            while let Some(action) = queue.pop_front() {
                let effects = {
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();

                    let start = std::time::Instant::now();
                    let effects = self.reducer.reduce(&mut *state, action, &*self.environment);
                    metrics::histogram!("store.reducer.duration_seconds")
                        .record(start.elapsed().as_secs_f64());

                    tracing::trace!("Reducer completed, returned {} effects", effects.len());
                    effects
                };

                for next in effects.into_iter().flat_map(Effect::into_actions) {
                    feedback += 1;
                    if feedback > self.config.max_feedback_actions {
                        *state = snapshot;
                        tracing::error!(
                            limit = self.config.max_feedback_actions,
                            "Feedback limit exceeded, state rolled back"
                        );
                        metrics::counter!("store.feedback_limit.exceeded").increment(1);
                        return Err(StoreError::FeedbackLimitExceeded {
                            limit: self.config.max_feedback_actions,
                        });
                    }

                    tracing::trace!(action = ?next, "Queueing feedback action");
                    metrics::counter!("store.feedback_actions.total").increment(1);
                    observed.push(next.clone());
                    queue.push_back(next);
                }
            }

            // Observers only see cascades that were kept.
            for action in observed {
                // No observers is not an error.
                let _ = self.action_broadcast.send(action);
            }

            tracing::debug!(feedback, "Action processing completed");
            Ok(feedback)
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let count = store.state(|s| s.tasks.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Subscribe to all feedback actions from this store
        ///
        /// The action passed to `send` itself is not broadcast, only the
        /// actions its effects produce, once the whole cascade has been
        /// applied. A receiver that falls more than
        /// [`StoreConfig::broadcast_capacity`] actions behind skips the oldest.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                config: self.config,
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::{SmallVec, smallvec};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct TallyState {
        total: u32,
        steps: Vec<u32>,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TallyAction {
        Add(u32),
        /// Adds `n`, then counts down through `n - 1 .. 1` via feedback.
        Countdown(u32),
        /// Feeds itself back forever.
        Loop,
    }

    #[derive(Clone)]
    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TallyState,
            action: TallyAction,
            _env: &(),
        ) -> SmallVec<[Effect<TallyAction>; 4]> {
            match action {
                TallyAction::Add(n) => {
                    state.total += n;
                    state.steps.push(n);
                    SmallVec::new()
                },
                TallyAction::Countdown(n) => {
                    state.total += n;
                    state.steps.push(n);
                    if n > 1 {
                        smallvec![Effect::Send(TallyAction::Countdown(n - 1))]
                    } else {
                        SmallVec::new()
                    }
                },
                TallyAction::Loop => {
                    state.total += 1;
                    smallvec![Effect::Send(TallyAction::Loop)]
                },
            }
        }
    }

    #[tokio::test]
    async fn send_applies_action() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        let feedback = store.send(TallyAction::Add(3)).await;

        assert_eq!(feedback, Ok(0));
        assert_eq!(store.state(|s| s.total).await, 3);
    }

    #[tokio::test]
    async fn send_runs_feedback_cascade_before_returning() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        let feedback = store.send(TallyAction::Countdown(3)).await;

        assert_eq!(feedback, Ok(2));
        assert_eq!(store.state(|s| s.steps.clone()).await, vec![3, 2, 1]);
        assert_eq!(store.state(|s| s.total).await, 6);
    }

    #[tokio::test]
    async fn runaway_feedback_is_rejected_and_rolled_back() {
        let config = StoreConfig::default().with_max_feedback_actions(5);
        let store = Store::with_config(TallyState::default(), TallyReducer, (), config);
        let _ = store.send(TallyAction::Add(10)).await;

        let result = store.send(TallyAction::Loop).await;

        assert_eq!(result, Err(StoreError::FeedbackLimitExceeded { limit: 5 }));
        assert_eq!(store.state(|s| s.total).await, 10);
    }

    #[tokio::test]
    async fn feedback_actions_are_broadcast() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        let mut rx = store.subscribe_actions();

        let _ = store.send(TallyAction::Countdown(2)).await;

        assert_eq!(rx.recv().await, Ok(TallyAction::Countdown(1)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        let other = store.clone();

        let _ = other.send(TallyAction::Add(4)).await;

        assert_eq!(store.state(|s| s.total).await, 4);
    }

    #[tokio::test]
    async fn zero_broadcast_capacity_is_clamped() {
        let config = StoreConfig::default().with_broadcast_capacity(0);
        let store = Store::with_config(TallyState::default(), TallyReducer, (), config);
        let mut rx = store.subscribe_actions();

        let _ = store.send(TallyAction::Countdown(2)).await;

        assert_eq!(store.config().broadcast_capacity, 0);
        assert_eq!(rx.recv().await, Ok(TallyAction::Countdown(1)));
    }

    #[tokio::test]
    async fn rolled_back_cascade_is_not_broadcast() {
        let config = StoreConfig::default().with_max_feedback_actions(2);
        let store = Store::with_config(TallyState::default(), TallyReducer, (), config);
        let mut rx = store.subscribe_actions();

        let result = store.send(TallyAction::Countdown(5)).await;

        assert_eq!(result, Err(StoreError::FeedbackLimitExceeded { limit: 2 }));
        assert!(rx.try_recv().is_err());
    }
}
