//! # Tasklist Testing
//!
//! Testing utilities and helpers for the tasklist reducer architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then builder for reducers ([`ReducerTest`])
//! - Assertion helpers for the effects a reducer returns
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_testing::{ReducerTest, SequentialIds};
//!
//! ReducerTest::new(TaskListReducer::new())
//!     .with_env(TaskEnvironment::new(Arc::new(SequentialIds::new())))
//!     .given_state(TaskListState::default())
//!     .when_action(TaskListAction::AddTask { title: "Buy milk".into() })
//!     .then_state(|state| assert_eq!(state.tasks.len(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use tasklist_core::environment::{Clock, IdGenerator};


pub use reducer_test::{ReducerTest, assertions};

/// Deterministic implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tasklist_testing::mocks::FixedClock;
    /// use tasklist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }

    /// Id generator that counts up from a known start
    ///
    /// # Example
    ///
    /// ```
    /// use tasklist_testing::mocks::SequentialIds;
    /// use tasklist_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIds::new();
    /// assert_eq!(ids.next_id(), 1);
    /// assert_eq!(ids.next_id(), 2);
    /// ```
    #[derive(Debug)]
    pub struct SequentialIds {
        next: AtomicU64,
    }

    impl SequentialIds {
        /// Ids start at 1
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(1)
        }

        /// Ids start at `first`
        #[must_use]
        pub const fn starting_at(first: u64) -> Self {
            Self {
                next: AtomicU64::new(first),
            }
        }

        /// The id the next call to [`IdGenerator::next_id`] will return
        #[must_use]
        pub fn peek(&self) -> u64 {
            self.next.load(Ordering::SeqCst)
        }
    }

    impl Default for SequentialIds {
        fn default() -> Self {
            Self::new()
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> u64 {
            self.next.fetch_add(1, Ordering::SeqCst)
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SequentialIds, test_clock};
