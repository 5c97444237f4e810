//! Dependencies injected into the task reducers.

use crate::task::TaskId;
use std::sync::Arc;
use tasklist_core::environment::{IdGenerator, MonotonicIdGenerator, SystemClock};

/// Environment dependencies for the task reducers
#[derive(Clone)]
pub struct TaskEnvironment {
    /// Source of ids for new tasks
    pub ids: Arc<dyn IdGenerator>,
}

impl TaskEnvironment {
    /// Creates a new `TaskEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Time-seeded monotonic ids read from the system clock
    #[must_use]
    pub fn live() -> Self {
        Self::new(Arc::new(MonotonicIdGenerator::new(Arc::new(SystemClock))))
    }

    /// Draws the next task id
    #[must_use]
    pub fn next_task_id(&self) -> TaskId {
        TaskId::new(self.ids.next_id())
    }
}

impl std::fmt::Debug for TaskEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEnvironment").finish_non_exhaustive()
    }
}
