//! The task entity and the ordered task collection.
//!
//! `TaskCollection` is a value: every operation borrows the current
//! collection and returns a new one, so a caller holding the old value never
//! sees a partial update.

use crate::error::TaskError;
use serde::{Deserialize, Serialize};

/// Unique identifier for a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(u64);

impl TaskId {
    /// Wraps a raw id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single to-do item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Text shown in the row
    pub title: String,
    /// Whether the task has been ticked off
    pub done: bool,
}

impl Task {
    /// Creates a task that is not done yet
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }
}

/// Insertion-ordered tasks with unique ids
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    /// Creates an empty collection
    #[must_use]
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Appends a new task, rejecting an exact title match.
    ///
    /// `next_id` is only called when the task is actually created.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::DuplicateTitle`] if a task already has this
    /// exact title. The comparison is case and whitespace sensitive.
    pub fn add(
        &self,
        title: impl Into<String>,
        next_id: impl FnOnce() -> TaskId,
    ) -> Result<Self, TaskError> {
        let title = title.into();
        if self.contains_title(&title) {
            return Err(TaskError::DuplicateTitle { title });
        }

        let mut tasks = self.tasks.clone();
        tasks.push(Task::new(next_id(), title));
        Ok(Self { tasks })
    }

    /// Flips `done` on the task with `id`; unknown ids leave the collection as is.
    #[must_use]
    pub fn toggle_done(&self, id: TaskId) -> Self {
        self.map_task(id, |task| Task {
            done: !task.done,
            ..task.clone()
        })
    }

    /// Drops the task with `id`; unknown ids leave the collection as is.
    ///
    /// No confirmation happens here, callers ask the user first.
    #[must_use]
    pub fn remove(&self, id: TaskId) -> Self {
        Self {
            tasks: self.tasks.iter().filter(|t| t.id != id).cloned().collect(),
        }
    }

    /// Replaces the title of the task with `id`.
    ///
    /// Unlike [`add`](Self::add) the new title is not checked against the
    /// other tasks, and an empty title is accepted.
    #[must_use]
    pub fn edit_title(&self, id: TaskId, title: impl Into<String>) -> Self {
        let title = title.into();
        self.map_task(id, |task| Task {
            title: title.clone(),
            ..task.clone()
        })
    }

    fn map_task(&self, id: TaskId, f: impl Fn(&Task) -> Task) -> Self {
        Self {
            tasks: self
                .tasks
                .iter()
                .map(|task| if task.id == id { f(task) } else { task.clone() })
                .collect(),
        }
    }

    /// Number of tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if there are no tasks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks marked done
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }

    /// Task with `id`
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Task at `index` in insertion order
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Returns true if a task with `id` exists
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Returns true if a task has exactly this title
    #[must_use]
    pub fn contains_title(&self, title: &str) -> bool {
        self.tasks.iter().any(|t| t.title == title)
    }

    /// Tasks in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Tasks in insertion order, as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
