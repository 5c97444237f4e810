//! Domain errors for the task collection.

use thiserror::Error;

/// Reasons a collection operation can be rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// A task with exactly this title is already in the collection
    #[error("A task titled {title:?} already exists")]
    DuplicateTitle {
        /// The rejected title
        title: String,
    },
}
