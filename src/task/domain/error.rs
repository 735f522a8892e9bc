//! Error types for task domain validation and parsing.

use std::fmt;
use thiserror::Error;

/// Business fields that are validated on create and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    /// Task title.
    Title,
    /// Task description.
    Description,
    /// Task category.
    Category,
    /// Task priority.
    Priority,
    /// Task due date.
    DueDate,
}

impl TaskField {
    /// Returns the field name as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::Priority => "priority",
            Self::DueDate => "dueDate",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// A required field was not supplied.
    #[error("missing required field: {0}")]
    MissingField(TaskField),

    /// A text field is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyField(TaskField),
}

/// Error returned while parsing a task status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid status value: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing a task category.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid category value: {0}")]
pub struct ParseTaskCategoryError(pub String);

/// Error returned while parsing a task priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid priority value: {0}")]
pub struct ParseTaskPriorityError(pub String);
