//! Listing filter for tasks.

use super::{Task, TaskPriority, TaskStatus};

/// Optional status and priority constraints for task listings.
///
/// An absent constraint matches every task for that dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            status: None,
            priority: None,
        }
    }

    /// Restricts the filter to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the filter to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns the status constraint, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the priority constraint, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns whether the task satisfies every present constraint.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self.priority.is_none_or(|priority| task.priority() == priority)
    }
}
