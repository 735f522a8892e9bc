//! Partial update payload for tasks.

use super::{TaskCategory, TaskPriority, TaskStatus};
use chrono::NaiveDate;
use serde::Deserialize;

/// Partial task update.
///
/// Each slot is `None` when the caller did not supply the field. Identity and
/// timestamps are not patchable; unknown keys in a JSON body are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement category.
    pub category: Option<TaskCategory>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Replacement due date.
    pub due_date: Option<NaiveDate>,
    /// Replacement status.
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replacement title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the replacement category.
    #[must_use]
    pub const fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the replacement priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the replacement due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the replacement status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }
}
