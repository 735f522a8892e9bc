//! Task aggregate root and validated creation details.

use super::{
    TaskCategory, TaskDomainError, TaskField, TaskId, TaskPatch, TaskPriority, TaskStatus,
    stored_now,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated business fields required to create a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    title: String,
    description: String,
    category: TaskCategory,
    priority: TaskPriority,
    due_date: NaiveDate,
}

impl TaskDetails {
    /// Creates validated task details.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyField`] when the title or description
    /// is empty after trimming.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: TaskCategory,
        priority: TaskPriority,
        due_date: NaiveDate,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            title: non_empty(title.into(), TaskField::Title)?,
            description: non_empty(description.into(), TaskField::Description)?,
            category,
            priority,
            due_date,
        })
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    category: TaskCategory,
    priority: TaskPriority,
    due_date: NaiveDate,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted category.
    pub category: TaskCategory,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted due date.
    pub due_date: NaiveDate,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new pending task.
    #[must_use]
    pub fn create(details: TaskDetails, clock: &impl Clock) -> Self {
        let timestamp = stored_now(clock);
        let TaskDetails {
            title,
            description,
            category,
            priority,
            due_date,
        } = details;

        Self {
            id: TaskId::new(),
            title,
            description,
            category,
            priority,
            due_date,
            status: TaskStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            category: data.category,
            priority: data.priority,
            due_date: data.due_date,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the task category.
    #[must_use]
    pub const fn category(&self) -> TaskCategory {
        self.category
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the task status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Merges a patch into this task.
    ///
    /// Fields present in the patch replace the stored values; absent fields
    /// are left untouched. Validation happens before any field is written, so
    /// a rejected patch leaves the task unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyField`] when the patch carries a blank
    /// title or description.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let TaskPatch {
            title,
            description,
            category,
            priority,
            due_date,
            status,
        } = patch;
        let checked_title = title
            .map(|value| non_empty(value, TaskField::Title))
            .transpose()?;
        let checked_description = description
            .map(|value| non_empty(value, TaskField::Description))
            .transpose()?;

        replace_if_present(&mut self.title, checked_title);
        replace_if_present(&mut self.description, checked_description);
        replace_if_present(&mut self.category, category);
        replace_if_present(&mut self.priority, priority);
        replace_if_present(&mut self.due_date, due_date);
        replace_if_present(&mut self.status, status);
        self.updated_at = stored_now(clock);
        Ok(())
    }
}

fn replace_if_present<T>(field: &mut T, value: Option<T>) {
    if let Some(new_value) = value {
        *field = new_value;
    }
}

fn non_empty(value: String, field: TaskField) -> Result<String, TaskDomainError> {
    if value.trim().is_empty() {
        return Err(TaskDomainError::EmptyField(field));
    }
    Ok(value)
}
