//! Service layer for task creation, lookup, mutation, and deletion.
//!
//! Every accepted mutation is followed by exactly one activity entry. The
//! task write and the activity append are not atomic: once the task write has
//! committed, a failed append is logged and the mutation still succeeds.

use crate::activity::{
    domain::ActivityEvent, ports::ActivityLogRepository, services::ActivityRecorder,
};
use crate::task::{
    domain::{
        Task, TaskCategory, TaskDetails, TaskDomainError, TaskField, TaskFilter, TaskId,
        TaskPatch, TaskPriority,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
///
/// Every business field is optional here so that missing input can be
/// reported as a validation error rather than a decoding failure. A
/// requested status is accepted and ignored: new tasks always start pending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    category: Option<TaskCategory>,
    priority: Option<TaskPriority>,
    due_date: Option<NaiveDate>,
    #[serde(default, rename = "status")]
    requested_status: Option<serde_json::Value>,
}

impl CreateTaskRequest {
    /// Creates a request with every required field.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: TaskCategory,
        priority: TaskPriority,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            category: Some(category),
            priority: Some(priority),
            due_date: Some(due_date),
            requested_status: None,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub const fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Records a caller-requested status, which creation ignores.
    #[must_use]
    pub fn with_requested_status(mut self, status: impl Into<String>) -> Self {
        self.requested_status = Some(serde_json::Value::String(status.into()));
        self
    }

    fn into_details(self) -> Result<TaskDetails, TaskDomainError> {
        let Self {
            title,
            description,
            category,
            priority,
            due_date,
            ..
        } = self;
        TaskDetails::new(
            title.ok_or(TaskDomainError::MissingField(TaskField::Title))?,
            description.ok_or(TaskDomainError::MissingField(TaskField::Description))?,
            category.ok_or(TaskDomainError::MissingField(TaskField::Category))?,
            priority.ok_or(TaskDomainError::MissingField(TaskField::Priority))?,
            due_date.ok_or(TaskDomainError::MissingField(TaskField::DueDate))?,
        )
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskStoreError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for task service operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task storage and mutation service.
#[derive(Clone)]
pub struct TaskStoreService<R, L, C>
where
    R: TaskRepository,
    L: ActivityLogRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    recorder: ActivityRecorder<L, C>,
    clock: Arc<C>,
}

impl<R, L, C> TaskStoreService<R, L, C>
where
    R: TaskRepository,
    L: ActivityLogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        recorder: ActivityRecorder<L, C>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            recorder,
            clock,
        }
    }

    /// Returns the recorder used for activity entries.
    #[must_use]
    pub const fn recorder(&self) -> &ActivityRecorder<L, C> {
        &self.recorder
    }

    /// Creates a pending task and records a `Created` entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Domain`] when a required field is missing or
    /// blank, or [`TaskStoreError::Repository`] when persistence fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskStoreResult<Task> {
        let details = request.into_details().inspect_err(|err| {
            tracing::debug!(error = %err, "task creation rejected");
        })?;
        let task = Task::create(details, &*self.clock);
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), "task created");

        self.record_activity(ActivityEvent::created(&task)).await;
        Ok(task)
    }

    /// Lists tasks matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Repository`] when the lookup fails.
    pub async fn list(&self, filter: &TaskFilter) -> TaskStoreResult<Vec<Task>> {
        Ok(self.repository.list(filter).await?)
    }

    /// Fetches a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist, or
    /// [`TaskStoreError::Repository`] when the lookup fails.
    pub async fn get(&self, id: TaskId) -> TaskStoreResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskStoreError::NotFound(id))
    }

    /// Merges a patch into a task and records one activity entry.
    ///
    /// A patch that supplies a status different from the stored one records
    /// `Status Changed`; every other accepted patch records `Updated` with
    /// full before and after snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist,
    /// [`TaskStoreError::Domain`] when the patch carries blank text, or
    /// [`TaskStoreError::Repository`] when persistence fails.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> TaskStoreResult<Task> {
        let mut task = self.get(id).await?;
        let previous = task.clone();
        let requested_status = patch.status;

        task.apply_patch(patch, &*self.clock).inspect_err(|err| {
            tracing::debug!(task_id = %id, error = %err, "task update rejected");
        })?;
        self.repository.update(&task).await?;
        tracing::info!(task_id = %id, "task updated");

        let event = match requested_status {
            Some(new_status) if new_status != previous.status() => {
                ActivityEvent::status_changed(id, previous.status(), new_status)
            }
            _ => ActivityEvent::updated(previous, task.clone()),
        };
        self.record_activity(event).await;
        Ok(task)
    }

    /// Deletes a task and records a `Deleted` entry with its last state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist, or
    /// [`TaskStoreError::Repository`] when persistence fails.
    pub async fn delete(&self, id: TaskId) -> TaskStoreResult<Task> {
        let removed = self.repository.delete(id).await?;
        tracing::info!(task_id = %id, "task deleted");

        self.record_activity(ActivityEvent::deleted(removed.clone()))
            .await;
        Ok(removed)
    }

    async fn record_activity(&self, event: ActivityEvent) {
        let task_id = event.task_id();
        let action = event.change().action();
        if let Err(err) = self.recorder.record(event).await {
            tracing::error!(
                task_id = %task_id,
                action = %action,
                error = %err,
                "failed to record task activity; mutation was kept"
            );
        }
    }
}
