//! Repository port for append-only activity storage.

use crate::activity::domain::{ActivityEntryId, ActivityLogEntry};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for activity log operations.
pub type ActivityLogResult<T> = Result<T, ActivityLogError>;

/// Append-only activity persistence contract.
///
/// Entries are never updated or removed once appended.
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityLogError::DuplicateEntry`] when the entry ID already
    /// exists.
    async fn append(&self, entry: &ActivityLogEntry) -> ActivityLogResult<()>;

    /// Returns every entry for the task, most recent first.
    ///
    /// Entries written at the same instant are returned in reverse append
    /// order. The task itself need not exist.
    async fn list_for_task(&self, task_id: TaskId) -> ActivityLogResult<Vec<ActivityLogEntry>>;
}

/// Errors returned by activity log implementations.
#[derive(Debug, Clone, Error)]
pub enum ActivityLogError {
    /// An entry with the same identifier already exists.
    #[error("duplicate activity entry identifier: {0}")]
    DuplicateEntry(ActivityEntryId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ActivityLogError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
