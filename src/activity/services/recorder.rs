//! Service that turns accepted task mutations into log entries.

use crate::activity::{
    domain::{ActivityEvent, ActivityLogEntry},
    ports::{ActivityLogRepository, ActivityLogResult},
};
use crate::task::domain::TaskId;
use mockable::Clock;
use std::sync::Arc;

/// Activity recording and history service.
#[derive(Clone)]
pub struct ActivityRecorder<L, C>
where
    L: ActivityLogRepository,
    C: Clock + Send + Sync,
{
    log: Arc<L>,
    clock: Arc<C>,
}

impl<L, C> ActivityRecorder<L, C>
where
    L: ActivityLogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new activity recorder.
    #[must_use]
    pub const fn new(log: Arc<L>, clock: Arc<C>) -> Self {
        Self { log, clock }
    }

    /// Stamps the event with an identifier and timestamp and appends it.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`crate::activity::ports::ActivityLogError`]
    /// when the append fails. The caller decides whether the failure is
    /// fatal; the task services treat it as diagnostic only.
    pub async fn record(&self, event: ActivityEvent) -> ActivityLogResult<ActivityLogEntry> {
        let entry = ActivityLogEntry::record(event, &*self.clock);
        self.log.append(&entry).await?;
        tracing::debug!(
            task_id = %entry.task_id(),
            entry_id = %entry.id(),
            action = %entry.action(),
            "activity recorded"
        );
        Ok(entry)
    }

    /// Returns the history for a task, most recent first.
    ///
    /// The task need not exist any more; deleted tasks keep their history.
    ///
    /// # Errors
    ///
    /// Returns [`crate::activity::ports::ActivityLogError`] when the lookup
    /// fails.
    pub async fn list_for_task(&self, task_id: TaskId) -> ActivityLogResult<Vec<ActivityLogEntry>> {
        self.log.list_for_task(task_id).await
    }
}
