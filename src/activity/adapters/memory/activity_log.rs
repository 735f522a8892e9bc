//! In-memory append-only activity log.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::activity::{
    domain::{ActivityEntryId, ActivityLogEntry},
    ports::{ActivityLogError, ActivityLogRepository, ActivityLogResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory activity log.
///
/// Entries are kept in append order; the position doubles as the ordering
/// tie-breaker for entries sharing a timestamp.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityLog {
    state: Arc<RwLock<InMemoryLogState>>,
}

#[derive(Debug, Default)]
struct InMemoryLogState {
    entries: Vec<ActivityLogEntry>,
    ids: HashSet<ActivityEntryId>,
}

impl InMemoryActivityLog {
    /// Creates an empty in-memory log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> ActivityLogError {
    ActivityLogError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ActivityLogRepository for InMemoryActivityLog {
    async fn append(&self, entry: &ActivityLogEntry) -> ActivityLogResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.ids.insert(entry.id()) {
            return Err(ActivityLogError::DuplicateEntry(entry.id()));
        }
        state.entries.push(entry.clone());
        Ok(())
    }

    async fn list_for_task(&self, task_id: TaskId) -> ActivityLogResult<Vec<ActivityLogEntry>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut matching: Vec<(usize, &ActivityLogEntry)> = state
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.task_id() == task_id)
            .collect();
        matching.sort_by_key(|(position, entry)| {
            (Reverse(entry.timestamp()), Reverse(*position))
        });
        Ok(matching
            .into_iter()
            .map(|(_, entry)| entry.clone())
            .collect())
    }
}
